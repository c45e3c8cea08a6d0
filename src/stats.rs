//! Time series returned by `/organizations/{org}/events-stats/`.
//!
//! Points travel as positional pairs, `[timestamp, [{"count": 5}, ...]]`,
//! so they get a hand-written decoder that insists on exactly two slots.

use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Series label used when a single-series response names no `yAxis`.
pub const DEFAULT_Y_AXIS: &str = "count()";

/// Stats keyed by series label, e.g. `"count()"`.
pub type EventsStats = BTreeMap<String, EventStatsSet>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatsSet {
    #[serde(default)]
    pub data: Vec<EventStatsPoint>,
    #[serde(default)]
    pub confidence: Vec<EventStatsConfidencePoint>,
    pub order: Option<i64>,
    pub is_metrics_data: Option<bool>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    /// Passed through as-is.
    pub meta: Option<Value>,
}

impl EventStatsSet {
    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.data.iter().map(|point| point.timestamp)
    }

    pub fn total(&self) -> f64 {
        self.data.iter().map(EventStatsPoint::total).sum()
    }
}

/// A `[timestamp, values]` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsPoint<V> {
    pub timestamp: i64,
    pub values: Vec<V>,
}

pub type EventStatsPoint = StatsPoint<EventStatsPointValue>;
pub type EventStatsConfidencePoint = StatsPoint<EventStatsConfidencePointValue>;

/// Counts arrive as JSON numbers or as numeric strings (`"5"`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventStatsPointValue {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub count: Option<Number>,
}

/// Confidence counts are strings such as `"high"`, or null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventStatsConfidencePointValue {
    #[serde(default)]
    pub count: Option<String>,
}

impl EventStatsPointValue {
    pub fn as_f64(&self) -> Option<f64> {
        self.count.as_ref().and_then(Number::as_f64)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.count.as_ref().and_then(Number::as_u64)
    }
}

impl EventStatsConfidencePointValue {
    pub fn count(&self) -> Option<&str> {
        self.count.as_deref()
    }
}

impl EventStatsPoint {
    /// Sum of the numeric counts; null counts add nothing.
    pub fn total(&self) -> f64 {
        self.values.iter().filter_map(EventStatsPointValue::as_f64).sum()
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = Option<Number>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, a numeric string or null")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.into()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.into()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Number::from_f64(v)
                .map(Some)
                .ok_or_else(|| E::invalid_value(de::Unexpected::Float(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.trim()
                .parse::<Number>()
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<S: Deserializer<'de>>(self, deserializer: S) -> Result<Self::Value, S::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for StatsPoint<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(PointVisitor(PhantomData))
    }
}

struct PointVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for PointVisitor<V> {
    type Value = StatsPoint<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of length 2 [timestamp, values]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let timestamp = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let values = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;

        let mut len = 2;
        while seq.next_element::<IgnoredAny>()?.is_some() {
            len += 1;
        }
        if len != 2 {
            return Err(de::Error::invalid_length(len, &self));
        }

        Ok(StatsPoint { timestamp, values })
    }
}

/// Decodes an `events-stats` response body.
///
/// With a single `yAxis` the API answers with a bare series instead of a
/// label mapping; that series is keyed under the requested label. Errors in
/// a labelled series name the series.
pub fn decode_events_stats(body: &str, y_axis: &[String]) -> serde_json::Result<EventsStats> {
    let top: BTreeMap<String, Box<RawValue>> = serde_json::from_str(body)?;

    if top
        .get("data")
        .is_some_and(|data| data.get().trim_start().starts_with('['))
    {
        let label = y_axis
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_Y_AXIS.to_string());
        let set: EventStatsSet = serde_json::from_str(body)?;
        return Ok(BTreeMap::from([(label, set)]));
    }

    top.into_iter()
        .map(|(label, raw)| match serde_json::from_str::<EventStatsSet>(raw.get()) {
            Ok(set) => Ok((label, set)),
            Err(e) => Err(<serde_json::Error as de::Error>::custom(format_args!(
                "series {:?}: {}",
                label, e
            ))),
        })
        .collect()
}
