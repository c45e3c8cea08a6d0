//! Filters for the organization `events` and `events-stats` endpoints.
//!
//! The two endpoints disagree on how booleans are spelled: `events-stats`
//! wants `excludeOther`/`partial` as `0`/`1` while `utc` is `true`/`false`
//! everywhere. Both spellings are kept as the vendor expects them.

use chrono::{DateTime, SecondsFormat, Utc};

/// A filter that renders itself as a URL query string.
pub trait QueryString {
    fn to_query_string(&self) -> String;
}

/// Query for `/organizations/{org}/events-stats/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsStatsRequest {
    pub dataset: Option<String>,
    pub end: Option<DateTime<Utc>>,
    pub environment: Option<String>,
    pub exclude_other: bool,
    pub field: Vec<String>,
    pub interval: Option<String>,
    pub order_by: Option<String>,
    pub partial: bool,
    pub per_page: Option<u32>,
    /// Project ids.
    pub project: Vec<String>,
    pub query: Option<String>,
    pub referrer: Option<String>,
    pub sampling: Option<String>,
    pub sort: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub stats_period: Option<String>,
    pub utc: bool,
    pub y_axis: Vec<String>,
    pub cursor: Option<String>,
}

/// Query for `/organizations/{org}/events/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsRequest {
    pub dataset: Option<String>,
    pub end: Option<DateTime<Utc>>,
    pub environment: Option<String>,
    pub field: Vec<String>,
    pub per_page: Option<u32>,
    /// Project slugs.
    pub project: Vec<String>,
    pub query: Option<String>,
    pub referrer: Option<String>,
    pub sampling: Option<String>,
    pub sort: Vec<String>,
    pub start: Option<DateTime<Utc>>,
    pub stats_period: Option<String>,
    pub utc: bool,
    pub cursor: Option<String>,
}

impl QueryString for EventsStatsRequest {
    fn to_query_string(&self) -> String {
        let mut query = Query::default();

        query.add("excludeOther", bit(self.exclude_other));
        query.add("partial", bit(self.partial));
        query.add("utc", self.utc.to_string());
        query.add_opt("per_page", self.per_page);

        query.add_str("dataset", &self.dataset);
        query.add_time("end", &self.end);
        query.add_str("environment", &self.environment);
        query.add_all("field", &self.field);
        query.add_str("interval", &self.interval);
        query.add_str("orderby", &self.order_by);
        query.add_all("project", &self.project);
        query.add_str("query", &self.query);
        query.add_str("referrer", &self.referrer);
        query.add_str("sampling", &self.sampling);
        query.add_str("sort", &self.sort);
        query.add_time("start", &self.start);
        query.add_str("statsPeriod", &self.stats_period);
        query.add_all("yAxis", &self.y_axis);
        query.add_str("cursor", &self.cursor);

        query.encode()
    }
}

impl QueryString for EventsRequest {
    fn to_query_string(&self) -> String {
        let mut query = Query::default();

        query.add("utc", self.utc.to_string());
        query.add_opt("per_page", self.per_page);

        query.add_str("dataset", &self.dataset);
        query.add_time("end", &self.end);
        query.add_str("environment", &self.environment);
        query.add_all("field", &self.field);
        query.add_all("project", &self.project);
        query.add_str("query", &self.query);
        query.add_str("referrer", &self.referrer);
        query.add_str("sampling", &self.sampling);
        query.add_all("sort", &self.sort);
        query.add_time("start", &self.start);
        query.add_str("statsPeriod", &self.stats_period);
        query.add_str("cursor", &self.cursor);

        query.encode()
    }
}

/// Formats a bound as `2024-01-02T03:04:05.678Z`.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn bit(flag: bool) -> String {
    let bit = if flag { "1" } else { "0" };
    bit.to_string()
}

/// Ordered list of key/value pairs; keys may repeat.
#[derive(Default)]
struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    fn add(&mut self, key: &'static str, value: String) {
        self.pairs.push((key, value));
    }

    fn add_opt<T: ToString>(&mut self, key: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.add(key, value.to_string());
        }
    }

    fn add_str(&mut self, key: &'static str, value: &Option<String>) {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            self.add(key, value.to_string());
        }
    }

    fn add_time(&mut self, key: &'static str, value: &Option<DateTime<Utc>>) {
        if let Some(time) = value {
            self.add(key, format_time(time));
        }
    }

    fn add_all(&mut self, key: &'static str, values: &[String]) {
        for value in values {
            self.add(key, value.clone());
        }
    }

    /// Keys come out sorted; repeated keys keep their insertion order.
    fn encode(mut self) -> String {
        self.pairs.sort_by_key(|(key, _)| *key);
        // Serializing a sequence of string pairs cannot fail.
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}
