use crate::entry::{Entry, Interface};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Tag {
    pub key: Option<String>,
    pub value: Option<String>,
}

/// The user affected by an event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: Option<String>,
    pub email: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub role_name: Option<String>,
    #[serde(default)]
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: Option<u64>,
    pub version: Option<String>,
    pub short_version: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub url: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_released: Option<DateTime<Utc>>,
    pub new_groups: Option<u64>,
    pub commit_count: Option<u64>,
    pub data: Option<Map<String, Value>>,
}

/// Must be decoded from JSON text (`serde_json::from_str` and friends) since
/// entry payloads are kept raw.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "eventID")]
    pub event_id: Option<String>,
    #[serde(rename = "groupID")]
    pub group_id: Option<String>,
    #[serde(rename = "nextEventID")]
    pub next_event_id: Option<String>,
    #[serde(rename = "previousEventID")]
    pub previous_event_id: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
    pub culprit: Option<String>,
    pub message: Option<String>,
    pub user_report: Option<Value>,
    pub size: Option<u64>,
    pub platform: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub metadata: Option<BTreeMap<String, Value>>,
    pub tags: Option<Vec<Tag>>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_received: Option<DateTime<Utc>>,
    pub user: Option<User>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    pub packages: Option<BTreeMap<String, String>>,
    pub sdk: Option<Map<String, Value>>,
    pub contexts: Option<Map<String, Value>>,
    pub context: Option<Map<String, Value>>,
    pub release: Option<Release>,
}

impl Event {
    /// Decodes every entry independently and in order; one bad payload
    /// does not affect the others.
    pub fn interfaces(&self) -> Vec<Result<Interface>> {
        self.entries.iter().map(Entry::interface).collect()
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .as_deref()?
            .iter()
            .find(|tag| tag.key.as_deref() == Some(key))
            .and_then(|tag| tag.value.as_deref())
    }
}

/// One row of the `events` endpoint; its columns follow the requested fields.
pub type EventData = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub data: Vec<EventData>,
    pub meta: Option<Value>,
}
