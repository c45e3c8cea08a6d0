//! Payload schemas of the event entry types.
//!
//! Each entry type has its own schema; apart from all being JSON objects they
//! share nothing. Every field is optional because the API drops empty ones.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A source line as `[line_number, text]`.
pub type ContextLine = (u64, Option<String>);

/// A header, cookie or query pair as `[name, value]`.
pub type Pair = (String, Option<String>);

/// `message` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Message {
    pub message: Option<String>,
    pub formatted: Option<String>,
    pub params: Option<Value>,
}

/// `stacktrace` entry, also nested inside exceptions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stacktrace {
    #[serde(default)]
    pub frames: Vec<Frame>,
    pub frames_omitted: Option<Vec<u64>>,
    pub has_system_frames: Option<bool>,
    pub registers: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub filename: Option<String>,
    pub abs_path: Option<String>,
    pub module: Option<String>,
    pub package: Option<String>,
    pub platform: Option<String>,
    pub function: Option<String>,
    pub raw_function: Option<String>,
    pub symbol: Option<String>,
    pub instruction_addr: Option<String>,
    pub symbol_addr: Option<String>,
    pub line_no: Option<u64>,
    pub col_no: Option<u64>,
    pub in_app: Option<bool>,
    pub trust: Option<String>,
    #[serde(default)]
    pub context: Vec<ContextLine>,
    pub vars: Option<Map<String, Value>>,
}

/// `exception` entry: a chain of exceptions, innermost last.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
    #[serde(default)]
    pub values: Vec<ExceptionValue>,
    pub has_system_frames: Option<bool>,
    pub exc_omitted: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionValue {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<String>,
    pub module: Option<String>,
    pub thread_id: Option<Value>,
    pub mechanism: Option<Mechanism>,
    pub stacktrace: Option<Stacktrace>,
    pub raw_stacktrace: Option<Stacktrace>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Mechanism {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub handled: Option<bool>,
    pub description: Option<String>,
    pub help_link: Option<String>,
    pub data: Option<Map<String, Value>>,
}

impl Exception {
    /// The exception that was raised last, which is the one issues are titled after.
    pub fn innermost(&self) -> Option<&ExceptionValue> {
        self.values.last()
    }
}

/// `request` entry: the HTTP request being handled when the event fired.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub url: Option<String>,
    pub method: Option<String>,
    pub fragment: Option<String>,
    pub query: Option<Vec<Pair>>,
    pub data: Option<Value>,
    pub headers: Option<Vec<Pair>>,
    pub cookies: Option<Vec<Pair>>,
    pub env: Option<Map<String, Value>>,
    pub inferred_content_type: Option<String>,
    pub api_target: Option<String>,
}

impl Request {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_deref()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_deref())
    }
}

/// `template` entry: the template frame of a rendering error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub filename: Option<String>,
    pub abs_path: Option<String>,
    pub line_no: Option<u64>,
    pub col_no: Option<u64>,
    #[serde(default)]
    pub context: Vec<ContextLine>,
}

/// `user` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub ip_address: Option<String>,
    pub data: Option<Map<String, Value>>,
}

/// `query` entry: a database query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Query {
    pub query: Option<String>,
    pub engine: Option<String>,
}

/// `breadcrumbs` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Breadcrumbs {
    #[serde(default)]
    pub values: Vec<Breadcrumb>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Breadcrumb {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub event_id: Option<String>,
    pub data: Option<Map<String, Value>>,
}
