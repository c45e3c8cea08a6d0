use crate::error::{Error, Result};
use crate::interfaces::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::fmt;

/// One element of an event's `entries` list.
///
/// The payload is kept as the raw bytes from the wire until
/// [`Entry::interface`] is asked for it. A missing or `null` payload is `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Message,
    Stacktrace,
    Exception,
    Request,
    Template,
    User,
    Query,
    Breadcrumbs,
}

impl EntryType {
    pub const ALL: [EntryType; 8] = [
        EntryType::Message,
        EntryType::Stacktrace,
        EntryType::Exception,
        EntryType::Request,
        EntryType::Template,
        EntryType::User,
        EntryType::Query,
        EntryType::Breadcrumbs,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Message => "message",
            EntryType::Stacktrace => "stacktrace",
            EntryType::Exception => "exception",
            EntryType::Request => "request",
            EntryType::Template => "template",
            EntryType::User => "user",
            EntryType::Query => "query",
            EntryType::Breadcrumbs => "breadcrumbs",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The typed interpretation of an [`Entry`].
#[derive(Debug, Clone)]
pub enum Interface {
    Message(Message),
    Stacktrace(Stacktrace),
    Exception(Exception),
    Request(Request),
    Template(Template),
    User(User),
    Query(Query),
    Breadcrumbs(Breadcrumbs),
    /// An entry type this crate has no schema for. Not an error.
    Unknown {
        kind: String,
        data: Option<Box<RawValue>>,
    },
}

impl Interface {
    pub fn kind(&self) -> &str {
        match self {
            Interface::Unknown { kind, .. } => kind.as_str(),
            known => known.entry_type().map(|kind| kind.as_str()).unwrap_or_default(),
        }
    }

    pub fn entry_type(&self) -> Option<EntryType> {
        Some(match self {
            Interface::Message(_) => EntryType::Message,
            Interface::Stacktrace(_) => EntryType::Stacktrace,
            Interface::Exception(_) => EntryType::Exception,
            Interface::Request(_) => EntryType::Request,
            Interface::Template(_) => EntryType::Template,
            Interface::User(_) => EntryType::User,
            Interface::Query(_) => EntryType::Query,
            Interface::Breadcrumbs(_) => EntryType::Breadcrumbs,
            Interface::Unknown { .. } => return None,
        })
    }

    pub fn is_known(&self) -> bool {
        self.entry_type().is_some()
    }
}

impl Entry {
    pub fn new<S: Into<String>>(kind: S, data: Box<RawValue>) -> Self {
        Self {
            kind: kind.into(),
            data: Some(data),
        }
    }

    /// The payload exactly as received, `null` when absent.
    pub fn payload(&self) -> &str {
        self.data.as_deref().map_or("null", RawValue::get)
    }

    pub fn entry_type(&self) -> Option<EntryType> {
        EntryType::from_name(&self.kind)
    }

    /// Decodes the payload according to the entry's `type`.
    ///
    /// Unknown types come back as [`Interface::Unknown`] carrying the raw
    /// discriminator and payload.
    pub fn interface(&self) -> Result<Interface> {
        let Some(entry_type) = self.entry_type() else {
            tracing::debug!(kind = %self.kind, "no schema for entry type");
            return Ok(Interface::Unknown {
                kind: self.kind.clone(),
                data: self.data.clone(),
            });
        };

        Ok(match entry_type {
            EntryType::Message => Interface::Message(self.decode()?),
            EntryType::Stacktrace => Interface::Stacktrace(self.decode()?),
            EntryType::Exception => Interface::Exception(self.decode()?),
            EntryType::Request => Interface::Request(self.decode()?),
            EntryType::Template => Interface::Template(self.decode()?),
            EntryType::User => Interface::User(self.decode()?),
            EntryType::Query => Interface::Query(self.decode()?),
            EntryType::Breadcrumbs => Interface::Breadcrumbs(self.decode()?),
        })
    }

    /// Like [`Entry::interface`], but yields `None` for unknown types.
    pub fn known_interface(&self) -> Result<Option<Interface>> {
        self.interface()
            .map(|interface| interface.is_known().then_some(interface))
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(self.payload()).map_err(|source| Error::Entry {
            kind: self.kind.clone(),
            source,
        })
    }
}
