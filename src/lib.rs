//! Typed client for the events part of the Sentry web API.
//!
//! ```no_run
//! use sentry_events_client::{Config, EventsStatsRequest, SentryClient};
//!
//! # async fn run() -> sentry_events_client::Result<()> {
//! let client = SentryClient::new(&Config::from_env())?;
//! let stats = client
//!     .get_events_stats(
//!         "acme",
//!         &EventsStatsRequest {
//!             y_axis: vec!["count()".into()],
//!             stats_period: Some("24h".into()),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! for (label, set) in &stats {
//!     println!("{label}: {}", set.total());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod interfaces;
pub mod models;
pub mod pagination;
pub mod query;
pub mod sentry_client;
pub mod stats;

pub use config::Config;
pub use entry::{Entry, EntryType, Interface};
pub use error::{Error, Result};
pub use models::{Event, EventData, EventsResponse, Release, Tag, User};
pub use pagination::{Link, LinkPage};
pub use query::{EventsRequest, EventsStatsRequest, QueryString};
pub use sentry_client::SentryClient;
pub use stats::{
    EventStatsConfidencePoint, EventStatsConfidencePointValue, EventStatsPoint,
    EventStatsPointValue, EventStatsSet, EventsStats,
};
