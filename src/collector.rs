use itertools::Itertools;
use sentry_events_client::config::{optional_var, required_var};
use sentry_events_client::{EventsRequest, EventsStatsRequest, Result, SentryClient};

/// Filters for one collection run, read from the environment.
pub struct CollectorSettings {
    pub organization: String,
    pub project: Option<String>,
    pub query: Option<String>,
    pub stats_period: String,
}

impl CollectorSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            organization: required_var("SENTRY_ORG")?,
            project: optional_var("SENTRY_PROJECT"),
            query: optional_var("SENTRY_QUERY"),
            stats_period: optional_var("SENTRY_STATS_PERIOD").unwrap_or_else(|| "24h".to_string()),
        })
    }
}

pub async fn collect_data(client: &SentryClient, settings: &CollectorSettings) -> Result<()> {
    tracing::info!(organization = %settings.organization, period = %settings.stats_period, "collecting data");

    let stats = client
        .get_events_stats(
            &settings.organization,
            &EventsStatsRequest {
                y_axis: vec!["count()".to_string()],
                stats_period: Some(settings.stats_period.clone()),
                query: settings.query.clone(),
                ..Default::default()
            },
        )
        .await?;
    for (label, set) in &stats {
        tracing::info!(series = %label, points = set.data.len(), total = set.total(), "event stats");
    }

    let events = client
        .get_all_events(
            &settings.organization,
            &EventsRequest {
                field: vec!["id".to_string(), "project".to_string(), "title".to_string()],
                project: settings.project.iter().cloned().collect(),
                query: settings.query.clone(),
                stats_period: Some(settings.stats_period.clone()),
                sort: vec!["-timestamp".to_string()],
                per_page: Some(100),
                ..Default::default()
            },
        )
        .await?;

    let by_project = events.data.iter().counts_by(|row| {
        row.get("project")
            .and_then(|project| project.as_str())
            .unwrap_or("unknown")
            .to_string()
    });
    for (project, count) in by_project.iter().sorted() {
        tracing::info!(%project, count, "events");
    }

    tracing::info!(rows = events.data.len(), "data collected");
    Ok(())
}
