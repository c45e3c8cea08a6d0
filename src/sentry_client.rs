use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::*;
use crate::pagination::Link;
use crate::query::{EventsRequest, EventsStatsRequest, QueryString};
use crate::stats::{decode_events_stats, EventsStats};
use serde::de::DeserializeOwned;

/// Client for the events endpoints of the Sentry web API.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SentryClient {
    client: reqwest::Client,
    base_url: String,
}

impl SentryClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &config.token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token).parse()?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Uses a caller-built `reqwest::Client`; `base_url` must end with `/`.
    pub fn with_client<S: Into<String>>(client: reqwest::Client, base_url: S) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn _fetch(&self, path: &str, query: Option<&str>) -> Result<(String, Link)> {
        let url = match query.filter(|query| !query.is_empty()) {
            Some(query) => format!("{}{}?{}", self.base_url, path, query),
            None => format!("{}{}", self.base_url, path),
        };
        tracing::debug!(%url, "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let link = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .map(Link::parse)
            .unwrap_or_default();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, path, "request failed");
            return Err(Error::Status {
                status,
                path: path.to_string(),
                body,
            });
        }
        Ok((body, link))
    }

    async fn _get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let (body, _) = self._fetch(path, None).await?;
        serde_json::from_str(&body).map_err(|e| Error::decode(path, e))
    }

    async fn _get_page<T, Q>(&self, path: &str, params: &Q) -> Result<(T, Link)>
    where
        T: DeserializeOwned,
        Q: QueryString,
    {
        let (body, link) = self
            ._fetch(path, Some(&params.to_query_string()))
            .await?;
        let page = serde_json::from_str(&body).map_err(|e| Error::decode(path, e))?;
        Ok((page, link))
    }

    /// `GET /projects/{org}/{project}/events/{event_id}/`
    pub async fn get_project_event(
        &self,
        organization_slug: &str,
        project_slug: &str,
        event_id: &str,
    ) -> Result<Event> {
        self._get(&format!(
            "projects/{}/{}/events/{}/",
            organization_slug, project_slug, event_id
        ))
        .await
    }

    /// `GET /issues/{issue_id}/events/latest/`
    pub async fn get_latest_event(&self, issue_id: &str) -> Result<Event> {
        self._get(&format!("issues/{}/events/latest/", issue_id))
            .await
    }

    /// `GET /issues/{issue_id}/events/oldest/`
    pub async fn get_oldest_event(&self, issue_id: &str) -> Result<Event> {
        self._get(&format!("issues/{}/events/oldest/", issue_id))
            .await
    }

    /// First page of `GET /organizations/{org}/events/`.
    pub async fn get_events(
        &self,
        organization_slug: &str,
        params: &EventsRequest,
    ) -> Result<EventsResponse> {
        let (events, _) = self.get_events_page(organization_slug, params).await?;
        Ok(events)
    }

    /// One page of events plus the `Link` to its neighbours. Set
    /// `params.cursor` to move between pages.
    pub async fn get_events_page(
        &self,
        organization_slug: &str,
        params: &EventsRequest,
    ) -> Result<(EventsResponse, Link)> {
        self._get_page(&format!("organizations/{}/events/", organization_slug), params)
            .await
    }

    /// Follows `next` cursors until the API reports no more results or the
    /// cursor stops advancing. Rows keep page order; `meta` comes from the
    /// first page.
    pub async fn get_all_events(
        &self,
        organization_slug: &str,
        params: &EventsRequest,
    ) -> Result<EventsResponse> {
        let mut params = params.clone();
        let (mut events, mut link) = self.get_events_page(organization_slug, &params).await?;

        while let Some(cursor) = link.next_cursor() {
            if params.cursor.as_deref() == Some(cursor) {
                tracing::warn!(cursor, "next cursor did not advance, stopping");
                break;
            }
            tracing::debug!(cursor, rows = events.data.len(), "fetching next events page");
            params.cursor = Some(cursor.to_string());

            let (page, next) = self.get_events_page(organization_slug, &params).await?;
            events.data.extend(page.data);
            link = next;
        }

        Ok(events)
    }

    /// `GET /organizations/{org}/events-stats/`
    pub async fn get_events_stats(
        &self,
        organization_slug: &str,
        params: &EventsStatsRequest,
    ) -> Result<EventsStats> {
        let path = format!("organizations/{}/events-stats/", organization_slug);
        let (body, _) = self
            ._fetch(&path, Some(&params.to_query_string()))
            .await?;
        decode_events_stats(&body, &params.y_axis).map_err(|e| Error::decode(path, e))
    }
}
