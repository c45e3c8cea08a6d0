use crate::error::{Error, Result};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://sentry.io/api/0/";

/// Connection settings for [`SentryClient`](crate::SentryClient).
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub token: Option<String>,
}

impl Config {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: with_trailing_slash(base_url.into()),
            token: None,
        }
    }

    pub fn with_token<S: Into<String>>(mut self, token: S) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reads `SENTRY_BASE_URL` and `SENTRY_TOKEN`. Neither is required.
    pub fn from_env() -> Self {
        let base_url =
            optional_var("SENTRY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url: with_trailing_slash(base_url),
            token: optional_var("SENTRY_TOKEN"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Empty values count as unset.
pub fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

pub fn required_var(name: &'static str) -> Result<String> {
    optional_var(name).ok_or(Error::MissingVar(name))
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
