use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{path} returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
        body: String,
    },
    #[error("Failed to decode response of {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to decode '{kind}' entry: {source}")]
    Entry {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} must be set")]
    MissingVar(&'static str),
    #[error("SENTRY_TOKEN is not a valid header value")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

impl Error {
    pub(crate) fn decode<S: Into<String>>(path: S, source: serde_json::Error) -> Self {
        Error::Decode {
            path: path.into(),
            source,
        }
    }
}
