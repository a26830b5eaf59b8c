use chrono::NaiveDate;
use thiserror::Error;

/// Failure to produce a dataset from either the cache or the remote API.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Remote source unavailable at {url}: {reason}")]
    NotFound { url: String, reason: String },

    #[error("Malformed payload for '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: DecodeError,
    },

    #[error("No data available for '{0}'")]
    NoData(String),
}

/// A payload, or a participant's embedded tick list, could not be parsed.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("payload is not a valid record array: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("tick list of participant #{index} is not parsable: {source}")]
    TickList {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Aggregation was asked for something the loaded snapshot cannot answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("No tick lists loaded - the corpus is empty")]
    EmptyCorpus,

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Axis offset of {hours} hours is out of range")]
    InvalidOffset { hours: i64 },
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FetchError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(url: &str, status: reqwest::StatusCode, body: &str) -> Self {
        FetchError::NotFound {
            url: url.to_string(),
            reason: format!("Status {}: {}", status, Self::truncate_body(body)),
        }
    }

    pub fn unreachable(url: &str, err: &reqwest::Error) -> Self {
        FetchError::NotFound {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn malformed(key: &str, source: DecodeError) -> Self {
        FetchError::Malformed {
            key: key.to_string(),
            source,
        }
    }
}
