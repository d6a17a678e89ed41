//! Error types for source fetches and whole runs.
//!
//! Per-source problems are [`FetchError`]s. They are logged, tallied in the
//! run summary and never abort the run. [`RunError`] is reserved for failures
//! that make continuing pointless, such as the output sink going away.

use std::fmt;
use thiserror::Error;

/// Why a single source failed to produce a listing.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure: DNS, refused connection, reset, TLS.
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-2xx status. The body is not decoded.
    #[error("bad status {status} from {url}")]
    BadStatus { url: String, status: u16 },

    /// The body was not a listing (malformed JSON or unexpected shape).
    #[error("failed to decode listing from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The fetch did not finish within the configured deadline.
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// The source id cannot be turned into a listing URL.
    #[error("invalid source id {source_id:?}")]
    InvalidSource { source_id: String },
}

/// Fieldless classification of a [`FetchError`], used for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Transport,
    BadStatus,
    Decode,
    Timeout,
    InvalidSource,
    /// The worker ended (panicked or was cancelled) without reporting.
    WorkerLost,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Transport { .. } => FetchErrorKind::Transport,
            FetchError::BadStatus { .. } => FetchErrorKind::BadStatus,
            FetchError::Decode { .. } => FetchErrorKind::Decode,
            FetchError::Timeout { .. } => FetchErrorKind::Timeout,
            FetchError::InvalidSource { .. } => FetchErrorKind::InvalidSource,
        }
    }

    /// Classify a `reqwest` error raised while sending or reading a body.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::Transport => "transport",
            FetchErrorKind::BadStatus => "bad_status",
            FetchErrorKind::Decode => "decode",
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::InvalidSource => "invalid_source",
            FetchErrorKind::WorkerLost => "worker_lost",
        };
        f.write_str(name)
    }
}

/// Failure of the run as a whole.
#[derive(Debug, Error)]
pub enum RunError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Writing to the output sink failed.
    #[error("failed to write output: {0}")]
    Sink(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let err = FetchError::BadStatus {
            url: "http://localhost/r/a.json".to_string(),
            status: 500,
        };
        assert_eq!(err.kind(), FetchErrorKind::BadStatus);
        assert_eq!(err.to_string(), "bad status 500 from http://localhost/r/a.json");

        let err = FetchError::InvalidSource {
            source_id: "../etc".to_string(),
        };
        assert_eq!(err.kind(), FetchErrorKind::InvalidSource);
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::Decode {
            url: "http://localhost/r/a.json".to_string(),
            source: json_err,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.kind().to_string(), "decode");
    }
}
