//! Error types for loading feeds and validating earthquake features.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while retrieving a GeoJSON document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// No complete response arrived within the configured timeout.
    #[error("request to {url} timed out after {}s", .after.as_secs_f64())]
    Timeout { url: String, after: Duration },

    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body is not a GeoJSON FeatureCollection.
    #[error("invalid GeoJSON from {source_name}: {message}")]
    Parse { source_name: String, message: String },

    /// A local document could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Short machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Request { .. } => "request",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Status { .. } => "status",
            FetchError::Parse { .. } => "parse",
            FetchError::Io { .. } => "io",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// Why a single feature could not be turned into a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    MissingMagnitude,
    MissingPlace,
    MissingCoordinates,
    InvalidCoordinates,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            MalformedReason::MissingMagnitude => "missing or non-numeric magnitude",
            MalformedReason::MissingPlace => "missing place",
            MalformedReason::MissingCoordinates => "missing coordinates",
            MalformedReason::InvalidCoordinates => "coordinates out of range",
        };
        f.write_str(text)
    }
}

/// A feature rejected during validation. Only that feature is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("feature #{index} ({id}) is malformed: {reason}")]
pub struct MalformedFeature {
    pub index: usize,
    pub id: String,
    pub reason: MalformedReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_and_kind() {
        let err = FetchError::Timeout {
            url: "https://example.test/feed".to_string(),
            after: Duration::from_millis(1500),
        };
        assert!(err.is_timeout());
        assert_eq!(err.kind(), "timeout");
        assert_eq!(
            err.to_string(),
            "request to https://example.test/feed timed out after 1.5s"
        );
    }

    #[test]
    fn test_malformed_feature_message() {
        let err = MalformedFeature {
            index: 3,
            id: "us7000abcd".to_string(),
            reason: MalformedReason::MissingMagnitude,
        };
        assert_eq!(
            err.to_string(),
            "feature #3 (us7000abcd) is malformed: missing or non-numeric magnitude"
        );
    }
}
