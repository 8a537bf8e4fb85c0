//! Retrieval of GeoJSON documents over HTTP or from disk.
//!
//! [`FeedClient`] wraps a reusable `reqwest::Client` built with an explicit
//! timeout. Every call takes its source explicitly; the client keeps no
//! default URL.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::FetchError;
use crate::geojson::FeatureCollection;

const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// Where a GeoJSON document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl FeedSource {
    pub fn describe(&self) -> String {
        match self {
            FeedSource::Url(url) => url.clone(),
            FeedSource::File(path) => path.display().to_string(),
        }
    }
}

impl FromStr for FeedSource {
    type Err = String;

    /// `http://` and `https://` strings are URLs, anything else is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_matches('"');
        if s.is_empty() {
            return Err("empty feed source".to_string());
        }
        let lower = s.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(FeedSource::Url(s.to_string()))
        } else {
            Ok(FeedSource::File(PathBuf::from(s)))
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Request {
                url: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { http, timeout })
    }

    /// Single GET of `url`, parsed as a GeoJSON FeatureCollection.
    pub async fn fetch(&self, url: &str) -> Result<FeatureCollection, FetchError> {
        let started = std::time::Instant::now();

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let collection = parse_collection(url, &bytes)?;

        tracing::debug!(
            url,
            features = collection.features.len(),
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Feed fetched"
        );
        Ok(collection)
    }

    /// Loads a document from either kind of source.
    pub async fn load(&self, source: &FeedSource) -> Result<FeatureCollection, FetchError> {
        match source {
            FeedSource::Url(url) => self.fetch(url).await,
            FeedSource::File(path) => {
                let name = path.display().to_string();
                let bytes = tokio::fs::read(path).await.map_err(|e| FetchError::Io {
                    path: name.clone(),
                    source: e,
                })?;
                let collection = parse_collection(&name, &bytes)?;
                tracing::debug!(
                    path = %name,
                    features = collection.features.len(),
                    "Local document loaded"
                );
                Ok(collection)
            }
        }
    }

    fn request_error(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                after: self.timeout,
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

fn parse_collection(source_name: &str, bytes: &[u8]) -> Result<FeatureCollection, FetchError> {
    let collection: FeatureCollection =
        serde_json::from_slice(bytes).map_err(|e| FetchError::Parse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    if !collection.is_feature_collection() {
        return Err(FetchError::Parse {
            source_name: source_name.to_string(),
            message: format!("expected a FeatureCollection, got '{}'", collection.kind),
        });
    }
    Ok(collection)
}
