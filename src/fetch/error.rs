use crate::types::resource_kind::ResourceKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No NREL API key configured (set NREL_API_KEY)")]
    MissingApiKey,

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("No {kind} data available for {year} at ({lat}, {lon}): {reason}")]
    NotAvailable {
        kind: ResourceKind,
        lat: f64,
        lon: f64,
        year: i32,
        reason: String,
    },

    #[error("Provider returned an unusable payload for {url}: {reason}")]
    UnexpectedPayload { url: String, reason: String },

    #[error("Failed to write downloaded resource to '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),
}
