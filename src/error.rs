use crate::fetch::error::FetchError;
use crate::parser::error::ParseError;
use crate::types::resource_kind::ResourceKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Resource file '{0}' not found and no download was attempted")]
    NotFound(PathBuf),

    #[error(transparent)]
    Parse(ParseError),

    #[error(transparent)]
    Download(FetchError),

    #[error("No {kind} data available for {year} at ({lat}, {lon}): {reason}")]
    NotAvailable {
        kind: ResourceKind,
        lat: f64,
        lon: f64,
        year: i32,
        reason: String,
    },

    #[error("Cannot combine wind files for {target}m: need two heights, found {available:?}")]
    InsufficientData { target: f64, available: Vec<f64> },

    #[error("Invalid location ({lat}, {lon}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidLocation { lat: f64, lon: f64 },

    #[error("Invalid hub height {0}m: must be a positive number")]
    InvalidHubHeight(f64),

    #[error("Failed to determine resource cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to create resource directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),
}

impl From<ParseError> for ResourceError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::NotFound(path) => ResourceError::NotFound(path),
            other => ResourceError::Parse(other),
        }
    }
}

impl From<FetchError> for ResourceError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::NotAvailable {
                kind,
                lat,
                lon,
                year,
                reason,
            } => ResourceError::NotAvailable {
                kind,
                lat,
                lon,
                year,
                reason,
            },
            other => ResourceError::Download(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_not_available_are_lifted() {
        let err = ResourceError::from(ParseError::NotFound(PathBuf::from("a.csv")));
        assert!(matches!(err, ResourceError::NotFound(p) if p == PathBuf::from("a.csv")));

        let err = ResourceError::from(FetchError::NotAvailable {
            kind: ResourceKind::Wind,
            lat: 1.0,
            lon: 2.0,
            year: 2020,
            reason: "outside coverage".to_string(),
        });
        assert!(matches!(err, ResourceError::NotAvailable { year: 2020, .. }));
        assert_eq!(
            err.to_string(),
            "No wind data available for 2020 at (1, 2): outside coverage"
        );
    }

    #[test]
    fn test_other_errors_wrap() {
        let err = ResourceError::from(FetchError::MissingApiKey);
        assert!(matches!(err, ResourceError::Download(FetchError::MissingApiKey)));
        let err = ResourceError::from(ParseError::Empty(PathBuf::from("a.csv")));
        assert!(matches!(err, ResourceError::Parse(ParseError::Empty(_))));
    }
}
