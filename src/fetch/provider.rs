use crate::fetch::error::FetchError;
use crate::types::location::LatLon;
use crate::types::resource_kind::ResourceKind;

/// One dataset download: a location, a year and, for wind, a height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    pub kind: ResourceKind,
    pub location: LatLon,
    pub year: i32,
    /// Timestep in minutes.
    pub interval: u32,
    /// Measurement height in metres (wind only).
    pub height: Option<f64>,
}

impl FetchRequest {
    pub fn solar(location: LatLon, year: i32, interval: u32) -> Self {
        Self {
            kind: ResourceKind::Solar,
            location,
            year,
            interval,
            height: None,
        }
    }

    pub fn wind(location: LatLon, year: i32, interval: u32, height: f64) -> Self {
        Self {
            kind: ResourceKind::Wind,
            location,
            year,
            interval,
            height: Some(height),
        }
    }

    /// Error for a request the provider has no data for.
    pub fn not_available(&self, reason: impl Into<String>) -> FetchError {
        FetchError::NotAvailable {
            kind: self.kind,
            lat: self.location.0,
            lon: self.location.1,
            year: self.year,
            reason: reason.into(),
        }
    }
}

/// A source of raw resource files.
///
/// Implementations return the complete file content; persisting it is the
/// caller's job (see [`crate::ResourceFetcher`]).
pub trait ResourceProvider: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError>;
}
