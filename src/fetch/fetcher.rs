use crate::fetch::error::FetchError;
use crate::fetch::provider::{FetchRequest, ResourceProvider};
use crate::utils::write_atomically;
use log::{info, warn};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// What [`ResourceFetcher::fetch_to`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file already existed and was left untouched.
    CacheHit,
    /// The file was (re-)downloaded.
    Downloaded,
}

/// Persists provider downloads at their cache paths.
#[derive(Clone)]
pub struct ResourceFetcher {
    provider: Arc<dyn ResourceProvider>,
}

impl ResourceFetcher {
    pub fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn ResourceProvider> {
        &self.provider
    }

    /// Makes sure the resource for `request` exists at `path`.
    ///
    /// An existing file is reused unless `force_refresh` is set. The payload is
    /// written to a temporary file next to `path` and renamed into place, so a
    /// failed download never leaves a file at `path`.
    pub fn fetch_to(
        &self,
        request: &FetchRequest,
        path: &Path,
        force_refresh: bool,
    ) -> Result<FetchOutcome, FetchError> {
        if !force_refresh && path.is_file() {
            info!(
                "Cache hit for {} data at {:?}",
                request.kind,
                path
            );
            return Ok(FetchOutcome::CacheHit);
        }
        if !force_refresh {
            warn!(
                "Cache miss for {} data at {}. Downloading from {}.",
                request.kind,
                request.location,
                self.provider.name()
            );
        }

        let bytes = self.provider.fetch(request)?;
        write_atomically(path, |file| file.write_all(&bytes))
            .map_err(|e| FetchError::CacheWrite(path.to_path_buf(), e))?;
        info!(
            "Cached {} bytes of {} data to {:?}",
            bytes.len(),
            request.kind,
            path
        );
        Ok(FetchOutcome::Downloaded)
    }
}
