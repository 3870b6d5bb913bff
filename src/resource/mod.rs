//! The record façade: one location/year(/height) query, its resolved file and
//! its lazily parsed data.

pub mod solar;
pub mod wind;

use crate::cache_path::CacheNaming;
use crate::error::ResourceError;
use crate::fetch::fetcher::ResourceFetcher;
use crate::fetch::nrel::NrelClient;
use crate::fetch::provider::ResourceProvider;
use crate::types::location::LatLon;
use crate::types::resource_kind::ResourceKind;
use crate::utils::{discard_file, ensure_dir_exists, get_cache_dir};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default timestep of downloaded data, in minutes.
pub const DEFAULT_INTERVAL: u32 = 60;

/// Where a record is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// `filename` is resolved; the file may not exist yet.
    PathSet,
    /// Data is parsed and held in memory.
    Ready,
}

/// Behaviour shared by [`crate::SolarResource`] and [`crate::WindResource`].
pub trait ResourceRecord {
    type Data;

    fn kind(&self) -> ResourceKind;

    fn location(&self) -> LatLon;

    fn year(&self) -> i32;

    /// Path of the resource file, which may not have been downloaded yet.
    fn filename(&self) -> &Path;

    fn state(&self) -> ResourceState;

    /// Parsed data if already loaded; never touches the disk.
    fn cached_data(&self) -> Option<&Self::Data>;

    /// Loads on first use: downloads a missing cache file, parses it and keeps
    /// the result. Later calls return the kept data.
    fn data(&mut self) -> Result<&Self::Data, ResourceError>;

    /// Same as [`ResourceRecord::data`], discarding the reference.
    fn ensure_loaded(&mut self) -> Result<(), ResourceError> {
        self.data().map(|_| ())
    }

    /// Downloads the resource file unless it is already cached (or always, with
    /// `force_refresh`), then checks that it parses.
    ///
    /// Returns `Ok(false)` when the provider has no data for this query, and an
    /// error for transport or parse failures.
    fn download_resource(&mut self, force_refresh: bool) -> Result<bool, ResourceError>;
}

/// How `filename` was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// Supplied by the caller; never downloaded or overwritten.
    Supplied,
    /// Canonical cache path; downloaded when missing.
    Cache,
}

/// State common to both record kinds.
pub(crate) struct RecordCore<T> {
    pub kind: ResourceKind,
    pub naming: CacheNaming,
    pub filename: PathBuf,
    pub origin: Origin,
    pub fetcher: ResourceFetcher,
    pub data: Option<T>,
}

pub(crate) struct CoreOptions {
    pub kind: ResourceKind,
    pub location: LatLon,
    pub year: i32,
    pub interval: Option<u32>,
    pub filepath: Option<PathBuf>,
    pub path_resource: Option<PathBuf>,
    pub provider: Option<Arc<dyn ResourceProvider>>,
}

impl<T> RecordCore<T> {
    /// Validates the query and resolves the resource directory. The system
    /// cache dir is only consulted when neither `filepath` nor `path_resource`
    /// is given. `canonical` names the file from the resolved `naming`.
    pub fn new(
        options: CoreOptions,
        canonical: impl FnOnce(&CacheNaming) -> PathBuf,
    ) -> Result<Self, ResourceError> {
        let CoreOptions {
            kind,
            location,
            year,
            interval,
            filepath,
            path_resource,
            provider,
        } = options;
        if !location.is_valid() {
            return Err(ResourceError::InvalidLocation {
                lat: location.0,
                lon: location.1,
            });
        }

        // a supplied file is never downloaded, so its own directory stands in
        // for the cache
        let dir = match (path_resource, &filepath) {
            (Some(dir), _) => dir,
            (None, Some(path)) => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            (None, None) => get_cache_dir()
                .map_err(ResourceError::CacheDirResolution)?
                .join(kind.path_segment()),
        };
        let naming = CacheNaming::new(dir, location, year, interval.unwrap_or(DEFAULT_INTERVAL));
        let (filename, origin) = match filepath {
            Some(path) => (path, Origin::Supplied),
            None => (canonical(&naming), Origin::Cache),
        };
        let provider = match provider {
            Some(provider) => provider,
            None => Arc::new(NrelClient::from_env()?),
        };

        Ok(Self {
            kind,
            naming,
            filename,
            origin,
            fetcher: ResourceFetcher::new(provider),
            data: None,
        })
    }

    pub fn state(&self) -> ResourceState {
        match self.data {
            Some(_) => ResourceState::Ready,
            None => ResourceState::PathSet,
        }
    }

    pub fn location(&self) -> LatLon {
        self.naming.location
    }

    pub fn year(&self) -> i32 {
        self.naming.year
    }

    /// Fails with `NotFound` when the file is missing and may not be downloaded.
    pub fn require_downloadable(&self) -> Result<(), ResourceError> {
        if self.origin == Origin::Supplied && !self.filename.is_file() {
            return Err(ResourceError::NotFound(self.filename.clone()));
        }
        Ok(())
    }

    pub fn ensure_resource_dir(&self) -> Result<(), ResourceError> {
        ensure_dir_exists(&self.naming.dir)
            .map_err(|e| ResourceError::CacheDirCreation(self.naming.dir.clone(), e))
    }

    /// Shared tail of `download_resource`: maps "no data" to `Ok(false)`,
    /// drops stale data after a download, and checks the file parses.
    pub fn finish_download(
        &mut self,
        fetched: Result<bool, ResourceError>,
        parse: impl FnOnce(&Path) -> Result<T, ResourceError>,
    ) -> Result<bool, ResourceError> {
        let downloaded = match fetched {
            Ok(downloaded) => downloaded,
            Err(ResourceError::NotAvailable { reason, .. }) => {
                warn!(
                    "No {} data for {} in {}: {}",
                    self.kind,
                    self.location(),
                    self.year(),
                    reason
                );
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        if downloaded || self.data.is_none() {
            self.data = None;
            match parse(&self.filename) {
                Ok(data) => self.data = Some(data),
                Err(e) => {
                    if downloaded {
                        warn!(
                            "Removing unparseable download {:?}: {}",
                            self.filename, e
                        );
                        discard_file(&self.filename);
                    }
                    return Err(e);
                }
            }
        }
        Ok(true)
    }
}
