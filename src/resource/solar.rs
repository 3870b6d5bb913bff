use crate::error::ResourceError;
use crate::fetch::fetcher::FetchOutcome;
use crate::fetch::provider::{FetchRequest, ResourceProvider};
use crate::parser::parse_solar_file;
use crate::resource::{CoreOptions, Origin, RecordCore, ResourceRecord, ResourceState};
use crate::types::location::LatLon;
use crate::types::resource_kind::ResourceKind;
use crate::types::solar_data::SolarData;
use bon::bon;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Solar irradiance and weather for one location and year (NSRDB PSM v3).
///
/// ```no_run
/// use nrel_resource::{ResourceRecord, SolarResource};
///
/// # fn main() -> Result<(), nrel_resource::ResourceError> {
/// let mut resource = SolarResource::builder()
///     .lat(39.7555)
///     .lon(-105.2211)
///     .year(2012)
///     .build()?;
/// let ghi_peak = resource.data()?.gh.iter().cloned().fold(0.0, f64::max);
/// println!("{} peaks at {ghi_peak} W/m2", resource.filename().display());
/// # Ok(())
/// # }
/// ```
pub struct SolarResource {
    core: RecordCore<SolarData>,
}

#[bon]
impl SolarResource {
    #[builder]
    pub fn new(
        lat: f64,
        lon: f64,
        year: i32,
        /// Read this file instead of the cache; it is never downloaded.
        #[builder(into)]
        filepath: Option<PathBuf>,
        /// Directory for cached downloads.
        #[builder(into)]
        path_resource: Option<PathBuf>,
        /// Minutes between timesteps, 60 when unset.
        interval: Option<u32>,
        /// Data source; an [`crate::NrelClient`] configured from the environment when unset.
        provider: Option<Arc<dyn ResourceProvider>>,
    ) -> Result<Self, ResourceError> {
        let core = RecordCore::new(
            CoreOptions {
                kind: ResourceKind::Solar,
                location: LatLon(lat, lon),
                year,
                interval,
                filepath,
                path_resource,
                provider,
            },
            |naming| naming.solar_file(),
        )?;
        Ok(Self { core })
    }

    fn fetch(&self, force_refresh: bool) -> Result<bool, ResourceError> {
        self.core.ensure_resource_dir()?;
        let naming = &self.core.naming;
        let request = FetchRequest::solar(naming.location, naming.year, naming.interval);
        let outcome = self
            .core
            .fetcher
            .fetch_to(&request, &self.core.filename, force_refresh)?;
        Ok(outcome == FetchOutcome::Downloaded)
    }

    fn load(&self) -> Result<SolarData, ResourceError> {
        if !self.core.filename.is_file() {
            self.core.require_downloadable()?;
            self.fetch(false)?;
        }
        let data = parse_solar_file(&self.core.filename)?;
        info!(
            "Loaded {} solar timesteps from {:?}",
            data.len(),
            self.core.filename
        );
        Ok(data)
    }
}

impl ResourceRecord for SolarResource {
    type Data = SolarData;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Solar
    }

    fn location(&self) -> LatLon {
        self.core.location()
    }

    fn year(&self) -> i32 {
        self.core.year()
    }

    fn filename(&self) -> &Path {
        &self.core.filename
    }

    fn state(&self) -> ResourceState {
        self.core.state()
    }

    fn cached_data(&self) -> Option<&SolarData> {
        self.core.data.as_ref()
    }

    fn data(&mut self) -> Result<&SolarData, ResourceError> {
        let data = match self.core.data.take() {
            Some(data) => data,
            None => self.load()?,
        };
        let data: &SolarData = self.core.data.insert(data);
        Ok(data)
    }

    fn download_resource(&mut self, force_refresh: bool) -> Result<bool, ResourceError> {
        if self.core.origin == Origin::Supplied {
            return Ok(self.core.filename.is_file());
        }
        if force_refresh {
            self.core.data = None;
        }
        let fetched = self.fetch(force_refresh);
        self.core
            .finish_download(fetched, |path| Ok(parse_solar_file(path)?))
    }
}
