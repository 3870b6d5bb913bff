use crate::combine::{heights_to_download, HeightCombiner};
use crate::error::ResourceError;
use crate::fetch::fetcher::FetchOutcome;
use crate::fetch::provider::{FetchRequest, ResourceProvider};
use crate::parser::parse_wind_file;
use crate::resource::{CoreOptions, Origin, RecordCore, ResourceRecord, ResourceState};
use crate::types::location::LatLon;
use crate::types::resource_kind::ResourceKind;
use crate::types::wind_data::WindData;
use bon::bon;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Wind resource for one location, year and turbine hub height (WIND Toolkit SRW).
///
/// Hub heights between two published heights resolve to a combined file of
/// both, built after downloading each of them.
pub struct WindResource {
    core: RecordCore<WindData>,
    hub_height: f64,
    heights: Vec<f64>,
}

#[bon]
impl WindResource {
    #[builder]
    pub fn new(
        lat: f64,
        lon: f64,
        year: i32,
        /// Turbine hub height in metres.
        hub_height: f64,
        #[builder(into)] filepath: Option<PathBuf>,
        #[builder(into)] path_resource: Option<PathBuf>,
        interval: Option<u32>,
        provider: Option<Arc<dyn ResourceProvider>>,
    ) -> Result<Self, ResourceError> {
        if !(hub_height.is_finite() && hub_height > 0.0) {
            return Err(ResourceError::InvalidHubHeight(hub_height));
        }
        let heights = heights_to_download(hub_height);
        let core = RecordCore::new(
            CoreOptions {
                kind: ResourceKind::Wind,
                location: LatLon(lat, lon),
                year,
                interval,
                filepath,
                path_resource,
                provider,
            },
            |naming| naming.wind_file_for(&heights),
        )?;
        Ok(Self {
            core,
            hub_height,
            heights,
        })
    }

    pub fn hub_height(&self) -> f64 {
        self.hub_height
    }

    /// Published heights this record downloads: one, or the pair around the hub.
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Builds the combined file from per-height files already in the resource
    /// directory, without downloading.
    ///
    /// For a hub height that needs a single file this only reports whether that
    /// file exists. Otherwise a local file at exactly the hub height is read as
    /// is; failing that, two heights are picked from what is on disk and the
    /// combined file is (re)written. Either way any loaded data is dropped.
    pub fn combine_wind_files(&mut self) -> Result<bool, ResourceError> {
        if self.core.origin == Origin::Supplied {
            warn!(
                "Not combining into supplied file {:?}",
                self.core.filename
            );
            return Ok(self.core.filename.is_file());
        }
        if self.heights.len() < 2 {
            return Ok(self.core.filename.is_file());
        }

        let source = HeightCombiner::new(self.core.naming.clone()).combine(self.hub_height)?;
        if source.path() != self.core.filename {
            info!(
                "Hub height {}m now reads {:?}",
                self.hub_height,
                source.path()
            );
            self.core.filename = source.path().to_path_buf();
        }
        self.core.data = None;
        Ok(true)
    }

    fn fetch(&self, force_refresh: bool) -> Result<bool, ResourceError> {
        if !force_refresh && self.core.filename.is_file() {
            info!("Cache hit for wind data at {:?}", self.core.filename);
            return Ok(false);
        }
        self.core.ensure_resource_dir()?;

        let naming = &self.core.naming;
        let mut downloaded = false;
        for &height in &self.heights {
            let request =
                FetchRequest::wind(naming.location, naming.year, naming.interval, height);
            let outcome =
                self.core
                    .fetcher
                    .fetch_to(&request, &naming.wind_file(height), force_refresh)?;
            downloaded |= outcome == FetchOutcome::Downloaded;
        }
        if let [lower, upper] = self.heights[..] {
            HeightCombiner::new(naming.clone()).combine_heights(lower, upper)?;
            downloaded = true;
        }
        Ok(downloaded)
    }

    fn load(&self) -> Result<WindData, ResourceError> {
        if !self.core.filename.is_file() {
            self.core.require_downloadable()?;
            self.fetch(false)?;
        }
        let data = parse_wind_file(&self.core.filename)?;
        info!(
            "Loaded {} wind timesteps at heights {:?} from {:?}",
            data.len(),
            data.distinct_heights(),
            self.core.filename
        );
        Ok(data)
    }
}

impl ResourceRecord for WindResource {
    type Data = WindData;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Wind
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

    fn cached_data(&self) -> Option<&WindData> {
        self.core.data.as_ref()
    }

    fn data(&mut self) -> Result<&WindData, ResourceError> {
        let data = match self.core.data.take() {
            Some(data) => data,
            None => self.load()?,
        };
        let data: &WindData = self.core.data.insert(data);
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
            .finish_download(fetched, |path| Ok(parse_wind_file(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::error::FetchError;
    use crate::fetch::fetcher::mock::MockProvider;
    use crate::parser::test_files::wind_file;
    use crate::resource::scenario::{srw, GOLDEN};
    use crate::types::wind_data::WindField;

    fn provider() -> Arc<MockProvider> {
        Arc::new(
            MockProvider::default()
                .add_wind(60.0, srw(60, &[6.0, 6.5, 7.0]))
                .add_wind(80.0, srw(80, &[7.0, 7.5, 8.0])),
        )
    }

    fn record(dir: &Path, hub_height: f64, provider: Arc<MockProvider>) -> WindResource {
        WindResource::builder()
            .lat(GOLDEN.location.lat())
            .lon(GOLDEN.location.lon())
            .year(GOLDEN.year)
            .hub_height(hub_height)
            .path_resource(dir)
            .provider(provider)
            .build()
            .unwrap()
    }

    #[test]
    fn test_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let exact = record(dir.path(), GOLDEN.hub_height, provider());
        assert_eq!(exact.heights(), &[80.0]);
        assert_eq!(
            exact.filename(),
            dir.path()
                .join("39.7555_-105.2211_windtoolkit_2012_60min_80m.srw")
        );

        let between = record(dir.path(), 70.0, provider());
        assert_eq!(between.heights(), &[60.0, 80.0]);
        assert_eq!(
            between.filename(),
            dir.path()
                .join("39.7555_-105.2211_windtoolkit_2012_60min_60m_80m.srw")
        );
    }

    #[test]
    fn test_single_height_download() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider();
        let mut resource = record(dir.path(), 80.0, provider.clone());

        assert!(resource.download_resource(false).unwrap());
        assert_eq!(provider.calls(), 1);
        let data = resource.cached_data().unwrap();
        assert_eq!(data.distinct_heights(), vec![80.0]);
        assert_eq!(data.column(WindField::Speed, 80.0), Some(vec![7.0, 7.5, 8.0]));
    }

    #[test]
    fn test_lazy_load_combines_two_heights() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider();
        let mut resource = record(dir.path(), 70.0, provider.clone());

        let data = resource.data().unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.column_count(), 8);
        assert_eq!(data.distinct_heights(), vec![60.0, 80.0]);
        assert_eq!(provider.calls(), 2);
        assert!(resource.filename().is_file());
        let naming = &resource.core.naming;
        assert!(naming.wind_file(60.0).is_file());
        assert!(naming.wind_file(80.0).is_file());

        // cached combined file: no further downloads
        assert!(resource.download_resource(false).unwrap());
        assert_eq!(provider.calls(), 2);

        assert!(resource.download_resource(true).unwrap());
        assert_eq!(provider.calls(), 4);
        assert_eq!(resource.state(), ResourceState::Ready);
    }

    #[test]
    fn test_missing_height_fails_without_combined_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockProvider::default().add_wind(60.0, srw(60, &[6.0])));
        let mut resource = record(dir.path(), 70.0, provider);

        let err = resource.download_resource(false).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Download(FetchError::UnexpectedPayload { .. })
        ));
        assert!(!resource.filename().exists());
    }

    #[test]
    fn test_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut resource = record(dir.path(), 70.0, Arc::new(MockProvider::unavailable()));
        assert!(!resource.download_resource(false).unwrap());
        assert_eq!(resource.state(), ResourceState::PathSet);
    }

    #[test]
    fn test_combine_wind_files_from_local_heights() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider();
        let mut resource = record(dir.path(), 70.0, provider.clone());
        let naming = resource.core.naming.clone();
        std::fs::write(naming.wind_file(60.0), srw(60, &[6.0, 6.5])).unwrap();
        std::fs::write(naming.wind_file(80.0), srw(80, &[7.0, 7.5])).unwrap();

        assert!(resource.combine_wind_files().unwrap());
        assert!(resource.filename().is_file());
        assert_eq!(resource.state(), ResourceState::PathSet);
        assert_eq!(resource.data().unwrap().len(), 2);
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn test_combine_wind_files_uses_what_is_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut resource = record(dir.path(), 70.0, provider());
        let naming = resource.core.naming.clone();
        std::fs::write(naming.wind_file(40.0), srw(40, &[5.0])).unwrap();
        std::fs::write(naming.wind_file(100.0), srw(100, &[9.0])).unwrap();

        assert!(resource.combine_wind_files().unwrap());
        assert_eq!(resource.filename(), naming.combined_wind_file(40.0, 100.0));
    }

    #[test]
    fn test_combine_wind_files_prefers_exact_height() {
        let dir = tempfile::tempdir().unwrap();
        let mut resource = record(dir.path(), 70.0, provider());
        let naming = resource.core.naming.clone();
        std::fs::write(naming.wind_file(60.0), srw(60, &[6.0, 6.5])).unwrap();
        std::fs::write(naming.wind_file(70.0), srw(70, &[6.6, 7.1])).unwrap();
        std::fs::write(naming.wind_file(80.0), srw(80, &[7.0, 7.5])).unwrap();

        assert!(resource.combine_wind_files().unwrap());
        assert_eq!(resource.filename(), naming.wind_file(70.0));
        assert!(!naming.combined_wind_file(60.0, 80.0).exists());
        assert_eq!(resource.state(), ResourceState::PathSet);
        let data = resource.data().unwrap();
        assert_eq!(data.distinct_heights(), vec![70.0]);
        assert_eq!(data.column(WindField::Speed, 70.0), Some(vec![6.6, 7.1]));
    }

    #[test]
    fn test_combine_wind_files_needs_two_heights() {
        let dir = tempfile::tempdir().unwrap();
        let mut resource = record(dir.path(), 70.0, provider());
        std::fs::write(resource.core.naming.wind_file(60.0), srw(60, &[6.0])).unwrap();

        assert!(matches!(
            resource.combine_wind_files(),
            Err(ResourceError::InsufficientData { .. })
        ));

        let mut single = record(dir.path(), 80.0, provider());
        assert!(!single.combine_wind_files().unwrap());
    }

    #[test]
    fn test_supplied_file() {
        let provider = provider();
        let mut resource = WindResource::builder()
            .lat(35.2018863)
            .lon(-101.945027)
            .year(2012)
            .hub_height(80.0)
            .filepath(wind_file())
            .provider(provider.clone())
            .build()
            .unwrap();

        assert_eq!(resource.filename(), wind_file());
        assert_eq!(resource.data().unwrap().len(), 24);
        assert!(resource.download_resource(true).unwrap());
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn test_invalid_hub_height() {
        for hub_height in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = WindResource::builder()
                .lat(39.7555)
                .lon(-105.2211)
                .year(2012)
                .hub_height(hub_height)
                .provider(provider())
                .build();
            assert!(matches!(result, Err(ResourceError::InvalidHubHeight(_))));
        }
    }
}
