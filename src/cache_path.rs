//! Canonical file names for cached resource files.
//!
//! Names only depend on the query, so repeated requests for the same location,
//! year, interval and height always resolve to the same file. Coordinates are
//! rounded to 4 decimals and all numbers are printed with `Display`, so `80.0`
//! becomes `80`.

use crate::types::location::LatLon;
use crate::types::resource_kind::ResourceKind;
use std::path::{Path, PathBuf};

const COORDINATE_SCALE: f64 = 10_000.0;

fn coordinate(value: f64) -> String {
    let rounded = (value * COORDINATE_SCALE).round() / COORDINATE_SCALE;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    rounded.to_string()
}

/// Naming scheme for one (location, year, interval) query in one directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheNaming {
    pub dir: PathBuf,
    pub location: LatLon,
    pub year: i32,
    pub interval: u32,
}

impl CacheNaming {
    pub fn new(dir: impl Into<PathBuf>, location: LatLon, year: i32, interval: u32) -> Self {
        Self {
            dir: dir.into(),
            location,
            year,
            interval,
        }
    }

    fn prefix(&self, kind: ResourceKind) -> String {
        format!(
            "{}_{}_{}",
            coordinate(self.location.0),
            coordinate(self.location.1),
            kind.dataset()
        )
    }

    /// `{lat}_{lon}_psmv3_{interval}_{year}.csv`
    pub fn solar_file(&self) -> PathBuf {
        let kind = ResourceKind::Solar;
        self.dir.join(format!(
            "{}_{}_{}.{}",
            self.prefix(kind),
            self.interval,
            self.year,
            kind.extension()
        ))
    }

    fn wind_stem(&self) -> String {
        format!(
            "{}_{}_{}min_",
            self.prefix(ResourceKind::Wind),
            self.year,
            self.interval
        )
    }

    /// `{lat}_{lon}_windtoolkit_{year}_{interval}min_{h}m.srw`
    pub fn wind_file(&self, height: f64) -> PathBuf {
        self.dir.join(format!(
            "{}{}m.{}",
            self.wind_stem(),
            height,
            ResourceKind::Wind.extension()
        ))
    }

    /// `{lat}_{lon}_windtoolkit_{year}_{interval}min_{h1}m_{h2}m.srw`
    pub fn combined_wind_file(&self, lower: f64, upper: f64) -> PathBuf {
        self.dir.join(format!(
            "{}{}m_{}m.{}",
            self.wind_stem(),
            lower,
            upper,
            ResourceKind::Wind.extension()
        ))
    }

    /// File name for a set of heights: single-height or combined.
    pub fn wind_file_for(&self, heights: &[f64]) -> PathBuf {
        match heights {
            [lower, upper, ..] => self.combined_wind_file(*lower, *upper),
            [height] => self.wind_file(*height),
            [] => self.wind_file(0.0),
        }
    }

    /// Height encoded in a single-height wind file name of this query, if `path` is one.
    pub fn height_of(&self, path: &Path) -> Option<f64> {
        let name = path.file_name()?.to_str()?;
        let suffix = format!("m.{}", ResourceKind::Wind.extension());
        let height = name
            .strip_prefix(&self.wind_stem())?
            .strip_suffix(&suffix)?;
        height.parse().ok().filter(|h: &f64| h.is_finite())
    }
}
