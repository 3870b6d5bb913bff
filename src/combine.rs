//! Building a multi-height wind file around a turbine hub height.
//!
//! The WIND Toolkit publishes SRW files at fixed heights. When the hub height
//! falls between two of them, the two files are merged column-wise into one
//! combined SRW file that simulation engines can interpolate within.

use crate::cache_path::CacheNaming;
use crate::error::ResourceError;
use crate::parser::error::ParseError;
use crate::parser::{parse_wind_file, write_wind_file};
use crate::types::wind_data::WindData;
use log::{debug, info};
use ordered_float::OrderedFloat;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Heights (m) the WIND Toolkit publishes SRW files for.
pub const WTK_HEIGHTS: [f64; 9] = [10.0, 40.0, 60.0, 80.0, 100.0, 120.0, 140.0, 160.0, 200.0];

/// Heights to request from the WIND Toolkit for a hub height: the exact height
/// when published, the nearest published height outside the published range,
/// and the bracketing pair otherwise.
pub fn heights_to_download(hub_height: f64) -> Vec<f64> {
    let lowest = WTK_HEIGHTS[0];
    let highest = WTK_HEIGHTS[WTK_HEIGHTS.len() - 1];
    if WTK_HEIGHTS.contains(&hub_height) {
        return vec![hub_height];
    }
    if hub_height < lowest {
        return vec![lowest];
    }
    if hub_height > highest {
        return vec![highest];
    }
    let lower = WTK_HEIGHTS
        .iter()
        .copied()
        .filter(|h| *h < hub_height)
        .fold(lowest, f64::max);
    let upper = WTK_HEIGHTS
        .iter()
        .copied()
        .filter(|h| *h > hub_height)
        .fold(highest, f64::min);
    vec![lower, upper]
}

/// Picks two of `available` heights to combine for `target`. An available
/// height equal to `target` needs no combining; [`HeightCombiner::combine`]
/// checks for it first.
///
/// Prefers the nearest height strictly below and the nearest strictly above.
/// Without one of those, the two heights closest to `target` are used, ties
/// going to the lower height. The result is ascending.
pub fn select_heights(available: &[f64], target: f64) -> Result<(f64, f64), ResourceError> {
    let distinct: Vec<f64> = available
        .iter()
        .copied()
        .filter(|h| h.is_finite())
        .map(OrderedFloat)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(OrderedFloat::into_inner)
        .collect();
    let insufficient = || ResourceError::InsufficientData {
        target,
        available: distinct.clone(),
    };
    if distinct.len() < 2 {
        return Err(insufficient());
    }

    let below = distinct.iter().copied().filter(|h| *h < target).last();
    let above = distinct.iter().copied().find(|h| *h > target);
    if let (Some(lower), Some(upper)) = (below, above) {
        return Ok((lower, upper));
    }

    let mut by_distance = distinct.clone();
    by_distance.sort_by_key(|h| (OrderedFloat((h - target).abs()), OrderedFloat(*h)));
    match by_distance[..] {
        [a, b, ..] => Ok((a.min(b), a.max(b))),
        _ => Err(insufficient()),
    }
}

/// Result of a successful combination.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedFile {
    pub path: PathBuf,
    pub heights: (f64, f64),
    pub data: WindData,
}

/// The file to read for a target height.
#[derive(Debug, Clone, PartialEq)]
pub enum HeightSource {
    /// A per-height file at exactly the target height; nothing was written.
    Exact(PathBuf),
    Combined(CombinedFile),
}

impl HeightSource {
    pub fn path(&self) -> &Path {
        match self {
            HeightSource::Exact(path) => path,
            HeightSource::Combined(combined) => &combined.path,
        }
    }
}

/// Merges per-height SRW files found in one resource directory.
#[derive(Debug, Clone)]
pub struct HeightCombiner {
    naming: CacheNaming,
}

impl HeightCombiner {
    pub fn new(naming: CacheNaming) -> Self {
        Self { naming }
    }

    /// Heights of the single-height files of this query present on disk, ascending.
    pub fn available_heights(&self) -> Result<Vec<f64>, ResourceError> {
        let entries = match std::fs::read_dir(&self.naming.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ParseError::Read(self.naming.dir.clone(), e).into());
            }
        };
        let mut heights: Vec<f64> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| self.naming.height_of(&path))
            .collect();
        heights.sort_by_key(|h| OrderedFloat(*h));
        heights.dedup();
        Ok(heights)
    }

    /// Resolves `target` against the local files: a file at exactly `target`
    /// is used as is, otherwise the two selected heights are combined into the
    /// canonical combined file, overwriting it if present.
    pub fn combine(&self, target: f64) -> Result<HeightSource, ResourceError> {
        let available = self.available_heights()?;
        if available.contains(&target) {
            debug!("Local file at {}m matches the target, not combining", target);
            return Ok(HeightSource::Exact(self.naming.wind_file(target)));
        }
        let (lower, upper) = select_heights(&available, target)?;
        debug!(
            "Selected heights {} and {} from {:?} for target {}",
            lower, upper, available, target
        );
        self.combine_heights(lower, upper).map(HeightSource::Combined)
    }

    /// Combines the local files at exactly `lower` and `upper`.
    pub fn combine_heights(&self, lower: f64, upper: f64) -> Result<CombinedFile, ResourceError> {
        let lower_path = self.naming.wind_file(lower);
        let upper_path = self.naming.wind_file(upper);
        let lower_data = parse_wind_file(&lower_path)?;
        let upper_data = parse_wind_file(&upper_path)?;

        let path = self.naming.combined_wind_file(lower, upper);
        let data = merge(lower_data, upper_data).map_err(|(expected, found)| {
            ParseError::LengthMismatch {
                path: upper_path.clone(),
                what: format!("row count relative to {}", lower_path.display()),
                expected,
                found,
            }
        })?;
        write_wind_file(&path, &data)?;
        info!(
            "Combined wind heights {}m and {}m into {:?} ({} timesteps)",
            lower,
            upper,
            path,
            data.len()
        );
        Ok(CombinedFile {
            path,
            heights: (lower, upper),
            data,
        })
    }
}

/// Concatenates columns; fails with (expected, found) row counts on mismatch.
fn merge(mut lower: WindData, upper: WindData) -> Result<WindData, (usize, usize)> {
    if lower.len() != upper.len() {
        return Err((lower.len(), upper.len()));
    }
    lower.heights.extend(upper.heights);
    lower.fields.extend(upper.fields);
    lower.header.units.extend(upper.header.units);
    for (row, extra) in lower.data.iter_mut().zip(upper.data) {
        row.extend(extra);
    }
    let records = lower.len();
    lower.header.set_declared_records(records);
    Ok(lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::scenario::srw;
    use crate::types::location::LatLon;
    use crate::types::wind_data::WindField;
    use std::path::Path;

    fn naming(dir: &Path) -> CacheNaming {
        CacheNaming::new(dir, LatLon(39.7555, -105.2211), 2012, 60)
    }

    #[test]
    fn test_heights_to_download() {
        assert_eq!(heights_to_download(80.0), vec![80.0]);
        assert_eq!(heights_to_download(70.0), vec![60.0, 80.0]);
        assert_eq!(heights_to_download(110.0), vec![100.0, 120.0]);
        assert_eq!(heights_to_download(5.0), vec![10.0]);
        assert_eq!(heights_to_download(250.0), vec![200.0]);
    }

    #[test]
    fn test_select_bracketing_heights() {
        let available = [10.0, 60.0, 80.0, 100.0];
        assert_eq!(select_heights(&available, 70.0).unwrap(), (60.0, 80.0));
        assert_eq!(select_heights(&available, 99.0).unwrap(), (80.0, 100.0));
    }

    #[test]
    fn test_select_without_bracket_uses_nearest() {
        assert_eq!(select_heights(&[60.0, 80.0, 100.0], 120.0).unwrap(), (80.0, 100.0));
        assert_eq!(select_heights(&[60.0, 80.0, 100.0], 40.0).unwrap(), (60.0, 80.0));
    }

    #[test]
    fn test_select_needs_two_heights() {
        assert!(matches!(
            select_heights(&[80.0, 80.0], 70.0),
            Err(ResourceError::InsufficientData { .. })
        ));
        assert!(matches!(
            select_heights(&[], 70.0),
            Err(ResourceError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_combine_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let naming = naming(dir.path());
        std::fs::write(naming.wind_file(60.0), srw(60, &[6.0, 6.5, 7.0])).unwrap();
        std::fs::write(naming.wind_file(80.0), srw(80, &[7.0, 7.5, 8.0])).unwrap();
        std::fs::write(naming.wind_file(140.0), srw(140, &[9.0, 9.5, 10.0])).unwrap();
        let combiner = HeightCombiner::new(naming.clone());

        assert_eq!(combiner.available_heights().unwrap(), vec![60.0, 80.0, 140.0]);
        let HeightSource::Combined(combined) = combiner.combine(70.0).unwrap() else {
            panic!("expected a combined file");
        };

        assert_eq!(combined.path, naming.combined_wind_file(60.0, 80.0));
        assert_eq!(combined.heights, (60.0, 80.0));
        let reparsed = parse_wind_file(&combined.path).unwrap();
        assert_eq!(reparsed, combined.data);
        assert_eq!(reparsed.len(), 3);
        assert_eq!(reparsed.distinct_heights(), vec![60.0, 80.0]);
        assert_eq!(reparsed.column(WindField::Speed, 60.0), Some(vec![6.0, 6.5, 7.0]));
        assert_eq!(reparsed.column(WindField::Speed, 80.0), Some(vec![7.0, 7.5, 8.0]));
        assert_eq!(reparsed.header.declared_records(), Some(3));
    }

    #[test]
    fn test_combine_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let naming = naming(dir.path());
        std::fs::write(naming.wind_file(60.0), srw(60, &[6.0, 6.5])).unwrap();
        std::fs::write(naming.wind_file(80.0), srw(80, &[7.0, 7.5])).unwrap();
        let combiner = HeightCombiner::new(naming);

        let first = combiner.combine(70.0).unwrap();
        let first_bytes = std::fs::read(first.path()).unwrap();
        let second = combiner.combine(70.0).unwrap();

        assert_eq!(second.path(), first.path());
        assert_eq!(std::fs::read(second.path()).unwrap(), first_bytes);
        // the combined file is not mistaken for a per-height file
        assert_eq!(combiner.available_heights().unwrap(), vec![60.0, 80.0]);
    }

    #[test]
    fn test_exact_local_height_is_not_combined() {
        let dir = tempfile::tempdir().unwrap();
        let naming = naming(dir.path());
        for height in [60, 70, 80] {
            std::fs::write(naming.wind_file(height as f64), srw(height, &[6.0, 6.5])).unwrap();
        }
        let combiner = HeightCombiner::new(naming.clone());

        assert_eq!(
            combiner.combine(70.0).unwrap(),
            HeightSource::Exact(naming.wind_file(70.0))
        );
        assert!(!naming.combined_wind_file(60.0, 80.0).exists());

        // a single local file is enough when it matches
        std::fs::remove_file(naming.wind_file(60.0)).unwrap();
        std::fs::remove_file(naming.wind_file(80.0)).unwrap();
        assert_eq!(
            combiner.combine(70.0).unwrap().path(),
            naming.wind_file(70.0)
        );
    }

    #[test]
    fn test_combine_with_one_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let naming = naming(dir.path());
        std::fs::write(naming.wind_file(60.0), srw(60, &[6.0])).unwrap();

        let err = HeightCombiner::new(naming).combine(70.0).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::InsufficientData { available, .. } if available == vec![60.0]
        ));
    }

    #[test]
    fn test_combine_rejects_mismatched_rows() {
        let dir = tempfile::tempdir().unwrap();
        let naming = naming(dir.path());
        std::fs::write(naming.wind_file(60.0), srw(60, &[6.0, 6.5])).unwrap();
        std::fs::write(naming.wind_file(80.0), srw(80, &[7.0])).unwrap();

        let err = HeightCombiner::new(naming.clone()).combine(70.0).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Parse(ParseError::LengthMismatch { expected: 2, found: 1, .. })
        ));
        assert!(!naming.combined_wind_file(60.0, 80.0).exists());
    }

    #[test]
    fn test_available_heights_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let combiner = HeightCombiner::new(naming(&dir.path().join("absent")));
        assert!(combiner.available_heights().unwrap().is_empty());
    }
}
