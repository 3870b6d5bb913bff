//! Defines the kinds of meteorological resource this crate can load, and the
//! per-kind conventions (dataset name, file extension, provider coverage).

use std::fmt;
use std::ops::RangeInclusive;

/// The kind of resource data a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Irradiance, temperature and wind speed from the NSRDB PSM v3 dataset,
    /// stored as a PSM CSV file.
    Solar,
    /// Wind speed, direction, temperature and pressure at one or more heights
    /// from the WIND Toolkit, stored as an SRW file.
    Wind,
}

impl ResourceKind {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Solar => "solar",
            ResourceKind::Wind => "wind",
        }
    }

    pub(crate) fn dataset(&self) -> &'static str {
        match self {
            ResourceKind::Solar => "psmv3",
            ResourceKind::Wind => "windtoolkit",
        }
    }

    pub(crate) fn extension(&self) -> &'static str {
        match self {
            ResourceKind::Solar => "csv",
            ResourceKind::Wind => "srw",
        }
    }

    /// Years for which the remote provider publishes data.
    pub fn coverage(&self) -> RangeInclusive<i32> {
        match self {
            ResourceKind::Solar => 1998..=2022,
            ResourceKind::Wind => 2007..=2014,
        }
    }
}

/// Formats a `ResourceKind` using its path segment.
///
/// # Examples
///
/// ```
/// use nrel_resource::ResourceKind;
///
/// assert_eq!(ResourceKind::Solar.to_string(), "solar");
/// assert_eq!(format!("{}", ResourceKind::Wind), "wind");
/// ```
impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}
