//! The in-memory form of a solar resource file.
//!
//! [`SolarData`] holds one sequence per column of the file, all aligned by
//! timestep, plus the scalar site metadata from the file header. Serializing it
//! with `serde` yields the key/value mapping simulation engines accept in place
//! of a file path (`dn`, `df`, `gh`, `tdry`, `wspd`, `tz`, ...).

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::Serialize;

/// Keys that are always present in a [`SolarData`] mapping.
pub const SOLAR_KEYS: [&str; 14] = [
    "df", "dn", "gh", "wspd", "tdry", "year", "month", "day", "hour", "minute", "tz", "lat",
    "lon", "elev",
];

/// A parsed solar resource: per-timestep series plus site metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarData {
    /// Site timezone as an offset from UTC in hours.
    pub tz: f64,
    /// Site elevation in metres.
    pub elev: f64,
    pub lat: f64,
    pub lon: f64,
    pub year: Vec<f64>,
    pub month: Vec<f64>,
    pub day: Vec<f64>,
    pub hour: Vec<f64>,
    pub minute: Vec<f64>,
    /// Direct normal irradiance (W/m2).
    pub dn: Vec<f64>,
    /// Diffuse horizontal irradiance (W/m2).
    pub df: Vec<f64>,
    /// Global horizontal irradiance (W/m2).
    pub gh: Vec<f64>,
    /// Dry-bulb temperature (C).
    pub tdry: Vec<f64>,
    /// Wind speed (m/s).
    pub wspd: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdew: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pres: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rh: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wdir: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alb: Option<Vec<f64>>,
}

/// A single entry of the [`SolarData`] mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolarField<'a> {
    Scalar(f64),
    Series(&'a [f64]),
}

impl<'a> SolarField<'a> {
    pub fn as_series(&self) -> Option<&'a [f64]> {
        match self {
            SolarField::Series(values) => Some(*values),
            SolarField::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SolarField::Scalar(value) => Some(*value),
            SolarField::Series(_) => None,
        }
    }
}

impl SolarData {
    /// Number of timesteps in the record.
    pub fn len(&self) -> usize {
        self.year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_empty()
    }

    /// Timestamp of each row in the file's local standard time (`tz` hours
    /// from UTC). Rows whose date columns do not form a valid date are `None`.
    pub fn timestamps(&self) -> Vec<Option<DateTime<FixedOffset>>> {
        let Some(offset) = FixedOffset::east_opt((self.tz * 3600.0).round() as i32) else {
            return vec![None; self.len()];
        };
        (0..self.len())
            .map(|i| {
                let naive = NaiveDate::from_ymd_opt(
                    self.year[i] as i32,
                    self.month.get(i).copied()? as u32,
                    self.day.get(i).copied()? as u32,
                )?
                .and_hms_opt(
                    self.hour.get(i).copied()? as u32,
                    self.minute.get(i).copied()? as u32,
                    0,
                )?;
                offset.from_local_datetime(&naive).single()
            })
            .collect()
    }

    /// Looks up an entry of the mapping view by key.
    ///
    /// ```
    /// # use nrel_resource::{SolarData, SolarField};
    /// # fn check(data: &SolarData) {
    /// if let Some(SolarField::Series(ghi)) = data.get("gh") {
    ///     println!("{} global horizontal samples", ghi.len());
    /// }
    /// # }
    /// ```
    pub fn get(&self, key: &str) -> Option<SolarField<'_>> {
        fn series(values: &[f64]) -> SolarField<'_> {
            SolarField::Series(values)
        }
        let field = match key {
            "tz" => SolarField::Scalar(self.tz),
            "elev" => SolarField::Scalar(self.elev),
            "lat" => SolarField::Scalar(self.lat),
            "lon" => SolarField::Scalar(self.lon),
            "year" => series(&self.year),
            "month" => series(&self.month),
            "day" => series(&self.day),
            "hour" => series(&self.hour),
            "minute" => series(&self.minute),
            "dn" => series(&self.dn),
            "df" => series(&self.df),
            "gh" => series(&self.gh),
            "tdry" => series(&self.tdry),
            "wspd" => series(&self.wspd),
            "tdew" => series(self.tdew.as_ref()?),
            "pres" => series(self.pres.as_ref()?),
            "rh" => series(self.rh.as_ref()?),
            "wdir" => series(self.wdir.as_ref()?),
            "alb" => series(self.alb.as_ref()?),
            _ => return None,
        };
        Some(field)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys present in this record, required ones first.
    pub fn keys(&self) -> Vec<&'static str> {
        let optional = [
            ("tdew", self.tdew.is_some()),
            ("pres", self.pres.is_some()),
            ("rh", self.rh.is_some()),
            ("wdir", self.wdir.is_some()),
            ("alb", self.alb.is_some()),
        ];
        SOLAR_KEYS
            .iter()
            .copied()
            .chain(optional.into_iter().filter(|(_, present)| *present).map(|(k, _)| k))
            .collect()
    }
}
