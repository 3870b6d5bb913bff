//! The in-memory form of an SRW wind resource file.

use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Keys of the [`WindData`] mapping.
pub const WIND_KEYS: [&str; 3] = ["heights", "fields", "data"];

/// A measured quantity in an SRW column.
///
/// Serializes to the integer code simulation engines use for wind resource data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum WindField {
    Temperature,
    Pressure,
    Speed,
    Direction,
}

impl WindField {
    pub fn code(&self) -> u8 {
        match self {
            WindField::Temperature => 1,
            WindField::Pressure => 2,
            WindField::Speed => 3,
            WindField::Direction => 4,
        }
    }

    /// Name written on the field line of an SRW file.
    pub fn srw_name(&self) -> &'static str {
        match self {
            WindField::Temperature => "Temperature",
            WindField::Pressure => "Pressure",
            WindField::Speed => "Speed",
            WindField::Direction => "Direction",
        }
    }

    /// Parses an SRW field name, case-insensitively.
    pub fn from_srw_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if name.starts_with("temp") {
            Some(WindField::Temperature)
        } else if name.starts_with("pres") {
            Some(WindField::Pressure)
        } else if name.starts_with("speed") || name.starts_with("wind speed") {
            Some(WindField::Speed)
        } else if name.starts_with("dir") || name.starts_with("wind direction") {
            Some(WindField::Direction)
        } else {
            None
        }
    }
}

impl From<WindField> for u8 {
    fn from(field: WindField) -> Self {
        field.code()
    }
}

impl fmt::Display for WindField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.srw_name())
    }
}

/// The non-tabular part of an SRW file, kept so parsed data can be written back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SrwHeader {
    /// Line 1: id, city, state, country, year, lat, lon, elevation, timestep, records.
    pub location: Vec<String>,
    /// Line 2: free-form dataset description.
    pub description: String,
    /// Line 4: one unit per column.
    pub units: Vec<String>,
}

impl SrwHeader {
    const LAT_INDEX: usize = 5;
    const LON_INDEX: usize = 6;
    const RECORDS_INDEX: usize = 9;

    fn numeric(&self, index: usize) -> Option<f64> {
        self.location.get(index)?.trim().parse().ok()
    }

    pub fn lat(&self) -> Option<f64> {
        self.numeric(Self::LAT_INDEX)
    }

    pub fn lon(&self) -> Option<f64> {
        self.numeric(Self::LON_INDEX)
    }

    /// Record count declared on the location line, if any.
    pub fn declared_records(&self) -> Option<usize> {
        self.location
            .get(Self::RECORDS_INDEX)?
            .trim()
            .parse()
            .ok()
    }

    pub(crate) fn set_declared_records(&mut self, records: usize) {
        if self.location.len() > Self::RECORDS_INDEX {
            self.location[Self::RECORDS_INDEX] = records.to_string();
        }
    }
}

/// A parsed wind resource: one column per (field, height) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindData {
    /// Measurement height of each column, in metres.
    pub heights: Vec<f64>,
    /// Quantity measured in each column.
    pub fields: Vec<WindField>,
    /// One row per timestep, aligned with `fields` and `heights`.
    pub data: Vec<Vec<f64>>,
    #[serde(skip)]
    pub header: SrwHeader,
}

impl WindData {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        WIND_KEYS.contains(&key)
    }

    /// Distinct measurement heights, ascending.
    pub fn distinct_heights(&self) -> Vec<f64> {
        self.heights
            .iter()
            .copied()
            .map(OrderedFloat)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(OrderedFloat::into_inner)
            .collect()
    }

    /// Values of the column holding `field` at `height`, if present in
    /// every row.
    pub fn column(&self, field: WindField, height: f64) -> Option<Vec<f64>> {
        let index = self
            .fields
            .iter()
            .zip(&self.heights)
            .position(|(f, h)| *f == field && *h == height)?;
        self.data.iter().map(|row| row.get(index).copied()).collect()
    }
}
