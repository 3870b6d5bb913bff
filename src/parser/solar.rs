//! NSRDB PSM v3 CSV files.
//!
//! Layout: a metadata name line, a metadata value line, the column header,
//! then one row per timestep.

use crate::parser::error::ParseError;
use crate::parser::{column_values, read_table, read_to_string, split_fields, split_header};
use crate::types::solar_data::SolarData;
use log::debug;
use polars::prelude::DataFrame;
use std::path::Path;

const METADATA_LINES: usize = 2;

/// Accepted column names per field, compared case-insensitively.
const YEAR: &[&str] = &["year"];
const MONTH: &[&str] = &["month"];
const DAY: &[&str] = &["day"];
const HOUR: &[&str] = &["hour"];
const MINUTE: &[&str] = &["minute"];
const DN: &[&str] = &["dni", "dn", "direct normal", "beam"];
const DF: &[&str] = &["dhi", "df", "diffuse horizontal", "diffuse"];
const GH: &[&str] = &["ghi", "gh", "global horizontal", "global"];
const TDRY: &[&str] = &["temperature", "tdry", "dry bulb", "temp"];
const WSPD: &[&str] = &["wind speed", "wspd", "windspeed", "speed"];
const TDEW: &[&str] = &["dew point", "tdew", "dewpoint"];
const PRES: &[&str] = &["pressure", "pres"];
const RH: &[&str] = &["relative humidity", "rh", "rhum"];
const WDIR: &[&str] = &["wind direction", "wdir"];
const ALB: &[&str] = &["surface albedo", "alb", "albedo"];

/// Parses a PSM v3 CSV file.
pub fn parse_solar_file(path: &Path) -> Result<SolarData, ParseError> {
    let content = read_to_string(path)?;
    parse_solar_str(&content, path)
}

/// Parses PSM v3 CSV content; `path` is only used in error messages.
pub fn parse_solar_str(content: &str, path: &Path) -> Result<SolarData, ParseError> {
    let (metadata, table) = split_header(content, METADATA_LINES, path)?;
    let names = split_fields(metadata[0]);
    let values = split_fields(metadata[1]);

    let meta = |key: &str| -> Result<Option<f64>, ParseError> {
        let Some(index) = names.iter().position(|n| n.eq_ignore_ascii_case(key)) else {
            return Ok(None);
        };
        let raw = values.get(index).map(String::as_str).unwrap_or_default();
        raw.parse().map(Some).map_err(|_| ParseError::MalformedHeader {
            path: path.to_path_buf(),
            line: 2,
            message: format!("'{key}' is not a number: '{raw}'"),
        })
    };

    let tz = meta("Time Zone")?.ok_or_else(|| ParseError::MissingField {
        path: path.to_path_buf(),
        field: "Time Zone".to_string(),
    })?;
    let lat = meta("Latitude")?.unwrap_or_default();
    let lon = meta("Longitude")?.unwrap_or_default();
    let elev = meta("Elevation")?.unwrap_or_default();

    let df = read_table(table, true, path)?;
    let columns = Columns { df: &df, path };

    let year = columns.required("year", YEAR)?;
    let minute = match columns.optional(MINUTE)? {
        Some(minute) => minute,
        None => vec![0.0; year.len()],
    };

    let data = SolarData {
        tz,
        elev,
        lat,
        lon,
        month: columns.required("month", MONTH)?,
        day: columns.required("day", DAY)?,
        hour: columns.required("hour", HOUR)?,
        minute,
        dn: columns.required("dn", DN)?,
        df: columns.required("df", DF)?,
        gh: columns.required("gh", GH)?,
        tdry: columns.required("tdry", TDRY)?,
        wspd: columns.required("wspd", WSPD)?,
        tdew: columns.optional(TDEW)?,
        pres: columns.optional(PRES)?,
        rh: columns.optional(RH)?,
        wdir: columns.optional(WDIR)?,
        alb: columns.optional(ALB)?,
        year,
    };
    debug!(
        "Parsed {} solar timesteps from {}",
        data.len(),
        path.display()
    );
    Ok(data)
}

struct Columns<'a> {
    df: &'a DataFrame,
    path: &'a Path,
}

impl Columns<'_> {
    fn find(&self, aliases: &[&str]) -> Option<String> {
        let names = self.df.get_column_names();
        aliases.iter().find_map(|alias| {
            names
                .iter()
                .find(|name| name.trim().eq_ignore_ascii_case(alias))
                .map(|name| name.to_string())
        })
    }

    fn optional(&self, aliases: &[&str]) -> Result<Option<Vec<f64>>, ParseError> {
        self.find(aliases)
            .map(|name| column_values(self.df, &name, self.path))
            .transpose()
    }

    fn required(&self, field: &str, aliases: &[&str]) -> Result<Vec<f64>, ParseError> {
        self.optional(aliases)?
            .ok_or_else(|| ParseError::MissingField {
                path: self.path.to_path_buf(),
                field: field.to_string(),
            })
    }
}
