//! Reading resource files from disk into [`SolarData`] / [`WindData`].
//!
//! Both formats are a few lines of text header followed by comma-separated
//! rows. The header is split off by hand and the tabular part is handed to
//! polars, whose columns are then copied out as `f64` sequences.

pub mod error;
pub(crate) mod solar;
pub(crate) mod wind;

use crate::parser::error::ParseError;
use crate::types::resource_kind::ResourceKind;
use crate::types::solar_data::SolarData;
use crate::types::wind_data::WindData;
use polars::prelude::*;
use std::io::{Cursor, ErrorKind};
use std::path::Path;

pub use solar::{parse_solar_file, parse_solar_str};
pub use wind::{parse_wind_file, parse_wind_str, write_wind_file};

/// Either kind of parsed resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResource {
    Solar(SolarData),
    Wind(WindData),
}

/// Parses the file at `path` according to `kind`.
pub fn parse_file(path: &Path, kind: ResourceKind) -> Result<ParsedResource, ParseError> {
    match kind {
        ResourceKind::Solar => parse_solar_file(path).map(ParsedResource::Solar),
        ResourceKind::Wind => parse_wind_file(path).map(ParsedResource::Wind),
    }
}

pub(crate) fn read_to_string(path: &Path) -> Result<String, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ParseError::NotFound(path.to_path_buf()),
        _ => ParseError::Read(path.to_path_buf(), e),
    })?;
    if content.trim().is_empty() {
        return Err(ParseError::Empty(path.to_path_buf()));
    }
    Ok(content)
}

/// Splits off the first `count` lines, returning them and the remaining text.
/// The last header line may end the content without a newline.
pub(crate) fn split_header<'a>(
    content: &'a str,
    count: usize,
    path: &Path,
) -> Result<(Vec<&'a str>, &'a str), ParseError> {
    let mut header = Vec::with_capacity(count);
    let mut rest = content;
    for line in 1..=count {
        let (head, tail) = match rest.split_once('\n') {
            Some(split) => split,
            None if line == count && !rest.is_empty() => (rest, ""),
            None => {
                return Err(ParseError::MalformedHeader {
                    path: path.to_path_buf(),
                    line,
                    message: format!("expected {count} header lines"),
                })
            }
        };
        header.push(head.trim_end_matches('\r'));
        rest = tail;
    }
    Ok((header, rest))
}

pub(crate) fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(|f| f.trim().to_string()).collect()
}

/// Reads comma-separated rows with polars.
pub(crate) fn read_table(
    table: &str,
    has_header: bool,
    path: &Path,
) -> Result<DataFrame, ParseError> {
    let has_rows = table
        .lines()
        .skip(usize::from(has_header))
        .any(|line| !line.trim().is_empty());
    if !has_rows {
        return Err(ParseError::NoRows(path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(has_header)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(table.as_bytes().to_vec()))
        .finish()
        .map_err(|e| ParseError::Csv(path.to_path_buf(), e))?;

    if df.height() == 0 {
        return Err(ParseError::NoRows(path.to_path_buf()));
    }
    Ok(df)
}

/// Copies a column out as `f64` values, rejecting nulls.
pub(crate) fn column_values(
    df: &DataFrame,
    name: &str,
    path: &Path,
) -> Result<Vec<f64>, ParseError> {
    let invalid = |row: usize| ParseError::InvalidValue {
        path: path.to_path_buf(),
        column: name.to_string(),
        row,
    };
    let column = df
        .column(name)
        .and_then(|c| c.cast(&DataType::Float64))
        .map_err(|e| ParseError::Csv(path.to_path_buf(), e))?;
    let values = column
        .f64()
        .map_err(|e| ParseError::Csv(path.to_path_buf(), e))?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| value.filter(|v| !v.is_nan()).ok_or_else(|| invalid(row)))
        .collect()
}
