//! SRW wind resource files.
//!
//! Layout: location line, description line, field names, units, heights, then
//! one row per timestep with one value per (field, height) column.

use crate::parser::error::ParseError;
use crate::parser::{column_values, read_table, read_to_string, split_fields, split_header};
use crate::types::wind_data::{SrwHeader, WindData, WindField};
use crate::utils::write_atomically;
use log::debug;
use polars::prelude::*;
use std::io::Write;
use std::path::Path;

const HEADER_LINES: usize = 5;

/// Parses an SRW file.
pub fn parse_wind_file(path: &Path) -> Result<WindData, ParseError> {
    let content = read_to_string(path)?;
    parse_wind_str(&content, path)
}

/// Parses SRW content; `path` is only used in error messages.
pub fn parse_wind_str(content: &str, path: &Path) -> Result<WindData, ParseError> {
    let (header, table) = split_header(content, HEADER_LINES, path)?;
    let malformed = |line: usize, message: String| ParseError::MalformedHeader {
        path: path.to_path_buf(),
        line,
        message,
    };

    let location = split_fields(header[0]);
    let description = header[1].trim().to_string();
    let fields = split_fields(header[2])
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(|name| {
            WindField::from_srw_name(&name).ok_or_else(|| ParseError::UnknownField {
                path: path.to_path_buf(),
                field: name,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if fields.is_empty() {
        return Err(malformed(3, "no field names".to_string()));
    }

    let columns = fields.len();
    let units: Vec<String> = split_fields(header[3]).into_iter().take(columns).collect();
    let heights = split_fields(header[4])
        .into_iter()
        .take(columns)
        .map(|h| {
            h.parse::<f64>()
                .map_err(|_| malformed(5, format!("height '{h}' is not a number")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if heights.len() != columns {
        return Err(ParseError::LengthMismatch {
            path: path.to_path_buf(),
            what: "height line".to_string(),
            expected: columns,
            found: heights.len(),
        });
    }

    let df = read_table(table, false, path)?;
    if df.width() < columns {
        return Err(ParseError::LengthMismatch {
            path: path.to_path_buf(),
            what: "data row".to_string(),
            expected: columns,
            found: df.width(),
        });
    }
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .take(columns)
        .map(|name| name.to_string())
        .collect();
    let by_column = names
        .iter()
        .map(|name| column_values(&df, name, path))
        .collect::<Result<Vec<_>, _>>()?;
    let data: Vec<Vec<f64>> = (0..df.height())
        .map(|row| by_column.iter().map(|column| column[row]).collect())
        .collect();

    let header = SrwHeader {
        location,
        description,
        units,
    };
    if let Some(declared) = header.declared_records() {
        if declared != data.len() {
            return Err(ParseError::LengthMismatch {
                path: path.to_path_buf(),
                what: "data section".to_string(),
                expected: declared,
                found: data.len(),
            });
        }
    }

    debug!(
        "Parsed {} wind timesteps at heights {:?} from {}",
        data.len(),
        heights,
        path.display()
    );
    Ok(WindData {
        heights,
        fields,
        data,
        header,
    })
}

/// Writes `data` as an SRW file at `path`, replacing any existing file.
pub fn write_wind_file(path: &Path, data: &WindData) -> Result<(), ParseError> {
    check_shape(path, data)?;
    let mut frame = rows_to_frame(data).map_err(|e| ParseError::Csv(path.to_path_buf(), e))?;
    let fields: Vec<&str> = data.fields.iter().map(WindField::srw_name).collect();
    let heights: Vec<String> = data.heights.iter().map(|h| h.to_string()).collect();

    write_atomically(path, |file| {
        writeln!(file, "{}", data.header.location.join(","))?;
        writeln!(file, "{}", data.header.description)?;
        writeln!(file, "{}", fields.join(","))?;
        writeln!(file, "{}", data.header.units.join(","))?;
        writeln!(file, "{}", heights.join(","))?;
        CsvWriter::new(file)
            .include_header(false)
            .finish(&mut frame)
            .map_err(std::io::Error::other)
    })
    .map_err(|e| ParseError::Write(path.to_path_buf(), e))
}

/// Every row and the height list must have one entry per field.
fn check_shape(path: &Path, data: &WindData) -> Result<(), ParseError> {
    let columns = data.column_count();
    let mismatch = |what: String, found: usize| ParseError::LengthMismatch {
        path: path.to_path_buf(),
        what,
        expected: columns,
        found,
    };
    if data.heights.len() != columns {
        return Err(mismatch("height line".to_string(), data.heights.len()));
    }
    match data.data.iter().position(|row| row.len() != columns) {
        Some(index) => Err(mismatch(
            format!("data row {index}"),
            data.data[index].len(),
        )),
        None => Ok(()),
    }
}

fn rows_to_frame(data: &WindData) -> PolarsResult<DataFrame> {
    let columns = (0..data.column_count())
        .map(|index| {
            let values: Vec<f64> = data.data.iter().map(|row| row[index]).collect();
            Column::new(format!("column_{}", index + 1).into(), values)
        })
        .collect();
    DataFrame::new(columns)
}
