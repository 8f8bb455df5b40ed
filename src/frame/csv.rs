//! CSV loading for [`Frame`].

use super::{Column, Frame};
use crate::error::PreprocessingError;
use ::csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Cell contents read as a missing value.
const MISSING_MARKERS: &[&str] = &["", "NA", "NaN", "nan", "null"];

impl Frame {
    /// Load a frame from CSV with a header row.
    ///
    /// A column becomes [`Column::Numeric`] when every non-missing cell parses
    /// as `f64`, otherwise [`Column::Text`]. Ragged rows are rejected by the
    /// CSV reader.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, PreprocessingError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for result in rdr.records() {
            let record = result?;
            for (col, field) in record.iter().enumerate() {
                let cell = if MISSING_MARKERS.contains(&field) {
                    None
                } else {
                    Some(field.to_string())
                };
                cells[col].push(cell);
            }
        }

        let mut frame = Frame::new();
        for (name, values) in headers.into_iter().zip(cells) {
            frame.push_column(name, infer_column(values))?;
        }
        tracing::debug!(
            rows = frame.n_rows(),
            columns = frame.n_columns(),
            "loaded frame from csv"
        );
        Ok(frame)
    }

    /// Load a frame from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }
}

fn infer_column(values: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<f64>> = values
        .iter()
        .map(|cell| match cell {
            None => Some(f64::NAN),
            Some(text) => text.parse::<f64>().ok(),
        })
        .collect();

    match parsed {
        Some(numbers) => Column::Numeric(numbers),
        None => Column::Text(values),
    }
}
