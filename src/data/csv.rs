//! CSV format dataset implementation
//!
//! Supports loading datasets from CSV files where:
//! - The last column is the label
//! - All other columns are features
//! - First row can be headers (automatically detected)

use crate::core::{Dataset, Matrix, Result, TsvmError};
use crate::data::{name_from_path, DEFAULT_NAME};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dataset implementation for CSV format files
#[derive(Debug, Clone)]
pub struct CSVDataset {
    name: String,
    features: Matrix,
    labels: Vec<f64>,
}

impl CSVDataset {
    /// Load a dataset from a CSV file, named after the file stem
    ///
    /// The last column is assumed to be the label.
    /// Headers are automatically detected if present.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(TsvmError::IoError)?;
        let reader = BufReader::new(file);
        Ok(Self::from_reader(reader)?.with_name(name_from_path(path)))
    }

    /// Load a dataset from a reader with header auto-detection
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, true)
    }

    /// Load a dataset from a reader with explicit header option
    pub fn from_reader_with_options<R: BufRead>(
        mut reader: R,
        auto_detect_header: bool,
    ) -> Result<Self> {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut first_line = String::new();

        // Read first line to check for headers
        reader
            .read_line(&mut first_line)
            .map_err(TsvmError::IoError)?;
        let first_line = first_line.trim();

        if first_line.is_empty() {
            return Err(TsvmError::EmptyDataset);
        }

        let has_header =
            first_line.starts_with('#') || (auto_detect_header && Self::is_header_line(first_line));
        if !has_header {
            let (row, label) = Self::parse_data_line(first_line)?;
            rows.push(row);
            labels.push(label);
        }

        for line in reader.lines() {
            let line = line.map_err(TsvmError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (row, label) = Self::parse_data_line(line)?;
            rows.push(row);
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(TsvmError::EmptyDataset);
        }

        let features = Matrix::from_rows(rows).map_err(|e| {
            TsvmError::ParseError(format!("Rows have different numbers of features: {e}"))
        })?;

        Ok(CSVDataset {
            name: DEFAULT_NAME.to_string(),
            features,
            labels,
        })
    }

    /// Replace the dataset name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < 2 {
            return false;
        }

        // Most feature fields are non-numeric
        let non_numeric_count = fields
            .iter()
            .take(fields.len() - 1)
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();

        non_numeric_count > fields.len() / 2
    }

    /// Parse a CSV data line into a feature row and its label
    fn parse_data_line(line: &str) -> Result<(Vec<f64>, f64)> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        if fields.len() < 2 {
            return Err(TsvmError::ParseError(format!(
                "Line has too few fields: {line}"
            )));
        }

        let label_str = fields[fields.len() - 1];
        let label = label_str
            .parse::<f64>()
            .map_err(|_| TsvmError::ParseError(format!("Invalid label: {label_str}")))?;

        let row = fields[..fields.len() - 1]
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field.parse::<f64>().map_err(|_| {
                    TsvmError::ParseError(format!(
                        "Invalid feature value at column {}: {field}",
                        idx + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok((row, label))
    }
}

impl Dataset for CSVDataset {
    fn features(&self) -> &Matrix {
        &self.features
    }

    fn labels(&self) -> &[f64] {
        &self.labels
    }

    fn name(&self) -> &str {
        &self.name
    }
}
