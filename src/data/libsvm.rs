//! LibSVM format dataset implementation
//!
//! Supports loading datasets in the libsvm format:
//! label index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 2:0.3 5:2.1
//!
//! Rows are densified; features absent from a line are zero.

use crate::core::{Dataset, Matrix, Result, TsvmError};
use crate::data::{name_from_path, DEFAULT_NAME};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Sparse row as parsed from one line: label and (0-based index, value) pairs
type SparseLine = (f64, Vec<(usize, f64)>);

/// Dataset implementation for LibSVM format files
#[derive(Debug, Clone)]
pub struct LibSVMDataset {
    name: String,
    features: Matrix,
    labels: Vec<f64>,
}

impl LibSVMDataset {
    /// Load a dataset from a LibSVM format file, named after the file stem
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(TsvmError::IoError)?;
        let reader = BufReader::new(file);
        Ok(Self::from_reader(reader)?.with_name(name_from_path(path)))
    }

    /// Load a dataset from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Vec::new();
        let mut dimensions = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(TsvmError::IoError)?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parsed = Self::parse_line(line).map_err(|e| {
                TsvmError::ParseError(format!("Error parsing line {}: {e}", line_num + 1))
            })?;
            if let Some(max_idx) = parsed.1.iter().map(|&(i, _)| i).max() {
                dimensions = dimensions.max(max_idx + 1);
            }
            lines.push(parsed);
        }

        if lines.is_empty() {
            return Err(TsvmError::EmptyDataset);
        }

        let mut features = Matrix::zeros(lines.len(), dimensions);
        let mut labels = Vec::with_capacity(lines.len());
        for (i, (label, entries)) in lines.into_iter().enumerate() {
            for (j, value) in entries {
                features.set(i, j, value);
            }
            labels.push(label);
        }

        Ok(LibSVMDataset {
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

    /// Parse a single line in libsvm format
    fn parse_line(line: &str) -> Result<SparseLine> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.is_empty() {
            return Err(TsvmError::ParseError("Empty line".to_string()));
        }

        let label = parts[0]
            .parse::<f64>()
            .map_err(|_| TsvmError::ParseError(format!("Invalid label: {}", parts[0])))?;

        let mut entries = Vec::with_capacity(parts.len() - 1);
        for feature_str in &parts[1..] {
            let (index, value) = feature_str.split_once(':').ok_or_else(|| {
                TsvmError::ParseError(format!("Invalid feature format: {feature_str}"))
            })?;

            let index = index
                .parse::<usize>()
                .map_err(|_| TsvmError::ParseError(format!("Invalid feature index: {index}")))?;

            let value = value
                .parse::<f64>()
                .map_err(|_| TsvmError::ParseError(format!("Invalid feature value: {value}")))?;

            // libsvm uses 1-based indexing, convert to 0-based
            if index == 0 {
                return Err(TsvmError::ParseError(format!(
                    "Feature index must be positive: {index}"
                )));
            }

            entries.push((index - 1, value));
        }

        Ok((label, entries))
    }
}

impl Dataset for LibSVMDataset {
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
