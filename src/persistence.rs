//! Result file persistence
//!
//! A grid-search report is stored as pretty JSON together with the metadata
//! needed to identify it: dataset, classifier, kernel and evaluation method.

use crate::core::{Result, TsvmError};
use crate::selection::naming::{method_token, result_name, timestamped};
use crate::selection::{EvaluationMethod, SearchReport};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Identification of a stored result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsMetadata {
    /// Deterministic result identifier, without timestamp
    pub name: String,
    pub dataset: String,
    pub classifier: String,
    pub kernel: String,
    pub method: EvaluationMethod,
    pub method_token: String,
    /// Library version used to produce the result
    pub library_version: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Serializable grid-search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsFile {
    pub metadata: ResultsMetadata,
    pub report: SearchReport,
}

impl ResultsFile {
    pub fn new(
        dataset: &str,
        classifier: &str,
        kernel: &str,
        method: EvaluationMethod,
        report: SearchReport,
    ) -> Self {
        Self {
            metadata: ResultsMetadata {
                name: result_name(dataset, classifier, kernel, &method),
                dataset: dataset.to_string(),
                classifier: classifier.to_string(),
                kernel: kernel.to_string(),
                method_token: method_token(&method),
                method,
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: Local::now().to_rfc3339(),
            },
            report,
        }
    }

    /// Save results to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(TsvmError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| TsvmError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Save into `dir` as `<name>_<timestamp>.json` and return the path
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let stem = timestamped(&self.metadata.name, &Local::now());
        let path = dir.as_ref().join(format!("{stem}.json"));
        self.save_to_file(&path)?;
        Ok(path)
    }

    /// Load results from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(TsvmError::IoError)?;
        let reader = BufReader::new(file);
        let results = serde_json::from_reader(reader)
            .map_err(|e| TsvmError::SerializationError(e.to_string()))?;
        Ok(results)
    }

    /// Print results summary
    pub fn print_summary(&self) {
        println!("=== TSVM Results: {} ===", self.metadata.name);
        println!("Dataset: {}", self.metadata.dataset);
        println!("Classifier: {}", self.metadata.classifier);
        println!("Kernel: {}", self.metadata.kernel);
        println!("Evaluation: {}", self.metadata.method_token);
        println!("Strategy: {}", self.report.strategy);
        println!(
            "Points: {} evaluated, {} failed",
            self.report.entries.len(),
            self.report.failures.len()
        );
        if let Some(best) = self.report.best() {
            println!("Best: {}", best.params);
            println!(
                "  Accuracy: {:.2}% ± {:.2}",
                best.result.mean_accuracy, best.result.std_deviation
            );
        }
        println!("Created: {}", self.metadata.created_at);
    }
}
