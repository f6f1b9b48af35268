//! Data loading and dataset implementations
//!
//! Both formats load into a dense feature matrix with labels kept verbatim,
//! so binary (+1/-1) and multi-class files load the same way.

pub mod csv;
pub mod libsvm;

pub use self::csv::*;
pub use self::libsvm::*;

use std::path::Path;

/// Dataset name taken from a file stem, e.g. `data/iris.csv` -> `iris`
pub(crate) fn name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}

pub(crate) const DEFAULT_NAME: &str = "dataset";
