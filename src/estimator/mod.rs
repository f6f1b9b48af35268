//! Estimators: the TSVM binary backend and its multi-class wrappers

pub mod multiclass;
pub mod tsvm;

pub use self::multiclass::{OneVsAll, OneVsOne};
pub use self::tsvm::TwinSvm;
