//! Error taxonomy for the ranking engine and query dispatcher

use std::path::PathBuf;

use thiserror::Error;

use crate::core::ValueCategory;

/// Errors raised by the dataset, ranking engine and dispatcher.
///
/// Only `Schema` and `Io` are fatal; the rest are recoverable and expected to
/// be turned into a user-visible fallback by the immediate caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HoodError {
    /// Required column missing, wrongly typed, or a row breaks a table invariant.
    #[error("schema error: {0}")]
    Schema(String),

    /// A region filter that is neither "All" nor one of the known regions.
    #[error("invalid region filter: {0:?}")]
    InvalidRegion(String),

    /// `best()`/`worst()` asked for a category with no records.
    #[error("no neighbourhoods classified as {0}")]
    EmptyCategory(ValueCategory),

    /// The dispatcher's keyword rules name a region the engine does not know.
    #[error("unknown region {0:?} in keyword rules")]
    UnknownRegion(String),

    #[error("failed to read {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
}

impl HoodError {
    pub(crate) fn schema(row: usize, column: &str, reason: impl std::fmt::Display) -> Self {
        HoodError::Schema(format!("row {row}, column `{column}`: {reason}"))
    }
}

pub type Result<T> = std::result::Result<T, HoodError>;
