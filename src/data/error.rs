use thiserror::Error;

use super::model::DatasetKind;

/// Malformed-input failures. Any of these aborts the whole session.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("{dataset} table is missing required column '{column}'")]
    MissingColumn {
        dataset: DatasetKind,
        column: &'static str,
    },

    #[error("{dataset} table, row {row}: '{value}' in column '{column}' is not numeric")]
    NotNumeric {
        dataset: DatasetKind,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{dataset} table, column '{column}': unsupported type {data_type}")]
    UnsupportedColumnType {
        dataset: DatasetKind,
        column: &'static str,
        data_type: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}
