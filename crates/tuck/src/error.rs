//! Error types for a full analysis run.

use chrono::NaiveDate;
use thiserror::Error;
use tuck_data::DataError;
use tuck_model::ModelError;
use tuck_output::ExportError;

/// Errors that end an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Retrieval failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Merging or fitting failed for the whole run.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Writing the summary failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A date string matched neither `MM/DD/YYYY` nor `YYYY-MM-DD`.
    #[error("Invalid date '{0}': expected MM/DD/YYYY or YYYY-MM-DD")]
    InvalidDate(String),

    /// Start date after end date.
    #[error("Invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// Blank ticker.
    #[error("Ticker must not be empty")]
    EmptyTicker,
}
