//! Error types for merging and regression.

use thiserror::Error;

/// Errors that abort a whole analysis run.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Price and factor series share no usable dates
    #[error("No overlapping observations between price and factor series")]
    EmptyMerge,

    /// Malformed model specification
    #[error("Invalid model specification: {0}")]
    InvalidSpec(String),
}

/// Errors confined to a single model fit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Not enough observations for the number of regressors
    #[error("Insufficient rows: need at least {required} observations, got {actual}")]
    InsufficientRows {
        /// Minimum number of observations (regressors + 1)
        required: usize,
        /// Usable observations
        actual: usize,
    },

    /// Regressors are collinear or a column carries no variation
    #[error("Singular design matrix: column '{column}' is linearly dependent on earlier columns")]
    SingularDesign {
        /// First column found to be dependent
        column: String,
    },

    /// Dependent variable has no variation, so R² is undefined
    #[error("Constant dependent variable: excess returns do not vary")]
    ConstantResponse,

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Reference distribution could not be built
    #[error("Distribution error: {0}")]
    Distribution(String),
}
