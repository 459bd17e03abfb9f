#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tuck/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod merge;
pub mod regression;
pub mod spec;

pub use error::{FitError, ModelError};
pub use merge::{MergedRow, Merger, merge};
pub use regression::{
    Coefficient, ModelFit, ModelFits, OlsConfig, RegressionResult, Regressor, design_matrix, fit,
};
pub use spec::ModelSpec;
