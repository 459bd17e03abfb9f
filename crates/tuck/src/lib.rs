#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tuck/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod error;
pub mod period;

// Re-export main types from sub-crates
pub use tuck_data as data;
pub use tuck_model as model;
pub use tuck_output as output;

pub use analysis::{Analysis, AnalysisRequest};
pub use error::AnalysisError;
pub use period::{AnalysisPeriod, DEFAULT_LOOKBACK_DAYS, parse_date};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
