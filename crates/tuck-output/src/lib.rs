#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tuck/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod summary;

pub use export::{ExportError, ExportFormat, Exporter, output_file_name};
pub use summary::{
    NOT_AVAILABLE, ROW_LABELS, SummaryRow, SummaryTable, format_significant, format_std_error,
    stars,
};
