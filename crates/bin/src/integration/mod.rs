//! Integration module for the command-line workflow.
//!
//! Downloads the price and factor series an analysis needs and reads the
//! interactive answers when no ticker is given on the command line.

pub(crate) mod data_pipeline;
pub(crate) mod prompt;
