//! Fama-French factor data from the Ken French data library.

pub mod client;
pub mod parse;

pub use client::{FrenchLibraryClient, dataset_archive, extract_csv};
pub use parse::{parse_factor_csv, parse_percent};
