//! Spreadsheet, CSV and JSON export of the regression summary.

use crate::summary::SummaryTable;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Spreadsheet writer error.
    #[error("XLSX writer error: {0}")]
    Xlsx(#[from] XlsxError),

    /// Binary format requested as text.
    #[error("{0} output is binary and cannot be exported as a string")]
    Binary(ExportFormat),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Excel workbook with a single summary sheet.
    #[default]
    Xlsx,

    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::PrettyJson => "pretty-json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(format!(
                "unknown export format '{other}' (expected xlsx, csv, json or pretty-json)"
            )),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to raw bytes. Text formats are UTF-8 encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_bytes(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        Ok(self.export_to_string(format)?.into_bytes())
    }

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_bytes(format)?;
        let mut file = File::create(path)?;
        file.write_all(&content)?;
        Ok(())
    }
}

impl Exporter for SummaryTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);

                let mut header = vec![""];
                header.extend(self.columns().iter().map(String::as_str));
                wtr.write_record(&header)?;

                for row in self.rows() {
                    let mut record = vec![row.label.as_str()];
                    record.extend(row.cells.iter().map(String::as_str));
                    wtr.write_record(&record)?;
                }

                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                Ok(String::from_utf8(bytes)?)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Xlsx => Err(ExportError::Binary(format)),
        }
    }

    fn export_to_bytes(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Xlsx => Ok(self.to_workbook()?.save_to_buffer()?),
            _ => Ok(self.export_to_string(format)?.into_bytes()),
        }
    }
}

impl SummaryTable {
    /// Lay the table out on one sheet: model names across the first row,
    /// row labels down the first column. Blank cells are left unwritten.
    fn to_workbook(&self) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        sheet.set_column_width(0, 24)?;

        for (col, name) in (1u16..).zip(self.columns()) {
            sheet.write_string_with_format(0, col, name, &bold)?;
            sheet.set_column_width(col, 14)?;
        }

        for (row, summary_row) in (1u32..).zip(self.rows()) {
            sheet.write_string_with_format(row, 0, &summary_row.label, &bold)?;
            for (col, cell) in (1u16..).zip(&summary_row.cells) {
                if !cell.is_empty() {
                    sheet.write_string(row, col, cell)?;
                }
            }
        }

        Ok(workbook)
    }
}

/// File name for an exported summary: `{TICKER}_{MM-DD-YYYY}_to_{MM-DD-YYYY}.{ext}`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tuck_output::{ExportFormat, output_file_name};
///
/// let start = NaiveDate::from_ymd_opt(2017, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
/// assert_eq!(
///     output_file_name("aapl", start, end, ExportFormat::Csv),
///     "AAPL_03-01-2017_to_02-28-2024.csv"
/// );
/// ```
pub fn output_file_name(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    format: ExportFormat,
) -> String {
    format!(
        "{}_{}_to_{}.{}",
        ticker.trim().to_uppercase(),
        start.format("%m-%d-%Y"),
        end.format("%m-%d-%Y"),
        format.extension()
    )
}
