//! Downloader for the Ken French data library.

use super::parse::parse_factor_csv;
use crate::error::{DataError, Result};
use crate::types::{FactorRow, Frequency};
use std::io::{Cursor, Read};
use std::time::Duration;
use tracing::{debug, info};

/// Base URL of the data library's FTP mirror.
pub const DEFAULT_BASE_URL: &str = "https://mba.tuck.dartmouth.edu/pages/faculty/ken.french/ftp";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Archive name of the 5-factor (2x3) dataset for a frequency.
pub const fn dataset_archive(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "F-F_Research_Data_5_Factors_2x3_daily_CSV.zip",
        Frequency::Monthly => "F-F_Research_Data_5_Factors_2x3_CSV.zip",
    }
}

/// Client for the Fama-French 5-factor datasets.
#[derive(Debug, Clone)]
pub struct FrenchLibraryClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Default for FrenchLibraryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FrenchLibraryClient {
    /// Create a client pointing at the public data library.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different base URL (mirror or test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the archive for a frequency.
    pub fn dataset_url(&self, frequency: Frequency) -> String {
        format!("{}/{}", self.base_url, dataset_archive(frequency))
    }

    /// Download and parse the 5-factor table.
    pub async fn fetch_factors(&self, frequency: Frequency) -> Result<Vec<FactorRow>> {
        let url = self.dataset_url(frequency);
        debug!(%url, "downloading factor archive");

        let response = self.http.get(&url).timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        let text = extract_csv(&bytes)?;
        let rows = parse_factor_csv(&text, frequency)?;

        if rows.is_empty() {
            return Err(DataError::MissingData {
                symbol: dataset_archive(frequency).to_string(),
                reason: format!("no {frequency} rows in factor table"),
            });
        }

        info!(
            rows = rows.len(),
            first = %rows[0].date,
            last = %rows[rows.len() - 1].date,
            "fetched factor table"
        );
        Ok(rows)
    }
}

/// Read the first CSV entry of an in-memory ZIP archive.
pub fn extract_csv(archive: &[u8]) -> Result<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;

    for idx in 0..zip.len() {
        let mut entry = zip.by_index(idx)?;
        if !entry.is_file() || !entry.name().to_ascii_lowercase().ends_with(".csv") {
            continue;
        }

        let mut raw = Vec::new();
        entry.read_to_end(&mut raw)?;
        // The library's files are plain ASCII with the odd Latin-1 byte in notes.
        return Ok(String::from_utf8_lossy(&raw).into_owned());
    }

    Err(DataError::Parse("archive contains no CSV file".to_string()))
}
