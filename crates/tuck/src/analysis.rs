//! Merge, fit and summarize fetched series for one ticker.
//!
//! Retrieval stays with the caller so the same run can be driven by live
//! downloads or by series loaded some other way.

use crate::error::AnalysisError;
use crate::period::AnalysisPeriod;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;
use tuck_data::{FactorRow, Frequency, PricePoint};
use tuck_model::{MergedRow, Merger, ModelError, ModelFits, ModelSpec, Regressor};
use tuck_output::{ExportFormat, Exporter, SummaryTable, output_file_name};

/// What to analyze.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    ticker: String,
    period: AnalysisPeriod,
    frequency: Frequency,
    models: Vec<ModelSpec>,
}

impl AnalysisRequest {
    /// Create a request for the standard model set at daily frequency.
    ///
    /// The ticker is trimmed and upper-cased.
    pub fn new(ticker: &str, period: AnalysisPeriod) -> Result<Self, AnalysisError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(AnalysisError::EmptyTicker);
        }
        Ok(Self {
            ticker,
            period,
            frequency: Frequency::Daily,
            models: ModelSpec::standard_set(),
        })
    }

    /// Set the return frequency.
    pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Replace the model set. An empty list keeps the standard set.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidSpec`] when two models share a name.
    pub fn with_models(mut self, models: Vec<ModelSpec>) -> Result<Self, AnalysisError> {
        let mut seen = HashSet::new();
        for spec in &models {
            if !seen.insert(spec.name()) {
                return Err(ModelError::InvalidSpec(format!(
                    "duplicate model name '{}'",
                    spec.name()
                ))
                .into());
            }
        }
        if !models.is_empty() {
            self.models = models;
        }
        Ok(self)
    }

    /// Upper-cased ticker.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Analysis window.
    pub const fn period(&self) -> AnalysisPeriod {
        self.period
    }

    /// Return frequency.
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Models to fit, in column order.
    pub fn models(&self) -> &[ModelSpec] {
        &self.models
    }

    /// Merge the series, fit every model and build the summary.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Model`] when prices and factors share no dates.
    /// Individual model failures are kept inside the returned fits.
    pub fn run(
        &self,
        prices: &[PricePoint],
        factors: &[FactorRow],
    ) -> Result<Analysis, AnalysisError> {
        let rows = Merger::new(self.frequency).merge_checked(prices, factors)?;
        let fits = Regressor::default().fit(&rows, &self.models)?;
        let table = SummaryTable::from_fits(&fits);

        info!(
            ticker = %self.ticker,
            observations = rows.len(),
            models = fits.len(),
            failed = fits.failures(),
            "analysis complete"
        );

        Ok(Analysis {
            request: self.clone(),
            rows,
            fits,
            table,
        })
    }
}

/// Result of an analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The request that produced this analysis.
    pub request: AnalysisRequest,
    /// Merged observations used by the regressions.
    pub rows: Vec<MergedRow>,
    /// Per-model fits.
    pub fits: ModelFits,
    /// Formatted summary.
    pub table: SummaryTable,
}

impl Analysis {
    /// Number of merged observations.
    pub fn observations(&self) -> usize {
        self.rows.len()
    }

    /// File name the summary is exported under.
    pub fn file_name(&self, format: ExportFormat) -> String {
        let period = self.request.period();
        output_file_name(self.request.ticker(), period.start(), period.end(), format)
    }

    /// Write the summary into `dir` and return the written path.
    pub fn export(&self, dir: &Path, format: ExportFormat) -> Result<PathBuf, AnalysisError> {
        let path = dir.join(self.file_name(format));
        self.table.export_to_file(&path, format)?;
        info!(path = %path.display(), %format, "exported summary");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, NaiveDate};
    use tuck_data::Factor;

    fn period() -> AnalysisPeriod {
        AnalysisPeriod::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        )
        .unwrap()
    }

    fn series(n: usize) -> (Vec<PricePoint>, Vec<FactorRow>) {
        let base = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut price = 25.0;
        let mut prices = Vec::new();
        let mut factors = Vec::new();
        for i in 0..n {
            let t = i as f64;
            let date = base + Duration::days(i as i64);
            let mkt = 0.01 * (t * 0.9).sin();
            let smb = 0.003 * (t * 1.7).cos();
            if i > 0 {
                price *= 1.0 + 0.0002 + 0.8 * mkt + 0.0004 * (t * 2.9).cos();
            }
            prices.push(PricePoint::new(date, price));
            factors.push(FactorRow {
                date,
                mkt_rf: Some(mkt),
                smb: Some(smb),
                hml: Some(0.002 * (t * 0.4).sin()),
                rmw: Some(0.001 * (t * 2.2).sin()),
                cma: Some(0.001 * (t * 0.7).cos()),
                rf: Some(0.0002),
            });
        }
        (prices, factors)
    }

    #[test]
    fn test_request_normalizes_ticker() {
        let request = AnalysisRequest::new(" aapl ", period()).unwrap();
        assert_eq!(request.ticker(), "AAPL");
        assert_eq!(request.frequency(), Frequency::Daily);
        assert_eq!(request.models().len(), 5);

        assert!(matches!(
            AnalysisRequest::new("  ", period()),
            Err(AnalysisError::EmptyTicker)
        ));
    }

    #[test]
    fn test_custom_models_replace_standard_set() {
        let request = AnalysisRequest::new("IBM", period())
            .unwrap()
            .with_models(vec![ModelSpec::capm()])
            .unwrap();
        assert_eq!(request.models(), [ModelSpec::capm()]);

        let unchanged = AnalysisRequest::new("IBM", period())
            .unwrap()
            .with_models(Vec::new())
            .unwrap();
        assert_eq!(unchanged.models().len(), 5);
    }

    #[test]
    fn test_duplicate_model_names_rejected() {
        let custom: ModelSpec = "CAPM=Mkt-RF,SMB".parse().unwrap();
        let result = AnalysisRequest::new("IBM", period())
            .unwrap()
            .with_models(vec![ModelSpec::capm(), custom]);

        match result {
            Err(AnalysisError::Model(ModelError::InvalidSpec(msg))) => {
                assert!(msg.contains("'CAPM'"), "{msg}");
            }
            other => panic!("expected duplicate name error, got {other:?}"),
        }
    }

    #[test]
    fn test_run_end_to_end() {
        let (prices, factors) = series(90);
        let analysis = AnalysisRequest::new("xyz", period())
            .unwrap()
            .run(&prices, &factors)
            .unwrap();

        assert_eq!(analysis.observations(), 89);
        assert_eq!(analysis.fits.len(), 5);
        assert_eq!(analysis.fits.failures(), 0);
        let capm = analysis.fits.get("CAPM").unwrap().result().unwrap();
        assert_abs_diff_eq!(
            capm.factor(Factor::MktRf).unwrap().estimate,
            0.8,
            epsilon = 0.02
        );
        assert_eq!(analysis.table.columns().len(), 5);
        assert_eq!(
            analysis.file_name(ExportFormat::Csv),
            "XYZ_01-01-2020_to_12-31-2020.csv"
        );
    }

    #[test]
    fn test_run_without_overlap_fails() {
        let (prices, mut factors) = series(10);
        for row in &mut factors {
            row.date += Duration::days(365);
        }
        let result = AnalysisRequest::new("XYZ", period())
            .unwrap()
            .run(&prices, &factors);
        assert!(matches!(
            result,
            Err(AnalysisError::Model(ModelError::EmptyMerge))
        ));
    }

    #[test]
    fn test_export_writes_named_file() {
        let (prices, factors) = series(30);
        let analysis = AnalysisRequest::new("xyz", period())
            .unwrap()
            .run(&prices, &factors)
            .unwrap();

        let dir = std::env::temp_dir().join(format!("tuck_analysis_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = analysis.export(&dir, ExportFormat::Json).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "XYZ_01-01-2020_to_12-31-2020.json"
        );
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"columns\""));

        let workbook = analysis.export(&dir, ExportFormat::default()).unwrap();
        assert_eq!(
            workbook.file_name().unwrap().to_str().unwrap(),
            "XYZ_01-01-2020_to_12-31-2020.xlsx"
        );
        assert!(std::fs::read(&workbook).unwrap().starts_with(b"PK"));

        std::fs::remove_dir_all(dir).ok();
    }
}
