//! Data pipeline for fetching the series an analysis needs.
//!
//! Prices come from Yahoo Finance and factors from the Ken French data
//! library. Downloads run one after the other and everything stays in memory.

use indicatif::ProgressBar;
use tuck::AnalysisRequest;
use tuck_data::{DataError, FactorRow, FrenchLibraryClient, PricePoint, YahooQuoteProvider};

/// Error type for data pipeline operations.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DataPipelineError {
    /// Price download failed.
    #[error("Failed to fetch prices for {ticker}: {source}")]
    Prices {
        /// Requested ticker.
        ticker: String,
        /// Underlying error.
        source: DataError,
    },
    /// Factor download failed.
    #[error("Failed to fetch Fama-French factors: {0}")]
    Factors(#[source] DataError),
}

/// Series downloaded for one analysis.
#[derive(Debug, Clone)]
pub(crate) struct MarketData {
    /// Adjusted closes for the ticker.
    pub(crate) prices: Vec<PricePoint>,
    /// Factor rows for the requested frequency.
    pub(crate) factors: Vec<FactorRow>,
}

/// Download prices and factors for a request.
pub(crate) async fn fetch_market_data(
    request: &AnalysisRequest,
    progress: Option<&ProgressBar>,
) -> Result<MarketData, DataPipelineError> {
    let ticker = request.ticker().to_string();
    let period = request.period();

    if let Some(pb) = progress {
        pb.set_message(format!("Fetching {} prices...", ticker));
    }
    let prices = fetch_prices(request)
        .await
        .map_err(|source| DataPipelineError::Prices {
            ticker: ticker.clone(),
            source,
        })?;
    tracing::debug!(
        ticker = %ticker,
        start = %period.start(),
        end = %period.end(),
        prices = prices.len(),
        "fetched prices"
    );

    if let Some(pb) = progress {
        pb.set_message("Fetching Fama-French factors...");
    }
    let factors = FrenchLibraryClient::new()
        .fetch_factors(request.frequency())
        .await
        .map_err(DataPipelineError::Factors)?;

    Ok(MarketData { prices, factors })
}

async fn fetch_prices(request: &AnalysisRequest) -> Result<Vec<PricePoint>, DataError> {
    let period = request.period();
    YahooQuoteProvider::new()?
        .fetch_prices(
            request.ticker(),
            period.start(),
            period.end(),
            request.frequency(),
        )
        .await
}
