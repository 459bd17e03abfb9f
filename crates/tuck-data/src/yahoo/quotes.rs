//! Adjusted-close history from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::types::{Frequency, PricePoint};
use chrono::{DateTime, NaiveDate, NaiveTime};
use tracing::{debug, info};
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider").finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a new Yahoo Finance quote provider.
    pub fn new() -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
        })
    }

    /// Fetch the adjusted-close series for a single symbol.
    ///
    /// # Arguments
    /// * `symbol` - The ticker symbol (e.g., "AAPL")
    /// * `start` - First calendar day of the range (inclusive)
    /// * `end` - Last calendar day of the range (inclusive)
    /// * `frequency` - Daily or monthly bars
    ///
    /// # Returns
    /// Price points sorted by date, one per bar.
    pub async fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<PricePoint>> {
        validate_request(symbol, start, end)?;

        let start_time = to_offset_datetime(start, NaiveTime::MIN)?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        let end_time = to_offset_datetime(end, end_of_day)?;

        debug!(%symbol, %start, %end, interval = frequency.yahoo_interval(), "requesting quote history");

        let response = self
            .provider
            .get_quote_history_interval(symbol, start_time, end_time, frequency.yahoo_interval())
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        let mut points = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let date = DateTime::from_timestamp(quote.timestamp, 0)
                .ok_or_else(|| {
                    DataError::TimeConversion(format!("invalid timestamp {}", quote.timestamp))
                })?
                .date_naive();
            points.push(PricePoint::new(date, quote.adjclose));
        }

        let points = normalize_prices(points);
        if points.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No data returned from Yahoo Finance".to_string(),
            });
        }

        info!(%symbol, observations = points.len(), "fetched price history");
        Ok(points)
    }
}

fn validate_request(symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(DataError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    if symbol.trim().is_empty() {
        return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
    }

    Ok(())
}

fn to_offset_datetime(date: NaiveDate, at: NaiveTime) -> Result<time::OffsetDateTime> {
    let timestamp = date.and_time(at).and_utc().timestamp();
    time::OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}

/// Sort by date, drop non-finite prices and keep the last bar for a repeated date.
pub(crate) fn normalize_prices(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.retain(|p| p.price.is_finite());
    points.sort_by_key(|p| p.date);

    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match out.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => out.push(point),
        }
    }
    out
}
