//! Alignment of price and factor series.
//!
//! Simple returns are computed on the price series in its own chronological
//! order; the first observation has no return and never reaches the join.
//! Each remaining observation is then inner-joined with the factor table on
//! date and the risk-free rate is subtracted.

use crate::error::ModelError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};
use tuck_data::{Factor, FactorRow, Frequency, PricePoint};

/// One aligned observation.
///
/// Any value whose inputs were missing is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    /// Observation date (first of month for monthly data).
    pub date: NaiveDate,
    /// Adjusted close.
    pub price: f64,
    /// `price / previous price - 1`.
    pub simple_return: Option<f64>,
    /// Simple return minus the risk-free rate.
    pub excess_return: Option<f64>,
    /// Risk-free rate for the period.
    pub rf: Option<f64>,
    /// Market excess return.
    pub mkt_rf: Option<f64>,
    /// Size factor.
    pub smb: Option<f64>,
    /// Value factor.
    pub hml: Option<f64>,
    /// Profitability factor.
    pub rmw: Option<f64>,
    /// Investment factor.
    pub cma: Option<f64>,
}

impl MergedRow {
    /// Value of a single factor.
    pub const fn factor(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::MktRf => self.mkt_rf,
            Factor::Smb => self.smb,
            Factor::Hml => self.hml,
            Factor::Rmw => self.rmw,
            Factor::Cma => self.cma,
        }
    }
}

/// Joins prices with factor rows at a given frequency.
#[derive(Debug, Clone, Copy, Default)]
pub struct Merger {
    frequency: Frequency,
}

impl Merger {
    /// Create a merger for the given frequency.
    pub const fn new(frequency: Frequency) -> Self {
        Self { frequency }
    }

    /// Frequency used to align dates.
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Merge prices and factors into rows sorted by date.
    ///
    /// Returns an empty vector when fewer than two prices are supplied or no
    /// dates overlap.
    pub fn merge(&self, prices: &[PricePoint], factors: &[FactorRow]) -> Vec<MergedRow> {
        let series = self.align_prices(prices);
        if series.len() < 2 {
            return Vec::new();
        }

        let by_date: HashMap<NaiveDate, &FactorRow> =
            factors.iter().map(|row| (row.date, row)).collect();

        let mut merged = Vec::with_capacity(series.len() - 1);
        for pair in series.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let Some(factor_row) = by_date.get(&curr.date) else {
                continue;
            };

            let simple_return = simple_return(prev.price, curr.price);
            let excess_return = simple_return
                .zip(factor_row.rf)
                .map(|(ret, rf)| ret - rf);

            merged.push(MergedRow {
                date: curr.date,
                price: curr.price,
                simple_return,
                excess_return,
                rf: factor_row.rf,
                mkt_rf: factor_row.mkt_rf,
                smb: factor_row.smb,
                hml: factor_row.hml,
                rmw: factor_row.rmw,
                cma: factor_row.cma,
            });
        }

        debug!(
            prices = prices.len(),
            factors = factors.len(),
            merged = merged.len(),
            frequency = %self.frequency,
            "merged price and factor series"
        );
        merged
    }

    /// Like [`Self::merge`], but an empty result is an error.
    pub fn merge_checked(
        &self,
        prices: &[PricePoint],
        factors: &[FactorRow],
    ) -> Result<Vec<MergedRow>, ModelError> {
        let merged = self.merge(prices, factors);
        if merged.is_empty() {
            warn!(
                prices = prices.len(),
                factors = factors.len(),
                "price and factor series do not overlap"
            );
            return Err(ModelError::EmptyMerge);
        }
        Ok(merged)
    }

    /// Sort prices, map dates onto period keys and keep the last price per period.
    fn align_prices(&self, prices: &[PricePoint]) -> Vec<PricePoint> {
        let mut aligned: Vec<PricePoint> = prices
            .iter()
            .map(|p| PricePoint::new(self.frequency.align(p.date), p.price))
            .collect();
        // Stable sort keeps the original order inside a period, so the last wins.
        aligned.sort_by_key(|p| p.date);

        let mut out: Vec<PricePoint> = Vec::with_capacity(aligned.len());
        for point in aligned {
            match out.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => out.push(point),
            }
        }
        out
    }
}

/// Merge daily prices and factors.
pub fn merge(prices: &[PricePoint], factors: &[FactorRow]) -> Vec<MergedRow> {
    Merger::new(Frequency::Daily).merge(prices, factors)
}

fn simple_return(prev: f64, curr: f64) -> Option<f64> {
    if !prev.is_finite() || prev <= 0.0 || !curr.is_finite() {
        return None;
    }
    Some(curr / prev - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn factor_row(date: NaiveDate, mkt: f64, rf: Option<f64>) -> FactorRow {
        FactorRow {
            date,
            mkt_rf: Some(mkt),
            smb: Some(0.001),
            hml: Some(-0.002),
            rmw: Some(0.0005),
            cma: Some(0.0),
            rf,
        }
    }

    #[test]
    fn test_aligned_inputs_drop_first_observation() {
        let dates = [d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4), d(2024, 1, 5)];
        let prices: Vec<PricePoint> = dates
            .iter()
            .zip([100.0, 101.0, 99.99, 102.0])
            .map(|(&date, price)| PricePoint::new(date, price))
            .collect();
        let factors: Vec<FactorRow> = dates
            .iter()
            .map(|&date| factor_row(date, 0.01, Some(0.0002)))
            .collect();

        let merged = merge(&prices, &factors);

        assert_eq!(merged.len(), dates.len() - 1);
        assert_eq!(merged[0].date, d(2024, 1, 3));
        assert_relative_eq!(merged[0].simple_return.unwrap(), 0.01, epsilon = 1e-12);
        assert_relative_eq!(merged[0].excess_return.unwrap(), 0.0098, epsilon = 1e-12);
        assert_relative_eq!(merged[1].simple_return.unwrap(), 99.99 / 101.0 - 1.0);
    }

    #[test]
    fn test_returns_use_price_order_not_join_order() {
        // Jan 3 has no factor row; Jan 4's return is still measured against Jan 3.
        let prices = vec![
            PricePoint::new(d(2024, 1, 4), 110.0),
            PricePoint::new(d(2024, 1, 2), 100.0),
            PricePoint::new(d(2024, 1, 3), 105.0),
        ];
        let factors = vec![
            factor_row(d(2024, 1, 2), 0.0, Some(0.0)),
            factor_row(d(2024, 1, 4), 0.0, Some(0.0)),
        ];

        let merged = merge(&prices, &factors);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].date, d(2024, 1, 4));
        assert_relative_eq!(merged[0].simple_return.unwrap(), 110.0 / 105.0 - 1.0);
    }

    #[test]
    fn test_missing_rf_only_affects_its_row() {
        let dates = [d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)];
        let prices: Vec<PricePoint> = dates
            .iter()
            .zip([100.0, 101.0, 102.0])
            .map(|(&date, price)| PricePoint::new(date, price))
            .collect();
        let factors = vec![
            factor_row(dates[0], 0.0, Some(0.0)),
            factor_row(dates[1], 0.0, None),
            factor_row(dates[2], 0.0, Some(0.0001)),
        ];

        let merged = merge(&prices, &factors);

        assert_eq!(merged.len(), 2);
        assert!(merged[0].simple_return.is_some());
        assert_eq!(merged[0].excess_return, None);
        assert!(merged[1].excess_return.is_some());
    }

    #[test]
    fn test_bad_price_breaks_neighbouring_returns() {
        let dates = [d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4), d(2024, 1, 5)];
        let prices: Vec<PricePoint> = dates
            .iter()
            .zip([100.0, 0.0, 102.0, 103.0])
            .map(|(&date, price)| PricePoint::new(date, price))
            .collect();
        let factors: Vec<FactorRow> = dates
            .iter()
            .map(|&date| factor_row(date, 0.0, Some(0.0)))
            .collect();

        let merged = merge(&prices, &factors);

        assert_eq!(merged.len(), 3);
        assert_relative_eq!(merged[0].simple_return.unwrap(), -1.0);
        assert_eq!(merged[1].simple_return, None);
        assert!(merged[2].simple_return.is_some());
    }

    #[test]
    fn test_too_few_prices_or_no_overlap_is_empty() {
        let factors = vec![factor_row(d(2024, 1, 2), 0.0, Some(0.0))];

        let single = vec![PricePoint::new(d(2024, 1, 2), 100.0)];
        assert!(merge(&single, &factors).is_empty());

        let disjoint = vec![
            PricePoint::new(d(2023, 1, 2), 100.0),
            PricePoint::new(d(2023, 1, 3), 101.0),
        ];
        assert!(merge(&disjoint, &factors).is_empty());

        let result = Merger::default().merge_checked(&disjoint, &factors);
        assert!(matches!(result, Err(ModelError::EmptyMerge)));
    }

    #[test]
    fn test_monthly_alignment_uses_last_price_in_month() {
        let prices = vec![
            PricePoint::new(d(2024, 1, 1), 100.0),
            PricePoint::new(d(2024, 2, 1), 110.0),
            PricePoint::new(d(2024, 3, 1), 99.0),
            // partial bar for the running month
            PricePoint::new(d(2024, 3, 15), 121.0),
        ];
        let factors: Vec<FactorRow> = (1..=3)
            .map(|m| factor_row(d(2024, m, 1), 0.02, Some(0.004)))
            .collect();

        let merged = Merger::new(Frequency::Monthly).merge(&prices, &factors);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].date, d(2024, 3, 1));
        assert_relative_eq!(merged[1].simple_return.unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(merged[1].excess_return.unwrap(), 0.096, epsilon = 1e-12);
    }

    #[test]
    fn test_output_sorted_ascending() {
        let dates = [d(2024, 1, 5), d(2024, 1, 2), d(2024, 1, 4), d(2024, 1, 3)];
        let prices: Vec<PricePoint> = dates
            .iter()
            .map(|&date| PricePoint::new(date, 100.0))
            .collect();
        let factors: Vec<FactorRow> = dates
            .iter()
            .map(|&date| factor_row(date, 0.0, Some(0.0)))
            .collect();

        let merged = merge(&prices, &factors);
        assert!(merged.windows(2).all(|w| w[0].date < w[1].date));
    }
}
