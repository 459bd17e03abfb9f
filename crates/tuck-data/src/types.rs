//! Value types shared by the retrieval layer and the regression core.

use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sampling frequency of both the price series and the factor dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum Frequency {
    /// One observation per trading day.
    #[default]
    #[display("daily")]
    Daily,
    /// One observation per calendar month.
    #[display("monthly")]
    Monthly,
}

impl Frequency {
    /// Interval string understood by the Yahoo Finance chart endpoint.
    pub const fn yahoo_interval(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Monthly => "1mo",
        }
    }

    /// Number of digits in a factor-table date key (`YYYYMMDD` or `YYYYMM`).
    pub const fn date_key_len(&self) -> usize {
        match self {
            Self::Daily => 8,
            Self::Monthly => 6,
        }
    }

    /// Parse a factor-table date key.
    ///
    /// Only keys made of exactly [`Self::date_key_len`] ASCII digits that form a
    /// valid calendar date are accepted. Monthly keys map to the first day of
    /// the month.
    pub fn parse_date_key(&self, key: &str) -> Option<NaiveDate> {
        let key = key.trim();
        if key.len() != self.date_key_len() || !key.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let year: i32 = key[0..4].parse().ok()?;
        let month: u32 = key[4..6].parse().ok()?;
        let day: u32 = match self {
            Self::Daily => key[6..8].parse().ok()?,
            Self::Monthly => 1,
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Map a calendar date onto the key date of the period containing it.
    pub fn align(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Monthly => date.with_day(1).unwrap_or(date),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "1d" | "daily" => Ok(Self::Daily),
            "m" | "1mo" | "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown frequency '{other}' (expected daily or monthly)")),
        }
    }
}

/// One of the five Fama-French regressors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
pub enum Factor {
    /// Market excess return.
    #[display("Mkt-RF")]
    MktRf,
    /// Small minus big.
    #[display("SMB")]
    Smb,
    /// High minus low book-to-market.
    #[display("HML")]
    Hml,
    /// Robust minus weak profitability.
    #[display("RMW")]
    Rmw,
    /// Conservative minus aggressive investment.
    #[display("CMA")]
    Cma,
}

impl Factor {
    /// All factors in table order.
    pub const ALL: [Self; 5] = [Self::MktRf, Self::Smb, Self::Hml, Self::Rmw, Self::Cma];

    /// Column label used by the Ken French files and the summary table.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MktRf => "Mkt-RF",
            Self::Smb => "SMB",
            Self::Hml => "HML",
            Self::Rmw => "RMW",
            Self::Cma => "CMA",
        }
    }
}

impl FromStr for Factor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown factor '{wanted}'"))
    }
}

/// A single adjusted-close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Adjusted close price.
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub const fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// One row of the factor table, in decimal fractions.
///
/// `None` marks an entry that was missing or non-numeric in the source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorRow {
    /// Period key date (first of month for monthly data).
    pub date: NaiveDate,
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
    /// Risk-free rate.
    pub rf: Option<f64>,
}

impl FactorRow {
    /// Row with every value missing.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }

    /// Value of a single factor.
    pub const fn get(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::MktRf => self.mkt_rf,
            Factor::Smb => self.smb,
            Factor::Hml => self.hml,
            Factor::Rmw => self.rmw,
            Factor::Cma => self.cma,
        }
    }

    /// Set a single factor value.
    pub const fn set(&mut self, factor: Factor, value: Option<f64>) {
        match factor {
            Factor::MktRf => self.mkt_rf = value,
            Factor::Smb => self.smb = value,
            Factor::Hml => self.hml = value,
            Factor::Rmw => self.rmw = value,
            Factor::Cma => self.cma = value,
        }
    }
}
