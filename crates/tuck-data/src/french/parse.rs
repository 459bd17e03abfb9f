//! Parser for the Fama-French 5-factor CSV tables.
//!
//! The files carry a few lines of free text, a header row
//! (`,Mkt-RF,SMB,HML,RMW,CMA,RF`), the data rows keyed by `YYYYMMDD` or
//! `YYYYMM`, and for monthly files a second block of annual rows keyed by
//! `YYYY` followed by a copyright footer. Only rows whose key matches the
//! frequency's date pattern exactly are kept.

use crate::error::{DataError, Result};
use crate::types::{Factor, FactorRow, Frequency};
use tracing::debug;

/// Values the library uses to mark unavailable observations.
const MISSING_SENTINELS: [f64; 2] = [-99.99, -999.0];

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    factors: [(Factor, usize); 5],
    rf: usize,
}

impl Columns {
    fn from_header(record: &csv::StringRecord) -> Option<Self> {
        let position = |label: &str| {
            record
                .iter()
                .position(|field| field.trim().eq_ignore_ascii_case(label))
        };

        let mut factors = [(Factor::MktRf, 0); 5];
        for (slot, factor) in factors.iter_mut().zip(Factor::ALL) {
            *slot = (factor, position(factor.label())?);
        }

        Some(Self {
            factors,
            rf: position("RF")?,
        })
    }
}

/// Parse a percentage cell into a decimal fraction.
///
/// Blank, non-numeric and sentinel cells yield `None`.
pub fn parse_percent(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().parse().ok()?;
    if !value.is_finite() || MISSING_SENTINELS.iter().any(|s| (value - s).abs() < 1e-9) {
        return None;
    }
    Some(value / 100.0)
}

/// Parse the text of a factor CSV into rows sorted by date.
pub fn parse_factor_csv(text: &str, frequency: Frequency) -> Result<Vec<FactorRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut columns: Option<Columns> = None;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let Some(key) = record.get(0) else {
            continue;
        };

        let Some(cols) = columns else {
            columns = Columns::from_header(&record);
            continue;
        };

        let Some(date) = frequency.parse_date_key(key) else {
            skipped += 1;
            continue;
        };

        let mut row = FactorRow::empty(date);
        for (factor, idx) in cols.factors {
            row.set(factor, record.get(idx).and_then(parse_percent));
        }
        row.rf = record.get(cols.rf).and_then(parse_percent);
        rows.push(row);
    }

    if columns.is_none() {
        return Err(DataError::Parse(
            "factor table header (Mkt-RF, SMB, HML, RMW, CMA, RF) not found".to_string(),
        ));
    }

    rows.sort_by_key(|r| r.date);
    rows.dedup_by_key(|r| r.date);

    debug!(rows = rows.len(), skipped, %frequency, "parsed factor table");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    const MONTHLY: &str = "\
This file was created by CMPT_ME_BEME_OP_INV_RETS using the 202401 CRSP database.
The 1-month TBill return is from Ibbotson and Associates Inc.

,Mkt-RF,SMB,HML,RMW,CMA,RF
196307,   -0.39,   -0.41,   -0.97,    0.68,   -1.18,    0.27
196308,    5.07,   -0.80,    1.80,    0.36,   -0.35,    0.25
196309,   -1.57,   -0.52,    0.13,   -0.71,    0.29,  -99.99

 Annual Factors: January-December
,Mkt-RF,SMB,HML,RMW,CMA,RF
1964,   12.51,    0.37,    9.08,    0.81,    6.63,    3.54

Copyright 2024 Eugene F. Fama and Kenneth R. French
";

    const DAILY: &str = "\
This file was created using the 202401 CRSP database.

,Mkt-RF,SMB,HML,RMW,CMA,RF
20240102,   -0.71,    0.71,    1.04,    0.22,    0.15,    0.021
20240103,   -1.01,   -0.31,    0.22,    0.30,    0.01,    n/a
20240104,    ,    0.14,    0.39,   -0.02,    0.24,    0.021
";

    #[test]
    fn test_monthly_table_skips_annual_block_and_footer() {
        let rows = parse_factor_csv(MONTHLY, Frequency::Monthly).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(1963, 7, 1).unwrap());
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(1963, 9, 1).unwrap());
        assert_relative_eq!(rows[1].mkt_rf.unwrap(), 0.0507, epsilon = 1e-12);
        assert_relative_eq!(rows[0].cma.unwrap(), -0.0118, epsilon = 1e-12);
        assert_eq!(rows[2].rf, None);
    }

    #[test]
    fn test_daily_table_marks_missing_values() {
        let rows = parse_factor_csv(DAILY, Frequency::Daily).unwrap();

        assert_eq!(rows.len(), 3);
        assert_relative_eq!(rows[0].rf.unwrap(), 0.00021, epsilon = 1e-12);
        assert_eq!(rows[1].rf, None);
        assert_eq!(rows[2].mkt_rf, None);
        assert_relative_eq!(rows[2].smb.unwrap(), 0.0014, epsilon = 1e-12);
    }

    #[test]
    fn test_daily_frequency_rejects_monthly_keys() {
        let rows = parse_factor_csv(MONTHLY, Frequency::Daily).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let result = parse_factor_csv("20240102,1,2,3,4,5,6\n", Frequency::Daily);
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_parse_percent() {
        assert_relative_eq!(parse_percent(" 1.23 ").unwrap(), 0.0123, epsilon = 1e-12);
        assert_eq!(parse_percent(""), None);
        assert_eq!(parse_percent("abc"), None);
        assert_eq!(parse_percent("-99.99"), None);
        assert_eq!(parse_percent("-999"), None);
    }
}
