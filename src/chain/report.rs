//! Time-windowed aggregation over the chain
//!
//! Reports scan the non-genesis blocks in chain order and total the
//! amounts whose timestamps fall inside the requested window.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::chain::{Block, InvoiceRecord};
use crate::constants::AMOUNT_SCALE;
use crate::error::Error;

/// Reporting window, evaluated against "now" at call time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Blocks no more than seven elapsed days old
    Weekly,
    /// Blocks from the current calendar month
    Monthly,
    /// Blocks from the current calendar year
    Yearly,
    /// Every non-genesis block
    All,
}

impl Period {
    /// Whether a block stamped at `at` falls inside this window
    pub fn includes(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Period::Weekly => (now - at).num_days() <= 7,
            Period::Monthly => at.month() == now.month() && at.year() == now.year(),
            Period::Yearly => at.year() == now.year(),
            Period::All => true,
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            "all" => Ok(Period::All),
            other => Err(Error::Config(format!("unknown report period '{other}'"))),
        }
    }
}

/// Aggregation result: matching payloads in chain order, plus their total
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Sum of entry amounts, rounded to two decimal places
    pub total: Decimal,
    /// Matching invoice records, in chain order
    pub entries: Vec<InvoiceRecord>,
}

/// Build a report over `blocks`, evaluating the window against `now`
///
/// The genesis block never contributes. A block whose timestamp fails to
/// parse is skipped with a warning so one bad record cannot hide the rest.
pub fn build_report(blocks: &[Block], period: Period, now: DateTime<Utc>) -> Report {
    let mut entries = Vec::new();

    for block in blocks.iter().skip(1) {
        let at = match DateTime::parse_from_rfc3339(&block.timestamp) {
            Ok(at) => at.with_timezone(&Utc),
            Err(err) => {
                tracing::warn!(index = block.index, %err, "skipping block with unparsable timestamp");
                continue;
            }
        };

        if period.includes(at, now) {
            entries.push(block.invoice.clone());
        }
    }

    let total: Decimal = entries.iter().map(|e| e.amount).sum();

    Report {
        total: total.round_dp(AMOUNT_SCALE),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::create_genesis_block;
    use crate::crypto::sha256_hex;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn chained(timestamps_and_amounts: &[(&str, Decimal)]) -> Vec<Block> {
        let mut chain = vec![create_genesis_block()];
        for (i, (ts, amount)) in timestamps_and_amounts.iter().enumerate() {
            let previous_hash = chain[chain.len() - 1].hash.clone();
            chain.push(Block::new(
                (i + 1) as u64,
                ts.to_string(),
                InvoiceRecord {
                    file_name: format!("invoice_{i}.jpg"),
                    amount: *amount,
                },
                previous_hash,
            ));
        }
        chain
    }

    #[test]
    fn test_period_parsing_case_insensitive() {
        assert_eq!("WEEKLY".parse::<Period>().unwrap(), Period::Weekly);
        assert_eq!("Monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert_eq!("yearly".parse::<Period>().unwrap(), Period::Yearly);
        assert_eq!("All".parse::<Period>().unwrap(), Period::All);
        assert!("quarterly".parse::<Period>().is_err());
    }

    #[test]
    fn test_weekly_window_uses_elapsed_days() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        assert!(Period::Weekly.includes(at("2026-03-08T13:00:00+00:00"), now));
        assert!(!Period::Weekly.includes(at("2026-03-07T11:00:00+00:00"), now));
    }

    #[test]
    fn test_monthly_window_requires_same_month_and_year() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        assert!(Period::Monthly.includes(at("2026-03-01T00:00:00+00:00"), now));
        assert!(!Period::Monthly.includes(at("2026-02-28T00:00:00+00:00"), now));
        assert!(!Period::Monthly.includes(at("2025-03-15T12:00:00+00:00"), now));
    }

    #[test]
    fn test_yearly_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        assert!(Period::Yearly.includes(at("2026-01-01T00:00:00+00:00"), now));
        assert!(!Period::Yearly.includes(at("2025-12-31T23:59:59+00:00"), now));
    }

    #[test]
    fn test_report_skips_genesis() {
        let chain = chained(&[("2026-03-10T10:00:00+00:00", dec!(100.00))]);
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let report = build_report(&chain, Period::All, now);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.total, dec!(100.00));
    }

    #[test]
    fn test_empty_report_totals_zero() {
        let chain = vec![create_genesis_block()];
        let now = Utc::now();
        for period in [Period::Weekly, Period::Monthly, Period::Yearly, Period::All] {
            let report = build_report(&chain, period, now);
            assert!(report.entries.is_empty());
            assert_eq!(report.total, Decimal::ZERO);
        }
    }

    #[test]
    fn test_malformed_timestamp_skipped() {
        let mut chain = chained(&[
            ("2026-03-10T10:00:00+00:00", dec!(10.00)),
            ("2026-03-11T10:00:00+00:00", dec!(20.00)),
        ]);
        // simulate a tampered record
        chain[1] = Block::new(
            1,
            "not-a-timestamp".to_string(),
            chain[1].invoice.clone(),
            sha256_hex(b"prev"),
        );

        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let report = build_report(&chain, Period::All, now);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.total, dec!(20.00));
    }

    #[test]
    fn test_total_rounded_to_two_decimals() {
        let chain = chained(&[
            ("2026-03-10T10:00:00+00:00", dec!(0.105)),
            ("2026-03-11T10:00:00+00:00", dec!(0.105)),
        ]);
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let report = build_report(&chain, Period::All, now);
        assert_eq!(report.total, dec!(0.21));
    }
}
