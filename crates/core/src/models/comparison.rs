use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Side-by-side shares for one year.
///
/// A side is `None` when that simulation has no record for the year; such
/// years are reported but carry no `pct_diff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearComparison {
    pub year: i32,
    pub shares_a: Option<f64>,
    pub shares_b: Option<f64>,

    /// `(a - b) / mean(a, b)` as a fraction (0.05 = 5%), only when both sides exist
    pub pct_diff: Option<f64>,
}

/// Per-year comparison of two simulation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// One row per year present in either result
    pub rows: BTreeMap<i32, YearComparison>,

    pub total_shares_a: f64,
    pub total_shares_b: f64,
}

impl StrategyComparison {
    pub fn years(&self) -> Vec<i32> {
        self.rows.keys().copied().collect()
    }

    pub fn get(&self, year: i32) -> Option<&YearComparison> {
        self.rows.get(&year)
    }

    /// Years where both results have a record.
    pub fn common_years(&self) -> Vec<i32> {
        self.rows
            .values()
            .filter(|r| r.pct_diff.is_some())
            .map(|r| r.year)
            .collect()
    }

    /// Relative difference of the two grand totals, same formula as the per-year metric.
    pub fn total_pct_diff(&self) -> Option<f64> {
        relative_difference(self.total_shares_a, self.total_shares_b)
    }
}

/// `(a - b) / mean(a, b)`, or `None` when the mean is zero.
pub fn relative_difference(a: f64, b: f64) -> Option<f64> {
    let mean = (a + b) / 2.0;
    if mean == 0.0 {
        None
    } else {
        Some((a - b) / mean)
    }
}
