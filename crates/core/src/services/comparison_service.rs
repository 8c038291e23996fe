use std::collections::BTreeMap;
use tracing::info;

use crate::errors::CoreError;
use crate::models::comparison::{relative_difference, StrategyComparison, YearComparison};
use crate::models::simulation::SimulationResult;

/// Compares two simulation results year by year.
pub struct ComparisonService;

impl ComparisonService {
    pub fn new() -> Self {
        Self
    }

    /// Build the per-year table for the union of both results' years.
    ///
    /// A year missing from one side is reported with that side as `None` and
    /// no `pct_diff`; it is never treated as zero shares. Fails with
    /// `NoComparableYears` if no year appears in both results.
    pub fn compare(
        &self,
        a: &SimulationResult,
        b: &SimulationResult,
    ) -> Result<StrategyComparison, CoreError> {
        let mut rows: BTreeMap<i32, YearComparison> = BTreeMap::new();

        for year in a.by_year.keys().chain(b.by_year.keys()) {
            rows.entry(*year).or_insert_with(|| {
                let shares_a = a.record(*year).map(|r| r.total_shares);
                let shares_b = b.record(*year).map(|r| r.total_shares);
                let pct_diff = match (shares_a, shares_b) {
                    (Some(sa), Some(sb)) => relative_difference(sa, sb),
                    _ => None,
                };
                YearComparison {
                    year: *year,
                    shares_a,
                    shares_b,
                    pct_diff,
                }
            });
        }

        let common = rows
            .values()
            .filter(|r| r.shares_a.is_some() && r.shares_b.is_some())
            .count();
        if common == 0 {
            return Err(CoreError::NoComparableYears);
        }

        info!(
            years = rows.len(),
            common,
            cadence_a = %a.cadence,
            cadence_b = %b.cadence,
            "strategies compared"
        );

        Ok(StrategyComparison {
            rows,
            total_shares_a: a.total_shares,
            total_shares_b: b.total_shares,
        })
    }
}

impl Default for ComparisonService {
    fn default() -> Self {
        Self::new()
    }
}
