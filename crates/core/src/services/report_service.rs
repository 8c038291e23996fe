use serde::Serialize;
use std::fmt::Write as _;

use crate::errors::CoreError;
use crate::models::comparison::StrategyComparison;
use crate::models::simulation::SimulationResult;

/// Renders results into report-ready text.
///
/// The core computes all the numbers; callers decide where the text goes
/// (stdout, a file, a plotting tool). Nothing here prints.
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    /// Fixed-width yearly table with a running share total and a grand-total line.
    pub fn yearly_table(&self, result: &SimulationResult) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<6} {:>10} {:>14} {:>14} {:>16}",
            "Year", "Purchases", "Spent", "Shares", "Cumulative"
        );
        let cumulative = result.cumulative_shares();
        for (record, (_, running)) in result.by_year.values().zip(cumulative) {
            let _ = writeln!(
                out,
                "{:<6} {:>10} {:>14.2} {:>14.4} {:>16.4}",
                record.year, record.purchase_count, record.total_spent, record.total_shares, running
            );
        }
        let _ = writeln!(
            out,
            "{:<6} {:>10} {:>14.2} {:>14.4}",
            "Total",
            result.purchase_count(),
            result.total_spent(),
            result.total_shares
        );
        out
    }

    /// Per-year comparison table. Missing sides print as `-`.
    pub fn comparison_table(
        &self,
        comparison: &StrategyComparison,
        label_a: &str,
        label_b: &str,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<6} {:>14} {:>14} {:>10}",
            "Year", label_a, label_b, "Diff %"
        );
        for row in comparison.rows.values() {
            let _ = writeln!(
                out,
                "{:<6} {:>14} {:>14} {:>10}",
                row.year,
                fmt_opt(row.shares_a, 4),
                fmt_opt(row.shares_b, 4),
                fmt_opt(row.pct_diff.map(|p| p * 100.0), 2),
            );
        }
        let _ = writeln!(
            out,
            "{:<6} {:>14.4} {:>14.4} {:>10}",
            "Total",
            comparison.total_shares_a,
            comparison.total_shares_b,
            fmt_opt(comparison.total_pct_diff().map(|p| p * 100.0), 2),
        );
        out
    }

    /// Yearly summary as CSV.
    /// Columns: year, purchase_count, total_spent, total_shares, cumulative_shares
    pub fn yearly_csv(&self, result: &SimulationResult) -> Result<String, CoreError> {
        let rows = result
            .by_year
            .values()
            .zip(result.cumulative_shares())
            .map(|(r, (_, cumulative_shares))| YearlyCsvRow {
                year: r.year,
                purchase_count: r.purchase_count,
                total_spent: r.total_spent,
                total_shares: r.total_shares,
                cumulative_shares,
            });
        write_csv(rows)
    }

    /// Every purchase as CSV.
    /// Columns: date, price, amount_spent, shares_bought, total_shares, remaining_limit
    pub fn ledger_csv(&self, result: &SimulationResult) -> Result<String, CoreError> {
        write_csv(result.ledger.iter())
    }

    /// Full result as pretty JSON.
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String, CoreError> {
        serde_json::to_string_pretty(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize report: {e}")))
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct YearlyCsvRow {
    year: i32,
    purchase_count: usize,
    total_spent: f64,
    total_shares: f64,
    cumulative_shares: f64,
}

fn write_csv<I, T>(rows: I) -> Result<String, CoreError>
where
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Serialization(format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| CoreError::Serialization(format!("CSV output is not UTF-8: {e}")))
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}
