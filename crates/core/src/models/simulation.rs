use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::strategy::Cadence;

/// One executed purchase.
///
/// Purchases are never synthesized: `price` is always a quoted close from the
/// series, on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    /// Trading day the purchase executed on
    pub date: NaiveDate,

    /// Closing price paid
    pub price: f64,

    /// Amount invested (full per-purchase amount, or the partial remainder of the limit)
    pub amount_spent: f64,

    /// `amount_spent / price`
    pub shares_bought: f64,

    /// Running share total across the whole ledger, including this purchase
    pub total_shares: f64,

    /// Annual budget left in this purchase's calendar year after it executed
    pub remaining_limit: f64,
}

/// Aggregated activity for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub year: i32,

    /// Shares bought during the year
    pub total_shares: f64,

    /// Amount contributed during the year (never above the annual limit)
    pub total_spent: f64,

    /// Number of executed purchases
    pub purchase_count: usize,
}

/// Output of one simulation run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Cadence the result was produced with
    pub cadence: Cadence,

    /// Annual contribution ceiling used
    pub annual_limit: f64,

    /// Every executed purchase, in date order
    pub ledger: Vec<PurchaseEvent>,

    /// Per-year aggregates. Years without trading days have no entry.
    pub by_year: BTreeMap<i32, YearlyRecord>,

    /// Sum of `shares_bought` over the whole ledger
    pub total_shares: f64,
}

impl SimulationResult {
    /// Years with at least one purchase, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    pub fn record(&self, year: i32) -> Option<&YearlyRecord> {
        self.by_year.get(&year)
    }

    pub fn purchase_count(&self) -> usize {
        self.ledger.len()
    }

    /// Total amount contributed over all years.
    pub fn total_spent(&self) -> f64 {
        self.by_year.values().map(|r| r.total_spent).sum()
    }

    /// Average price paid per share (total spent / total shares).
    pub fn average_price(&self) -> Option<f64> {
        if self.total_shares > 0.0 {
            Some(self.total_spent() / self.total_shares)
        } else {
            None
        }
    }

    /// Shares owned at the end of each year: (year, running total).
    pub fn cumulative_shares(&self) -> Vec<(i32, f64)> {
        let mut running = 0.0;
        self.by_year
            .values()
            .map(|r| {
                running += r.total_shares;
                (r.year, running)
            })
            .collect()
    }
}
