use chrono::{Datelike, Days, Months, NaiveDate};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::price::PriceSeries;
use crate::models::simulation::{PurchaseEvent, SimulationResult, YearlyRecord};
use crate::models::strategy::{Cadence, StrategyConfig};

/// Per-year budget state while walking the purchase schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LimitState {
    WithinLimit,
    AtLimit,
}

/// Runs contribution strategies against a price series.
///
/// Pure business logic: no I/O, no shared state. Every call only reads its
/// series and config and allocates its own result, so identical inputs always
/// give identical outputs and independent calls can run on any thread.
pub struct SimulationService {
    /// Optional upper bound on series length, checked before simulating
    max_points: Option<usize>,
}

impl SimulationService {
    pub fn new() -> Self {
        Self { max_points: None }
    }

    /// Refuse series longer than `max_points` instead of simulating them.
    pub fn with_max_points(max_points: usize) -> Self {
        Self {
            max_points: Some(max_points),
        }
    }

    /// Simulate one strategy over the series.
    ///
    /// Fails with `InvalidConfig` before doing any work if the config is
    /// unusable, and with `EmptySeries` if there are no quotes at all.
    pub fn simulate(
        &self,
        series: &PriceSeries,
        config: &StrategyConfig,
    ) -> Result<SimulationResult, CoreError> {
        config.validate()?;

        if series.is_empty() {
            return Err(CoreError::EmptySeries);
        }
        if let Some(max) = self.max_points {
            if series.len() > max {
                return Err(CoreError::InvalidSeries(format!(
                    "series has {} points, limit is {max}",
                    series.len()
                )));
            }
        }

        let ledger = if config.cadence.is_lump_sum() {
            lump_sum_ledger(series, config)
        } else {
            let anchor = schedule_anchor(series, config);
            let trading_days = scheduled_trading_days(series, config.cadence, anchor);
            debug!(
                cadence = %config.cadence,
                %anchor,
                candidates = trading_days.len(),
                "mapped purchase schedule onto trading days"
            );
            enforce_annual_limit(series, &trading_days, config)
        };

        let result = aggregate(config, ledger);
        info!(
            cadence = %config.cadence,
            purchases = result.ledger.len(),
            years = result.by_year.len(),
            total_shares = result.total_shares,
            "simulation complete"
        );
        Ok(result)
    }

    /// Simulate many configs against the same series in parallel.
    ///
    /// Results come back in the order of `configs`; one failing config does
    /// not affect the others.
    pub fn simulate_batch(
        &self,
        series: &PriceSeries,
        configs: &[StrategyConfig],
    ) -> Vec<Result<SimulationResult, CoreError>> {
        configs
            .par_iter()
            .map(|config| self.simulate(series, config))
            .collect()
    }
}

impl Default for SimulationService {
    fn default() -> Self {
        Self::new()
    }
}

// ── Scheduling ──────────────────────────────────────────────────────

fn schedule_anchor(series: &PriceSeries, config: &StrategyConfig) -> NaiveDate {
    match (config.start, series.first()) {
        (Some(start), _) => start,
        (None, Some(first)) => first.date,
        (None, None) => NaiveDate::MIN,
    }
}

/// The `k`-th calendar target of a cadence, counted from `anchor` (k = 0 is the anchor).
///
/// Monthly targets are always computed from the anchor, so a 31st-of-month
/// anchor yields Feb 28/29 and then returns to the 31st where it exists.
pub fn nth_target(cadence: Cadence, anchor: NaiveDate, k: u32) -> Option<NaiveDate> {
    match cadence {
        Cadence::Weekly => anchor.checked_add_days(Days::new(7 * u64::from(k))),
        Cadence::EveryDays(n) => anchor.checked_add_days(Days::new(u64::from(n) * u64::from(k))),
        Cadence::Monthly => anchor.checked_add_months(Months::new(k)),
        Cadence::Annual => k
            .checked_mul(12)
            .and_then(|months| anchor.checked_add_months(Months::new(months))),
    }
}

/// Calendar target dates from `anchor` up to and including `until`.
pub fn target_dates(cadence: Cadence, anchor: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
    let mut targets = Vec::new();
    if cadence == Cadence::EveryDays(0) {
        return targets;
    }
    for k in 0u32.. {
        match nth_target(cadence, anchor, k) {
            Some(target) if target <= until => targets.push(target),
            _ => break,
        }
    }
    targets
}

/// Map every calendar target to the first trading day on or after it.
///
/// Returns series indices, ascending. Targets past the last quote are
/// dropped, and targets that land on the same trading day yield one entry.
pub fn scheduled_trading_days(
    series: &PriceSeries,
    cadence: Cadence,
    anchor: NaiveDate,
) -> Vec<usize> {
    let Some(last) = series.last() else {
        return Vec::new();
    };
    let mut days: Vec<usize> = target_dates(cadence, anchor, last.date)
        .into_iter()
        .filter_map(|target| series.index_on_or_after(target))
        .collect();
    days.dedup();
    days
}

// ── Limit enforcement ───────────────────────────────────────────────

fn enforce_annual_limit(
    series: &PriceSeries,
    trading_days: &[usize],
    config: &StrategyConfig,
) -> Vec<PurchaseEvent> {
    let limit = config.annual_limit;
    let amount = config.per_purchase_amount;
    let points = series.points();

    let mut ledger = Vec::with_capacity(trading_days.len());
    let mut current_year: Option<i32> = None;
    let mut spent_this_year = 0.0;
    let mut state = LimitState::WithinLimit;
    let mut skipped = 0usize;
    let mut total_shares = 0.0;

    for &idx in trading_days {
        let point = points[idx];
        let year = point.date.year();

        if current_year != Some(year) {
            if let Some(prev) = current_year {
                log_skipped(prev, skipped);
            }
            current_year = Some(year);
            spent_this_year = 0.0;
            state = LimitState::WithinLimit;
            skipped = 0;
        }

        if state == LimitState::AtLimit {
            skipped += 1;
            continue;
        }

        let spend = if spent_this_year + amount <= limit {
            spent_this_year += amount;
            amount
        } else if spent_this_year < limit {
            let partial = limit - spent_this_year;
            spent_this_year = limit;
            debug!(year, date = %point.date, partial, "partial purchase up to annual limit");
            partial
        } else {
            state = LimitState::AtLimit;
            skipped += 1;
            continue;
        };
        if spent_this_year >= limit {
            state = LimitState::AtLimit;
        }

        let shares_bought = spend / point.close;
        total_shares += shares_bought;
        ledger.push(PurchaseEvent {
            date: point.date,
            price: point.close,
            amount_spent: spend,
            shares_bought,
            total_shares,
            remaining_limit: limit - spent_this_year,
        });
    }
    if let Some(year) = current_year {
        log_skipped(year, skipped);
    }

    ledger
}

fn log_skipped(year: i32, skipped: usize) {
    if skipped > 0 {
        warn!(year, skipped, "scheduled purchases skipped after reaching the annual limit");
    }
}

// ── Lump sum ────────────────────────────────────────────────────────

/// One purchase of the full annual limit on the last trading day of each year.
fn lump_sum_ledger(series: &PriceSeries, config: &StrategyConfig) -> Vec<PurchaseEvent> {
    let limit = config.annual_limit;
    let mut total_shares = 0.0;

    series
        .years()
        .into_iter()
        .filter_map(|year| series.last_in_year(year))
        .filter(|point| config.start.map_or(true, |start| point.date >= start))
        .map(|point| {
            let shares_bought = limit / point.close;
            total_shares += shares_bought;
            PurchaseEvent {
                date: point.date,
                price: point.close,
                amount_spent: limit,
                shares_bought,
                total_shares,
                remaining_limit: 0.0,
            }
        })
        .collect()
}

// ── Aggregation ─────────────────────────────────────────────────────

fn aggregate(config: &StrategyConfig, ledger: Vec<PurchaseEvent>) -> SimulationResult {
    let mut by_year: BTreeMap<i32, YearlyRecord> = BTreeMap::new();
    for event in &ledger {
        let year = event.date.year();
        let record = by_year.entry(year).or_insert(YearlyRecord {
            year,
            total_shares: 0.0,
            total_spent: 0.0,
            purchase_count: 0,
        });
        record.total_shares += event.shares_bought;
        record.total_spent += event.amount_spent;
        record.purchase_count += 1;
    }
    let total_shares = ledger.iter().map(|e| e.shares_bought).sum();

    SimulationResult {
        cadence: config.cadence,
        annual_limit: config.annual_limit,
        ledger,
        by_year,
        total_shares,
    }
}
