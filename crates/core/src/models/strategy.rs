use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// How often contributions are made.
///
/// Trading calendars have gaps, so every DCA cadence first produces calendar
/// target dates, each of which is then filled forward to the next quoted day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Every 7 days from the schedule anchor
    Weekly,
    /// Same day-of-month as the anchor, clamped to the end of shorter months
    Monthly,
    /// Fixed step of `n` days (`EveryDays(30)` is the 30-day month approximation)
    EveryDays(u32),
    /// Lump sum: the whole annual limit once, on the last trading day of each year
    Annual,
}

impl Cadence {
    /// Nominal number of purchases in a calendar year.
    pub fn purchases_per_year(&self) -> f64 {
        match self {
            Cadence::Weekly => 52.0,
            Cadence::Monthly => 12.0,
            Cadence::EveryDays(n) => 365.0 / f64::from(*n),
            Cadence::Annual => 1.0,
        }
    }

    pub fn is_lump_sum(&self) -> bool {
        matches!(self, Cadence::Annual)
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cadence::Weekly => write!(f, "weekly"),
            Cadence::Monthly => write!(f, "monthly"),
            Cadence::EveryDays(n) => write!(f, "every {n} days"),
            Cadence::Annual => write!(f, "annual"),
        }
    }
}

impl FromStr for Cadence {
    type Err = CoreError;

    /// Accepts `weekly`/`week`, `monthly`/`month`, `annual`/`lump`/`lump_sum`
    /// and `<n>d` (e.g. `30d`). Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "weekly" | "week" => Ok(Cadence::Weekly),
            "monthly" | "month" => Ok(Cadence::Monthly),
            "annual" | "lump" | "lump_sum" => Ok(Cadence::Annual),
            other => other
                .strip_suffix('d')
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .map(Cadence::EveryDays)
                .ok_or_else(|| {
                    CoreError::InvalidConfig(format!(
                        "unrecognized cadence '{s}' (expected weekly, monthly, annual or <n>d)"
                    ))
                }),
        }
    }
}

/// A contribution strategy: how much may go in per calendar year, how much
/// each purchase spends, and how often purchases happen.
///
/// `per_purchase_amount × purchases-per-year` is expected to approximate
/// `annual_limit`, but the simulator enforces the ceiling on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Contribution ceiling per calendar year
    pub annual_limit: f64,

    /// Amount spent by each scheduled purchase (equals `annual_limit` for lump sums)
    pub per_purchase_amount: f64,

    /// Purchase frequency
    pub cadence: Cadence,

    /// First schedule target date; defaults to the first date of the series
    #[serde(default)]
    pub start: Option<NaiveDate>,
}

impl StrategyConfig {
    /// Dollar-cost averaging with an explicit per-purchase amount.
    pub fn dca(annual_limit: f64, per_purchase_amount: f64, cadence: Cadence) -> Self {
        Self {
            annual_limit,
            per_purchase_amount,
            cadence,
            start: None,
        }
    }

    /// Dollar-cost averaging that spreads `annual_limit` evenly over the
    /// cadence's nominal purchases per year (limit / 52 weekly, limit / 12 monthly).
    pub fn spread(annual_limit: f64, cadence: Cadence) -> Self {
        Self::dca(
            annual_limit,
            annual_limit / cadence.purchases_per_year(),
            cadence,
        )
    }

    /// The whole annual limit invested once per year.
    pub fn lump_sum(annual_limit: f64) -> Self {
        Self::dca(annual_limit, annual_limit, Cadence::Annual)
    }

    /// Anchor the purchase schedule at `start` instead of the series' first date.
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Load a config from JSON. Validation happens when it is simulated.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject configs that cannot produce a meaningful simulation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.annual_limit.is_finite() || self.annual_limit <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "annual limit must be positive, got {}",
                self.annual_limit
            )));
        }
        if !self.per_purchase_amount.is_finite() || self.per_purchase_amount <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "per-purchase amount must be positive, got {}",
                self.per_purchase_amount
            )));
        }
        if self.cadence == Cadence::EveryDays(0) {
            return Err(CoreError::InvalidConfig(
                "cadence step must be at least one day".into(),
            ));
        }
        Ok(())
    }
}
