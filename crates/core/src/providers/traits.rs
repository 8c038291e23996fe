use crate::errors::CoreError;
use crate::models::price::PriceSeries;

/// Source of a validated daily price series.
///
/// The simulator only ever sees a `PriceSeries`; where it came from (a CSV
/// export, a fixture, some other store) stays behind this trait. Rows are
/// validated here, not in the simulator.
pub trait PriceSeriesProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Load the full series, ascending by date with no duplicate dates.
    fn load(&self) -> Result<PriceSeries, CoreError>;
}
