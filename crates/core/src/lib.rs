pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::{
    comparison::StrategyComparison,
    price::PriceSeries,
    simulation::SimulationResult,
    strategy::{Cadence, StrategyConfig},
};
use providers::traits::PriceSeriesProvider;
use services::{
    comparison_service::ComparisonService, report_service::ReportService,
    simulation_service::SimulationService,
};

use errors::CoreError;

/// Main entry point for the ira-shares core library.
/// Holds one price series and the services that run strategies against it.
#[must_use]
pub struct ContributionPlanner {
    series: PriceSeries,
    simulation_service: SimulationService,
    comparison_service: ComparisonService,
    report_service: ReportService,
}

impl std::fmt::Debug for ContributionPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContributionPlanner")
            .field("points", &self.series.len())
            .field("first", &self.series.first().map(|p| p.date))
            .field("last", &self.series.last().map(|p| p.date))
            .finish()
    }
}

impl ContributionPlanner {
    /// Wrap an already validated series.
    pub fn new(series: PriceSeries) -> Self {
        Self::build(series, SimulationService::new())
    }

    /// Load the series from any provider (CSV file, in-memory fixture, ...).
    pub fn from_provider(provider: &dyn PriceSeriesProvider) -> Result<Self, CoreError> {
        let series = provider.load()?;
        tracing::info!(provider = provider.name(), points = series.len(), "price series loaded");
        Ok(Self::new(series))
    }

    /// Like [`ContributionPlanner::new`], refusing to simulate series longer than `max_points`.
    pub fn with_max_points(series: PriceSeries, max_points: usize) -> Self {
        Self::build(series, SimulationService::with_max_points(max_points))
    }

    #[must_use]
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    // ── Simulation ──────────────────────────────────────────────────

    /// Run any strategy config against the series.
    pub fn simulate(&self, config: &StrategyConfig) -> Result<SimulationResult, CoreError> {
        self.simulation_service.simulate(&self.series, config)
    }

    /// Invest `annual_limit` once per year, on each year's last trading day.
    pub fn lump_sum(&self, annual_limit: f64) -> Result<SimulationResult, CoreError> {
        self.simulate(&StrategyConfig::lump_sum(annual_limit))
    }

    /// Spread `annual_limit` evenly over the cadence's purchases.
    pub fn dca(&self, annual_limit: f64, cadence: Cadence) -> Result<SimulationResult, CoreError> {
        self.simulate(&StrategyConfig::spread(annual_limit, cadence))
    }

    /// Run several configs in parallel; results keep the order of `configs`.
    pub fn simulate_batch(
        &self,
        configs: &[StrategyConfig],
    ) -> Vec<Result<SimulationResult, CoreError>> {
        self.simulation_service.simulate_batch(&self.series, configs)
    }

    // ── Comparison ──────────────────────────────────────────────────

    /// Compare two existing results year by year (`a` against `b`).
    pub fn compare(
        &self,
        a: &SimulationResult,
        b: &SimulationResult,
    ) -> Result<StrategyComparison, CoreError> {
        self.comparison_service.compare(a, b)
    }

    /// Simulate both configs and compare them.
    pub fn compare_strategies(
        &self,
        a: &StrategyConfig,
        b: &StrategyConfig,
    ) -> Result<StrategyComparison, CoreError> {
        let result_a = self.simulate(a)?;
        let result_b = self.simulate(b)?;
        self.compare(&result_a, &result_b)
    }

    /// Lump sum (side a) against DCA spread over `cadence` (side b), same annual limit.
    pub fn lump_sum_vs_dca(
        &self,
        annual_limit: f64,
        cadence: Cadence,
    ) -> Result<StrategyComparison, CoreError> {
        self.compare_strategies(
            &StrategyConfig::lump_sum(annual_limit),
            &StrategyConfig::spread(annual_limit, cadence),
        )
    }

    // ── Reports ─────────────────────────────────────────────────────

    #[must_use]
    pub fn yearly_table(&self, result: &SimulationResult) -> String {
        self.report_service.yearly_table(result)
    }

    #[must_use]
    pub fn comparison_table(
        &self,
        comparison: &StrategyComparison,
        label_a: &str,
        label_b: &str,
    ) -> String {
        self.report_service
            .comparison_table(comparison, label_a, label_b)
    }

    pub fn yearly_csv(&self, result: &SimulationResult) -> Result<String, CoreError> {
        self.report_service.yearly_csv(result)
    }

    pub fn ledger_csv(&self, result: &SimulationResult) -> Result<String, CoreError> {
        self.report_service.ledger_csv(result)
    }

    /// Export a result as pretty JSON.
    pub fn result_to_json(&self, result: &SimulationResult) -> Result<String, CoreError> {
        self.report_service.to_json(result)
    }

    /// Export a comparison as pretty JSON.
    pub fn comparison_to_json(&self, comparison: &StrategyComparison) -> Result<String, CoreError> {
        self.report_service.to_json(comparison)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(series: PriceSeries, simulation_service: SimulationService) -> Self {
        Self {
            series,
            simulation_service,
            comparison_service: ComparisonService::new(),
            report_service: ReportService::new(),
        }
    }
}
