use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceSeries};

use super::traits::PriceSeriesProvider;

/// Serves a series held in memory (fixtures, data already loaded elsewhere).
pub struct StaticPriceProvider {
    points: Vec<PricePoint>,
}

impl StaticPriceProvider {
    /// Points may be in any order; they are sorted and validated on `load`.
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }
}

impl PriceSeriesProvider for StaticPriceProvider {
    fn name(&self) -> &str {
        "Static"
    }

    fn load(&self) -> Result<PriceSeries, CoreError> {
        PriceSeries::from_unsorted(self.points.clone())
    }
}
