use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single trading-day quote (date → closing price).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily closing prices, strictly ascending by date, one point per trading day.
///
/// Gaps (weekends, holidays) are expected. The series is read-only once built;
/// the simulator borrows it and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points already sorted by date.
    ///
    /// Rejects out-of-order or duplicate dates and non-positive / non-finite closes.
    /// An empty series is allowed here; `simulate` reports it as `EmptySeries`.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, CoreError> {
        for (idx, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(CoreError::InvalidSeries(format!(
                    "close on {} must be a positive number, got {}",
                    point.date, point.close
                )));
            }
            if idx > 0 {
                let prev = points[idx - 1].date;
                if point.date == prev {
                    return Err(CoreError::InvalidSeries(format!(
                        "duplicate date {}",
                        point.date
                    )));
                }
                if point.date < prev {
                    return Err(CoreError::InvalidSeries(format!(
                        "dates must be ascending: {} follows {}",
                        point.date, prev
                    )));
                }
            }
        }
        Ok(Self { points })
    }

    /// Sort the points by date, then validate as in [`PriceSeries::new`].
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, CoreError> {
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Exact-date lookup. Uses binary search (O(log n)).
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].close)
    }

    /// Index of the first trading day on or after `date`, or `None` when
    /// `date` is past the last quote.
    pub fn index_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.points.partition_point(|p| p.date < date);
        (idx < self.points.len()).then_some(idx)
    }

    /// The first trading day on or after `date` (forward fill).
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<&PricePoint> {
        self.index_on_or_after(date).map(|idx| &self.points[idx])
    }

    /// The last trading day of a calendar year, if that year has any quotes.
    pub fn last_in_year(&self, year: i32) -> Option<&PricePoint> {
        let end = self.points.partition_point(|p| p.date.year() <= year);
        end.checked_sub(1)
            .map(|idx| &self.points[idx])
            .filter(|p| p.date.year() == year)
    }

    /// Distinct calendar years present in the series, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.points.iter().map(|p| p.date.year()).collect();
        years.dedup();
        years
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = CoreError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}
