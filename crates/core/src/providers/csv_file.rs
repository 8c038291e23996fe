use chrono::NaiveDate;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceSeries};

use super::traits::PriceSeriesProvider;

/// Date formats accepted in the `Date` column, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

const DATE_COLUMN: &str = "date";
const CLOSE_COLUMN: &str = "close";

enum CsvSource {
    File(PathBuf),
    Text(String),
}

/// Reads a daily price export (e.g. a fund's historical-prices CSV).
///
/// Needs a header row with `Date` and `Close` columns (case-insensitive);
/// any other columns are ignored. Rows may be in any order; they are sorted
/// ascending. Unparseable dates, non-positive closes and duplicate dates are
/// rejected with the offending line number.
pub struct CsvPriceProvider {
    source: CsvSource,
}

impl CsvPriceProvider {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: CsvSource::File(path.into()),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: CsvSource::Text(text.into()),
        }
    }
}

impl PriceSeriesProvider for CsvPriceProvider {
    fn name(&self) -> &str {
        "CSV"
    }

    fn load(&self) -> Result<PriceSeries, CoreError> {
        match &self.source {
            CsvSource::File(path) => {
                let file = std::fs::File::open(path).map_err(|e| {
                    CoreError::FileIO(format!("Failed to open '{}': {e}", path.display()))
                })?;
                parse_price_csv(file)
            }
            CsvSource::Text(text) => parse_price_csv(text.as_bytes()),
        }
    }
}

/// Parse CSV price data into a validated series.
pub fn parse_price_csv<R: Read>(reader: R) -> Result<PriceSeries, CoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, DATE_COLUMN)?;
    let close_idx = column_index(&headers, CLOSE_COLUMN)?;

    let mut points = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = record
            .position()
            .and_then(|p| usize::try_from(p.line()).ok())
            .unwrap_or(row + 2);

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| CoreError::InvalidPriceRow {
            line,
            message: format!("unparseable date '{raw_date}'"),
        })?;

        let raw_close = record.get(close_idx).unwrap_or_default();
        let close: f64 = raw_close.parse().map_err(|_| CoreError::InvalidPriceRow {
            line,
            message: format!("unparseable close '{raw_close}'"),
        })?;
        if !close.is_finite() || close <= 0.0 {
            return Err(CoreError::InvalidPriceRow {
                line,
                message: format!("close must be positive, got {close}"),
            });
        }

        points.push(PricePoint::new(date, close));
    }

    debug!(rows = points.len(), "parsed price CSV");
    PriceSeries::from_unsorted(points)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, CoreError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
