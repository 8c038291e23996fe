use thiserror::Error;

/// Unified error type for the entire ira-shares-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Simulation ──────────────────────────────────────────────────
    #[error("Invalid strategy configuration: {0}")]
    InvalidConfig(String),

    #[error("Price series is empty: nothing to simulate")]
    EmptySeries,

    #[error("The two simulations share no common year")]
    NoComparableYears,

    // ── Price series ────────────────────────────────────────────────
    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Invalid price row at line {line}: {message}")]
    InvalidPriceRow { line: usize, message: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    // ── File I/O / formats ──────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        // A csv error wrapping an I/O failure is reported as such
        if e.is_io_error() {
            return CoreError::FileIO(e.to_string());
        }
        CoreError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
