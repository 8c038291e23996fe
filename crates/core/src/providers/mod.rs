pub mod traits;

// Series sources
pub mod csv_file;
pub mod static_series;
