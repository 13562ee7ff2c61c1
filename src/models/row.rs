//! Price row models

use chrono::NaiveDate;
use serde::Deserialize;

/// One CSV record exactly as read, every field still a string
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub open: String,
    pub close: String,
}

/// A typed price row. `open`/`close` may be NaN when the source text was not numeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

/// The two tracked price values, each drawn as its own line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Open,
    Close,
}

impl Series {
    pub fn value(&self, row: &PriceRow) -> f64 {
        match self {
            Series::Open => row.open,
            Series::Close => row.close,
        }
    }

    /// CSS class of the path drawn for this series
    pub fn css_class(&self) -> &'static str {
        match self {
            Series::Open => "open-line",
            Series::Close => "close-line",
        }
    }
}
