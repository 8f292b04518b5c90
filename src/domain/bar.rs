//! Daily bar representation.
//!
//! Bars arrive in non-decreasing date order per instrument. The engine
//! only consumes close and volume; richer feeds collapse to this shape.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Bar {
    pub code: String,
    pub exchange: String,
    pub date: NaiveDate,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// price × volume, the liquidity proxy used by the coarse filter.
    pub fn dollar_volume(&self) -> f64 {
        self.close * self.volume as f64
    }
}
