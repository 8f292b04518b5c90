//! Historical data access port trait.

use chrono::NaiveDate;

use crate::domain::bar::Bar;
use crate::domain::error::RotatorError;

/// Supplies warm-up history for instruments entering the tracked set.
pub trait HistoryPort {
    /// Return up to `bars` of the most recent daily bars dated at or
    /// before `as_of`, oldest first. Bars after `as_of` must never leak
    /// into the result.
    fn fetch_history(
        &self,
        code: &str,
        exchange: &str,
        as_of: NaiveDate,
        bars: usize,
    ) -> Result<Vec<Bar>, RotatorError>;
}
