//! Momentum ranking and the trend-regime gate.
//!
//! The trend gauge compares a fast and slow EMA on a single reference
//! instrument; fast above slow reads as "uptrend, entries permitted".
//! Ranking orders the universe by momentum score descending, excluding
//! instruments whose indicators are not ready; ties keep enumeration
//! order so selection stays deterministic.

use std::cmp::Ordering;

use chrono::NaiveDate;

use super::indicator::Ema;
use super::store::IndicatorStore;

/// Reference-instrument EMA pair driving the regime flag.
///
/// Like `IndicatorState`, the gauge only accepts strictly increasing
/// dates: a close at or before the last applied date is ignored, so
/// warm-up history and the live feed can overlap without any sample
/// being applied twice.
#[derive(Debug, Clone)]
pub struct TrendGauge {
    fast: Ema,
    slow: Ema,
    last_date: Option<NaiveDate>,
}

impl TrendGauge {
    pub fn new(fast_window: usize, slow_window: usize) -> Self {
        TrendGauge {
            fast: Ema::new(fast_window),
            slow: Ema::new(slow_window),
            last_date: None,
        }
    }

    /// Apply one dated close. Returns false for stale dates, which leave
    /// both averages untouched.
    pub fn update(&mut self, date: NaiveDate, close: f64) -> bool {
        if self.last_date.is_some_and(|last| date <= last) {
            return false;
        }
        self.fast.update(close);
        self.slow.update(close);
        self.last_date = Some(date);
        true
    }

    pub fn is_ready(&self) -> bool {
        self.fast.is_ready() && self.slow.is_ready()
    }

    /// Entries are only permitted once both averages are ready and the
    /// fast one sits above the slow one. An unready gauge never permits.
    pub fn permits_entries(&self) -> bool {
        self.is_ready() && self.fast.value() > self.slow.value()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub code: String,
    pub score: f64,
}

/// Rank `universe` by momentum score descending and keep the top `n`.
///
/// Instruments without state or without full indicator windows are
/// excluded outright; they can never displace a ready candidate. With
/// fewer than `n` ready candidates the result is exactly those
/// candidates.
pub fn rank(store: &IndicatorStore, universe: &[String], n: usize) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = universe
        .iter()
        .filter_map(|code| {
            store.momentum_score(code).map(|score| RankedEntry {
                code: code.clone(),
                score,
            })
        })
        .collect();

    // Stable sort: equal scores keep universe enumeration order.
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    entries.truncate(n);
    entries
}
