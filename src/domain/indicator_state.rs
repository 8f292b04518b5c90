//! Per-instrument indicator bookkeeping.
//!
//! One `IndicatorState` bundles the EMA stack (fastest to slowest) and the
//! momentum accumulator for a single instrument. Accumulators only accept
//! strictly increasing dates; a bar at or before the last applied date is
//! reported as stale and skipped, so the live feed and the coarse filter
//! can both touch the same instrument on the same day without
//! double-applying a sample.

use chrono::NaiveDate;

use super::bar::Bar;
use super::indicator::{Ema, MomentumPercent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Applied { ready: bool },
    Stale,
}

#[derive(Debug, Clone)]
pub struct IndicatorState {
    emas: Vec<Ema>,
    momentum: MomentumPercent,
    last_date: Option<NaiveDate>,
    last_close: f64,
}

impl IndicatorState {
    /// `ema_windows` must be ordered fastest (shortest) to slowest.
    pub fn new(ema_windows: &[usize], momentum_window: usize) -> Self {
        IndicatorState {
            emas: ema_windows.iter().map(|&w| Ema::new(w)).collect(),
            momentum: MomentumPercent::new(momentum_window),
            last_date: None,
            last_close: 0.0,
        }
    }

    /// Apply warm-up history in chronological order. Out-of-order bars
    /// within the batch are skipped like any other stale update.
    pub fn seed(&mut self, history: &[Bar]) {
        for bar in history {
            self.update(bar.date, bar.close);
        }
    }

    pub fn update(&mut self, date: NaiveDate, close: f64) -> UpdateStatus {
        if let Some(last) = self.last_date {
            if date <= last {
                return UpdateStatus::Stale;
            }
        }
        for ema in &mut self.emas {
            ema.update(close);
        }
        self.momentum.update(close);
        self.last_date = Some(date);
        self.last_close = close;
        UpdateStatus::Applied {
            ready: self.is_ready(),
        }
    }

    /// True only when every accumulator has filled its window.
    pub fn is_ready(&self) -> bool {
        self.emas.iter().all(Ema::is_ready) && self.momentum.is_ready()
    }

    /// EMA values fastest to slowest, or `None` until ready.
    pub fn averages(&self) -> Option<Vec<f64>> {
        if !self.is_ready() {
            return None;
        }
        Some(self.emas.iter().map(Ema::value).collect())
    }

    pub fn momentum_score(&self) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        Some(self.momentum.value())
    }

    pub fn last_close(&self) -> Option<f64> {
        self.last_date.map(|_| self.last_close)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(n as u64 - 1)
    }

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                code: "TEST".into(),
                exchange: "TEST".into(),
                date: day(i as u32 + 1),
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn ready_after_slowest_window_fills() {
        let mut state = IndicatorState::new(&[2, 3], 4);
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);

        for bar in &bars[..4] {
            state.update(bar.date, bar.close);
            assert!(!state.is_ready());
        }
        state.update(bars[4].date, bars[4].close);
        assert!(state.is_ready());
    }

    #[test]
    fn stale_update_is_skipped() {
        let mut state = IndicatorState::new(&[2], 2);
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        for bar in &bars {
            assert!(matches!(
                state.update(bar.date, bar.close),
                UpdateStatus::Applied { .. }
            ));
        }

        let before = state.momentum_score();
        assert_eq!(state.update(bars[2].date, 999.0), UpdateStatus::Stale);
        assert_eq!(state.update(bars[0].date, 999.0), UpdateStatus::Stale);
        assert_eq!(state.momentum_score(), before);
    }

    #[test]
    fn seed_then_live_updates() {
        let mut state = IndicatorState::new(&[2], 2);
        let bars = make_bars(&[100.0, 102.0, 104.0, 106.0]);
        state.seed(&bars[..3]);
        assert!(state.is_ready());

        let status = state.update(bars[3].date, bars[3].close);
        assert_eq!(status, UpdateStatus::Applied { ready: true });
        let expected = ((106.0 - 102.0) / 102.0) * 100.0;
        assert!((state.momentum_score().unwrap() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn averages_none_until_ready() {
        let mut state = IndicatorState::new(&[1, 3], 1);
        state.update(day(1), 10.0);
        assert!(state.averages().is_none());
        assert!(state.momentum_score().is_none());
    }

    #[test]
    fn averages_ordered_fastest_to_slowest() {
        let mut state = IndicatorState::new(&[1, 3], 1);
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        for bar in &bars {
            state.update(bar.date, bar.close);
        }
        let avgs = state.averages().unwrap();
        assert_eq!(avgs.len(), 2);
        // Rising prices: the fast average sits above the slow one.
        assert!(avgs[0] > avgs[1]);
    }

    #[test]
    fn last_close_tracks_applied_updates_only() {
        let mut state = IndicatorState::new(&[1], 1);
        assert!(state.last_close().is_none());
        state.update(day(1), 50.0);
        state.update(day(2), 60.0);
        state.update(day(2), 70.0); // stale
        assert!((state.last_close().unwrap() - 60.0).abs() < f64::EPSILON);
        assert_eq!(state.last_date(), Some(day(2)));
    }
}
