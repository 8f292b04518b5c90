//! Indicator store with per-instrument locking.
//!
//! The store exclusively owns all indicator state. Two trigger paths hit
//! it concurrently: the continuous bar feed and the periodic coarse-filter
//! re-evaluation. Each instrument sits behind its own mutex so writers for
//! different instruments never contend; the outer map lock is held only
//! long enough to clone the entry's `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::NaiveDate;

use super::bar::Bar;
use super::indicator_state::{IndicatorState, UpdateStatus};

pub struct IndicatorStore {
    ema_windows: Vec<usize>,
    momentum_window: usize,
    states: RwLock<HashMap<String, Arc<Mutex<IndicatorState>>>>,
}

impl IndicatorStore {
    pub fn new(ema_windows: Vec<usize>, momentum_window: usize) -> Self {
        IndicatorStore {
            ema_windows,
            momentum_window,
            states: RwLock::new(HashMap::new()),
        }
    }

    fn entry(&self, code: &str) -> Option<Arc<Mutex<IndicatorState>>> {
        self.states
            .read()
            .expect("indicator store lock poisoned")
            .get(code)
            .cloned()
    }

    fn entry_or_create(&self, code: &str) -> Arc<Mutex<IndicatorState>> {
        if let Some(state) = self.entry(code) {
            return state;
        }
        let mut map = self.states.write().expect("indicator store lock poisoned");
        map.entry(code.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(IndicatorState::new(
                    &self.ema_windows,
                    self.momentum_window,
                )))
            })
            .clone()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.states
            .read()
            .expect("indicator store lock poisoned")
            .contains_key(code)
    }

    /// Create state for `code` if absent, seeding it from `warmup` in
    /// chronological order. Returns true when a new state was created.
    pub fn ensure(&self, code: &str, warmup: &[Bar]) -> bool {
        if self.contains(code) {
            return false;
        }
        let state = self.entry_or_create(code);
        let mut guard = state.lock().expect("indicator state lock poisoned");
        // A racing creator may have seeded already; seeding is a no-op
        // then because every warm-up bar reads as stale.
        guard.seed(warmup);
        true
    }

    /// Apply one observation, lazily creating state on first sight.
    pub fn update(&self, code: &str, date: NaiveDate, close: f64) -> UpdateStatus {
        let state = self.entry_or_create(code);
        let mut guard = state.lock().expect("indicator state lock poisoned");
        guard.update(date, close)
    }

    /// Run `f` against the instrument's state under its lock. Returns
    /// `None` for instruments the store has never seen.
    pub fn with_state<R>(&self, code: &str, f: impl FnOnce(&IndicatorState) -> R) -> Option<R> {
        let state = self.entry(code)?;
        let guard = state.lock().expect("indicator state lock poisoned");
        Some(f(&guard))
    }

    pub fn momentum_score(&self, code: &str) -> Option<f64> {
        self.with_state(code, IndicatorState::momentum_score)?
    }

    pub fn averages(&self, code: &str) -> Option<Vec<f64>> {
        self.with_state(code, IndicatorState::averages)?
    }

    pub fn last_close(&self, code: &str) -> Option<f64> {
        self.with_state(code, IndicatorState::last_close)?
    }

    pub fn is_ready(&self, code: &str) -> bool {
        self.with_state(code, IndicatorState::is_ready)
            .unwrap_or(false)
    }
}
