//! Rebalance scheduling and the top-level engine.
//!
//! The scheduler is a two-state machine: every engine starts `WarmingUp`
//! and flips to `Active` once enough calendar days have passed since the
//! first observed bar. Decision ticks arrive with an injected date, never
//! from a real clock, so replays are reproducible.
//!
//! `RebalanceEngine` wires the store, trend gauge, coarse filter, ranker
//! and reconciler together behind the two trigger paths: the continuous
//! bar feed and the periodic tick.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use super::bar::Bar;
use super::coarse_filter::{self, CoarseFilterParams};
use super::config::EngineConfig;
use super::config_validation::validate_engine_config;
use super::error::RotatorError;
use super::indicator_state::UpdateStatus;
use super::ranker::{self, TrendGauge};
use super::reconciler::{self, OrderPlan, ReconcileParams};
use super::store::IndicatorStore;
use crate::ports::execution_port::ExecutionPort;
use crate::ports::history_port::HistoryPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    WarmingUp,
    Active,
}

#[derive(Debug)]
pub struct RebalanceScheduler {
    state: SchedulerState,
    warmup_days: i64,
    first_seen: Option<NaiveDate>,
}

impl RebalanceScheduler {
    pub fn new(warmup_days: i64) -> Self {
        RebalanceScheduler {
            state: SchedulerState::WarmingUp,
            warmup_days,
            first_seen: None,
        }
    }

    /// Record a date from the data stream and return the state in effect
    /// for it. The warm-up clock starts at the first observed date.
    pub fn observe(&mut self, date: NaiveDate) -> SchedulerState {
        let first = *self.first_seen.get_or_insert(date);
        if self.state == SchedulerState::WarmingUp
            && (date - first).num_days() >= self.warmup_days
        {
            self.state = SchedulerState::Active;
        }
        self.state
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }
}

pub struct RebalanceEngine {
    config: EngineConfig,
    store: IndicatorStore,
    gauge: Mutex<TrendGauge>,
    scheduler: Mutex<RebalanceScheduler>,
    active_universe: Mutex<Vec<String>>,
    history: Arc<dyn HistoryPort + Send + Sync>,
    execution: Arc<dyn ExecutionPort + Send + Sync>,
}

impl RebalanceEngine {
    /// Validate the configuration and assemble the engine.
    pub fn new(
        config: EngineConfig,
        history: Arc<dyn HistoryPort + Send + Sync>,
        execution: Arc<dyn ExecutionPort + Send + Sync>,
    ) -> Result<Self, RotatorError> {
        validate_engine_config(&config)?;

        let store = IndicatorStore::new(config.ema_windows.clone(), config.momentum_window);

        Ok(RebalanceEngine {
            scheduler: Mutex::new(RebalanceScheduler::new(config.warmup_days)),
            gauge: Mutex::new(TrendGauge::new(config.trend_fast, config.trend_slow)),
            active_universe: Mutex::new(Vec::new()),
            store,
            config,
            history,
            execution,
        })
    }

    /// Pre-warm the trend gauge from history dated at or before `as_of`.
    /// The gauge's own date check makes this safe to overlap with the
    /// live feed: a close it has already applied is never applied again.
    pub fn warm_reference(&self, as_of: NaiveDate) {
        match self.history.fetch_history(
            &self.config.reference,
            &self.config.exchange,
            as_of,
            self.config.trend_slow,
        ) {
            Ok(bars) => {
                let mut gauge = self.gauge.lock().expect("trend gauge lock poisoned");
                for bar in &bars {
                    gauge.update(bar.date, bar.close);
                }
            }
            Err(e) => {
                eprintln!(
                    "warning: no warm-up history for reference {} ({e})",
                    self.config.reference
                );
            }
        }
    }

    pub fn store(&self) -> &IndicatorStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn active_universe(&self) -> Vec<String> {
        self.active_universe
            .lock()
            .expect("universe lock poisoned")
            .clone()
    }

    /// Feed one live bar. The scheduler's warm-up clock runs on bar
    /// dates, and the trend gauge advances only on reference closes it
    /// has not applied before.
    pub fn on_bar(&self, bar: &Bar) -> UpdateStatus {
        self.scheduler
            .lock()
            .expect("scheduler lock poisoned")
            .observe(bar.date);

        let status = self.store.update(&bar.code, bar.date, bar.close);
        if bar.code == self.config.reference {
            self.gauge
                .lock()
                .expect("trend gauge lock poisoned")
                .update(bar.date, bar.close);
        }
        status
    }

    /// Re-run the coarse filter over a broad dated snapshot and install
    /// the survivors as the active universe.
    pub fn refresh_universe(&self, snapshot: &[Bar]) -> Vec<String> {
        let params = CoarseFilterParams {
            min_price: self.config.min_price,
            liquidity_top_k: self.config.liquidity_top_k,
            max_candidates: self.config.max_candidates,
            alignment_tolerance: self.config.alignment_tolerance,
            history_bars: self.config.history_bars,
        };
        let survivors =
            coarse_filter::filter_universe(&self.store, self.history.as_ref(), snapshot, &params);
        *self
            .active_universe
            .lock()
            .expect("universe lock poisoned") = survivors.clone();
        survivors
    }

    /// Run one decision cycle for `date`. During warm-up the cycle is a
    /// no-op; once active it ranks the current universe, reconciles
    /// against live holdings and submits the plan without waiting for
    /// fills. The returned plan is what was submitted.
    pub fn on_tick(&self, date: NaiveDate) -> OrderPlan {
        let state = self
            .scheduler
            .lock()
            .expect("scheduler lock poisoned")
            .observe(date);
        if state == SchedulerState::WarmingUp {
            return OrderPlan::default();
        }

        let universe = self.active_universe();
        let selection = ranker::rank(&self.store, &universe, self.config.selection_count);

        let entries_permitted = self
            .gauge
            .lock()
            .expect("trend gauge lock poisoned")
            .permits_entries();

        let holdings = self.execution.holdings();
        let equity = self.execution.equity();
        let prices: HashMap<String, f64> = selection
            .iter()
            .filter_map(|entry| {
                self.store
                    .last_close(&entry.code)
                    .map(|price| (entry.code.clone(), price))
            })
            .collect();

        let plan = reconciler::reconcile(
            &selection,
            entries_permitted,
            &holdings,
            &prices,
            equity,
            &ReconcileParams {
                entry_fraction: self.config.entry_fraction,
                protection_ratio: self.config.protection_ratio,
            },
        );

        if !plan.is_empty() {
            self.execution.submit(&plan);
        }
        plan
    }
}
