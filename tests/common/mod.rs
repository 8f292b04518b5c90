#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use rotator::domain::bar::Bar;
use rotator::domain::config::EngineConfig;
use rotator::domain::error::RotatorError;
use rotator::domain::holdings::{Holding, Holdings};
use rotator::domain::reconciler::OrderPlan;
use rotator::ports::execution_port::ExecutionPort;
use rotator::ports::history_port::HistoryPort;

pub struct MockHistoryPort {
    pub data: HashMap<String, Vec<Bar>>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }
}

impl HistoryPort for MockHistoryPort {
    fn fetch_history(
        &self,
        code: &str,
        exchange: &str,
        as_of: NaiveDate,
        bars: usize,
    ) -> Result<Vec<Bar>, RotatorError> {
        match self.data.get(code) {
            Some(all) => {
                let matching: Vec<Bar> = all
                    .iter()
                    .filter(|bar| bar.date <= as_of)
                    .cloned()
                    .collect();
                let skip = matching.len().saturating_sub(bars);
                Ok(matching[skip..].to_vec())
            }
            None => Err(RotatorError::NoData {
                code: code.to_string(),
                exchange: exchange.to_string(),
            }),
        }
    }
}

/// Execution double that reports a fixed account and records every
/// submitted plan.
pub struct RecordingExecutionPort {
    pub holdings: Mutex<Holdings>,
    pub equity: f64,
    pub submitted: Mutex<Vec<OrderPlan>>,
}

impl RecordingExecutionPort {
    pub fn new(equity: f64) -> Self {
        Self {
            holdings: Mutex::new(Holdings::new()),
            equity,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_position(self, code: &str, quantity: i64, average_cost: f64) -> Self {
        self.holdings.lock().unwrap().insert(Holding {
            code: code.to_string(),
            quantity,
            average_cost,
        });
        self
    }

    pub fn submissions(&self) -> Vec<OrderPlan> {
        self.submitted.lock().unwrap().clone()
    }
}

impl ExecutionPort for RecordingExecutionPort {
    fn holdings(&self) -> Holdings {
        self.holdings.lock().unwrap().clone()
    }

    fn equity(&self) -> f64 {
        self.equity
    }

    fn submit(&self, plan: &OrderPlan) {
        self.submitted.lock().unwrap().push(plan.clone());
    }
}

pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(n as u64 - 1)
}

pub fn make_bar(code: &str, n: u32, close: f64) -> Bar {
    Bar {
        code: code.to_string(),
        exchange: "XTSE".to_string(),
        date: day(n),
        close,
        volume: 10_000,
    }
}

pub fn make_series(code: &str, start_day: u32, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(code, start_day + i as u32, close))
        .collect()
}

/// Small windows so instruments become ready after a handful of bars.
pub fn test_config(codes: &[&str]) -> EngineConfig {
    EngineConfig {
        codes: codes.iter().map(|c| c.to_string()).collect(),
        exchange: "XTSE".to_string(),
        reference: "REF".to_string(),
        min_price: 10.0,
        liquidity_top_k: 10,
        max_candidates: 5,
        alignment_tolerance: 1.5,
        ema_windows: vec![2, 4],
        momentum_window: 3,
        trend_fast: 2,
        trend_slow: 4,
        warmup_days: 5,
        history_bars: 8,
        selection_count: 3,
        entry_fraction: 0.15,
        protection_ratio: 0.88,
        initial_capital: 100_000.0,
    }
}
