//! Engine configuration.
//!
//! All policy knobs live here, read once at startup from a `ConfigPort`
//! and immutable afterwards. Validation is in `config_validation`.

use crate::domain::error::RotatorError;
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    // [universe]
    pub codes: Vec<String>,
    pub exchange: String,
    pub reference: String,
    pub min_price: f64,
    pub liquidity_top_k: usize,
    pub max_candidates: usize,
    pub alignment_tolerance: f64,

    // [signals]
    pub ema_windows: Vec<usize>,
    pub momentum_window: usize,
    pub trend_fast: usize,
    pub trend_slow: usize,
    pub warmup_days: i64,
    pub history_bars: usize,

    // [rebalance]
    pub selection_count: usize,
    pub entry_fraction: f64,
    pub protection_ratio: f64,

    // [account]
    pub initial_capital: f64,
}

pub fn build_engine_config(adapter: &dyn ConfigPort) -> Result<EngineConfig, RotatorError> {
    let codes_str =
        adapter
            .get_string("universe", "codes")
            .ok_or_else(|| RotatorError::ConfigMissing {
                section: "universe".into(),
                key: "codes".into(),
            })?;
    let codes = parse_codes(&codes_str).map_err(|e| RotatorError::ConfigInvalid {
        section: "universe".into(),
        key: "codes".into(),
        reason: e.to_string(),
    })?;

    let exchange =
        adapter
            .get_string("universe", "exchange")
            .ok_or_else(|| RotatorError::ConfigMissing {
                section: "universe".into(),
                key: "exchange".into(),
            })?;

    let reference =
        adapter
            .get_string("universe", "reference")
            .ok_or_else(|| RotatorError::ConfigMissing {
                section: "universe".into(),
                key: "reference".into(),
            })?
            .trim()
            .to_uppercase();

    let ema_windows = match adapter.get_string("signals", "ema_windows") {
        Some(s) => parse_windows(&s)?,
        None => vec![5, 10, 20, 30],
    };

    Ok(EngineConfig {
        codes,
        exchange,
        reference,
        min_price: adapter.get_double("universe", "min_price", 10.0),
        liquidity_top_k: get_count(adapter, "universe", "liquidity_top_k", 100)?,
        max_candidates: get_count(adapter, "universe", "max_candidates", 10)?,
        alignment_tolerance: adapter.get_double("universe", "alignment_tolerance", 1.01),
        ema_windows,
        momentum_window: get_count(adapter, "signals", "momentum_window", 126)?,
        trend_fast: get_count(adapter, "signals", "trend_fast", 50)?,
        trend_slow: get_count(adapter, "signals", "trend_slow", 200)?,
        warmup_days: adapter.get_int("signals", "warmup_days", 180),
        history_bars: get_count(adapter, "signals", "history_bars", 50)?,
        selection_count: get_count(adapter, "rebalance", "selection_count", 5)?,
        entry_fraction: adapter.get_double("rebalance", "entry_fraction", 0.15),
        protection_ratio: adapter.get_double("rebalance", "protection_ratio", 0.88),
        initial_capital: adapter.get_double("account", "initial_capital", 100_000.0),
    })
}

/// Integer knob that only makes sense as a count. A negative value is a
/// startup-fatal config error, never a silent wrap to a huge `usize`.
fn get_count(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, RotatorError> {
    let value = adapter.get_int(section, key, default as i64);
    usize::try_from(value).map_err(|_| RotatorError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: format!("must be non-negative, got {value}"),
    })
}

fn parse_windows(input: &str) -> Result<Vec<usize>, RotatorError> {
    input
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<usize>()
                .map_err(|_| RotatorError::ConfigInvalid {
                    section: "signals".into(),
                    key: "ema_windows".into(),
                    reason: format!("invalid window '{}', expected integer", token.trim()),
                })
        })
        .collect()
}
