//! Configuration validation.
//!
//! Every knob is checked before the engine is constructed; a bad value is
//! fatal at startup and the scheduler never reaches Active.

use crate::domain::config::EngineConfig;
use crate::domain::error::RotatorError;

pub fn validate_engine_config(config: &EngineConfig) -> Result<(), RotatorError> {
    validate_universe(config)?;
    validate_filter(config)?;
    validate_signals(config)?;
    validate_rebalance(config)?;
    validate_account(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> RotatorError {
    RotatorError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_universe(config: &EngineConfig) -> Result<(), RotatorError> {
    if config.codes.is_empty() {
        return Err(invalid("universe", "codes", "universe must not be empty"));
    }
    if config.exchange.trim().is_empty() {
        return Err(invalid("universe", "exchange", "exchange must not be empty"));
    }
    if config.reference.trim().is_empty() {
        return Err(invalid(
            "universe",
            "reference",
            "reference instrument must not be empty",
        ));
    }
    Ok(())
}

fn validate_filter(config: &EngineConfig) -> Result<(), RotatorError> {
    if config.min_price < 0.0 {
        return Err(invalid(
            "universe",
            "min_price",
            "min_price must be non-negative",
        ));
    }
    if config.max_candidates < 1 {
        return Err(invalid(
            "universe",
            "max_candidates",
            "max_candidates must be at least 1",
        ));
    }
    if config.liquidity_top_k < config.max_candidates {
        return Err(invalid(
            "universe",
            "liquidity_top_k",
            "liquidity_top_k must be at least max_candidates",
        ));
    }
    if config.alignment_tolerance <= 1.0 {
        return Err(invalid(
            "universe",
            "alignment_tolerance",
            "alignment_tolerance must be greater than 1",
        ));
    }
    Ok(())
}

fn validate_signals(config: &EngineConfig) -> Result<(), RotatorError> {
    if config.ema_windows.len() < 2 {
        return Err(invalid(
            "signals",
            "ema_windows",
            "need at least two windows for an alignment stack",
        ));
    }
    if config.ema_windows.iter().any(|&w| w == 0) {
        return Err(invalid(
            "signals",
            "ema_windows",
            "windows must be positive",
        ));
    }
    if !config.ema_windows.windows(2).all(|pair| pair[0] < pair[1]) {
        return Err(invalid(
            "signals",
            "ema_windows",
            "windows must be strictly increasing fastest to slowest",
        ));
    }
    if config.momentum_window < 1 {
        return Err(invalid(
            "signals",
            "momentum_window",
            "momentum_window must be at least 1",
        ));
    }
    if config.trend_fast == 0 || config.trend_slow == 0 {
        return Err(invalid(
            "signals",
            "trend_fast",
            "trend windows must be positive",
        ));
    }
    if config.trend_fast >= config.trend_slow {
        return Err(invalid(
            "signals",
            "trend_fast",
            "trend_fast must be shorter than trend_slow",
        ));
    }
    if config.warmup_days < 0 {
        return Err(invalid(
            "signals",
            "warmup_days",
            "warmup_days must be non-negative",
        ));
    }
    if config.history_bars == 0 {
        return Err(invalid(
            "signals",
            "history_bars",
            "history_bars must be at least 1",
        ));
    }
    Ok(())
}

fn validate_rebalance(config: &EngineConfig) -> Result<(), RotatorError> {
    if config.selection_count < 1 {
        return Err(invalid(
            "rebalance",
            "selection_count",
            "selection_count must be at least 1",
        ));
    }
    if config.entry_fraction <= 0.0 || config.entry_fraction > 1.0 {
        return Err(invalid(
            "rebalance",
            "entry_fraction",
            "entry_fraction must be between 0 and 1",
        ));
    }
    if config.selection_count as f64 * config.entry_fraction > 1.0 {
        return Err(invalid(
            "rebalance",
            "entry_fraction",
            "selection_count * entry_fraction must not exceed 1",
        ));
    }
    if config.protection_ratio <= 0.0 || config.protection_ratio >= 1.0 {
        return Err(invalid(
            "rebalance",
            "protection_ratio",
            "protection_ratio must be strictly between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_account(config: &EngineConfig) -> Result<(), RotatorError> {
    if !config.initial_capital.is_finite() || config.initial_capital <= 0.0 {
        return Err(invalid(
            "account",
            "initial_capital",
            "initial_capital must be a positive amount",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> EngineConfig {
        EngineConfig {
            codes: vec!["RY".into(), "TD".into()],
            exchange: "XTSE".into(),
            reference: "XIC".into(),
            min_price: 10.0,
            liquidity_top_k: 100,
            max_candidates: 10,
            alignment_tolerance: 1.01,
            ema_windows: vec![5, 10, 20, 30],
            momentum_window: 126,
            trend_fast: 50,
            trend_slow: 200,
            warmup_days: 180,
            history_bars: 50,
            selection_count: 5,
            entry_fraction: 0.15,
            protection_ratio: 0.88,
            initial_capital: 100_000.0,
        }
    }

    fn assert_invalid(config: EngineConfig, expected_key: &str) {
        let err = validate_engine_config(&config).unwrap_err();
        assert!(
            matches!(err, RotatorError::ConfigInvalid { ref key, .. } if key == expected_key),
            "expected ConfigInvalid for {expected_key}, got {err}"
        );
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_engine_config(&valid_config()).is_ok());
    }

    #[test]
    fn empty_universe_fails() {
        let mut config = valid_config();
        config.codes.clear();
        assert_invalid(config, "codes");
    }

    #[test]
    fn blank_reference_fails() {
        let mut config = valid_config();
        config.reference = "  ".into();
        assert_invalid(config, "reference");
    }

    #[test]
    fn negative_min_price_fails() {
        let mut config = valid_config();
        config.min_price = -1.0;
        assert_invalid(config, "min_price");
    }

    #[test]
    fn zero_max_candidates_fails() {
        let mut config = valid_config();
        config.max_candidates = 0;
        assert_invalid(config, "max_candidates");
    }

    #[test]
    fn top_k_below_max_candidates_fails() {
        let mut config = valid_config();
        config.liquidity_top_k = 5;
        assert_invalid(config, "liquidity_top_k");
    }

    #[test]
    fn tolerance_at_or_below_one_fails() {
        let mut config = valid_config();
        config.alignment_tolerance = 1.0;
        assert_invalid(config, "alignment_tolerance");
    }

    #[test]
    fn single_window_fails() {
        let mut config = valid_config();
        config.ema_windows = vec![5];
        assert_invalid(config, "ema_windows");
    }

    #[test]
    fn zero_window_fails() {
        let mut config = valid_config();
        config.ema_windows = vec![0, 10];
        assert_invalid(config, "ema_windows");
    }

    #[test]
    fn unsorted_windows_fail() {
        let mut config = valid_config();
        config.ema_windows = vec![5, 20, 10, 30];
        assert_invalid(config, "ema_windows");
    }

    #[test]
    fn equal_windows_fail() {
        let mut config = valid_config();
        config.ema_windows = vec![5, 10, 10, 30];
        assert_invalid(config, "ema_windows");
    }

    #[test]
    fn zero_momentum_window_fails() {
        let mut config = valid_config();
        config.momentum_window = 0;
        assert_invalid(config, "momentum_window");
    }

    #[test]
    fn trend_fast_not_shorter_fails() {
        let mut config = valid_config();
        config.trend_fast = 200;
        assert_invalid(config, "trend_fast");
    }

    #[test]
    fn negative_warmup_fails() {
        let mut config = valid_config();
        config.warmup_days = -1;
        assert_invalid(config, "warmup_days");
    }

    #[test]
    fn zero_history_bars_fails() {
        let mut config = valid_config();
        config.history_bars = 0;
        assert_invalid(config, "history_bars");
    }

    #[test]
    fn zero_selection_count_fails() {
        let mut config = valid_config();
        config.selection_count = 0;
        assert_invalid(config, "selection_count");
    }

    #[test]
    fn entry_fraction_out_of_range_fails() {
        let mut config = valid_config();
        config.entry_fraction = 0.0;
        assert_invalid(config.clone(), "entry_fraction");
        config.entry_fraction = 1.5;
        assert_invalid(config, "entry_fraction");
    }

    #[test]
    fn oversubscribed_portfolio_fails() {
        let mut config = valid_config();
        config.selection_count = 10;
        config.entry_fraction = 0.15;
        assert_invalid(config, "entry_fraction");
    }

    #[test]
    fn protection_ratio_bounds() {
        let mut config = valid_config();
        config.protection_ratio = 0.0;
        assert_invalid(config.clone(), "protection_ratio");
        config.protection_ratio = 1.0;
        assert_invalid(config, "protection_ratio");
    }

    #[test]
    fn non_positive_capital_fails() {
        let mut config = valid_config();
        config.initial_capital = 0.0;
        assert_invalid(config.clone(), "initial_capital");
        config.initial_capital = -5_000.0;
        assert_invalid(config, "initial_capital");
    }
}
