//! Coarse universe filtering.
//!
//! Narrows a broad dated snapshot to a small candidate list: penny-stock
//! guard, dollar-volume top-K, then an EMA-alignment test against the
//! indicator store. Instruments are excluded silently on any soft failure
//! (missing history, not ready, degenerate averages); filtering never
//! errors.

use super::bar::Bar;
use super::store::IndicatorStore;
use crate::ports::history_port::HistoryPort;

#[derive(Debug, Clone)]
pub struct CoarseFilterParams {
    pub min_price: f64,
    pub liquidity_top_k: usize,
    pub max_candidates: usize,
    pub alignment_tolerance: f64,
    pub history_bars: usize,
}

/// True when the averages form a strictly descending fast-to-slow stack
/// and the fast/slow ratio stays under `tolerance`. A non-positive
/// slowest average excludes the instrument rather than faulting the
/// ratio.
pub fn aligned(averages: &[f64], tolerance: f64) -> bool {
    if averages.len() < 2 {
        return false;
    }
    if !averages.windows(2).all(|pair| pair[0] > pair[1]) {
        return false;
    }
    let fastest = averages[0];
    let slowest = averages[averages.len() - 1];
    if slowest <= 0.0 {
        return false;
    }
    fastest / slowest < tolerance
}

/// Evaluate the broad `snapshot` and return at most `max_candidates`
/// survivors in liquidity rank order.
pub fn filter_universe(
    store: &IndicatorStore,
    history: &dyn HistoryPort,
    snapshot: &[Bar],
    params: &CoarseFilterParams,
) -> Vec<String> {
    let mut pool: Vec<&Bar> = snapshot
        .iter()
        .filter(|bar| bar.close > params.min_price)
        .collect();

    // Stable sort keeps snapshot order for equal dollar volume.
    pool.sort_by(|a, b| {
        b.dollar_volume()
            .partial_cmp(&a.dollar_volume())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pool.truncate(params.liquidity_top_k);

    // Every instrument that makes the liquidity cut gets its state
    // maintained, even once enough survivors are found; the cap is
    // applied after the pass.
    let mut survivors = Vec::new();
    for bar in pool {
        if !store.contains(&bar.code) {
            // History is fetched as of the snapshot date so a mid-replay
            // seed can never observe bars from its own future.
            let warmup = match history.fetch_history(
                &bar.code,
                &bar.exchange,
                bar.date,
                params.history_bars,
            ) {
                Ok(bars) => bars,
                Err(e) => {
                    eprintln!("warning: no warm-up history for {} ({e})", bar.code);
                    Vec::new()
                }
            };
            store.ensure(&bar.code, &warmup);
        }
        store.update(&bar.code, bar.date, bar.close);

        let keep = store
            .averages(&bar.code)
            .map(|avgs| aligned(&avgs, params.alignment_tolerance))
            .unwrap_or(false);
        if keep {
            survivors.push(bar.code.clone());
        }
    }

    survivors.truncate(params.max_candidates);
    survivors
}
