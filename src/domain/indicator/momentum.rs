//! Incremental momentum-percent accumulator.
//!
//! MOMP(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! If C[i-n] == 0: score = 0
//! Ready after n+1 samples (a full lookback window plus the current close).

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct MomentumPercent {
    period: usize,
    window: VecDeque<f64>,
}

impl MomentumPercent {
    pub fn new(period: usize) -> Self {
        MomentumPercent {
            period: period.max(1),
            window: VecDeque::with_capacity(period.max(1) + 1),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn is_ready(&self) -> bool {
        self.window.len() > self.period
    }

    /// Percent change over the lookback window. Meaningless until ready.
    pub fn value(&self) -> f64 {
        if !self.is_ready() {
            return 0.0;
        }
        let oldest = self.window[0];
        let newest = self.window[self.window.len() - 1];
        if oldest == 0.0 {
            0.0
        } else {
            ((newest - oldest) / oldest) * 100.0
        }
    }

    pub fn update(&mut self, close: f64) {
        self.window.push_back(close);
        while self.window.len() > self.period + 1 {
            self.window.pop_front();
        }
    }
}
