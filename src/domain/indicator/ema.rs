//! Incremental Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n samples, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Ready after n samples.

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    k: f64,
    seen: usize,
    seed_sum: f64,
    value: f64,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Ema {
            period: period.max(1),
            k: 2.0 / (period.max(1) as f64 + 1.0),
            seen: 0,
            seed_sum: 0.0,
            value: 0.0,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn is_ready(&self) -> bool {
        self.seen >= self.period
    }

    /// Current average. Meaningless until [`is_ready`](Self::is_ready).
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn update(&mut self, close: f64) {
        self.seen += 1;
        if self.seen < self.period {
            self.seed_sum += close;
        } else if self.seen == self.period {
            self.seed_sum += close;
            self.value = self.seed_sum / self.period as f64;
        } else {
            self.value = close * self.k + self.value * (1.0 - self.k);
        }
    }
}
