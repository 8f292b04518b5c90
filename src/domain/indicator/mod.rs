//! Incremental indicator accumulators.
//!
//! Each accumulator consumes one close per call to `update` and exposes a
//! `ready` predicate that is false until its warm-up window has filled.
//! Values read before readiness are meaningless and callers must skip
//! them; nothing here ever errors on thin data.

pub mod ema;
pub mod momentum;

pub use ema::Ema;
pub use momentum::MomentumPercent;
