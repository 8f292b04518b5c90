//! Execution and account access port trait.

use crate::domain::holdings::Holdings;
use crate::domain::reconciler::OrderPlan;

/// Broker-facing surface the engine reconciles against. The engine reads
/// holdings and equity at the start of a decision cycle and submits the
/// resulting plan without waiting for fills.
pub trait ExecutionPort {
    fn holdings(&self) -> Holdings;
    fn equity(&self) -> f64;
    fn submit(&self, plan: &OrderPlan);
}
