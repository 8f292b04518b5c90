//! Position reconciliation.
//!
//! Diffs the ranked selection against current holdings and produces an
//! order plan: liquidations first (never gated by regime), then
//! regime-gated entries with fixed fractional sizing, then the protective
//! stop for each entry. Pure function of its inputs; identical inputs
//! yield an identical, order-stable plan.

use std::collections::HashMap;

use super::holdings::Holdings;
use super::ranker::RankedEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Liquidate {
        code: String,
    },
    Enter {
        code: String,
        size_fraction: f64,
    },
    AttachStop {
        code: String,
        quantity: i64,
        stop_price: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderPlan {
    pub instructions: Vec<Instruction>,
}

impl OrderPlan {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn liquidations(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Liquidate { .. }))
    }

    pub fn entries(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Enter { .. }))
    }

    pub fn stops(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::AttachStop { .. }))
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileParams {
    pub entry_fraction: f64,
    pub protection_ratio: f64,
}

/// Build the order plan for one cycle.
///
/// `prices` carries the last observed close per instrument; entries
/// without a positive price, or sizing to zero shares, are dropped along
/// with their stop. Held-and-still-selected instruments are untouched.
pub fn reconcile(
    selection: &[RankedEntry],
    entries_permitted: bool,
    holdings: &Holdings,
    prices: &HashMap<String, f64>,
    equity: f64,
    params: &ReconcileParams,
) -> OrderPlan {
    let mut instructions = Vec::new();

    // Exits run unconditionally. held_codes() is sorted, which keeps the
    // plan independent of holdings-map iteration order.
    for code in holdings.held_codes() {
        if !selection.iter().any(|entry| entry.code == code) {
            instructions.push(Instruction::Liquidate { code });
        }
    }

    if !entries_permitted {
        return OrderPlan { instructions };
    }

    let mut stops = Vec::new();
    for entry in selection {
        if holdings.is_held(&entry.code) {
            continue;
        }
        let Some(&price) = prices.get(&entry.code) else {
            continue;
        };
        if price <= 0.0 {
            continue;
        }
        let quantity = (equity * params.entry_fraction / price).floor() as i64;
        if quantity == 0 {
            continue;
        }
        instructions.push(Instruction::Enter {
            code: entry.code.clone(),
            size_fraction: params.entry_fraction,
        });
        stops.push(Instruction::AttachStop {
            code: entry.code.clone(),
            quantity,
            stop_price: price * params.protection_ratio,
        });
    }
    instructions.extend(stops);

    OrderPlan { instructions }
}
