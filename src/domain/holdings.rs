//! Read-only view of current holdings.
//!
//! Holdings are owned by the execution collaborator; the engine polls a
//! snapshot once per cycle and never mutates it, only issues instructions
//! against it.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub code: String,
    pub quantity: i64,
    pub average_cost: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Holdings {
    positions: HashMap<String, Holding>,
}

impl Holdings {
    pub fn new() -> Self {
        Holdings {
            positions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, holding: Holding) {
        self.positions.insert(holding.code.clone(), holding);
    }

    pub fn get(&self, code: &str) -> Option<&Holding> {
        self.positions.get(code)
    }

    pub fn remove(&mut self, code: &str) -> Option<Holding> {
        self.positions.remove(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holding> {
        self.positions.values().filter(|h| h.quantity != 0)
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.positions
            .get(code)
            .map(|h| h.quantity != 0)
            .unwrap_or(false)
    }

    /// Held codes in sorted order, so consumers iterate deterministically.
    pub fn held_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .positions
            .values()
            .filter(|h| h.quantity != 0)
            .map(|h| h.code.clone())
            .collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.positions.values().filter(|h| h.quantity != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
