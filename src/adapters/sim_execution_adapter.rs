//! Simulated execution adapter for replays.
//!
//! Keeps a paper account behind one mutex: cash, positions and resting
//! stop orders. Market entries and liquidations fill immediately at the
//! last observed price; stops trigger when a later observed price
//! touches or crosses them and fill at the stop price.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::holdings::{Holding, Holdings};
use crate::domain::reconciler::{Instruction, OrderPlan};
use crate::ports::execution_port::ExecutionPort;

#[derive(Debug, Clone)]
struct StopOrder {
    code: String,
    quantity: i64,
    stop_price: f64,
}

#[derive(Debug)]
struct Book {
    cash: f64,
    holdings: Holdings,
    stops: Vec<StopOrder>,
    last_prices: HashMap<String, f64>,
}

pub struct SimExecutionAdapter {
    book: Mutex<Book>,
}

impl SimExecutionAdapter {
    pub fn new(initial_capital: f64) -> Self {
        SimExecutionAdapter {
            book: Mutex::new(Book {
                cash: initial_capital,
                holdings: Holdings::new(),
                stops: Vec::new(),
                last_prices: HashMap::new(),
            }),
        }
    }

    /// Record a traded price and trigger any resting stop it touches.
    pub fn observe_price(&self, code: &str, price: f64) {
        let mut book = self.book.lock().expect("sim book lock poisoned");
        book.last_prices.insert(code.to_string(), price);

        let triggered: Vec<StopOrder> = {
            let (keep, fire): (Vec<StopOrder>, Vec<StopOrder>) = book
                .stops
                .drain(..)
                .partition(|stop| stop.code != code || price > stop.stop_price);
            book.stops = keep;
            fire
        };
        for stop in triggered {
            sell(&mut book, &stop.code, stop.quantity, stop.stop_price);
        }
    }

    pub fn cash(&self) -> f64 {
        self.book.lock().expect("sim book lock poisoned").cash
    }

    pub fn pending_stops(&self) -> usize {
        self.book.lock().expect("sim book lock poisoned").stops.len()
    }
}

fn mark(book: &Book, holding: &Holding) -> f64 {
    book.last_prices
        .get(&holding.code)
        .copied()
        .unwrap_or(holding.average_cost)
}

fn book_equity(book: &Book) -> f64 {
    let positions: f64 = book
        .holdings
        .iter()
        .map(|h| h.quantity as f64 * mark(book, h))
        .sum();
    book.cash + positions
}

fn sell(book: &mut Book, code: &str, quantity: i64, price: f64) {
    let Some(held) = book.holdings.get(code).cloned() else {
        return;
    };
    let quantity = quantity.min(held.quantity);
    if quantity <= 0 {
        return;
    }
    book.cash += quantity as f64 * price;
    let remaining = held.quantity - quantity;
    if remaining == 0 {
        book.holdings.remove(code);
    } else {
        book.holdings.insert(Holding {
            quantity: remaining,
            ..held
        });
    }
}

impl ExecutionPort for SimExecutionAdapter {
    fn holdings(&self) -> Holdings {
        self.book
            .lock()
            .expect("sim book lock poisoned")
            .holdings
            .clone()
    }

    fn equity(&self) -> f64 {
        book_equity(&self.book.lock().expect("sim book lock poisoned"))
    }

    fn submit(&self, plan: &OrderPlan) {
        let mut book = self.book.lock().expect("sim book lock poisoned");
        for instruction in &plan.instructions {
            match instruction {
                Instruction::Liquidate { code } => {
                    let quantity = book.holdings.get(code).map(|h| h.quantity).unwrap_or(0);
                    let price = book
                        .holdings
                        .get(code)
                        .map(|h| mark(&book, h))
                        .unwrap_or(0.0);
                    sell(&mut book, code, quantity, price);
                    book.stops.retain(|stop| stop.code != *code);
                }
                Instruction::Enter {
                    code,
                    size_fraction,
                } => {
                    let Some(&price) = book.last_prices.get(code) else {
                        continue;
                    };
                    if price <= 0.0 {
                        continue;
                    }
                    let quantity = (book_equity(&book) * size_fraction / price).floor() as i64;
                    if quantity <= 0 {
                        continue;
                    }
                    book.cash -= quantity as f64 * price;
                    book.holdings.insert(Holding {
                        code: code.clone(),
                        quantity,
                        average_cost: price,
                    });
                }
                Instruction::AttachStop {
                    code,
                    quantity,
                    stop_price,
                } => {
                    book.stops.push(StopOrder {
                        code: code.clone(),
                        quantity: *quantity,
                        stop_price: *stop_price,
                    });
                }
            }
        }
    }
}
