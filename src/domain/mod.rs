//! Core domain types and logic.

pub mod bar;
pub mod universe;
pub mod indicator;
pub mod indicator_state;
pub mod store;
pub mod coarse_filter;
pub mod ranker;
pub mod holdings;
pub mod reconciler;
pub mod scheduler;
pub mod config;
pub mod config_validation;
pub mod error;
