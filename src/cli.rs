//! CLI definition and dispatch.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};

use crate::adapters::csv_history_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sim_execution_adapter::SimExecutionAdapter;
use crate::domain::bar::Bar;
use crate::domain::config::{build_engine_config, EngineConfig};
use crate::domain::config_validation::validate_engine_config;
use crate::domain::error::RotatorError;
use crate::domain::scheduler::RebalanceEngine;
use crate::ports::execution_port::ExecutionPort;

#[derive(Parser, Debug)]
#[command(name = "rotator", about = "Momentum rotation rebalancing engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay daily CSV data through the engine
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Validate an engine configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List instrument codes with data files for an exchange
    ListCodes {
        #[arg(long)]
        exchange: String,
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run { config, data } => run_replay(&config, &data),
        Command::Validate { config } => run_validate(&config),
        Command::ListCodes { exchange, data } => run_list_codes(&exchange, &data),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = RotatorError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_engine_config(path: &PathBuf) -> Result<EngineConfig, ExitCode> {
    let adapter = load_config(path)?;
    let config = build_engine_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    validate_engine_config(&config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok(config)
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    match load_engine_config(config_path) {
        Ok(config) => {
            eprintln!(
                "OK: {} codes on {}, reference {}, rebalance top {}",
                config.codes.len(),
                config.exchange,
                config.reference,
                config.selection_count
            );
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn run_list_codes(exchange: &str, data_path: &PathBuf) -> ExitCode {
    let adapter = CsvHistoryAdapter::new(data_path.clone());
    match adapter.list_codes(exchange) {
        Ok(codes) => {
            for code in codes {
                println!("{code}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_replay(config_path: &PathBuf, data_path: &PathBuf) -> ExitCode {
    // Stage 1: config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_engine_config(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    // Stage 2: adapters and engine
    let history = Arc::new(CsvHistoryAdapter::new(data_path.clone()));
    let execution = Arc::new(SimExecutionAdapter::new(config.initial_capital));
    let engine = match RebalanceEngine::new(config.clone(), history.clone(), execution.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    // Stage 3: load every series and merge onto one date timeline
    eprintln!(
        "Loading {} codes on {}...",
        config.codes.len(),
        config.exchange
    );
    let mut feed_codes = config.codes.clone();
    if !feed_codes.contains(&config.reference) {
        feed_codes.push(config.reference.clone());
    }

    let mut timeline: BTreeMap<NaiveDate, Vec<Bar>> = BTreeMap::new();
    let mut loaded = 0usize;
    for code in &feed_codes {
        match history.fetch_all(code, &config.exchange) {
            Ok(bars) => {
                loaded += 1;
                for bar in bars {
                    timeline.entry(bar.date).or_default().push(bar);
                }
            }
            Err(e) => eprintln!("warning: skipping {code}: {e}"),
        }
    }
    if loaded == 0 {
        let err = RotatorError::NoData {
            code: feed_codes.join(","),
            exchange: config.exchange.clone(),
        };
        eprintln!("error: {err}");
        return ExitCode::from(&err);
    }

    // Stage 4: replay with a month-end decision tick
    let dates: Vec<NaiveDate> = timeline.keys().copied().collect();
    eprintln!(
        "Replaying {} trading days ({} to {})",
        dates.len(),
        dates[0],
        dates[dates.len() - 1]
    );
    engine.warm_reference(dates[0]);

    for (i, date) in dates.iter().enumerate() {
        let bars = &timeline[date];
        for bar in bars {
            execution.observe_price(&bar.code, bar.close);
            engine.on_bar(bar);
        }

        let month_end = match dates.get(i + 1) {
            Some(next) => next.month() != date.month() || next.year() != date.year(),
            None => true,
        };
        if month_end {
            let snapshot: Vec<Bar> = bars
                .iter()
                .filter(|bar| bar.code != config.reference)
                .cloned()
                .collect();
            engine.refresh_universe(&snapshot);
            let plan = engine.on_tick(*date);
            if !plan.is_empty() {
                eprintln!(
                    "{date}: {} exits, {} entries",
                    plan.liquidations().count(),
                    plan.entries().count()
                );
            }
        }
    }

    // Stage 5: report
    let holdings = execution.holdings();
    eprintln!("Final equity: {:.2}", execution.equity());
    for code in holdings.held_codes() {
        if let Some(holding) = holdings.get(&code) {
            eprintln!(
                "  {} x{} @ {:.2}",
                holding.code, holding.quantity, holding.average_cost
            );
        }
    }
    ExitCode::SUCCESS
}
