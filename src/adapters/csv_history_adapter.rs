//! CSV file history adapter.
//!
//! Daily bars live in one file per instrument, `{code}_{exchange}.csv`,
//! with a `date,close,volume` header and rows in chronological order.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::bar::Bar;
use crate::domain::error::RotatorError;
use crate::ports::history_port::HistoryPort;

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
}

impl CsvHistoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, exchange))
    }

    /// All bars for the instrument, oldest first.
    pub fn fetch_all(&self, code: &str, exchange: &str) -> Result<Vec<Bar>, RotatorError> {
        let path = self.csv_path(code, exchange);
        let content = fs::read_to_string(&path).map_err(|_| RotatorError::NoData {
            code: code.to_string(),
            exchange: exchange.to_string(),
        })?;
        let file = path.display().to_string();

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| RotatorError::BadData {
                file: file.clone(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| RotatorError::BadData {
                file: file.clone(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                RotatorError::BadData {
                    file: file.clone(),
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| RotatorError::BadData {
                    file: file.clone(),
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| RotatorError::BadData {
                    file: file.clone(),
                    reason: format!("invalid close value: {}", e),
                })?;

            let volume: i64 = record
                .get(2)
                .ok_or_else(|| RotatorError::BadData {
                    file: file.clone(),
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| RotatorError::BadData {
                    file: file.clone(),
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(Bar {
                code: code.to_string(),
                exchange: exchange.to_string(),
                date,
                close,
                volume,
            });
        }

        if bars.is_empty() {
            return Err(RotatorError::NoData {
                code: code.to_string(),
                exchange: exchange.to_string(),
            });
        }

        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }

    /// Instrument codes with a data file for `exchange`, sorted.
    pub fn list_codes(&self, exchange: &str) -> Result<Vec<String>, RotatorError> {
        let suffix = format!("_{}.csv", exchange);
        let mut codes = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(code) = name.strip_suffix(&suffix) {
                if !code.is_empty() {
                    codes.push(code.to_string());
                }
            }
        }

        codes.sort();
        Ok(codes)
    }
}

impl HistoryPort for CsvHistoryAdapter {
    fn fetch_history(
        &self,
        code: &str,
        exchange: &str,
        as_of: NaiveDate,
        bars: usize,
    ) -> Result<Vec<Bar>, RotatorError> {
        let mut all = self.fetch_all(code, exchange)?;
        all.retain(|bar| bar.date <= as_of);
        if all.len() > bars {
            all.drain(..all.len() - bars);
        }
        Ok(all)
    }
}
