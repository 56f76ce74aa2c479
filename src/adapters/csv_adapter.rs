//! CSV file data adapter.
//!
//! One file per instrument, `<identifier>.csv`, with columns
//! `date,open,high,low,close,volume`. A header row is optional.

use crate::domain::backtest::AnnotatedBar;
use crate::domain::error::MacrossError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::position::Trade;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, identifier: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", identifier))
    }
}

/// Keep only the date part of values such as `2024-01-15 00:00:00`.
pub fn normalize_date(raw: &str) -> &str {
    let raw = raw.trim();
    raw.split(' ').next().unwrap_or(raw)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(normalize_date(raw), DATE_FORMAT).ok()
}

/// Non-numeric values load as NaN; the engine treats them as undefined.
fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
) -> Result<f64, MacrossError> {
    let raw = record.get(index).ok_or_else(|| MacrossError::Data {
        reason: format!("missing {} column", column),
    })?;
    Ok(raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(column, value = raw, "non-numeric value loaded as NaN");
        f64::NAN
    }))
}

/// A first row is a header when neither its date nor its close parses.
fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(4)
        .is_none_or(|close| close.trim().parse::<f64>().is_err())
}

/// Parse bar rows from CSV text.
pub fn parse_bars(content: &str) -> Result<Vec<PriceBar>, MacrossError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut bars = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| MacrossError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = record.get(0).ok_or_else(|| MacrossError::Data {
            reason: "missing date column".into(),
        })?;
        let date = match parse_date(date_str) {
            Some(d) => d,
            None if row == 0 && is_header(&record) => {
                tracing::debug!(header = ?record, "skipping header row");
                continue;
            }
            None => {
                return Err(MacrossError::Data {
                    reason: format!("invalid date {:?} on row {}", date_str, row + 1),
                });
            }
        };

        bars.push(PriceBar {
            date,
            open: parse_number(&record, 1, "open")?,
            high: parse_number(&record, 2, "high")?,
            low: parse_number(&record, 3, "low")?,
            close: parse_number(&record, 4, "close")?,
            volume: parse_number(&record, 5, "volume")?,
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        identifier: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, MacrossError> {
        let path = self.csv_path(identifier);
        let content = fs::read_to_string(&path).map_err(|e| MacrossError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let bars: Vec<PriceBar> = parse_bars(&content)?
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect();

        tracing::debug!(identifier, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_instruments(&self) -> Result<Vec<String>, MacrossError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| MacrossError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut identifiers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MacrossError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    identifiers.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        identifiers.sort();
        Ok(identifiers)
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Export a trade log. Profit and outcome columns are empty on Buy rows.
pub fn write_trades(path: &Path, trades: &[Trade]) -> Result<(), MacrossError> {
    let mut wtr = csv::Writer::from_path(path).map_err(csv_write_error)?;
    wtr.write_record([
        "date",
        "type",
        "price",
        "shares",
        "profit_per_share",
        "total_profit",
        "outcome",
    ])
    .map_err(csv_write_error)?;

    for trade in trades {
        wtr.write_record([
            trade.date.format(DATE_FORMAT).to_string(),
            trade.kind.to_string(),
            trade.price.to_string(),
            trade.shares.to_string(),
            format_optional(trade.realized.map(|r| r.per_share)),
            format_optional(trade.realized.map(|r| r.total)),
            trade.outcome().map(|o| o.to_string()).unwrap_or_default(),
        ])
        .map_err(csv_write_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export the annotated series. Undefined indicator values are empty.
pub fn write_annotated(path: &Path, bars: &[AnnotatedBar]) -> Result<(), MacrossError> {
    let mut wtr = csv::Writer::from_path(path).map_err(csv_write_error)?;
    wtr.write_record([
        "date", "open", "high", "low", "close", "volume", "fast", "slow", "signal",
    ])
    .map_err(csv_write_error)?;

    for row in bars {
        wtr.write_record([
            row.bar.date.format(DATE_FORMAT).to_string(),
            row.bar.open.to_string(),
            row.bar.high.to_string(),
            row.bar.low.to_string(),
            row.bar.close.to_string(),
            row.bar.volume.to_string(),
            format_optional(row.fast),
            format_optional(row.slow),
            row.signal.to_string(),
        ])
        .map_err(csv_write_error)?;
    }
    wtr.flush()?;
    Ok(())
}

fn csv_write_error(e: csv::Error) -> MacrossError {
    MacrossError::Data {
        reason: format!("CSV write error: {}", e),
    }
}
