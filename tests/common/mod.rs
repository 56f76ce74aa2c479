#![allow(dead_code)]

use chrono::NaiveDate;
use macross::domain::error::MacrossError;
use macross::domain::indicator::IndicatorKind;
use macross::domain::ohlcv::PriceBar;
use macross::domain::strategy::StrategyParams;
use macross::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    bars: HashMap<String, Vec<PriceBar>>,
    errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, identifier: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(identifier.to_string(), bars);
        self
    }

    pub fn with_error(mut self, identifier: &str, reason: &str) -> Self {
        self.errors
            .insert(identifier.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        identifier: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, MacrossError> {
        if let Some(reason) = self.errors.get(identifier) {
            return Err(MacrossError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self.bars.get(identifier).ok_or_else(|| MacrossError::NoData {
            identifier: identifier.to_string(),
        })?;
        Ok(bars
            .iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .cloned()
            .collect())
    }

    fn list_instruments(&self) -> Result<Vec<String>, MacrossError> {
        let mut ids: Vec<String> = self.bars.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000.0,
    }
}

/// One bar per calendar day starting 2024-01-01.
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        })
        .collect()
}

pub fn sma_params(fast: usize, slow: usize, capital: f64) -> StrategyParams {
    StrategyParams {
        indicator: IndicatorKind::Sma,
        fast_span: fast,
        slow_span: slow,
        initial_capital: capital,
    }
}

/// Flat at `base` for bars 0..20, a ramp starting at bar 20, a plateau, and a
/// drop at bar 35. With SMA(5) against SMA(10) the fast average crosses above
/// at bar 20 and below at bar 35, with no other crossings.
pub fn crossover_series() -> Vec<f64> {
    let mut closes = vec![100.0; 20];
    closes.extend([110.0, 120.0, 130.0, 140.0]);
    closes.extend(std::iter::repeat_n(150.0, 11));
    closes.extend(std::iter::repeat_n(140.0, 10));
    closes
}
