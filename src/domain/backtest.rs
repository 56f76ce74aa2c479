//! Backtest orchestration.
//!
//! `run_backtest` composes indicators, signals, ledger and summary for one
//! instrument. `run_batch` does the same for many instruments in parallel;
//! instruments share nothing, and every result carries its identifier.

use rayon::prelude::*;

use crate::domain::error::MacrossError;
use crate::domain::indicator;
use crate::domain::ledger::run_ledger;
use crate::domain::metrics::Summary;
use crate::domain::ohlcv::{PriceBar, closes};
use crate::domain::position::{Position, Trade};
use crate::domain::signal::{Signal, generate_signals};
use crate::domain::strategy::StrategyParams;

/// A price bar with the values computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBar {
    pub bar: PriceBar,
    pub fast: Option<f64>,
    pub slow: Option<f64>,
    /// Raw crossover label. A Buy or Sell here does not imply a trade.
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub bars: Vec<AnnotatedBar>,
    pub trades: Vec<Trade>,
    pub open_position: Option<Position>,
    pub summary: Summary,
}

/// One instrument's input to a batch run.
#[derive(Debug, Clone)]
pub struct Instrument {
    pub identifier: String,
    pub bars: Vec<PriceBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyResult {
    pub identifier: String,
    pub result: BacktestResult,
}

pub fn run_backtest(
    bars: &[PriceBar],
    params: &StrategyParams,
) -> Result<BacktestResult, MacrossError> {
    params.validate()?;

    let close = closes(bars);
    let fast = indicator::compute(params.indicator, &close, params.fast_span)?;
    let slow = indicator::compute(params.indicator, &close, params.slow_span)?;
    let signals = generate_signals(&fast, &slow)?;
    let ledger = run_ledger(bars, &signals, params.initial_capital)?;
    let summary = Summary::compute(&ledger.trades, params);

    tracing::debug!(
        strategy = %params.describe(),
        bars = bars.len(),
        trades = ledger.trades.len(),
        total_profit = summary.total_profit,
        "backtest complete"
    );

    let annotated = bars
        .iter()
        .zip(signals)
        .enumerate()
        .map(|(i, (bar, signal))| AnnotatedBar {
            bar: bar.clone(),
            fast: fast.get(i),
            slow: slow.get(i),
            signal,
        })
        .collect();

    Ok(BacktestResult {
        bars: annotated,
        trades: ledger.trades,
        open_position: ledger.open_position,
        summary,
    })
}

/// Run every instrument independently. Parameters are validated once up
/// front; results come back in input order.
pub fn run_batch(
    instruments: &[Instrument],
    params: &StrategyParams,
) -> Result<Vec<CompanyResult>, MacrossError> {
    params.validate()?;

    instruments
        .par_iter()
        .map(|instrument| {
            let result = run_backtest(&instrument.bars, params)?;
            Ok(CompanyResult {
                identifier: instrument.identifier.clone(),
                result,
            })
        })
        .collect()
}

/// Instruments ordered by total profit, best first. Ties keep input order.
pub fn rank_by_profit(results: &[CompanyResult]) -> Vec<&CompanyResult> {
    let mut ranked: Vec<&CompanyResult> = results.iter().collect();
    ranked.sort_by(|a, b| {
        b.result
            .summary
            .total_profit
            .total_cmp(&a.result.summary.total_profit)
    });
    ranked
}
