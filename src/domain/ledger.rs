//! Single-position, long-only trade ledger.
//!
//! Walks the bars in order with at most one open position. A Buy signal opens
//! a position only when flat, a Sell signal closes it only when positioned, so
//! the emitted log alternates Buy, Sell, Buy, ... by construction.

use crate::domain::error::MacrossError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::position::{Position, Trade, TradeKind};
use crate::domain::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRun {
    pub trades: Vec<Trade>,
    /// Position still open after the last bar. Unrealized; not part of any
    /// statistics.
    pub open_position: Option<Position>,
}

/// Simulate the strategy. Sizing always uses `initial_capital`; realized
/// profit is not compounded into later entries.
pub fn run_ledger(
    bars: &[PriceBar],
    signals: &[Signal],
    initial_capital: f64,
) -> Result<LedgerRun, MacrossError> {
    if bars.len() != signals.len() {
        return Err(MacrossError::SignalMismatch {
            bars: bars.len(),
            signals: signals.len(),
        });
    }

    let mut trades = Vec::new();
    let mut position: Option<Position> = None;

    for (bar, signal) in bars.iter().zip(signals) {
        match (signal, &position) {
            (Signal::Buy, None) => {
                if !bar.has_tradable_close() {
                    tracing::warn!(date = %bar.date, close = bar.close, "skipping buy on non-positive close");
                    continue;
                }
                let shares = (initial_capital / bar.close).floor() as u64;
                trades.push(Trade::buy(bar.date, bar.close, shares));
                position = Some(Position {
                    entry_date: bar.date,
                    entry_price: bar.close,
                    shares,
                });
            }
            (Signal::Sell, Some(open)) => {
                if !bar.close.is_finite() {
                    tracing::warn!(date = %bar.date, "skipping sell on non-numeric close");
                    continue;
                }
                trades.push(Trade::sell(bar.date, bar.close, open));
                position = None;
            }
            _ => {}
        }
    }

    Ok(LedgerRun {
        trades,
        open_position: position,
    })
}

/// Drop every trade whose kind repeats the previously kept trade's kind,
/// keeping the first one seen. A leading Sell has no Buy to close and is
/// dropped as well.
pub fn repair_alternation(trades: &[Trade]) -> Vec<Trade> {
    let mut kept: Vec<Trade> = Vec::with_capacity(trades.len());
    for trade in trades {
        let expected = match kept.last() {
            None | Some(Trade { kind: TradeKind::Sell, .. }) => TradeKind::Buy,
            Some(Trade { kind: TradeKind::Buy, .. }) => TradeKind::Sell,
        };
        if trade.kind == expected {
            kept.push(trade.clone());
        }
    }
    kept
}
