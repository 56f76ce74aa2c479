//! Performance summary over a trade log.

use crate::domain::position::{Trade, TradeKind};
use crate::domain::strategy::StrategyParams;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Completed round-trips (Sell trades).
    pub total_trades: usize,
    pub total_profit: f64,
    pub win_count: usize,
    /// Includes break-even trades.
    pub loss_count: usize,
    pub break_even_count: usize,
    /// Percent, two decimals.
    pub win_rate: f64,
    /// Percent, two decimals.
    pub total_return: f64,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub params: StrategyParams,
}

impl Summary {
    pub fn compute(trades: &[Trade], params: &StrategyParams) -> Self {
        let initial_capital = params.initial_capital;

        let mut total_trades = 0usize;
        let mut total_profit = 0.0_f64;
        let mut win_count = 0usize;
        let mut loss_count = 0usize;
        let mut break_even_count = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trade in trades.iter().filter(|t| t.kind == TradeKind::Sell) {
            let pnl = trade.total_profit().unwrap_or(0.0);
            total_trades += 1;
            total_profit += pnl;

            if pnl > 0.0 {
                win_count += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else {
                loss_count += 1;
                if pnl == 0.0 {
                    break_even_count += 1;
                } else {
                    total_losses += pnl.abs();
                    largest_loss = largest_loss.max(pnl.abs());
                }
            }
        }

        let win_rate = if total_trades > 0 {
            win_count as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let final_capital = initial_capital + total_profit;
        let total_return = if initial_capital > 0.0 {
            (final_capital - initial_capital) / initial_capital * 100.0
        } else {
            0.0
        };

        let avg_win = if win_count > 0 {
            total_wins / win_count as f64
        } else {
            0.0
        };
        let strict_losses = loss_count - break_even_count;
        let avg_loss = if strict_losses > 0 {
            total_losses / strict_losses as f64
        } else {
            0.0
        };

        Summary {
            total_trades,
            total_profit,
            win_count,
            loss_count,
            break_even_count,
            win_rate: round2(win_rate),
            total_return: round2(total_return),
            initial_capital,
            final_capital,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            params: *params,
        }
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
