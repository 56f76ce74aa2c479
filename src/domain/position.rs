//! Position and trade records.

use chrono::NaiveDate;
use std::fmt;

/// An open long position. Lives only for the duration of one ledger pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: u64,
}

impl Position {
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares as f64 * (price - self.entry_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeKind {
    Buy,
    Sell,
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKind::Buy => write!(f, "Buy"),
            TradeKind::Sell => write!(f, "Sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealizedProfit {
    pub per_share: f64,
    pub total: f64,
}

/// Trade-level result of a Sell, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    Win,
    Loss,
    BreakEven,
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeOutcome::Win => write!(f, "Win"),
            TradeOutcome::Loss => write!(f, "Loss"),
            TradeOutcome::BreakEven => write!(f, "Break Even"),
        }
    }
}

/// One leg of a round-trip. `realized` is present exactly on Sell trades.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub kind: TradeKind,
    pub price: f64,
    pub shares: u64,
    pub realized: Option<RealizedProfit>,
}

impl Trade {
    pub fn buy(date: NaiveDate, price: f64, shares: u64) -> Self {
        Trade {
            date,
            kind: TradeKind::Buy,
            price,
            shares,
            realized: None,
        }
    }

    /// Close `position` at `price`.
    pub fn sell(date: NaiveDate, price: f64, position: &Position) -> Self {
        let per_share = price - position.entry_price;
        Trade {
            date,
            kind: TradeKind::Sell,
            price,
            shares: position.shares,
            realized: Some(RealizedProfit {
                per_share,
                total: per_share * position.shares as f64,
            }),
        }
    }

    pub fn total_profit(&self) -> Option<f64> {
        self.realized.map(|r| r.total)
    }

    pub fn outcome(&self) -> Option<TradeOutcome> {
        let total = self.total_profit()?;
        Some(if total > 0.0 {
            TradeOutcome::Win
        } else if total < 0.0 {
            TradeOutcome::Loss
        } else {
            TradeOutcome::BreakEven
        })
    }
}
