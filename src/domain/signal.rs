//! Crossover signal generation.
//!
//! Signals report raw crossovers between a fast and a slow series. They know
//! nothing about positions; whether a signal is acted on is decided by the
//! ledger.

use crate::domain::error::MacrossError;
use crate::domain::indicator::IndicatorSeries;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    #[default]
    Hold,
    Buy,
    Sell,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Hold => write!(f, "Hold"),
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
        }
    }
}

/// Classify one bar from the previous and current values of both series.
pub fn classify(
    prev_fast: Option<f64>,
    prev_slow: Option<f64>,
    fast: Option<f64>,
    slow: Option<f64>,
) -> Signal {
    let (Some(pf), Some(ps), Some(f), Some(s)) = (prev_fast, prev_slow, fast, slow) else {
        return Signal::Hold;
    };
    if [pf, ps, f, s].iter().any(|v| !v.is_finite()) {
        return Signal::Hold;
    }

    if f > s && pf <= ps {
        Signal::Buy
    } else if f < s && pf >= ps {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// One signal per bar. Index 0 is always `Hold`.
pub fn generate_signals(
    fast: &IndicatorSeries,
    slow: &IndicatorSeries,
) -> Result<Vec<Signal>, MacrossError> {
    if fast.len() != slow.len() {
        return Err(MacrossError::LengthMismatch {
            fast: fast.len(),
            slow: slow.len(),
        });
    }

    let mut signals = Vec::with_capacity(fast.len());
    for i in 0..fast.len() {
        let signal = if i == 0 {
            Signal::Hold
        } else {
            classify(fast.get(i - 1), slow.get(i - 1), fast.get(i), slow.get(i))
        };
        signals.push(signal);
    }
    Ok(signals)
}
