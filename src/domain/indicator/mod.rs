//! Moving-average indicators.
//!
//! - `IndicatorKind`: which moving average a strategy compares
//! - `IndicatorSeries`: one value per bar, `None` where the average is undefined
//!   (SMA warm-up, or a bar whose close was not a finite number)
//!
//! Every calculator is a pure function of the close sequence and the span.

pub mod dema;
pub mod ema;
pub mod sma;

use crate::domain::error::MacrossError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndicatorKind {
    Sma,
    Ema,
    #[default]
    Dema,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub kind: IndicatorKind,
    pub span: usize,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Display label such as `DEMA(20)`.
    pub fn label(&self) -> String {
        format!("{}({})", self.kind, self.span)
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Sma => write!(f, "SMA"),
            IndicatorKind::Ema => write!(f, "EMA"),
            IndicatorKind::Dema => write!(f, "DEMA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown indicator {0:?} (expected SMA, EMA or DEMA)")]
pub struct UnknownIndicator(pub String);

impl FromStr for IndicatorKind {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMA" => Ok(IndicatorKind::Sma),
            "EMA" => Ok(IndicatorKind::Ema),
            "DEMA" => Ok(IndicatorKind::Dema),
            _ => Err(UnknownIndicator(s.trim().to_string())),
        }
    }
}

pub(crate) fn check_span(span: usize) -> Result<(), MacrossError> {
    if span == 0 {
        return Err(MacrossError::InvalidSpan { span });
    }
    Ok(())
}

/// Map raw closes to defined/undefined inputs.
pub(crate) fn defined(close: &[f64]) -> Vec<Option<f64>> {
    close.iter().map(|&c| c.is_finite().then_some(c)).collect()
}

/// Compute the moving average selected by `kind`.
pub fn compute(
    kind: IndicatorKind,
    close: &[f64],
    span: usize,
) -> Result<IndicatorSeries, MacrossError> {
    match kind {
        IndicatorKind::Sma => sma::calculate_sma(close, span),
        IndicatorKind::Ema => ema::calculate_ema(close, span),
        IndicatorKind::Dema => dema::calculate_dema(close, span),
    }
}
