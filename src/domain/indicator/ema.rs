//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed EMA[0] = C[0], then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: every bar with a finite close has a value.

use crate::domain::error::MacrossError;
use crate::domain::indicator::{IndicatorKind, IndicatorSeries, check_span, defined};

pub fn calculate_ema(close: &[f64], span: usize) -> Result<IndicatorSeries, MacrossError> {
    check_span(span)?;
    Ok(IndicatorSeries {
        kind: IndicatorKind::Ema,
        span,
        values: smooth(&defined(close), span),
    })
}

pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA recurrence over possibly-undefined inputs.
///
/// An undefined input yields an undefined output and leaves the running
/// average untouched; the first defined input seeds it.
pub(crate) fn smooth(input: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let k = smoothing_factor(span);
    let mut ema: Option<f64> = None;

    input
        .iter()
        .map(|value| {
            let x = (*value)?;
            let next = match ema {
                None => x,
                Some(prev) => x * k + prev * (1.0 - k),
            };
            ema = Some(next);
            Some(next)
        })
        .collect()
}
