//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) bars are undefined.

use crate::domain::error::MacrossError;
use crate::domain::indicator::{IndicatorKind, IndicatorSeries, check_span};

pub fn calculate_sma(close: &[f64], span: usize) -> Result<IndicatorSeries, MacrossError> {
    check_span(span)?;

    let mut values = Vec::with_capacity(close.len());
    for i in 0..close.len() {
        if i + 1 < span {
            values.push(None);
            continue;
        }
        let window = &close[i + 1 - span..=i];
        if window.iter().any(|c| !c.is_finite()) {
            values.push(None);
            continue;
        }
        let sum: f64 = window.iter().sum();
        values.push(Some(sum / span as f64));
    }

    Ok(IndicatorSeries {
        kind: IndicatorKind::Sma,
        span,
        values,
    })
}
