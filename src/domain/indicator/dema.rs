//! Double Exponential Moving Average indicator.
//!
//! DEMA[i] = 2*EMA[i] - EMA(EMA)[i], both with the same span.
//! Inherits the EMA's immediate seed, so there is no warmup.

use crate::domain::error::MacrossError;
use crate::domain::indicator::ema::smooth;
use crate::domain::indicator::{IndicatorKind, IndicatorSeries, check_span, defined};

pub fn calculate_dema(close: &[f64], span: usize) -> Result<IndicatorSeries, MacrossError> {
    check_span(span)?;

    let ema = smooth(&defined(close), span);
    let ema_of_ema = smooth(&ema, span);

    let values = ema
        .iter()
        .zip(&ema_of_ema)
        .map(|(e, ee)| Some(2.0 * (*e)? - (*ee)?))
        .collect();

    Ok(IndicatorSeries {
        kind: IndicatorKind::Dema,
        span,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::ema::calculate_ema;
    use approx::assert_relative_eq;

    #[test]
    fn dema_seed_identity() {
        let close = [42.0, 40.0, 45.0];
        let dema = calculate_dema(&close, 5).unwrap();
        let ema = calculate_ema(&close, 5).unwrap();
        let ema_values: Vec<f64> = ema.values.iter().map(|v| v.unwrap()).collect();
        let ema_of_ema = calculate_ema(&ema_values, 5).unwrap();

        let expected = 2.0 * ema.values[0].unwrap() - ema_of_ema.values[0].unwrap();
        assert_eq!(dema.values[0], Some(expected));
        assert_eq!(dema.values[0], Some(42.0));
    }

    #[test]
    fn dema_matches_formula() {
        let close = [10.0, 12.0, 11.0, 15.0, 14.0, 18.0];
        let span = 3;
        let dema = calculate_dema(&close, span).unwrap();

        let ema: Vec<f64> = calculate_ema(&close, span)
            .unwrap()
            .values
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        let ema_of_ema = calculate_ema(&ema, span).unwrap();

        for i in 0..close.len() {
            let expected = 2.0 * ema[i] - ema_of_ema.values[i].unwrap();
            assert_relative_eq!(dema.values[i].unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn dema_fully_defined() {
        let dema = calculate_dema(&[5.0, 6.0, 7.0, 8.0], 10).unwrap();
        assert_eq!(dema.len(), 4);
        assert!(dema.values.iter().all(Option::is_some));
    }

    #[test]
    fn dema_constant_series() {
        let dema = calculate_dema(&[10.0; 8], 3).unwrap();
        for v in &dema.values {
            assert_relative_eq!(v.unwrap(), 10.0);
        }
    }

    #[test]
    fn dema_bad_close_is_undefined() {
        let dema = calculate_dema(&[10.0, f64::NAN, 10.0], 3).unwrap();
        assert_eq!(dema.values[1], None);
        assert_relative_eq!(dema.values[2].unwrap(), 10.0);
    }

    #[test]
    fn dema_empty() {
        assert!(calculate_dema(&[], 3).unwrap().is_empty());
    }
}
