//! Strategy parameters for a crossover run.

use crate::domain::error::MacrossError;
use crate::domain::indicator::{IndicatorKind, check_span};

pub const DEFAULT_FAST_SPAN: usize = 20;
pub const DEFAULT_SLOW_SPAN: usize = 30;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

/// Everything a run depends on. Passed explicitly on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyParams {
    pub indicator: IndicatorKind,
    pub fast_span: usize,
    pub slow_span: usize,
    pub initial_capital: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            indicator: IndicatorKind::Dema,
            fast_span: DEFAULT_FAST_SPAN,
            slow_span: DEFAULT_SLOW_SPAN,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
        }
    }
}

impl StrategyParams {
    /// Reject out-of-range parameters. `fast_span < slow_span` is a caller
    /// convention and is not checked.
    pub fn validate(&self) -> Result<(), MacrossError> {
        check_span(self.fast_span)?;
        check_span(self.slow_span)?;
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(MacrossError::InvalidCapital {
                capital: self.initial_capital,
            });
        }
        Ok(())
    }

    /// e.g. `DEMA(20/30)`
    pub fn describe(&self) -> String {
        format!("{}({}/{})", self.indicator, self.fast_span, self.slow_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = StrategyParams::default();
        assert_eq!(p.indicator, IndicatorKind::Dema);
        assert_eq!(p.fast_span, 20);
        assert_eq!(p.slow_span, 30);
        assert_eq!(p.initial_capital, 100_000.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_span_rejected() {
        let p = StrategyParams {
            fast_span: 0,
            ..StrategyParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(MacrossError::InvalidSpan { span: 0 })
        ));

        let p = StrategyParams {
            slow_span: 0,
            ..StrategyParams::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn non_positive_capital_rejected() {
        for capital in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let p = StrategyParams {
                initial_capital: capital,
                ..StrategyParams::default()
            };
            assert!(matches!(
                p.validate(),
                Err(MacrossError::InvalidCapital { .. })
            ));
        }
    }

    #[test]
    fn fast_above_slow_is_allowed() {
        let p = StrategyParams {
            fast_span: 50,
            slow_span: 10,
            ..StrategyParams::default()
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn describe() {
        let p = StrategyParams {
            indicator: IndicatorKind::Sma,
            fast_span: 5,
            slow_span: 10,
            initial_capital: 1.0,
        };
        assert_eq!(p.describe(), "SMA(5/10)");
    }
}
