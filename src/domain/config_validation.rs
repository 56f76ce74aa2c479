//! Configuration validation.
//!
//! Validates config values before a backtest runs. Optional keys are only
//! checked when present; defaults are applied when the config is built.

use crate::domain::error::MacrossError;
use crate::domain::indicator::IndicatorKind;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::collections::HashSet;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    validate_initial_capital(config)?;
    validate_dates(config)?;
    if let Some(codes) = config.get_string("backtest", "codes") {
        parse_codes(&codes)?;
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    validate_indicator(config)?;
    validate_span(config, "fast_span")?;
    validate_span(config, "slow_span")?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> MacrossError {
    MacrossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let Some(raw) = config.get_string("backtest", "initial_capital") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        _ => Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be a positive number",
        )),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

/// Read an optional `YYYY-MM-DD` value from `[backtest]`.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, MacrossError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "backtest",
                    key,
                    format!("invalid {key} format, expected YYYY-MM-DD"),
                )
            }),
    }
}

fn validate_indicator(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    if let Some(raw) = config.get_string("strategy", "indicator") {
        raw.parse::<IndicatorKind>()
            .map_err(|e| invalid("strategy", "indicator", e.to_string()))?;
    }
    Ok(())
}

fn validate_span(config: &dyn ConfigPort, key: &str) -> Result<(), MacrossError> {
    let Some(raw) = config.get_string("strategy", key) else {
        return Ok(());
    };
    match raw.trim().parse::<usize>() {
        Ok(v) if v >= 1 => Ok(()),
        _ => Err(invalid(
            "strategy",
            key,
            format!("{key} must be a positive integer"),
        )),
    }
}

/// Split a comma-separated identifier list. Identifiers keep their case
/// since they name files.
pub fn parse_codes(input: &str) -> Result<Vec<String>, MacrossError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let code = token.trim();
        if code.is_empty() {
            return Err(invalid("backtest", "codes", "empty entry in code list"));
        }
        if !seen.insert(code.to_string()) {
            return Err(invalid("backtest", "codes", format!("duplicate code: {code}")));
        }
        codes.push(code.to_string());
    }

    Ok(codes)
}
