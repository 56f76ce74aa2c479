//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{CompanyResult, Instrument, rank_by_profit, run_batch};
use crate::domain::config_validation::{
    parse_codes, parse_optional_date, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::MacrossError;
use crate::domain::indicator::IndicatorKind;
use crate::domain::position::Position;
use crate::domain::strategy::{
    DEFAULT_FAST_SPAN, DEFAULT_INITIAL_CAPITAL, DEFAULT_SLOW_SPAN, StrategyParams,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "macross", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over one or more instruments
    Backtest(BacktestArgs),
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List instruments available in the data directory
    List {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

/// Command-line values take precedence over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct BacktestArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Instrument identifier (file stem); repeatable
    #[arg(long = "code")]
    pub codes: Vec<String>,
    #[arg(long)]
    pub indicator: Option<IndicatorKind>,
    #[arg(long)]
    pub fast: Option<usize>,
    #[arg(long)]
    pub slow: Option<usize>,
    #[arg(long)]
    pub capital: Option<f64>,
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// Write `<code>_trades.csv` and `<code>_series.csv` here
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest(args) => run_backtest(&args),
        Command::Validate { config } => run_validate(&config),
        Command::List { config, data_dir } => run_list(config.as_deref(), data_dir),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MacrossError> {
    FileConfigAdapter::from_file(path).map_err(|e| MacrossError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_optional_config(path: Option<&Path>) -> Result<FileConfigAdapter, MacrossError> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            load_config(p)
        }
        None => FileConfigAdapter::from_string("").map_err(|reason| MacrossError::ConfigParse {
            file: "<empty>".into(),
            reason,
        }),
    }
}

/// Strategy parameters from config with command-line overrides applied.
pub fn build_params(
    config: &dyn ConfigPort,
    args: &BacktestArgs,
) -> Result<StrategyParams, MacrossError> {
    let indicator = match args.indicator {
        Some(kind) => kind,
        None => match config.get_string("strategy", "indicator") {
            Some(raw) => {
                raw.parse::<IndicatorKind>()
                    .map_err(|e| MacrossError::ConfigInvalid {
                        section: "strategy".into(),
                        key: "indicator".into(),
                        reason: e.to_string(),
                    })?
            }
            None => IndicatorKind::default(),
        },
    };

    let span = |key: &str, flag: Option<usize>, default: usize| -> usize {
        flag.unwrap_or_else(|| {
            let value = config.get_int("strategy", key, default as i64);
            usize::try_from(value).unwrap_or(0)
        })
    };

    let params = StrategyParams {
        indicator,
        fast_span: span("fast_span", args.fast, DEFAULT_FAST_SPAN),
        slow_span: span("slow_span", args.slow, DEFAULT_SLOW_SPAN),
        initial_capital: args.capital.unwrap_or_else(|| {
            config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL)
        }),
    };
    params.validate()?;
    Ok(params)
}

pub fn resolve_data_dir(
    flag: Option<PathBuf>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, MacrossError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    match config.get_string("backtest", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(PathBuf::from(s.trim())),
        _ => Err(MacrossError::ConfigMissing {
            section: "backtest".into(),
            key: "data_dir".into(),
        }),
    }
}

/// Flags, then `[backtest] codes`, then every instrument the data port knows.
pub fn resolve_codes(
    flags: &[String],
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
) -> Result<Vec<String>, MacrossError> {
    if !flags.is_empty() {
        return Ok(flags.to_vec());
    }
    if let Some(codes) = config.get_string("backtest", "codes") {
        return parse_codes(&codes);
    }
    data_port.list_instruments()
}

fn run_backtest(args: &BacktestArgs) -> Result<(), MacrossError> {
    let config = load_optional_config(args.config.as_deref())?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;

    let params = build_params(&config, args)?;
    let data_dir = resolve_data_dir(args.data_dir.clone(), &config)?;
    let data_port = CsvAdapter::new(data_dir);
    let codes = resolve_codes(&args.codes, &config, &data_port)?;

    let start = match args.start {
        Some(d) => Some(d),
        None => parse_optional_date(&config, "start_date")?,
    };
    let end = match args.end {
        Some(d) => Some(d),
        None => parse_optional_date(&config, "end_date")?,
    };

    let results = run_backtest_pipeline(&data_port, &params, &codes, start, end)?;
    print_report(&results, &params);

    if let Some(dir) = &args.export_dir {
        export_results(dir, &results)?;
        eprintln!("\nExports written to: {}", dir.display());
    }
    Ok(())
}

/// Load every code, run the batch, and return results in code order.
/// Codes whose data cannot be loaded are skipped with a warning.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    params: &StrategyParams,
    codes: &[String],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<CompanyResult>, MacrossError> {
    let mut instruments = Vec::with_capacity(codes.len());
    for code in codes {
        match data_port.fetch_bars(code, start, end) {
            Ok(bars) if bars.is_empty() => {
                tracing::warn!(code = %code, "no bars in range, skipping");
            }
            Ok(bars) => instruments.push(Instrument {
                identifier: code.clone(),
                bars,
            }),
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "skipping instrument");
            }
        }
    }

    if instruments.is_empty() {
        return Err(MacrossError::NoData {
            identifier: codes.join(","),
        });
    }

    eprintln!(
        "Running {} on {} instruments",
        params.describe(),
        instruments.len()
    );
    run_batch(&instruments, params)
}

pub fn print_report(results: &[CompanyResult], params: &StrategyParams) {
    for company in results {
        let s = &company.result.summary;
        println!("\n=== {} ===", company.identifier);
        println!("Bars:             {}", company.result.bars.len());
        println!("Total Trades:     {}", s.total_trades);
        println!("Total Profit:     {:.2}", s.total_profit);
        println!("Win Rate:         {:.2}%", s.win_rate);
        println!("Total Return:     {:.2}%", s.total_return);
        println!("Final Capital:    {:.2}", s.final_capital);
        println!(
            "Wins/Losses:      {}/{} ({} break-even)",
            s.win_count, s.loss_count, s.break_even_count
        );
        if let (Some(open), Some(last)) = (
            &company.result.open_position,
            company.result.bars.last(),
        ) {
            println!("{}", format_open_position(open, last.bar.close));
        }
    }

    if results.len() > 1 {
        println!("\n=== Ranking by Total Profit ({}) ===", params.describe());
        for (rank, company) in rank_by_profit(results).iter().enumerate() {
            let s = &company.result.summary;
            println!(
                "{:>3}. {:<12} {:>14.2}  {:>3} trades  {:>6.2}% win  {:>7.2}% return",
                rank + 1,
                company.identifier,
                s.total_profit,
                s.total_trades,
                s.win_rate,
                s.total_return,
            );
        }
    }
}

/// Report line for a position still open after the last bar, marked at
/// `last_close`.
pub fn format_open_position(open: &Position, last_close: f64) -> String {
    format!(
        "Open Position:    {} shares @ {:.2} since {} (unrealized {:.2})",
        open.shares,
        open.entry_price,
        open.entry_date,
        open.unrealized_pnl(last_close)
    )
}

pub fn export_results(dir: &Path, results: &[CompanyResult]) -> Result<(), MacrossError> {
    fs::create_dir_all(dir)?;
    for company in results {
        csv_adapter::write_trades(
            &dir.join(format!("{}_trades.csv", company.identifier)),
            &company.result.trades,
        )?;
        csv_adapter::write_annotated(
            &dir.join(format!("{}_series.csv", company.identifier)),
            &company.result.bars,
        )?;
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), MacrossError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;

    let params = build_params(&config, &BacktestArgs::default())?;
    let data_dir = resolve_data_dir(None, &config)?;

    eprintln!("  strategy:  {}", params.describe());
    eprintln!("  capital:   {:.2}", params.initial_capital);
    eprintln!("  data_dir:  {}", data_dir.display());
    if let Some(codes) = config.get_string("backtest", "codes") {
        eprintln!("  codes:     {}", parse_codes(&codes)?.join(", "));
    }
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_list(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<(), MacrossError> {
    let config = load_optional_config(config_path)?;
    let data_dir = resolve_data_dir(data_dir, &config)?;
    let identifiers = CsvAdapter::new(data_dir.clone()).list_instruments()?;

    if identifiers.is_empty() {
        eprintln!("No instruments found in {}", data_dir.display());
    } else {
        for identifier in &identifiers {
            println!("{}", identifier);
        }
        eprintln!("{} instruments found", identifiers.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn cli_parses_backtest_flags() {
        let cli = Cli::try_parse_from([
            "macross",
            "backtest",
            "--data-dir",
            "data",
            "--code",
            "AAPL",
            "--code",
            "MSFT",
            "--indicator",
            "sma",
            "--fast",
            "5",
            "--slow",
            "10",
            "--capital",
            "5000",
            "--start",
            "2024-01-01",
        ])
        .unwrap();

        let Command::Backtest(args) = cli.command else {
            panic!("expected backtest command");
        };
        assert_eq!(args.codes, vec!["AAPL", "MSFT"]);
        assert_eq!(args.indicator, Some(IndicatorKind::Sma));
        assert_eq!(args.fast, Some(5));
        assert_eq!(args.capital, Some(5000.0));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn cli_rejects_unknown_indicator() {
        assert!(Cli::try_parse_from(["macross", "backtest", "--indicator", "wma"]).is_err());
    }

    #[test]
    fn build_params_defaults() {
        let params = build_params(&config(""), &BacktestArgs::default()).unwrap();
        assert_eq!(params, StrategyParams::default());
    }

    #[test]
    fn build_params_from_config() {
        let cfg = config(
            "[backtest]\ninitial_capital = 5000\n[strategy]\nindicator = ema\nfast_span = 3\nslow_span = 8\n",
        );
        let params = build_params(&cfg, &BacktestArgs::default()).unwrap();
        assert_eq!(params.indicator, IndicatorKind::Ema);
        assert_eq!(params.fast_span, 3);
        assert_eq!(params.slow_span, 8);
        assert_eq!(params.initial_capital, 5000.0);
    }

    #[test]
    fn flags_override_config() {
        let cfg = config("[strategy]\nindicator = ema\nfast_span = 3\n");
        let args = BacktestArgs {
            indicator: Some(IndicatorKind::Sma),
            fast: Some(7),
            capital: Some(1.0),
            ..BacktestArgs::default()
        };
        let params = build_params(&cfg, &args).unwrap();
        assert_eq!(params.indicator, IndicatorKind::Sma);
        assert_eq!(params.fast_span, 7);
        assert_eq!(params.initial_capital, 1.0);
    }

    #[test]
    fn build_params_rejects_zero_span() {
        let args = BacktestArgs {
            slow: Some(0),
            ..BacktestArgs::default()
        };
        assert!(matches!(
            build_params(&config(""), &args),
            Err(MacrossError::InvalidSpan { span: 0 })
        ));
    }

    #[test]
    fn data_dir_flag_wins() {
        let cfg = config("[backtest]\ndata_dir = /from/config\n");
        assert_eq!(
            resolve_data_dir(Some(PathBuf::from("/flag")), &cfg).unwrap(),
            PathBuf::from("/flag")
        );
        assert_eq!(
            resolve_data_dir(None, &cfg).unwrap(),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn open_position_line_marks_to_last_close() {
        let open = Position {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 21).unwrap(),
            entry_price: 110.0,
            shares: 909,
        };
        assert_eq!(
            format_open_position(&open, 150.0),
            "Open Position:    909 shares @ 110.00 since 2024-01-21 (unrealized 36360.00)"
        );
        assert!(format_open_position(&open, 100.0).ends_with("(unrealized -9090.00)"));
    }

    #[test]
    fn data_dir_missing() {
        assert!(matches!(
            resolve_data_dir(None, &config("")),
            Err(MacrossError::ConfigMissing { .. })
        ));
    }
}
