use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use silverbullet::logging::init_tracing;
use silverbullet::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "silverbullet")]
#[command(about = "Session-gated SMA/RSI strategy for ES and NQ futures", long_about = None)]
struct Cli {
    //log level when RUST_LOG is unset (eg info, debug)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //path to csv of minute bars for every contract
        #[arg(long)]
        data: PathBuf,

        //json configuration (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        //override start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        //override end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        //override initial cash
        #[arg(long)]
        initial_cash: Option<f64>,

        //output path for trades csv
        #[arg(long)]
        output_trades_csv: Option<PathBuf>,

        //output path for equity curve csv
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,

        //output path for the strategy log
        #[arg(long)]
        output_log: Option<PathBuf>,
    },

    //write the default configuration as json
    InitConfig {
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Run {
            data,
            config,
            start,
            end,
            initial_cash,
            output_trades_csv,
            output_equity_csv,
            output_log,
        } => {
            let mut config = match config {
                Some(path) => AlgorithmConfig::from_json_file(&path)
                    .context(format!("Failed to load config from {:?}", path))?,
                None => AlgorithmConfig::default(),
            };
            if let Some(start) = start {
                config.start_date = start;
            }
            if let Some(end) = end {
                config.end_date = end;
            }
            if let Some(cash) = initial_cash {
                config.initial_cash = cash;
            }

            let result = run_backtest(&config, &data)?;

            println!("Backtest Results");
            println!("================\n");
            result.summary.pretty_print_table();

            if let Some(path) = output_trades_csv {
                save_trades_csv(&result.fills, &path)?;
                println!("\nTrades saved to {:?}", path);
            }
            if let Some(path) = output_equity_csv {
                save_equity_csv(&result.equity_curve, &path)?;
                println!("Equity curve saved to {:?}", path);
            }
            if let Some(path) = output_log {
                save_log(&result.log, &path)?;
                println!("Strategy log saved to {:?}", path);
            }
        }
        Commands::InitConfig { output } => {
            AlgorithmConfig::default()
                .to_json_file(&output)
                .context(format!("Failed to write config to {:?}", output))?;
            println!("Default configuration written to {:?}", output);
        }
    }

    Ok(())
}

fn run_backtest(config: &AlgorithmConfig, data_path: &Path) -> Result<BacktestResult> {
    info!(path = ?data_path, "loading bars");
    let bars =
        load_csv(data_path).context(format!("Failed to load data from {:?}", data_path))?;

    let mut engine = BacktestEngine::new(config, &bars).context("Invalid configuration")?;
    if engine.slice_count() == 0 {
        anyhow::bail!(
            "No bars for {:?} between {} and {}",
            config.underlyings,
            config.start_date,
            config.end_date
        );
    }

    info!(
        bars = bars.len(),
        slices = engine.slice_count(),
        underlyings = ?config.underlyings,
        "data loaded"
    );

    let mut strategy = SessionGatedSignalStrategy::new(config.signal.clone());
    Ok(engine.run(&mut strategy))
}

fn save_trades_csv(fills: &[Fill], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for fill in fills {
        writer.serialize(fill)?;
    }
    writer.flush()?;
    Ok(())
}

fn save_equity_csv(equity_curve: &[EquityPoint], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for point in equity_curve {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

fn save_log(log: &[LogEntry], path: &Path) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    for entry in log {
        writeln!(file, "{} {}", entry.time.to_rfc3339(), entry.message)?;
    }
    Ok(())
}
