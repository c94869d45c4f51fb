//! StockDesk CLI — run the query API and work with the metric cache.
//!
//! Commands:
//! - `serve` — HTTP API over the shared pipeline
//! - `companies` — list the company directory
//! - `show` — print the most recent metric rows for a symbol
//! - `summary` — print summary statistics for a symbol
//! - `refresh` — re-fetch and replace cached rows
//! - `export` — write recent rows to CSV
//! - `init-config` — write a default TOML config

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stockdesk_core::export::export_rows_csv;
use stockdesk_core::{AppConfig, MetricRow, Pipeline, Summary};

#[derive(Parser)]
#[command(
    name = "stockdesk",
    version,
    about = "StockDesk: daily stock metrics, cached in SQLite"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "stockdesk.toml")]
    config: PathBuf,

    /// Read bars from `<DIR>/<SYMBOL>.csv` instead of Yahoo Finance.
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP query API.
    Serve {
        /// Bind address. Overrides `[server] host`.
        #[arg(long)]
        host: Option<String>,

        /// Bind port. Overrides `[server] port`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// List the company directory.
    Companies,
    /// Print the most recent metric rows for a symbol.
    Show {
        symbol: String,

        /// Number of most recent rows.
        #[arg(long, default_value_t = 30)]
        days: usize,

        /// Print rows as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print summary statistics for a symbol.
    Summary { symbol: String },
    /// Re-fetch and replace cached rows.
    Refresh {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Write the most recent rows to a CSV file.
    Export {
        symbol: String,

        /// Output file. Defaults to `<SYMBOL>_data.csv`.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of most recent rows.
        #[arg(long, default_value_t = 30)]
        days: usize,
    },
    /// Write a config file with default settings.
    InitConfig {
        /// Output path. Defaults to the --config path.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    if let Commands::InitConfig { out, force } = &cli.command {
        let path = out.as_deref().unwrap_or(&cli.config);
        return run_init_config(path, *force);
    }

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let pipeline = Pipeline::from_config(&config, cli.csv_dir.as_deref())?;
    pipeline.seed_directory(&config.directory())?;

    match cli.command {
        Commands::Serve { host, port } => run_serve(config, pipeline, host, port),
        Commands::Companies => run_companies(&pipeline),
        Commands::Show { symbol, days, json } => run_show(&pipeline, &symbol, days, json),
        Commands::Summary { symbol } => run_summary(&pipeline, &symbol),
        Commands::Refresh { symbols } => run_refresh(&pipeline, &symbols),
        Commands::Export { symbol, out, days } => {
            let out = out.unwrap_or_else(|| PathBuf::from(format!("{symbol}_data.csv")));
            run_export(&pipeline, &symbol, &out, days)
        }
        Commands::InitConfig { .. } => Ok(()), // handled above
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockdesk=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_serve(
    mut config: AppConfig,
    pipeline: Pipeline,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let directory = config.directory();
    let pipeline = Arc::new(pipeline);
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        provider = pipeline.provider_name(),
        "starting query API"
    );

    // The pipeline owns a blocking HTTP client: build and drop it outside
    // the runtime.
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(stockdesk_api::serve(
        &config.server,
        Arc::clone(&pipeline),
        directory,
    ))?;
    drop(runtime);
    drop(pipeline);
    Ok(())
}

fn run_companies(pipeline: &Pipeline) -> Result<()> {
    let companies = pipeline.list_companies()?;
    println!("{:<16} {}", "Symbol", "Name");
    println!("{}", "-".repeat(48));
    for c in &companies {
        println!("{:<16} {}", c.symbol, c.name);
    }
    Ok(())
}

fn run_show(pipeline: &Pipeline, symbol: &str, days: usize, json: bool) -> Result<()> {
    let rows = pipeline.get_recent(symbol, days)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

fn print_rows(rows: &[MetricRow]) {
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12} {:>9} {:>10} {:>10} {:>10} {:>8}",
        "Date", "Open", "High", "Low", "Close", "Volume", "Return%", "MA-7", "52W High", "52W Low",
        "Vol%"
    );
    println!("{}", "-".repeat(121));
    for r in rows {
        println!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12} {:>+9.2} {:>10.2} {:>10.2} {:>10.2} {:>8.2}",
            r.date,
            r.open,
            r.high,
            r.low,
            r.close,
            r.volume,
            r.daily_return_percent(),
            r.ma_7,
            r.week_52_high,
            r.week_52_low,
            r.volatility_score,
        );
    }
}

fn run_summary(pipeline: &Pipeline, symbol: &str) -> Result<()> {
    let summary = pipeline.summary(symbol)?;
    print_summary(symbol, &summary);
    Ok(())
}

fn print_summary(symbol: &str, s: &Summary) {
    let band = s.volatility_band();
    println!("=== {symbol} ===");
    println!("Current price:      {:.2}", s.current_price);
    println!("52-week high:       {:.2}", s.week_52_high);
    println!("52-week low:        {:.2}", s.week_52_low);
    println!("Average close:      {:.2}", s.avg_close);
    println!("Avg daily return:   {:+.4}%", s.avg_daily_return_percent);
    println!(
        "Volatility score:   {:.2}% ({}: {})",
        s.volatility_score,
        band.label(),
        band.description()
    );
    println!("Average volume:     {:.0}", s.avg_volume);
    println!("Trading days:       {}", s.total_days);
}

fn run_refresh(pipeline: &Pipeline, symbols: &[String]) -> Result<()> {
    let mut failed = 0usize;
    for symbol in symbols {
        match pipeline.refresh(symbol) {
            Ok(result) => {
                tracing::info!(symbol = %symbol, rows = result.rows.len(), "refreshed");
                println!("{symbol}: {} rows", result.rows.len());
            }
            Err(e) => {
                tracing::error!(symbol = %symbol, error = %e, "refresh failed");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} symbols failed to refresh", symbols.len());
    }
    Ok(())
}

fn run_export(pipeline: &Pipeline, symbol: &str, out: &Path, days: usize) -> Result<()> {
    let rows = pipeline.get_recent(symbol, days)?;
    export_rows_csv(&rows, out)
        .with_context(|| format!("exporting {symbol} to {}", out.display()))?;
    println!("Wrote {} rows to {}", rows.len(), out.display());
    Ok(())
}

fn run_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AppConfig::default().write_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
