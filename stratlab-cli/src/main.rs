//! StratLab CLI: backtest, compare, synthetic data and template commands.
//!
//! Commands:
//! - `run`: backtest one strategy from a TOML config, a CSV file or synthetic data
//! - `compare`: run every strategy variant over the same candles
//! - `synth`: write seeded synthetic candles to CSV
//! - `template save|latest|share|open`: saved settings and share tokens
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `stratlab=info`).

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stratlab_core::domain::{StrategyConfig, StrategyVariant, Timeframe, ValidationPolicy};
use stratlab_core::Stats;
use stratlab_runner::csv_io::export_candles;
use stratlab_runner::synthetic::{self, SyntheticSpec};
use stratlab_runner::{
    compare_variants, decode_share_token, encode_share_token, load_series, run_backtest,
    save_artifacts, BacktestResult, DataSource, RunConfig, TemplateStore, VariantSummary,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "stratlab",
    version,
    about = "StratLab CLI: deterministic strategy backtesting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one strategy and save its artifacts.
    Run {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print the summary only; write no artifacts.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Run every strategy variant over the same candles.
    Compare {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        strategy: StrategyArgs,
    },
    /// Write seeded synthetic candles to a CSV file.
    Synth {
        /// Seed for the generator.
        #[arg(long)]
        seed: u64,

        /// Number of candles.
        #[arg(long, default_value_t = 301)]
        bars: usize,

        /// Bar duration: 1m, 5m, 1h, 1d.
        #[arg(long, default_value = "1h")]
        timeframe: Timeframe,

        /// Symbol the candles are keyed by.
        #[arg(long, default_value = "BTC")]
        symbol: String,

        /// Open time of the last candle (unix seconds). Defaults to now.
        #[arg(long)]
        end_time: Option<i64>,

        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Saved strategy templates and share tokens.
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Save the given settings as the newest template and print its share token.
    Save {
        #[command(flatten)]
        strategy: StrategyArgs,

        /// Template store file.
        #[arg(long, default_value = "templates.json")]
        store: PathBuf,
    },
    /// Print the most recently saved template as JSON.
    Latest {
        /// Template store file.
        #[arg(long, default_value = "templates.json")]
        store: PathBuf,
    },
    /// Print a share token for the given settings without saving them.
    Share {
        #[command(flatten)]
        strategy: StrategyArgs,
    },
    /// Decode a share token and print the settings as JSON.
    Open {
        /// Token produced by `template save` or `template share`.
        token: String,
    },
}

/// Where the candles come from. Exactly one source is required.
#[derive(Args)]
struct DataArgs {
    /// Path to a TOML run configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a `time,open,high,low,close` CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Use synthetic candles with this seed.
    #[arg(long)]
    synthetic: Option<u64>,

    /// Number of synthetic candles.
    #[arg(long, default_value_t = 301)]
    bars: usize,

    /// Fail on the first invalid CSV candle instead of dropping it.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

/// Strategy settings. With `--config` these override the file's values.
#[derive(Args)]
struct StrategyArgs {
    /// Instrument symbol.
    #[arg(long)]
    symbol: Option<String>,

    /// Bar duration: 1m, 5m, 1h, 1d.
    #[arg(long)]
    timeframe: Option<Timeframe>,

    /// Strategy variant: sma_cross, breakout, rsi_mean_reversion.
    #[arg(long)]
    variant: Option<StrategyVariant>,

    /// Stop-loss distance in percent (0 disables).
    #[arg(long)]
    risk: Option<f64>,

    /// Take-profit distance in percent (0 disables).
    #[arg(long)]
    target: Option<f64>,

    /// Reference symbol for an illustrative peer curve (repeatable).
    #[arg(long = "benchmark")]
    benchmarks: Vec<String>,

    /// Seed for the peer curve factors.
    #[arg(long)]
    benchmark_seed: Option<u64>,
}

impl StrategyArgs {
    fn apply(&self, mut config: StrategyConfig) -> StrategyConfig {
        if let Some(symbol) = &self.symbol {
            config.symbol = symbol.clone();
        }
        if let Some(timeframe) = self.timeframe {
            config.timeframe = timeframe;
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(risk) = self.risk {
            config.risk_pct = risk;
        }
        if let Some(target) = self.target {
            config.target_pct = target;
        }
        if !self.benchmarks.is_empty() {
            config = config.with_benchmarks(self.benchmarks.iter().map(|s| s.to_uppercase()));
        }
        config
    }

    fn to_config(&self) -> StrategyConfig {
        self.apply(StrategyConfig::default())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stratlab=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Run {
            data,
            strategy,
            output_dir,
            no_save,
        } => run_cmd(&data, &strategy, output_dir, no_save),
        Commands::Compare { data, strategy } => compare_cmd(&data, &strategy),
        Commands::Synth {
            seed,
            bars,
            timeframe,
            symbol,
            end_time,
            out,
        } => synth_cmd(seed, bars, timeframe, &symbol, end_time, out),
        Commands::Template { action } => template_cmd(action),
    }
}

/// Build the run configuration from a config file or the inline flags.
fn build_run_config(data: &DataArgs, strategy: &StrategyArgs) -> Result<RunConfig> {
    let sources = [
        data.config.is_some(),
        data.csv.is_some(),
        data.synthetic.is_some(),
    ];
    match sources.iter().filter(|&&s| s).count() {
        0 => bail!("one of --config, --csv or --synthetic is required"),
        1 => {}
        _ => bail!("--config, --csv and --synthetic are mutually exclusive"),
    }

    let mut config = if let Some(path) = &data.config {
        let mut config = RunConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        config.strategy = strategy.apply(config.strategy);
        config
    } else if let Some(path) = &data.csv {
        let policy = if data.strict {
            ValidationPolicy::RejectSeries
        } else {
            ValidationPolicy::DropInvalid
        };
        RunConfig::new(
            strategy.to_config(),
            DataSource::Csv {
                path: path.clone(),
                policy,
            },
        )
    } else {
        let seed = data.synthetic.unwrap_or_default();
        RunConfig::new(
            strategy.to_config(),
            DataSource::Synthetic(SyntheticSpec::new(seed).with_bars(data.bars)),
        )
    };

    if let Some(seed) = strategy.benchmark_seed {
        config.benchmark.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn run_cmd(
    data: &DataArgs,
    strategy: &StrategyArgs,
    output_dir: PathBuf,
    no_save: bool,
) -> Result<()> {
    let config = build_run_config(data, strategy)?;
    tracing::info!(
        symbol = %config.strategy.symbol,
        variant = %config.strategy.variant,
        synthetic = config.is_synthetic(),
        "running backtest"
    );
    let result = run_backtest(&config)?;

    print_summary(&result);

    if !no_save {
        let run_dir = save_artifacts(&result, &output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn compare_cmd(data: &DataArgs, strategy: &StrategyArgs) -> Result<()> {
    let config = build_run_config(data, strategy)?;
    let loaded = load_series(&config)?;
    if loaded.series.is_empty() {
        bail!("no valid candles to compare on");
    }
    let rows = compare_variants(&loaded.series, &config.strategy);

    println!();
    println!(
        "=== Variant Comparison: {} {} ({} bars{}) ===",
        config.strategy.symbol,
        config.strategy.timeframe,
        loaded.series.len(),
        if loaded.has_synthetic { ", synthetic" } else { "" }
    );
    println!(
        "{:<20} {:>10} {:>8} {:>9} {:>10} {:>7}",
        "variant", "pnl %", "sharpe", "win rate", "max dd %", "trades"
    );
    for row in &rows {
        print_variant_row(row);
    }
    if let Some(first) = rows.first() {
        print_stats_row("buy_and_hold", &first.benchmark_stats, None);
    }
    Ok(())
}

fn synth_cmd(
    seed: u64,
    bars: usize,
    timeframe: Timeframe,
    symbol: &str,
    end_time: Option<i64>,
    out: PathBuf,
) -> Result<()> {
    if bars == 0 {
        bail!("--bars must be at least 1");
    }
    let mut spec = SyntheticSpec::new(seed).with_bars(bars);
    spec.end_time = end_time;
    let candles = synthetic::generate(symbol, timeframe, &spec);
    export_candles(&out, &candles)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!(
        "Wrote {} synthetic {} {} candles to {}",
        candles.len(),
        symbol,
        timeframe,
        out.display()
    );
    Ok(())
}

fn template_cmd(action: TemplateAction) -> Result<()> {
    match action {
        TemplateAction::Save { strategy, store } => {
            let config = strategy.to_config();
            let store = TemplateStore::new(store);
            let count = store.save(&config)?;
            println!(
                "Saved template ({count} stored in {})",
                store.path().display()
            );
            println!("Share token: {}", encode_share_token(&config)?);
        }
        TemplateAction::Latest { store } => {
            let store = TemplateStore::new(store);
            match store.latest()? {
                Some(config) => println!("{}", serde_json::to_string_pretty(&config)?),
                None => bail!("no templates saved in {}", store.path().display()),
            }
        }
        TemplateAction::Share { strategy } => {
            println!("{}", encode_share_token(&strategy.to_config())?);
        }
        TemplateAction::Open { token } => {
            let config = decode_share_token(&token).context("invalid share token")?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let config = &result.config;
    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {} ({})", config.symbol, config.timeframe);
    println!("Variant:        {}", config.variant);
    println!(
        "Exits:          stop {} / target {}",
        pct_or_off(config.risk_pct),
        pct_or_off(config.target_pct)
    );
    println!(
        "Bars:           {}{}",
        result.bar_count,
        if result.has_synthetic { " (synthetic)" } else { "" }
    );
    if result.skipped_rows > 0 || result.rejected_candles > 0 {
        println!(
            "Data quality:   {} rows skipped, {} candles rejected",
            result.skipped_rows, result.rejected_candles
        );
    }
    println!("Trades:         {}", result.output.trades.len());
    if let (Some(first), Some(last)) = (
        result.output.strategy_equity.first(),
        result.output.strategy_equity.last(),
    ) {
        println!(
            "Period:         {} to {}",
            format_time(first.time),
            format_time(last.time)
        );
    }
    println!();
    println!("--- Strategy ---");
    print_stats(result.strategy_stats());
    println!();
    println!("--- Buy & Hold ---");
    print_stats(result.benchmark_stats());

    if !result.peers.is_empty() {
        println!();
        println!("--- Peer curves (illustrative, scaled from {}) ---", config.symbol);
        for peer in &result.peers {
            println!("{:<8} factor {:.4}", peer.symbol, peer.factor);
        }
    }
    println!();
    println!("Config hash:    {}", result.fingerprint.config_hash);
    println!("Dataset hash:   {}", result.fingerprint.dataset_hash);
}

fn print_stats(stats: &Stats) {
    println!("PnL:            {:.2}%", stats.pnl_pct);
    println!("Sharpe:         {:.3}", stats.sharpe);
    println!("Win Rate:       {:.1}%", stats.win_rate * 100.0);
    println!("Max Drawdown:   {:.2}%", stats.max_drawdown_pct);
}

fn print_variant_row(row: &VariantSummary) {
    print_stats_row(row.variant.as_str(), &row.strategy_stats, Some(row.trade_count));
}

fn print_stats_row(label: &str, stats: &Stats, trades: Option<usize>) {
    println!(
        "{:<20} {:>10.2} {:>8.3} {:>8.1}% {:>10.2} {:>7}",
        label,
        stats.pnl_pct,
        stats.sharpe,
        stats.win_rate * 100.0,
        stats.max_drawdown_pct,
        trades.map_or_else(|| "-".to_string(), |t| t.to_string())
    );
}

fn pct_or_off(pct: f64) -> String {
    if pct > 0.0 {
        format!("{pct}%")
    } else {
        "off".to_string()
    }
}

fn format_time(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}
