use analytics::{rolling_annualized_mean, AnalyticsEngine};
use anyhow::{bail, Context};
use api_client::{fetch_price_table_with, CsvPriceProvider, PriceProvider, YahooClient};
use clap::{Args, Parser, Subcommand};
use configuration::settings::Config;
use configuration::DataSource;
use core_types::{Frequency, PriceSeries, PriceTable, ReturnSeries, Table};
use indicatif::{ProgressBar, ProgressStyle};
use reporter::{format_value, print_report, weights_table, write_drawdown_chart, write_rolling_mean_chart};
use risk::{portfolio_returns, InverseVolatility, WeightingScheme};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Trading days per year, used to turn `--years` into a window length.
const TRADING_DAYS_PER_YEAR: usize = 252;

/// The main entry point for the parity toolkit.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the report.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    if let Some(source) = cli.source {
        config.data.source = source;
    }

    // Execute the appropriate command
    match cli.command {
        Commands::RiskParity(args) => handle_risk_parity(args, config, cli.json).await,
        Commands::MeanReturn(args) => handle_mean_return(args, &config, cli.json).await,
        Commands::RollingMean(args) => handle_rolling_mean(args, &config, cli.json).await,
        Commands::Evaluate(args) => handle_evaluate(args, &config, cli.json).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Return analytics and inverse-volatility portfolios for futures.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file means defaults.
    #[arg(long, global = true, default_value = "parity.toml")]
    config: PathBuf,

    /// Where prices come from, overriding `data.source`.
    #[arg(long, global = true, value_enum)]
    source: Option<DataSource>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and evaluate an inverse-volatility (risk-parity) portfolio.
    RiskParity(RiskParityArgs),
    /// Annualized mean log return of one instrument.
    MeanReturn(SymbolArgs),
    /// Chart rolling annualized mean returns of one instrument.
    RollingMean(RollingMeanArgs),
    /// Full performance evaluation of one instrument.
    Evaluate(SymbolArgs),
}

#[derive(Args)]
struct RiskParityArgs {
    /// Comma-separated instrument identifiers (e.g., "ES=F,ZN=F,GC=F").
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// Rolling volatility window, in periods.
    #[arg(long)]
    window: Option<usize>,

    /// Sampling frequency: D, W or M.
    #[arg(long)]
    frequency: Option<Frequency>,

    /// Output path of the drawdown chart.
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Number of recent weight rows to print.
    #[arg(long, default_value_t = 5)]
    weight_rows: usize,
}

#[derive(Args)]
struct SymbolArgs {
    /// The instrument identifier (e.g., "ES=F").
    #[arg(long)]
    symbol: String,

    /// Sampling frequency: D, W or M.
    #[arg(long, default_value = "D")]
    frequency: Frequency,
}

#[derive(Args)]
struct RollingMeanArgs {
    #[arg(long)]
    symbol: String,

    /// Comma-separated window lengths in years.
    #[arg(long, value_delimiter = ',', default_values_t = [1usize, 3, 10])]
    years: Vec<usize>,

    /// Directory the charts are written to.
    #[arg(long, default_value = "plots")]
    chart_dir: PathBuf,
}

// ==============================================================================
// Data Loading
// ==============================================================================

fn build_provider(config: &Config) -> anyhow::Result<Box<dyn PriceProvider>> {
    let provider: Box<dyn PriceProvider> = match config.data.source {
        DataSource::Yahoo => Box::new(YahooClient::new(&config.data.base_url)?),
        DataSource::Csv => Box::new(CsvPriceProvider::new(&config.data.csv_dir)),
    };
    Ok(provider)
}

/// Downloads every symbol one after another behind a progress bar.
async fn download_prices(
    provider: &dyn PriceProvider,
    symbols: &[String],
) -> anyhow::Result<PriceTable> {
    let progress_bar = ProgressBar::new(symbols.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let result = fetch_price_table_with(provider, symbols, |series| {
        progress_bar.inc(1);
        progress_bar.set_message(format!("Fetched {}", series.name));
    })
    .await;

    match result {
        Ok(table) => {
            progress_bar.finish_with_message("Download complete!");
            Ok(table)
        }
        Err(e) => {
            progress_bar.abandon_with_message("Download failed");
            Err(anyhow::Error::new(e).context("failed to fetch price history"))
        }
    }
}

async fn download_symbol(config: &Config, symbol: &str) -> anyhow::Result<PriceSeries> {
    let provider = build_provider(config)?;
    let prices = provider
        .fetch_prices(symbol)
        .await
        .with_context(|| format!("failed to fetch price history for {}", symbol))?;
    tracing::info!(symbol, observations = prices.len(), "Fetched price history.");
    Ok(prices)
}

/// Log returns of a single instrument sampled at `freq`.
fn instrument_returns(prices: &PriceSeries, freq: Frequency) -> anyhow::Result<ReturnSeries> {
    let sampled = Table::align(std::slice::from_ref(prices))?.resample_last(freq);
    sampled
        .log_returns()
        .column(&prices.name)
        .with_context(|| format!("no return column for {}", prices.name))
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Handles the orchestration of the risk-parity pipeline.
async fn handle_risk_parity(
    args: RiskParityArgs,
    mut config: Config,
    json: bool,
) -> anyhow::Result<()> {
    // Command-line flags take precedence over the configuration file.
    if let Some(symbols) = args.symbols {
        config.data.symbols = symbols;
    }
    if let Some(window) = args.window {
        config.risk_parity.window = window;
    }
    if let Some(frequency) = args.frequency {
        config.data.frequency = frequency;
    }
    if let Some(chart) = args.chart {
        config.report.chart_path = chart;
    }
    config.validate()?;

    let frequency = config.data.frequency;
    tracing::info!(
        symbols = ?config.data.symbols,
        window = config.risk_parity.window,
        %frequency,
        "Starting risk-parity run."
    );

    let provider = build_provider(&config)?;
    let raw = download_prices(provider.as_ref(), &config.data.symbols).await?;

    let prices = raw
        .resample_last(frequency)
        .forward_fill()
        .drop_undefined_rows();
    if prices.nrows() < 2 {
        bail!(
            "the instruments share {} {} observation(s); at least 2 are needed",
            prices.nrows(),
            frequency
        );
    }
    tracing::info!(
        rows = prices.nrows(),
        first = %prices.index()[0],
        last = %prices.index()[prices.nrows() - 1],
        "Prepared common price history."
    );

    let returns = prices.log_returns();
    let scheme = InverseVolatility::new(config.risk_parity.window)?;
    let weights = scheme.weights(&returns)?;
    let portfolio = portfolio_returns(&returns, &weights)?;

    let evaluation = AnalyticsEngine::new()
        .evaluate_with_periods(&portfolio, config.periods_per_year())
        .with_context(|| {
            format!(
                "a {}-period window leaves no portfolio returns in {} periods of history",
                config.risk_parity.window,
                returns.nrows()
            )
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation.report)?);
    } else {
        print_report(
            &format!("Risk-parity portfolio ({})", scheme.name()),
            &evaluation.report,
            config.report.precision,
        );
        println!();
        println!("{}", weights_table(&weights, args.weight_rows, config.report.precision));
    }

    write_drawdown_chart(
        &evaluation.curve,
        "Cumulative Returns of Risk-Parity Portfolio",
        &config.report.chart_path,
    )?;
    Ok(())
}

async fn handle_mean_return(args: SymbolArgs, config: &Config, json: bool) -> anyhow::Result<()> {
    let prices = download_symbol(config, &args.symbol).await?;
    let returns = instrument_returns(&prices, args.frequency)?;
    let mean = AnalyticsEngine::new().annualized_mean_return(&returns, args.frequency);

    if json {
        let output = serde_json::json!({
            "symbol": args.symbol,
            "frequency": args.frequency,
            "annualized_mean_return": mean,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let percent = mean.map(|m| m * 100.0);
        println!("annualized_mean_return: {}%", format_value(percent, 2));
    }
    Ok(())
}

async fn handle_rolling_mean(
    args: RollingMeanArgs,
    config: &Config,
    json: bool,
) -> anyhow::Result<()> {
    let prices = download_symbol(config, &args.symbol).await?;
    let returns = instrument_returns(&prices, Frequency::Daily)?;
    let evaluation = AnalyticsEngine::new().evaluate(&returns, Frequency::Daily)?;
    let cumulative = evaluation
        .curve
        .cumulative_series(format!("{} cumulative return", args.symbol))?;

    let file_stem: String = args
        .symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let mut latest = Vec::with_capacity(args.years.len());
    for years in &args.years {
        let window = years * TRADING_DAYS_PER_YEAR;
        let rolling = rolling_annualized_mean(&returns, window, Frequency::Daily)?;
        let path = args
            .chart_dir
            .join(format!("{}_rolling_mean_{}y.html", file_stem, years));
        write_rolling_mean_chart(&cumulative, &rolling, &path)?;

        let last = rolling.values().iter().rev().copied().find(|v| !v.is_nan());
        if last.is_none() {
            tracing::warn!(years, window, available = returns.len(), "History is shorter than the window.");
        }
        latest.push((*years, last));
    }

    if json {
        let output: Vec<_> = latest
            .iter()
            .map(|(years, value)| serde_json::json!({ "years": years, "latest": value }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (years, value) in latest {
            println!(
                "rolling_annualized_mean_{}y: {}",
                years,
                format_value(value, config.report.precision)
            );
        }
    }
    Ok(())
}

async fn handle_evaluate(args: SymbolArgs, config: &Config, json: bool) -> anyhow::Result<()> {
    let prices = download_symbol(config, &args.symbol).await?;
    let returns = instrument_returns(&prices, args.frequency)?;
    let evaluation = AnalyticsEngine::new().evaluate(&returns, args.frequency)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation.report)?);
    } else {
        print_report(
            &format!("{} ({})", args.symbol, args.frequency),
            &evaluation.report,
            config.report.precision,
        );
    }
    Ok(())
}
