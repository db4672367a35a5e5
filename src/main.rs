/**
* filename : main
* author : HAMA
* date: 2026. 10. 19.
* description: 명령줄 주문 실행기
**/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;

use xExec::config::Config;
use xExec::exchange::{BinanceFuturesExchange, DryRunExchange, ExchangeClient};
use xExec::utils::logging::{self, FacadeLogger};
use xExec::{ExecutionEngine, OrderResponse, OrderSide, OrderType, StrategyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    #[value(name = "MARKET")]
    Market,
    #[value(name = "LIMIT")]
    Limit,
    #[value(name = "STOP_LIMIT")]
    StopLimit,
    #[value(name = "TWAP")]
    Twap,
    #[value(name = "GRID")]
    Grid,
}

/// Binance futures bot: MARKET, LIMIT, STOP_LIMIT, TWAP and GRID with precision handling
#[derive(Debug, Parser)]
#[command(name = "xexec", version, about)]
struct Cli {
    /// API key
    #[arg(long, env = "BINANCE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API secret
    #[arg(long, env = "BINANCE_API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,

    /// Trading symbol, e.g. BTCUSDT
    #[arg(long)]
    symbol: String,

    /// BUY or SELL
    #[arg(long)]
    side: OrderSide,

    /// Order type or strategy
    #[arg(long = "type", value_enum, ignore_case = true)]
    order_type: Mode,

    /// Order quantity, or total quantity for TWAP/GRID
    #[arg(long)]
    quantity: Decimal,

    /// Price for LIMIT and STOP_LIMIT orders
    #[arg(long)]
    price: Option<Decimal>,

    /// Stop price for STOP_LIMIT orders
    #[arg(long)]
    stop_price: Option<Decimal>,

    /// Total TWAP duration in seconds
    #[arg(long)]
    duration: Option<u64>,

    /// Number of TWAP slices
    #[arg(long)]
    intervals: Option<usize>,

    /// Lowest grid price
    #[arg(long)]
    lower_price: Option<Decimal>,

    /// Highest grid price
    #[arg(long)]
    upper_price: Option<Decimal>,

    /// Number of grid levels
    #[arg(long)]
    grids: Option<usize>,

    /// Use the futures testnet (default)
    #[arg(long, conflicts_with = "mainnet")]
    testnet: bool,

    /// Use the production futures API
    #[arg(long)]
    mainnet: bool,

    /// Acknowledge orders locally without sending them
    #[arg(long)]
    dry_run: bool,

    /// Path to a JSON config file (default: ./config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Failed to place order: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), anyhow::Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.api_key.is_some() { config.exchange.api_key = cli.api_key.clone(); }
    if cli.api_secret.is_some() { config.exchange.api_secret = cli.api_secret.clone(); }
    if cli.mainnet { config.exchange.testnet = false; }
    if cli.testnet { config.exchange.testnet = true; }
    if cli.dry_run { config.exchange.dry_run = true; }

    logging::init(&config.logging)?;

    let client = connect(&config).await?;
    let engine = ExecutionEngine::new(client, Arc::new(FacadeLogger::default())).await?;

    let output = match cli.order_type {
        Mode::Market | Mode::Limit | Mode::StopLimit => {
            let order_type = match cli.order_type {
                Mode::Market => OrderType::Market,
                Mode::Limit => OrderType::Limit,
                _ => OrderType::StopLimit,
            };
            let response = engine
                .place_order(&cli.symbol, cli.side, order_type, cli.quantity, cli.price, cli.stop_price)
                .await?;
            serde_json::to_value(response)?
        }
        Mode::Twap => {
            let (duration, intervals) = cli.duration.zip(cli.intervals)
                .ok_or_else(|| anyhow!("TWAP requires --duration and --intervals"))?;
            let result = engine
                .execute_twap(&cli.symbol, cli.side, cli.quantity, duration, intervals)
                .await;
            strategy_output(result)?
        }
        Mode::Grid => {
            let (lower, upper, grids) = match (cli.lower_price, cli.upper_price, cli.grids) {
                (Some(lower), Some(upper), Some(grids)) => (lower, upper, grids),
                _ => bail!("GRID requires --lower-price, --upper-price and --grids"),
            };
            let result = engine
                .execute_grid(&cli.symbol, cli.side, cli.quantity, lower, upper, grids)
                .await;
            strategy_output(result)?
        }
    };

    println!("Order response:");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn connect(config: &Config) -> Result<Arc<dyn ExchangeClient>, anyhow::Error> {
    if config.exchange.dry_run {
        // exchangeInfo is public, so dry runs still get real precision rules when reachable
        let public = BinanceFuturesExchange::new(config.exchange.resolved_base_url(), "", "");
        let rules = match public.fetch_symbol_rules().await {
            Ok(rules) => rules,
            Err(e) => {
                log::warn!("dry run without precision rules: {}", e);
                Default::default()
            }
        };
        log::info!("dry run: orders will not be sent");
        return Ok(Arc::new(DryRunExchange::with_rules(rules)));
    }

    if config.exchange.api_key.is_none() || config.exchange.api_secret.is_none() {
        bail!("API key and secret must be provided via flags or environment variables");
    }
    Ok(Arc::new(BinanceFuturesExchange::from_config(&config.exchange)?))
}

/// Print what completed before a strategy failure, then surface the failure.
fn strategy_output(result: Result<Vec<OrderResponse>, StrategyError>) -> Result<serde_json::Value, anyhow::Error> {
    match result {
        Ok(responses) => Ok(serde_json::to_value(responses)?),
        Err(e) => {
            if !e.completed.is_empty() {
                println!("Completed before failure:");
                println!("{}", serde_json::to_string_pretty(&e.completed)?);
            }
            Err(e.into())
        }
    }
}
