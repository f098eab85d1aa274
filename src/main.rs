//! Binance price drop monitor
//!
//! Subscribes to a ticker stream and alerts when the price falls below
//! the trailing-window peak by a configured fraction.

use chrono::Duration;
use clap::{Parser, Subcommand};
use drop_monitor::{
    clock::{Clock, SystemClock},
    config::Config,
    evaluator::DropEvaluator,
    feed::{BinanceFeed, PriceFeed},
    monitor::Monitor,
    sink::{FanoutSink, LogSink, TelegramSink},
    window::WindowTracker,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "drop-monitor")]
#[command(about = "Alerts when a price falls below its trailing-window peak")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitor
    Run {
        /// Stream symbol override, e.g. "btcusdt"
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = if std::path::Path::new(&cli.config).exists() {
        Config::load(&cli.config)?
    } else {
        Config::load_default()?
    };

    match cli.command {
        Commands::Run { symbol } => run_monitor(config, symbol).await,
        Commands::Config => show_config(config),
    }
}

async fn run_monitor(mut config: Config, symbol: Option<String>) -> anyhow::Result<()> {
    if let Some(symbol) = symbol {
        config.feed.symbol = symbol;
    }

    tracing::info!(
        "Starting drop monitor for {} (period {}s, threshold {})",
        config.feed.symbol,
        config.alert.period_secs,
        config.alert.drop_threshold
    );

    let clock = Arc::new(SystemClock);
    let window = WindowTracker::new(clock.now(), Duration::seconds(config.alert.period_secs));
    let evaluator = DropEvaluator::new(config.alert.drop_threshold);

    let mut fanout = FanoutSink::new();
    fanout.push(Arc::new(LogSink));
    if let Some(telegram) = &config.telegram {
        fanout.push(Arc::new(TelegramSink::new(
            telegram.bot_token.clone(),
            telegram.chat_id.clone(),
            config.feed.symbol.clone(),
        )));
    }

    let mut monitor = Monitor::new(window, evaluator, Arc::new(fanout));

    let (tx, rx) = mpsc::channel(1024);
    let feed = BinanceFeed::new(config.feed.clone(), clock);
    let feed_task = tokio::spawn(async move {
        if let Err(e) = feed.run(tx).await {
            tracing::error!("Feed task ended: {}", e);
        }
    });

    let result = tokio::select! {
        res = monitor.run(rx) => res.map_err(Into::into),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    };

    feed_task.abort();
    result
}

fn show_config(config: Config) -> anyhow::Result<()> {
    println!("feed.ws_url = {}", config.feed.ws_url);
    println!("feed.symbol = {}", config.feed.symbol);
    println!(
        "feed.max_reconnect_attempts = {}",
        config.feed.max_reconnect_attempts
    );
    println!("alert.period_secs = {}", config.alert.period_secs);
    println!("alert.drop_threshold = {}", config.alert.drop_threshold);
    println!(
        "telegram = {}",
        if config.telegram.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    Ok(())
}
