//! Fortune AI
//!
//! Predicts a token's outlook from its market data and holder count, tracks
//! token addresses, and refreshes their predictions in the background.

mod menu;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fortune_core::config::Config;
use menu::{MenuKind, Session};
use std::path::PathBuf;
use std::sync::Arc;
use token_tracker::Tracker;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "fortune-ai", version, about = "Token outlook prediction and tracking")]
struct Cli {
    /// TOML configuration file; environment variables take precedence.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seconds between refreshes of a tracked token.
    #[arg(long, global = true)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict a single token and exit.
    Predict { address: String },
    /// Interactive menu with tracking and periodic refresh (default).
    Menu,
    /// Interactive menu showing translated predictions.
    Translate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fortune_ai=info,fortune_core=info,token_tracker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(secs) = cli.interval {
        config.tracking.refresh_interval_secs = secs;
        config.validate()?;
    }

    let session = Session::from_config(&config);
    let mut stdout = std::io::stdout();

    match cli.command.unwrap_or(Command::Menu) {
        Command::Predict { address } => {
            menu::predict_once(&session, &address, &mut stdout).await?;
        }
        Command::Menu => run_interactive(&session, MenuKind::Extended).await?,
        Command::Translate => run_interactive(&session, MenuKind::Translation).await?,
    }

    Ok(())
}

/// Run a menu on stdin while printing background refresh reports.
async fn run_interactive(session: &Session, kind: MenuKind) -> Result<()> {
    info!(?kind, "Starting Fortune AI");

    let printer = spawn_report_printer(session.tracker.clone());
    let mut input = tokio::io::BufReader::new(tokio::io::stdin());
    let result = menu::run(session, kind, &mut input, &mut std::io::stdout()).await;

    session.tracker.shutdown();
    printer.abort();
    Ok(result?)
}

fn spawn_report_printer(tracker: Arc<Tracker>) -> tokio::task::JoinHandle<()> {
    let mut reports = tracker.subscribe();
    tokio::spawn(async move {
        loop {
            match reports.recv().await {
                Ok(report) => print!("{}", report::render_refresh(&report)),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Dropped refresh reports");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
