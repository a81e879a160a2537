//! Interactive numbered menus.
//!
//! Menus read from any `AsyncBufRead` and write to any `io::Write`. A failure
//! in one action is reported and the menu continues; end of input exits.

use crate::report;
use fortune_core::api::TranslatorClient;
use fortune_core::config::Config;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use token_tracker::{Pipeline, PipelineOutcome, PredictionLog, TrackOutcome, Tracker, TranslationSource};

/// Which menu to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// Tracking, manual fetch, periodic refresh, and translation.
    Extended,
    /// Fetch and tracked-list display, both with translation.
    Translation,
}

/// Services shared by every menu action.
pub struct Session {
    pub tracker: Arc<Tracker>,
    pub translator: Arc<dyn TranslationSource>,
}

impl Session {
    pub fn new(tracker: Arc<Tracker>, translator: Arc<dyn TranslationSource>) -> Self {
        Self { tracker, translator }
    }

    pub fn from_config(config: &Config) -> Self {
        let pipeline = Arc::new(Pipeline::from_config(config));
        let tracker = Tracker::new(
            pipeline,
            PredictionLog::new(config.tracking.log_file.clone()),
            config.tracking.refresh_interval(),
        );
        Self::new(
            Arc::new(tracker),
            Arc::new(TranslatorClient::from_config(&config.translator)),
        )
    }
}

/// Run the one-shot prediction for a single address.
pub async fn predict_once<W: Write>(session: &Session, address: &str, out: &mut W) -> io::Result<()> {
    writeln!(out, "Fortune AI: token outlook prediction")?;
    writeln!(out, "\nFetching token data for {}...", address)?;
    match session.tracker.pipeline().run(address).await {
        Ok(outcome) => write!(out, "{}", report::render_outcome("Prediction result", &outcome))?,
        Err(e) => writeln!(out, "Failed to fetch token data: {}", e)?,
    }
    out.flush()
}

/// Run a menu until the user exits or input ends.
pub async fn run<R, W>(session: &Session, kind: MenuKind, input: &mut R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let title = match kind {
        MenuKind::Extended => "Fortune AI: token outlook prediction (tracking)",
        MenuKind::Translation => "Fortune AI: token outlook prediction (translation)",
    };
    writeln!(out, "{}", title)?;

    loop {
        print_options(kind, out)?;
        let Some(choice) = prompt(input, out, "Select an option: ").await? else {
            writeln!(out, "\nExiting.")?;
            break;
        };

        let keep_going = match kind {
            MenuKind::Extended => extended_action(session, &choice, input, out).await?,
            MenuKind::Translation => translation_action(session, &choice, input, out).await?,
        };
        if !keep_going {
            break;
        }
    }

    out.flush()
}

fn print_options<W: Write>(kind: MenuKind, out: &mut W) -> io::Result<()> {
    let options: &[&str] = match kind {
        MenuKind::Extended => &[
            "Add token to tracking list",
            "Show tracking list",
            "Fetch token prediction",
            "Periodically refresh all tracked tokens",
            "Fetch token prediction with translation",
            "Show tracked predictions with translation",
            "Exit",
        ],
        MenuKind::Translation => &[
            "Fetch token prediction with translation",
            "Show tracked predictions with translation",
            "Exit",
        ],
    };

    writeln!(out)?;
    for (i, option) in options.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, option)?;
    }
    Ok(())
}

/// Returns `Ok(false)` when the menu should exit.
async fn extended_action<R, W>(session: &Session, choice: &str, input: &mut R, out: &mut W) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match choice {
        "1" => {
            let Some(address) = prompt(input, out, "Token address: ").await? else {
                return Ok(false);
            };
            add_to_tracking(session, &address, out).await?;
        }
        "2" => show_tracking_list(session, out).await?,
        "3" => {
            let Some(address) = prompt(input, out, "Token address: ").await? else {
                return Ok(false);
            };
            fetch_one(session, &address, out).await?;
        }
        "4" => refresh_all(session, out).await?,
        "5" => {
            let Some(address) = prompt(input, out, "Token address: ").await? else {
                return Ok(false);
            };
            fetch_one_translated(session, &address, out).await?;
        }
        "6" => show_tracked_translated(session, out).await?,
        "7" => {
            writeln!(out, "Exiting.")?;
            return Ok(false);
        }
        _ => writeln!(out, "Invalid choice.")?,
    }
    Ok(true)
}

async fn translation_action<R, W>(session: &Session, choice: &str, input: &mut R, out: &mut W) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match choice {
        "1" => {
            let Some(address) = prompt(input, out, "Token address: ").await? else {
                return Ok(false);
            };
            fetch_one_translated(session, &address, out).await?;
        }
        "2" => show_tracked_translated(session, out).await?,
        "3" => {
            writeln!(out, "Exiting.")?;
            return Ok(false);
        }
        _ => writeln!(out, "Invalid choice.")?,
    }
    Ok(true)
}

/// Write a prompt and read one trimmed line. `None` at end of input.
async fn prompt<R, W>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", label)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

async fn add_to_tracking<W: Write>(session: &Session, address: &str, out: &mut W) -> io::Result<()> {
    match session.tracker.track(address).await {
        TrackOutcome::Added => writeln!(out, "Added {} to the tracking list.", address),
        TrackOutcome::AlreadyTracked => {
            writeln!(out, "{} is already in the tracking list.", address)
        }
        TrackOutcome::Invalid => writeln!(out, "Token address must not be empty."),
    }
}

async fn show_tracking_list<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    writeln!(out, "\n--- Tracking list ---")?;
    let tracked = session.tracker.tracked().await;
    if tracked.is_empty() {
        writeln!(out, "(empty)")?;
    }
    for address in tracked {
        writeln!(out, "{}", address)?;
    }
    writeln!(out, "---------------------")
}

async fn fetch_one<W: Write>(session: &Session, address: &str, out: &mut W) -> io::Result<()> {
    match session.tracker.pipeline().run(address).await {
        Ok(outcome) => write!(out, "{}", report::render_outcome("Manual fetch result", &outcome)),
        Err(e) => writeln!(out, "Failed to fetch token data: {}", e),
    }
}

async fn refresh_all<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    if session.tracker.is_empty().await {
        return writeln!(out, "Tracking list is empty.");
    }
    writeln!(out, "\nStarting periodic refresh for all tracked tokens...")?;
    let started = session.tracker.start_refresh_all().await;
    writeln!(
        out,
        "{} refresh task(s) started, {} running.",
        started,
        session.tracker.active_refreshes()
    )
}

async fn fetch_one_translated<W: Write>(session: &Session, address: &str, out: &mut W) -> io::Result<()> {
    match session.tracker.pipeline().run(address).await {
        Ok(outcome) => {
            writeln!(out, "\n--- Manual fetch result ---")?;
            display_translated(session, &outcome, out).await
        }
        Err(e) => writeln!(out, "Failed to fetch token data: {}", e),
    }
}

async fn show_tracked_translated<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    writeln!(out, "\n--- Tracked token results ---")?;
    for (address, result) in session.tracker.snapshot_all().await {
        writeln!(out, "\nResults for {}:", address)?;
        match result {
            Ok(outcome) => display_translated(session, &outcome, out).await?,
            Err(e) => writeln!(out, "{}: failed to fetch token data: {}", address, e)?,
        }
    }
    writeln!(out, "---------------------")
}

async fn display_translated<W: Write>(
    session: &Session,
    outcome: &PipelineOutcome,
    out: &mut W,
) -> io::Result<()> {
    if let Some(local) = &outcome.local {
        let translated = session.translator.translate(&local.prediction).await;
        write!(out, "{}", report::render_translation(&local.prediction, &translated))?;
    }
    if let Some(ai) = &outcome.ai {
        let translated = session.translator.translate(&ai.prediction).await;
        write!(out, "{}", report::render_translation(&ai.prediction, &translated))?;
    }
    Ok(())
}
