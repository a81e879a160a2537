//! Console rendering of prediction results.

use token_tracker::{PipelineOutcome, RefreshReport, RefreshStatus};

const RULE: &str = "---------------------";

/// Render a pipeline outcome as a titled block.
pub fn render_outcome(title: &str, outcome: &PipelineOutcome) -> String {
    let mut report = String::new();

    report.push_str(&format!("\n--- {} ---\n", title));
    report.push_str(&format!("Address: {}\n", outcome.address));

    if let Some(local) = &outcome.local {
        report.push_str(&format!(
            "Symbol: {} | Market cap: {} | Holders: {} | Price: {}\n",
            local.symbol, local.market_cap, local.holders_count, local.price
        ));
        report.push_str(&format!("Local prediction: {}\n", local.prediction));
    }
    if let Some(ai) = &outcome.ai {
        report.push_str(&format!("AI prediction: {}\n", ai.prediction));
    }
    if outcome.local.is_none() && outcome.ai.is_none() {
        report.push_str("No prediction available.\n");
    }

    report.push_str(RULE);
    report.push('\n');
    report
}

/// Render a text next to its translation.
pub fn render_translation(original: &str, translated: &str) -> String {
    format!(
        "\n--- Original ---\n{}\n\n--- Translated ---\n{}\n{}\n",
        original, translated, RULE
    )
}

/// Render a background refresh notification.
pub fn render_refresh(report: &RefreshReport) -> String {
    match &report.status {
        RefreshStatus::Updated(outcome) => render_outcome(
            &format!("Refresh #{} ({})", report.iteration, report.address),
            outcome,
        ),
        RefreshStatus::Failed { error } => format!(
            "\nRefresh #{} failed for {}: {}\n",
            report.iteration, report.address, error
        ),
    }
}
