//! Receipt autofill commands
//!
//! `--image` runs the configured recognizer first; `--text` starts from an
//! existing transcription. Both end in the same proposal and optional apply.

use std::path::Path;

use anyhow::{Context, Result};
use bartab_core::autofill::{autofill_text, AutofillError, Reconciliation};
use bartab_core::catalog::PendingSelection;
use bartab_core::config::RecognizerConfig;
use bartab_core::db::Database;
use bartab_core::models::format_currency;
use bartab_core::recognizer::{RecognitionProgress, TextRecognizer};
use tracing::debug;

/// Recognize a receipt photo with the configured engine, then autofill
pub async fn cmd_autofill_image(db: &Database, image: &Path, apply: bool) -> Result<()> {
    let config = RecognizerConfig::load().context("Failed to load recognizer config")?;
    let recognizer = config.build()?;
    autofill_from_image(db, recognizer.as_ref(), image, apply).await
}

/// Autofill from an image using a specific recognizer
pub async fn autofill_from_image(
    db: &Database,
    recognizer: &dyn TextRecognizer,
    image: &Path,
    apply: bool,
) -> Result<()> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let text = recognizer
        .recognize(&bytes, &print_progress)
        .await
        .context("Text recognition failed")?;

    run_autofill(db, &text, apply)
}

/// Autofill from a text file holding a transcribed receipt
pub fn cmd_autofill_text(db: &Database, file: &Path, apply: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read text file: {}", file.display()))?;
    run_autofill(db, &text, apply)
}

fn print_progress(event: RecognitionProgress) {
    match event {
        RecognitionProgress::Started { engine } => {
            println!("🔍 Recognizing receipt with {}...", engine)
        }
        RecognitionProgress::Recognizing { progress } => {
            debug!("Recognition {:.0}%", progress * 100.0)
        }
        RecognitionProgress::Finished { chars } => {
            println!("   Recognized {} characters", chars)
        }
    }
}

/// Reconcile recognized text and print (or record) the proposal
pub fn run_autofill(db: &Database, text: &str, apply: bool) -> Result<()> {
    let catalog = db.catalog_snapshot()?;

    let proposal = match autofill_text(text, &catalog) {
        Ok(proposal) => proposal,
        Err(AutofillError::NothingRecognized) => {
            println!("❓ Nothing useful could be read from the receipt.");
            println!("   Try a sharper photo, or enter the sale with 'bartab sell'.");
            return Ok(());
        }
        Err(AutofillError::ClientUnresolved { query }) => {
            println!("❓ No client matches '{}'.", query);
            println!("   Add them with 'bartab clients add', or fix the name and retry.");
            return Ok(());
        }
    };

    print_proposal(&proposal);

    if !apply {
        if !proposal.items.is_empty() {
            println!();
            println!("   Run again with --apply to record these items.");
        }
        return Ok(());
    }

    let mut selection = PendingSelection::new();
    proposal.apply_to(&mut selection);

    if selection.is_empty() {
        println!("   Nothing to record.");
        return Ok(());
    }

    let client_id = selection.client_id().unwrap_or(proposal.client.id);
    let ids = db.record_purchases(client_id, &selection.items())?;

    println!();
    println!(
        "✅ Recorded {} item line(s) on {}'s tab",
        ids.len(),
        proposal.client.name
    );
    println!(
        "   Balance: {}",
        format_currency(db.client_balance(client_id)?)
    );
    Ok(())
}

fn print_proposal(proposal: &Reconciliation) {
    println!();
    println!("🧾 Proposed sale for {}", proposal.client.name);
    println!("   ─────────────────────────────────────────────");

    for item in &proposal.items {
        let read_as = if item.source_text.eq_ignore_ascii_case(&item.product.name) {
            String::new()
        } else {
            format!("  (read as '{}')", item.source_text)
        };
        println!(
            "   {:>3} x {:20} {:>12}{}",
            item.quantity,
            item.product.name,
            format_currency(item.product.price * f64::from(item.quantity)),
            read_as
        );
    }

    for text in &proposal.unresolved {
        println!("   ⚠️  '{}' not found in the product list", text);
    }

    println!("   ─────────────────────────────────────────────");
    println!("   Total: {}", format_currency(proposal.total()));
}
