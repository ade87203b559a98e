//! Seeder for Tally development.
//!
//! Builds an in-memory book over the standard chart, posts one entry per
//! built-in template through the editor, reverses the first, and prints
//! statistics and the cash register as JSON.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Utc};
use tracing::info;

use tally_book::JournalBook;
use tally_book::seed::{builtin_templates, standard_chart};
use tally_core::journal::JournalEditor;
use tally_shared::AppConfig;
use tally_shared::telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    let chart = Arc::new(standard_chart());
    let book = Arc::new(JournalBook::new(&config.journal).with_chart(Arc::clone(&chart)));
    let editor = JournalEditor::new(Arc::clone(&book), &config.journal);

    let today = Utc::now().date_naive();
    let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);

    let mut receipts = Vec::new();
    for (offset, template) in (0u64..).zip(builtin_templates()) {
        let date = month_start.checked_add_days(Days::new(offset)).unwrap_or(month_start);
        let draft = editor.open(Some(date)).apply_template(&template)?;
        let receipt = editor.post(&draft)?;
        info!(template = %template.name, entry_number = %receipt.entry_number, "seeded entry");
        receipts.push(receipt);
    }

    if let Some(first) = receipts.first() {
        book.reverse(first.entry_id, today)?;
    }

    let register = book.account_register("1000", None, None);
    let summary = serde_json::json!({
        "statistics": book.statistics(),
        "cash_register": register,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
