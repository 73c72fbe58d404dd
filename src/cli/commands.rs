use std::sync::Arc;

use crate::app::{AppContext, Result};
use crate::sync::RunReport;

/// Run every configured feed once and persist the ledger.
///
/// Only a ledger that cannot be opened or written is an error; feed and
/// entry failures are reported and the run still completes.
pub async fn sync_feeds(ctx: &AppContext) -> Result<RunReport> {
    let ledger = Arc::new(ctx.open_ledger()?);

    println!("Processing {} feeds...", ctx.feeds.len());
    let report = ctx.synchronizer.run(ctx.feeds.clone(), ledger).await;

    for outcome in &report.outcomes {
        println!("{}", outcome);
    }
    println!(
        "Sync complete: {} downloaded, {} failed downloads, {} feed errors",
        report.entries_downloaded(),
        report.entries_failed(),
        report.feed_errors()
    );

    Ok(report)
}

pub fn list_feeds(ctx: &AppContext) -> Result<()> {
    if ctx.feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    let ledger = ctx.open_ledger()?;
    for feed in &ctx.feeds {
        let filter = feed
            .title_contains
            .as_deref()
            .map(|t| format!(", title contains \"{}\"", t))
            .unwrap_or_default();
        println!(
            "{} [{}, last {}{}] ({} downloaded)\n  {}",
            feed.id,
            feed.schema,
            feed.last,
            filter,
            ledger.count(&feed.id),
            feed.source
        );
    }

    Ok(())
}
