//! Run orchestration: one concurrent [`FeedPipeline`] per feed, fan-in of
//! the feed outcomes, and a single ledger flush at the end of the run.

mod pipeline;
#[cfg(test)]
pub(crate) mod test_support;

pub use pipeline::FeedPipeline;

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};

use crate::app::{Result, TributaryError};
use crate::domain::{FeedDescriptor, FeedOutcome, FeedStatus};
use crate::downloader::Downloader;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::store::Ledger;

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Feed outcomes in completion order.
    pub outcomes: Vec<FeedOutcome>,
    /// Result of the end-of-run ledger flush.
    pub persisted: Result<()>,
}

impl RunReport {
    pub fn feed_errors(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_error()).count()
    }

    pub fn entries_downloaded(&self) -> usize {
        self.outcomes.iter().map(|o| o.downloaded).sum()
    }

    pub fn entries_failed(&self) -> usize {
        self.outcomes.iter().map(|o| o.failed).sum()
    }
}

pub struct Synchronizer {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    downloader: Arc<dyn Downloader + Send + Sync>,
    normalizer: Normalizer,
}

impl Synchronizer {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        downloader: Arc<dyn Downloader + Send + Sync>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            fetcher,
            downloader,
            normalizer,
        }
    }

    /// Process every feed concurrently and wait for all of them. The ledger
    /// is written exactly once, even if this future is dropped or a feed
    /// task panics.
    pub async fn run(&self, feeds: Vec<FeedDescriptor>, ledger: Arc<Ledger>) -> RunReport {
        let flush = LedgerFlush::new(ledger.clone());
        let pipeline = FeedPipeline::new(
            self.fetcher.clone(),
            self.downloader.clone(),
            self.normalizer.clone(),
            ledger,
        );

        let mut pending: FuturesUnordered<_> = feeds
            .into_iter()
            .map(|feed| {
                let pipeline = pipeline.clone();
                let feed_id = feed.id.clone();
                let handle = tokio::spawn(async move { pipeline.process(&feed).await });

                async move {
                    handle.await.unwrap_or_else(|e| {
                        tracing::error!("Feed task join error: {}", e);
                        FeedOutcome::failed(
                            &feed_id,
                            FeedStatus::Aborted,
                            TributaryError::Other(e.to_string()),
                        )
                    })
                }
            })
            .collect();

        let mut outcomes = Vec::with_capacity(pending.len());
        let mut processing = pending.len();
        while processing > 0 {
            tracing::info!(
                "Waiting for {} {} to finish processing",
                processing,
                if processing == 1 { "feed" } else { "feeds" }
            );
            let Some(outcome) = pending.next().await else {
                break;
            };
            if outcome.is_error() {
                tracing::warn!("{}", outcome);
            } else {
                tracing::info!("{}", outcome);
            }
            outcomes.push(outcome);
            processing -= 1;
        }

        RunReport {
            outcomes,
            persisted: flush.finish(),
        }
    }
}

/// Writes the ledger once: explicitly through [`LedgerFlush::finish`], or on
/// drop if the run never got there.
struct LedgerFlush {
    ledger: Option<Arc<Ledger>>,
}

impl LedgerFlush {
    fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger: Some(ledger),
        }
    }

    fn finish(mut self) -> Result<()> {
        match self.ledger.take() {
            Some(ledger) => ledger.write(),
            None => Ok(()),
        }
    }
}

impl Drop for LedgerFlush {
    fn drop(&mut self) {
        if let Some(ledger) = self.ledger.take() {
            if let Err(e) = ledger.write() {
                tracing::error!("Failed to write ledger: {}", e);
            }
        }
    }
}
