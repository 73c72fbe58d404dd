use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::domain::{Entry, EntryOutcome, FeedDescriptor, FeedOutcome, FeedStatus, Schema};
use crate::downloader::Downloader;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::store::Ledger;

/// Processes one feed end to end: fetch, parse, filter and cap, download new
/// entries concurrently, then record successes in the ledger.
#[derive(Clone)]
pub struct FeedPipeline {
    pub(crate) fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub(crate) downloader: Arc<dyn Downloader + Send + Sync>,
    pub(crate) normalizer: Normalizer,
    pub(crate) ledger: Arc<Ledger>,
}

impl FeedPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        downloader: Arc<dyn Downloader + Send + Sync>,
        normalizer: Normalizer,
        ledger: Arc<Ledger>,
    ) -> Self {
        Self {
            fetcher,
            downloader,
            normalizer,
            ledger,
        }
    }

    pub async fn process(&self, feed: &FeedDescriptor) -> FeedOutcome {
        let body = match self.fetcher.fetch(&feed.source).await {
            Ok(body) => body,
            Err(e) => return FeedOutcome::failed(&feed.id, FeedStatus::FetchFailed, e),
        };

        let entries = match feed
            .schema
            .parse::<Schema>()
            .and_then(|schema| self.normalizer.normalize(schema, &body))
        {
            Ok(entries) => entries,
            Err(e) => return FeedOutcome::failed(&feed.id, FeedStatus::ParseFailed, e),
        };

        let (in_flight, skipped) = self.launch_downloads(feed, entries);
        tracing::debug!(
            "[{}] {} downloads in flight, {} already downloaded",
            feed.id,
            in_flight.len(),
            skipped
        );

        let mut downloaded = 0;
        let mut failed = 0;
        for result in join_all(in_flight).await {
            match result {
                Ok(EntryOutcome {
                    entry_id,
                    error: None,
                    ..
                }) => {
                    self.ledger.add(&feed.id, &entry_id);
                    downloaded += 1;
                }
                Ok(EntryOutcome {
                    entry_id,
                    title,
                    error: Some(e),
                }) => {
                    tracing::warn!("[{}] {} ({}): download failed: {}", feed.id, title, entry_id, e);
                    failed += 1;
                }
                Err(e) => {
                    tracing::error!("[{}] download task join error: {}", feed.id, e);
                    failed += 1;
                }
            }
        }

        FeedOutcome::processed(&feed.id, downloaded, failed, skipped)
    }

    /// Walk entries in parse order, applying the title filter and the cap,
    /// and spawn a download for every entry the ledger does not know yet.
    ///
    /// Filtered entries do not count toward the cap; ledger hits do. The walk
    /// stops once `traversed >= last - 1`, checked after the current entry.
    fn launch_downloads(
        &self,
        feed: &FeedDescriptor,
        entries: Vec<Entry>,
    ) -> (Vec<JoinHandle<EntryOutcome>>, usize) {
        let stop_at = feed.last.saturating_sub(1);
        let mut traversed = 0;
        let mut skipped = 0;
        let mut in_flight = Vec::new();

        for entry in entries {
            if !feed.matches_title(&entry.title) {
                tracing::debug!("[{}] {}: title filtered", feed.id, entry.display_title());
                continue;
            }

            if self.ledger.exists(&feed.id, &entry.id) {
                tracing::debug!("[{}] {}: already downloaded", feed.id, entry.display_title());
                skipped += 1;
            } else {
                in_flight.push(self.spawn_download(feed, entry));
            }

            traversed += 1;
            if traversed >= stop_at {
                break;
            }
        }

        (in_flight, skipped)
    }

    fn spawn_download(&self, feed: &FeedDescriptor, entry: Entry) -> JoinHandle<EntryOutcome> {
        let downloader = self.downloader.clone();
        let dump_dir = feed.dump_dir.clone();
        let feed_id = feed.id.clone();

        tokio::spawn(async move {
            tracing::info!("[{}] downloading {}", feed_id, entry.display_title());
            let error = downloader.download(&entry.link, &dump_dir).await.err();
            EntryOutcome {
                entry_id: entry.id,
                title: entry.title,
                error,
            }
        })
    }
}
