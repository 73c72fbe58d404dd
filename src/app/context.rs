use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::RunConfig;
use crate::domain::FeedDescriptor;
use crate::downloader::{Downloader, YtDlpDownloader};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::store::Ledger;
use crate::sync::Synchronizer;

pub struct AppContext {
    pub feeds: Vec<FeedDescriptor>,
    pub ledger_path: PathBuf,
    pub synchronizer: Synchronizer,
}

impl AppContext {
    pub fn new(config: RunConfig) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::with_timeout(config.fetch_timeout)?);
        let downloader: Arc<dyn Downloader + Send + Sync> = Arc::new(
            YtDlpDownloader::with_template(config.downloader, config.output_template),
        );

        Ok(Self::with_parts(
            config.feeds,
            config.ledger_path,
            fetcher,
            downloader,
        ))
    }

    pub fn with_parts(
        feeds: Vec<FeedDescriptor>,
        ledger_path: PathBuf,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        downloader: Arc<dyn Downloader + Send + Sync>,
    ) -> Self {
        let synchronizer = Synchronizer::new(fetcher, downloader, Normalizer::new());

        Self {
            feeds,
            ledger_path,
            synchronizer,
        }
    }

    pub fn open_ledger(&self) -> Result<Ledger> {
        Ledger::open(&self.ledger_path)
    }
}
