use std::fmt;

use crate::app::TributaryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    FetchFailed,
    ParseFailed,
    Processed,
    ProcessedWithFailures,
    Aborted,
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedStatus::FetchFailed => "unable to get feed",
            FeedStatus::ParseFailed => "unable to parse feed",
            FeedStatus::Processed => "processed feed",
            FeedStatus::ProcessedWithFailures => {
                "processed feed; one or more entries failed to download"
            }
            FeedStatus::Aborted => "feed processing aborted",
        };
        f.write_str(s)
    }
}

/// Result of processing one feed.
#[derive(Debug)]
pub struct FeedOutcome {
    pub feed_id: String,
    pub status: FeedStatus,
    pub error: Option<TributaryError>,
    pub downloaded: usize,
    pub failed: usize,
    /// Entries skipped because the ledger already had them.
    pub skipped: usize,
}

impl FeedOutcome {
    pub fn failed(feed_id: &str, status: FeedStatus, error: TributaryError) -> Self {
        Self {
            feed_id: feed_id.to_string(),
            status,
            error: Some(error),
            downloaded: 0,
            failed: 0,
            skipped: 0,
        }
    }

    pub fn processed(feed_id: &str, downloaded: usize, failed: usize, skipped: usize) -> Self {
        let status = if failed == 0 {
            FeedStatus::Processed
        } else {
            FeedStatus::ProcessedWithFailures
        };
        Self {
            feed_id: feed_id.to_string(),
            status,
            error: None,
            downloaded,
            failed,
            skipped,
        }
    }

    /// A feed with entry failures is still a processed feed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Display for FeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(e) => write!(f, "[{}]: {}: {}", self.feed_id, self.status, e),
            None => write!(f, "[{}]: {}", self.feed_id, self.status),
        }
    }
}

/// Result of one entry-download attempt.
#[derive(Debug)]
pub struct EntryOutcome {
    pub entry_id: String,
    pub title: String,
    pub error: Option<TributaryError>,
}
