//! Entry downloads through an external program.
//!
//! The downloader is a black box: given a media URL and a feed's output
//! directory it either succeeds or fails. One attempt per entry per run.

mod ytdlp;

pub use ytdlp::{YtDlpDownloader, DEFAULT_OUTPUT_TEMPLATE, DEFAULT_PROGRAM};

use std::path::Path;

use async_trait::async_trait;

use crate::app::Result;

#[async_trait]
pub trait Downloader {
    /// Download the media at `url` into `dump_dir`. An empty URL is rejected
    /// without launching anything.
    async fn download(&self, url: &str, dump_dir: &Path) -> Result<()>;
}
