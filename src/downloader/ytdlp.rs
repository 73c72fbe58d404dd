use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::app::{Result, TributaryError};
use crate::downloader::Downloader;

pub const DEFAULT_PROGRAM: &str = "yt-dlp";
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s-%(id)s.%(ext)s";

/// Runs a youtube-dl compatible program as `<program> -o <template> <url>`.
pub struct YtDlpDownloader {
    program: PathBuf,
    output_template: String,
}

impl YtDlpDownloader {
    pub fn new(program: PathBuf) -> Self {
        Self::with_template(program, DEFAULT_OUTPUT_TEMPLATE)
    }

    pub fn with_template(program: PathBuf, output_template: impl Into<String>) -> Self {
        Self {
            program,
            output_template: output_template.into(),
        }
    }

    fn output_arg(&self, dump_dir: &Path) -> PathBuf {
        dump_dir.join(&self.output_template)
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn download(&self, url: &str, dump_dir: &Path) -> Result<()> {
        if url.is_empty() {
            return Err(TributaryError::EmptyUrl);
        }

        let output = Command::new(&self.program)
            .arg("-o")
            .arg(self.output_arg(dump_dir))
            .arg(url)
            .output()
            .await
            .map_err(|e| TributaryError::DownloaderLaunch {
                program: self.program.clone(),
                source: e,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            tracing::debug!("Downloader output for {}:\n{}", url, combined);
            return Err(TributaryError::DownloadFailed {
                status: output.status.to_string(),
                output: combined,
            });
        }

        tracing::debug!("Downloaded {}", url);
        Ok(())
    }
}
