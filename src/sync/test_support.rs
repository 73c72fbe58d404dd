//! Fakes for exercising the pipeline without network or external programs.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::{Result, TributaryError};
use crate::downloader::Downloader;
use crate::fetcher::Fetcher;

/// Serves canned bodies; any other URL fails like an unreachable host.
#[derive(Default)]
pub struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| TributaryError::Other(format!("connection refused: {}", url)))
    }
}

/// Records every launched download and fails for configured URLs.
#[derive(Default)]
pub struct FakeDownloader {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    async fn download(&self, url: &str, _dump_dir: &Path) -> Result<()> {
        if url.is_empty() {
            return Err(TributaryError::EmptyUrl);
        }
        self.calls.lock().unwrap().push(url.to_string());

        if self.failing.contains(url) {
            return Err(TributaryError::DownloadFailed {
                status: "exit status: 1".into(),
                output: "ERROR: unable to download".into(),
            });
        }
        Ok(())
    }
}

/// An NPR-style RSS document with one item per `(guid, title)`, each linking
/// to `https://media.example.com/<guid>.mp3`.
pub fn npr_feed_xml(items: &[(String, String)]) -> String {
    let items: String = items
        .iter()
        .map(|(guid, title)| {
            format!(
                "<item><title>{title}</title><link>https://media.example.com/{guid}.mp3</link><guid>{guid}</guid><pubDate>Mon, 01 Mar 2021 11:00:00 -0500</pubDate></item>"
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Test</title>{items}</channel></rss>"#
    )
}
