//! # Tributary
//!
//! A periodic media-feed synchronizer: fetches subscribed feeds, finds the
//! entries not downloaded yet, and hands them to an external downloader
//! (yt-dlp), remembering every success in a ledger.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → filter/cap → Downloader (× entries) → Ledger
//!             ↑ one FeedPipeline per feed, all run by the Synchronizer
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Download whatever is new
//! tributary
//!
//! # Show configured feeds
//! tributary feeds
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the fetcher,
/// downloader, normalizer and synchronizer.
pub mod app;

/// Command-line interface using clap.
///
/// - `sync` - Process every feed once (default)
/// - `feeds` - List configured feeds
pub mod cli;

/// Configuration loading and validation.
///
/// Loads from `~/.config/tributary/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`FeedDescriptor`](domain::FeedDescriptor): a configured feed
/// - [`Entry`](domain::Entry): one downloadable item
/// - [`FeedOutcome`](domain::FeedOutcome): per-feed result
pub mod domain;

/// External downloader adapter.
pub mod downloader;

/// HTTP fetching of feed documents.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and schema dispatch (npr, youtube, podcast).
pub mod normalizer;

/// The dedup ledger of downloaded entries.
pub mod store;

/// Concurrent feed processing.
///
/// - [`FeedPipeline`](sync::FeedPipeline): one feed, entries downloaded in parallel
/// - [`Synchronizer`](sync::Synchronizer): all feeds in parallel, one ledger flush
pub mod sync;
