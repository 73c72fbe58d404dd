//! Configuration management for Tributary.
//!
//! Configuration is read from `~/.config/tributary/config.toml` unless another
//! path is given. If the default file doesn't exist, a commented template is
//! created and the user is asked to fill in their feeds.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{FeedDescriptor, Schema};
use crate::downloader::{DEFAULT_OUTPUT_TEMPLATE, DEFAULT_PROGRAM};
use crate::fetcher::http_fetcher::DEFAULT_TIMEOUT_SECS;

/// Configuration as written in the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Downloader executable; discovered on `PATH` when unset.
    pub ydl_path: Option<String>,
    /// Base download directory. A leading `~` is expanded.
    #[serde(default)]
    pub dump_dir: String,
    pub ledger_path: Option<String>,
    #[serde(default = "default_output_template")]
    pub output_template: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeedConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub last: usize,
    pub title_contains: Option<String>,
}

/// Validated configuration with every path resolved.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub downloader: PathBuf,
    pub ledger_path: PathBuf,
    pub output_template: String,
    pub fetch_timeout: Duration,
    pub feeds: Vec<FeedDescriptor>,
}

fn default_output_template() -> String {
    DEFAULT_OUTPUT_TEMPLATE.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Load configuration from `path`, or from the default path.
    ///
    /// A missing default file is replaced by a commented template and
    /// reported as [`ConfigError::Created`]. A missing explicit path is an
    /// I/O error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Err(ConfigError::Created(default_path));
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })
    }

    /// Get the default config directory: `~/.config/tributary`
    pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tributary"))
    }

    /// Get the default config file path: `~/.config/tributary/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Get the default ledger path: `~/.config/tributary/ledger.json`
    pub fn default_ledger_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::default_config_dir()?.join("ledger.json"))
    }

    /// Validate the configuration and resolve it into a [`RunConfig`].
    ///
    /// `ledger_override` takes precedence over `ledger-path`; the default
    /// ledger location is only looked up when neither is given.
    ///
    /// Creates the dump directory and one sub-directory per feed. An
    /// unrecognized schema is only warned about here; it fails that feed
    /// alone when the run reaches it.
    pub fn resolve(&self, ledger_override: Option<&Path>) -> Result<RunConfig, ConfigError> {
        let downloader = match self.ydl_path.as_deref() {
            Some(p) if !p.is_empty() => {
                let program = expand_tilde(p)?;
                fs::metadata(&program).map_err(|e| ConfigError::Io {
                    path: program.clone(),
                    source: e,
                })?;
                program
            }
            _ => which::which(DEFAULT_PROGRAM).map_err(|_| {
                ConfigError::Invalid(format!(
                    "'ydl-path' not set in config and {} not found in PATH",
                    DEFAULT_PROGRAM
                ))
            })?,
        };

        if self.dump_dir.is_empty() {
            return Err(ConfigError::Invalid("'dump-dir' not set in config".into()));
        }
        let dump_dir = expand_tilde(&self.dump_dir)?;
        create_dir(&dump_dir)?;

        let ledger_path = match (ledger_override, self.ledger_path.as_deref()) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(p)) if !p.is_empty() => expand_tilde(p)?,
            _ => Self::default_ledger_path()?,
        };

        if self.feeds.is_empty() {
            return Err(ConfigError::Invalid("'feeds' not set in config".into()));
        }

        let mut seen = HashSet::new();
        let mut feeds = Vec::with_capacity(self.feeds.len());
        for feed in &self.feeds {
            feed.validate()?;
            if !seen.insert(feed.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "feed id '{}' is used more than once",
                    feed.id
                )));
            }
            if feed.schema.parse::<Schema>().is_err() {
                tracing::warn!(
                    "Schema '{}' of feed '{}' is not recognized; the feed will fail",
                    feed.schema,
                    feed.id
                );
            }

            let feed_dir = dump_dir.join(&feed.id);
            create_dir(&feed_dir)?;

            feeds.push(FeedDescriptor {
                id: feed.id.clone(),
                source: feed.source.clone(),
                schema: feed.schema.clone(),
                last: feed.last,
                title_contains: feed.title_contains.clone().filter(|t| !t.is_empty()),
                dump_dir: feed_dir,
            });
        }

        Ok(RunConfig {
            downloader,
            ledger_path,
            output_template: self.output_template.clone(),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            feeds,
        })
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# Tributary configuration

# Path to yt-dlp (or another youtube-dl compatible program).
# When unset, yt-dlp is looked up on PATH.
# ydl-path = "/usr/local/bin/yt-dlp"

# Media is downloaded to <dump-dir>/<feed id>/
dump-dir = "~/media/feeds"

# Where already downloaded entries are remembered.
# ledger-path = "~/.config/tributary/ledger.json"

# File name template handed to the downloader.
# output-template = "%(title)s-%(id)s.%(ext)s"

# fetch-timeout-secs = 30

# Each feed needs an id, a source URL, a schema ("npr", "youtube" or
# "podcast") and how many of the latest entries to consider.
#
# [[feeds]]
# id = "tiny-desk"
# source = "https://feeds.npr.org/510306/podcast.xml"
# schema = "npr"
# last = 5
# title-contains = "desk"
"##
    }
}

impl FeedConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::Invalid("'id' not set in a feed".into()));
        }
        if self.source.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "'source' not set in feed '{}'",
                self.id
            )));
        }
        url::Url::parse(&self.source).map_err(|e| {
            ConfigError::Invalid(format!("'source' of feed '{}' is not a URL: {}", self.id, e))
        })?;
        if self.last == 0 {
            return Err(ConfigError::Invalid(format!(
                "'last' of feed '{}' must be at least 1",
                self.id
            )));
        }
        Ok(())
    }
}

/// Replace a leading `~` with the user's home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix('~') {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
            Ok(home.join(rest.trim_start_matches('/')))
        }
        None => Ok(PathBuf::from(path)),
    }
}

fn create_dir(path: &Path) -> Result<(), ConfigError> {
    fs::create_dir_all(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Wrote a config template to {0}; add your feeds and run again")]
    Created(PathBuf),

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let program = dir.path().join("yt-dlp");
        fs::write(&program, "#!/bin/sh\n").unwrap();

        let content = format!(
            "ydl-path = {:?}\ndump-dir = {:?}\nledger-path = {:?}\n{}",
            program.display().to_string(),
            dir.path().join("media").display().to_string(),
            dir.path().join("ledger.json").display().to_string(),
            body
        );
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.dump_dir, "~/media/feeds");
        assert_eq!(config.output_template, DEFAULT_OUTPUT_TEMPLATE);
        assert_eq!(config.fetch_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.feeds.is_empty());
    }

    #[test]
    fn test_load_and_resolve() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[[feeds]]
id = "tiny-desk"
source = "https://feeds.npr.org/510306/podcast.xml"
schema = "npr"
last = 5
title-contains = "desk"

[[feeds]]
id = "mkbhd"
source = "https://www.youtube.com/feeds/videos.xml?channel_id=UCBJycsmduvYEL83R_U4JriQ"
schema = "youtube"
last = 3
"#,
        );

        let run = Config::load(Some(&path)).unwrap().resolve(None).unwrap();

        assert_eq!(run.feeds.len(), 2);
        assert_eq!(run.ledger_path, dir.path().join("ledger.json"));
        let desk = &run.feeds[0];
        assert_eq!(desk.id, "tiny-desk");
        assert_eq!(desk.last, 5);
        assert_eq!(desk.title_contains.as_deref(), Some("desk"));
        assert_eq!(desk.dump_dir, dir.path().join("media").join("tiny-desk"));
        assert!(desk.dump_dir.is_dir());
        assert_eq!(run.feeds[1].title_contains, None);
        assert!(run.feeds[1].dump_dir.is_dir());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "dump-dir = [").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_resolve_requires_feeds() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let err = Config::load(Some(&path)).unwrap().resolve(None).unwrap_err();
        assert_eq!(err.to_string(), "'feeds' not set in config");
    }

    #[test]
    fn test_resolve_rejects_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[[feeds]]
id = "npr"
source = "https://example.com/a.xml"
schema = "npr"
last = 1

[[feeds]]
id = "npr"
source = "https://example.com/b.xml"
schema = "npr"
last = 1
"#,
        );
        let err = Config::load(Some(&path)).unwrap().resolve(None).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_resolve_rejects_zero_cap() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[[feeds]]
id = "npr"
source = "https://example.com/a.xml"
schema = "npr"
last = 0
"#,
        );
        let err = Config::load(Some(&path)).unwrap().resolve(None).unwrap_err();
        assert!(err.to_string().contains("'last'"));
    }

    #[test]
    fn test_resolve_rejects_bad_source() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[[feeds]]
id = "npr"
source = "not a url"
schema = "npr"
last = 2
"#,
        );
        let err = Config::load(Some(&path)).unwrap().resolve(None).unwrap_err();
        assert!(err.to_string().contains("not a URL"));
    }

    #[test]
    fn test_resolve_keeps_unknown_schema() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[[feeds]]
id = "vimeo"
source = "https://example.com/v.xml"
schema = "vimeo"
last = 2
"#,
        );
        let run = Config::load(Some(&path)).unwrap().resolve(None).unwrap();
        assert_eq!(run.feeds[0].schema, "vimeo");
    }

    #[test]
    fn test_resolve_prefers_ledger_override() {
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("yt-dlp");
        fs::write(&program, "#!/bin/sh\n").unwrap();
        // No ledger-path in the file, so without the override the default
        // location under the config dir would be used.
        let config: Config = toml::from_str(&format!(
            "ydl-path = {:?}\ndump-dir = {:?}\n\n[[feeds]]\nid = \"npr\"\nsource = \"https://example.com/a.xml\"\nschema = \"npr\"\nlast = 2\n",
            program.display().to_string(),
            dir.path().join("media").display().to_string()
        ))
        .unwrap();
        let override_path = dir.path().join("other-ledger.json");

        let run = config.resolve(Some(&override_path)).unwrap();
        assert_eq!(run.ledger_path, override_path);
    }

    #[test]
    fn test_resolve_override_beats_configured_ledger() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[[feeds]]
id = "npr"
source = "https://example.com/a.xml"
schema = "npr"
last = 2
"#,
        );
        let override_path = dir.path().join("cli-ledger.json");

        let run = Config::load(Some(&path))
            .unwrap()
            .resolve(Some(&override_path))
            .unwrap();
        assert_eq!(run.ledger_path, override_path);
    }

    #[test]
    fn test_resolve_missing_downloader() {
        let dir = TempDir::new().unwrap();
        let config: Config = toml::from_str(&format!(
            "ydl-path = {:?}\ndump-dir = {:?}\n",
            dir.path().join("missing-yt-dlp").display().to_string(),
            dir.path().display().to_string()
        ))
        .unwrap();
        let err = config.resolve(None).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~/media").unwrap(), home.join("media"));
        assert_eq!(expand_tilde("/srv/media").unwrap(), PathBuf::from("/srv/media"));
    }
}
