use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app::TributaryError;

/// Syndication dialect of a feed. The set is closed; each variant has its
/// own rule for locating an entry's media URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Npr,
    Youtube,
    Podcast,
}

impl Schema {
    pub const ALL: [Schema; 3] = [Schema::Npr, Schema::Youtube, Schema::Podcast];

    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Npr => "npr",
            Schema::Youtube => "youtube",
            Schema::Podcast => "podcast",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Schema {
    type Err = TributaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schema::ALL
            .into_iter()
            .find(|schema| schema.as_str() == s)
            .ok_or_else(|| TributaryError::UnknownSchema(s.to_string()))
    }
}

/// A validated, resolved feed subscription. Immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct FeedDescriptor {
    pub id: String,
    pub source: String,
    /// Raw schema tag; resolved to a [`Schema`] when the feed is parsed so an
    /// unrecognized tag fails only this feed.
    pub schema: String,
    /// Entry cap ("last N").
    pub last: usize,
    pub title_contains: Option<String>,
    pub dump_dir: PathBuf,
}

impl FeedDescriptor {
    pub fn new(id: impl Into<String>, source: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            schema: schema.into(),
            last: 1,
            title_contains: None,
            dump_dir: PathBuf::new(),
        }
    }

    /// Case-insensitive substring match against the title filter, if any.
    pub fn matches_title(&self, title: &str) -> bool {
        match &self.title_contains {
            Some(needle) => title.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}
