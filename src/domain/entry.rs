use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One downloadable item of a feed. Produced fresh on every run; only `id`
/// is ever persisted (in the ledger).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Feed-native identifier (guid / atom id).
    pub id: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Direct media URL handed to the downloader.
    pub link: String,
}

impl Entry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            published_at: None,
            link: link.into(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_with_title() {
        let entry = Entry::new("e1", "My Episode", "https://example.com/e1.mp3");
        assert_eq!(entry.display_title(), "My Episode");
    }

    #[test]
    fn test_display_title_without_title() {
        let entry = Entry::new("e1", "", "https://example.com/e1.mp3");
        assert_eq!(entry.display_title(), "(Untitled)");
    }
}
