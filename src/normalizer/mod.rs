use feed_rs::model;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{Result, TributaryError};
use crate::domain::{Entry, Schema};

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse `body` and turn every feed entry into an [`Entry`], in document
    /// order. The schema decides where the media URL is taken from.
    pub fn normalize(&self, schema: Schema, body: &[u8]) -> Result<Vec<Entry>> {
        let feed = parser::parse(body).map_err(|e| TributaryError::FeedParse(e.to_string()))?;

        let link_of: fn(&model::Entry) -> Option<String> = match schema {
            Schema::Npr => npr_link,
            Schema::Youtube => youtube_link,
            Schema::Podcast => podcast_link,
        };

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| {
                let link = link_of(&entry).unwrap_or_default();
                let title = entry
                    .title
                    .as_ref()
                    .map(|t| decode_html_entities(t.content.trim()).to_string())
                    .unwrap_or_default();

                Entry {
                    id: entry.id,
                    title,
                    published_at: entry.published.or(entry.updated),
                    link,
                }
            })
            .collect();

        Ok(entries)
    }
}

fn first_link(entry: &model::Entry) -> Option<String> {
    entry.links.first().map(|l| l.href.clone())
}

fn first_media_url(entry: &model::Entry) -> Option<String> {
    entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
}

/// NPR stories carry the media URL in the item's `<link>`.
fn npr_link(entry: &model::Entry) -> Option<String> {
    first_link(entry).or_else(|| first_media_url(entry))
}

/// YouTube entries point at the video through `media:group/media:content`.
fn youtube_link(entry: &model::Entry) -> Option<String> {
    first_media_url(entry).or_else(|| first_link(entry))
}

/// Podcast episodes carry the audio in `<enclosure>`.
fn podcast_link(entry: &model::Entry) -> Option<String> {
    first_media_url(entry).or_else(|| first_link(entry))
}
