//! Content catalog: the teachings that can be played.
//!
//! The tracker only needs the catalog size (for the "listened to everything"
//! milestone); the playback session resolves an item id to an audio resource.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identifier of a teaching.
pub type QuoteId = String;

/// One teaching: text, attribution and its audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    #[serde(default)]
    pub attribution: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub reference: String,
}

impl Quote {
    /// Minimal quote, mostly useful in tests and headless playlists.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            attribution: String::new(),
            category: String::new(),
            explanation: String::new(),
            image_url: String::new(),
            audio_url: String::new(),
            reference: String::new(),
        }
    }

    pub fn with_audio(mut self, audio_url: impl Into<String>) -> Self {
        self.audio_url = audio_url.into();
        self
    }
}

/// Something an [`AudioPlayer`](crate::player::AudioPlayer) can load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioResource {
    pub uri: String,
}

impl AudioResource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Read-only view over the available teachings.
pub trait Catalog {
    /// Number of playable items.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, id: &str) -> Option<&Quote>;

    /// Audio for `id`, if the item exists and has any.
    fn resolve_audio(&self, id: &str) -> Option<AudioResource> {
        self.get(id)
            .filter(|q| !q.audio_url.is_empty())
            .map(|q| AudioResource::new(q.audio_url.clone()))
    }
}

impl<K: Catalog + ?Sized> Catalog for &K {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, id: &str) -> Option<&Quote> {
        (**self).get(id)
    }

    fn resolve_audio(&self, id: &str) -> Option<AudioResource> {
        (**self).resolve_audio(id)
    }
}

impl<K: Catalog + ?Sized> Catalog for Arc<K> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, id: &str) -> Option<&Quote> {
        (**self).get(id)
    }

    fn resolve_audio(&self, id: &str) -> Option<AudioResource> {
        (**self).resolve_audio(id)
    }
}

/// In-memory catalog in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    quotes: Vec<Quote>,
    index: HashMap<QuoteId, usize>,
}

impl StaticCatalog {
    /// Build from a list of quotes. Later duplicates of an id are dropped.
    pub fn new(quotes: Vec<Quote>) -> Self {
        let mut catalog = Self::default();
        for quote in quotes {
            if catalog.index.contains_key(&quote.id) {
                continue;
            }
            catalog.index.insert(quote.id.clone(), catalog.quotes.len());
            catalog.quotes.push(quote);
        }
        catalog
    }

    /// Load a JSON array of quotes.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid quote list.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let quotes: Vec<Quote> = serde_json::from_str(&content)?;
        Ok(Self::new(quotes))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }
}

impl Catalog for StaticCatalog {
    fn len(&self) -> usize {
        self.quotes.len()
    }

    fn get(&self, id: &str) -> Option<&Quote> {
        self.index.get(id).and_then(|&i| self.quotes.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_dropped() {
        let catalog = StaticCatalog::new(vec![
            Quote::new("q1", "first"),
            Quote::new("q2", "second"),
            Quote::new("q1", "again"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("q1").unwrap().text, "first");
    }

    #[test]
    fn resolve_audio_skips_quotes_without_audio() {
        let catalog = StaticCatalog::new(vec![
            Quote::new("q1", "with").with_audio("audio/q1.mp3"),
            Quote::new("q2", "without"),
        ]);
        assert_eq!(
            catalog.resolve_audio("q1"),
            Some(AudioResource::new("audio/q1.mp3"))
        );
        assert_eq!(catalog.resolve_audio("q2"), None);
        assert_eq!(catalog.resolve_audio("missing"), None);
    }

    #[test]
    fn loads_from_json_with_missing_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.json");
        std::fs::write(
            &path,
            r#"[{"id": "q1", "text": "Peace be with you", "audio_url": "q1.mp3"}]"#,
        )
        .unwrap();
        let catalog = StaticCatalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("q1").unwrap().attribution, "");
    }
}
