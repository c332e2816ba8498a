//! Favorites and listening history.

use serde::{Deserialize, Serialize};

use crate::catalog::QuoteId;

/// Maximum number of history entries kept.
pub const HISTORY_LIMIT: usize = 50;

/// Favorited teachings in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<QuoteId>);

impl Favorites {
    pub fn new(ids: Vec<QuoteId>) -> Self {
        let mut favorites = Self::default();
        for id in ids {
            if !favorites.contains(&id) {
                favorites.0.push(id);
            }
        }
        favorites
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|f| f == id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|f| f == id)
    }

    pub fn ids(&self) -> &[QuoteId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Most-recent-first listening history, capped at [`HISTORY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<QuoteId>);

impl History {
    pub fn new(mut ids: Vec<QuoteId>) -> Self {
        ids.truncate(HISTORY_LIMIT);
        Self(ids)
    }

    /// Move `id` to the front, dropping the oldest entry past the limit.
    pub fn record(&mut self, id: &str) {
        self.0.retain(|h| h != id);
        self.0.insert(0, id.to_string());
        self.0.truncate(HISTORY_LIMIT);
    }

    pub fn ids(&self) -> &[QuoteId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
