//! Favorites: an insertion-ordered set of artwork cards, persisted as JSON.
//!
//! Toggling a card that is already present removes it; toggling it again
//! appends it at the end. The file carries a version number; a missing,
//! unreadable or mismatched file loads as an empty list.
//!
//! ```json
//! { "version": 1, "items": [ { "id": 27992, "title": "...", ... } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::types::ArtworkCard;

/// Bump when the file format changes; older files load as empty.
const FAVORITES_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorites {
    version: u32,
    items: Vec<ArtworkCard>,
}

impl Default for Favorites {
    fn default() -> Self {
        Self::new()
    }
}

impl Favorites {
    pub fn new() -> Self {
        Self {
            version: FAVORITES_VERSION,
            items: Vec::new(),
        }
    }

    /// Load from `path`, or start empty.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::new(),
        };
        let favorites: Self = match serde_json::from_str(&content) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable favorites");
                return Self::new();
            }
        };
        if favorites.version != FAVORITES_VERSION {
            tracing::warn!(
                path = %path.display(),
                version = favorites.version,
                "ignoring favorites from another version"
            );
            return Self::new();
        }
        favorites
    }

    pub fn save(&self, path: &Path) -> Result<(), FavoritesError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Add `card` if absent, remove it if present. Returns whether it is now a favorite.
    pub fn toggle(&mut self, card: ArtworkCard) -> bool {
        if let Some(pos) = self.position(card.id) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(card);
            true
        }
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.position(id).is_some()
    }

    /// Favorite ids in insertion order.
    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|c| c.id).collect()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ArtworkCard] {
        &self.items
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|c| c.id == id)
    }
}
