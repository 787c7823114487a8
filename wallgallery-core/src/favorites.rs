//! Favorite wallpapers
//!
//! An insertion-ordered set of wallpaper ids. The query engine never reads
//! it; the presentation layer cross-references results against it.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Wallpaper};

/// Set of favorite wallpaper ids, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Favorites {
    ids: Vec<String>,
}

impl From<Vec<String>> for Favorites {
    fn from(ids: Vec<String>) -> Self {
        let mut favorites = Self::default();
        for id in ids {
            favorites.insert(&id);
        }
        favorites
    }
}

impl From<Favorites> for Vec<String> {
    fn from(favorites: Favorites) -> Self {
        favorites.ids
    }
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add if absent, remove if present
    ///
    /// Returns whether the wallpaper is a favorite afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Add a favorite; returns false if it was already present
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Remove a favorite; returns false if it was not present
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Favorite wallpapers present in the catalog, in favorites order
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Wallpaper> {
        self.ids.iter().filter_map(|id| catalog.wallpaper(id)).collect()
    }
}
