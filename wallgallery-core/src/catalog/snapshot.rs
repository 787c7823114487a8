//! Immutable catalog snapshots
//!
//! A [`Catalog`] is built once from the three endpoint payloads and never
//! mutated afterwards. [`CatalogStore`] owns the current snapshot and swaps
//! it wholesale on reload.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use super::model::{
    normalize_category_id, Category, Pack, RawCategory, RawPack, RawWallpaper, Wallpaper,
};

/// Sentinel category meaning "no category filter"
pub const ALL_CATEGORY: &str = "all";

/// Sentinel category that switches the gallery to pack mode
pub const EXCLUSIVE_CATEGORY: &str = "exclusive";

/// In-memory snapshot of wallpapers, categories and packs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    wallpapers: Vec<Wallpaper>,
    categories: Vec<Category>,
    packs: Vec<Pack>,
}

/// Parse each array element on its own so one malformed record cannot
/// take down the rest of the collection
fn parse_elements<T: DeserializeOwned>(kind: &str, values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed {} record at index {}: {}", kind, i, e);
                None
            }
        })
        .collect()
}

/// Keep the first record for every id
fn dedup_by_id<T>(kind: &str, records: Vec<T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(id(record).to_string());
            if !fresh {
                warn!("Dropping duplicate {} id '{}'", kind, id(record));
            }
            fresh
        })
        .collect()
}

/// Parse an endpoint body into a JSON array, treating anything else as empty
pub fn parse_array(kind: &str, body: &str) -> anyhow::Result<Vec<serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(body)? {
        serde_json::Value::Array(values) => Ok(values),
        other => anyhow::bail!(
            "Expected a JSON array of {} records, got {}",
            kind,
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-normalized records
    ///
    /// Duplicate ids are dropped, keeping the first occurrence.
    pub fn from_records(
        wallpapers: Vec<Wallpaper>,
        categories: Vec<Category>,
        packs: Vec<Pack>,
    ) -> Self {
        let catalog = Self {
            wallpapers: dedup_by_id("wallpaper", wallpapers, |w| w.id.as_str()),
            categories: dedup_by_id("category", categories, |c| c.id.as_str()),
            packs: dedup_by_id("pack", packs, |p| p.id.as_str()),
        };

        debug!(
            "Catalog snapshot: {} wallpapers, {} categories, {} packs",
            catalog.wallpapers.len(),
            catalog.categories.len(),
            catalog.packs.len()
        );

        catalog
    }

    /// Build a catalog from raw JSON arrays, one per endpoint
    pub fn from_json_values(
        wallpapers: Vec<serde_json::Value>,
        categories: Vec<serde_json::Value>,
        packs: Vec<serde_json::Value>,
    ) -> Self {
        let wallpapers = parse_elements::<RawWallpaper>("wallpaper", wallpapers)
            .into_iter()
            .filter_map(|raw| {
                let normalized = Wallpaper::from_raw(raw);
                if normalized.is_none() {
                    warn!("Skipping wallpaper record without an id");
                }
                normalized
            })
            .collect();

        let categories = parse_elements::<RawCategory>("category", categories)
            .into_iter()
            .filter_map(Category::from_raw)
            .collect();

        let packs = parse_elements::<RawPack>("pack", packs)
            .into_iter()
            .filter_map(Pack::from_raw)
            .collect();

        Self::from_records(wallpapers, categories, packs)
    }

    /// Build a catalog from endpoint bodies
    ///
    /// A body that fails to parse degrades that collection to empty.
    pub fn from_json_strs(wallpapers: &str, categories: &str, packs: &str) -> Self {
        let load = |kind: &str, body: &str| {
            parse_array(kind, body).unwrap_or_else(|e| {
                warn!("Ignoring {} payload: {}", kind, e);
                Vec::new()
            })
        };

        Self::from_json_values(
            load("wallpaper", wallpapers),
            load("category", categories),
            load("pack", packs),
        )
    }

    pub fn wallpapers(&self) -> &[Wallpaper] {
        &self.wallpapers
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn packs(&self) -> &[Pack] {
        &self.packs
    }

    pub fn is_empty(&self) -> bool {
        self.wallpapers.is_empty() && self.packs.is_empty()
    }

    /// Look up a wallpaper by id
    pub fn wallpaper(&self, id: &str) -> Option<&Wallpaper> {
        self.wallpapers.iter().find(|w| w.id == id)
    }

    /// Look up a pack by id
    pub fn pack(&self, id: &str) -> Option<&Pack> {
        self.packs.iter().find(|p| p.id == id)
    }

    /// Look up a category by id
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Wallpapers referenced by a pack, in pack order
    ///
    /// Ids the catalog does not know are skipped.
    pub fn pack_wallpapers(&self, pack: &Pack) -> Vec<&Wallpaper> {
        pack.wallpaper_ids
            .iter()
            .filter_map(|id| self.wallpaper(id))
            .collect()
    }

    /// Map user input to a category id
    ///
    /// Tries the sentinels, then exact id, then case-insensitive id or name.
    /// Unresolvable input comes back unchanged so the gallery shows no matches.
    pub fn resolve_category(&self, input: &str) -> String {
        let trimmed = input.trim();
        let lowered = normalize_category_id(trimmed);

        if lowered == ALL_CATEGORY || lowered == EXCLUSIVE_CATEGORY {
            return lowered;
        }

        if self.category(trimmed).is_some() {
            return trimmed.to_string();
        }

        self.categories
            .iter()
            .find(|c| c.id == lowered || c.name.eq_ignore_ascii_case(trimmed))
            .map(|c| c.id.clone())
            .unwrap_or_else(|| trimmed.to_string())
    }

    /// Number of wallpapers in each category, in category order
    pub fn category_counts(&self) -> Vec<(&Category, usize)> {
        self.categories
            .iter()
            .map(|c| {
                let count = self.wallpapers.iter().filter(|w| w.category == c.id).count();
                (c, count)
            })
            .collect()
    }
}

/// Holder of the current catalog snapshot
///
/// Readers get an `Arc` to an immutable snapshot; a reload swaps the `Arc`.
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<Catalog> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the snapshot, returning the previous one
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Stats;

    const WALLPAPERS: &str = r#"[
        {"id": "1", "title": "Misty Forest", "category": "nature"},
        {"id": "2", "title": "Night City", "category": "City"},
        {"id": "1", "title": "Duplicate", "category": "nature"},
        {"title": "No id"},
        "not a record",
        {"id": "3", "stats": "not an object"}
    ]"#;

    const CATEGORIES: &str = r#"[
        {"id": "nature", "name": "Nature"},
        {"id": "City", "name": "City Lights"}
    ]"#;

    const PACKS: &str = r#"[
        {"id": "p1", "title": "Neon Nights", "category": "exclusive", "wallpaper_ids": ["2", "99"]}
    ]"#;

    fn sample() -> Catalog {
        Catalog::from_json_strs(WALLPAPERS, CATEGORIES, PACKS)
    }

    #[test]
    fn test_ingestion_drops_only_unidentifiable_records() {
        let catalog = sample();
        let ids: Vec<&str> = catalog.wallpapers().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(catalog.wallpaper("1").unwrap().title, "Misty Forest");
        assert_eq!(catalog.wallpaper("3").unwrap().stats, Stats::default());
    }

    #[test]
    fn test_categories_are_normalized_at_ingestion() {
        let catalog = sample();
        assert_eq!(catalog.wallpaper("2").unwrap().category, "city");
        assert!(catalog.category("city").is_some());
    }

    #[test]
    fn test_non_array_payload_is_empty() {
        let catalog = Catalog::from_json_strs(r#"{"oops": true}"#, "not json", PACKS);
        assert!(catalog.wallpapers().is_empty());
        assert!(catalog.categories().is_empty());
        assert_eq!(catalog.packs().len(), 1);
    }

    #[test]
    fn test_pack_wallpapers_skip_unknown_ids() {
        let catalog = sample();
        let pack = catalog.pack("p1").unwrap();
        let members: Vec<&str> = catalog
            .pack_wallpapers(pack)
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(members, vec!["2"]);
    }

    #[test]
    fn test_resolve_category() {
        let catalog = sample();
        assert_eq!(catalog.resolve_category("ALL"), "all");
        assert_eq!(catalog.resolve_category("Exclusive"), "exclusive");
        assert_eq!(catalog.resolve_category("nature"), "nature");
        assert_eq!(catalog.resolve_category("NATURE"), "nature");
        assert_eq!(catalog.resolve_category("city lights"), "city");
        assert_eq!(catalog.resolve_category("space"), "space");
    }

    #[test]
    fn test_category_counts() {
        let catalog = sample();
        let counts: Vec<(&str, usize)> = catalog
            .category_counts()
            .into_iter()
            .map(|(c, n)| (c.id.as_str(), n))
            .collect();
        assert_eq!(counts, vec![("nature", 1), ("city", 1)]);
    }

    #[test]
    fn test_store_swaps_snapshots() {
        let store = CatalogStore::new(Catalog::new());
        let before = store.snapshot();
        assert!(before.is_empty());

        let previous = store.replace(sample());
        assert!(Arc::ptr_eq(&before, &previous));

        let after = store.snapshot();
        assert_eq!(after.wallpapers().len(), 3);
        // The old snapshot is untouched
        assert!(before.is_empty());
    }
}
