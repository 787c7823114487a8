//! Gallery query engine
//!
//! Turns a catalog snapshot plus the gallery inputs (category, search text,
//! sort key) into the ordered list of items to show. The engine is a pure
//! function of its inputs: it performs no I/O, never mutates the catalog and
//! never fails. Missing data was defaulted at ingestion, unknown categories
//! simply match nothing.

use serde::{Deserialize, Serialize};

use super::search::{EditDistanceMatcher, FuzzySearch, SearchKey};
use super::sort::SortKey;
use crate::catalog::{Catalog, Pack, Wallpaper, ALL_CATEGORY, EXCLUSIVE_CATEGORY};
use crate::config::SearchConfig;

/// Packs are only ever searched by title
const PACK_SEARCH_KEYS: &[SearchKey] = &[SearchKey::Title];

/// Gallery inputs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Category id, or one of the `all` / `exclusive` sentinels
    pub category: String,

    /// Free-text search; surrounding whitespace is ignored
    pub search: String,

    pub sort: SortKey,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORY.to_string(),
            search: String::new(),
            sort: SortKey::default(),
        }
    }
}

impl QueryParams {
    pub fn new(category: impl Into<String>, search: impl Into<String>, sort: SortKey) -> Self {
        Self {
            category: category.into(),
            search: search.into(),
            sort,
        }
    }

    /// Whether this query selects the pack view
    pub fn is_pack_view(&self) -> bool {
        self.category == EXCLUSIVE_CATEGORY
    }

    fn trimmed_search(&self) -> &str {
        self.search.trim()
    }
}

/// Which kind of item a result holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Wallpaper,
    Pack,
}

/// Query result as positions into the catalog collections
///
/// Positions index `Catalog::wallpapers()` or `Catalog::packs()` depending
/// on `kind`, which keeps the result independent of any borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub kind: ItemKind,
    pub positions: Vec<usize>,
}

impl QueryOutcome {
    pub fn is_pack_view(&self) -> bool {
        self.kind == ItemKind::Pack
    }

    /// Resolve positions against the catalog they were computed from
    pub fn materialize<'a>(&self, catalog: &'a Catalog) -> DisplayList<'a> {
        match self.kind {
            ItemKind::Wallpaper => DisplayList::Wallpapers(
                self.positions
                    .iter()
                    .filter_map(|&i| catalog.wallpapers().get(i))
                    .collect(),
            ),
            ItemKind::Pack => DisplayList::Packs(
                self.positions
                    .iter()
                    .filter_map(|&i| catalog.packs().get(i))
                    .collect(),
            ),
        }
    }
}

/// Ordered items to render
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayList<'a> {
    Wallpapers(Vec<&'a Wallpaper>),
    Packs(Vec<&'a Pack>),
}

impl<'a> DisplayList<'a> {
    pub fn is_pack_view(&self) -> bool {
        matches!(self, DisplayList::Packs(_))
    }

    pub fn len(&self) -> usize {
        match self {
            DisplayList::Wallpapers(items) => items.len(),
            DisplayList::Packs(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item ids in display order
    pub fn ids(&self) -> Vec<&'a str> {
        match self {
            DisplayList::Wallpapers(items) => items.iter().map(|w| w.id.as_str()).collect(),
            DisplayList::Packs(items) => items.iter().map(|p| p.id.as_str()).collect(),
        }
    }

    /// Wallpapers, or an empty slice in pack view
    pub fn wallpapers(&self) -> &[&'a Wallpaper] {
        match self {
            DisplayList::Wallpapers(items) => items,
            DisplayList::Packs(_) => &[],
        }
    }

    /// Packs, or an empty slice in wallpaper view
    pub fn packs(&self) -> &[&'a Pack] {
        match self {
            DisplayList::Wallpapers(_) => &[],
            DisplayList::Packs(items) => items,
        }
    }
}

/// The gallery query engine
#[derive(Debug, Clone)]
pub struct QueryEngine<S = EditDistanceMatcher> {
    matcher: S,
    keys: Vec<SearchKey>,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::with_matcher(EditDistanceMatcher::default(), SearchKey::ALL.to_vec())
    }
}

impl QueryEngine {
    /// Engine using the default matcher tuned by configuration
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::with_matcher(
            EditDistanceMatcher::new(config.threshold),
            config.keys.clone(),
        )
    }
}

impl<S: FuzzySearch> QueryEngine<S> {
    /// Engine with a custom fuzzy matcher
    pub fn with_matcher(matcher: S, keys: Vec<SearchKey>) -> Self {
        Self { matcher, keys }
    }

    pub fn keys(&self) -> &[SearchKey] {
        &self.keys
    }

    /// Compute the ordered display list
    pub fn run<'a>(&self, catalog: &'a Catalog, params: &QueryParams) -> DisplayList<'a> {
        self.resolve(catalog, params).materialize(catalog)
    }

    /// Compute the ordered display list as catalog positions
    pub fn resolve(&self, catalog: &Catalog, params: &QueryParams) -> QueryOutcome {
        if params.is_pack_view() {
            QueryOutcome {
                kind: ItemKind::Pack,
                positions: self.resolve_packs(catalog, params),
            }
        } else {
            QueryOutcome {
                kind: ItemKind::Wallpaper,
                positions: self.resolve_wallpapers(catalog, params),
            }
        }
    }

    fn resolve_wallpapers(&self, catalog: &Catalog, params: &QueryParams) -> Vec<usize> {
        let wallpapers = catalog.wallpapers();

        let filtered: Vec<usize> = wallpapers
            .iter()
            .enumerate()
            .filter(|(_, w)| params.category == ALL_CATEGORY || w.category == params.category)
            .map(|(i, _)| i)
            .collect();

        let mut positions = self.search_stage(wallpapers, filtered, params, &self.keys);

        // Stable: equal keys keep search/catalog order
        positions.sort_by(|&a, &b| params.sort.compare(&wallpapers[a], &wallpapers[b]));
        positions
    }

    fn resolve_packs(&self, catalog: &Catalog, params: &QueryParams) -> Vec<usize> {
        let packs = catalog.packs();

        let filtered: Vec<usize> = packs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.category == EXCLUSIVE_CATEGORY)
            .map(|(i, _)| i)
            .collect();

        self.search_stage(packs, filtered, params, PACK_SEARCH_KEYS)
    }

    /// Replace `filtered` by its fuzzy matches when there is a search query
    fn search_stage<T: super::search::Searchable>(
        &self,
        items: &[T],
        filtered: Vec<usize>,
        params: &QueryParams,
        keys: &[SearchKey],
    ) -> Vec<usize> {
        let query = params.trimmed_search();
        if query.is_empty() {
            return filtered;
        }

        let candidates: Vec<&T> = filtered.iter().map(|&i| &items[i]).collect();
        self.matcher
            .rank(&candidates, query, keys)
            .into_iter()
            .map(|ranked| filtered[ranked])
            .collect()
    }
}
