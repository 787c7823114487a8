//! Fuzzy text matching
//!
//! [`FuzzySearch`] is the capability the query engine ranks search results
//! with. [`EditDistanceMatcher`] is the default implementation: word-level
//! Damerau-Levenshtein similarity from `strsim`, tolerant of small typos.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::catalog::{Pack, Wallpaper};
use crate::config::DEFAULT_SEARCH_THRESHOLD;

/// A searchable field of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKey {
    Title,
    Tags,
    Author,
}

impl SearchKey {
    pub const ALL: [SearchKey; 3] = [SearchKey::Title, SearchKey::Tags, SearchKey::Author];

    /// Relative importance of a match in this field
    pub fn weight(self) -> f64 {
        match self {
            SearchKey::Title => 1.0,
            SearchKey::Tags => 0.9,
            SearchKey::Author => 0.8,
        }
    }
}

/// Items that expose text fields to the matcher
pub trait Searchable {
    /// Text of a field, or `None` when the item has nothing there
    fn field_text(&self, key: SearchKey) -> Option<Cow<'_, str>>;
}

impl Searchable for Wallpaper {
    fn field_text(&self, key: SearchKey) -> Option<Cow<'_, str>> {
        match key {
            SearchKey::Title => Some(Cow::Borrowed(self.title.as_str())),
            SearchKey::Tags if !self.tags.is_empty() => Some(Cow::Owned(self.tags.join(" "))),
            SearchKey::Tags => None,
            SearchKey::Author => self.author.as_ref().map(|a| Cow::Borrowed(a.name.as_str())),
        }
    }
}

impl Searchable for Pack {
    fn field_text(&self, key: SearchKey) -> Option<Cow<'_, str>> {
        match key {
            SearchKey::Title => Some(Cow::Borrowed(self.title.as_str())),
            SearchKey::Tags | SearchKey::Author => None,
        }
    }
}

/// Approximate string matching capability
pub trait FuzzySearch {
    /// Rank `items` against `query`
    ///
    /// Returns positions into `items` of the matches, most relevant first.
    /// Equally relevant matches keep their input order.
    fn rank<T: Searchable>(&self, items: &[&T], query: &str, keys: &[SearchKey]) -> Vec<usize>;

    /// Matching items, most relevant first
    fn search<'a, T: Searchable>(
        &self,
        items: &[&'a T],
        query: &str,
        keys: &[SearchKey],
    ) -> Vec<&'a T> {
        self.rank(items, query, keys)
            .into_iter()
            .map(|i| items[i])
            .collect()
    }
}

/// Word-level edit distance matcher
///
/// Words of three or more characters tolerate one typo and words of six or
/// more tolerate two, independent of the threshold. Beyond that, matching
/// falls back to normalized similarity against the threshold (0.7 by
/// default).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditDistanceMatcher {
    threshold: f64,
}

impl Default for EditDistanceMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_THRESHOLD)
    }
}

/// Lower-cased alphanumeric words of a text
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Score given to a word within one edit of the query word
const ONE_EDIT_SCORE: f64 = 0.85;

/// Score given to a word within two edits of the query word
const TWO_EDIT_SCORE: f64 = 0.75;

/// Edits tolerated between two words, by the shorter word's length
fn tolerated_edits(shorter: usize) -> usize {
    match shorter {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

fn word_similarity(query: &str, word: &str) -> f64 {
    if query == word {
        return 1.0;
    }
    if query.chars().count() >= 2 && word.starts_with(query) {
        return 0.9;
    }

    let normalized = strsim::normalized_damerau_levenshtein(query, word);
    let shorter = query.chars().count().min(word.chars().count());
    let tolerance = match strsim::damerau_levenshtein(query, word) {
        1 if tolerated_edits(shorter) >= 1 => ONE_EDIT_SCORE,
        2 if tolerated_edits(shorter) >= 2 => TWO_EDIT_SCORE,
        _ => 0.0,
    };
    normalized.max(tolerance)
}

/// Prepared query, built once per search
struct Query {
    text: String,
    words: Vec<String>,
}

impl Query {
    fn new(raw: &str) -> Self {
        Self {
            text: raw.trim().to_lowercase(),
            words: words(raw),
        }
    }

    /// Relevance of one field in `[0, 1]`
    fn field_score(&self, field: &str) -> f64 {
        let field = field.to_lowercase();
        if !self.text.is_empty() && field.contains(&self.text) {
            return 1.0;
        }

        let field_words = words(&field);
        if field_words.is_empty() || self.words.is_empty() {
            return 0.0;
        }

        let total: f64 = self
            .words
            .iter()
            .map(|q| {
                field_words
                    .iter()
                    .map(|w| word_similarity(q, w))
                    .fold(0.0, f64::max)
            })
            .sum();

        total / self.words.len() as f64
    }
}

impl EditDistanceMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Relevance of an item: best weighted field score
    pub fn score<T: Searchable>(&self, item: &T, query: &str, keys: &[SearchKey]) -> f64 {
        self.score_prepared(item, &Query::new(query), keys)
    }

    fn score_prepared<T: Searchable>(&self, item: &T, query: &Query, keys: &[SearchKey]) -> f64 {
        keys.iter()
            .filter_map(|&key| {
                item.field_text(key)
                    .map(|text| query.field_score(&text) * key.weight())
            })
            .fold(0.0, f64::max)
    }
}

impl FuzzySearch for EditDistanceMatcher {
    fn rank<T: Searchable>(&self, items: &[&T], query: &str, keys: &[SearchKey]) -> Vec<usize> {
        let query = Query::new(query);
        if query.text.is_empty() {
            return (0..items.len()).collect();
        }

        let mut scored: Vec<(usize, f64)> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (i, self.score_prepared(*item, &query, keys)))
            .filter(|(_, score)| *score >= self.threshold)
            .collect();

        // Stable: equal scores keep input order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored.into_iter().map(|(i, _)| i).collect()
    }
}
