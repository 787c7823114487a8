//! Gallery query engine
//!
//! Given a catalog snapshot, a selected category, a search query and a sort
//! key, computes the ordered items the gallery shows and whether they are
//! wallpapers or packs.
//!
//! # Pipeline
//!
//! ```text
//! category ──► mode selection ──► search stage ──► sort stage ──► DisplayList
//!              (exclusive → packs)  (fuzzy rank,     (stable, wallpapers
//!                                    skipped when     only)
//!                                    query is blank)
//! ```

mod engine;
mod memo;
mod search;
mod sort;

pub use engine::{DisplayList, ItemKind, QueryEngine, QueryOutcome, QueryParams};
pub use memo::QueryMemo;
pub use search::{EditDistanceMatcher, FuzzySearch, SearchKey, Searchable};
pub use sort::SortKey;
