//! Memoized gallery queries
//!
//! The gallery is recomputed on every input change. [`QueryMemo`] keeps the
//! last outcome and returns it when neither the snapshot nor the params
//! changed. Snapshot identity is `Arc` pointer identity; the memo holds its
//! own `Arc`, so an address cannot be reused while cached.

use std::sync::Arc;
use tracing::trace;

use super::engine::{QueryEngine, QueryOutcome, QueryParams};
use super::search::FuzzySearch;
use crate::catalog::Catalog;

#[derive(Debug)]
struct MemoEntry {
    catalog: Arc<Catalog>,
    params: QueryParams,
    outcome: QueryOutcome,
}

/// Single-entry cache of the last query
#[derive(Debug, Default)]
pub struct QueryMemo {
    last: Option<MemoEntry>,
    hits: u64,
    misses: u64,
}

impl QueryMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome for these inputs, computing it on a miss
    pub fn resolve<S: FuzzySearch>(
        &mut self,
        engine: &QueryEngine<S>,
        catalog: &Arc<Catalog>,
        params: &QueryParams,
    ) -> &QueryOutcome {
        let fresh = match &self.last {
            Some(entry) => Arc::ptr_eq(&entry.catalog, catalog) && entry.params == *params,
            None => false,
        };

        if fresh {
            self.hits += 1;
            trace!("Query memo hit for {:?}", params);
        } else {
            self.misses += 1;
            trace!("Query memo miss for {:?}", params);
            self.last = None;
        }

        &self
            .last
            .get_or_insert_with(|| MemoEntry {
                catalog: Arc::clone(catalog),
                params: params.clone(),
                outcome: engine.resolve(catalog, params),
            })
            .outcome
    }

    /// Drop the cached outcome
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
