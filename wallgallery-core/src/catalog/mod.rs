//! Wallpaper catalog - records, snapshots and the fetch layer
//!
//! # Overview
//!
//! The catalog is the in-memory snapshot of wallpapers, categories and
//! packs for the current session. It is:
//! - Fetched from three static JSON endpoints, each allowed to fail alone
//! - Normalized once at ingestion (ids, categories, defaults)
//! - Immutable once built, and replaced wholesale on reload
//!
//! # Architecture
//!
//! ```text
//! Endpoints (static JSON)
//!     │
//!     ├── wallpapers.json
//!     ├── categories.json
//!     └── packs.json
//!            │
//!            ▼
//!     CatalogSource  ← response cache (TTL)
//!            │
//!            ▼
//!     Catalog (normalized, immutable)
//!            │
//!            ▼
//!     CatalogStore (Arc swap)
//! ```

mod model;
mod snapshot;
mod source;

pub use model::{
    normalize_category_id, parse_upload_date, Author, Category, DownloadOption, Pack, RawAuthor,
    RawCategory, RawDownloadOption, RawPack, RawStats, RawWallpaper, Stats, Wallpaper,
    UNCATEGORIZED, UNKNOWN_ARTIST, UNTITLED,
};
pub use snapshot::{Catalog, CatalogStore, ALL_CATEGORY, EXCLUSIVE_CATEGORY};
pub use source::{is_remote, CachedResponse, CatalogSource, Endpoint, FetchReport, ResponseCache};

#[cfg(feature = "remote")]
pub(crate) use source::http_client;
