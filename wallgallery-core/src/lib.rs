//! Wallgallery library exports

pub mod assets;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod query;
pub mod session;

pub use catalog::{Catalog, CatalogSource, CatalogStore};
pub use config::{GalleryConfig, GalleryPaths};
pub use error::GalleryError;
pub use query::{DisplayList, QueryEngine, QueryParams, SortKey};
pub use session::Session;
