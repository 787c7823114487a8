//! Shared state for a single CLI invocation

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use wallgallery_core::catalog::{CatalogSource, ResponseCache};
use wallgallery_core::session::SessionStore;
use wallgallery_core::{Catalog, CatalogStore, GalleryConfig, GalleryPaths, QueryEngine, Session};

/// Resolved paths and configuration
pub struct AppContext {
    pub paths: GalleryPaths,
    pub config: GalleryConfig,
    pub config_file: PathBuf,
    pub state_file: PathBuf,
    store: CatalogStore,
}

impl AppContext {
    pub fn load(config_override: Option<PathBuf>, state_override: Option<PathBuf>) -> Result<Self> {
        let paths = GalleryPaths::discover()?;
        let config_file = config_override.unwrap_or_else(|| paths.config_file.clone());
        let config = GalleryConfig::load_from_path(&config_file)?;
        let state_file = state_override.unwrap_or_else(|| paths.session_file());

        debug!(
            "Using config {} and session {}",
            config_file.display(),
            state_file.display()
        );

        Ok(Self {
            paths,
            config,
            config_file,
            state_file,
            store: CatalogStore::new(Catalog::new()),
        })
    }

    pub fn response_cache(&self) -> ResponseCache {
        ResponseCache::new(self.paths.cache_dir.join("responses"), self.config.cache_ttl())
    }

    pub fn catalog_source(&self) -> Result<CatalogSource> {
        CatalogSource::new(self.config.endpoints.clone(), self.response_cache())
    }

    /// Fetch the catalog and make it the current snapshot
    pub async fn load_catalog(&self, force_refresh: bool) -> Result<Arc<Catalog>> {
        if force_refresh {
            eprintln!("Fetching catalog (refreshing cache)...");
        } else {
            eprintln!("Fetching catalog...");
        }

        let source = self.catalog_source()?;
        let (catalog, report) = source.load(force_refresh).await;

        if !report.is_complete() {
            let failed: Vec<String> = report.failed.iter().map(|(e, _)| e.to_string()).collect();
            eprintln!(
                "Some catalog data could not be loaded ({}); showing what is available.",
                failed.join(", ")
            );
        }

        self.store.replace(catalog);
        Ok(self.store.snapshot())
    }

    pub fn open_session(&self) -> Session {
        Session::open(
            SessionStore::new(&self.state_file),
            QueryEngine::from_config(&self.config.search),
        )
    }
}
