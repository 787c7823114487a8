//! Catalog fetch layer
//!
//! Fetches the wallpapers, categories and packs endpoints independently.
//! Remote responses are cached on disk with a TTL to reduce network
//! requests. A failed endpoint degrades to an empty collection; the others
//! still load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use super::snapshot::{parse_array, Catalog};
use crate::config::EndpointConfig;

/// The three static endpoints a catalog is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Wallpapers,
    Categories,
    Packs,
}

impl Endpoint {
    fn record_kind(self) -> &'static str {
        match self {
            Endpoint::Wallpapers => "wallpaper",
            Endpoint::Categories => "category",
            Endpoint::Packs => "pack",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Wallpapers => write!(f, "wallpapers"),
            Endpoint::Categories => write!(f, "categories"),
            Endpoint::Packs => write!(f, "packs"),
        }
    }
}

/// Outcome of a catalog load
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Endpoints that failed, with the error message
    pub failed: Vec<(Endpoint, String)>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Whether a location should be fetched over HTTP
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Filesystem path for a local endpoint (`file://` prefix optional)
fn local_path(location: &str) -> &Path {
    Path::new(location.strip_prefix("file://").unwrap_or(location))
}

/// Cached response body for one URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    /// When the response was cached (Unix timestamp)
    pub cached_at: u64,

    /// URL the body was fetched from
    pub url: String,

    /// Raw response body
    pub body: String,
}

/// On-disk cache of endpoint responses
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl ResponseCache {
    pub fn new(dir: PathBuf, ttl: Duration) -> Self {
        Self { dir, ttl }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get cache file path for a URL
    fn path_for_url(&self, url: &str) -> PathBuf {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        let hash = hasher.finish();

        self.dir.join(format!("response_{hash:016x}.json"))
    }

    /// Load a cached body if present and younger than the TTL
    pub fn load(&self, url: &str) -> Result<Option<String>> {
        if self.ttl.is_zero() {
            return Ok(None);
        }

        let cache_path = self.path_for_url(url);
        if !cache_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&cache_path)
            .with_context(|| format!("Failed to read cache: {}", cache_path.display()))?;

        let cached: CachedResponse = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache: {}", cache_path.display()))?;

        if cached.url != url {
            debug!("Cache collision for {} (cached {})", url, cached.url);
            return Ok(None);
        }

        let age = Duration::from_secs(unix_now().saturating_sub(cached.cached_at));
        if age > self.ttl {
            debug!("Cache expired for {} (age: {:?})", url, age);
            return Ok(None);
        }

        debug!("Using cached response for {} (age: {:?})", url, age);
        Ok(Some(cached.body))
    }

    /// Save a response body
    pub fn save(&self, url: &str, body: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create cache directory: {}", self.dir.display())
        })?;

        let cache_path = self.path_for_url(url);
        let cached = CachedResponse {
            cached_at: unix_now(),
            url: url.to_string(),
            body: body.to_string(),
        };

        let content = serde_json::to_string(&cached).context("Failed to serialize cache")?;
        std::fs::write(&cache_path, content)
            .with_context(|| format!("Failed to write cache: {}", cache_path.display()))?;

        debug!("Saved response to cache: {}", cache_path.display());
        Ok(())
    }

    /// Remove all cached responses
    pub fn clear(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_response = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("response_") && n.ends_with(".json"))
                .unwrap_or(false);

            if path.is_file() && is_response {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Build the shared HTTP client
#[cfg(feature = "remote")]
pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("wallgallery/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")
}

/// Fetches catalog endpoints and builds snapshots
pub struct CatalogSource {
    endpoints: EndpointConfig,
    cache: ResponseCache,
    #[cfg(feature = "remote")]
    client: reqwest::Client,
}

impl CatalogSource {
    pub fn new(endpoints: EndpointConfig, cache: ResponseCache) -> Result<Self> {
        Ok(Self {
            endpoints,
            cache,
            #[cfg(feature = "remote")]
            client: http_client()?,
        })
    }

    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Remove every cached endpoint response, returning how many were deleted
    pub fn clear_cache(&self) -> Result<usize> {
        self.cache.clear()
    }

    fn location(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Wallpapers => &self.endpoints.wallpapers,
            Endpoint::Categories => &self.endpoints.categories,
            Endpoint::Packs => &self.endpoints.packs,
        }
    }

    /// Fetch all three endpoints and build a catalog snapshot
    ///
    /// Uses cached responses if available and valid.
    /// Set `force_refresh` to bypass the cache and fetch fresh data.
    pub async fn load(&self, force_refresh: bool) -> (Catalog, FetchReport) {
        let (wallpapers, categories, packs) = tokio::join!(
            self.fetch_records(Endpoint::Wallpapers, force_refresh),
            self.fetch_records(Endpoint::Categories, force_refresh),
            self.fetch_records(Endpoint::Packs, force_refresh),
        );

        let mut report = FetchReport::default();
        let mut absorb = |endpoint: Endpoint, result: Result<Vec<serde_json::Value>>| {
            result.unwrap_or_else(|e| {
                warn!("Failed to load {} from '{}': {:#}", endpoint, self.location(endpoint), e);
                report.failed.push((endpoint, format!("{e:#}")));
                Vec::new()
            })
        };

        let wallpapers = absorb(Endpoint::Wallpapers, wallpapers);
        let categories = absorb(Endpoint::Categories, categories);
        let packs = absorb(Endpoint::Packs, packs);

        let catalog = Catalog::from_json_values(wallpapers, categories, packs);
        (catalog, report)
    }

    /// Fetch one endpoint and split it into raw JSON records
    async fn fetch_records(
        &self,
        endpoint: Endpoint,
        force_refresh: bool,
    ) -> Result<Vec<serde_json::Value>> {
        let location = self.location(endpoint);
        let body = self.fetch_body(location, force_refresh).await?;
        let records = parse_array(endpoint.record_kind(), &body)
            .with_context(|| format!("Failed to parse {endpoint} from {location}"))?;

        debug!("Fetched {} {} record(s) from {}", records.len(), endpoint, location);
        Ok(records)
    }

    async fn fetch_body(&self, location: &str, force_refresh: bool) -> Result<String> {
        if !is_remote(location) {
            let path = local_path(location);
            return tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        // Check cache first (unless force refresh)
        if !force_refresh {
            match self.cache.load(location) {
                Ok(Some(body)) => return Ok(body),
                Ok(None) => {}
                Err(e) => debug!("Ignoring unreadable cache for {}: {:#}", location, e),
            }
        }

        let body = self.fetch_remote(location).await?;

        // Save to cache (ignore errors - caching is best effort)
        if let Err(e) = self.cache.save(location, &body) {
            warn!("Failed to save response to cache: {:#}", e);
        }

        Ok(body)
    }

    #[cfg(feature = "remote")]
    async fn fetch_remote(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    /// Stub for when the remote feature is disabled
    #[cfg(not(feature = "remote"))]
    async fn fetch_remote(&self, url: &str) -> Result<String> {
        anyhow::bail!(
            "Cannot fetch {}: remote feature is not enabled. Rebuild with --features remote",
            url
        )
    }
}
