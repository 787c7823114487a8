//! Wallpaper asset selection and download
//!
//! Downloads copy bytes verbatim; there is no image processing.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::{is_remote, DownloadOption, Wallpaper};
use crate::error::GalleryError;

/// Extension used when the source path has none
const DEFAULT_EXTENSION: &str = "jpg";

/// Pick the rendition to download
///
/// `None` selects the highest quality (last) option. A requested resolution
/// matches case-insensitively.
pub fn select_download<'a>(
    wallpaper: &'a Wallpaper,
    resolution: Option<&str>,
) -> Result<&'a DownloadOption, GalleryError> {
    let options = &wallpaper.download_options;
    if options.is_empty() {
        return Err(GalleryError::NoDownloadOptions {
            id: wallpaper.id.clone(),
        });
    }

    match resolution.map(str::trim) {
        None | Some("") => options.last().ok_or_else(|| GalleryError::NoDownloadOptions {
            id: wallpaper.id.clone(),
        }),
        Some(requested) => options
            .iter()
            .find(|o| o.resolution.eq_ignore_ascii_case(requested))
            .ok_or_else(|| GalleryError::ResolutionUnavailable {
                id: wallpaper.id.clone(),
                requested: requested.to_string(),
                available: options.iter().map(|o| o.resolution.clone()).collect(),
            }),
    }
}

/// Replace characters that are unsafe in file names
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension of the source path, ignoring any query string or fragment
fn source_extension(path: &str) -> String {
    let without_query = path.split(['?', '#']).next().unwrap_or(path);
    let file_name = without_query.rsplit('/').next().unwrap_or(without_query);

    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// File name for a downloaded rendition: `<id>-<resolution>.<ext>`
pub fn download_file_name(wallpaper: &Wallpaper, option: &DownloadOption) -> String {
    format!(
        "{}-{}.{}",
        sanitize(&wallpaper.id),
        sanitize(&option.resolution),
        source_extension(&option.path)
    )
}

/// Fetches wallpaper renditions to disk
pub struct AssetDownloader {
    #[cfg(feature = "remote")]
    client: reqwest::Client,
}

impl AssetDownloader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            #[cfg(feature = "remote")]
            client: crate::catalog::http_client()?,
        })
    }

    /// Save one rendition into `dest_dir`, returning the written path
    pub async fn download(
        &self,
        wallpaper: &Wallpaper,
        option: &DownloadOption,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dest_dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", dest_dir.display()))?;

        let target = dest_dir.join(download_file_name(wallpaper, option));
        debug!("Downloading {} -> {}", option.path, target.display());

        if is_remote(&option.path) {
            let bytes = self.fetch_remote(&option.path).await?;
            tokio::fs::write(&target, bytes)
                .await
                .with_context(|| format!("Failed to write {}", target.display()))?;
        } else {
            let source = option.path.strip_prefix("file://").unwrap_or(&option.path);
            tokio::fs::copy(source, &target)
                .await
                .with_context(|| format!("Failed to copy {} to {}", source, target.display()))?;
        }

        info!(
            "Downloaded '{}' ({}) to {}",
            wallpaper.display_title(),
            option.resolution,
            target.display()
        );
        Ok(target)
    }

    #[cfg(feature = "remote")]
    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        Ok(bytes.to_vec())
    }

    /// Stub for when the remote feature is disabled
    #[cfg(not(feature = "remote"))]
    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        anyhow::bail!(
            "Cannot fetch {}: remote feature is not enabled. Rebuild with --features remote",
            url
        )
    }
}
