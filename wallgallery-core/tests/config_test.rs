//! Integration tests for configuration discovery and loading

use anyhow::Result;
use serial_test::serial;
use std::env;
use tempfile::TempDir;
use wallgallery_core::query::SearchKey;
use wallgallery_core::{GalleryConfig, GalleryPaths, QueryEngine};

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_paths_follow_xdg_directories() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let saved: Vec<(&str, Option<String>)> = ["XDG_CONFIG_HOME", "XDG_DATA_HOME", "XDG_CACHE_HOME"]
        .into_iter()
        .map(|key| (key, env::var(key).ok()))
        .collect();

    env::set_var("XDG_CONFIG_HOME", temp_dir.path().join("config"));
    env::set_var("XDG_DATA_HOME", temp_dir.path().join("data"));
    env::set_var("XDG_CACHE_HOME", temp_dir.path().join("cache"));

    let paths = GalleryPaths::discover();

    for (key, value) in saved {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }

    let paths = paths?;
    assert!(paths.config_file.starts_with(temp_dir.path().join("config")));
    assert!(paths.config_file.ends_with("config.yaml"));
    assert!(paths.session_file().starts_with(temp_dir.path().join("data")));
    assert!(paths.cache_dir.starts_with(temp_dir.path().join("cache")));

    Ok(())
}

#[test]
#[serial]
fn test_config_file_tunes_search() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = GalleryPaths::rooted_at(temp_dir.path());

    std::fs::write(
        &paths.config_file,
        r#"
endpoints:
  wallpapers: https://cdn.example.com/wallpapers.json
  categories: https://cdn.example.com/categories.json
  packs: https://cdn.example.com/packs.json
cache_ttl_secs: 0
search:
  threshold: 0.95
  keys: [title, author]
"#,
    )?;

    let config = GalleryConfig::load_from_path(&paths.config_file)?;
    assert_eq!(config.cache_ttl_secs, 0);
    assert_eq!(config.endpoints.packs, "https://cdn.example.com/packs.json");

    let engine = QueryEngine::from_config(&config.search);
    assert_eq!(engine.keys(), &[SearchKey::Title, SearchKey::Author]);

    Ok(())
}

#[test]
#[serial]
fn test_invalid_config_is_an_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "search:\n  threshold: 1.5\n")?;

    let err = GalleryConfig::load_from_path(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to parse config"));
    assert!(message.contains("search.threshold"));

    Ok(())
}
