//! Integration tests for catalog ingestion and loading

mod common;

use common::{gallery_catalog, init_test_logging, write_gallery_endpoints};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::time::Duration;
use tempfile::TempDir;
use wallgallery_core::catalog::{
    CatalogSource, Endpoint, ResponseCache, UNCATEGORIZED, UNKNOWN_ARTIST, UNTITLED,
};
use wallgallery_core::{Catalog, CatalogStore, QueryEngine, QueryParams, SortKey};

#[test]
fn test_records_without_ids_and_duplicates_are_dropped() {
    init_test_logging();
    let catalog = Catalog::from_json_strs(
        r#"[
            {"id": "a", "title": "First"},
            {"title": "No id"},
            {"id": "", "title": "Blank id"},
            {"id": "a", "title": "Second"},
            "not an object",
            {"id": 7, "title": "Numeric"}
        ]"#,
        "[]",
        "[]",
    );

    let ids: Vec<&str> = catalog.wallpapers().iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "7"]);
    assert_eq!(catalog.wallpaper("a").unwrap().title, "First");

    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_missing_fields_get_defaults() {
    let catalog = Catalog::from_json_strs(r#"[{"id": "bare"}]"#, "[]", "[]");
    let wallpaper = catalog.wallpaper("bare").unwrap();

    assert_eq!(wallpaper.category, UNCATEGORIZED);
    assert_eq!(wallpaper.display_title(), UNTITLED);
    assert_eq!(wallpaper.author_name(), UNKNOWN_ARTIST);
    assert_eq!(wallpaper.stats.downloads, 0);
    assert_eq!(wallpaper.display_image(), None);
    assert!(!wallpaper.has_upload_date());
}

#[test]
fn test_mistyped_fields_keep_the_wallpaper_visible() {
    init_test_logging();
    let catalog = Catalog::from_json_strs(
        r#"[
            {"id": "1", "title": "Float Downloads", "stats": {"downloads": 1200.0}},
            {"id": "2", "title": "String Downloads", "stats": {"downloads": "5"}},
            {"id": "3", "title": "Single Tag", "tags": "desert"},
            {"id": "4", "title": "Well Formed", "stats": {"downloads": 10}, "tags": ["city"]}
        ]"#,
        "[]",
        "[]",
    );

    let engine = QueryEngine::default();
    let ids = engine
        .run(&catalog, &QueryParams::new("all", "", SortKey::Trending))
        .ids();
    assert_eq!(ids, vec!["1", "4", "2", "3"]);

    assert_eq!(catalog.wallpaper("1").unwrap().stats.downloads, 1200);
    assert_eq!(catalog.wallpaper("2").unwrap().stats.downloads, 5);
    assert_eq!(catalog.wallpaper("3").unwrap().tags, vec!["desert"]);
}

#[test]
fn test_image_accessors() {
    let catalog = gallery_catalog();
    let w1 = catalog.wallpaper("w1").unwrap();

    assert_eq!(w1.display_image(), Some("/thumbs/w1.jpg"));
    assert_eq!(w1.preview_image(), Some("/img/w1-4k.jpg"));
    assert_eq!(w1.display_resolution(), "1080p");

    let without_thumbnail = Catalog::from_json_strs(
        r#"[{"id": "x", "download_options": [
            {"resolution": "720p", "path": "/img/x-720.jpg"},
            {"resolution": "1440p", "path": "/img/x-1440.jpg"}
        ]}]"#,
        "[]",
        "[]",
    );
    let x = without_thumbnail.wallpaper("x").unwrap();
    assert_eq!(x.display_image(), Some("/img/x-720.jpg"));
    assert_eq!(x.preview_image(), Some("/img/x-1440.jpg"));
}

#[test]
fn test_pack_wallpapers_skip_unknown_ids() {
    let catalog = gallery_catalog();

    let p1 = catalog.pack("p1").unwrap();
    let titles: Vec<&str> = catalog
        .pack_wallpapers(p1)
        .iter()
        .map(|w| w.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Aurora Borealis", "Mountain Lake"]);

    let p3 = catalog.pack("p3").unwrap();
    assert_eq!(p3.wallpaper_count(), 2);
    assert_eq!(catalog.pack_wallpapers(p3).len(), 1);
}

#[test]
fn test_resolve_category_input() {
    let catalog = gallery_catalog();

    assert_eq!(catalog.resolve_category("ALL"), "all");
    assert_eq!(catalog.resolve_category("Exclusive"), "exclusive");
    assert_eq!(catalog.resolve_category("nature"), "nature");
    assert_eq!(catalog.resolve_category(" Urban "), "urban");
    assert_eq!(catalog.resolve_category("space"), "space");
}

#[test]
fn test_category_counts() {
    let catalog = gallery_catalog();
    let counts: Vec<(&str, usize)> = catalog
        .category_counts()
        .into_iter()
        .map(|(c, n)| (c.id.as_str(), n))
        .collect();

    assert_eq!(counts, vec![("nature", 2), ("urban", 1), ("exclusive", 1)]);
}

#[test]
fn test_store_replaces_snapshot() {
    let store = CatalogStore::new(Catalog::new());
    let before = store.snapshot();
    assert!(before.is_empty());

    let old = store.replace((*gallery_catalog()).clone());
    assert!(old.is_empty());

    let after = store.snapshot();
    assert_eq!(after.wallpapers().len(), 4);
    // Readers holding the old snapshot are unaffected
    assert!(before.is_empty());
}

#[tokio::test]
async fn test_source_loads_all_endpoints() {
    init_test_logging();
    let temp_dir = TempDir::new().unwrap();
    let endpoints = write_gallery_endpoints(temp_dir.path());
    let cache = ResponseCache::new(temp_dir.path().join("cache"), Duration::from_secs(60));

    let source = CatalogSource::new(endpoints, cache).unwrap();
    let (catalog, report) = source.load(false).await;

    assert!(report.is_complete());
    assert_eq!(catalog, *gallery_catalog());
}

#[tokio::test]
async fn test_failing_endpoint_degrades_to_empty() {
    let temp_dir = TempDir::new().unwrap();
    let mut endpoints = write_gallery_endpoints(temp_dir.path());
    endpoints.categories = temp_dir
        .path()
        .join("missing.json")
        .display()
        .to_string();
    std::fs::write(temp_dir.path().join("packs.json"), "not json").unwrap();

    let cache = ResponseCache::new(temp_dir.path().join("cache"), Duration::ZERO);
    let source = CatalogSource::new(endpoints, cache).unwrap();
    let (catalog, report) = source.load(true).await;

    assert_eq!(catalog.wallpapers().len(), 4);
    assert!(catalog.categories().is_empty());
    assert!(catalog.packs().is_empty());

    let failed: Vec<Endpoint> = report.failed.iter().map(|(e, _)| *e).collect();
    assert_eq!(failed, vec![Endpoint::Categories, Endpoint::Packs]);
}
