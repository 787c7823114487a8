//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use wallgallery_core::config::EndpointConfig;
use wallgallery_core::Catalog;

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// The three-wallpaper catalog used by the gallery scenarios
pub const SCENARIO_WALLPAPERS: &str = r#"[
    {"id": 1, "title": "Nature Walk", "category": "nature", "stats": {"downloads": 5}},
    {"id": 2, "title": "Nature Falls", "category": "nature", "stats": {"downloads": 50}},
    {"id": 3, "title": "Downtown", "category": "city", "stats": {"downloads": 10}}
]"#;

pub const SCENARIO_CATEGORIES: &str = r#"[
    {"id": "nature", "name": "Nature"},
    {"id": "city", "name": "City"}
]"#;

pub fn scenario_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_json_strs(
        SCENARIO_WALLPAPERS,
        SCENARIO_CATEGORIES,
        "[]",
    ))
}

/// A richer catalog with packs, dates, authors and tags
pub const GALLERY_WALLPAPERS: &str = r#"[
    {
        "id": "w1",
        "title": "Mountain Lake",
        "category": "nature",
        "tags": ["water", "alps"],
        "author": {"name": "Mira Holt", "title": "Photographer"},
        "stats": {"downloads": 120, "likes": 40},
        "upload_date": "2024-03-01",
        "thumbnail": "/thumbs/w1.jpg",
        "download_options": [
            {"resolution": "1080p", "path": "/img/w1-1080.jpg"},
            {"resolution": "4K", "path": "/img/w1-4k.jpg"}
        ]
    },
    {
        "id": "w2",
        "title": "Neon Alley",
        "category": "urban",
        "tags": ["night", "neon"],
        "author": {"name": "Kenji Sato"},
        "stats": {"downloads": 300, "likes": 12},
        "upload_date": "2024-05-10T08:00:00Z"
    },
    {
        "id": "w3",
        "title": "Quiet Dunes",
        "category": "Nature ",
        "stats": {"downloads": 120, "likes": 90}
    },
    {
        "id": "w4",
        "title": "Aurora Borealis",
        "category": "exclusive",
        "author": {"name": "Mira Holt"},
        "stats": {"downloads": 5},
        "upload_date": "2023-12-24T20:00:00"
    }
]"#;

pub const GALLERY_CATEGORIES: &str = r#"[
    {"id": "nature", "name": "Nature"},
    {"id": "urban", "name": "Urban"},
    {"id": "exclusive", "name": "Exclusive"}
]"#;

pub const GALLERY_PACKS: &str = r#"[
    {"id": "p1", "title": "Northern Lights", "category": "exclusive", "wallpaper_ids": ["w4", "w1"]},
    {"id": "p2", "title": "City Nights", "category": "urban", "wallpaper_ids": ["w2"]},
    {"id": "p3", "title": "Desert Calm", "category": "exclusive", "wallpaper_ids": ["w3", "missing"]}
]"#;

pub fn gallery_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_json_strs(
        GALLERY_WALLPAPERS,
        GALLERY_CATEGORIES,
        GALLERY_PACKS,
    ))
}

/// Write the gallery endpoints into `dir` and point a config at them
pub fn write_gallery_endpoints(dir: &Path) -> EndpointConfig {
    let write = |name: &str, body: &str| -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    };

    EndpointConfig {
        wallpapers: write("wallpapers.json", GALLERY_WALLPAPERS)
            .display()
            .to_string(),
        categories: write("categories.json", GALLERY_CATEGORIES)
            .display()
            .to_string(),
        packs: write("packs.json", GALLERY_PACKS).display().to_string(),
    }
}
