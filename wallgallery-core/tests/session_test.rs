//! Integration tests for the session lifecycle

mod common;

use anyhow::Result;
use common::{gallery_catalog, init_test_logging};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wallgallery_core::assets::{select_download, AssetDownloader};
use wallgallery_core::catalog::Catalog;
use wallgallery_core::config::GalleryPaths;
use wallgallery_core::session::{
    AppState, Layout, MockupDevice, ProfileTab, SessionStore, SignIn, Theme, View,
};
use wallgallery_core::{GalleryError, QueryEngine, Session, SortKey};

fn open(paths: &GalleryPaths) -> Session {
    Session::open(SessionStore::new(paths.session_file()), QueryEngine::default())
}

#[test]
fn test_session_survives_restart() -> Result<()> {
    init_test_logging();
    let temp_dir = TempDir::new()?;
    let paths = GalleryPaths::rooted_at(temp_dir.path());

    let mut session = open(&paths);
    assert_eq!(session.view(), View::Auth);

    session.sign_in(SignIn {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        avatar: Some("https://example.com/ada.png".to_string()),
    })?;
    session.toggle_favorite("w2")?;
    session.toggle_favorite("w1")?;
    session.set_category("nature")?;
    session.set_search("lake")?;
    session.set_sort(SortKey::Popular)?;
    session.set_layout(Layout::List)?;
    session.toggle_theme()?;
    let saved = session.state().clone();

    let restored = open(&paths);
    assert_eq!(restored.state(), &saved);
    assert_eq!(restored.view(), View::Gallery);
    assert_eq!(restored.theme(), Theme::Dark);
    assert_eq!(
        restored.user().and_then(|u| u.avatar.as_deref()),
        Some("https://example.com/ada.png")
    );

    Ok(())
}

#[test]
fn test_transient_state_is_not_persisted() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = GalleryPaths::rooted_at(temp_dir.path());
    let catalog = gallery_catalog();

    let mut session = open(&paths);
    session.sign_in(SignIn::new("Ada", "ada@example.com"))?;
    session.select_wallpaper(&catalog, "w1")?;
    session.open_preview(MockupDevice::Desktop)?;
    assert_eq!(session.view(), View::Preview);
    assert_eq!(session.preview_device(), MockupDevice::Desktop);

    let restored = open(&paths);
    assert_eq!(restored.view(), View::Gallery);
    assert_eq!(restored.selected(), None);
    assert_eq!(restored.profile_tab(), ProfileTab::Profile);
    assert_eq!(restored.preview_device(), MockupDevice::Mobile);

    Ok(())
}

#[test]
fn test_favorites_resolve_in_toggle_order() -> Result<()> {
    let catalog = gallery_catalog();
    let mut session = Session::in_memory(AppState::default(), QueryEngine::default());
    session.sign_in(SignIn::new("Ada", "ada@example.com"))?;

    session.toggle_favorite("w3")?;
    session.toggle_favorite("w1")?;
    session.toggle_favorite("gone")?;

    let ids: Vec<&str> = session
        .favorites()
        .resolve(&catalog)
        .iter()
        .map(|w| w.id.as_str())
        .collect();
    assert_eq!(ids, vec!["w3", "w1"]);

    // Toggling twice restores the original set
    let before = session.favorites().clone();
    session.toggle_favorite("w2")?;
    session.toggle_favorite("w2")?;
    assert_eq!(session.favorites(), &before);

    Ok(())
}

#[test]
fn test_signed_out_actions_are_rejected() {
    let mut session = Session::in_memory(AppState::default(), QueryEngine::default());

    let err = session.toggle_favorite("w1").unwrap_err();
    assert_eq!(
        err.downcast_ref::<GalleryError>(),
        Some(&GalleryError::NotAuthenticated)
    );
    assert!(err.to_string().contains("wallgallery sign-in"));

    assert_eq!(
        session.authorize_download(),
        Err(GalleryError::NotAuthenticated)
    );
    assert_eq!(
        session.open_profile(ProfileTab::Favorites),
        Err(GalleryError::NotAuthenticated)
    );
}

#[test]
fn test_corrupt_session_file_starts_fresh() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = GalleryPaths::rooted_at(temp_dir.path());
    std::fs::create_dir_all(&paths.data_dir)?;
    std::fs::write(paths.session_file(), r#"{"user": 42"#)?;

    let mut session = open(&paths);
    assert_eq!(session.state(), &AppState::default());
    assert_eq!(session.view(), View::Auth);

    // The next change overwrites the corrupt file
    session.toggle_theme()?;
    assert_eq!(open(&paths).theme(), Theme::Dark);

    Ok(())
}

#[tokio::test]
async fn test_download_selected_wallpaper() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("full.jpg");
    std::fs::write(&source, b"pixels")?;

    let catalog = Catalog::from_json_strs(
        &format!(
            r#"[{{"id": "w9", "title": "Tide", "download_options": [
                {{"resolution": "1080p", "path": "/nowhere/tide-1080.jpg"}},
                {{"resolution": "4K", "path": "{}"}}
            ]}}]"#,
            source.display()
        ),
        "[]",
        "[]",
    );

    let mut session = Session::in_memory(AppState::default(), QueryEngine::default());
    session.sign_in(SignIn::new("Ada", "ada@example.com"))?;
    let wallpaper = session.select_wallpaper(&catalog, "w9")?;

    session.authorize_download()?;
    let option = select_download(wallpaper, Some("4k"))?;
    let written = AssetDownloader::new()?
        .download(wallpaper, option, &temp_dir.path().join("out"))
        .await?;

    assert_eq!(written.file_name().unwrap(), "w9-4K.jpg");
    assert_eq!(std::fs::read(written)?, b"pixels");

    Ok(())
}
