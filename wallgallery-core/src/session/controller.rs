//! Session controller
//!
//! Owns the [`AppState`], the current screen and the selection, and applies
//! the transitions between screens. Every change to persisted fields is
//! written through the [`SessionStore`] before it is adopted, so a failed
//! save leaves the session unchanged.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::state::{
    AppState, Layout, MockupDevice, ProfileTab, ProfileUpdate, SignIn, Theme, UserProfile, View,
    LOCAL_PROVIDER,
};
use super::store::SessionStore;
use crate::catalog::{Catalog, Wallpaper, ALL_CATEGORY};
use crate::error::GalleryError;
use crate::favorites::Favorites;
use crate::query::{DisplayList, QueryEngine, QueryMemo, SortKey};

/// Treat an empty string as "clear this field"
fn optional_field(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub struct Session {
    state: AppState,
    view: View,
    selected: Option<String>,
    profile_tab: ProfileTab,
    preview_device: MockupDevice,
    store: Option<SessionStore>,
    engine: QueryEngine,
    memo: QueryMemo,
}

impl Session {
    /// Restore the session saved in `store`
    pub fn open(store: SessionStore, engine: QueryEngine) -> Self {
        let state = store.load();
        debug!(
            "Restored session from {} (signed in: {})",
            store.path().display(),
            state.user.is_some()
        );
        Self::build(state, Some(store), engine)
    }

    /// Session that is never written to disk
    pub fn in_memory(state: AppState, engine: QueryEngine) -> Self {
        Self::build(state, None, engine)
    }

    fn build(state: AppState, store: Option<SessionStore>, engine: QueryEngine) -> Self {
        let view = if state.user.is_some() {
            View::Gallery
        } else {
            View::Auth
        };

        Self {
            state,
            view,
            selected: None,
            profile_tab: ProfileTab::default(),
            preview_device: MockupDevice::default(),
            store,
            engine,
            memo: QueryMemo::new(),
        }
    }

    /// Apply `change` to a copy of the state, save it, then adopt it
    fn update<T>(&mut self, change: impl FnOnce(&mut AppState) -> Result<T>) -> Result<T> {
        let mut next = self.state.clone();
        let outcome = change(&mut next)?;
        if let Some(store) = &self.store {
            store.save(&next)?;
        }
        self.state = next;
        Ok(outcome)
    }

    fn require_user(&self) -> Result<&UserProfile, GalleryError> {
        self.state.user.as_ref().ok_or(GalleryError::NotAuthenticated)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.user.is_some()
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn favorites(&self) -> &Favorites {
        &self.state.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.favorites.contains(id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn profile_tab(&self) -> ProfileTab {
        self.profile_tab
    }

    pub fn preview_device(&self) -> MockupDevice {
        self.preview_device
    }

    pub fn memo(&self) -> &QueryMemo {
        &self.memo
    }

    /// Create a local profile and enter the gallery
    pub fn sign_in(&mut self, form: SignIn) -> Result<&UserProfile> {
        let (name, email) = form.validate()?;

        let profile = UserProfile {
            id: Uuid::now_v7().to_string(),
            name,
            email,
            avatar: form.avatar.and_then(optional_field),
            provider: LOCAL_PROVIDER.to_string(),
            bio: None,
            location: None,
            website: None,
            created_at: Utc::now(),
        };

        self.update(|state| {
            state.user = Some(profile);
            Ok(())
        })?;
        self.view = View::Gallery;

        let user = self.require_user()?;
        info!("Signed in as {} <{}>", user.name, user.email);
        Ok(user)
    }

    /// Forget the user, their favorites and the selection
    pub fn sign_out(&mut self) -> Result<()> {
        let previous = self.update(|state| {
            state.favorites.clear();
            Ok(state.user.take())
        })?;
        if let Some(user) = previous {
            info!("Signed out {}", user.name);
        }
        self.reset_navigation();
        Ok(())
    }

    /// Sign out and delete the session file, dropping every saved preference
    pub fn forget(&mut self) -> Result<()> {
        if let Some(store) = &self.store {
            store.clear()?;
            info!("Removed session file {}", store.path().display());
        }
        self.state = AppState::default();
        self.reset_navigation();
        Ok(())
    }

    fn reset_navigation(&mut self) {
        self.selected = None;
        self.profile_tab = ProfileTab::default();
        self.preview_device = MockupDevice::default();
        self.view = View::Auth;
    }

    /// Select a wallpaper and show its detail screen
    pub fn select_wallpaper<'c>(
        &mut self,
        catalog: &'c Catalog,
        id: &str,
    ) -> Result<&'c Wallpaper, GalleryError> {
        let wallpaper = catalog
            .wallpaper(id)
            .ok_or_else(|| GalleryError::UnknownWallpaper { id: id.to_string() })?;

        self.selected = Some(wallpaper.id.clone());
        self.view = View::Detail;
        Ok(wallpaper)
    }

    /// The selected wallpaper, if it is still in `catalog`
    pub fn selected_wallpaper<'c>(&self, catalog: &'c Catalog) -> Option<&'c Wallpaper> {
        self.selected.as_deref().and_then(|id| catalog.wallpaper(id))
    }

    /// Show the selected wallpaper inside a device frame
    pub fn open_preview(&mut self, device: MockupDevice) -> Result<(), GalleryError> {
        if self.selected.is_none() {
            return Err(GalleryError::NothingSelected);
        }
        self.preview_device = device;
        self.view = View::Preview;
        Ok(())
    }

    /// Step back one screen
    pub fn back(&mut self) -> View {
        self.view = match self.view {
            View::Preview => View::Detail,
            View::Detail | View::Profile => View::Gallery,
            other => other,
        };
        self.view
    }

    pub fn open_profile(&mut self, tab: ProfileTab) -> Result<(), GalleryError> {
        self.require_user()?;
        self.profile_tab = tab;
        self.view = View::Profile;
        Ok(())
    }

    /// Flip a wallpaper's favorite status; returns whether it is now a favorite
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        self.require_user()?;
        let now_favorite = self.update(|state| Ok(state.favorites.toggle(id)))?;
        debug!("Favorite {} -> {}", id, now_favorite);
        Ok(now_favorite)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.update(|state| {
            state.theme = state.theme.toggled();
            Ok(state.theme)
        })
    }

    /// Set the gallery category; blank input means all
    pub fn set_category(&mut self, category: &str) -> Result<()> {
        let category = match category.trim() {
            "" => ALL_CATEGORY.to_string(),
            trimmed => trimmed.to_string(),
        };
        self.update(|state| {
            state.gallery.category = category;
            Ok(())
        })
    }

    pub fn set_search(&mut self, search: &str) -> Result<()> {
        self.update(|state| {
            state.gallery.search = search.to_string();
            Ok(())
        })
    }

    pub fn set_sort(&mut self, sort: SortKey) -> Result<()> {
        self.update(|state| {
            state.gallery.sort = sort;
            Ok(())
        })
    }

    pub fn set_layout(&mut self, layout: Layout) -> Result<()> {
        self.update(|state| {
            state.gallery.layout = layout;
            Ok(())
        })
    }

    /// Apply profile edits for the signed-in user
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&UserProfile> {
        self.require_user()?;
        self.update(|state| {
            let user = state.user.as_mut().ok_or(GalleryError::NotAuthenticated)?;

            if let Some(name) = update.name {
                let name = name.trim();
                if name.is_empty() {
                    return Err(GalleryError::InvalidSignIn {
                        reason: "name must not be empty".to_string(),
                    }
                    .into());
                }
                user.name = name.to_string();
            }
            if let Some(bio) = update.bio {
                user.bio = optional_field(bio);
            }
            if let Some(location) = update.location {
                user.location = optional_field(location);
            }
            if let Some(website) = update.website {
                user.website = optional_field(website);
            }
            Ok(())
        })?;

        Ok(self.require_user()?)
    }

    /// Downloads are only offered to signed-in users
    pub fn authorize_download(&self) -> Result<(), GalleryError> {
        self.require_user().map(|_| ())
    }

    /// Items the gallery shows for the stored inputs
    pub fn gallery<'c>(&mut self, catalog: &'c Arc<Catalog>) -> DisplayList<'c> {
        let params = self.state.gallery.params();
        self.memo
            .resolve(&self.engine, catalog, &params)
            .materialize(catalog)
    }
}
