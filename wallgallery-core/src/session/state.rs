//! Persisted and transient session state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::ALL_CATEGORY;
use crate::error::GalleryError;
use crate::favorites::Favorites;
use crate::query::{QueryParams, SortKey};

/// Provider recorded for profiles created on this machine
pub const LOCAL_PROVIDER: &str = "local";

/// Signed-in user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    pub provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Sign-in form values
#[derive(Debug, Clone, Default)]
pub struct SignIn {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl SignIn {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            avatar: None,
        }
    }

    /// Check the form and return the trimmed name and email
    pub(crate) fn validate(&self) -> Result<(String, String), GalleryError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(GalleryError::InvalidSignIn {
                reason: "name must not be empty".to_string(),
            });
        }

        let email = self.email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !well_formed {
            return Err(GalleryError::InvalidSignIn {
                reason: format!("'{email}' is not a valid email address"),
            });
        }

        Ok((name.to_string(), email.to_string()))
    }
}

/// Profile edits; `None` leaves a field unchanged, an empty string clears it
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.location.is_none() && self.website.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    List,
}

impl Layout {
    pub const ALL: [Layout; 2] = [Layout::Grid, Layout::List];

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Grid => "grid",
            Layout::List => "list",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown layout '{s}'. Expected one of: grid, list"))
    }
}

/// Device frame a wallpaper is previewed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockupDevice {
    #[default]
    Mobile,
    Desktop,
}

impl MockupDevice {
    pub const ALL: [MockupDevice; 2] = [MockupDevice::Mobile, MockupDevice::Desktop];

    pub fn as_str(self) -> &'static str {
        match self {
            MockupDevice::Mobile => "mobile",
            MockupDevice::Desktop => "desktop",
        }
    }

    /// Frame outline size in points, width by height
    pub fn frame_size(self) -> (u32, u32) {
        match self {
            MockupDevice::Mobile => (414, 820),
            MockupDevice::Desktop => (1024, 640),
        }
    }

    /// Padding between the frame edge and the wallpaper, as a percentage
    pub fn inset_percent(self) -> f64 {
        match self {
            MockupDevice::Mobile => 3.0,
            MockupDevice::Desktop => 1.2,
        }
    }
}

impl fmt::Display for MockupDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MockupDevice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MockupDevice::ALL
            .into_iter()
            .find(|device| device.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown device '{s}'. Expected one of: mobile, desktop"))
    }
}

/// Gallery inputs remembered between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryState {
    pub category: String,
    pub search: String,
    pub sort: SortKey,
    pub layout: Layout,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORY.to_string(),
            search: String::new(),
            sort: SortKey::default(),
            layout: Layout::default(),
        }
    }
}

impl GalleryState {
    pub fn params(&self) -> QueryParams {
        QueryParams::new(self.category.clone(), self.search.clone(), self.sort)
    }
}

/// Everything that survives a restart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub user: Option<UserProfile>,
    pub theme: Theme,
    pub favorites: Favorites,
    pub gallery: GalleryState,
}

/// The five screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Auth,
    Gallery,
    Detail,
    Preview,
    Profile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileTab {
    #[default]
    Profile,
    Favorites,
    Settings,
}
