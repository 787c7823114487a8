//! Gallery error types with clear, actionable messages

use thiserror::Error;

/// Domain errors the presentation layer is expected to branch on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    /// An action that needs a signed-in user was attempted while signed out
    #[error("You need to sign in first.\n\nTo create a local profile, run:\n  wallgallery sign-in --name <NAME> --email <EMAIL>")]
    NotAuthenticated,

    /// The wallpaper id is not part of the current catalog
    #[error("Wallpaper '{id}' not found in catalog")]
    UnknownWallpaper { id: String },

    /// The pack id is not part of the current catalog
    #[error("Pack '{id}' not found in catalog")]
    UnknownPack { id: String },

    /// A detail-level action was attempted without a selected wallpaper
    #[error("No wallpaper is selected")]
    NothingSelected,

    /// Sign-in form values were rejected
    #[error("Invalid sign-in: {reason}")]
    InvalidSignIn { reason: String },

    /// The wallpaper has no downloadable assets
    #[error("Wallpaper '{id}' has no download options")]
    NoDownloadOptions { id: String },

    /// The requested resolution is not offered for this wallpaper
    #[error("Resolution '{requested}' is not available for '{id}' (available: {})", available.join(", "))]
    ResolutionUnavailable {
        id: String,
        requested: String,
        available: Vec<String>,
    },
}
