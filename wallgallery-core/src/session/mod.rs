//! User session: profile, preferences, favorites and navigation
//!
//! ```text
//!            sign_in                select_wallpaper        open_preview
//!   Auth ────────────► Gallery ──────────────────► Detail ─────────────► Preview
//!    ▲                  │  ▲ ◄─────── back ─────────┘ ▲ ◄────── back ───────┘
//!    │ sign_out         │  │
//!    └──────────────────┤  └── back ── Profile ◄── open_profile
//! ```
//!
//! [`AppState`] is persisted as JSON by [`SessionStore`]; the current view,
//! the selection and the preview device live only as long as the
//! [`Session`]. A change that fails to save leaves the state as it was.

mod controller;
mod state;
mod store;

pub use controller::Session;
pub use state::{
    AppState, GalleryState, Layout, MockupDevice, ProfileTab, ProfileUpdate, SignIn, Theme,
    UserProfile, View, LOCAL_PROVIDER,
};
pub use store::SessionStore;
