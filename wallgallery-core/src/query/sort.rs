//! Gallery sort keys

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::catalog::Wallpaper;

/// How the wallpaper gallery is ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most downloaded first
    #[default]
    Trending,
    /// Most recently uploaded first; undated wallpapers last
    Newest,
    /// Most liked first
    Popular,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Trending, SortKey::Newest, SortKey::Popular];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Trending => "trending",
            SortKey::Newest => "newest",
            SortKey::Popular => "popular",
        }
    }

    /// Three-way comparison placing the preferred wallpaper first
    pub fn compare(self, a: &Wallpaper, b: &Wallpaper) -> Ordering {
        match self {
            SortKey::Trending => b.stats.downloads.cmp(&a.stats.downloads),
            SortKey::Newest => b.uploaded_at.cmp(&a.uploaded_at),
            SortKey::Popular => b.stats.likes.cmp(&a.stats.likes),
        }
    }

    /// Stable sort: wallpapers with equal keys keep their relative order
    pub fn sort(self, wallpapers: &mut [&Wallpaper]) {
        wallpapers.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("Unknown sort key '{s}'. Expected one of: trending, newest, popular")
            })
    }
}
