//! Catalog record types
//!
//! Raw records mirror the static JSON endpoints, where every field may be
//! missing or carry the wrong type. Normalized records are built once at ingestion and are fully
//! populated, so nothing downstream has to guess at defaults.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Category assigned to wallpapers that arrive without one
pub const UNCATEGORIZED: &str = "uncategorized";

/// Title shown for wallpapers with an empty title
pub const UNTITLED: &str = "Untitled";

/// Author shown for wallpapers without author information
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

// Field decoders. A field with the wrong JSON shape decodes to `None` and
// takes its normal default later; only a missing id rejects a record.

fn decode_with<'de, D, T>(
    deserializer: D,
    convert: fn(Value) -> Option<T>,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(convert(Value::deserialize(deserializer)?))
}

/// Strings and numbers (`42`, `42.0`) are both accepted as ids
fn id_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

fn text_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Counts may arrive as integers, floats or numeric strings
fn count_value(value: Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// A list of tags, or a single comma-separated string
fn tags_value(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.into_iter().filter_map(text_value).collect()),
        Value::String(s) => Some(s.split(',').map(str::to_string).collect()),
        _ => None,
    }
}

/// An author object, or just the author's name
fn author_value(value: Value) -> Option<RawAuthor> {
    match value {
        Value::String(name) => Some(RawAuthor {
            name: Some(name),
            title: None,
        }),
        object @ Value::Object(_) => RawAuthor::deserialize(object).ok(),
        _ => None,
    }
}

fn stats_value(value: Value) -> Option<RawStats> {
    match value {
        object @ Value::Object(_) => RawStats::deserialize(object).ok(),
        _ => None,
    }
}

fn download_options_value(value: Value) -> Option<Vec<RawDownloadOption>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    object @ Value::Object(_) => RawDownloadOption::deserialize(object).ok(),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

fn id_list_value(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.into_iter().filter_map(id_value).collect()),
        _ => None,
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    decode_with(d, id_value)
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    decode_with(d, text_value)
}

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    decode_with(d, count_value)
}

fn lenient_tags<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    decode_with(d, tags_value)
}

fn lenient_author<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RawAuthor>, D::Error> {
    decode_with(d, author_value)
}

fn lenient_stats<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RawStats>, D::Error> {
    decode_with(d, stats_value)
}

fn lenient_download_options<'de, D>(d: D) -> Result<Option<Vec<RawDownloadOption>>, D::Error>
where
    D: Deserializer<'de>,
{
    decode_with(d, download_options_value)
}

fn lenient_id_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    decode_with(d, id_list_value)
}

/// A wallpaper as served by the wallpapers endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawWallpaper {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_author")]
    pub author: Option<RawAuthor>,
    #[serde(deserialize_with = "lenient_stats")]
    pub stats: Option<RawStats>,
    #[serde(deserialize_with = "lenient_text")]
    pub upload_date: Option<String>,
    #[serde(deserialize_with = "lenient_download_options")]
    pub download_options: Option<Vec<RawDownloadOption>>,
    #[serde(deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAuthor {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStats {
    #[serde(deserialize_with = "lenient_count")]
    pub downloads: Option<i64>,
    #[serde(deserialize_with = "lenient_count")]
    pub likes: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDownloadOption {
    #[serde(deserialize_with = "lenient_text")]
    pub resolution: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub path: Option<String>,
}

/// A category as served by the categories endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCategory {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

/// A pack as served by the packs endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPack {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub cover_image: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_id_list")]
    pub wallpaper_ids: Option<Vec<String>>,
}

/// Wallpaper author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    pub title: Option<String>,
}

/// Popularity counters, zero when the endpoint omits them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub downloads: u64,
    pub likes: u64,
}

/// One downloadable rendition of a wallpaper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOption {
    pub resolution: String,
    pub path: String,
}

/// A normalized wallpaper record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wallpaper {
    pub id: String,
    pub title: String,
    /// Normalized category id (trimmed, ASCII lower-case)
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<Author>,
    pub stats: Stats,
    /// Upload date exactly as the endpoint sent it
    pub upload_date: Option<String>,
    /// Parsed upload date; `DateTime::<Utc>::MIN_UTC` when missing or unparseable
    #[serde(skip)]
    pub uploaded_at: DateTime<Utc>,
    /// Ascending by quality; the last entry is the highest resolution
    pub download_options: Vec<DownloadOption>,
    pub thumbnail: Option<String>,
}

/// A normalized category record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A normalized pack record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pack {
    pub id: String,
    pub title: String,
    pub cover_image: Option<String>,
    pub category: String,
    pub wallpaper_ids: Vec<String>,
}

/// Normalize a category id for storage and comparison
pub fn normalize_category_id(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Parse an upload date in any of the formats the endpoints use
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` (UTC assumed) and plain
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_upload_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clamp_count(value: Option<i64>) -> u64 {
    value.unwrap_or(0).max(0) as u64
}

impl Wallpaper {
    /// Build a normalized wallpaper, or `None` when the record has no id
    pub fn from_raw(raw: RawWallpaper) -> Option<Self> {
        let id = non_empty(raw.id)?;

        let category = non_empty(raw.category)
            .map(|c| normalize_category_id(&c))
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        let tags = raw
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let author = raw.author.and_then(|a| {
            non_empty(a.name).map(|name| Author {
                name,
                title: non_empty(a.title),
            })
        });

        let stats = raw
            .stats
            .map(|s| Stats {
                downloads: clamp_count(s.downloads),
                likes: clamp_count(s.likes),
            })
            .unwrap_or_default();

        let upload_date = non_empty(raw.upload_date);
        let uploaded_at = upload_date
            .as_deref()
            .and_then(parse_upload_date)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let download_options = raw
            .download_options
            .unwrap_or_default()
            .into_iter()
            .filter_map(|opt| {
                non_empty(opt.path).map(|path| DownloadOption {
                    resolution: non_empty(opt.resolution).unwrap_or_else(|| "N/A".to_string()),
                    path,
                })
            })
            .collect();

        Some(Self {
            id,
            title: raw.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            category,
            tags,
            author,
            stats,
            upload_date,
            uploaded_at,
            download_options,
            thumbnail: non_empty(raw.thumbnail),
        })
    }

    /// Image for cards and lists: the thumbnail, else the first rendition
    pub fn display_image(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .or_else(|| self.download_options.first().map(|o| o.path.as_str()))
    }

    /// Image for device mockups: the highest-quality rendition
    pub fn preview_image(&self) -> Option<&str> {
        self.download_options.last().map(|o| o.path.as_str())
    }

    /// Resolution label of the rendition used for cards
    pub fn display_resolution(&self) -> &str {
        self.download_options
            .first()
            .map(|o| o.resolution.as_str())
            .unwrap_or("N/A")
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    /// Whether the wallpaper has a parsed upload date
    pub fn has_upload_date(&self) -> bool {
        self.uploaded_at != DateTime::<Utc>::MIN_UTC
    }
}

impl Category {
    pub fn from_raw(raw: RawCategory) -> Option<Self> {
        let id = normalize_category_id(&non_empty(raw.id)?);
        let name = non_empty(raw.name).unwrap_or_else(|| id.clone());
        Some(Self { id, name })
    }
}

impl Pack {
    pub fn from_raw(raw: RawPack) -> Option<Self> {
        let id = non_empty(raw.id)?;
        Some(Self {
            id,
            title: raw.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            cover_image: non_empty(raw.cover_image),
            category: non_empty(raw.category)
                .map(|c| normalize_category_id(&c))
                .unwrap_or_default(),
            wallpaper_ids: raw
                .wallpaper_ids
                .unwrap_or_default()
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        })
    }

    pub fn wallpaper_count(&self) -> usize {
        self.wallpaper_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wallpaper(json: &str) -> Option<Wallpaper> {
        let raw: RawWallpaper = serde_json::from_str(json).unwrap();
        Wallpaper::from_raw(raw)
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let w = wallpaper(r#"{"id": 42, "title": "Dunes"}"#).unwrap();
        assert_eq!(w.id, "42");
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(wallpaper(r#"{"title": "No id"}"#).is_none());
        assert!(wallpaper(r#"{"id": "  ", "title": "Blank id"}"#).is_none());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let w = wallpaper(r#"{"id": "w1"}"#).unwrap();
        assert_eq!(w.title, "");
        assert_eq!(w.display_title(), UNTITLED);
        assert_eq!(w.category, UNCATEGORIZED);
        assert_eq!(w.stats, Stats::default());
        assert_eq!(w.author_name(), UNKNOWN_ARTIST);
        assert_eq!(w.uploaded_at, DateTime::<Utc>::MIN_UTC);
        assert!(!w.has_upload_date());
        assert!(w.display_image().is_none());
        assert!(w.preview_image().is_none());
        assert_eq!(w.display_resolution(), "N/A");
    }

    #[test]
    fn test_category_is_normalized() {
        let w = wallpaper(r#"{"id": "w1", "category": " Nature "}"#).unwrap();
        assert_eq!(w.category, "nature");
    }

    #[test]
    fn test_partial_stats_default_to_zero() {
        let w = wallpaper(r#"{"id": "w1", "stats": {"likes": 7}}"#).unwrap();
        assert_eq!(w.stats.downloads, 0);
        assert_eq!(w.stats.likes, 7);

        let w = wallpaper(r#"{"id": "w2", "stats": {"downloads": -3}}"#).unwrap();
        assert_eq!(w.stats.downloads, 0);
    }

    #[test]
    fn test_mistyped_fields_fall_back_to_defaults() {
        let w = wallpaper(
            r#"{
                "id": 7.0,
                "title": ["not", "a", "title"],
                "stats": "not an object",
                "tags": {"tag": "desert"},
                "author": 12,
                "download_options": "4K",
                "upload_date": false
            }"#,
        )
        .unwrap();
        assert_eq!(w.id, "7");
        assert_eq!(w.display_title(), UNTITLED);
        assert_eq!(w.stats, Stats::default());
        assert!(w.tags.is_empty());
        assert_eq!(w.author_name(), UNKNOWN_ARTIST);
        assert!(w.download_options.is_empty());
        assert!(!w.has_upload_date());
    }

    #[test]
    fn test_counts_accept_floats_and_numeric_strings() {
        let w = wallpaper(r#"{"id": "w1", "stats": {"downloads": 1200.0, "likes": " 5 "}}"#)
            .unwrap();
        assert_eq!(w.stats.downloads, 1200);
        assert_eq!(w.stats.likes, 5);

        let w = wallpaper(r#"{"id": "w2", "stats": {"downloads": "12.9", "likes": "many"}}"#)
            .unwrap();
        assert_eq!(w.stats.downloads, 12);
        assert_eq!(w.stats.likes, 0);
    }

    #[test]
    fn test_tags_accept_a_single_string() {
        let w = wallpaper(r#"{"id": "w1", "tags": "desert, sand"}"#).unwrap();
        assert_eq!(w.tags, vec!["desert", "sand"]);

        let w = wallpaper(r#"{"id": "w2", "tags": ["dunes", 3, null]}"#).unwrap();
        assert_eq!(w.tags, vec!["dunes", "3"]);
    }

    #[test]
    fn test_author_given_as_plain_name() {
        let w = wallpaper(r#"{"id": "w1", "author": "Mira Holt"}"#).unwrap();
        assert_eq!(w.author_name(), "Mira Holt");
        assert!(w.author.as_ref().unwrap().title.is_none());
    }

    #[test]
    fn test_malformed_download_option_entries_are_skipped() {
        let w = wallpaper(
            r#"{"id": "w1", "download_options": ["4K", {"resolution": "1080p", "path": "/a.jpg"}]}"#,
        )
        .unwrap();
        assert_eq!(w.download_options.len(), 1);
        assert_eq!(w.download_options[0].resolution, "1080p");
    }

    #[test]
    fn test_author_without_name_is_dropped() {
        let w = wallpaper(r#"{"id": "w1", "author": {"title": "Photographer"}}"#).unwrap();
        assert!(w.author.is_none());

        let w = wallpaper(r#"{"id": "w2", "author": {"name": "Ana", "title": "Photographer"}}"#)
            .unwrap();
        assert_eq!(w.author_name(), "Ana");
    }

    #[test]
    fn test_image_selection() {
        let w = wallpaper(
            r#"{
                "id": "w1",
                "download_options": [
                    {"resolution": "1080p", "path": "/img/w1-1080.jpg"},
                    {"resolution": "4K", "path": "/img/w1-4k.jpg"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(w.display_image(), Some("/img/w1-1080.jpg"));
        assert_eq!(w.preview_image(), Some("/img/w1-4k.jpg"));
        assert_eq!(w.display_resolution(), "1080p");

        let w = wallpaper(
            r#"{
                "id": "w2",
                "thumbnail": "/thumbs/w2.jpg",
                "download_options": [{"resolution": "1080p", "path": "/img/w2.jpg"}]
            }"#,
        )
        .unwrap();
        assert_eq!(w.display_image(), Some("/thumbs/w2.jpg"));
    }

    #[test]
    fn test_download_options_without_path_are_dropped() {
        let w = wallpaper(
            r#"{"id": "w1", "download_options": [{"resolution": "4K"}, {"path": "/a.jpg"}]}"#,
        )
        .unwrap();
        assert_eq!(w.download_options.len(), 1);
        assert_eq!(w.download_options[0].resolution, "N/A");
    }

    #[test]
    fn test_parse_upload_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_upload_date("2024-03-01"), Some(expected));
        assert_eq!(parse_upload_date("2024-03-01T00:00:00"), Some(expected));
        assert_eq!(parse_upload_date("2024-03-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_upload_date("2024-03-01T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_upload_date("last tuesday"), None);
        assert_eq!(parse_upload_date(""), None);
    }

    #[test]
    fn test_pack_normalization() {
        let raw: RawPack = serde_json::from_str(
            r#"{"id": "p1", "title": "Neon", "category": "Exclusive", "wallpaper_ids": [1, "2", " ", {}]}"#,
        )
        .unwrap();
        let pack = Pack::from_raw(raw).unwrap();
        assert_eq!(pack.category, "exclusive");
        assert_eq!(pack.wallpaper_ids, vec!["1", "2"]);
        assert_eq!(pack.wallpaper_count(), 2);
    }

    #[test]
    fn test_category_name_falls_back_to_id() {
        let raw: RawCategory = serde_json::from_str(r#"{"id": "Space"}"#).unwrap();
        let category = Category::from_raw(raw).unwrap();
        assert_eq!(category.id, "space");
        assert_eq!(category.name, "space");
    }
}
