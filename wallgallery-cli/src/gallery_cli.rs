//! Gallery CLI commands
//!
//! Browsing, wallpaper and pack details, device previews, downloads and the
//! response cache.

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use wallgallery_core::assets::{select_download, AssetDownloader};
use wallgallery_core::catalog::{Pack, Wallpaper, ALL_CATEGORY};
use wallgallery_core::session::{Layout, MockupDevice, Session};
use wallgallery_core::{DisplayList, GalleryError, SortKey};

use crate::context::AppContext;

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Remove all cached endpoint responses
    Clear,
}

impl CacheCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        match self {
            CacheCommand::Clear => {
                let source = ctx.catalog_source()?;
                let removed = source.clear_cache()?;
                println!(
                    "Removed {} cached response(s) from {}",
                    removed,
                    source.cache().dir().display()
                );
                Ok(())
            }
        }
    }
}

/// Gallery inputs given on the command line; `None` keeps the saved value
#[derive(Debug, Default)]
pub struct BrowseRequest {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub layout: Option<Layout>,
}

/// Shorten text to `max` characters for table cells
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

/// Table row for wallpaper listings
#[derive(Tabled)]
pub(crate) struct WallpaperRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Artist")]
    artist: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Downloads")]
    downloads: u64,
    #[tabled(rename = "Likes")]
    likes: u64,
    #[tabled(rename = "Resolution")]
    resolution: String,
    #[tabled(rename = "Fav")]
    favorite: String,
}

impl WallpaperRow {
    pub(crate) fn new(wallpaper: &Wallpaper, favorite: bool) -> Self {
        Self {
            id: wallpaper.id.clone(),
            title: truncate(wallpaper.display_title(), 32),
            artist: truncate(wallpaper.author_name(), 24),
            category: wallpaper.category.clone(),
            downloads: wallpaper.stats.downloads,
            likes: wallpaper.stats.likes,
            resolution: wallpaper.display_resolution().to_string(),
            favorite: if favorite { "*".to_string() } else { String::new() },
        }
    }
}

/// Table row for pack listings
#[derive(Tabled)]
struct PackRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Wallpapers")]
    wallpapers: usize,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Wallpapers")]
    count: usize,
}

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub(crate) fn wallpaper_json(wallpaper: &Wallpaper, favorite: bool) -> serde_json::Value {
    serde_json::json!({
        "id": wallpaper.id,
        "title": wallpaper.display_title(),
        "category": wallpaper.category,
        "author": wallpaper.author_name(),
        "tags": wallpaper.tags,
        "downloads": wallpaper.stats.downloads,
        "likes": wallpaper.stats.likes,
        "upload_date": wallpaper.upload_date,
        "image": wallpaper.display_image(),
        "resolution": wallpaper.display_resolution(),
        "favorite": favorite,
    })
}

fn pack_json(pack: &Pack) -> serde_json::Value {
    serde_json::json!({
        "id": pack.id,
        "title": pack.title,
        "cover_image": pack.cover_image,
        "wallpaper_count": pack.wallpaper_count(),
    })
}

/// Print wallpapers in the requested layout
pub(crate) fn print_wallpapers(wallpapers: &[&Wallpaper], session: &Session, layout: Layout) {
    match layout {
        Layout::Grid => {
            let rows: Vec<WallpaperRow> = wallpapers
                .iter()
                .map(|w| WallpaperRow::new(w, session.is_favorite(&w.id)))
                .collect();
            println!("{}", render_table(&rows));
        }
        Layout::List => {
            for w in wallpapers {
                let marker = if session.is_favorite(&w.id) { "*" } else { " " };
                println!(
                    "{} {}  {} by {} ({} downloads)",
                    marker,
                    w.id,
                    w.display_title(),
                    w.author_name(),
                    w.stats.downloads
                );
            }
        }
    }
}

pub async fn execute_browse(
    ctx: &AppContext,
    request: BrowseRequest,
    json_output: bool,
    force_refresh: bool,
) -> Result<()> {
    let catalog = ctx.load_catalog(force_refresh).await?;
    let mut session = ctx.open_session();

    if let Some(category) = request.category {
        session.set_category(&catalog.resolve_category(&category))?;
    }
    if let Some(search) = request.search {
        session.set_search(&search)?;
    }
    if let Some(sort) = request.sort {
        session.set_sort(sort)?;
    }
    if let Some(layout) = request.layout {
        session.set_layout(layout)?;
    }

    let gallery = session.state().gallery.clone();
    let list = session.gallery(&catalog);

    if json_output {
        let items: Vec<serde_json::Value> = match &list {
            DisplayList::Wallpapers(wallpapers) => wallpapers
                .iter()
                .map(|w| wallpaper_json(w, session.is_favorite(&w.id)))
                .collect(),
            DisplayList::Packs(packs) => packs.iter().map(|p| pack_json(p)).collect(),
        };

        let output = serde_json::json!({
            "category": gallery.category,
            "search": gallery.search,
            "sort": gallery.sort,
            "layout": gallery.layout,
            "kind": if list.is_pack_view() { "pack" } else { "wallpaper" },
            "items": items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let category_label = if gallery.category == ALL_CATEGORY {
        "All".to_string()
    } else {
        catalog
            .category(&gallery.category)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| gallery.category.clone())
    };
    let search = gallery.search.trim();

    println!();
    if search.is_empty() {
        println!("{} | sorted by {}", category_label, gallery.sort);
    } else {
        println!(
            "{} | sorted by {} | search \"{}\"",
            category_label, gallery.sort, search
        );
    }

    match &list {
        DisplayList::Wallpapers(wallpapers) if wallpapers.is_empty() => {
            println!("\nNo wallpapers found.");
        }
        DisplayList::Packs(packs) if packs.is_empty() => {
            println!("\nNo exclusive packs found.");
        }
        DisplayList::Wallpapers(wallpapers) => {
            println!("\nFound {} wallpaper(s):\n", wallpapers.len());
            print_wallpapers(wallpapers, &session, gallery.layout);
        }
        DisplayList::Packs(packs) => {
            println!("\nFound {} exclusive pack(s):\n", packs.len());
            let rows: Vec<PackRow> = packs
                .iter()
                .map(|p| PackRow {
                    id: p.id.clone(),
                    title: truncate(&p.title, 40),
                    wallpapers: p.wallpaper_count(),
                })
                .collect();
            println!("{}", render_table(&rows));
            println!("\nUse 'wallgallery pack <ID>' to see the wallpapers in a pack.");
        }
    }

    Ok(())
}

pub async fn execute_categories(
    ctx: &AppContext,
    json_output: bool,
    force_refresh: bool,
) -> Result<()> {
    let catalog = ctx.load_catalog(force_refresh).await?;
    let counts = catalog.category_counts();

    if json_output {
        let items: Vec<serde_json::Value> = counts
            .iter()
            .map(|(c, n)| serde_json::json!({"id": c.id, "name": c.name, "count": n}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let mut rows = vec![CategoryRow {
        id: ALL_CATEGORY.to_string(),
        name: "All".to_string(),
        count: catalog.wallpapers().len(),
    }];
    rows.extend(counts.into_iter().map(|(c, count)| CategoryRow {
        id: c.id.clone(),
        name: c.name.clone(),
        count,
    }));

    println!("{}", render_table(&rows));
    Ok(())
}

pub async fn execute_show(
    ctx: &AppContext,
    id: &str,
    json_output: bool,
    force_refresh: bool,
) -> Result<()> {
    let catalog = ctx.load_catalog(force_refresh).await?;
    let mut session = ctx.open_session();
    let wallpaper = session.select_wallpaper(&catalog, id)?;
    let favorite = session.is_favorite(&wallpaper.id);

    if json_output {
        let mut output = wallpaper_json(wallpaper, favorite);
        output["preview_image"] = serde_json::json!(wallpaper.preview_image());
        output["download_options"] = serde_json::json!(wallpaper.download_options);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("Wallpaper: {}", wallpaper.display_title());
    match wallpaper.author.as_ref().and_then(|a| a.title.as_deref()) {
        Some(role) => println!("Artist:    {} ({})", wallpaper.author_name(), role),
        None => println!("Artist:    {}", wallpaper.author_name()),
    }
    println!("Category:  {}", wallpaper.category);
    println!("Downloads: {}", wallpaper.stats.downloads);
    println!("Likes:     {}", wallpaper.stats.likes);
    if let Some(date) = &wallpaper.upload_date {
        println!("Uploaded:  {date}");
    }
    if !wallpaper.tags.is_empty() {
        println!("Tags:      {}", wallpaper.tags.join(", "));
    }
    if favorite {
        println!("In your favorites");
    }

    if let Some(preview) = wallpaper.preview_image() {
        println!();
        println!("Preview:   {preview}");
    }

    println!();
    if wallpaper.download_options.is_empty() {
        println!("No downloads available.");
    } else {
        println!("Downloads:");
        for option in &wallpaper.download_options {
            println!("  {:<10} {}", option.resolution, option.path);
        }
        println!();
        println!("  wallgallery download {}", wallpaper.id);
    }

    Ok(())
}

/// Draw a device outline with `label` centered on the screen
pub(crate) fn render_mockup(device: MockupDevice, label: &str) -> Vec<String> {
    let width: usize = match device {
        MockupDevice::Mobile => 22,
        MockupDevice::Desktop => 50,
    };
    // Terminal cells are roughly twice as tall as they are wide
    let (frame_w, frame_h) = device.frame_size();
    let height = (width as u32 * frame_h / frame_w / 2) as usize;
    let inner = width - 2;
    let label = truncate(label, inner - 2);

    let mut lines = Vec::with_capacity(height + 1);
    lines.push(format!("╭{}╮", "─".repeat(inner)));
    for row in 1..height - 1 {
        let content = if row == height / 2 { label.as_str() } else { "" };
        lines.push(format!("│{content:^inner$}│"));
    }
    lines.push(format!("╰{}╯", "─".repeat(inner)));

    if device == MockupDevice::Desktop {
        lines.push(format!("{:^width$}", "/‾‾‾‾‾‾‾‾‾‾\\"));
    }
    lines
}

pub async fn execute_preview(
    ctx: &AppContext,
    id: &str,
    device: MockupDevice,
    json_output: bool,
    force_refresh: bool,
) -> Result<()> {
    let catalog = ctx.load_catalog(force_refresh).await?;
    let mut session = ctx.open_session();
    let wallpaper = session.select_wallpaper(&catalog, id)?;
    let image = wallpaper
        .preview_image()
        .ok_or_else(|| GalleryError::NoDownloadOptions {
            id: wallpaper.id.clone(),
        })?;
    session.open_preview(device)?;

    let (frame_width, frame_height) = device.frame_size();
    if json_output {
        let output = serde_json::json!({
            "id": wallpaper.id,
            "title": wallpaper.display_title(),
            "device": session.preview_device(),
            "image": image,
            "frame": {
                "width": frame_width,
                "height": frame_height,
                "inset_percent": device.inset_percent(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    for line in render_mockup(device, wallpaper.display_title()) {
        println!("{line}");
    }
    println!();
    println!(
        "{} on {} ({}x{} frame, {}% inset)",
        wallpaper.display_title(),
        device,
        frame_width,
        frame_height,
        device.inset_percent()
    );
    println!("Image: {image}");

    Ok(())
}

pub async fn execute_pack(
    ctx: &AppContext,
    id: &str,
    json_output: bool,
    force_refresh: bool,
) -> Result<()> {
    let catalog = ctx.load_catalog(force_refresh).await?;
    let session = ctx.open_session();

    let pack = catalog
        .pack(id)
        .ok_or_else(|| GalleryError::UnknownPack { id: id.to_string() })?;
    let wallpapers = catalog.pack_wallpapers(pack);

    if json_output {
        let mut output = pack_json(pack);
        output["wallpapers"] = wallpapers
            .iter()
            .map(|w| wallpaper_json(w, session.is_favorite(&w.id)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("Pack: {}", pack.title);
    if wallpapers.len() < pack.wallpaper_count() {
        println!(
            "{} of {} wallpaper(s) available",
            wallpapers.len(),
            pack.wallpaper_count()
        );
    }
    println!();

    if wallpapers.is_empty() {
        println!("No wallpapers found.");
    } else {
        print_wallpapers(&wallpapers, &session, session.state().gallery.layout);
    }

    Ok(())
}

pub async fn execute_download(
    ctx: &AppContext,
    id: &str,
    resolution: Option<&str>,
    output: Option<PathBuf>,
    force_refresh: bool,
) -> Result<()> {
    let session = ctx.open_session();
    session.authorize_download()?;

    let catalog = ctx.load_catalog(force_refresh).await?;
    let wallpaper = catalog
        .wallpaper(id)
        .ok_or_else(|| GalleryError::UnknownWallpaper { id: id.to_string() })?;
    let option = select_download(wallpaper, resolution)?;

    let dest_dir = output.unwrap_or_else(|| ctx.config.resolved_download_dir());
    println!(
        "Downloading {} ({})...",
        wallpaper.display_title(),
        option.resolution
    );

    let path = AssetDownloader::new()?
        .download(wallpaper, option, &dest_dir)
        .await?;
    println!("Saved to {}", path.display());

    Ok(())
}
