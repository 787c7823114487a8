//! Session CLI commands: profile, favorites and theme

use anyhow::Result;
use clap::Subcommand;

use wallgallery_core::session::{ProfileTab, ProfileUpdate, SignIn, Theme, UserProfile};
use wallgallery_core::GalleryError;

use crate::context::AppContext;
use crate::gallery_cli::{print_wallpapers, wallpaper_json};

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Update profile fields; pass an empty string to clear one
    Edit {
        #[clap(long)]
        name: Option<String>,

        #[clap(long)]
        bio: Option<String>,

        #[clap(long)]
        location: Option<String>,

        #[clap(long)]
        website: Option<String>,
    },
}

fn print_profile(user: &UserProfile) {
    println!();
    println!("Name:     {}", user.name);
    println!("Email:    {}", user.email);
    if let Some(bio) = &user.bio {
        println!("Bio:      {bio}");
    }
    if let Some(location) = &user.location {
        println!("Location: {location}");
    }
    if let Some(website) = &user.website {
        println!("Website:  {website}");
    }
    if let Some(avatar) = &user.avatar {
        println!("Avatar:   {avatar}");
    }
    println!("Member since {}", user.created_at.format("%Y-%m-%d"));
}

pub fn execute_sign_in(
    ctx: &AppContext,
    name: String,
    email: String,
    avatar: Option<String>,
) -> Result<()> {
    let mut session = ctx.open_session();
    if let Some(current) = session.user() {
        println!("Replacing profile for {}", current.name);
    }

    let user = session.sign_in(SignIn {
        name,
        email,
        avatar,
    })?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub fn execute_sign_out(ctx: &AppContext, forget: bool) -> Result<()> {
    let mut session = ctx.open_session();
    if forget {
        session.forget()?;
        println!("Signed out and removed {}", ctx.state_file.display());
        return Ok(());
    }
    if !session.is_signed_in() {
        println!("Not signed in.");
        return Ok(());
    }

    session.sign_out()?;
    println!("Signed out. Your favorites were cleared.");
    Ok(())
}

pub fn execute_profile(
    ctx: &AppContext,
    command: Option<ProfileCommand>,
    json_output: bool,
) -> Result<()> {
    let mut session = ctx.open_session();

    let user = match command {
        Some(ProfileCommand::Edit {
            name,
            bio,
            location,
            website,
        }) => {
            let update = ProfileUpdate {
                name,
                bio,
                location,
                website,
            };
            if update.is_empty() {
                anyhow::bail!(
                    "Nothing to update. Pass at least one of --name, --bio, --location, --website"
                );
            }
            session.update_profile(update)?.clone()
        }
        None => {
            session.open_profile(ProfileTab::Profile)?;
            session.user().cloned().ok_or(GalleryError::NotAuthenticated)?
        }
    };

    if json_output {
        let output = serde_json::json!({
            "user": user,
            "theme": session.theme(),
            "favorites": session.favorites().len(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_profile(&user);
        println!("Favorites: {}", session.favorites().len());
        println!("Theme:     {}", session.theme());
    }

    Ok(())
}

pub async fn execute_favorite(ctx: &AppContext, id: &str) -> Result<()> {
    let mut session = ctx.open_session();
    if !session.is_signed_in() {
        return Err(GalleryError::NotAuthenticated.into());
    }

    let catalog = ctx.load_catalog(false).await?;
    let wallpaper = catalog
        .wallpaper(id)
        .ok_or_else(|| GalleryError::UnknownWallpaper { id: id.to_string() })?;

    if session.toggle_favorite(&wallpaper.id)? {
        println!("Added '{}' to favorites", wallpaper.display_title());
    } else {
        println!("Removed '{}' from favorites", wallpaper.display_title());
    }
    Ok(())
}

pub async fn execute_favorites(
    ctx: &AppContext,
    json_output: bool,
    force_refresh: bool,
) -> Result<()> {
    let mut session = ctx.open_session();
    session.open_profile(ProfileTab::Favorites)?;

    let catalog = ctx.load_catalog(force_refresh).await?;
    let wallpapers = session.favorites().resolve(&catalog);

    if json_output {
        let items: Vec<serde_json::Value> = wallpapers
            .iter()
            .map(|w| wallpaper_json(w, true))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if wallpapers.is_empty() {
        println!("\nNo favorites yet. Use 'wallgallery favorite <ID>' to add one.");
        return Ok(());
    }

    println!("\n{} favorite(s):\n", wallpapers.len());
    print_wallpapers(&wallpapers, &session, session.state().gallery.layout);
    Ok(())
}

pub fn execute_theme(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.open_session();
    let theme = session.toggle_theme()?;
    let label = match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
    };
    println!("{label} theme enabled");
    Ok(())
}
