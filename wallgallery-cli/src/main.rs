//! Wallgallery - browse, search and download wallpapers from the terminal
//!
//! Main entry point: argument parsing, logging setup and dispatch

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use wallgallery_core::session::{Layout, MockupDevice};
use wallgallery_core::SortKey;

mod config_cli;
mod context;
mod gallery_cli;
mod session_cli;

use context::AppContext;

/// Trace modules for structured tracing
#[derive(Debug, Clone, ValueEnum)]
enum TraceModule {
    Catalog,
    Query,
    Session,
    All,
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "wallgallery",
    about = "Browse, search and download wallpapers",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Enable structured tracing (comma-separated: catalog,query,session,all)
    #[clap(long, value_delimiter = ',', global = true)]
    trace: Vec<TraceModule>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Override configuration file path
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Override session state file path
    #[clap(long, global = true)]
    state_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// List wallpapers (or exclusive packs) for a category and search
    Browse {
        /// Category id or name ("all", "exclusive", ...); defaults to the last used
        #[clap(long)]
        category: Option<String>,

        /// Search text; pass an empty string to clear the last search
        #[clap(long)]
        search: Option<String>,

        /// Sort order: trending, newest or popular
        #[clap(long, value_parser = SortKey::from_str)]
        sort: Option<SortKey>,

        /// Output layout: grid or list
        #[clap(long, value_parser = Layout::from_str)]
        layout: Option<Layout>,

        /// Output results as JSON
        #[clap(long)]
        json: bool,

        /// Force refresh of catalog endpoints (bypass cache)
        #[clap(long)]
        refresh: bool,
    },

    /// List categories with wallpaper counts
    Categories {
        /// Output as JSON
        #[clap(long)]
        json: bool,

        /// Force refresh of catalog endpoints (bypass cache)
        #[clap(long)]
        refresh: bool,
    },

    /// Show details for a wallpaper
    Show {
        /// Wallpaper id
        id: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,

        /// Force refresh of catalog endpoints (bypass cache)
        #[clap(long)]
        refresh: bool,
    },

    /// Preview a wallpaper inside a device frame
    Preview {
        /// Wallpaper id
        id: String,

        /// Device frame: mobile or desktop
        #[clap(long, default_value = "mobile", value_parser = MockupDevice::from_str)]
        device: MockupDevice,

        /// Output as JSON
        #[clap(long)]
        json: bool,

        /// Force refresh of catalog endpoints (bypass cache)
        #[clap(long)]
        refresh: bool,
    },

    /// List the wallpapers in a pack
    Pack {
        /// Pack id
        id: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,

        /// Force refresh of catalog endpoints (bypass cache)
        #[clap(long)]
        refresh: bool,
    },

    /// Add or remove a wallpaper from your favorites
    Favorite {
        /// Wallpaper id
        id: String,
    },

    /// List your favorite wallpapers
    Favorites {
        /// Output as JSON
        #[clap(long)]
        json: bool,

        /// Force refresh of catalog endpoints (bypass cache)
        #[clap(long)]
        refresh: bool,
    },

    /// Create a local profile
    SignIn {
        /// Display name
        #[clap(long)]
        name: String,

        /// Email address
        #[clap(long)]
        email: String,

        /// Avatar image URL
        #[clap(long)]
        avatar: Option<String>,
    },

    /// Forget the local profile and its favorites
    SignOut {
        /// Also delete the session file, resetting theme and gallery settings
        #[clap(long)]
        forget: bool,
    },

    /// Show or edit your profile
    Profile {
        #[clap(subcommand)]
        command: Option<session_cli::ProfileCommand>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Switch between light and dark theme
    Theme,

    /// Download a wallpaper
    Download {
        /// Wallpaper id
        id: String,

        /// Resolution label (defaults to the highest available)
        #[clap(long)]
        resolution: Option<String>,

        /// Output directory (defaults to the configured download directory)
        #[clap(long, short)]
        output: Option<PathBuf>,

        /// Force refresh of catalog endpoints (bypass cache)
        #[clap(long)]
        refresh: bool,
    },

    /// Manage cached endpoint responses
    Cache {
        #[clap(subcommand)]
        command: gallery_cli::CacheCommand,
    },

    /// Write or print the configuration file
    Config {
        #[clap(subcommand)]
        command: config_cli::ConfigCommand,
    },
}

fn initialize_tracing(log_level: &LogLevel, trace_modules: &[TraceModule]) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    for module in trace_modules {
        let directive = match module {
            TraceModule::Catalog => "wallgallery_core::catalog=trace",
            TraceModule::Query => "wallgallery_core::query=trace",
            TraceModule::Session => "wallgallery_core::session=trace",
            TraceModule::All => "wallgallery_core=trace",
        };

        if let Ok(parsed) = directive.parse() {
            filter = filter.add_directive(parsed);
        }
    }

    // Logs go to stderr so stdout stays clean for --json output
    if !trace_modules.is_empty() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!(trace_modules = ?trace_modules, "Wallgallery tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.trace);

    let ctx = AppContext::load(cli.config, cli.state_file)?;

    match cli.command {
        Command::Browse {
            category,
            search,
            sort,
            layout,
            json,
            refresh,
        } => {
            let request = gallery_cli::BrowseRequest {
                category,
                search,
                sort,
                layout,
            };
            gallery_cli::execute_browse(&ctx, request, json, refresh).await
        }
        Command::Categories { json, refresh } => {
            gallery_cli::execute_categories(&ctx, json, refresh).await
        }
        Command::Show { id, json, refresh } => {
            gallery_cli::execute_show(&ctx, &id, json, refresh).await
        }
        Command::Preview {
            id,
            device,
            json,
            refresh,
        } => gallery_cli::execute_preview(&ctx, &id, device, json, refresh).await,
        Command::Pack { id, json, refresh } => {
            gallery_cli::execute_pack(&ctx, &id, json, refresh).await
        }
        Command::Download {
            id,
            resolution,
            output,
            refresh,
        } => {
            gallery_cli::execute_download(&ctx, &id, resolution.as_deref(), output, refresh).await
        }
        Command::Cache { command } => command.execute(&ctx),
        Command::Config { command } => command.execute(&ctx),
        Command::Favorite { id } => session_cli::execute_favorite(&ctx, &id).await,
        Command::Favorites { json, refresh } => {
            session_cli::execute_favorites(&ctx, json, refresh).await
        }
        Command::SignIn {
            name,
            email,
            avatar,
        } => session_cli::execute_sign_in(&ctx, name, email, avatar),
        Command::SignOut { forget } => session_cli::execute_sign_out(&ctx, forget),
        Command::Profile { command, json } => session_cli::execute_profile(&ctx, command, json),
        Command::Theme => session_cli::execute_theme(&ctx),
    }
}
