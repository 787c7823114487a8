//! Configuration file commands

use anyhow::Result;
use clap::Subcommand;

use wallgallery_core::GalleryConfig;

use crate::context::AppContext;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a configuration file with the default settings
    Init {
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },

    /// Print the effective configuration as YAML
    Show,
}

impl ConfigCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        match self {
            ConfigCommand::Init { force } => {
                let path = &ctx.config_file;
                if path.exists() && !force {
                    anyhow::bail!(
                        "Config already exists at {}\n\nUse --force to overwrite it.",
                        path.display()
                    );
                }

                GalleryConfig::default().save_to_path(path)?;
                println!("Wrote default configuration to {}", path.display());
                println!("Edit the endpoints section to point at your wallpaper catalog.");
                Ok(())
            }
            ConfigCommand::Show => {
                println!("# {}", ctx.config_file.display());
                print!("{}", ctx.config.to_yaml()?);
                Ok(())
            }
        }
    }
}
