use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nupak::commands;

#[derive(Parser)]
#[clap(name = "nupak")]
#[clap(about = "Repository-style installer for zip-based package archives")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a package from a downloaded archive
    Install {
        /// Path to the package archive
        archive: PathBuf,
        /// Install root (defaults to the configured root)
        #[clap(long)]
        root: Option<PathBuf>,
    },
    /// Uninstall an installed package
    Uninstall {
        /// Package name
        name: String,
        /// Package version (e.g., 2.1.0)
        version: String,
        /// Install root (defaults to the configured root)
        #[clap(long)]
        root: Option<PathBuf>,
        /// Skip the confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
    /// List installed packages
    List {
        /// Install root (defaults to the configured root)
        #[clap(long)]
        root: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Install { archive, root } => {
            commands::install::install_package(&archive, root)?;
        }
        Commands::Uninstall {
            name,
            version,
            root,
            yes,
        } => {
            commands::uninstall::uninstall_package(&name, &version, root, yes)?;
        }
        Commands::List { root } => {
            commands::list::list_packages(root)?;
        }
    }

    Ok(())
}
