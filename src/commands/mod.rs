pub mod install;
pub mod list;
pub mod uninstall;

use crate::core::config::Config;
use crate::core::progress::{Operation, ProgressEvent};
use crate::error::Result;
use std::io::Write;
use std::path::PathBuf;

/// Install root for a command: the `--root` override, or the configured
/// default.
pub(crate) fn resolve_root(root_override: Option<PathBuf>) -> Result<PathBuf> {
    match root_override {
        Some(root) => Ok(root),
        None => Ok(Config::load()?.install_root),
    }
}

/// Render a progress event as a single rewritten terminal line, matching the
/// operation phase: "NN% Installing files....".
pub(crate) fn render_progress(event: ProgressEvent) {
    let label = match event.operation {
        Operation::Moving => "Moving files",
        Operation::Installing => "Installing files",
        Operation::Deleting => "Deleting files",
    };

    print!("\r{:3}% {label}....", event.percent);
    let _ = std::io::stdout().flush();

    if event.percent == 100 {
        println!();
    }
}
