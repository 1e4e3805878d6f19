use crate::commands::{render_progress, resolve_root};
use crate::core::identity::PackageIdentity;
use crate::core::installer::Repository;
use crate::error::Result;
use std::io::{self, Write};
use std::path::PathBuf;

pub fn uninstall_package(
    name: &str,
    version: &str,
    root_override: Option<PathBuf>,
    assume_yes: bool,
) -> Result<()> {
    let identity = PackageIdentity::parse(name, version)?;
    let root = resolve_root(root_override)?;
    let repo = Repository::new(root)?;

    if !repo.is_installed(&identity) {
        println!("Package {identity} is not installed. Nothing to do.");
        return Ok(());
    }

    if !assume_yes {
        print!("Are you sure you want to uninstall {identity}? [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().to_lowercase().starts_with('y') {
            println!("Uninstall cancelled.");
            return Ok(());
        }
    }

    repo.uninstall(&identity, &mut |event| render_progress(event))?;

    println!("✅ Successfully uninstalled {identity}");
    Ok(())
}
