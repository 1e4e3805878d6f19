use crate::commands::resolve_root;
use crate::core::installer::Repository;
use crate::error::Result;
use std::path::PathBuf;

pub fn list_packages(root_override: Option<PathBuf>) -> Result<()> {
    let root = resolve_root(root_override)?;
    let repo = Repository::new(root)?;

    let packages = repo.installed_packages()?;

    if packages.is_empty() {
        println!("No packages installed.");
        println!("Install one with: nupak install <archive>");
        return Ok(());
    }

    println!("Installed packages:");
    for identity in packages {
        println!("  • {} {}", identity.name(), identity.version());
    }

    Ok(())
}
