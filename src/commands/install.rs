use crate::commands::{render_progress, resolve_root};
use crate::core::installer::Repository;
use crate::core::layout;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub fn install_package(archive: &Path, root_override: Option<PathBuf>) -> Result<()> {
    let root = resolve_root(root_override)?;
    println!("Installing package from {archive:?}");

    let repo = Repository::new(root)?;
    let identity = repo.install(archive, &mut |event| render_progress(event))?;

    println!("✅ Successfully installed {identity}");
    println!(
        "   Location: {:?}",
        layout::package_dir(repo.install_root(), &identity)
    );

    Ok(())
}
