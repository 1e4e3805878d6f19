pub mod archive;
pub mod config;
pub mod copier;
pub mod delete;
pub mod identity;
pub mod installer;
pub mod layout;
pub mod progress;
