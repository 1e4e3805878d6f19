//! Nupak Library
//!
//! Repository-style installer for zip-based package archives: one directory
//! per package identity+version under an install root, holding a copy of the
//! archive plus its extracted content parts, with percentage progress events
//! for every phase.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
