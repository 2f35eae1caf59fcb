//! Path Utilities
//!
//! Common path resolution for the gworkspace directory and files.

use std::path::PathBuf;

use super::{AppError, AppResult};

/// Get the gworkspace base directory (`~/.gworkspace/`)
pub fn gworkspace_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))?;
    Ok(home.join(".gworkspace"))
}

/// Default configuration file (`~/.gworkspace/config.json`)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(gworkspace_dir()?.join("config.json"))
}

/// Default token file (`~/.gworkspace/token.json`)
pub fn token_path() -> AppResult<PathBuf> {
    Ok(gworkspace_dir()?.join("token.json"))
}
