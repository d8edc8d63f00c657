//! Path management for vegsplit
//!
//! Only the settings file lives on disk; bills are never persisted.
//!
//! ## Path Resolution Order
//!
//! 1. `VEGSPLIT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/vegsplit` or `~/.config/vegsplit`
//! 3. Windows: `%APPDATA%\vegsplit`

use std::path::PathBuf;

use crate::error::VegsplitError;

/// Environment variable overriding the configuration directory
pub const DATA_DIR_ENV: &str = "VEGSPLIT_DATA_DIR";

/// Manages all paths used by vegsplit
#[derive(Debug, Clone)]
pub struct VegsplitPaths {
    base_dir: PathBuf,
}

impl VegsplitPaths {
    /// Resolve the configuration directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, VegsplitError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the configuration directory exists
    pub fn ensure_directories(&self) -> Result<(), VegsplitError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            VegsplitError::Io(format!("Failed to create config directory: {}", e))
        })
    }
}

/// Resolve the default config directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, VegsplitError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("vegsplit"));
    }
    let home = std::env::var("HOME").map_err(|_| {
        VegsplitError::Config("Could not determine HOME directory".into())
    })?;
    Ok(PathBuf::from(home).join(".config").join("vegsplit"))
}

/// Resolve the default config directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, VegsplitError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| VegsplitError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("vegsplit"))
}
