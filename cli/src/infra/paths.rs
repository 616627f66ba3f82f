//! Location of the Local Beach home directory.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::domain::LocalBeachLayout;

/// Default Local Beach home for the current platform.
///
/// # Errors
///
/// Returns an error if the user's data directory cannot be determined.
pub fn default_base_path() -> Result<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|home| {
                home.join("Library")
                    .join("Application Support")
                    .join("Flownative")
                    .join("Local Beach")
            })
            .ok_or_else(|| anyhow!("cannot determine home directory"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::data_local_dir()
            .map(|data| data.join("localbeach"))
            .ok_or_else(|| anyhow!("cannot determine local data directory"))
    }
}

/// Layout below `base`, or below the platform default.
///
/// # Errors
///
/// Returns an error if no base is given and the default cannot be determined.
pub fn resolve_layout(base: Option<&Path>) -> Result<LocalBeachLayout> {
    let base = match base {
        Some(base) => base.to_path_buf(),
        None => default_base_path()?,
    };
    Ok(LocalBeachLayout::under(&base))
}
