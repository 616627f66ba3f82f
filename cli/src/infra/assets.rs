//! Embedded templates compiled into the binary.
//!
//! At compile time, `include_dir!` embeds everything under `assets/`:
//!   - `local-beach/compose.yaml`: shared webserver and database
//!   - `project/.localbeach.docker-compose.yaml`: project instance services
//!   - `project/Settings.yaml`: Flow settings for the instance
//!   - `project/.localbeach.dist.env`: distributed project environment

use anyhow::{Result, anyhow};
use include_dir::{Dir, include_dir};

use crate::application::ports::AssetSource;

static EMBEDDED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Return the text of a single embedded asset.
///
/// # Errors
///
/// Returns an error if no asset with the given `name` exists or it is not
/// valid UTF-8.
pub fn get_asset(name: &str) -> Result<&'static str> {
    EMBEDDED_ASSETS
        .get_file(name)
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| anyhow!("embedded asset not found: {name}"))
}

/// Production `AssetSource` backed by the embedded directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedAssets;

impl AssetSource for EmbeddedAssets {
    fn get_asset(&self, name: &str) -> Result<&'static str> {
        get_asset(name)
    }
}
