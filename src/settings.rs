//! Optional TOML settings file.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use serde::Deserialize;

use shelfscan_core::HashAlgorithm;

/// Values read from `config.toml`. Every key is optional.
///
/// ```toml
/// ignore = [".*", "node_modules", "Downloads"]
/// extensions = ["pdf", "epub"]
/// hash = "md5"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Replaces the built-in ignore patterns.
    pub ignore: Option<Vec<String>>,
    /// Replaces the built-in target extensions.
    pub extensions: Option<Vec<String>>,
    /// Digest for content hashes.
    pub hash: Option<HashAlgorithm>,
}

impl Settings {
    /// Default location: `<config dir>/shelfscan/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shelfscan").join("config.toml"))
    }

    /// Load settings from `explicit`, or from the default location if it
    /// exists. A missing default file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        tracing::debug!(path = %path.display(), "loading settings");
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Parse settings from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
