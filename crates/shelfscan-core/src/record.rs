//! File records and content hashes.

use std::fmt;
use std::path::{Path, PathBuf};

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Digest algorithm used to content-address matching files.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, the digest used by existing bookhub libraries.
    #[default]
    Md5,
    /// BLAKE3.
    Blake3,
}

impl HashAlgorithm {
    /// Length of the hex digest produced by this algorithm.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Blake3 => 64,
        }
    }
}

/// Lowercase hex digest of a file's full contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(CompactString);

impl ContentHash {
    /// Create a hash from raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hex = CompactString::with_capacity(bytes.len() * 2);
        for b in bytes {
            hex.push_str(&format_compact!("{b:02x}"));
        }
        Self(hex)
    }

    /// Wrap an already hex-encoded digest, normalizing it to lowercase.
    ///
    /// Returns `None` if the input is empty or not hex.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(hex.to_ascii_lowercase().into()))
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata for one matching file, emitted once per scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Digest of the file's bytes.
    pub content_hash: ContentHash,
    /// Scan root joined with the path walked to reach the file.
    pub absolute_path: PathBuf,
    /// Extension including the leading dot, e.g. `.pdf`.
    pub extension: CompactString,
    /// Size in bytes from the entry's metadata.
    pub size_bytes: u64,
    /// File name without its extension.
    pub display_name: CompactString,
}

impl FileRecord {
    /// Build a record for `path`, deriving the display name from the file stem.
    pub fn new(
        path: impl Into<PathBuf>,
        extension: impl Into<CompactString>,
        size_bytes: u64,
        content_hash: ContentHash,
    ) -> Self {
        let absolute_path = path.into();
        let display_name = absolute_path
            .file_stem()
            .map(|s| CompactString::new(s.to_string_lossy()))
            .unwrap_or_default();

        Self {
            content_hash,
            absolute_path,
            extension: extension.into(),
            size_bytes,
            display_name,
        }
    }
}

/// Extension of `path` with a leading dot.
///
/// Files without an extension (including dotfiles such as `.bashrc`) yield
/// `None`. A trailing dot yields `"."`.
pub fn extension_of(path: &Path) -> Option<CompactString> {
    path.extension()
        .map(|ext| format_compact!(".{}", ext.to_string_lossy()))
}
