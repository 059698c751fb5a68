//! Error types for scanning operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found while scanning a single entry.
///
/// None of these abort a scan. The scanner turns each one into an error
/// event and moves on to the next sibling.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist.
    #[error("path not exists")]
    RootNotFound { path: PathBuf },

    /// An entry could not be stat'd, listed, or opened.
    #[error("cannot access entry: {source}")]
    EntryInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a matching file failed while hashing it.
    #[error("cannot hash file: {source}")]
    HashFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Create an inaccessible-entry error with path context.
    pub fn inaccessible(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::EntryInaccessible {
            path: path.into(),
            source,
        }
    }

    /// Create a hash failure with path context.
    pub fn hash_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::HashFailure {
            path: path.into(),
            source,
        }
    }

    /// The path the error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::RootNotFound { path }
            | Self::EntryInaccessible { path, .. }
            | Self::HashFailure { path, .. } => path,
        }
    }

    /// Kind of failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RootNotFound { .. } => FailureKind::RootNotFound,
            Self::EntryInaccessible { .. } => FailureKind::EntryInaccessible,
            Self::HashFailure { .. } => FailureKind::HashFailure,
        }
    }
}

/// Kind of scan failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The scan root does not exist.
    RootNotFound,
    /// Stat, listing, or open failed.
    EntryInaccessible,
    /// Reading failed while hashing.
    HashFailure,
}

/// Serializable description of a failure, carried by error events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    /// Path where the failure occurred.
    pub path: PathBuf,
    /// Human-readable reason, without the path.
    pub reason: String,
    /// Kind of failure.
    pub kind: FailureKind,
}

impl ScanFailure {
    /// Create a new failure description.
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
            kind,
        }
    }

    /// Message including the offending path, e.g.
    /// `path not exists. path=/does/not/exist`.
    pub fn message(&self) -> String {
        format!("{}. path={}", self.reason, self.path.display())
    }
}

impl From<&ScanError> for ScanFailure {
    fn from(err: &ScanError) -> Self {
        Self::new(err.path(), err.to_string(), err.kind())
    }
}

impl From<ScanError> for ScanFailure {
    fn from(err: ScanError) -> Self {
        Self::from(&err)
    }
}

/// Errors building scan rules or configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An ignore pattern is not a valid glob.
    #[error("invalid ignore pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A target extension is empty or contains separators.
    #[error("invalid target extension `{0}`")]
    InvalidExtension(String),
}
