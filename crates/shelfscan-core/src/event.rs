//! Events streamed by a scan.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{ScanError, ScanFailure};
use crate::record::FileRecord;

/// Wire tag of a [`ScanEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    /// `"heartbeat"`
    Heartbeat,
    /// `"file-found"`
    FileFound,
    /// `"error"`
    Error,
}

/// One event emitted during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
pub enum ScanEvent {
    /// A directory is being visited.
    Heartbeat(PathBuf),
    /// A file matched the target extensions.
    FileFound(FileRecord),
    /// An entry could not be scanned.
    Error(ScanFailure),
}

impl ScanEvent {
    /// Create a heartbeat for a directory.
    pub fn heartbeat(path: impl Into<PathBuf>) -> Self {
        Self::Heartbeat(path.into())
    }

    /// Get the wire tag.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Heartbeat(_) => EventKind::Heartbeat,
            Self::FileFound(_) => EventKind::FileFound,
            Self::Error(_) => EventKind::Error,
        }
    }

    /// The path this event is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::Heartbeat(path) => path,
            Self::FileFound(record) => &record.absolute_path,
            Self::Error(failure) => &failure.path,
        }
    }

    /// Payload in the shape consumers of `onEvent(kind, payload)` expect:
    /// the directory path for heartbeats, the record object for matches,
    /// and a message string for errors.
    pub fn payload(&self) -> Value {
        match self {
            Self::Heartbeat(path) => Value::String(path.to_string_lossy().into_owned()),
            Self::FileFound(record) => json!({
                "contentHash": record.content_hash.to_hex(),
                "absolutePath": record.absolute_path.to_string_lossy(),
                "extension": record.extension.as_str(),
                "sizeBytes": record.size_bytes,
                "displayName": record.display_name.as_str(),
            }),
            Self::Error(failure) => Value::String(failure.message()),
        }
    }

    /// Check if this is a file-found event.
    pub fn is_file_found(&self) -> bool {
        matches!(self, Self::FileFound(_))
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Get the record if this is a file-found event.
    pub fn as_record(&self) -> Option<&FileRecord> {
        match self {
            Self::FileFound(record) => Some(record),
            _ => None,
        }
    }
}

impl From<FileRecord> for ScanEvent {
    fn from(record: FileRecord) -> Self {
        Self::FileFound(record)
    }
}

impl From<ScanError> for ScanEvent {
    fn from(err: ScanError) -> Self {
        Self::Error(err.into())
    }
}
