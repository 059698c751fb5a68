//! Core types and rules for shelfscan.
//!
//! This crate provides the data model shared by the scanner and its
//! consumers: the records emitted for matching files, the event stream,
//! ignore and extension rules, and scan configuration.

mod config;
mod error;
mod event;
mod record;
mod rules;

pub use config::{ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use error::{ConfigError, FailureKind, ScanError, ScanFailure};
pub use event::{EventKind, ScanEvent};
pub use record::{ContentHash, FileRecord, HashAlgorithm, extension_of};
pub use rules::{DEFAULT_IGNORE_PATTERNS, DEFAULT_EXTENSIONS, IgnoreRules, Matcher, TargetExtensions};
