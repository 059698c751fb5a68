//! Ignore and target-extension rules.

use std::collections::BTreeSet;
use std::path::Path;

use compact_str::{CompactString, format_compact};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::record::extension_of;

/// Leaf-name patterns skipped by default: hidden entries, dependency and log
/// directories, and a few content folders that never hold library books.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".*",
    "node_modules",
    "Library",
    "log",
    "logs",
    "video-course",
    "interview",
];

/// Extensions reported by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".pdf"];

/// Decides whether an entry's leaf name is excluded from traversal.
pub trait Matcher {
    /// Returns `true` if the leaf name should be skipped.
    fn is_match(&self, leaf: &str) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&str) -> bool,
{
    fn is_match(&self, leaf: &str) -> bool {
        self(leaf)
    }
}

/// Ordered set of glob patterns compiled once and matched against leaf names.
///
/// A pattern must match the whole leaf: `Library` matches an entry named
/// exactly `Library`, never `MyLibrary`, and `.*` matches any leaf starting
/// with a dot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct IgnoreRules {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnoreRules {
    /// Compile the given patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();

        for pattern in patterns {
            let pattern = pattern.into();
            if kept.contains(&pattern) {
                continue;
            }
            let glob = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
            kept.push(pattern);
        }

        let set = builder.build().map_err(|source| ConfigError::InvalidPattern {
            pattern: kept.join(", "),
            source,
        })?;

        Ok(Self {
            patterns: kept,
            set,
        })
    }

    /// Rules that ignore nothing.
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Append more patterns, keeping the existing ones first.
    pub fn extend<I, S>(&self, patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            self.patterns
                .iter()
                .cloned()
                .chain(patterns.into_iter().map(Into::into)),
        )
    }

    /// The source patterns in the order they were given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check a leaf name against every pattern.
    pub fn is_ignored(&self, leaf: &str) -> bool {
        self.set.is_match(leaf)
    }

    /// Check if no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS.iter().copied())
            .expect("default ignore patterns are valid globs")
    }
}

impl Matcher for IgnoreRules {
    fn is_match(&self, leaf: &str) -> bool {
        self.is_ignored(leaf)
    }
}

impl TryFrom<Vec<String>> for IgnoreRules {
    type Error = ConfigError;

    fn try_from(patterns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(patterns)
    }
}

impl From<IgnoreRules> for Vec<String> {
    fn from(rules: IgnoreRules) -> Self {
        rules.patterns
    }
}

/// Case-sensitive set of file extensions that qualify a file for reporting.
///
/// Extensions are stored with a leading dot; `pdf` and `.pdf` are the same
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TargetExtensions(BTreeSet<CompactString>);

impl TargetExtensions {
    /// Build the set, normalizing each extension to start with a dot.
    pub fn new<I, S>(extensions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Check whether `extension` (with leading dot) is a target.
    pub fn contains(&self, extension: &str) -> bool {
        self.0.contains(extension)
    }

    /// Return the path's extension if it is a target.
    pub fn match_path(&self, path: &Path) -> Option<CompactString> {
        extension_of(path).filter(|ext| self.contains(ext))
    }

    /// Iterate over the extensions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(CompactString::as_str)
    }

    /// Number of extensions in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TargetExtensions {
    fn default() -> Self {
        Self(DEFAULT_EXTENSIONS.iter().map(|e| CompactString::new(e)).collect())
    }
}

impl TryFrom<Vec<String>> for TargetExtensions {
    type Error = ConfigError;

    fn try_from(extensions: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(extensions)
    }
}

impl From<TargetExtensions> for Vec<String> {
    fn from(extensions: TargetExtensions) -> Self {
        extensions.0.into_iter().map(String::from).collect()
    }
}

fn normalize_extension(raw: &str) -> Result<CompactString, ConfigError> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if bare.is_empty() || bare.contains(['/', '\\', '.']) {
        return Err(ConfigError::InvalidExtension(raw.to_string()));
    }
    Ok(format_compact!(".{bare}"))
}
