//! Duplicate reporting over accumulated candidates.
//!
//! Content is already addressed by hash during the scan, so a duplicate is
//! simply a candidate seen at two or more paths. No extra I/O is needed.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize, Serializer};

use shelfscan_core::ContentHash;

use crate::candidates::Candidate;

/// Configuration for duplicate reporting.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct DuplicateConfig {
    /// Minimum file size to report (skip tiny files).
    #[builder(default = "0")]
    pub min_size: u64,

    /// Maximum number of groups to return (0 = unlimited).
    #[builder(default = "0")]
    pub max_groups: usize,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            min_size: 0,
            max_groups: 0,
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }
}

/// A group of paths sharing the same content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Content hash shared by all files in this group.
    pub hash: ContentHash,

    /// Display name of the first sighting.
    pub name: String,

    /// Size of each file in bytes.
    pub size: u64,

    /// Paths to all copies. Serialized lossily so non-UTF-8 names survive.
    #[serde(serialize_with = "serialize_paths_lossy")]
    pub paths: Vec<PathBuf>,

    /// Wasted space: size * (count - 1).
    pub wasted_bytes: u64,
}

impl DuplicateGroup {
    pub(crate) fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            hash: candidate.content_hash.clone(),
            name: candidate.display_name.to_string(),
            size: candidate.size_bytes,
            paths: candidate.paths.clone(),
            wasted_bytes: candidate.size_bytes * (candidate.paths.len() as u64).saturating_sub(1),
        }
    }

    /// Get the number of copies.
    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// If keeping one copy, how many could be removed.
    pub fn deletable_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

fn serialize_paths_lossy<S>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(paths.iter().map(|path| path.to_string_lossy()))
}

/// Results from duplicate analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Groups of duplicates, sorted by wasted space descending.
    pub groups: Vec<DuplicateGroup>,

    /// Total size of all duplicated files.
    pub total_duplicate_size: u64,

    /// Total wasted space (could be reclaimed).
    pub total_wasted_space: u64,

    /// Number of distinct contents analyzed.
    pub files_analyzed: u64,

    /// Number of paths that have duplicates.
    pub files_with_duplicates: u64,

    /// Number of duplicate groups.
    pub group_count: usize,
}

impl DuplicateReport {
    pub(crate) fn from_groups(
        mut groups: Vec<DuplicateGroup>,
        files_analyzed: u64,
        max_groups: usize,
    ) -> Self {
        groups.sort_by(|a, b| {
            b.wasted_bytes
                .cmp(&a.wasted_bytes)
                .then_with(|| a.hash.cmp(&b.hash))
        });

        if max_groups > 0 && groups.len() > max_groups {
            groups.truncate(max_groups);
        }

        let total_duplicate_size: u64 = groups.iter().map(|g| g.size * g.paths.len() as u64).sum();
        let total_wasted_space: u64 = groups.iter().map(|g| g.wasted_bytes).sum();
        let files_with_duplicates: u64 = groups.iter().map(|g| g.paths.len() as u64).sum();
        let group_count = groups.len();

        Self {
            groups,
            total_duplicate_size,
            total_wasted_space,
            files_analyzed,
            files_with_duplicates,
            group_count,
        }
    }

    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }
}
