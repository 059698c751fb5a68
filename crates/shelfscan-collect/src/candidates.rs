//! Candidate list keyed by content hash.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use shelfscan_core::{ContentHash, FileRecord, ScanEvent};

use crate::duplicates::{DuplicateConfig, DuplicateGroup, DuplicateReport};

/// One distinct book, possibly found at several paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Content hash shared by every path.
    pub content_hash: ContentHash,
    /// Display name from the first sighting.
    pub display_name: CompactString,
    /// Extension from the first sighting.
    pub extension: CompactString,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Every path this content was found at, most recent first.
    pub paths: Vec<PathBuf>,
    /// Whether the candidate is selected for adding to the library.
    #[serde(default)]
    pub selected: bool,
}

impl Candidate {
    fn from_record(record: FileRecord) -> Self {
        Self {
            content_hash: record.content_hash,
            display_name: record.display_name,
            extension: record.extension,
            size_bytes: record.size_bytes,
            paths: vec![record.absolute_path],
            selected: false,
        }
    }

    /// Size formatted for display, e.g. `1.5 MiB`.
    pub fn size_readable(&self) -> String {
        humansize::format_size(self.size_bytes, humansize::BINARY)
    }

    /// Whether the same content was found at more than one path.
    pub fn is_duplicated(&self) -> bool {
        self.paths.len() > 1
    }

    /// The most recently reported path.
    pub fn latest_path(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }
}

/// Accumulates found files, merging sightings of the same content.
///
/// Insertion is idempotent: re-scanning a tree, or finding a hard link to
/// an already-seen file, adds no new candidates and no repeated paths.
/// Candidates keep the order in which their content was first seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateList {
    candidates: IndexMap<ContentHash, Candidate>,
}

impl CandidateList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Returns `true` if its content had not been seen before.
    pub fn insert(&mut self, record: FileRecord) -> bool {
        match self.candidates.entry(record.content_hash.clone()) {
            Entry::Occupied(mut entry) => {
                let candidate = entry.get_mut();
                if !candidate.paths.contains(&record.absolute_path) {
                    tracing::debug!(
                        hash = %record.content_hash,
                        path = %record.absolute_path.display(),
                        "merging duplicate sighting"
                    );
                    candidate.paths.insert(0, record.absolute_path);
                }
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(Candidate::from_record(record));
                true
            }
        }
    }

    /// Feed a scan event. Only file-found events change the list.
    pub fn apply(&mut self, event: &ScanEvent) -> bool {
        match event {
            ScanEvent::FileFound(record) => self.insert(record.clone()),
            _ => false,
        }
    }

    /// Look up a candidate by hash.
    pub fn get(&self, hash: &ContentHash) -> Option<&Candidate> {
        self.candidates.get(hash)
    }

    /// Candidate at a display index.
    pub fn get_index(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get_index(index).map(|(_, c)| c)
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    /// Number of distinct contents.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if nothing has been found.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Flip the selection of the candidate at `index`.
    ///
    /// Returns the new selection state, or `None` if out of range.
    pub fn toggle_select(&mut self, index: usize) -> Option<bool> {
        let (_, candidate) = self.candidates.get_index_mut(index)?;
        candidate.selected = !candidate.selected;
        Some(candidate.selected)
    }

    /// Select every candidate.
    pub fn select_all(&mut self) {
        self.set_all(true);
    }

    /// Clear every selection.
    pub fn select_none(&mut self) {
        self.set_all(false);
    }

    fn set_all(&mut self, selected: bool) {
        for candidate in self.candidates.values_mut() {
            candidate.selected = selected;
        }
    }

    /// Selected candidates in first-seen order.
    pub fn selected(&self) -> impl Iterator<Item = &Candidate> {
        self.iter().filter(|c| c.selected)
    }

    /// Total size of the distinct contents.
    pub fn total_size(&self) -> u64 {
        self.iter().map(|c| c.size_bytes).sum()
    }

    /// Report contents found at more than one path, using default settings.
    pub fn duplicates(&self) -> DuplicateReport {
        self.duplicates_with(&DuplicateConfig::default())
    }

    /// Report contents found at more than one path.
    pub fn duplicates_with(&self, config: &DuplicateConfig) -> DuplicateReport {
        let groups = self
            .iter()
            .filter(|c| c.is_duplicated() && c.size_bytes >= config.min_size)
            .map(DuplicateGroup::from_candidate)
            .collect();
        DuplicateReport::from_groups(groups, self.len() as u64, config.max_groups)
    }
}

impl Extend<FileRecord> for CandidateList {
    fn extend<T: IntoIterator<Item = FileRecord>>(&mut self, iter: T) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<FileRecord> for CandidateList {
    fn from_iter<T: IntoIterator<Item = FileRecord>>(iter: T) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
