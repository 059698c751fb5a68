//! Candidate list and duplicate reporting for shelfscan.
//!
//! A scan streams one record per matching file. This crate is the consumer
//! side: it folds those records into a [`CandidateList`] keyed by content
//! hash, so the same book found at several paths (or found again by a
//! re-scan) becomes a single candidate carrying every path.
//!
//! ```rust,ignore
//! use shelfscan_collect::CandidateList;
//! use shelfscan_scan::{ScanConfig, ScanEvent, Scanner};
//!
//! let mut candidates = CandidateList::new();
//! Scanner::new().scan(&ScanConfig::new("/books"), &mut |event: ScanEvent| {
//!     candidates.apply(&event);
//! });
//!
//! for group in &candidates.duplicates().groups {
//!     println!("{} copies of {}", group.count(), group.name);
//! }
//! ```

mod candidates;
mod duplicates;

pub use candidates::{Candidate, CandidateList};
pub use duplicates::{DuplicateConfig, DuplicateConfigBuilder, DuplicateGroup, DuplicateReport};

// Re-export core types
pub use shelfscan_core::{ContentHash, FileRecord};
