//! File system scanning engine for shelfscan.
//!
//! This crate walks a directory tree looking for library books and streams
//! what it finds as [`ScanEvent`]s.
//!
//! # Overview
//!
//! - **Pre-order traversal** with an explicit stack, so deep trees never hit
//!   recursion limits
//! - **Leaf-name ignore rules** compiled once into a glob set
//! - **Content hashing** (MD5 or BLAKE3) of matching files only
//! - **Failure isolation**: an unreadable entry becomes an error event and the
//!   walk continues with its siblings
//! - **Cancellation** via a [`CancellationToken`]
//!
//! # Example
//!
//! ```rust,no_run
//! use shelfscan_scan::{ScanConfig, ScanEvent, Scanner};
//!
//! let config = ScanConfig::new("/path/to/books");
//! let summary = Scanner::new().scan(&config, &mut |event: ScanEvent| {
//!     if let ScanEvent::FileFound(record) = event {
//!         println!("{} {}", record.content_hash, record.absolute_path.display());
//!     }
//! });
//!
//! println!("Found {} books", summary.matches);
//! ```
//!
//! # Background Scans
//!
//! ```rust,no_run
//! use shelfscan_scan::{CancellationToken, ScanConfig, start_scan};
//!
//! # async fn run() {
//! let (mut events, handle) = start_scan(ScanConfig::new("/books"), CancellationToken::new());
//! while let Some(event) = events.recv().await {
//!     println!("{}: {}", event.kind(), event.payload());
//! }
//! let summary = handle.await.unwrap();
//! # }
//! ```

mod background;
mod hash;
mod progress;
mod scanner;
mod sink;

pub use background::{SCAN_CHANNEL_SIZE, start_scan};
pub use hash::{hash_file, hash_reader};
pub use progress::ScanSummary;
pub use scanner::{Scanner, scan};
pub use sink::{ChannelSink, EventSink, tagged};

pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use shelfscan_core::{
    ContentHash, EventKind, FailureKind, FileRecord, HashAlgorithm, IgnoreRules, Matcher,
    ScanConfig, ScanError, ScanEvent, ScanFailure, TargetExtensions,
};
