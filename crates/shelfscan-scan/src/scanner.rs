//! Depth-first directory scanner.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use shelfscan_core::{
    FileRecord, HashAlgorithm, Matcher, ScanConfig, ScanError, ScanEvent, TargetExtensions,
};

use crate::hash::hash_file;
use crate::progress::{ProgressTracker, ScanSummary};
use crate::sink::EventSink;

/// Scanner that walks a tree in pre-order with an explicit pending stack.
///
/// Each visited directory produces a heartbeat before any event from its
/// descendants. Each regular file whose extension is a target is hashed and
/// reported once; a link to such a file is reported under the link's path.
/// Links to directories are not entered and broken links are reported as
/// inaccessible. Failures are reported per entry and never stop the walk.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    cancel: Option<CancellationToken>,
}

/// An entry waiting to be visited.
struct Pending {
    path: PathBuf,
    depth: usize,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self { cancel: None }
    }

    /// Stop early once `token` is cancelled.
    ///
    /// The token is checked before each directory listing and each file hash.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Scan the configured root, streaming events into `sink`.
    pub fn scan<S>(&self, config: &ScanConfig, sink: &mut S) -> ScanSummary
    where
        S: EventSink + ?Sized,
    {
        self.walk(
            &config.root,
            &config.ignore,
            &config.extensions,
            config.hash,
            sink,
        )
    }

    /// Scan `root` with explicit rules.
    pub fn walk<S>(
        &self,
        root: &Path,
        ignore: &dyn Matcher,
        targets: &TargetExtensions,
        algorithm: HashAlgorithm,
        sink: &mut S,
    ) -> ScanSummary
    where
        S: EventSink + ?Sized,
    {
        info!(root = %root.display(), "starting scan");
        let mut tracker = ProgressTracker::new();
        let mut pending = vec![Pending {
            path: root.to_path_buf(),
            depth: 0,
        }];
        let mut cancelled = false;

        while let Some(Pending { path, depth }) = pending.pop() {
            // The root follows symlinks; everything below it is lstat'd.
            let metadata = if depth == 0 {
                fs::metadata(&path)
            } else {
                fs::symlink_metadata(&path)
            };
            let metadata = match metadata {
                Ok(m) => m,
                Err(err) if depth == 0 && err.kind() == io::ErrorKind::NotFound => {
                    report(ScanError::RootNotFound { path }, sink, &mut tracker);
                    break;
                }
                Err(err) => {
                    report(ScanError::inaccessible(path, err), sink, &mut tracker);
                    continue;
                }
            };

            // File links are read through; directory links are never entered.
            let metadata = if metadata.file_type().is_symlink() {
                match fs::metadata(&path) {
                    Ok(target) if target.is_file() => target,
                    Ok(_) => {
                        trace!(link = %path.display(), "not following link");
                        continue;
                    }
                    Err(err) => {
                        report(ScanError::inaccessible(path, err), sink, &mut tracker);
                        continue;
                    }
                }
            } else {
                metadata
            };

            let file_type = metadata.file_type();
            if file_type.is_dir() {
                if self.is_cancelled() {
                    cancelled = true;
                    break;
                }
                tracker.record_dir();
                debug!(dir = %path.display(), depth, "visiting directory");
                sink.emit(ScanEvent::heartbeat(&path));

                let children = list_children(&path, ignore, sink, &mut tracker);
                pending.extend(children.into_iter().rev().map(|child| Pending {
                    path: child,
                    depth: depth + 1,
                }));
            } else if file_type.is_file() {
                tracker.record_file();
                let Some(extension) = targets.match_path(&path) else {
                    continue;
                };
                if self.is_cancelled() {
                    cancelled = true;
                    break;
                }

                match hash_file(&path, algorithm) {
                    Ok((hash, bytes)) => {
                        trace!(file = %path.display(), %hash, "matched");
                        tracker.record_match(bytes);
                        let record = FileRecord::new(path, extension, metadata.len(), hash);
                        sink.emit(ScanEvent::FileFound(record));
                    }
                    Err(err) => {
                        let err = match err.kind() {
                            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                                ScanError::inaccessible(path, err)
                            }
                            _ => ScanError::hash_failure(path, err),
                        };
                        report(err, sink, &mut tracker);
                    }
                }
            } else {
                // Sockets, fifos, devices: never reported.
                trace!(entry = %path.display(), "skipping special file");
            }
        }

        let summary = tracker.finish(cancelled);
        info!(
            root = %root.display(),
            matches = summary.matches,
            dirs = summary.dirs_visited,
            errors = summary.errors,
            cancelled = summary.cancelled,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "scan finished"
        );
        summary
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// Scan `root` and return the number of files reported as found.
///
/// Convenience wrapper over [`Scanner::walk`] using MD5 hashes and no
/// cancellation.
pub fn scan<F>(
    root: impl AsRef<Path>,
    ignore: &dyn Matcher,
    targets: &TargetExtensions,
    mut on_event: F,
) -> u64
where
    F: FnMut(ScanEvent),
{
    Scanner::new()
        .walk(
            root.as_ref(),
            ignore,
            targets,
            HashAlgorithm::Md5,
            &mut on_event,
        )
        .matches
}

/// List a directory's children in filesystem order, dropping ignored leaves.
fn list_children<S>(
    dir: &Path,
    ignore: &dyn Matcher,
    sink: &mut S,
    tracker: &mut ProgressTracker,
) -> Vec<PathBuf>
where
    S: EventSink + ?Sized,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            report(ScanError::inaccessible(dir, err), sink, tracker);
            return Vec::new();
        }
    };

    let mut children = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                report(ScanError::inaccessible(dir, err), sink, tracker);
                continue;
            }
        };

        let name = entry.file_name();
        if ignore.is_match(&name.to_string_lossy()) {
            trace!(entry = %entry.path().display(), "ignored");
            tracker.record_ignored();
            continue;
        }
        children.push(entry.path());
    }
    children
}

fn report<S>(err: ScanError, sink: &mut S, tracker: &mut ProgressTracker)
where
    S: EventSink + ?Sized,
{
    warn!(path = %err.path().display(), error = %err, "scan error");
    tracker.record_error();
    sink.emit(ScanEvent::from(err));
}
