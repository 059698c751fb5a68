use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use shelfscan_scan::{
    CancellationToken, EventKind, FailureKind, HashAlgorithm, IgnoreRules, ScanConfig, ScanEvent,
    Scanner, TargetExtensions, scan, start_scan, tagged,
};
use tempfile::TempDir;

fn collect(config: &ScanConfig) -> (Vec<ScanEvent>, u64) {
    let mut events = Vec::new();
    let summary = Scanner::new().scan(config, &mut |e: ScanEvent| events.push(e));
    (events, summary.matches)
}

fn found_paths(events: &[ScanEvent]) -> BTreeSet<PathBuf> {
    events
        .iter()
        .filter_map(ScanEvent::as_record)
        .map(|r| r.absolute_path.clone())
        .collect()
}

/// `lib/a.pdf` (10 bytes), `lib/.git/b.pdf`, `lib/notes.txt`.
fn library_fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let lib = temp.path().join("lib");
    fs::create_dir_all(lib.join(".git")).unwrap();
    fs::write(lib.join("a.pdf"), b"0123456789").unwrap();
    fs::write(lib.join(".git/b.pdf"), b"hidden").unwrap();
    fs::write(lib.join("notes.txt"), b"some notes").unwrap();
    (temp, lib)
}

#[test]
fn test_missing_root_reports_once() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does/not/exist");

    let mut events = Vec::new();
    let count = scan(
        &missing,
        &IgnoreRules::default(),
        &TargetExtensions::default(),
        |e| events.push(e),
    );

    assert_eq!(count, 0);
    assert_eq!(events.len(), 1);
    match &events[0] {
        ScanEvent::Error(failure) => {
            assert_eq!(failure.kind, FailureKind::RootNotFound);
            assert_eq!(failure.path, missing);
            assert!(failure.message().starts_with("path not exists"));
        }
        other => panic!("Expected error event, got {other:?}"),
    }
}

#[test]
fn test_library_scenario() {
    let (_temp, lib) = library_fixture();
    let (events, count) = collect(&ScanConfig::new(&lib));

    assert_eq!(count, 1);
    assert_eq!(events[0], ScanEvent::heartbeat(&lib));

    let records: Vec<_> = events.iter().filter_map(ScanEvent::as_record).collect();
    assert_eq!(records.len(), 1);
    let record = records[0];
    assert_eq!(record.absolute_path, lib.join("a.pdf"));
    assert_eq!(record.size_bytes, 10);
    assert_eq!(record.extension, ".pdf");
    assert_eq!(record.display_name, "a");
    // md5("0123456789")
    assert_eq!(record.content_hash.to_hex(), "781e5e245d69b566979b86e28d23f2c7");

    // Only the root heartbeat: `.git` is never entered.
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| !e.is_error()));
}

#[test]
fn test_matches_equal_expected_set() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    for dir in ["a/b/c", "a/logs", "x/node_modules/pkg", "x/Library", "y"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    let files = [
        ("a/one.pdf", true),
        ("a/b/two.pdf", true),
        ("a/b/c/three.pdf", true),
        ("a/b/c/three.PDF", false),
        ("a/logs/log.pdf", false),
        ("x/node_modules/pkg/manual.pdf", false),
        ("x/Library/cache.pdf", false),
        ("x/.hidden.pdf", false),
        ("y/four.pdf", true),
        ("y/four.pdf.txt", false),
    ];
    for (path, _) in files {
        fs::write(root.join(path), path.as_bytes()).unwrap();
    }

    let (events, count) = collect(&ScanConfig::new(root));
    let expected: BTreeSet<PathBuf> = files
        .iter()
        .filter(|(_, expected)| *expected)
        .map(|(p, _)| root.join(p))
        .collect();

    assert_eq!(found_paths(&events), expected);
    assert_eq!(count, expected.len() as u64);
    assert_eq!(events.iter().filter(|e| e.is_file_found()).count(), expected.len());
}

#[test]
fn test_node_modules_contributes_nothing() {
    let temp = TempDir::new().unwrap();
    let deep = temp.path().join("project/node_modules/a/b/c");
    fs::create_dir_all(&deep).unwrap();
    fs::write(deep.join("doc.pdf"), b"pdf").unwrap();
    fs::write(temp.path().join("project/node_modules/readme.pdf"), b"pdf").unwrap();

    let (events, count) = collect(&ScanConfig::new(temp.path()));
    assert_eq!(count, 0);
    assert!(events.iter().all(|e| !e.path().starts_with(temp.path().join("project/node_modules"))));
}

#[test]
fn test_rescan_is_idempotent() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("x.pdf"), b"first book").unwrap();
    fs::write(temp.path().join("sub/y.pdf"), vec![7u8; 100_000]).unwrap();

    let by_path = |events: Vec<ScanEvent>| -> HashMap<PathBuf, (String, u64)> {
        events
            .into_iter()
            .filter_map(|e| match e {
                ScanEvent::FileFound(r) => {
                    Some((r.absolute_path, (r.content_hash.to_hex().to_string(), r.size_bytes)))
                }
                _ => None,
            })
            .collect()
    };

    let config = ScanConfig::new(temp.path());
    let first = by_path(collect(&config).0);
    let second = by_path(collect(&config).0);

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(first[&temp.path().join("sub/y.pdf")].1, 100_000);
}

#[test]
fn test_same_content_same_hash() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("copy1.pdf"), b"identical").unwrap();
    fs::write(temp.path().join("copy2.pdf"), b"identical").unwrap();
    fs::write(temp.path().join("other.pdf"), b"different").unwrap();

    let (events, _) = collect(&ScanConfig::new(temp.path()));
    let hashes: HashMap<String, String> = events
        .iter()
        .filter_map(ScanEvent::as_record)
        .map(|r| (r.display_name.to_string(), r.content_hash.to_hex().to_string()))
        .collect();

    assert_eq!(hashes["copy1"], hashes["copy2"]);
    assert_ne!(hashes["copy1"], hashes["other"]);
}

#[test]
fn test_blake3_and_custom_extensions() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("book.epub"), b"epub").unwrap();
    fs::write(temp.path().join("book.pdf"), b"pdf").unwrap();

    let config = ScanConfig::builder()
        .root(temp.path())
        .extensions(TargetExtensions::new(["epub"]).unwrap())
        .hash(HashAlgorithm::Blake3)
        .build()
        .unwrap();

    let (events, count) = collect(&config);
    assert_eq!(count, 1);
    let record = events.iter().find_map(ScanEvent::as_record).unwrap();
    assert_eq!(record.extension, ".epub");
    assert_eq!(record.content_hash.to_hex().len(), HashAlgorithm::Blake3.hex_len());
}

#[test]
fn test_root_is_not_normalized() {
    let (_temp, lib) = library_fixture();
    let root = lib.join("..").join("lib");

    let (events, _) = collect(&ScanConfig::new(&root));
    assert_eq!(events[0], ScanEvent::heartbeat(&root));
    let record = events.iter().find_map(ScanEvent::as_record).unwrap();
    assert_eq!(record.absolute_path, root.join("a.pdf"));
}

#[test]
fn test_tagged_callback_interface() {
    let (_temp, lib) = library_fixture();
    let mut seen = Vec::new();
    let mut sink = tagged(|kind, payload| seen.push((kind, payload)));
    let summary = Scanner::new().scan(&ScanConfig::new(&lib), &mut sink);
    drop(sink);

    assert_eq!(summary.matches, 1);
    assert_eq!(seen[0].0, EventKind::Heartbeat);
    assert_eq!(seen[0].1.as_str(), lib.to_str());
    let (kind, payload) = &seen[1];
    assert_eq!(kind.as_ref(), "file-found");
    assert_eq!(payload["sizeBytes"], 10);
    assert_eq!(payload["displayName"], "a");
}

#[test]
fn test_cancellation_returns_partial_count() {
    let temp = TempDir::new().unwrap();
    for i in 0..5 {
        let dir = temp.path().join(format!("d{i}"));
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("book.pdf"), format!("book {i}")).unwrap();
    }

    let token = CancellationToken::new();
    let scanner = Scanner::new().with_cancellation(token.clone());
    let mut found = 0;
    let summary = scanner.scan(&ScanConfig::new(temp.path()), &mut |e: ScanEvent| {
        if e.is_file_found() {
            found += 1;
            token.cancel();
        }
    });

    assert!(summary.cancelled);
    assert_eq!(summary.matches, 1);
    assert_eq!(found, 1);
}

#[cfg(unix)]
mod permissions {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn set_mode(path: &Path, mode: u32) {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    /// Permission bits are not enforced for root; such environments skip.
    fn permissions_enforced(path: &Path) -> bool {
        fs::File::open(path).is_err()
    }

    #[test]
    fn test_unreadable_file_does_not_abort() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("later")).unwrap();
        fs::write(temp.path().join("ok1.pdf"), b"one").unwrap();
        fs::write(temp.path().join("locked.pdf"), b"secret").unwrap();
        fs::write(temp.path().join("later/ok2.pdf"), b"two").unwrap();

        let locked = temp.path().join("locked.pdf");
        set_mode(&locked, 0o000);
        if !permissions_enforced(&locked) {
            set_mode(&locked, 0o644);
            return;
        }

        let (events, count) = collect(&ScanConfig::new(temp.path()));
        set_mode(&locked, 0o644);

        assert_eq!(count, 2);
        let errors: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Error(f) => Some(f),
                _ => None,
            })
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, locked);
        assert!(!found_paths(&events).contains(&locked));
    }

    #[test]
    fn test_unreadable_directory_does_not_abort() {
        let temp = TempDir::new().unwrap();
        let sealed = temp.path().join("sealed");
        fs::create_dir(&sealed).unwrap();
        fs::write(sealed.join("inside.pdf"), b"x").unwrap();
        fs::write(temp.path().join("outside.pdf"), b"y").unwrap();

        set_mode(&sealed, 0o000);
        if fs::read_dir(&sealed).is_ok() {
            set_mode(&sealed, 0o755);
            return;
        }

        let (events, count) = collect(&ScanConfig::new(temp.path()));
        set_mode(&sealed, 0o755);

        assert_eq!(count, 1);
        assert_eq!(events.iter().filter(|e| e.is_error()).count(), 1);
        assert!(found_paths(&events).contains(&temp.path().join("outside.pdf")));
    }
}

#[cfg(unix)]
mod links {
    use super::*;
    use std::os::unix::fs::symlink;

    fn errors(events: &[ScanEvent]) -> Vec<&shelfscan_scan::ScanFailure> {
        events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Error(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_broken_link_does_not_abort() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("z")).unwrap();
        fs::write(root.join("a/one.pdf"), b"one").unwrap();
        fs::write(root.join("two.pdf"), b"two").unwrap();
        fs::write(root.join("z/three.pdf"), b"three").unwrap();
        let dangling = root.join("dangling.pdf");
        symlink(root.join("gone.pdf"), &dangling).unwrap();

        let (events, count) = collect(&ScanConfig::new(root));

        assert_eq!(count, 3);
        let errors = errors(&events);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, dangling);
        assert_eq!(errors[0].kind, FailureKind::EntryInaccessible);
        assert_eq!(
            found_paths(&events),
            BTreeSet::from([
                root.join("a/one.pdf"),
                root.join("two.pdf"),
                root.join("z/three.pdf"),
            ])
        );
    }

    #[test]
    fn test_file_links_found_directory_links_skipped() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        let shelf = temp.path().join("shelf");
        fs::create_dir(&real).unwrap();
        fs::create_dir(&shelf).unwrap();
        fs::write(real.join("book.pdf"), b"zz").unwrap();
        symlink(real.join("book.pdf"), shelf.join("alias.pdf")).unwrap();
        symlink(&real, shelf.join("link")).unwrap();
        symlink(&shelf, shelf.join("loop")).unwrap();

        let (events, count) = collect(&ScanConfig::new(&shelf));

        assert_eq!(count, 1);
        assert!(errors(&events).is_empty());
        let records: Vec<_> = events.iter().filter_map(ScanEvent::as_record).collect();
        assert_eq!(records[0].absolute_path, shelf.join("alias.pdf"));
        assert_eq!(records[0].display_name, "alias");
        assert_eq!(records[0].size_bytes, 2);
        // Directory links are not entered, so only the root heartbeat.
        assert_eq!(events.iter().filter(|e| e.kind() == EventKind::Heartbeat).count(), 1);
    }

    #[test]
    fn test_link_and_target_share_hash() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("book.pdf"), b"same bytes").unwrap();
        symlink(temp.path().join("book.pdf"), temp.path().join("copy.pdf")).unwrap();

        let (events, count) = collect(&ScanConfig::new(temp.path()));

        assert_eq!(count, 2);
        let hashes: BTreeSet<_> = events
            .iter()
            .filter_map(ScanEvent::as_record)
            .map(|r| r.content_hash.clone())
            .collect();
        assert_eq!(hashes.len(), 1);
    }
}

#[tokio::test]
async fn test_background_scan_streams_events() {
    let (_temp, lib) = library_fixture();
    let (mut rx, handle) = start_scan(ScanConfig::new(&lib), CancellationToken::new());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    let summary = handle.await.unwrap();

    assert_eq!(summary.matches, 1);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind(), EventKind::Heartbeat);
    assert_eq!(events[1].kind(), EventKind::FileFound);
}

#[tokio::test]
async fn test_background_scan_cancelled_up_front() {
    let (_temp, lib) = library_fixture();
    let token = CancellationToken::new();
    token.cancel();

    let (mut rx, handle) = start_scan(ScanConfig::new(&lib), token);
    assert!(rx.recv().await.is_none());
    assert!(handle.await.unwrap().cancelled);
}
