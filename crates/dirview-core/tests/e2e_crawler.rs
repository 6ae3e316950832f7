/// End-to-end crawler integration tests.
///
/// These tests run the real `crawler::crawl_with` against a temporary
/// filesystem, verifying that the nested tree mirrors what is on disk,
/// that relative paths are built correctly, and that unreadable or odd
/// entries are tolerated rather than aborting the crawl.
use dirview_core::crawler::{crawl, crawl_with, CrawlOptions};
use dirview_core::model::{Entry, EntryKind};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible directory tree for crawler tests:
///
/// ```text
/// root/
///   alpha/
///     a.txt
///     nested/
///       b.rs
///   beta/
///   d.zip
/// ```
fn build_test_tree(root: &Path) {
    fs::create_dir_all(root.join("alpha/nested")).unwrap();
    fs::create_dir_all(root.join("beta")).unwrap();
    fs::write(root.join("alpha/a.txt"), b"a").unwrap();
    fs::write(root.join("alpha/nested/b.rs"), b"b").unwrap();
    fs::write(root.join("d.zip"), b"d").unwrap();
}

/// Find a child by name; enumeration order is not guaranteed.
fn child<'a>(entries: &'a [Entry], name: &str) -> &'a Entry {
    entries
        .iter()
        .find(|e| e.filename == name)
        .unwrap_or_else(|| panic!("no entry named {name}"))
}

fn sorted_names(entries: &[Entry]) -> Vec<String> {
    let mut names: Vec<String> = entries.iter().map(|e| e.filename.to_string()).collect();
    names.sort();
    names
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// The crawl must mirror every file and directory with correct kinds.
#[test]
fn crawl_discovers_all_entries() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let entries = crawl(tmp.path());
    assert_eq!(sorted_names(&entries), ["alpha", "beta", "d.zip"]);

    let alpha = child(&entries, "alpha");
    assert_eq!(alpha.kind, EntryKind::Directory);
    assert_eq!(sorted_names(&alpha.children), ["a.txt", "nested"]);

    let beta = child(&entries, "beta");
    assert_eq!(beta.kind, EntryKind::Directory);
    assert!(beta.children.is_empty());

    let zip = child(&entries, "d.zip");
    assert_eq!(zip.kind, EntryKind::File);
    assert!(zip.children.is_empty(), "files never carry children");
}

/// Every child's `directory` equals its parent's relative path.
#[test]
fn crawl_builds_relative_directories() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let entries = crawl(tmp.path());
    assert!(entries.iter().all(|e| e.directory.is_empty()));

    let alpha = child(&entries, "alpha");
    assert_eq!(child(&alpha.children, "a.txt").directory, "alpha");

    let nested = child(&alpha.children, "nested");
    assert_eq!(nested.directory, "alpha");
    let b = child(&nested.children, "b.rs");
    assert_eq!(b.directory, "alpha/nested");
    assert_eq!(b.relative_path(), "alpha/nested/b.rs");

    fn check(entries: &[Entry]) {
        for entry in entries {
            for c in &entry.children {
                assert_eq!(c.directory, entry.relative_path());
            }
            check(&entry.children);
        }
    }
    check(&entries);
}

/// Stats must count what the crawl saw.
#[test]
fn crawl_reports_stats() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let output = crawl_with(
        tmp.path(),
        &CrawlOptions {
            follow_symlinks: false,
            threads: 2,
        },
    );
    assert_eq!(output.stats.files, 3);
    assert_eq!(output.stats.directories, 3);
    assert_eq!(output.stats.skipped, 0);
}

/// An empty root yields an empty tree.
#[test]
fn crawl_empty_directory() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    assert!(crawl(tmp.path()).is_empty());
}

/// A missing root is treated as empty rather than an error.
#[test]
fn crawl_missing_root_is_empty() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let output = crawl_with(&tmp.path().join("gone"), &CrawlOptions::default());
    assert!(output.entries.is_empty());
    assert_eq!(output.stats.skipped, 1);
}

/// A file given as the root cannot be enumerated and is treated as empty.
#[test]
fn crawl_file_root_is_empty() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let file = tmp.path().join("plain.txt");
    fs::write(&file, b"x").unwrap();
    assert!(crawl(&file).is_empty());
}

/// A chain of directories nested close to `PATH_MAX` must crawl to the leaf.
#[cfg(target_os = "linux")]
#[test]
fn crawl_handles_very_deep_trees() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let root_len = tmp.path().as_os_str().len();
    // Two bytes per `/d` level, leaving room for the leaf file under 4096.
    let depth = ((4000 - root_len.min(2000)) / 2).min(2000);
    assert!(depth >= 1000, "temp dir path too long for this test");

    let mut dir = tmp.path().to_path_buf();
    for _ in 0..depth {
        dir.push("d");
        fs::create_dir(&dir).unwrap();
    }
    fs::write(dir.join("leaf"), b"x").unwrap();

    for options in [
        CrawlOptions {
            follow_symlinks: false,
            threads: 2,
        },
        CrawlOptions::default(),
    ] {
        let output = crawl_with(tmp.path(), &options);
        assert_eq!(output.stats.directories, depth as u64);
        assert_eq!(output.stats.files, 1);
        assert_eq!(output.stats.skipped, 0);

        let mut level = output.entries.as_slice();
        for _ in 0..depth {
            assert_eq!(level.len(), 1);
            assert_eq!(level[0].kind, EntryKind::Directory);
            level = &level[0].children;
        }
        assert_eq!(level.len(), 1);
        assert_eq!(level[0].filename, "leaf");
        assert_eq!(level[0].directory.len(), depth * 2 - 1);
    }
}

/// An unreadable subdirectory contributes no children; siblings survive.
#[cfg(unix)]
#[test]
fn crawl_unreadable_subdirectory_is_empty() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    let locked = tmp.path().join("alpha");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users bypass permission bits; nothing to test then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let entries = crawl(tmp.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(sorted_names(&entries), ["alpha", "beta", "d.zip"]);
    assert!(child(&entries, "alpha").children.is_empty());
}

/// Symlinks are skipped unless following is enabled.
#[cfg(unix)]
#[test]
fn crawl_skips_symlinks_by_default() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    std::os::unix::fs::symlink(tmp.path().join("d.zip"), tmp.path().join("link.zip")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("alpha"), tmp.path().join("link-dir")).unwrap();

    let output = crawl_with(tmp.path(), &CrawlOptions::default());
    assert_eq!(sorted_names(&output.entries), ["alpha", "beta", "d.zip"]);
    assert_eq!(output.stats.skipped, 2);
}

/// With following enabled, links resolve and broken links are dropped.
#[cfg(unix)]
#[test]
fn crawl_follows_symlinks_when_enabled() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    std::os::unix::fs::symlink(tmp.path().join("d.zip"), tmp.path().join("link.zip")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("alpha"), tmp.path().join("link-dir")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("nowhere"), tmp.path().join("broken")).unwrap();

    let options = CrawlOptions {
        follow_symlinks: true,
        threads: 0,
    };
    let entries = crawl_with(tmp.path(), &options).entries;
    assert_eq!(
        sorted_names(&entries),
        ["alpha", "beta", "d.zip", "link-dir", "link.zip"]
    );
    assert_eq!(child(&entries, "link.zip").kind, EntryKind::File);

    let link_dir = child(&entries, "link-dir");
    assert_eq!(link_dir.kind, EntryKind::Directory);
    assert_eq!(sorted_names(&link_dir.children), ["a.txt", "nested"]);
    assert_eq!(child(&link_dir.children, "a.txt").directory, "link-dir");
}

/// A self-referencing symlink must not recurse forever.
#[cfg(unix)]
#[test]
fn crawl_stops_at_symlink_cycles() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    fs::create_dir_all(tmp.path().join("loop")).unwrap();
    std::os::unix::fs::symlink(tmp.path(), tmp.path().join("loop/back")).unwrap();

    let options = CrawlOptions {
        follow_symlinks: true,
        threads: 0,
    };
    let entries = crawl_with(tmp.path(), &options).entries;
    let lp = child(&entries, "loop");
    let back = child(&lp.children, "back");
    assert_eq!(back.kind, EntryKind::Directory);
    assert!(back.children.is_empty(), "cycle must be cut");
}
