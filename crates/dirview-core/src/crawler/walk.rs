/// Recursive directory walk that builds the nested `Entry` tree.
///
/// Each directory is enumerated sequentially (to keep enumeration order),
/// then its subdirectories are descended in parallel with an
/// order-preserving `collect`.
use crate::model::{join_relative, Entry};
use compact_str::CompactString;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Default)]
pub struct Counters {
    pub files: AtomicU64,
    pub directories: AtomicU64,
    pub skipped: AtomicU64,
}

/// What one dirent turned into after classification.
enum Child {
    File(CompactString),
    Dir(CompactString, PathBuf),
}

pub struct Walker<'a> {
    root: &'a Path,
    follow_symlinks: bool,
    pub counters: Counters,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path, follow_symlinks: bool) -> Self {
        Self {
            root,
            follow_symlinks,
            counters: Counters::default(),
        }
    }

    /// Walk from the root. Runs on whichever rayon pool is current.
    pub fn run(&self) -> Vec<Entry> {
        // The ancestor chain is only needed for cycle detection.
        let ancestors = if self.follow_symlinks {
            fs::canonicalize(self.root).map(|p| vec![p]).unwrap_or_default()
        } else {
            Vec::new()
        };
        self.walk_dir(self.root, "", &ancestors)
    }

    fn walk_dir(&self, dir: &Path, prefix: &str, ancestors: &[PathBuf]) -> Vec<Entry> {
        let children = self.read_children(dir);

        children
            .into_par_iter()
            .map(|child| match child {
                Child::File(name) => Entry::file(prefix, name),
                Child::Dir(name, path) => {
                    let child_prefix = join_relative(prefix, &name);
                    let grandchildren = self.descend(&path, &child_prefix, ancestors);
                    Entry::directory(prefix, name, grandchildren)
                }
            })
            .collect()
    }

    fn descend(&self, path: &Path, prefix: &str, ancestors: &[PathBuf]) -> Vec<Entry> {
        if !self.follow_symlinks {
            return self.walk_dir(path, prefix, ancestors);
        }

        let canonical = match fs::canonicalize(path) {
            Ok(p) => p,
            Err(err) => {
                debug!("Cannot resolve {}: {err}", path.display());
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                return Vec::new();
            }
        };
        if ancestors.contains(&canonical) {
            debug!("Symlink cycle at {}; not descending", path.display());
            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            return Vec::new();
        }

        let mut chain = Vec::with_capacity(ancestors.len() + 1);
        chain.extend_from_slice(ancestors);
        chain.push(canonical);
        self.walk_dir(path, prefix, &chain)
    }

    /// Enumerate and classify the immediate children of `dir`.
    /// An unreadable directory yields nothing.
    fn read_children(&self, dir: &Path) -> Vec<Child> {
        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(err) => {
                debug!("Cannot read {}: {err}", dir.display());
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                return Vec::new();
            }
        };

        let mut children = Vec::new();
        for item in read_dir {
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    debug!("Cannot read entry in {}: {err}", dir.display());
                    self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            let file_type = match item.file_type() {
                Ok(ft) => ft,
                Err(_) => {
                    self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            let name = CompactString::new(item.file_name().to_string_lossy());

            let (is_file, is_dir) = if file_type.is_symlink() {
                if !self.follow_symlinks {
                    self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
                // Follow the link; a dangling link has no metadata.
                match fs::metadata(item.path()) {
                    Ok(meta) => (meta.is_file(), meta.is_dir()),
                    Err(_) => (false, false),
                }
            } else {
                (file_type.is_file(), file_type.is_dir())
            };

            if is_file {
                self.counters.files.fetch_add(1, Ordering::Relaxed);
                children.push(Child::File(name));
            } else if is_dir {
                self.counters.directories.fetch_add(1, Ordering::Relaxed);
                children.push(Child::Dir(name, item.path()));
            } else {
                // Sockets, devices, fifos, broken links.
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            }
        }
        children
    }
}
