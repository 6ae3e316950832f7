/// A single file or directory captured by a crawl.
///
/// Entries are immutable once built. A directory owns its children directly,
/// so a whole snapshot is one nested `Vec<Entry>` that can be shared between
/// readers behind an `Arc` without any locking.
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Whether an entry is a plain file or a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One node of the crawled tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Parent path relative to the crawl root, `/`-separated.
    /// Empty for entries directly under the root.
    pub directory: CompactString,

    /// Base name of the file or directory.
    pub filename: CompactString,

    /// File or directory.
    pub kind: EntryKind,

    /// Children in filesystem enumeration order. Always empty for files.
    pub children: Vec<Entry>,
}

impl Entry {
    /// Create a file entry.
    pub fn file(directory: impl Into<CompactString>, filename: impl Into<CompactString>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            kind: EntryKind::File,
            children: Vec::new(),
        }
    }

    /// Create a directory entry owning `children`.
    pub fn directory(
        directory: impl Into<CompactString>,
        filename: impl Into<CompactString>,
        children: Vec<Entry>,
    ) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            kind: EntryKind::Directory,
            children,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Full path relative to the crawl root (`directory` joined with `filename`).
    pub fn relative_path(&self) -> CompactString {
        join_relative(&self.directory, &self.filename)
    }

    /// Copy of this entry without its subtree.
    pub fn shallow(&self) -> ShallowEntry {
        ShallowEntry {
            directory: self.directory.clone(),
            filename: self.filename.clone(),
            kind: self.kind,
        }
    }
}

// Dropping a deep subtree through the derived glue recurses once per level.
// Flatten it onto the heap instead.
impl Drop for Entry {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut entry) = pending.pop() {
            pending.append(&mut entry.children);
        }
    }
}

/// An entry as returned by list and search: the node without its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShallowEntry {
    pub directory: CompactString,
    pub filename: CompactString,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl ShallowEntry {
    pub fn relative_path(&self) -> CompactString {
        join_relative(&self.directory, &self.filename)
    }
}

/// Join a relative prefix and a name with `/`; an empty prefix adds no separator.
pub fn join_relative(prefix: &str, name: &str) -> CompactString {
    if prefix.is_empty() {
        CompactString::new(name)
    } else {
        let mut joined = CompactString::with_capacity(prefix.len() + 1 + name.len());
        joined.push_str(prefix);
        joined.push('/');
        joined.push_str(name);
        joined
    }
}
