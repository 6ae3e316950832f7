/// Directory listing by path-segment descent.
use crate::model::{Entry, ShallowEntry};

/// List the children of the directory addressed by `segments`.
///
/// Empty segments are ignored. A segment that names nothing, or names a
/// file, resolves to an empty listing. Returned entries carry no subtree.
pub fn list<S: AsRef<str>>(entries: &[Entry], segments: &[S]) -> Vec<ShallowEntry> {
    let mut current = entries;

    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        match current.iter().find(|entry| entry.filename == segment) {
            Some(entry) if entry.is_dir() => current = &entry.children,
            _ => return Vec::new(),
        }
    }

    current.iter().map(Entry::shallow).collect()
}

/// Split a raw `/`-separated path into segments, dropping empty ones.
pub fn split_path(raw: &str) -> Vec<&str> {
    raw.split('/').filter(|s| !s.is_empty()).collect()
}

/// [`list`] for a raw path string such as `"sub/deeper/"`.
pub fn list_path(entries: &[Entry], raw: &str) -> Vec<ShallowEntry> {
    list(entries, &split_path(raw))
}
