/// Bounded depth-first substring search over the snapshot tree.
use crate::model::{Entry, ShallowEntry};

/// Result cap used when the caller does not pass one.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Find entries whose relative path contains `query` (case-sensitive).
///
/// The tree is walked in preorder: an entry is tested before its children,
/// and a directory is descended whether or not it matched itself. At most
/// `limit` entries are returned; the walk stops as soon as the budget runs
/// out.
pub fn search(entries: &[Entry], query: &str, limit: usize) -> Vec<ShallowEntry> {
    let mut results = Vec::with_capacity(limit.min(DEFAULT_SEARCH_LIMIT));
    let mut budget = limit;
    let mut path_buf = String::new();
    collect_matches(entries, query, &mut budget, &mut path_buf, &mut results);
    results
}

/// Preorder walk over an explicit stack of sibling iterators, so tree depth
/// never turns into call depth. `budget` is shared by every level: a match
/// deep in one subtree reduces what later siblings of its ancestors may
/// contribute.
fn collect_matches(
    entries: &[Entry],
    query: &str,
    budget: &mut usize,
    path_buf: &mut String,
    out: &mut Vec<ShallowEntry>,
) {
    let mut levels = vec![entries.iter()];
    while let Some(level) = levels.last_mut() {
        let Some(entry) = level.next() else {
            levels.pop();
            continue;
        };
        if *budget == 0 {
            return;
        }

        if path_contains(entry, query, path_buf) {
            out.push(entry.shallow());
            *budget -= 1;
        }

        if entry.is_dir() && !entry.children.is_empty() {
            levels.push(entry.children.iter());
        }
    }
}

/// Test `directory/filename` against `query` without allocating per entry.
fn path_contains(entry: &Entry, query: &str, buf: &mut String) -> bool {
    if entry.directory.is_empty() {
        return entry.filename.contains(query);
    }
    buf.clear();
    buf.push_str(&entry.directory);
    buf.push('/');
    buf.push_str(&entry.filename);
    buf.contains(query)
}
