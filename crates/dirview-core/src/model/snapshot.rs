/// The tree produced by one crawl, plus bookkeeping about that crawl.
use super::entry::Entry;
use crate::crawler::CrawlStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// An immutable crawl result. Shared with readers behind an `Arc`; a refresh
/// builds a new `Snapshot` rather than editing this one.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Directory the crawl started from.
    pub root: PathBuf,

    /// Root-level entries in enumeration order.
    pub entries: Vec<Entry>,

    /// Wall-clock time the crawl finished.
    pub crawled_at: DateTime<Utc>,

    /// 1 for the start-up crawl, incremented on every refresh.
    pub generation: u64,

    pub stats: CrawlStats,
}

impl Snapshot {
    /// Total number of entries at every depth.
    pub fn len(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![self.entries.as_slice()];
        while let Some(level) = pending.pop() {
            total += level.len();
            pending.extend(level.iter().map(|e| e.children.as_slice()));
        }
        total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialisable summary for status reporting.
    pub fn status(&self) -> SnapshotStatus {
        SnapshotStatus {
            root: self.root.to_string_lossy().into_owned(),
            generation: self.generation,
            crawled_at: self.crawled_at,
            files: self.stats.files,
            directories: self.stats.directories,
            skipped: self.stats.skipped,
            crawl_duration_ms: self.stats.duration.as_millis() as u64,
        }
    }
}

/// Summary of the snapshot currently being served.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStatus {
    pub root: String,
    pub generation: u64,
    pub crawled_at: DateTime<Utc>,
    pub files: u64,
    pub directories: u64,
    pub skipped: u64,
    pub crawl_duration_ms: u64,
}
