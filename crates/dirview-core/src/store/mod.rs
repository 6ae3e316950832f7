/// Snapshot store — owns the snapshot currently being served.
///
/// The store holds an `Arc<Snapshot>` behind a `parking_lot::RwLock`. The
/// lock only guards the pointer: readers clone the `Arc` and release the
/// lock immediately, then query the immutable tree at leisure. A refresh
/// crawls *without* holding the lock and swaps the pointer in one short
/// write, so a query sees either the old tree or the new one, never a mix.
pub mod refresh;

use crate::config::CacheConfig;
use crate::crawler::{self, CrawlOptions};
use crate::model::{ShallowEntry, Snapshot, SnapshotStatus};
use crate::query;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub use refresh::RefreshWorker;

pub struct SnapshotStore {
    root: PathBuf,
    options: CrawlOptions,
    current: RwLock<Arc<Snapshot>>,
    /// Serialises refreshes so two crawls never race to publish.
    refresh_lock: Mutex<()>,
}

impl SnapshotStore {
    /// Crawl the configured root synchronously and return a ready store.
    pub fn open(config: &CacheConfig) -> Self {
        let options = CrawlOptions {
            follow_symlinks: config.follow_symlinks,
            threads: config.crawl_threads,
        };
        let initial = build_snapshot(&config.root, &options, 1);

        Self {
            root: config.root.clone(),
            options,
            current: RwLock::new(Arc::new(initial)),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Directory this store crawls.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The snapshot in effect right now. Holding the returned `Arc` pins that
    /// snapshot even if a refresh publishes a newer one meanwhile.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Re-crawl the root and publish the result. Returns the new snapshot.
    pub fn refresh(&self) -> Arc<Snapshot> {
        let _guard = self.refresh_lock.lock();
        let generation = self.current.read().generation + 1;

        let fresh = Arc::new(build_snapshot(&self.root, &self.options, generation));
        *self.current.write() = Arc::clone(&fresh);

        info!(
            "Published snapshot generation {} ({} entries)",
            generation,
            fresh.len()
        );
        fresh
    }

    /// List the directory addressed by `segments` in the current snapshot.
    pub fn list<S: AsRef<str>>(&self, segments: &[S]) -> Vec<ShallowEntry> {
        let snapshot = self.current();
        query::list(&snapshot.entries, segments)
    }

    /// [`SnapshotStore::list`] for a raw `/`-separated path.
    pub fn list_path(&self, raw: &str) -> Vec<ShallowEntry> {
        let snapshot = self.current();
        query::list_path(&snapshot.entries, raw)
    }

    /// Search the current snapshot. `limit` defaults to
    /// [`query::DEFAULT_SEARCH_LIMIT`].
    pub fn search(&self, pattern: &str, limit: Option<usize>) -> Vec<ShallowEntry> {
        let snapshot = self.current();
        query::search(
            &snapshot.entries,
            pattern,
            limit.unwrap_or(query::DEFAULT_SEARCH_LIMIT),
        )
    }

    pub fn status(&self) -> SnapshotStatus {
        self.current().status()
    }
}

fn build_snapshot(root: &Path, options: &CrawlOptions, generation: u64) -> Snapshot {
    let output = crawler::crawl_with(root, options);
    Snapshot {
        root: root.to_path_buf(),
        entries: output.entries,
        crawled_at: Utc::now(),
        generation,
        stats: output.stats,
    }
}
