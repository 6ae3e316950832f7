/// Crawler module — snapshots a directory tree into memory.
///
/// A crawl is a depth-first recursive read of the root. Sibling
/// subdirectories are read in parallel on a dedicated rayon pool, but the
/// resulting tree keeps filesystem enumeration order at every level.
///
/// The crawl never fails: a directory that cannot be read (missing,
/// permission denied, removed mid-crawl) contributes no children and the
/// walk carries on.
pub mod walk;

use crate::model::Entry;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Stack reserved for each crawl worker. Every directory level costs a
/// recursive walk frame plus rayon's join frames, and a tree can nest close
/// to `PATH_MAX / 2` levels deep.
pub const CRAWL_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Knobs for a single crawl.
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Resolve symlinks instead of skipping them.
    pub follow_symlinks: bool,
    /// Crawl pool worker threads. 0 uses one per CPU.
    pub threads: usize,
}

/// Counters collected during a crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub files: u64,
    pub directories: u64,
    /// Unreadable directories, unreadable dirents, special files and
    /// symlinks that were not followed.
    pub skipped: u64,
    pub duration: Duration,
}

/// The tree produced by a crawl along with its counters.
#[derive(Debug, Clone)]
pub struct CrawlOutput {
    pub entries: Vec<Entry>,
    pub stats: CrawlStats,
}

/// Crawl `root` with default options and return its root-level entries.
pub fn crawl(root: &Path) -> Vec<Entry> {
    crawl_with(root, &CrawlOptions::default()).entries
}

/// Crawl `root` with explicit options.
pub fn crawl_with(root: &Path, options: &CrawlOptions) -> CrawlOutput {
    let start = Instant::now();
    info!("Starting crawl of {}", root.display());

    let walker = walk::Walker::new(root, options.follow_symlinks);

    let entries = match build_pool(options.threads) {
        Some(pool) => pool.install(|| walker.run()),
        None => walker.run(),
    };

    let stats = CrawlStats {
        files: walker.counters.files.load(Ordering::Relaxed),
        directories: walker.counters.directories.load(Ordering::Relaxed),
        skipped: walker.counters.skipped.load(Ordering::Relaxed),
        duration: start.elapsed(),
    };

    info!(
        "Crawl of {} complete: {} files, {} dirs, {} skipped in {:?}",
        root.display(),
        stats.files,
        stats.directories,
        stats.skipped,
        stats.duration
    );

    CrawlOutput { entries, stats }
}

fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    let threads = if threads == 0 { num_cpus::get() } else { threads };
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .stack_size(CRAWL_STACK_SIZE)
        .thread_name(|i| format!("dirview-crawl-{i}"))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!("Failed to build crawl pool ({err}); using the global rayon pool");
            None
        }
    }
}
