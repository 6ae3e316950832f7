/// DirView Core — crawling, snapshot caching, and queries.
///
/// This crate contains all business logic with zero HTTP dependencies.
/// Frontends (the HTTP server, tests, a future CLI) talk to it through
/// [`store::SnapshotStore`].
///
/// # Modules
///
/// - [`model`] — Immutable entry tree and snapshot types.
/// - [`crawler`] — Recursive filesystem crawl that builds the tree.
/// - [`store`] — Swappable current snapshot and its refresh worker.
/// - [`query`] — Directory listing and bounded substring search.
/// - [`config`] — Environment-driven configuration.
pub mod config;
pub mod crawler;
pub mod model;
pub mod query;
pub mod store;

pub use config::{CacheConfig, ConfigError};
pub use model::{Entry, EntryKind, ShallowEntry, Snapshot, SnapshotStatus};
pub use store::{RefreshWorker, SnapshotStore};
