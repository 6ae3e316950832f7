/// Data model for the DirView snapshot tree.
///
/// Re-exports the nested entry tree and the snapshot wrapper.
pub mod entry;
pub mod snapshot;

pub use entry::{join_relative, Entry, EntryKind, ShallowEntry};
pub use snapshot::{Snapshot, SnapshotStatus};
