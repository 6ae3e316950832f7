/// Query engine — read-only operations over a snapshot tree.
///
/// Both operations take the tree as a plain slice, so they work on whatever
/// snapshot the caller captured and never touch the filesystem.
pub mod list;
pub mod search;

pub use list::{list, list_path, split_path};
pub use search::{search, DEFAULT_SEARCH_LIMIT};
