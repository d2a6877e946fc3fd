//! Dev-mode support.

mod watcher;

pub use watcher::{FileWatcher, WatchFilter};
