//! Shared helpers
//!
//! - [`fs`] - directory tree copy and removal used by backups and restores
//! - [`sort`] - natural sort order for backup names
//! - [`progress`] - progress bars for the command-line front end

pub mod fs;
pub mod progress;
pub mod sort;

pub use fs::{copy_dir, ensure_dir, ensure_parent_dir, remove_dir_all, run_blocking};
pub use progress::{ProgressBar, ProgressStyle};
pub use sort::{NaturalKey, natural_cmp, natural_sort_key};
