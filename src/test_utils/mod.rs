//! Test helpers shared by unit and integration tests.
//!
//! Available with `cfg(test)` or the `test-utils` feature.
//!
//! - [`init_test_logging`] - one-time tracing setup writing through the test harness
//! - [`zip_bytes`] / [`ArchiveEntry`] - in-memory release archives
//! - [`write_tree`] / [`read_tree`] - create and snapshot directory trees

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// With `Some(level)` that level is used; otherwise `RUST_LOG` is honored when
/// set and logging stays off when it is not. Only the first call has an effect.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// One entry of an archive built by [`zip_bytes`].
#[derive(Debug, Clone)]
pub enum ArchiveEntry {
    /// A file with its contents and optional Unix permission bits.
    File {
        name: String,
        contents: Vec<u8>,
        mode: Option<u32>,
    },
    /// An explicit directory entry.
    Dir(String),
}

impl ArchiveEntry {
    pub fn file(name: &str, contents: impl AsRef<[u8]>) -> Self {
        Self::File {
            name: name.to_string(),
            contents: contents.as_ref().to_vec(),
            mode: None,
        }
    }

    pub fn executable(name: &str, contents: impl AsRef<[u8]>) -> Self {
        Self::File {
            name: name.to_string(),
            contents: contents.as_ref().to_vec(),
            mode: Some(0o755),
        }
    }

    pub fn dir(name: &str) -> Self {
        Self::Dir(name.to_string())
    }
}

/// Build a zip archive in memory.
///
/// Entry names are written verbatim, so unsafe names such as `../evil.txt`
/// can be produced for extraction tests.
pub fn zip_bytes(entries: &[ArchiveEntry]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries {
        match entry {
            ArchiveEntry::File {
                name,
                contents,
                mode,
            } => {
                let mut options = SimpleFileOptions::default();
                if let Some(mode) = mode {
                    options = options.unix_permissions(*mode);
                }
                writer.start_file(name.as_str(), options).unwrap();
                writer.write_all(contents).unwrap();
            }
            ArchiveEntry::Dir(name) => {
                writer.add_directory(name.as_str(), SimpleFileOptions::default()).unwrap();
            }
        }
    }

    writer.finish().unwrap().into_inner()
}

/// Convenience wrapper around [`zip_bytes`] for plain files.
pub fn zip_files(files: &[(&str, &str)]) -> Vec<u8> {
    let entries: Vec<ArchiveEntry> =
        files.iter().map(|(name, contents)| ArchiveEntry::file(name, contents)).collect();
    zip_bytes(&entries)
}

/// Create files (and their parent directories) under `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(root).unwrap();
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
}

/// Snapshot every file under `root` as `relative path -> contents`.
///
/// Paths use `/` separators. Directories appear with a trailing `/` and empty
/// contents so empty directories are part of the comparison.
pub fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut snapshot = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.unwrap();
        let relative = entry.path().strip_prefix(root).unwrap();
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if entry.file_type().is_dir() {
            snapshot.insert(format!("{key}/"), Vec::new());
        } else {
            snapshot.insert(key, std::fs::read(entry.path()).unwrap());
        }
    }
    snapshot
}
