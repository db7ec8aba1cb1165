//! Shared test utilities for the zfile workspace.
//!
//! - [`ScratchDir`] wraps a [`tempfile::TempDir`] with helpers for building
//!   paths and seeding files.
//! - [`open_descriptor_count`] reports how many file descriptors the current
//!   process holds, where the platform exposes it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary directory removed when dropped.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Creates a fresh scratch directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Returns the directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of `name` inside the directory.
    #[must_use]
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes `contents` to `name` without any compression and returns its path.
    pub fn seed(&self, name: impl AsRef<Path>, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Returns the number of open file descriptors in this process.
///
/// Reads `/proc/self/fd` (Linux) or `/dev/fd` (macOS and the BSDs). Returns
/// `None` where neither is available. Other threads opening files at the same
/// time skew the count, so callers should measure from a single-threaded test.
#[must_use]
pub fn open_descriptor_count() -> Option<usize> {
    ["/proc/self/fd", "/dev/fd"]
        .into_iter()
        .find_map(|dir| fs::read_dir(dir).ok())
        // The directory handle being iterated appears in its own listing.
        .map(|entries| entries.count().saturating_sub(1))
}
