//! Configuration for opening and creating files.

use std::path::Path;

use crate::compressor::Compressor;
use crate::error::ZFileResult;
use crate::file;
use crate::layered::{ZReader, ZWriter};

/// Permission bits applied to newly created files before the umask.
pub const DEFAULT_MODE: u32 = 0o666;

/// Capacity of the read buffer placed between a decoder and the file.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Settings shared by the read and write entry points.
///
/// The free functions in the crate root cover the common cases; this builder
/// exposes the remaining knobs.
///
/// # Examples
///
/// ```no_run
/// use zfile::{Compressor, ZFileOptions};
///
/// # fn main() -> zfile::ZFileResult<()> {
/// let options = ZFileOptions::new()
///     .with_compressor(Compressor::Zstd)
///     .with_mode(0o600)
///     .with_sync_on_close(true);
/// options.write("snapshot.bin", b"payload")?;
/// assert_eq!(options.read("snapshot.bin")?, b"payload");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ZFileOptions {
    /// Codec request; [`Compressor::Suffix`] derives it from each path.
    pub compressor: Compressor,

    /// Permission bits for created files.
    ///
    /// Passed to the operating system unchanged on Unix and ignored
    /// elsewhere.
    pub mode: u32,

    /// Read buffer capacity used when a decoder is layered over the file.
    pub buffer_capacity: usize,

    /// Whether closing a writer also syncs file data to disk.
    pub sync_on_close: bool,
}

impl ZFileOptions {
    /// Creates options with the defaults: suffix-derived codec, mode
    /// [`DEFAULT_MODE`], [`DEFAULT_BUFFER_CAPACITY`], no sync on close.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            compressor: Compressor::Suffix,
            mode: DEFAULT_MODE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            sync_on_close: false,
        }
    }

    /// Sets the codec request.
    #[must_use]
    pub const fn with_compressor(mut self, compressor: Compressor) -> Self {
        self.compressor = compressor;
        self
    }

    /// Sets the permission bits for created files.
    #[must_use]
    pub const fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the decoder read buffer capacity. Zero is raised to one byte.
    #[must_use]
    pub const fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = if capacity == 0 { 1 } else { capacity };
        self
    }

    /// Sets whether closing a writer syncs file data to disk.
    #[must_use]
    pub const fn with_sync_on_close(mut self, sync: bool) -> Self {
        self.sync_on_close = sync;
        self
    }

    /// Opens `path` for reading with these options.
    pub fn open(&self, path: impl AsRef<Path>) -> ZFileResult<ZReader> {
        file::open_with_options(path.as_ref(), self)
    }

    /// Creates `path` for writing with these options.
    pub fn create(&self, path: impl AsRef<Path>) -> ZFileResult<ZWriter> {
        file::create_with_options(path.as_ref(), self)
    }

    /// Reads the whole of `path` with these options.
    pub fn read(&self, path: impl AsRef<Path>) -> ZFileResult<Vec<u8>> {
        file::read_with_options(path.as_ref(), self)
    }

    /// Writes `data` to `path` with these options.
    pub fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> ZFileResult<()> {
        file::write_with_options(path.as_ref(), data, self)
    }
}

impl Default for ZFileOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_codec_from_suffix() {
        let options = ZFileOptions::default();
        assert_eq!(options.compressor, Compressor::Suffix);
        assert_eq!(options.mode, DEFAULT_MODE);
        assert_eq!(options.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert!(!options.sync_on_close);
    }

    #[test]
    fn builder_methods_override_fields() {
        let options = ZFileOptions::new()
            .with_compressor(Compressor::Xz)
            .with_mode(0o640)
            .with_buffer_capacity(4096)
            .with_sync_on_close(true);

        assert_eq!(options.compressor, Compressor::Xz);
        assert_eq!(options.mode, 0o640);
        assert_eq!(options.buffer_capacity, 4096);
        assert!(options.sync_on_close);
    }

    #[test]
    fn zero_buffer_capacity_is_raised() {
        let options = ZFileOptions::new().with_buffer_capacity(0);
        assert_eq!(options.buffer_capacity, 1);
    }
}
