//! Layered handles: a codec stream and its file, closed as one.
//!
//! [`ZReader`] and [`ZWriter`] own both layers of the stack. Only the entry
//! points in this crate can assemble one, and neither ever hands the raw file
//! back to the caller, so the close order below cannot be bypassed.
//!
//! # Close ordering
//!
//! The codec stream is finished before the file is released. Encoders write
//! their trailer during finish, so releasing the file first would truncate the
//! output. When finishing the codec stream fails the file is released anyway
//! and only the codec error is reported.
//!
//! # Repeated close
//!
//! The first [`close`](ZWriter::close) performs the teardown and returns its
//! outcome. Later calls are no-ops returning `Ok(())`. Reads and writes on a
//! closed handle fail with an [`io::Error`]. Dropping a handle that was never
//! closed performs the same teardown and logs a failure instead of returning
//! it.

use std::fmt;
use std::io::{self, IoSlice, IoSliceMut, Read, Write};
use std::path::{Path, PathBuf};

use crate::adapter::{Decoder, Encoder};
use crate::compressor::Codec;
use crate::error::{ZFileError, ZFileResult};
use crate::trace;

/// Readable handle returned by [`open`](crate::open) and friends.
///
/// Bytes read are already decompressed.
pub struct ZReader {
    stream: Option<Decoder>,
    codec: Codec,
    path: PathBuf,
    bytes: u64,
}

impl ZReader {
    pub(crate) fn new(stream: Decoder, codec: Codec, path: PathBuf) -> Self {
        Self {
            stream: Some(stream),
            codec,
            path,
            bytes: 0,
        }
    }

    /// Returns the codec layered over the file.
    #[must_use]
    pub const fn codec(&self) -> Codec {
        self.codec
    }

    /// Returns the path the handle was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of decompressed bytes read so far.
    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.bytes
    }

    /// Returns `true` once [`close`](Self::close) has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Tears down the decoder and then the file.
    pub fn close(&mut self) -> ZFileResult<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        trace::trace_close(&self.path, self.codec, self.bytes);

        let file = stream.finish();
        drop(file);
        Ok(())
    }

    fn stream(&mut self) -> io::Result<&mut Decoder> {
        self.stream.as_mut().ok_or_else(|| closed(&self.path))
    }
}

impl Read for ZReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.stream()?.read(buf)?;
        self.bytes = self.bytes.saturating_add(read as u64);
        Ok(read)
    }

    fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        let read = self.stream()?.read_vectored(bufs)?;
        self.bytes = self.bytes.saturating_add(read as u64);
        Ok(read)
    }
}

impl Drop for ZReader {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            trace::warn_drop_close(&self.path, &error);
        }
    }
}

impl fmt::Debug for ZReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZReader")
            .field("path", &self.path)
            .field("codec", &self.codec)
            .field("bytes", &self.bytes)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Writable handle returned by [`create`](crate::create) and friends.
///
/// Bytes written are compressed before they reach the file. The output is
/// only complete once [`close`](Self::close) has returned `Ok(())`.
pub struct ZWriter {
    stream: Option<Encoder>,
    codec: Codec,
    path: PathBuf,
    bytes: u64,
    sync_on_close: bool,
}

impl ZWriter {
    pub(crate) fn new(stream: Encoder, codec: Codec, path: PathBuf, sync_on_close: bool) -> Self {
        Self {
            stream: Some(stream),
            codec,
            path,
            bytes: 0,
            sync_on_close,
        }
    }

    /// Returns the codec layered over the file.
    #[must_use]
    pub const fn codec(&self) -> Codec {
        self.codec
    }

    /// Returns the path the handle was created at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of uncompressed bytes accepted so far.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Returns `true` once [`close`](Self::close) has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Finishes the encoder, then flushes and releases the file.
    ///
    /// A failure to finish the encoder is reported as
    /// [`ZFileError::Flush`]; the file is still released, and any error it
    /// would have produced is discarded.
    pub fn close(&mut self) -> ZFileResult<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        trace::trace_close(&self.path, self.codec, self.bytes);

        let mut file = stream.finish().map_err(|source| ZFileError::Flush {
            codec: self.codec,
            path: self.path.clone(),
            source,
        })?;
        file.flush()?;
        if self.sync_on_close {
            file.sync_all()?;
        }
        drop(file);
        Ok(())
    }

    fn stream(&mut self) -> io::Result<&mut Encoder> {
        self.stream.as_mut().ok_or_else(|| closed(&self.path))
    }
}

impl Write for ZWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.stream()?.write(buf)?;
        self.bytes = self.bytes.saturating_add(written as u64);
        Ok(written)
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        let written = self.stream()?.write_vectored(bufs)?;
        self.bytes = self.bytes.saturating_add(written as u64);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream()?.flush()
    }
}

impl Drop for ZWriter {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            trace::warn_drop_close(&self.path, &error);
        }
    }
}

impl fmt::Debug for ZWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZWriter")
            .field("path", &self.path)
            .field("codec", &self.codec)
            .field("bytes", &self.bytes)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn closed(path: &Path) -> io::Error {
    io::Error::other(format!("{} is already closed", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{wrap_decoder, wrap_encoder};
    use std::fs::File;

    fn writer_for(dir: &tempfile::TempDir, name: &str, codec: Codec) -> ZWriter {
        let path = dir.path().join(name);
        let file = File::create(&path).expect("create");
        let stream = wrap_encoder(file, codec, &path).expect("encoder");
        ZWriter::new(stream, codec, path, false)
    }

    #[test]
    fn writer_counts_uncompressed_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut writer = writer_for(&dir, "count.zst", Codec::Zstd);
        writer.write_all(b"twelve bytes").expect("write");

        assert_eq!(writer.bytes_written(), 12);
        writer.close().expect("close");
    }

    #[test]
    fn repeated_close_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut writer = writer_for(&dir, "twice.gz", Codec::Gzip);
        writer.write_all(b"payload").expect("write");

        writer.close().expect("first close");
        assert!(writer.is_closed());
        writer.close().expect("second close");
    }

    #[test]
    fn write_after_close_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut writer = writer_for(&dir, "closed.xz", Codec::Xz);
        writer.close().expect("close");

        let err = writer.write(b"late").expect_err("closed handle");
        assert!(err.to_string().contains("already closed"));
        assert!(writer.flush().is_err());
    }

    #[test]
    fn read_after_close_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plain");
        std::fs::write(&path, b"plain").expect("seed");
        let file = File::open(&path).expect("open");
        let stream = wrap_decoder(file, Codec::None, &path, 1024).expect("decoder");
        let mut reader = ZReader::new(stream, Codec::None, path);

        let mut buf = [0u8; 5];
        reader.read_exact(&mut buf).expect("read");
        assert_eq!(reader.bytes_read(), 5);

        reader.close().expect("close");
        assert!(reader.read(&mut buf).is_err());
    }

    #[test]
    fn debug_output_names_the_handle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = writer_for(&dir, "debug.gz", Codec::Gzip);
        let debug = format!("{writer:?}");

        assert!(debug.contains("ZWriter"));
        assert!(debug.contains("Gzip"));
    }
}
