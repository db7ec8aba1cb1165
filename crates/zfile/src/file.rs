//! File entry points.
//!
//! Each operation resolves the codec, opens the raw file, layers the codec
//! stream over it and hands back a [`ZReader`] or [`ZWriter`]. When the codec
//! stream cannot be built the raw file is released before the error is
//! returned.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::adapter::{wrap_decoder, wrap_encoder};
use crate::compressor::{Codec, Compressor};
use crate::error::{ZFileError, ZFileResult};
use crate::layered::{ZReader, ZWriter};
use crate::options::{DEFAULT_MODE, ZFileOptions};
use crate::trace;

/// Suffix appended to the destination path by [`write_atomic`].
pub const TEMP_SUFFIX: &str = ".tmp";

/// Opens `path` for reading, decompressing according to its extension.
///
/// `open("file.gz")` yields the decompressed contents of a gzip file; a path
/// without a recognised extension is read as-is.
///
/// # Examples
///
/// ```no_run
/// use std::io::Read;
///
/// # fn main() -> zfile::ZFileResult<()> {
/// let mut reader = zfile::open("events.jsonl.zst")?;
/// let mut text = String::new();
/// reader.read_to_string(&mut text)?;
/// reader.close()?;
/// # Ok(())
/// # }
/// ```
pub fn open(path: impl AsRef<Path>) -> ZFileResult<ZReader> {
    open_with(path, Compressor::Suffix)
}

/// Like [`open`], with an explicit codec request.
pub fn open_with(path: impl AsRef<Path>, compressor: Compressor) -> ZFileResult<ZReader> {
    open_with_options(
        path.as_ref(),
        &ZFileOptions::new().with_compressor(compressor),
    )
}

/// Reads the whole of `path`, decompressing according to its extension.
pub fn read(path: impl AsRef<Path>) -> ZFileResult<Vec<u8>> {
    read_with(path, Compressor::Suffix)
}

/// Like [`read`], with an explicit codec request.
pub fn read_with(path: impl AsRef<Path>, compressor: Compressor) -> ZFileResult<Vec<u8>> {
    read_with_options(
        path.as_ref(),
        &ZFileOptions::new().with_compressor(compressor),
    )
}

/// Creates `path` for writing, compressing according to its extension.
///
/// Existing content is truncated. New files get mode `0o666` before the
/// umask.
pub fn create(path: impl AsRef<Path>) -> ZFileResult<ZWriter> {
    create_with(path, DEFAULT_MODE, Compressor::Suffix)
}

/// Like [`create`], with explicit permission bits and codec request.
pub fn create_with(
    path: impl AsRef<Path>,
    mode: u32,
    compressor: Compressor,
) -> ZFileResult<ZWriter> {
    create_with_options(
        path.as_ref(),
        &ZFileOptions::new()
            .with_mode(mode)
            .with_compressor(compressor),
    )
}

/// Writes `data` to `path`, compressing according to its extension.
///
/// The handle is closed before returning, and a failure to finish the
/// compressed stream is this call's error.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> zfile::ZFileResult<()> {
/// zfile::write("report.txt.gz", b"This is a test", 0o644)?;
/// assert_eq!(zfile::read("report.txt.gz")?, b"This is a test");
/// # Ok(())
/// # }
/// ```
pub fn write(path: impl AsRef<Path>, data: &[u8], mode: u32) -> ZFileResult<()> {
    write_with(path, data, mode, Compressor::Suffix)
}

/// Like [`write`], with an explicit codec request.
///
/// Useful when the destination name differs from the name the data is
/// written under, e.g. a temporary file that is renamed into place later.
pub fn write_with(
    path: impl AsRef<Path>,
    data: &[u8],
    mode: u32,
    compressor: Compressor,
) -> ZFileResult<()> {
    write_with_options(
        path.as_ref(),
        data,
        &ZFileOptions::new()
            .with_mode(mode)
            .with_compressor(compressor),
    )
}

/// Writes `data` beside `path` and renames it into place.
///
/// The data goes to `path` with [`TEMP_SUFFIX`] appended, compressed with the
/// codec derived from `path` itself, and is renamed over `path` once closed.
/// If anything fails the temporary file is removed; when that removal fails
/// too, a warning is logged and the write error is returned.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8], mode: u32) -> ZFileResult<()> {
    let path = path.as_ref();
    let temp = temp_path(path);

    let result = write_with(&temp, data, mode, Compressor::from(Compressor::derive(path)))
        .and_then(|()| fs::rename(&temp, path).map_err(ZFileError::from));
    if result.is_err()
        && let Err(error) = fs::remove_file(&temp)
        && error.kind() != ErrorKind::NotFound
    {
        trace::warn_cleanup(&temp, &error);
    }
    result
}

pub(crate) fn open_with_options(path: &Path, options: &ZFileOptions) -> ZFileResult<ZReader> {
    let codec = resolve(path, options.compressor)?;

    let raw = File::open(path).map_err(|e| ZFileError::open(path, e))?;
    trace::trace_open(path, codec);

    let stream = wrap_decoder(raw, codec, path, options.buffer_capacity).inspect_err(|_| {
        trace::trace_abandon(path, codec);
    })?;
    Ok(ZReader::new(stream, codec, path.to_path_buf()))
}

pub(crate) fn create_with_options(path: &Path, options: &ZFileOptions) -> ZFileResult<ZWriter> {
    let codec = resolve(path, options.compressor)?;

    let raw = create_raw(path, options.mode).map_err(|e| ZFileError::open(path, e))?;
    trace::trace_create(path, codec, options.mode);

    let stream = wrap_encoder(raw, codec, path).inspect_err(|_| {
        trace::trace_abandon(path, codec);
    })?;
    Ok(ZWriter::new(
        stream,
        codec,
        path.to_path_buf(),
        options.sync_on_close,
    ))
}

pub(crate) fn read_with_options(path: &Path, options: &ZFileOptions) -> ZFileResult<Vec<u8>> {
    let mut reader = open_with_options(path, options)?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    reader.close()?;
    Ok(data)
}

pub(crate) fn write_with_options(
    path: &Path,
    data: &[u8],
    options: &ZFileOptions,
) -> ZFileResult<()> {
    let mut writer = create_with_options(path, options)?;
    writer.write_all(data)?;
    writer.close()
}

fn resolve(path: &Path, compressor: Compressor) -> ZFileResult<Codec> {
    let codec = compressor.resolve(path)?;
    trace::trace_select(path, codec, compressor == Compressor::Suffix);
    Ok(codec)
}

#[cfg(unix)]
fn create_raw(path: &Path, mode: u32) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn create_raw(path: &Path, _mode: u32) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}
