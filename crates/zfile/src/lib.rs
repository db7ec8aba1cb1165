#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `zfile` opens and creates files with de/compression chosen by the file's
//! extension. Callers write extension-agnostic code and change the output
//! format by renaming a path: `file.gz` is gzip, `file.zst` is Zstandard,
//! `file.xz` is xz, and anything else is read and written as-is.
//!
//! # Design
//!
//! The crate is a thin dispatch layer over [`flate2`](https://docs.rs/flate2),
//! [`zstd`](https://docs.rs/zstd) and [`xz2`](https://docs.rs/xz2):
//!
//! - [`Compressor`] and [`Codec`] select the codec, either from the path or
//!   from an explicit request that overrides the extension.
//! - The adapter layers the codec's decoder or encoder over the raw [`File`](std::fs::File).
//! - [`ZReader`] and [`ZWriter`] own both layers and release them in order.
//! - The free functions ([`open`], [`create`], [`read`], [`write`] and their
//!   `_with` variants) and [`ZFileOptions`] are the entry points.
//!
//! # Invariants
//!
//! - The raw file never escapes once a codec stream has been built over it.
//! - Closing finishes the codec stream before releasing the file, so encoder
//!   trailers always reach the disk.
//! - A failed open or create releases everything it had opened.
//! - Encoders use a fixed best-compression policy; there are no levels.
//!
//! # Errors
//!
//! Operations return [`ZFileResult`]. [`ZFileError`] distinguishes a missing
//! or inaccessible file, a malformed codec header (detected at open time), a
//! mid-stream I/O failure, and a failure to finish the compressed stream.
//! [`ZReader`] and [`ZWriter`] implement [`std::io::Read`] and
//! [`std::io::Write`], where errors surface as [`std::io::Error`].
//!
//! # Examples
//!
//! ```
//! # fn main() -> zfile::ZFileResult<()> {
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("greeting.txt.gz");
//!
//! zfile::write(&path, b"This is a test", 0o644)?;
//! assert_eq!(zfile::read(&path)?, b"This is a test");
//!
//! // An explicit codec overrides the extension.
//! let raw = dir.path().join("greeting.bin");
//! zfile::write_with(&raw, b"This is a test", 0o644, zfile::Compressor::Zstd)?;
//! assert_eq!(zfile::read_with(&raw, zfile::Compressor::Zstd)?, b"This is a test");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod compressor;
pub mod error;
mod file;
pub mod layered;
pub mod options;
mod trace;

pub use compressor::{Codec, Compressor, CompressorParseError};
pub use error::{ZFileError, ZFileResult};
pub use file::{
    TEMP_SUFFIX, create, create_with, open, open_with, read, read_with, write, write_atomic,
    write_with,
};
pub use layered::{ZReader, ZWriter};
pub use options::{DEFAULT_BUFFER_CAPACITY, DEFAULT_MODE, ZFileOptions};
