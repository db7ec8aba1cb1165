//! Error types for zfile operations.
//!
//! Every failure keeps its underlying [`io::Error`] as the source so callers
//! can inspect the operating system's view, while the variant tells them which
//! stage failed: opening the file, recognising the codec header, moving bytes,
//! or finishing the codec stream.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::compressor::Codec;

/// Result type for zfile operations.
pub type ZFileResult<T> = Result<T, ZFileError>;

/// Errors that can occur while opening, transferring or closing a file.
#[derive(Debug, Error)]
pub enum ZFileError {
    /// The file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Path that was opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file exists but may not be opened with the requested access.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// Path that was opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Any other operating system error while opening or creating the file.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path that was opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The caller explicitly requested [`Compressor::Error`](crate::Compressor::Error).
    #[error("invalid compressor requested for {}", path.display())]
    InvalidCompressor {
        /// Path the request was made for.
        path: PathBuf,
    },

    /// The codec stream could not be set up.
    ///
    /// For decoders this means the header is truncated or does not carry the
    /// codec's magic bytes; it is reported at open time, before any read.
    /// Failures to read the header at all are [`ZFileError::Io`].
    #[error("{codec} stream in {} could not be initialised: {source}", path.display())]
    CodecInit {
        /// Codec that was being layered over the file.
        codec: Codec,
        /// Path of the file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A read or write failed part-way through the stream.
    #[error("I/O error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),

    /// The codec stream failed to write its trailer while closing.
    #[error("failed to finish {codec} stream for {}: {source}", path.display())]
    Flush {
        /// Codec whose stream failed to finish.
        codec: Codec,
        /// Path of the file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl ZFileError {
    /// Categorises an error from opening or creating `path`.
    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Open { path, source },
        }
    }

    pub(crate) fn codec_init(codec: Codec, path: &Path, source: io::Error) -> Self {
        Self::CodecInit {
            codec,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the [`io::ErrorKind`] that best describes this error.
    #[must_use]
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::NotFound { .. } => io::ErrorKind::NotFound,
            Self::PermissionDenied { .. } => io::ErrorKind::PermissionDenied,
            Self::InvalidCompressor { .. } => io::ErrorKind::InvalidInput,
            Self::Open { source, .. }
            | Self::CodecInit { source, .. }
            | Self::Io(source)
            | Self::Flush { source, .. } => source.kind(),
        }
    }

    /// Returns `true` when the file did not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` when a codec header was rejected or an encoder could not
    /// be created.
    #[must_use]
    pub const fn is_codec_init(&self) -> bool {
        matches!(self, Self::CodecInit { .. })
    }

    /// Returns the path the error refers to, when known.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path, .. }
            | Self::PermissionDenied { path, .. }
            | Self::Open { path, .. }
            | Self::InvalidCompressor { path }
            | Self::CodecInit { path, .. }
            | Self::Flush { path, .. } => Some(path),
            Self::Io(_) => None,
        }
    }
}

impl From<ZFileError> for io::Error {
    fn from(error: ZFileError) -> Self {
        match error {
            ZFileError::Io(source) => source,
            other => Self::new(other.io_kind(), other),
        }
    }
}
