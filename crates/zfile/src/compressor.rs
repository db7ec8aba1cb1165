//! Codec selection: mapping a path suffix or an explicit request to a codec.
//!
//! [`Compressor`] is what callers pass to the entry points. It carries two
//! values that are not real codecs: [`Compressor::Suffix`] asks for the codec
//! to be derived from the path at call time, and [`Compressor::Error`] marks an
//! unrecognised request. Resolution turns a [`Compressor`] into a [`Codec`],
//! the closed set of codecs the adapter understands.

use core::fmt;
use core::str::FromStr;
use std::path::Path;

use crate::error::{ZFileError, ZFileResult};

/// Codecs the adapter can layer over a file handle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Codec {
    /// Plain bytes; the file handle is used directly.
    None,
    /// Gzip (deflate) via `flate2`.
    Gzip,
    /// Zstandard via `zstd`.
    Zstd,
    /// The xz container format via `xz2`.
    Xz,
}

impl Codec {
    /// Every codec, in declaration order.
    pub const ALL: [Self; 4] = [Self::None, Self::Gzip, Self::Zstd, Self::Xz];

    /// Returns the canonical display name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
            Self::Xz => "xz",
        }
    }

    /// Returns the file extension (including the dot) that selects this codec.
    ///
    /// [`Codec::None`] has no extension of its own.
    #[must_use]
    pub const fn extension(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Gzip => Some(".gz"),
            Self::Zstd => Some(".zst"),
            Self::Xz => Some(".xz"),
        }
    }

    /// Returns `true` when a codec stream is layered over the file handle.
    #[must_use]
    pub const fn is_compressed(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codec request accepted by the file entry points.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Compressor {
    /// Derive the codec from the path's extension at call time.
    #[default]
    Suffix,
    /// Force gzip regardless of the path.
    Gzip,
    /// Force Zstandard regardless of the path.
    Zstd,
    /// Force xz regardless of the path.
    Xz,
    /// Force plain, uncompressed I/O.
    None,
    /// An unrecognised request; resolving it fails.
    Error,
}

impl Compressor {
    /// Returns the codec selected by the final extension of `path`.
    ///
    /// Matching is case-sensitive and only the last extension counts, so
    /// `archive.tar.gz` selects gzip. Anything unrecognised selects
    /// [`Codec::None`].
    ///
    /// ```
    /// use zfile::{Codec, Compressor};
    ///
    /// assert_eq!(Compressor::derive("archive.tar.gz"), Codec::Gzip);
    /// assert_eq!(Compressor::derive("notes.GZ"), Codec::None);
    /// ```
    #[must_use]
    pub fn derive(path: impl AsRef<Path>) -> Codec {
        match extension_of(path.as_ref()) {
            Some(b".gz") => Codec::Gzip,
            Some(b".zst") => Codec::Zstd,
            Some(b".xz") => Codec::Xz,
            _ => Codec::None,
        }
    }

    /// Resolves the request against `path`.
    pub fn resolve(self, path: impl AsRef<Path>) -> ZFileResult<Codec> {
        match self {
            Self::Suffix => Ok(Self::derive(path)),
            Self::Gzip => Ok(Codec::Gzip),
            Self::Zstd => Ok(Codec::Zstd),
            Self::Xz => Ok(Codec::Xz),
            Self::None => Ok(Codec::None),
            Self::Error => Err(ZFileError::InvalidCompressor {
                path: path.as_ref().to_path_buf(),
            }),
        }
    }

    /// Parses a codec name, mapping anything unrecognised to
    /// [`Compressor::Error`].
    ///
    /// Use this when the rejection should surface later, at open time. The
    /// [`FromStr`] implementation rejects unknown names immediately instead.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Self::Error)
    }
}

impl From<Codec> for Compressor {
    fn from(codec: Codec) -> Self {
        match codec {
            Codec::None => Self::None,
            Codec::Gzip => Self::Gzip,
            Codec::Zstd => Self::Zstd,
            Codec::Xz => Self::Xz,
        }
    }
}

/// Error returned when parsing an unsupported codec name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompressorParseError {
    input: String,
}

impl CompressorParseError {
    /// Creates a parse error capturing the original input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for CompressorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported compressor: {}", self.input)
    }
}

impl std::error::Error for CompressorParseError {}

impl FromStr for Compressor {
    type Err = CompressorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "suffix" => Ok(Self::Suffix),
            "gz" | "gzip" => Ok(Self::Gzip),
            "zst" | "zstd" => Ok(Self::Zstd),
            "xz" => Ok(Self::Xz),
            "none" | "plain" | "raw" => Ok(Self::None),
            _ => Err(CompressorParseError::new(s)),
        }
    }
}

/// Returns the final extension of the last path component, dot included.
fn extension_of(path: &Path) -> Option<&[u8]> {
    let name = path.file_name()?.as_encoded_bytes();
    let dot = name.iter().rposition(|&byte| byte == b'.')?;
    Some(&name[dot..])
}
