//! File lifecycle tracing: open, create, codec selection, close.
//!
//! Events are emitted under the `zfile::io` target. Without the `tracing`
//! feature every hook is an empty inline function.

use std::path::Path;

use crate::compressor::Codec;

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

/// Trace codec resolution for a path.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_select(path: &Path, codec: Codec, derived: bool) {
    trace!(
        target: "zfile::io",
        operation = "select",
        path = %path.display(),
        codec = codec.name(),
        derived = derived,
        "select {} for {}",
        codec,
        path.display()
    );
}

/// Trace codec resolution for a path - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_select(_path: &Path, _codec: Codec, _derived: bool) {}

/// Trace a file opened for reading.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_open(path: &Path, codec: Codec) {
    debug!(
        target: "zfile::io",
        operation = "open",
        path = %path.display(),
        codec = codec.name(),
        "open {} ({})",
        path.display(),
        codec
    );
}

/// Trace a file opened for reading - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_open(_path: &Path, _codec: Codec) {}

/// Trace a file created for writing.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_create(path: &Path, codec: Codec, mode: u32) {
    debug!(
        target: "zfile::io",
        operation = "create",
        path = %path.display(),
        codec = codec.name(),
        mode = mode,
        "create {} ({}, mode {:o})",
        path.display(),
        codec,
        mode
    );
}

/// Trace a file created for writing - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_create(_path: &Path, _codec: Codec, _mode: u32) {}

/// Trace a raw handle released because its codec stream could not be built.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_abandon(path: &Path, codec: Codec) {
    debug!(
        target: "zfile::io",
        operation = "abandon",
        path = %path.display(),
        codec = codec.name(),
        "close {} after {} setup failed",
        path.display(),
        codec
    );
}

/// Trace an abandoned raw handle - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_abandon(_path: &Path, _codec: Codec) {}

/// Trace a layered handle being closed.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_close(path: &Path, codec: Codec, bytes: u64) {
    debug!(
        target: "zfile::io",
        operation = "close",
        path = %path.display(),
        codec = codec.name(),
        bytes = bytes,
        "close {} ({}, {} bytes)",
        path.display(),
        codec,
        bytes
    );
}

/// Trace a layered handle being closed - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_close(_path: &Path, _codec: Codec, _bytes: u64) {}

/// Report a close failure that happened during drop and has nowhere else to go.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn warn_drop_close(path: &Path, error: &crate::ZFileError) {
    warn!(
        target: "zfile::io",
        operation = "close",
        path = %path.display(),
        error = %error,
        "dropping {} without close failed: {}",
        path.display(),
        error
    );
}

/// Report a close failure during drop - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn warn_drop_close(_path: &Path, _error: &crate::ZFileError) {}

/// Report a temporary file that could not be removed after a failed write.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn warn_cleanup(path: &Path, error: &std::io::Error) {
    warn!(
        target: "zfile::io",
        operation = "cleanup",
        path = %path.display(),
        error = %error,
        "leaving {} behind: {}",
        path.display(),
        error
    );
}

/// Report a failed temporary file removal - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn warn_cleanup(_path: &Path, _error: &std::io::Error) {}
