//! Codec adapter: layering decoders and encoders over a raw file handle.
//!
//! `wrap_decoder` and `wrap_encoder` take ownership of an open [`File`] and
//! return the stream the layered handle delegates to. For
//! [`Codec::None`] the file itself is the stream. Compressed streams are built
//! from the external codec crates; nothing here implements an algorithm.
//!
//! # Invariants
//!
//! - Decoders validate the codec's magic bytes before returning, so a file
//!   that is not in the requested format fails at open time with
//!   [`ZFileError::CodecInit`] rather than on the first read. The probed
//!   bytes are replayed ahead of the rest of the file.
//! - Encoders use the fixed settings below; there is no per-call level.
//! - A wrapper never outlives its file: finishing a decoder or encoder tears
//!   the codec layer down first and only then hands the file back.

use std::fs::File;
use std::io::{self, BufReader, Chain, Cursor, IoSlice, IoSliceMut, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::bufread::MultiGzDecoder;
use flate2::write::GzEncoder;
use xz2::bufread::XzDecoder;
use xz2::write::XzEncoder;
use zstd::stream::read::Decoder as ZstdDecoder;
use zstd::stream::write::Encoder as ZstdEncoder;

use crate::compressor::Codec;
use crate::error::{ZFileError, ZFileResult};

/// Gzip magic bytes followed by the deflate compression method.
pub const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Zstandard frame magic number, little-endian.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// xz stream header magic.
pub const XZ_MAGIC: [u8; 6] = [0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// Gzip compression level used for every encoder.
pub const GZIP_LEVEL: u32 = 9;

/// Zstandard compression level used for every encoder.
pub const ZSTD_LEVEL: i32 = 19;

/// xz preset used for every encoder.
pub const XZ_PRESET: u32 = 6;

/// Buffered byte source that replays the probed header before the file.
pub(crate) type Source = BufReader<Chain<Cursor<Vec<u8>>, File>>;

/// Decoding stream layered over a file opened for reading.
pub(crate) enum Decoder {
    Plain(File),
    Gzip(MultiGzDecoder<Source>),
    Zstd(ZstdDecoder<'static, Source>),
    Xz(XzDecoder<Source>),
}

impl Decoder {
    /// Drops the codec layer and returns the raw file.
    pub(crate) fn finish(self) -> File {
        match self {
            Self::Plain(file) => file,
            Self::Gzip(decoder) => into_file(decoder.into_inner()),
            Self::Zstd(decoder) => into_file(decoder.finish()),
            Self::Xz(decoder) => into_file(decoder.into_inner()),
        }
    }
}

impl Read for Decoder {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(file) => file.read(buf),
            Self::Gzip(decoder) => decoder.read(buf),
            Self::Zstd(decoder) => decoder.read(buf),
            Self::Xz(decoder) => decoder.read(buf),
        }
    }

    fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        match self {
            Self::Plain(file) => file.read_vectored(bufs),
            Self::Gzip(decoder) => decoder.read_vectored(bufs),
            Self::Zstd(decoder) => decoder.read_vectored(bufs),
            Self::Xz(decoder) => decoder.read_vectored(bufs),
        }
    }
}

/// Encoding stream layered over a file opened for writing.
pub(crate) enum Encoder {
    Plain(File),
    Gzip(GzEncoder<File>),
    Zstd(ZstdEncoder<'static, File>),
    Xz(XzEncoder<File>),
}

impl Encoder {
    /// Writes the codec trailer and returns the raw file.
    ///
    /// On failure the file is released together with the encoder.
    pub(crate) fn finish(self) -> io::Result<File> {
        match self {
            Self::Plain(file) => Ok(file),
            Self::Gzip(encoder) => encoder.finish(),
            Self::Zstd(encoder) => encoder.finish(),
            Self::Xz(encoder) => encoder.finish(),
        }
    }
}

impl Write for Encoder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(file) => file.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
            Self::Zstd(encoder) => encoder.write(buf),
            Self::Xz(encoder) => encoder.write(buf),
        }
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        match self {
            Self::Plain(file) => file.write_vectored(bufs),
            Self::Gzip(encoder) => encoder.write_vectored(bufs),
            Self::Zstd(encoder) => encoder.write_vectored(bufs),
            Self::Xz(encoder) => encoder.write_vectored(bufs),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(file) => file.flush(),
            Self::Gzip(encoder) => encoder.flush(),
            Self::Zstd(encoder) => encoder.flush(),
            Self::Xz(encoder) => encoder.flush(),
        }
    }
}

/// Layers the decoder for `codec` over `raw`.
///
/// `path` is only used for error reporting. `capacity` sizes the read buffer
/// between the decoder and the file.
pub(crate) fn wrap_decoder(
    raw: File,
    codec: Codec,
    path: &Path,
    capacity: usize,
) -> ZFileResult<Decoder> {
    let probe = |raw: File| probed_source(raw, codec, path, capacity);

    Ok(match codec {
        Codec::None => Decoder::Plain(raw),
        Codec::Gzip => Decoder::Gzip(MultiGzDecoder::new(probe(raw)?)),
        Codec::Zstd => Decoder::Zstd(
            ZstdDecoder::with_buffer(probe(raw)?)
                .map_err(|e| ZFileError::codec_init(codec, path, e))?,
        ),
        Codec::Xz => Decoder::Xz(XzDecoder::new_multi_decoder(probe(raw)?)),
    })
}

/// Layers the encoder for `codec` over `raw`.
pub(crate) fn wrap_encoder(raw: File, codec: Codec, path: &Path) -> ZFileResult<Encoder> {
    Ok(match codec {
        Codec::None => Encoder::Plain(raw),
        Codec::Gzip => Encoder::Gzip(GzEncoder::new(raw, Compression::new(GZIP_LEVEL))),
        Codec::Zstd => Encoder::Zstd(
            ZstdEncoder::new(raw, ZSTD_LEVEL).map_err(|e| ZFileError::codec_init(codec, path, e))?,
        ),
        Codec::Xz => Encoder::Xz(XzEncoder::new(raw, XZ_PRESET)),
    })
}

/// Returns `true` when `header` starts the stream format of `codec`.
///
/// Zstandard skippable frames (`0x184D2A50..=0x184D2A5F`) are accepted since a
/// valid stream may begin with one.
#[must_use]
pub fn matches_magic(codec: Codec, header: &[u8]) -> bool {
    match codec {
        Codec::None => true,
        Codec::Gzip => header.starts_with(&GZIP_MAGIC),
        Codec::Zstd => {
            header.starts_with(&ZSTD_MAGIC)
                || matches!(header, [low, 0x2a, 0x4d, 0x18, ..] if low & 0xf0 == 0x50)
        }
        Codec::Xz => header.starts_with(&XZ_MAGIC),
    }
}

const fn header_len(codec: Codec) -> usize {
    match codec {
        Codec::None => 0,
        Codec::Gzip => GZIP_MAGIC.len(),
        Codec::Zstd => ZSTD_MAGIC.len(),
        Codec::Xz => XZ_MAGIC.len(),
    }
}

/// Reads and checks the codec header, then chains it back in front of `raw`.
///
/// Operating system read failures are plain I/O errors; only a short or
/// mismatched header is a codec setup failure. A zero `capacity` is raised to
/// one byte since an empty buffer never yields data.
fn probed_source(
    mut raw: File,
    codec: Codec,
    path: &Path,
    capacity: usize,
) -> ZFileResult<Source> {
    let wanted = header_len(codec);
    let mut header = Vec::with_capacity(wanted);
    (&mut raw).take(wanted as u64).read_to_end(&mut header)?;

    if header.len() < wanted {
        return Err(ZFileError::codec_init(
            codec,
            path,
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "truncated {codec} header: {} of {wanted} bytes",
                    header.len()
                ),
            ),
        ));
    }
    if !matches_magic(codec, &header) {
        return Err(ZFileError::codec_init(
            codec,
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("not a {codec} stream (header {header:02x?})"),
            ),
        ));
    }
    Ok(BufReader::with_capacity(
        capacity.max(1),
        Cursor::new(header).chain(raw),
    ))
}

fn into_file(source: Source) -> File {
    let (_header, file) = source.into_inner().into_inner();
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom};

    fn scratch(contents: &[u8]) -> File {
        let mut file = tempfile::tempfile().expect("tempfile");
        file.write_all(contents).expect("write");
        file.seek(SeekFrom::Start(0)).expect("rewind");
        file
    }

    #[test]
    fn magic_detection_matches_each_codec() {
        assert!(matches_magic(Codec::Gzip, &[0x1f, 0x8b, 0x08, 0x00]));
        assert!(!matches_magic(Codec::Gzip, &[0x1f, 0x8c, 0x08]));
        assert!(matches_magic(Codec::Zstd, &ZSTD_MAGIC));
        assert!(matches_magic(Codec::Zstd, &[0x5a, 0x2a, 0x4d, 0x18]));
        assert!(!matches_magic(Codec::Zstd, &[0x6a, 0x2a, 0x4d, 0x18]));
        assert!(matches_magic(Codec::Xz, &XZ_MAGIC));
        assert!(!matches_magic(Codec::Xz, &XZ_MAGIC[..5]));
        assert!(matches_magic(Codec::None, b""));
    }

    #[test]
    fn decoder_rejects_bad_magic_before_reading() {
        let file = scratch(b"This is not gzip");
        let err = wrap_decoder(file, Codec::Gzip, Path::new("x.gz"), 1024)
            .err()
            .expect("bad magic rejected");

        assert!(err.is_codec_init());
        assert_eq!(err.io_kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn decoder_rejects_truncated_header() {
        let file = scratch(&XZ_MAGIC[..3]);
        let Err(ZFileError::CodecInit { source, .. }) =
            wrap_decoder(file, Codec::Xz, Path::new("x.xz"), 1024)
        else {
            panic!("expected codec init failure");
        };

        assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn decoder_replays_probed_header() {
        let mut compressed = Vec::new();
        let mut encoder = GzEncoder::new(&mut compressed, Compression::new(GZIP_LEVEL));
        encoder.write_all(b"replayed payload").expect("write");
        encoder.finish().expect("finish");

        let file = scratch(&compressed);
        let mut decoder =
            wrap_decoder(file, Codec::Gzip, Path::new("x.gz"), 16).expect("valid header");
        let mut output = Vec::new();
        decoder.read_to_end(&mut output).expect("decode");

        assert_eq!(output, b"replayed payload");
    }

    #[test]
    fn plain_decoder_passes_bytes_through() {
        let file = scratch(b"plain bytes");
        let mut decoder = wrap_decoder(file, Codec::None, Path::new("x"), 1024).expect("plain");
        let mut output = Vec::new();
        decoder.read_to_end(&mut output).expect("read");

        assert_eq!(output, b"plain bytes");
        assert!(matches!(decoder, Decoder::Plain(_)));
    }

    #[test]
    fn encoder_finish_returns_file_with_trailer() {
        for codec in [Codec::Gzip, Codec::Zstd, Codec::Xz] {
            let file = tempfile::tempfile().expect("tempfile");
            let mut encoder = wrap_encoder(file, codec, Path::new("x")).expect("encoder");
            encoder.write_all(b"trailer check").expect("write");
            let mut file = encoder.finish().expect("finish");

            file.seek(SeekFrom::Start(0)).expect("rewind");
            let mut header = Vec::new();
            file.read_to_end(&mut header).expect("read back");
            assert!(matches_magic(codec, &header), "{codec} header missing");
        }
    }

    #[test]
    fn zero_capacity_still_decodes() {
        let mut compressed = Vec::new();
        let mut encoder = XzEncoder::new(&mut compressed, XZ_PRESET);
        encoder.write_all(b"unbuffered").expect("write");
        encoder.finish().expect("finish");

        let file = scratch(&compressed);
        let mut decoder = wrap_decoder(file, Codec::Xz, Path::new("x.xz"), 0).expect("decoder");
        let mut output = Vec::new();
        decoder.read_to_end(&mut output).expect("decode");

        assert_eq!(output, b"unbuffered");
    }

    #[cfg(unix)]
    #[test]
    fn header_read_failure_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = File::open(dir.path()).expect("open directory");

        let err = wrap_decoder(file, Codec::Gzip, Path::new("dir.gz"), 1024)
            .err()
            .expect("directory cannot be read");

        assert!(matches!(err, ZFileError::Io(_)), "{err}");
        assert!(!err.is_codec_init());
    }

    #[test]
    fn decoder_finish_hands_back_the_file() {
        let file = scratch(&ZSTD_MAGIC);
        let decoder = wrap_decoder(file, Codec::Zstd, Path::new("x.zst"), 64).expect("decoder");
        let file = decoder.finish();

        assert!(file.metadata().is_ok());
    }
}
