//! Interoperability with the codec crates used directly.
//!
//! Files written through zfile must decode with the plain codec crates, and
//! files produced by the plain codec crates must open through zfile purely by
//! extension.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use test_support::ScratchDir;
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;
use zfile::DEFAULT_MODE;

const TEST_DATA: &[u8] = b"This is a test";

// ============================================================================
// Written by zfile, read externally
// ============================================================================

#[test]
fn gzip_output_decodes_with_flate2() {
    let dir = ScratchDir::new().unwrap();
    let path = dir.join("file.gz");
    zfile::write(&path, TEST_DATA, DEFAULT_MODE).unwrap();

    let mut decoder = GzDecoder::new(std::fs::File::open(&path).unwrap());
    let mut data = Vec::new();
    decoder.read_to_end(&mut data).unwrap();

    assert_eq!(data, TEST_DATA);
    assert_eq!(zfile::read(&path).unwrap(), TEST_DATA);
}

#[test]
fn zstd_output_decodes_with_zstd() {
    let dir = ScratchDir::new().unwrap();
    let path = dir.join("file.zst");
    zfile::write(&path, TEST_DATA, DEFAULT_MODE).unwrap();

    let data = zstd::decode_all(std::fs::File::open(&path).unwrap()).unwrap();

    assert_eq!(data, TEST_DATA);
    assert_eq!(zfile::read(&path).unwrap(), TEST_DATA);
}

#[test]
fn xz_output_decodes_with_xz2() {
    let dir = ScratchDir::new().unwrap();
    let path = dir.join("file.xz");
    zfile::write(&path, TEST_DATA, DEFAULT_MODE).unwrap();

    let mut decoder = XzDecoder::new(std::fs::File::open(&path).unwrap());
    let mut data = Vec::new();
    decoder.read_to_end(&mut data).unwrap();

    assert_eq!(data, TEST_DATA);
    assert_eq!(zfile::read(&path).unwrap(), TEST_DATA);
}

#[test]
fn gzip_trailer_records_uncompressed_length() {
    let dir = ScratchDir::new().unwrap();
    let path = dir.join("sized.gz");
    let payload = b"length check ".repeat(77);
    zfile::write(&path, &payload, DEFAULT_MODE).unwrap();

    let raw = std::fs::read(&path).unwrap();
    let isize_field = u32::from_le_bytes(raw[raw.len() - 4..].try_into().unwrap());
    assert_eq!(isize_field as usize, payload.len());
}

// ============================================================================
// Written externally, read by zfile
// ============================================================================

#[test]
fn open_reads_flate2_output_by_extension() {
    let dir = ScratchDir::new().unwrap();
    let path = dir.join("external.gz");

    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::fast());
    encoder.write_all(TEST_DATA).unwrap();
    encoder.finish().unwrap();

    let mut reader = zfile::open(&path).unwrap();
    let mut data = Vec::new();
    reader.read_to_end(&mut data).unwrap();
    assert_eq!(data, TEST_DATA);
}

#[test]
fn open_reads_zstd_output_by_extension() {
    let dir = ScratchDir::new().unwrap();
    let path = dir.join("external.zst");

    let compressed = zstd::encode_all(TEST_DATA, 1).unwrap();
    std::fs::write(&path, compressed).unwrap();

    assert_eq!(zfile::read(&path).unwrap(), TEST_DATA);
}

#[test]
fn open_reads_xz2_output_by_extension() {
    let dir = ScratchDir::new().unwrap();
    let path = dir.join("external.xz");

    let mut encoder = XzEncoder::new(std::fs::File::create(&path).unwrap(), 1);
    encoder.write_all(TEST_DATA).unwrap();
    encoder.finish().unwrap();

    assert_eq!(zfile::read(&path).unwrap(), TEST_DATA);
}

#[test]
fn open_accepts_leading_zstd_skippable_frame() {
    let dir = ScratchDir::new().unwrap();
    let path = dir.join("skippable.zst");

    // Skippable frame: magic 0x184D2A50, 4-byte length, then user data.
    let mut raw = vec![0x50, 0x2a, 0x4d, 0x18, 3, 0, 0, 0, b'a', b'b', b'c'];
    raw.extend(zstd::encode_all(TEST_DATA, 3).unwrap());
    std::fs::write(&path, raw).unwrap();

    assert_eq!(zfile::read(&path).unwrap(), TEST_DATA);
}
