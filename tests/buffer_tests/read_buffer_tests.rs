//! Tests for ReadBufferPartial
//!
//! These tests verify:
//! - Byte and bulk reads across window boundaries
//! - Hard EOF errors (never short reads)
//! - Seek range checks
//! - Tagged field validation
//! - File-backed reading and checksums

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use cachebuf::config::BufferConfig;
use cachebuf::{checksum_file, CacheIoError, ReadBufferPartial, WriteBuffer};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn sequential(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

fn reader_over(data: Vec<u8>, capacity: usize) -> ReadBufferPartial<Cursor<Vec<u8>>> {
    ReadBufferPartial::new(Cursor::new(data), "mem", capacity).unwrap()
}

/// Source that serves at most `chunk` bytes per read call
struct TrickleSource {
    inner: Cursor<Vec<u8>>,
    chunk: usize,
}

impl Read for TrickleSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..n])
    }
}

impl Seek for TrickleSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Source whose reads always fail
struct BrokenSource;

impl Read for BrokenSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "bad sector"))
    }
}

impl Seek for BrokenSource {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Ok(64)
    }
}

// =============================================================================
// Byte Read Tests
// =============================================================================

#[test]
fn test_read_bytes_one_at_a_time() {
    let data = sequential(50);
    let mut reader = reader_over(data.clone(), 7);

    for expected in data {
        assert_eq!(reader.read_byte().unwrap(), expected);
    }
    assert_eq!(reader.position(), 50);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_read_byte_at_end_is_eof() {
    let mut reader = reader_over(vec![1, 2], 16);
    reader.read_byte().unwrap();
    reader.read_byte().unwrap();

    let err = reader.read_byte().unwrap_err();
    assert!(err.is_eof());
    match err {
        CacheIoError::Eof { path, position } => {
            assert_eq!(path, "mem");
            assert_eq!(position, 2);
        }
        other => panic!("Expected Eof, got {:?}", other),
    }
}

#[test]
fn test_empty_source() {
    let mut reader = reader_over(Vec::new(), 8);
    assert!(reader.is_empty());
    assert!(reader.read_byte().unwrap_err().is_eof());
    assert!(reader.seek(0).unwrap_err().is_range());
}

// =============================================================================
// Bulk Read Tests
// =============================================================================

#[test]
fn test_bulk_read_spanning_windows() {
    let data = sequential(100);
    let mut reader = reader_over(data.clone(), 16);

    let mut dst = vec![0u8; 90];
    reader.seek(5).unwrap();
    reader.read_bytes(&mut dst).unwrap();

    assert_eq!(dst, data[5..95].to_vec());
    assert_eq!(reader.position(), 95);
}

#[test]
fn test_bulk_read_with_trickling_source() {
    let data = sequential(200);
    let source = TrickleSource {
        inner: Cursor::new(data.clone()),
        chunk: 3,
    };
    let mut reader = ReadBufferPartial::new(source, "trickle", 32).unwrap();

    let all = reader.read_vec(200).unwrap();
    assert_eq!(all, data);
}

#[test]
fn test_bulk_read_past_end_is_eof() {
    let mut reader = reader_over(sequential(10), 4);
    reader.seek(8).unwrap();

    let mut dst = [0u8; 3];
    let err = reader.read_bytes(&mut dst).unwrap_err();
    assert!(err.is_eof());

    // Nothing consumed; the last two bytes are still readable
    assert_eq!(reader.position(), 8);
    assert_eq!(reader.read_vec(2).unwrap(), vec![8, 9]);
}

#[test]
fn test_read_into_span() {
    let mut reader = reader_over(sequential(10), 4);
    let mut dst = [0xEEu8; 8];

    reader.read_bytes_into(&mut dst, 2, 5).unwrap();
    assert_eq!(dst, [0xEE, 0xEE, 0, 1, 2, 3, 4, 0xEE]);
}

#[test]
fn test_read_into_eof_precedes_bad_span() {
    let mut reader = reader_over(sequential(10), 4);
    reader.seek(6).unwrap();

    // Span is invalid for dst, but exhaustion is reported first
    let mut dst = [0u8; 2];
    let err = reader.read_bytes_into(&mut dst, 1, 8).unwrap_err();
    assert!(err.is_eof());
}

#[test]
fn test_read_into_bad_span_is_range() {
    let mut reader = reader_over(sequential(10), 4);
    let mut dst = [0u8; 4];

    let err = reader.read_bytes_into(&mut dst, 3, 2).unwrap_err();
    assert!(err.is_range());
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_zero_length_read_at_end() {
    let mut reader = reader_over(sequential(3), 4);
    reader.read_vec(3).unwrap();
    assert!(reader.read_vec(0).unwrap().is_empty());
}

#[test]
fn test_source_failure_propagates() {
    let mut reader = ReadBufferPartial::new(BrokenSource, "broken", 8).unwrap();
    let err = reader.read_byte().unwrap_err();
    assert!(matches!(err, CacheIoError::Io(_)));
}

// =============================================================================
// Seek Tests
// =============================================================================

#[test]
fn test_seek_bounds() {
    let mut reader = reader_over(sequential(20), 8);

    assert!(reader.seek(-1).unwrap_err().is_range());
    assert!(reader.seek(20).unwrap_err().is_range());
    assert!(reader.seek(21).unwrap_err().is_range());
    assert!(reader.seek(i64::MIN).unwrap_err().is_range());

    reader.seek(0).unwrap();
    reader.seek(19).unwrap();
    assert_eq!(reader.read_byte().unwrap(), 19);
}

#[test]
fn test_failed_seek_keeps_position() {
    let mut reader = reader_over(sequential(20), 8);
    reader.seek(12).unwrap();

    match reader.seek(25).unwrap_err() {
        CacheIoError::Range { position, length, .. } => {
            assert_eq!(position, 25);
            assert_eq!(length, 20);
        }
        other => panic!("Expected Range, got {:?}", other),
    }
    assert_eq!(reader.read_byte().unwrap(), 12);
}

#[test]
fn test_seek_backwards_and_forwards() {
    let data = sequential(64);
    let mut reader = reader_over(data, 8);

    for offset in [60, 3, 33, 7, 8, 0, 63, 31, 32] {
        reader.seek(offset).unwrap();
        assert_eq!(reader.read_byte().unwrap(), offset as u8);
    }
}

// =============================================================================
// Field Tests
// =============================================================================

#[test]
fn test_integer_fields() {
    let mut reader = reader_over(vec![0x12, 0x34, 0x80, 0x00, 0x00, 0x01], 3);
    assert_eq!(reader.read_small_int().unwrap(), 0x1234);
    assert_eq!(reader.read_large_int().unwrap(), i32::MIN + 1);
    assert!(reader.read_small_int().unwrap_err().is_eof());
}

#[test]
fn test_require_field_mismatch() {
    let mut out = Vec::new();
    let mut writer = WriteBuffer::new(&mut out, "mem", 16).unwrap();
    writer.write_tagged_string(b'N', "name").unwrap();
    writer.close().unwrap();

    let mut reader = reader_over(out, 16);
    let err = reader.require_field(b'X').unwrap_err();
    assert!(err.is_format());
    match err {
        CacheIoError::Format {
            position,
            expected,
            actual,
            ..
        } => {
            assert_eq!(position, 0);
            assert_eq!(expected, b'X');
            assert_eq!(actual, b'N');
        }
        other => panic!("Expected Format, got {:?}", other),
    }

    // Position rewound: the correct tag still reads
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.require_field(b'N').unwrap(), "name");
}

#[test]
fn test_require_fixed_field_mismatch() {
    let mut out = Vec::new();
    let mut writer = WriteBuffer::new(&mut out, "mem", 16).unwrap();
    writer.write_fixed_string(b'C', "cls", 8).unwrap();
    writer.close().unwrap();

    let mut reader = reader_over(out, 4);
    assert!(reader.require_fixed_field(b'D', 8).unwrap_err().is_format());
    assert_eq!(reader.require_fixed_field(b'C', 8).unwrap(), "cls");
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_truncated_string_is_eof() {
    // Prefix claims 10 bytes, only 3 present
    let mut reader = reader_over(vec![0x00, 0x0A, b'a', b'b', b'c'], 4);
    let err = reader.read_string().unwrap_err();
    assert!(err.is_eof());
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_truncated_tagged_field_is_eof_not_format() {
    let mut reader = reader_over(vec![b'T'], 4);
    assert!(reader.require_field(b'T').unwrap_err().is_eof());

    let mut reader = reader_over(Vec::new(), 4);
    assert!(reader.require_field(b'T').unwrap_err().is_eof());
}

#[test]
fn test_invalid_utf8_is_encoding_error() {
    let mut reader = reader_over(vec![0x00, 0x02, 0xC3, 0x28], 4);
    let err = reader.read_string().unwrap_err();
    assert!(matches!(err, CacheIoError::Encoding(_)));
}

// =============================================================================
// File Tests
// =============================================================================

#[test]
fn test_open_file_and_accessors() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.bin");
    std::fs::write(&path, sequential(40)).unwrap();

    let config = BufferConfig::builder().read_buffer_size(12).build();
    let mut reader = ReadBufferPartial::open_with(&path, &config).unwrap();

    assert_eq!(reader.len(), 40);
    assert_eq!(reader.capacity(), 12);
    assert_eq!(reader.label(), path.display().to_string());

    reader.seek(30).unwrap();
    assert_eq!(reader.read_vec(10).unwrap(), sequential(40)[30..].to_vec());
    reader.close();
}

#[test]
fn test_open_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = ReadBufferPartial::open(&temp.path().join("nope.bin"), 16)
        .err()
        .unwrap();
    assert!(matches!(err, CacheIoError::Io(_)));
}

#[test]
fn test_zero_capacity_rejected() {
    let err = ReadBufferPartial::new(Cursor::new(vec![1u8]), "mem", 0)
        .err()
        .unwrap();
    assert!(matches!(err, CacheIoError::Config(_)));
}

#[test]
fn test_checksum_file_matches_writer() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("crc.bin");

    let mut writer = WriteBuffer::create(&path, 10).unwrap();
    for i in 0..300u32 {
        writer.write_small_int(i).unwrap();
        writer.write_string("entry").unwrap();
    }
    let expected = writer.checksum();
    writer.close().unwrap();

    for capacity in [1, 7, 1024] {
        assert_eq!(checksum_file(&path, capacity).unwrap(), expected);
    }
}

#[test]
fn test_checksum_empty_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.bin");
    std::fs::write(&path, b"").unwrap();

    assert_eq!(checksum_file(&path, 8).unwrap(), crc32fast::hash(&[]));
}
