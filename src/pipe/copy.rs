//! Single-pass copy-and-hash built on the adapters
//!
//! The source is read through a [`HashingReader`] and every chunk is written
//! through a [`HashingWriter`], so the digest of what was read and the digest
//! of what was written are computed independently and compared at the end.

use crate::config::{HashAlgorithm, MAX_BUFFER_SIZE};
use crate::error::{HashPipeError, Result};
use crate::hash::{HashResult, StreamingHasher};
use crate::pipe::{HashingReader, HashingWriter};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Result of a copy-and-hash run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyOutcome {
    /// Digest of the payload
    pub digest: HashResult,
    /// Bytes copied to the destination
    pub bytes_copied: u64,
    /// Wall time spent
    pub duration: Duration,
    /// Throughput in MB/s
    pub throughput: f64,
}

impl CopyOutcome {
    fn new(digest: HashResult, duration: Duration) -> Self {
        let bytes_copied = digest.size;
        let secs = duration.as_secs_f64();
        let throughput = if secs > 0.0 {
            (bytes_copied as f64) / secs / (1024.0 * 1024.0)
        } else {
            0.0
        };

        Self {
            digest,
            bytes_copied,
            duration,
            throughput,
        }
    }
}

/// Copy `reader` into `writer`, hashing both sides with `algorithm`
///
/// Fails with [`HashPipeError::IntegrityMismatch`] if the bytes written do
/// not hash to the same digest as the bytes read.
pub fn copy_hashed<R: Read, W: Write>(
    reader: R,
    writer: W,
    algorithm: HashAlgorithm,
    buffer_size: usize,
) -> Result<CopyOutcome> {
    if buffer_size == 0 {
        return Err(HashPipeError::config("buffer size must be greater than zero"));
    }
    if buffer_size > MAX_BUFFER_SIZE {
        return Err(HashPipeError::config(format!(
            "buffer size {} exceeds the limit of {} bytes",
            buffer_size, MAX_BUFFER_SIZE
        )));
    }

    let start = Instant::now();
    tracing::debug!(algorithm = %algorithm, buffer_size, "starting hashed copy");

    let mut reader = HashingReader::new(reader, StreamingHasher::new(algorithm));
    let mut writer = HashingWriter::new(writer, StreamingHasher::new(algorithm));
    let mut buffer = vec![0u8; buffer_size];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HashPipeError::from(e).with_context("reading input")),
        };

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(|e| HashPipeError::from(e).with_context("writing output"))?;
    }

    writer
        .flush()
        .map_err(|e| HashPipeError::from(e).with_context("flushing output"))?;

    let read_digest = reader.hasher().result();
    let written_digest = writer.hasher().result();

    if !read_digest.verify(&written_digest) || read_digest.size != written_digest.size {
        return Err(HashPipeError::integrity_mismatch(
            read_digest.hash,
            written_digest.hash,
        ));
    }

    let outcome = CopyOutcome::new(written_digest, start.elapsed());
    tracing::debug!(
        bytes = outcome.bytes_copied,
        digest = %outcome.digest,
        elapsed_ms = outcome.duration.as_millis() as u64,
        "hashed copy finished"
    );

    Ok(outcome)
}

/// Hash everything `reader` yields until end-of-stream
pub fn hash_reader<R: Read>(reader: R, algorithm: HashAlgorithm, buffer_size: usize) -> Result<HashResult> {
    copy_hashed(reader, std::io::sink(), algorithm, buffer_size).map(|outcome| outcome.digest)
}

/// Fail unless `digest` equals the expected hex digest
pub fn check_digest(digest: &HashResult, expected_hex: &str) -> Result<()> {
    if digest.matches_hex(expected_hex) {
        Ok(())
    } else {
        Err(HashPipeError::integrity_mismatch(
            expected_hex.to_ascii_lowercase(),
            digest.hash.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;
    use std::io::Cursor;

    /// Sink that accepts at most `limit` bytes per write
    struct Trickle {
        data: Vec<u8>,
        limit: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Source that fails after yielding its data
    struct Broken<'a>(&'a [u8]);

    impl Read for Broken<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() {
                return Err(std::io::Error::new(ErrorKind::ConnectionReset, "reset"));
            }
            let n = self.0.read(buf)?;
            Ok(n)
        }
    }

    #[test]
    fn test_copy_hashed() {
        let data = b"Test file content for hashing".repeat(1000);
        let mut out = Vec::new();

        let outcome = copy_hashed(Cursor::new(&data), &mut out, HashAlgorithm::Blake3, 4096).unwrap();

        assert_eq!(out, data);
        assert_eq!(outcome.bytes_copied, data.len() as u64);
        assert!(outcome.digest.verify(&hash_bytes(&data, HashAlgorithm::Blake3)));
    }

    #[test]
    fn test_copy_hashed_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        let content = b"Test file content for hashing".repeat(4096);
        std::fs::write(&src, &content).unwrap();

        let outcome = copy_hashed(
            std::fs::File::open(&src).unwrap(),
            std::fs::File::create(&dst).unwrap(),
            HashAlgorithm::XXHash64,
            64 * 1024,
        )
        .unwrap();

        assert_eq!(std::fs::read(&dst).unwrap(), content);
        assert_eq!(outcome.digest.hash, hash_bytes(&content, HashAlgorithm::XXHash64).hash);
    }

    #[test]
    fn test_copy_hashed_short_writes() {
        let data = b"partial writes still hash once".repeat(50);
        let mut sink = Trickle { data: Vec::new(), limit: 7 };

        let outcome = copy_hashed(&data[..], &mut sink, HashAlgorithm::Sha256, 64).unwrap();

        assert_eq!(sink.data, data);
        assert_eq!(outcome.digest.hash, hash_bytes(&data, HashAlgorithm::Sha256).hash);
    }

    #[test]
    fn test_copy_hashed_empty() {
        let outcome = copy_hashed(&b""[..], Vec::new(), HashAlgorithm::Sha256, 16).unwrap();
        assert_eq!(outcome.bytes_copied, 0);
        assert_eq!(outcome.digest.hash, hash_bytes(b"", HashAlgorithm::Sha256).hash);
    }

    #[test]
    fn test_copy_hashed_read_error() {
        let err = copy_hashed(Broken(b"abc"), Vec::new(), HashAlgorithm::XXHash3, 2).unwrap_err();
        assert_eq!(err.to_string(), "reading input: I/O error: reset");
    }

    #[test]
    fn test_zero_buffer() {
        let err = copy_hashed(&b"abc"[..], Vec::new(), HashAlgorithm::XXHash3, 0).unwrap_err();
        assert!(matches!(err, HashPipeError::ConfigError(_)));
    }

    #[test]
    fn test_oversized_buffer() {
        let err = copy_hashed(&b"abc"[..], Vec::new(), HashAlgorithm::XXHash3, usize::MAX).unwrap_err();
        assert!(matches!(err, HashPipeError::ConfigError(_)));

        let err = copy_hashed(&b"abc"[..], Vec::new(), HashAlgorithm::XXHash3, MAX_BUFFER_SIZE + 1)
            .unwrap_err();
        assert!(matches!(err, HashPipeError::ConfigError(_)));
    }

    #[test]
    fn test_hash_reader_and_check() {
        let digest = hash_reader(&b"foo"[..], HashAlgorithm::Sha256, 2).unwrap();
        assert_eq!(digest.size, 3);

        check_digest(
            &digest,
            "2C26B46B68FFC68FF99B453C1D30413413422D706483BFA0F98A5E886266E7AE",
        )
        .unwrap();

        let err = check_digest(&digest, &hash_bytes(b"bar", HashAlgorithm::Sha256).hash).unwrap_err();
        assert!(err.is_integrity_error());
    }
}
