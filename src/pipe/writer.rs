//! Hashing writer
//!
//! Forwards every write to the destination and hashes exactly the bytes the
//! destination accepted.

use crate::hash::HashAccumulator;
use std::io::{self, IoSlice, Write};

/// Writer that feeds everything it forwards into a hash accumulator
///
/// The destination is written first; only the prefix it reports as written
/// is hashed, so the digest always matches what actually reached it. Errors
/// from the destination are returned unchanged and hash nothing.
pub struct HashingWriter<W, H> {
    inner: W,
    hash: H,
}

impl<W, H: HashAccumulator> HashingWriter<W, H> {
    /// Wrap `inner`, feeding written bytes into `hash`
    pub fn new(inner: W, hash: H) -> Self {
        Self { inner, hash }
    }

    /// Get a reference to the destination
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Get a reference to the accumulator
    pub fn hasher(&self) -> &H {
        &self.hash
    }

    /// Digest of everything written so far
    pub fn snapshot(&self) -> Vec<u8> {
        self.hash.snapshot()
    }

    /// Unwrap into the destination and the accumulator
    pub fn into_parts(self) -> (W, H) {
        (self.inner, self.hash)
    }

    /// Unwrap into the destination, dropping the accumulator
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write, H: HashAccumulator> Write for HashingWriter<W, H> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if written < buf.len() {
            tracing::trace!(requested = buf.len(), written, "short write");
        }
        self.hash.ingest(&buf[..written]);
        Ok(written)
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        let written = self.inner.write_vectored(bufs)?;
        let mut remaining = written;
        for buf in bufs {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(buf.len());
            self.hash.ingest(&buf[..take]);
            remaining -= take;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: std::fmt::Debug, H> std::fmt::Debug for HashingWriter<W, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashingWriter")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// Bind an accumulator, returning a function that wraps a destination
///
/// ```
/// use hashpipe::pipe::bind_writer;
/// use hashpipe::hash::{HashAccumulator, Hasher};
/// use hashpipe::HashAlgorithm;
/// use std::io::Write;
///
/// let mut hash = Hasher::new(HashAlgorithm::Sha256);
/// let mut sink = Vec::new();
/// bind_writer(&mut hash)(&mut sink).write_all(b"foo").unwrap();
///
/// assert_eq!(sink, b"foo");
/// assert_eq!(
///     hash.snapshot_hex(),
///     "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
/// );
/// ```
pub fn bind_writer<W: Write, H: HashAccumulator>(hash: H) -> impl FnOnce(W) -> HashingWriter<W, H> {
    move |inner| HashingWriter::new(inner, hash)
}
