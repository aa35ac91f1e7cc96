//! Hashing reader
//!
//! Pulls bytes from the source and hashes exactly the bytes handed back to
//! the caller, at the moment they are handed back.

use crate::hash::HashAccumulator;
use std::io::{self, IoSliceMut, Read};

/// Reader that feeds everything it returns into a hash accumulator
///
/// End-of-stream (`Ok(0)`) hashes nothing, so reading past the end never
/// hashes a byte twice. Errors from the source are returned unchanged.
pub struct HashingReader<R, H> {
    inner: R,
    hash: H,
}

impl<R, H: HashAccumulator> HashingReader<R, H> {
    /// Wrap `inner`, feeding read bytes into `hash`
    pub fn new(inner: R, hash: H) -> Self {
        Self { inner, hash }
    }

    /// Get a reference to the source
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Get a reference to the accumulator
    pub fn hasher(&self) -> &H {
        &self.hash
    }

    /// Digest of everything read so far
    pub fn snapshot(&self) -> Vec<u8> {
        self.hash.snapshot()
    }

    /// Unwrap into the source and the accumulator
    pub fn into_parts(self) -> (R, H) {
        (self.inner, self.hash)
    }

    /// Unwrap into the source, dropping the accumulator
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, H: HashAccumulator> Read for HashingReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hash.ingest(&buf[..n]);
        Ok(n)
    }

    fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        let n = self.inner.read_vectored(bufs)?;
        let mut remaining = n;
        for buf in bufs.iter() {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(buf.len());
            self.hash.ingest(&buf[..take]);
            remaining -= take;
        }
        Ok(n)
    }
}

impl<R: std::fmt::Debug, H> std::fmt::Debug for HashingReader<R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashingReader")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// Bind an accumulator, returning a function that wraps a source
///
/// ```
/// use hashpipe::pipe::bind_reader;
/// use hashpipe::hash::{HashAccumulator, Hasher};
/// use hashpipe::HashAlgorithm;
/// use std::io::Read;
///
/// let mut hash = Hasher::new(HashAlgorithm::Sha256);
/// let mut body = String::new();
/// bind_reader(&mut hash)(&b"foo"[..]).read_to_string(&mut body).unwrap();
///
/// assert_eq!(body, "foo");
/// assert_eq!(
///     hash.snapshot_hex(),
///     "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
/// );
/// ```
pub fn bind_reader<R: Read, H: HashAccumulator>(hash: H) -> impl FnOnce(R) -> HashingReader<R, H> {
    move |inner| HashingReader::new(inner, hash)
}
