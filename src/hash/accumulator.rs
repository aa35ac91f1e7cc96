//! Incremental hash accumulators
//!
//! [`HashAccumulator`] is the only thing the stream adapters know about a
//! hash: it ingests bytes in order and can report a digest of everything
//! seen so far without being consumed. It is implemented for the algorithm
//! crates directly, for the runtime-selected [`Hasher`], and for borrowed
//! or shared accumulators.

use crate::config::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Stateful digest that can be fed incrementally
pub trait HashAccumulator {
    /// Feed the next chunk of the stream into the hash state
    fn ingest(&mut self, data: &[u8]);

    /// Digest of every byte ingested so far. Does not alter the state.
    fn snapshot(&self) -> Vec<u8>;

    /// [`snapshot`](Self::snapshot) as lowercase hex
    fn snapshot_hex(&self) -> String {
        hex::encode(self.snapshot())
    }
}

impl<H: HashAccumulator + ?Sized> HashAccumulator for &mut H {
    fn ingest(&mut self, data: &[u8]) {
        (**self).ingest(data);
    }

    fn snapshot(&self) -> Vec<u8> {
        (**self).snapshot()
    }
}

impl<H: HashAccumulator + ?Sized> HashAccumulator for Box<H> {
    fn ingest(&mut self, data: &[u8]) {
        (**self).ingest(data);
    }

    fn snapshot(&self) -> Vec<u8> {
        (**self).snapshot()
    }
}

/// Lets several adapters on one thread feed a single running digest.
///
/// Panics if the cell is already mutably borrowed, e.g. when a snapshot is
/// taken from inside another borrow.
impl<H: HashAccumulator> HashAccumulator for &RefCell<H> {
    fn ingest(&mut self, data: &[u8]) {
        self.borrow_mut().ingest(data);
    }

    fn snapshot(&self) -> Vec<u8> {
        self.borrow().snapshot()
    }
}

impl HashAccumulator for sha2::Sha256 {
    fn ingest(&mut self, data: &[u8]) {
        sha2::Digest::update(self, data);
    }

    fn snapshot(&self) -> Vec<u8> {
        sha2::Digest::finalize(self.clone()).to_vec()
    }
}

impl HashAccumulator for sha2::Sha512 {
    fn ingest(&mut self, data: &[u8]) {
        sha2::Digest::update(self, data);
    }

    fn snapshot(&self) -> Vec<u8> {
        sha2::Digest::finalize(self.clone()).to_vec()
    }
}

impl HashAccumulator for blake3::Hasher {
    fn ingest(&mut self, data: &[u8]) {
        self.update(data);
    }

    fn snapshot(&self) -> Vec<u8> {
        self.finalize().as_bytes().to_vec()
    }
}

impl HashAccumulator for xxhash_rust::xxh3::Xxh3 {
    fn ingest(&mut self, data: &[u8]) {
        self.update(data);
    }

    fn snapshot(&self) -> Vec<u8> {
        self.digest128().to_be_bytes().to_vec()
    }
}

impl HashAccumulator for xxhash_rust::xxh64::Xxh64 {
    fn ingest(&mut self, data: &[u8]) {
        self.update(data);
    }

    fn snapshot(&self) -> Vec<u8> {
        self.digest().to_be_bytes().to_vec()
    }
}

/// Hash result as hex string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResult {
    /// The hash algorithm used
    pub algorithm: HashAlgorithm,
    /// Hash value as lowercase hex string
    pub hash: String,
    /// Number of bytes hashed
    pub size: u64,
}

impl HashResult {
    /// Create a new hash result
    pub fn new(algorithm: HashAlgorithm, hash: String, size: u64) -> Self {
        Self { algorithm, hash, size }
    }

    /// Verify against another hash result
    pub fn verify(&self, other: &HashResult) -> bool {
        self.algorithm == other.algorithm && self.hash == other.hash
    }

    /// Compare against a hex digest, ignoring case
    pub fn matches_hex(&self, hex_digest: &str) -> bool {
        self.hash.eq_ignore_ascii_case(hex_digest.trim())
    }
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Unified hasher that supports all algorithms
#[derive(Clone)]
pub enum Hasher {
    /// XXHash3 128-bit
    XXHash3(xxhash_rust::xxh3::Xxh3),
    /// XXHash64
    XXHash64(xxhash_rust::xxh64::Xxh64),
    /// BLAKE3
    Blake3(blake3::Hasher),
    /// SHA-256
    Sha256(sha2::Sha256),
    /// SHA-512
    Sha512(sha2::Sha512),
}

impl Hasher {
    /// Create a new hasher for the given algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        use sha2::Digest;

        match algorithm {
            HashAlgorithm::XXHash3 => Self::XXHash3(xxhash_rust::xxh3::Xxh3::new()),
            HashAlgorithm::XXHash64 => Self::XXHash64(xxhash_rust::xxh64::Xxh64::new(0)),
            HashAlgorithm::Blake3 => Self::Blake3(blake3::Hasher::new()),
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Sha512 => Self::Sha512(sha2::Sha512::new()),
        }
    }

    /// Get the algorithm this hasher uses
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::XXHash3(_) => HashAlgorithm::XXHash3,
            Self::XXHash64(_) => HashAlgorithm::XXHash64,
            Self::Blake3(_) => HashAlgorithm::Blake3,
            Self::Sha256(_) => HashAlgorithm::Sha256,
            Self::Sha512(_) => HashAlgorithm::Sha512,
        }
    }

    /// Finalize and get the hash as hex string
    pub fn finalize(self) -> String {
        self.snapshot_hex()
    }

    /// Reset the hasher for reuse
    pub fn reset(&mut self) {
        *self = Self::new(self.algorithm());
    }
}

impl HashAccumulator for Hasher {
    fn ingest(&mut self, data: &[u8]) {
        match self {
            Self::XXHash3(h) => h.ingest(data),
            Self::XXHash64(h) => h.ingest(data),
            Self::Blake3(h) => h.ingest(data),
            Self::Sha256(h) => h.ingest(data),
            Self::Sha512(h) => h.ingest(data),
        }
    }

    fn snapshot(&self) -> Vec<u8> {
        match self {
            Self::XXHash3(h) => h.snapshot(),
            Self::XXHash64(h) => h.snapshot(),
            Self::Blake3(h) => h.snapshot(),
            Self::Sha256(h) => h.snapshot(),
            Self::Sha512(h) => h.snapshot(),
        }
    }
}

impl std::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Hasher").field(&self.algorithm()).finish()
    }
}

/// Compute hash of data in memory
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> HashResult {
    let mut hasher = Hasher::new(algorithm);
    hasher.ingest(data);
    HashResult::new(algorithm, hasher.finalize(), data.len() as u64)
}

/// Hasher that also counts the bytes it has seen
#[derive(Debug, Clone)]
pub struct StreamingHasher {
    hasher: Hasher,
    bytes_processed: u64,
}

impl StreamingHasher {
    /// Create a new streaming hasher
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            hasher: Hasher::new(algorithm),
            bytes_processed: 0,
        }
    }

    /// Get bytes processed so far
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    /// Get the algorithm in use
    pub fn algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    /// Result for the bytes processed so far
    pub fn result(&self) -> HashResult {
        HashResult::new(self.algorithm(), self.hasher.snapshot_hex(), self.bytes_processed)
    }

    /// Finalize and get the result
    pub fn finalize(self) -> HashResult {
        self.result()
    }
}

impl HashAccumulator for StreamingHasher {
    fn ingest(&mut self, data: &[u8]) {
        self.hasher.ingest(data);
        self.bytes_processed += data.len() as u64;
    }

    fn snapshot(&self) -> Vec<u8> {
        self.hasher.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOO_SHA256: &str = "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae";
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_hash_algorithms() {
        let data = b"Hello, World!";

        for algorithm in HashAlgorithm::ALL {
            let hash = hash_bytes(data, algorithm);
            assert_eq!(hash.hash.len(), algorithm.output_size() * 2);
            assert_eq!(hash.size, data.len() as u64);

            // Verify determinism
            let hash2 = hash_bytes(data, algorithm);
            assert_eq!(hash, hash2);
        }
    }

    #[test]
    fn test_known_sha256() {
        assert_eq!(hash_bytes(b"", HashAlgorithm::Sha256).hash, EMPTY_SHA256);
        assert_eq!(hash_bytes(b"foo", HashAlgorithm::Sha256).hash, FOO_SHA256);
    }

    #[test]
    fn test_snapshot_is_repeatable() {
        for algorithm in HashAlgorithm::ALL {
            let mut hasher = Hasher::new(algorithm);
            hasher.ingest(b"Hello, ");
            let first = hasher.snapshot();
            assert_eq!(first, hasher.snapshot());
            assert_eq!(first.len(), algorithm.output_size());

            hasher.ingest(b"World!");
            assert_eq!(
                hasher.snapshot_hex(),
                hash_bytes(b"Hello, World!", algorithm).hash
            );
        }
    }

    #[test]
    fn test_matches_native_crates() {
        use sha2::Digest;

        let data = b"eyjafjallaj\xc3\xb6kull";
        assert_eq!(
            hash_bytes(data, HashAlgorithm::Sha256).hash,
            hex::encode(sha2::Sha256::digest(data))
        );
        assert_eq!(
            hash_bytes(data, HashAlgorithm::Sha512).hash,
            hex::encode(sha2::Sha512::digest(data))
        );
        assert_eq!(
            hash_bytes(data, HashAlgorithm::Blake3).hash,
            blake3::hash(data).to_hex().to_string()
        );
        assert_eq!(
            hash_bytes(data, HashAlgorithm::XXHash3).hash,
            format!("{:032x}", xxhash_rust::xxh3::xxh3_128(data))
        );
        assert_eq!(
            hash_bytes(data, HashAlgorithm::XXHash64).hash,
            format!("{:016x}", xxhash_rust::xxh64::xxh64(data, 0))
        );
    }

    #[test]
    fn test_streaming_hasher() {
        let mut hasher = StreamingHasher::new(HashAlgorithm::Blake3);

        hasher.ingest(b"Hello, ");
        hasher.ingest(b"World!");
        assert_eq!(hasher.bytes_processed(), 13);

        let result = hasher.finalize();
        let direct = hash_bytes(b"Hello, World!", HashAlgorithm::Blake3);

        assert!(result.verify(&direct));
        assert_eq!(result.size, 13);
    }

    #[test]
    fn test_reset() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha256);
        hasher.ingest(b"junk");
        hasher.reset();
        hasher.ingest(b"foo");
        assert_eq!(hasher.finalize(), FOO_SHA256);
    }

    #[test]
    fn test_shared_refcell() {
        let shared = RefCell::new(Hasher::new(HashAlgorithm::Sha256));
        let mut a = &shared;
        let mut b = &shared;

        a.ingest(b"f");
        b.ingest(b"oo");

        assert_eq!(a.snapshot_hex(), FOO_SHA256);
        assert_eq!(shared.into_inner().finalize(), FOO_SHA256);
    }

    #[test]
    fn test_matches_hex_ignores_case() {
        let result = hash_bytes(b"foo", HashAlgorithm::Sha256);
        assert!(result.matches_hex(&FOO_SHA256.to_uppercase()));
        assert!(!result.matches_hex(EMPTY_SHA256));
        assert_eq!(result.to_string(), FOO_SHA256);
    }
}
