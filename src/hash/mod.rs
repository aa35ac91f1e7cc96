//! Hash accumulators
//!
//! Provides XXHash3, XXHash64, BLAKE3, SHA-256 and SHA-512 behind one
//! incremental interface that the stream adapters feed.

mod accumulator;

pub use accumulator::*;
