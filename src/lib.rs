//! # hashpipe - Hash Data While It Streams
//!
//! hashpipe decorates readers and writers so that every byte passing
//! through them is also fed into an incremental hash. The digest comes for
//! free while the data moves through an existing I/O pipeline: hashing a
//! request body while it is parsed, or a file while it is written to disk.
//!
//! ## Features
//!
//! - **Zero-copy adapters**: no buffering beyond the caller's own buffers
//! - **Exact accounting**: partial writes and reads are hashed exactly once
//! - **Transparent errors**: the wrapped stream's errors come back untouched
//! - **Algorithms**: XXHash3, XXHash64, BLAKE3, SHA-256, SHA-512
//! - **Async**: the same adapters over tokio's `AsyncRead` / `AsyncWrite`
//!
//! ## Quick Start
//!
//! ```
//! use hashpipe::prelude::*;
//! use std::io::Write;
//!
//! let mut hash = Hasher::new(HashAlgorithm::Sha256);
//! let mut file = Vec::new();
//!
//! let mut writer = bind_writer(&mut hash)(&mut file);
//! writer.write_all(b"foo").unwrap();
//! drop(writer);
//!
//! assert_eq!(file, b"foo");
//! assert_eq!(
//!     hash.snapshot_hex(),
//!     "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
//! );
//! ```
//!
//! ## Copy and Verify
//!
//! ```no_run
//! use hashpipe::prelude::*;
//! use std::fs::File;
//!
//! let src = File::open("/source/large_file.bin").unwrap();
//! let dst = File::create("/dest/large_file.bin").unwrap();
//!
//! let outcome = copy_hashed(src, dst, HashAlgorithm::Blake3, 1024 * 1024).unwrap();
//! println!("{} bytes, {}", outcome.bytes_copied, outcome.digest);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod hash;
pub mod pipe;
pub mod runner;

// Re-export commonly used types
pub use config::{HashAlgorithm, PipeConfig};
pub use error::{HashPipeError, Result};
pub use hash::{HashAccumulator, HashResult, Hasher};
pub use pipe::{bind_reader, bind_writer, HashingReader, HashingWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```
    //! use hashpipe::prelude::*;
    //! ```

    pub use crate::config::HashAlgorithm;
    pub use crate::error::{HashPipeError, Result};
    pub use crate::hash::{hash_bytes, HashAccumulator, HashResult, Hasher, StreamingHasher};
    pub use crate::pipe::{
        bind_reader, bind_writer, copy_hashed, hash_reader, AsyncHashingReader,
        AsyncHashingWriter, HashingReader, HashingWriter,
    };
}
