//! Stream adapters that hash data in flight
//!
//! [`HashingWriter`] and [`HashingReader`] decorate any `Write` / `Read` so
//! that every byte crossing them is fed, once and in order, into a
//! [`HashAccumulator`](crate::hash::HashAccumulator). They add no buffering
//! and pass errors through untouched. Both implement the trait they wrap,
//! so they chain: a hashing writer can wrap another hashing writer using a
//! different algorithm.

mod async_io;
mod copy;
mod reader;
mod writer;

pub use async_io::{AsyncHashingReader, AsyncHashingWriter};
pub use copy::{check_digest, copy_hashed, hash_reader, CopyOutcome};
pub use reader::{bind_reader, HashingReader};
pub use writer::{bind_writer, HashingWriter};
