//! Async hashing adapters over tokio's `AsyncRead` / `AsyncWrite`
//!
//! Same contract as the blocking adapters: only bytes that completed a
//! `Ready(Ok(..))` poll are hashed. `Pending` and errors hash nothing.

use crate::hash::HashAccumulator;
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

pin_project! {
    /// Async writer that hashes what the destination accepts
    pub struct AsyncHashingWriter<W, H> {
        #[pin]
        inner: W,
        hash: H,
    }
}

impl<W, H: HashAccumulator> AsyncHashingWriter<W, H> {
    /// Wrap `inner`, feeding written bytes into `hash`
    pub fn new(inner: W, hash: H) -> Self {
        Self { inner, hash }
    }

    /// Get a reference to the destination
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Digest of everything written so far
    pub fn snapshot(&self) -> Vec<u8> {
        self.hash.snapshot()
    }

    /// Unwrap into the destination and the accumulator
    pub fn into_parts(self) -> (W, H) {
        (self.inner, self.hash)
    }
}

impl<W: AsyncWrite, H: HashAccumulator> AsyncWrite for AsyncHashingWriter<W, H> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.project();
        match this.inner.poll_write(cx, buf) {
            Poll::Ready(Ok(written)) => {
                this.hash.ingest(&buf[..written]);
                Poll::Ready(Ok(written))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().inner.poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().inner.poll_shutdown(cx)
    }
}

pin_project! {
    /// Async reader that hashes what it hands back to the caller
    pub struct AsyncHashingReader<R, H> {
        #[pin]
        inner: R,
        hash: H,
    }
}

impl<R, H: HashAccumulator> AsyncHashingReader<R, H> {
    /// Wrap `inner`, feeding read bytes into `hash`
    pub fn new(inner: R, hash: H) -> Self {
        Self { inner, hash }
    }

    /// Get a reference to the source
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Digest of everything read so far
    pub fn snapshot(&self) -> Vec<u8> {
        self.hash.snapshot()
    }

    /// Unwrap into the source and the accumulator
    pub fn into_parts(self) -> (R, H) {
        (self.inner, self.hash)
    }
}

impl<R: AsyncRead, H: HashAccumulator> AsyncRead for AsyncHashingReader<R, H> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.project();
        let before = buf.filled().len();

        match this.inner.poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                this.hash.ingest(&buf.filled()[before..]);
                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }
}
