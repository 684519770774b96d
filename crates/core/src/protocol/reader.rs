use std::io::{ErrorKind, Read};

use super::parser::parse_request;
use super::request::RtspRequest;
use crate::buffer::BufferPool;
use crate::error::{Result, RtspError};

/// Read size used when the pool is configured with zero-length buffers.
const MIN_READ_SIZE: usize = 4096;

/// Reads framed RTSP requests from a byte stream.
///
/// Each socket read lands in a buffer borrowed from a [`BufferPool`]; the
/// bytes are appended to an accumulator and the parser is retried until a
/// full message (headers plus `Content-Length` body) is available. Bytes past
/// the end of one message are kept for the next call, so pipelined requests
/// are handled.
pub struct RequestReader<R> {
    inner: R,
    pool: BufferPool,
    pending: Vec<u8>,
}

impl<R: Read> RequestReader<R> {
    /// Reader staging its reads through the process-wide pool.
    pub fn new(inner: R) -> Self {
        Self::with_pool(inner, BufferPool::global().clone())
    }

    pub fn with_pool(inner: R, pool: BufferPool) -> Self {
        Self {
            inner,
            pool,
            pending: Vec::new(),
        }
    }

    /// Read the next request.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly between messages and
    /// [`RtspError::UnexpectedEof`] when it ends inside one. A malformed
    /// message is returned as [`RtspError::Parse`]; its bytes are discarded so
    /// the caller may decide whether to continue.
    pub fn read_request(&mut self) -> Result<Option<RtspRequest>> {
        loop {
            if !self.pending.is_empty() {
                match parse_request(&self.pending) {
                    Ok((request, consumed)) => {
                        self.pending.drain(..consumed);
                        return Ok(Some(request));
                    }
                    Err(e) if e.is_recoverable() => {}
                    Err(e) => {
                        self.pending.clear();
                        return Err(e.into());
                    }
                }
            }

            if self.fill()? == 0 {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                let buffered = self.pending.len();
                tracing::debug!(buffered, "stream closed mid-message");
                self.pending.clear();
                return Err(RtspError::UnexpectedEof { buffered });
            }
        }
    }

    /// Bytes received but not yet part of a returned request.
    pub fn buffered(&self) -> &[u8] {
        &self.pending
    }

    /// The underlying byte source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Give back the byte source. Bytes in [`buffered`](Self::buffered) are
    /// dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read one chunk into a pooled buffer and append it to `pending`.
    /// The buffer goes back to the pool when it drops at the end of the call.
    fn fill(&mut self) -> Result<usize> {
        let mut chunk = self.pool.get_buffer();
        if chunk.is_empty() {
            chunk.as_mut_vec().resize(MIN_READ_SIZE, 0);
        }
        loop {
            match self.inner.read(&mut chunk) {
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    tracing::trace!(read = n, buffered = self.pending.len(), "read chunk");
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> Iterator for RequestReader<R> {
    type Item = Result<RtspRequest>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_request().transpose()
    }
}
