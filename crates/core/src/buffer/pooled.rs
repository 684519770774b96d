use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use super::PoolInner;

/// A byte buffer borrowed from a [`BufferPool`](super::BufferPool).
///
/// Dereferences to `[u8]`. The holder has exclusive use of the bytes; when
/// the handle drops (or the last `Arc` around it does) the memory is offered
/// back to the pool it came from.
pub struct PooledBuffer {
    buf: Vec<u8>,
    pool: Option<Arc<PoolInner>>,
}

impl PooledBuffer {
    pub(super) fn new(buf: Vec<u8>, pool: Arc<PoolInner>) -> Self {
        Self {
            buf,
            pool: Some(pool),
        }
    }

    /// Detach the bytes from the pool. They are freed normally on drop.
    pub fn into_inner(mut self) -> Vec<u8> {
        self.pool = None;
        mem::take(&mut self.buf)
    }

    /// Mutable access to the underlying vector, e.g. to grow it.
    ///
    /// A buffer whose length no longer matches the pool's default size is
    /// freed on drop instead of being kept as a spare.
    pub fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl AsRef<[u8]> for PooledBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl AsMut<[u8]> for PooledBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.buf.len())
            .field("pooled", &self.pool.is_some())
            .finish()
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.reclaim(mem::take(&mut self.buf));
        }
    }
}
