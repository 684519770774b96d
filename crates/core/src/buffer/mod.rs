//! Reusable read buffers.
//!
//! RTSP connections read small framed messages continuously. Instead of
//! allocating a fresh staging buffer per read, callers borrow one from a
//! [`BufferPool`] and simply drop it when done: the [`PooledBuffer`] handle
//! offers its memory back to the pool's spare list on drop. There is no
//! explicit release call, so a buffer cannot be returned twice or leaked
//! back to the wrong pool.
//!
//! ```text
//! get_buffer()  -> pop a spare, or allocate default_alloc_size bytes
//! drop(buffer)  -> push onto spare list if len < max_spare, else free
//! ```
//!
//! A process normally uses the single [`BufferPool::global`] instance.
//! Independent pools can be built with [`BufferPool::new`] and passed to
//! the consumers that need them.

mod pooled;

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

pub use pooled::PooledBuffer;

/// Default cap on the number of idle buffers kept for reuse.
pub const DEFAULT_MAX_SPARE: usize = 64;

/// Default size of a freshly allocated buffer (64 KiB).
pub const DEFAULT_ALLOC_SIZE: usize = 64 * 1024;

static GLOBAL_POOL: OnceLock<BufferPool> = OnceLock::new();

/// Pool sizing knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of idle buffers held on the spare list.
    pub max_spare: usize,
    /// Length of buffers allocated when no spare is available.
    pub default_alloc_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_spare: DEFAULT_MAX_SPARE,
            default_alloc_size: DEFAULT_ALLOC_SIZE,
        }
    }
}

/// Point-in-time counters for a [`BufferPool`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers currently idle on the spare list.
    pub spare: usize,
    /// Buffers created because the spare list was empty.
    pub allocated: u64,
    /// Buffers handed out from the spare list.
    pub reused: u64,
    /// Dropped buffers accepted back onto the spare list.
    pub reclaimed: u64,
    /// Dropped buffers freed because the spare list was full or their
    /// length no longer matched the default size.
    pub discarded: u64,
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Buffers: {} spare, {} allocated, {} reused, {} reclaimed, {} discarded",
            self.spare, self.allocated, self.reused, self.reclaimed, self.discarded
        )
    }
}

/// Bounded pool of reusable byte buffers.
///
/// Cloning is cheap and yields a handle to the same pool. All spare-list
/// mutations happen under one `parking_lot::Mutex`; the configuration values
/// are atomics, so they can be changed while the pool is in use (last
/// writer wins).
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

impl BufferPool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            inner: Arc::new(PoolInner::new(config)),
        }
    }

    /// The process-wide pool, created with [`PoolConfig::default`] on first use.
    pub fn global() -> &'static BufferPool {
        GLOBAL_POOL.get_or_init(|| {
            tracing::debug!("initializing global buffer pool");
            BufferPool::new(PoolConfig::default())
        })
    }

    /// Set the spare-list cap. Applies to buffers reclaimed from now on;
    /// spares already held above a lowered cap stay until handed out.
    pub fn set_max_spare(&self, max_spare: usize) {
        self.inner.max_spare.store(max_spare, Ordering::Relaxed);
    }

    /// Set the length of buffers allocated when the spare list is empty.
    pub fn set_default_alloc_size(&self, size: usize) {
        self.inner.default_alloc_size.store(size, Ordering::Relaxed);
    }

    /// Apply both knobs from `config`.
    pub fn configure(&self, config: &PoolConfig) {
        self.set_max_spare(config.max_spare);
        self.set_default_alloc_size(config.default_alloc_size);
    }

    pub fn config(&self) -> PoolConfig {
        PoolConfig {
            max_spare: self.inner.max_spare.load(Ordering::Relaxed),
            default_alloc_size: self.inner.default_alloc_size.load(Ordering::Relaxed),
        }
    }

    /// Borrow a buffer.
    ///
    /// Pops any spare (previous contents are not cleared) or allocates a
    /// zeroed buffer of the default size. Never waits for a buffer to be
    /// returned.
    pub fn get_buffer(&self) -> PooledBuffer {
        let size = self.inner.default_alloc_size.load(Ordering::Relaxed);
        let buf = match self.inner.pop_spare() {
            Some(mut buf) => {
                // Spares held across a size change take the new size.
                buf.resize(size, 0);
                self.inner.reused.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.inner.allocated.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(size, "allocating pool buffer");
                vec![0; size]
            }
        };
        PooledBuffer::new(buf, self.inner.clone())
    }

    /// Number of buffers currently on the spare list.
    pub fn spare_len(&self) -> usize {
        self.inner.spare.lock().len()
    }

    /// Free every spare buffer, returning how many were released.
    pub fn shrink(&self) -> usize {
        let released = std::mem::take(&mut *self.inner.spare.lock()).len();
        tracing::debug!(released, "buffer pool shrunk");
        released
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            spare: self.spare_len(),
            allocated: self.inner.allocated.load(Ordering::Relaxed),
            reused: self.inner.reused.load(Ordering::Relaxed),
            reclaimed: self.inner.reclaimed.load(Ordering::Relaxed),
            discarded: self.inner.discarded.load(Ordering::Relaxed),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("config", &self.config())
            .field("stats", &self.stats())
            .finish()
    }
}

pub(crate) struct PoolInner {
    spare: Mutex<Vec<Vec<u8>>>,
    max_spare: AtomicUsize,
    default_alloc_size: AtomicUsize,
    allocated: AtomicU64,
    reused: AtomicU64,
    reclaimed: AtomicU64,
    discarded: AtomicU64,
}

impl PoolInner {
    fn new(config: PoolConfig) -> Self {
        Self {
            spare: Mutex::new(Vec::new()),
            max_spare: AtomicUsize::new(config.max_spare),
            default_alloc_size: AtomicUsize::new(config.default_alloc_size),
            allocated: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            reclaimed: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    fn pop_spare(&self) -> Option<Vec<u8>> {
        self.spare.lock().pop()
    }

    /// Reclaim hook, run once per buffer from [`PooledBuffer`]'s `Drop`.
    ///
    /// Only buffers of the current default size are kept; a buffer the
    /// holder grew or shrank is freed.
    pub(crate) fn reclaim(&self, buf: Vec<u8>) {
        let size = self.default_alloc_size.load(Ordering::Relaxed);
        if buf.len() != size {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(len = buf.len(), size, "resized buffer, freeing");
            return;
        }
        let max_spare = self.max_spare.load(Ordering::Relaxed);
        let mut spare = self.spare.lock();
        if spare.len() < max_spare {
            spare.push(buf);
            drop(spare);
            self.reclaimed.fetch_add(1, Ordering::Relaxed);
        } else {
            drop(spare);
            self.discarded.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(max_spare, "spare list full, freeing buffer");
        }
    }
}
