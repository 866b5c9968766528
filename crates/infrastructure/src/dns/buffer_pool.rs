//! Receive buffers for the UDP listener.
//!
//! A `PooledBuffer` is a scoped acquisition: dropping it hands the buffer back
//! to the pool, resized to full length, on every exit path.

use crossbeam_queue::ArrayQueue;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const DEFAULT_POOL_CAPACITY: usize = 256;

#[derive(Debug, Default)]
pub struct BufferPoolStats {
    pub allocations: AtomicU64,
    pub reuses: AtomicU64,
    pub returns: AtomicU64,
    /// Buffers released while the pool was already full.
    pub drops: AtomicU64,
}

#[derive(Debug)]
pub struct BufferPool {
    buffers: ArrayQueue<Vec<u8>>,
    buffer_size: usize,
    stats: BufferPoolStats,
}

impl BufferPool {
    pub fn new(capacity: usize, buffer_size: usize) -> Self {
        Self {
            buffers: ArrayQueue::new(capacity.max(1)),
            buffer_size,
            stats: BufferPoolStats::default(),
        }
    }

    /// Never blocks: an empty pool allocates.
    pub fn acquire(self: &Arc<Self>) -> PooledBuffer {
        let buffer = match self.buffers.pop() {
            Some(buffer) => {
                self.stats.reuses.fetch_add(1, Ordering::Relaxed);
                buffer
            }
            None => {
                self.stats.allocations.fetch_add(1, Ordering::Relaxed);
                vec![0u8; self.buffer_size]
            }
        };

        PooledBuffer {
            buffer: Some(buffer),
            pool: Arc::clone(self),
        }
    }

    fn release(&self, mut buffer: Vec<u8>) {
        buffer.resize(self.buffer_size, 0);
        if self.buffers.push(buffer).is_ok() {
            self.stats.returns.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.drops.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn available(&self) -> usize {
        self.buffers.len()
    }

    pub fn stats(&self) -> &BufferPoolStats {
        &self.stats
    }
}

/// Exclusive handle on a pool buffer.
pub struct PooledBuffer {
    buffer: Option<Vec<u8>>,
    pool: Arc<BufferPool>,
}

impl PooledBuffer {
    /// Shrinks the visible buffer to the bytes actually received.
    pub fn truncate(&mut self, len: usize) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.truncate(len);
        }
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or_default()
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buffer.as_deref_mut().unwrap_or_default()
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.release(buffer);
        }
    }
}
