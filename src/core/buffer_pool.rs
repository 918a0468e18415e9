//! Reusable scratch buffers for line rendering
//!
//! Buffers are handed out as [`PooledBuffer`] guards. Dropping a guard clears
//! the buffer and returns it to the pool, so every exit path of a render
//! (including `?` on errors) releases it.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::ops::{Deref, DerefMut};

/// Initial capacity of a freshly allocated buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Idle buffers kept around by default
pub const DEFAULT_MAX_IDLE: usize = 64;

/// Buffers that grew beyond this are dropped instead of pooled
pub const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

#[derive(Debug)]
pub struct BufferPool {
    sender: Sender<Vec<u8>>,
    receiver: Receiver<Vec<u8>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    pub fn with_max_idle(max_idle: usize) -> Self {
        let (sender, receiver) = bounded(max_idle.max(1));
        Self { sender, receiver }
    }

    /// Take an empty buffer, allocating one if the pool is drained
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self
            .receiver
            .try_recv()
            .unwrap_or_else(|_| Vec::with_capacity(DEFAULT_BUFFER_CAPACITY));
        PooledBuffer {
            buf: Some(buf),
            pool: self,
        }
    }

    /// Number of idle buffers currently held
    pub fn idle(&self) -> usize {
        self.receiver.len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        // A full pool just lets the buffer drop.
        let _ = self.sender.try_send(buf);
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped handle to a pooled buffer
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    buf: Option<Vec<u8>>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        self.buf.as_ref().expect("buffer present until drop")
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        self.buf.as_mut().expect("buffer present until drop")
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_acquire_returns_empty_buffer() {
        let pool = BufferPool::new();
        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= DEFAULT_BUFFER_CAPACITY);
    }

    #[test]
    fn test_buffer_is_reset_and_reused() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.acquire();
            buf.extend_from_slice(b"hello world");
        }
        assert_eq!(pool.idle(), 1);

        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_released_on_early_return() {
        fn render(pool: &BufferPool, fail: bool) -> Result<usize, &'static str> {
            let mut buf = pool.acquire();
            buf.push(b'x');
            if fail {
                return Err("failed");
            }
            Ok(buf.len())
        }

        let pool = BufferPool::new();
        assert!(render(&pool, true).is_err());
        assert_eq!(pool.idle(), 1);
        assert_eq!(render(&pool, false), Ok(1));
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_oversized_buffers_are_not_retained() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.acquire();
            buf.reserve(MAX_RETAINED_CAPACITY * 2);
        }
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_max_idle_bound() {
        let pool = BufferPool::with_max_idle(2);
        let a = pool.acquire();
        let b = pool.acquire();
        let c = pool.acquire();
        drop((a, b, c));
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_concurrent_acquire() {
        let pool = Arc::new(BufferPool::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let mut buf = pool.acquire();
                        assert!(buf.is_empty());
                        buf.push(i as u8);
                        assert_eq!(buf.as_slice(), &[i as u8]);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread panicked");
        }
        assert!(pool.idle() <= DEFAULT_MAX_IDLE);
    }
}
