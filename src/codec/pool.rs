//! Codec pooling
//!
//! Idle pairs sit in a bounded lock-free queue. Acquiring pops one (or builds
//! a fresh pair when the queue is empty) and resets it; dropping the guard
//! pushes it back, on every exit path.

use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::LazyLock;

use crossbeam::queue::ArrayQueue;

use crate::config::Config;

use super::Codec;

/// Bounded pool of reusable [`Codec`] pairs
pub struct CodecPool {
    idle: ArrayQueue<Codec>,
    config: Config,
}

impl Default for CodecPool {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecPool {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            idle: ArrayQueue::new(config.pool_capacity.max(1)),
            config,
        }
    }

    /// Take an exclusive pair, reset for a new call
    pub fn acquire(&self) -> PooledCodec<'_> {
        let mut codec = match self.idle.pop() {
            Some(codec) => codec,
            None => {
                tracing::trace!("No idle codec, creating one");
                Codec::with_config(&self.config)
            }
        };
        codec.reset();
        PooledCodec { pool: self, codec }
    }

    /// Run `f` with a pair that is released when `f` returns
    pub fn with_codec<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut Codec) -> T,
    {
        let mut codec = self.acquire();
        f(&mut codec)
    }

    /// Number of idle pairs
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    fn release(&self, codec: Codec) {
        if self.idle.push(codec).is_err() {
            tracing::trace!("Codec pool full, dropping released codec");
        }
    }
}

/// A pair on loan from a [`CodecPool`]
pub struct PooledCodec<'a> {
    pool: &'a CodecPool,
    codec: Codec,
}

impl Deref for PooledCodec<'_> {
    type Target = Codec;

    fn deref(&self) -> &Codec {
        &self.codec
    }
}

impl DerefMut for PooledCodec<'_> {
    fn deref_mut(&mut self) -> &mut Codec {
        &mut self.codec
    }
}

impl Drop for PooledCodec<'_> {
    fn drop(&mut self) {
        let codec = mem::replace(&mut self.codec, Codec::detached());
        self.pool.release(codec);
    }
}

static SHARED: LazyLock<CodecPool> = LazyLock::new(CodecPool::new);

/// Run `f` with a pair from the process-wide pool
pub fn with_codec<T, F>(f: F) -> T
where
    F: FnOnce(&mut Codec) -> T,
{
    SHARED.with_codec(f)
}
