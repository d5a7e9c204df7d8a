//! Per-method staging buffers
//!
//! Repeated calls to the same method tend to produce similarly sized
//! documents, so idle buffers are kept per method name. Each caller gets a
//! buffer of its own; nothing is shared while a buffer is in use.

use std::collections::HashMap;

use bytes::{BufMut, Bytes, BytesMut};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::mapper::ToValue;

use super::CodecPool;

/// Idle staging buffers keyed by method name
pub struct BufferPool {
    idle: Mutex<HashMap<String, Vec<BytesMut>>>,
    config: Config,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPool {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            idle: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Run `f` with an exclusive, empty buffer for `method`
    pub fn with_buffer<T, F>(&self, method: &str, f: F) -> T
    where
        F: FnOnce(&mut BytesMut) -> T,
    {
        let mut buf = self.take(method);
        let result = f(&mut buf);
        self.put(method, buf);
        result
    }

    /// Encode a call to `method` into a frozen buffer
    pub fn encode_request(&self, codecs: &CodecPool, method: &str, args: &[&dyn ToValue]) -> Result<Bytes> {
        self.with_buffer(method, |buf| -> Result<Bytes> {
            codecs.with_codec(|codec| codec.write_request((&mut *buf).writer(), method, args))?;
            Ok(buf.split().freeze())
        })
    }

    /// Number of method names holding idle buffers
    pub fn methods(&self) -> usize {
        self.idle.lock().len()
    }

    /// Number of idle buffers held for `method`
    pub fn idle(&self, method: &str) -> usize {
        self.idle.lock().get(method).map_or(0, Vec::len)
    }

    fn take(&self, method: &str) -> BytesMut {
        let reused = self.idle.lock().get_mut(method).and_then(Vec::pop);
        match reused {
            Some(buf) => {
                tracing::trace!("Reusing staging buffer for {}", method);
                buf
            }
            None => BytesMut::with_capacity(self.config.buffer_capacity),
        }
    }

    fn put(&self, method: &str, mut buf: BytesMut) {
        if buf.capacity() > self.config.max_retained_capacity {
            tracing::trace!("Dropping oversized staging buffer for {}", method);
            return;
        }
        buf.clear();

        let mut idle = self.idle.lock();
        if let Some(buffers) = idle.get_mut(method) {
            if buffers.len() < self.config.buffers_per_method {
                buffers.push(buf);
            }
            return;
        }
        if idle.len() >= self.config.max_pooled_methods || self.config.buffers_per_method == 0 {
            tracing::trace!("Not pooling staging buffer for {}", method);
            return;
        }
        idle.insert(method.to_string(), vec![buf]);
    }
}
