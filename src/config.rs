//! Configuration for the codec and its pools
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for codec pools and staging buffers
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Pool Configuration
    // -------------------------------------------------------------------------
    /// Max idle codec pairs kept by a pool. Pairs released while the pool is
    /// full are dropped.
    pub pool_capacity: usize,

    /// Idle staging buffers kept per method name by a buffer pool
    pub buffers_per_method: usize,

    /// Distinct method names a buffer pool keeps buffers for. Buffers for
    /// further methods are dropped on release.
    pub max_pooled_methods: usize,

    // -------------------------------------------------------------------------
    // Buffer Configuration
    // -------------------------------------------------------------------------
    /// Initial capacity of staging buffers (in bytes)
    pub buffer_capacity: usize,

    /// Staging buffers grown beyond this (in bytes) are shrunk on reset
    pub max_retained_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_capacity: 64,
            buffers_per_method: 8,
            max_pooled_methods: 256,
            buffer_capacity: 4 * 1024, // 4 KB
            max_retained_capacity: 1024 * 1024, // 1 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the number of idle codec pairs a pool retains
    pub fn pool_capacity(mut self, count: usize) -> Self {
        self.config.pool_capacity = count;
        self
    }

    /// Set the number of idle buffers retained per method name
    pub fn buffers_per_method(mut self, count: usize) -> Self {
        self.config.buffers_per_method = count;
        self
    }

    /// Set the number of method names a buffer pool keeps buffers for
    pub fn max_pooled_methods(mut self, count: usize) -> Self {
        self.config.max_pooled_methods = count;
        self
    }

    /// Set the initial staging buffer capacity (in bytes)
    pub fn buffer_capacity(mut self, bytes: usize) -> Self {
        self.config.buffer_capacity = bytes;
        self
    }

    /// Set the capacity above which staging buffers are shrunk (in bytes)
    pub fn max_retained_capacity(mut self, bytes: usize) -> Self {
        self.config.max_retained_capacity = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
