//! # xmlrpc-codec
//!
//! A streaming XML-RPC codec with:
//! - A tagged-union value model shared by reader and writer
//! - A recursive-descent decoder over a pull tokenizer
//! - An encoder with minimal escaping and fixed float/date formatting
//! - Native value mapping through `ToValue` / `FromValue` and `record!`
//! - Pooled decoder/encoder pairs for concurrent callers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Transport (HTTP, not here)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ byte streams
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Codec                                │
//! │        (pooled Decoder/Encoder pair per call)                │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │     Decoder     │                │     Encoder     │
//!   │ (Token Reader)  │                │    (Writer)     │
//!   └────────┬────────┘                └────────▲────────┘
//!            │              Value               │
//!            └──────────────────┬───────────────┘
//!                               │
//!                      ┌────────▼────────┐
//!                      │     Mapper      │
//!                      │ (native values) │
//!                      └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use xmlrpc_codec::Codec;
//!
//! let mut codec = Codec::new();
//! let mut body = Vec::new();
//! codec.write_request(&mut body, "Arith.Add", &[&2, &3]).unwrap();
//!
//! let (method, params) = codec.read_request(body.as_slice()).unwrap();
//! let mut operands: Vec<i32> = Vec::new();
//! params.project_into(&mut operands).unwrap();
//!
//! assert_eq!(method, "Arith.Add");
//! assert_eq!(operands, vec![2, 3]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fault;
pub mod config;

pub mod value;
pub mod protocol;
pub mod mapper;
pub mod codec;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, XmlRpcError};
pub use fault::{Fault, FaultCode};
pub use config::Config;
pub use value::{Kind, Member, MethodCall, MethodResponse, Params, Value};
pub use mapper::{FromValue, ToValue};
pub use codec::{with_codec, BufferPool, Codec, CodecPool, PooledCodec};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of xmlrpc-codec
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
