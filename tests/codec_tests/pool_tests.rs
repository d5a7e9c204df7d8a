//! Pool Tests
//!
//! Tests for codec pooling and per-method staging buffers.

use std::sync::Arc;
use std::thread;

use xmlrpc_codec::{with_codec, BufferPool, Codec, CodecPool, Config, Value};

fn small_config() -> Config {
    Config::builder()
        .pool_capacity(2)
        .buffers_per_method(1)
        .buffer_capacity(256)
        .max_retained_capacity(64 * 1024)
        .build()
}

// =============================================================================
// Codec Pool Tests
// =============================================================================

#[test]
fn test_acquire_release_reuses_pairs() {
    let pool = CodecPool::with_config(small_config());
    assert_eq!(pool.idle(), 0);

    {
        let _a = pool.acquire();
        let _b = pool.acquire();
        assert_eq!(pool.idle(), 0);
    }
    assert_eq!(pool.idle(), 2);

    let _c = pool.acquire();
    assert_eq!(pool.idle(), 1);
}

#[test]
fn test_pool_capacity_bounds_idle_pairs() {
    let pool = CodecPool::with_config(small_config());
    {
        let _guards: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
    }
    assert_eq!(pool.idle(), 2);
}

#[test]
fn test_pair_released_on_error_path() {
    let pool = CodecPool::with_config(small_config());

    let result = pool.with_codec(|codec| codec.read_request("<broken".as_bytes()));
    assert!(result.is_err());
    assert_eq!(pool.idle(), 1);

    let (method, _) = pool
        .with_codec(|codec| codec.read_request("<methodCall><methodName>next</methodName></methodCall>".as_bytes()))
        .unwrap();
    assert_eq!(method, "next");
}

#[test]
fn test_concurrent_calls_are_isolated() {
    let pool = Arc::new(CodecPool::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for round in 0..50i64 {
                    let method = format!("worker{}", i);
                    let expected = i * 1000 + round;

                    let mut body = Vec::new();
                    let mut codec = pool.acquire();
                    codec.write_request(&mut body, &method, &[&expected]).unwrap();
                    drop(codec);

                    let mut received = 0i64;
                    let got = pool
                        .with_codec(|codec: &mut Codec| codec.read_request_into(body.as_slice(), &mut received))
                        .unwrap();
                    assert_eq!(got, method);
                    assert_eq!(received, expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(pool.idle() <= 8);
}

#[test]
fn test_process_wide_pool() {
    let mut out = Vec::new();
    with_codec(|codec| codec.write_value(&mut out, &"shared")).unwrap();

    let mut back = Value::Nil;
    with_codec(|codec| codec.read_value(out.as_slice(), &mut back)).unwrap();
    assert_eq!(back, Value::String("shared".into()));
}

// =============================================================================
// Buffer Pool Tests
// =============================================================================

#[test]
fn test_encode_request_matches_direct_encoding() {
    let codecs = CodecPool::new();
    let buffers = BufferPool::new();

    let staged = buffers.encode_request(&codecs, "Arith.Add", &[&1, &2]).unwrap();

    let mut direct = Vec::new();
    Codec::new().write_request(&mut direct, "Arith.Add", &[&1, &2]).unwrap();
    assert_eq!(&staged[..], direct.as_slice());
}

#[test]
fn test_buffers_retained_per_method() {
    let codecs = CodecPool::new();
    let buffers = BufferPool::with_config(small_config());

    buffers.encode_request(&codecs, "a", &[&1]).unwrap();
    buffers.encode_request(&codecs, "a", &[&2]).unwrap();
    buffers.encode_request(&codecs, "b", &[&3]).unwrap();

    assert_eq!(buffers.idle("a"), 1);
    assert_eq!(buffers.idle("b"), 1);
    assert_eq!(buffers.idle("c"), 0);
}

#[test]
fn test_buffer_handed_out_empty() {
    let buffers = BufferPool::with_config(small_config());

    buffers.with_buffer("m", |buf| buf.extend_from_slice(b"leftover"));
    buffers.with_buffer("m", |buf| assert!(buf.is_empty()));
}

#[test]
fn test_frozen_requests_survive_buffer_reuse() {
    let codecs = CodecPool::new();
    let buffers = BufferPool::new();

    let first = buffers.encode_request(&codecs, "Same.Method", &[&"first"]).unwrap();
    let second = buffers.encode_request(&codecs, "Same.Method", &[&"second"]).unwrap();

    let mut codec = Codec::new();
    let mut a = String::new();
    let mut b = String::new();
    codec.read_request_into(&first[..], &mut a).unwrap();
    codec.read_request_into(&second[..], &mut b).unwrap();
    assert_eq!(a, "first");
    assert_eq!(b, "second");
}

#[test]
fn test_concurrent_same_method_buffers_isolated() {
    let codecs = Arc::new(CodecPool::new());
    let buffers = Arc::new(BufferPool::new());

    let handles: Vec<_> = (0..8i64)
        .map(|i| {
            let codecs = Arc::clone(&codecs);
            let buffers = Arc::clone(&buffers);
            thread::spawn(move || {
                let staged = buffers.encode_request(&codecs, "Shared.Call", &[&i]).unwrap();
                let mut received = -1i64;
                Codec::new().read_request_into(&staged[..], &mut received).unwrap();
                received
            })
        })
        .collect();

    let mut seen: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..8).collect::<Vec<_>>());
}

#[test]
fn test_buffer_pool_caps_method_names() {
    let codecs = CodecPool::new();
    let config = Config::builder().max_pooled_methods(2).build();
    let buffers = BufferPool::with_config(config);

    for method in ["m1", "m2", "m3", "m4"] {
        buffers.encode_request(&codecs, method, &[&1]).unwrap();
    }

    assert_eq!(buffers.methods(), 2);
    assert_eq!(buffers.idle("m1"), 1);
    assert_eq!(buffers.idle("m3"), 0);
    assert_eq!(buffers.idle("m4"), 0);
}
