//! Background reader integration tests.
//!
//! These exercise the worker thread and the two-buffer exchange from the
//! outside, through the public API only:
//!
//! - **Order**: every node arrives exactly once, in production order, for
//!   buffer sizes from 1 up to larger than the stream.
//! - **Faults**: a wrapped-reader failure after `k` nodes surfaces as one
//!   error after exactly those `k` nodes, then end of stream.
//! - **Memory**: the worker never runs more than two buffers ahead of the
//!   consumer.
//! - **Disposal**: disposing releases a blocked worker and a blocked
//!   consumer.

use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use xnode_buffer::{BackgroundConfig, BackgroundReader, BackgroundState};
use xnode_reader::{DelegateReader, NodeReader, ReadError};
use xnode_tests::{CountingReader, drain, failing_after, numbered, value};

fn background<R>(reader: R, capacity: usize) -> BackgroundReader<R>
where
    R: NodeReader + Send + 'static,
{
    let mut reader = BackgroundReader::with_config(reader, BackgroundConfig::with_capacity(capacity))
        .expect("valid capacity");
    reader.start_thread(None).expect("worker starts");
    reader
}

fn wait_for<R>(reader: &BackgroundReader<R>, state: BackgroundState) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while reader.state() != state {
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {state}, still {}",
            reader.state()
        );
        thread::sleep(Duration::from_millis(1));
    }
}

// ── Order ─────────────────────────────────────────────────────────────────────

#[test]
fn thousand_nodes_arrive_in_order_at_every_capacity() {
    let expected = numbered(1000);
    for capacity in [1, 2, 3, 10, 64, 999, 1000, 1001, 4096] {
        let mut reader = background(DelegateReader::from_nodes(expected.clone()), capacity);
        assert_eq!(drain(&mut reader), expected, "capacity {capacity}");
        assert!(reader.is_eof());
        assert_eq!(reader.state(), BackgroundState::Eof);
    }
}

#[test]
fn end_of_stream_is_sticky() {
    let mut reader = background(DelegateReader::from_nodes(numbered(5)), 2);
    assert_eq!(drain(&mut reader).len(), 5);
    for _ in 0..3 {
        assert!(!reader.read().unwrap());
        assert!(reader.is_eof());
    }
}

// ── Faults ────────────────────────────────────────────────────────────────────

#[test]
fn failure_is_delivered_once_after_every_produced_node() {
    for k in [0, 1, 63, 64, 65, 200] {
        let mut reader = background(failing_after(k), 64);

        for n in 0..k {
            assert!(reader.read().unwrap(), "k={k}: node {n} missing");
            assert_eq!(reader.current(), &value(i64::try_from(n).unwrap()));
        }

        let err = reader.read().unwrap_err();
        assert!(matches!(err, ReadError::Upstream(_)), "k={k}: {err}");
        assert_eq!(err.to_string(), format!("upstream reader failed: source failed after {k} nodes"));
        assert_eq!(reader.state(), BackgroundState::Faulted);

        assert!(!reader.read().unwrap());
        assert!(!reader.read().unwrap());
    }
}

// ── Memory ────────────────────────────────────────────────────────────────────

#[test]
fn worker_stays_within_two_buffers_of_the_consumer() {
    const CAPACITY: usize = 16;
    let (source, produced) = CountingReader::new(5_000);
    let mut reader = background(source, CAPACITY);

    let mut consumed = 0usize;
    while reader.read().unwrap() {
        consumed += 1;
        let ahead = produced.load(Ordering::SeqCst) - consumed;
        assert!(ahead <= 2 * CAPACITY, "worker ran {ahead} nodes ahead");
        if consumed % 500 == 0 {
            // Give the worker time to run as far ahead as it can.
            thread::sleep(Duration::from_millis(2));
            let ahead = produced.load(Ordering::SeqCst) - consumed;
            assert!(ahead <= 2 * CAPACITY, "worker ran {ahead} nodes ahead while idle");
        }
    }
    assert_eq!(consumed, 5_000);
}

#[test]
fn worker_blocks_after_filling_one_buffer() {
    let (source, produced) = CountingReader::new(10_000);
    let reader = background(source, 64);

    wait_for(&reader, BackgroundState::ProducerBlocked);
    assert_eq!(produced.load(Ordering::SeqCst), 64);

    thread::sleep(Duration::from_millis(10));
    assert_eq!(produced.load(Ordering::SeqCst), 64);
}

// ── Disposal ──────────────────────────────────────────────────────────────────

#[test]
fn dispose_releases_a_blocked_worker() {
    let (source, produced) = CountingReader::new(10_000);
    let mut reader = background(source, 8);
    wait_for(&reader, BackgroundState::ProducerBlocked);

    reader.dispose();
    assert_eq!(reader.state(), BackgroundState::Disposed);
    assert!(matches!(reader.read(), Err(ReadError::Disposed)));

    thread::sleep(Duration::from_millis(10));
    let after = produced.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(10));
    assert_eq!(produced.load(Ordering::SeqCst), after);
    assert!(after <= 9, "worker kept producing after dispose: {after}");
}

#[test]
fn dispose_handle_releases_a_blocked_consumer() {
    let (gate, gate_rx) = mpsc::channel::<()>();
    let stalled = DelegateReader::from_fn(move || {
        let _ = gate_rx.recv();
        Ok(xnode_types::Node::END_OF_STREAM)
    });
    let mut reader = background(stalled, 4);
    let handle = reader.dispose_handle();

    let disposer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        handle.dispose();
    });

    assert!(matches!(reader.read(), Err(ReadError::Disposed)));
    disposer.join().unwrap();
    assert!(reader.is_disposed());
    drop(gate);
}

#[test]
fn dropping_mid_stream_does_not_hang() {
    let (source, _produced) = CountingReader::new(1_000_000);
    let mut reader = background(source, 4);
    for _ in 0..10 {
        assert!(reader.read().unwrap());
    }
    drop(reader);
}

#[test]
fn thread_name_comes_from_start_thread() {
    let (tx, rx) = mpsc::channel();
    let named = DelegateReader::from_fn(move || {
        let _ = tx.send(thread::current().name().map(str::to_owned));
        Ok(xnode_types::Node::END_OF_STREAM)
    });
    let config = BackgroundConfig {
        thread_name: Some("from-config".to_string()),
        ..BackgroundConfig::default()
    };
    let mut reader = BackgroundReader::with_config(named, config).unwrap();
    reader.start_thread(Some("from-call")).unwrap();

    assert!(!reader.read().unwrap());
    assert_eq!(rx.recv().unwrap().as_deref(), Some("from-call"));
}
