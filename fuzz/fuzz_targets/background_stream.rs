#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xnode_buffer::{BackgroundConfig, BackgroundReader};
use xnode_fuzz::{nodes, without_line_info, FuzzNode};
use xnode_reader::{DelegateReader, NodeReader};

#[derive(Debug, Arbitrary)]
struct Input {
    nodes: Vec<FuzzNode>,
    capacity: u8,
    /// Stop reading (and drop the reader) after this many nodes.
    stop_after: Option<u16>,
}

// Fuzz target: stream arbitrary nodes through a BackgroundReader.
//
// Catches bugs in:
// - Lost or reordered nodes at buffer boundaries
// - Deadlocks when the consumer abandons the stream mid-way
fuzz_target!(|input: Input| {
    let nodes = nodes(input.nodes);
    let config = BackgroundConfig::with_capacity(usize::from(input.capacity).max(1));
    let mut reader = BackgroundReader::with_config(DelegateReader::from_nodes(nodes.clone()), config).unwrap();
    reader.start_thread(None).unwrap();

    let expected = without_line_info(&nodes);
    let limit = input.stop_after.map_or(usize::MAX, usize::from);
    let mut seen = Vec::new();
    while seen.len() < limit && reader.read().unwrap() {
        seen.push(reader.current().clone());
    }
    assert_eq!(seen[..], expected[..seen.len()]);
    if seen.len() < limit {
        assert_eq!(seen.len(), expected.len());
    }
});
