#![no_main]

use libfuzzer_sys::fuzz_target;
use xnode_buffer::NodeList;
use xnode_fuzz::{nodes, without_line_info, FuzzNode};
use xnode_reader::NodeReader;
use xnode_writer::NodeWriter;

// Fuzz target: record arbitrary streams into a NodeList and replay them.
//
// Catches bugs in:
// - Close marker leaking into the recorded list
// - Line info markers surfacing as nodes
// - Readers sharing cursor state
fuzz_target!(|input: Vec<FuzzNode>| {
    let nodes = nodes(input);
    let mut list = NodeList::with_line_info();
    for node in &nodes {
        list.writer().write_node(node).unwrap();
    }
    list.writer().close().unwrap();
    assert_eq!(list.count(), nodes.len());

    let expected = without_line_info(&nodes);
    for _ in 0..2 {
        let mut reader = list.get_reader().unwrap();
        let mut seen = Vec::new();
        while reader.read().unwrap() {
            seen.push(reader.current().clone());
        }
        assert_eq!(seen, expected);
        assert!(!reader.read().unwrap());
    }
});
