#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xnode_buffer::NodeQueue;
use xnode_fuzz::FuzzNode;
use xnode_reader::NodeReader;
use xnode_writer::NodeWriter;

#[derive(Debug, Arbitrary)]
enum Op {
    Write(FuzzNode),
    Read,
}

// Fuzz target: interleaved writes and reads on a NodeQueue, checked
// against a VecDeque model.
fuzz_target!(|ops: Vec<Op>| {
    let mut queue = NodeQueue::with_line_info();
    let mut model = VecDeque::new();

    for op in ops {
        match op {
            Op::Write(node) => {
                let node = node.into_node();
                queue.writer().write_node(&node).unwrap();
                model.push_back(node);
            }
            Op::Read => {
                while model.front().is_some_and(|n| n.is_line_info()) {
                    model.pop_front();
                }
                let expected = model.pop_front();
                let reader = queue.reader();
                match expected {
                    Some(node) => {
                        assert!(reader.read().unwrap());
                        assert_eq!(reader.current(), &node);
                    }
                    None => assert!(!reader.read().unwrap()),
                }
            }
        }
        assert_eq!(queue.count(), model.len());
    }
});
