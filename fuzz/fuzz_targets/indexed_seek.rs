#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xnode_buffer::NodeList;
use xnode_fuzz::{nodes, FuzzNode};
use xnode_reader::{NodeReader, ReadError};
use xnode_writer::NodeWriter;

#[derive(Debug, Arbitrary)]
enum Op {
    Read,
    Skip,
    Seek(Option<u16>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    nodes: Vec<FuzzNode>,
    ops: Vec<Op>,
}

// Fuzz target: random reads, skips and seeks on an indexed reader.
//
// Catches bugs in:
// - Out-of-range seeks that do not fail cleanly
// - Cursor indices past the end of the list
// - Line info lookups on seek
fuzz_target!(|input: Input| {
    let nodes = nodes(input.nodes);
    let mut list = NodeList::with_line_info();
    for node in &nodes {
        list.writer().write_node(node).unwrap();
    }
    list.writer().close().unwrap();
    let mut reader = list.get_reader().unwrap();
    let count = reader.count();

    for op in input.ops {
        match op {
            Op::Read => {
                reader.read().unwrap();
            }
            Op::Skip => {
                reader.skip().unwrap();
            }
            Op::Seek(index) => {
                let index = index.map(usize::from);
                match reader.set_current_index(index) {
                    Ok(()) => {}
                    Err(ReadError::IndexOutOfRange { index: i, count: c }) => {
                        assert!(i >= c);
                        assert_eq!(c, count);
                    }
                    Err(other) => panic!("unexpected seek error: {other}"),
                }
            }
        }
        if let Some(index) = reader.current_index() {
            assert!(index <= count);
            if index < count {
                assert_eq!(reader.current(), &nodes[index]);
            } else {
                assert!(reader.is_eof());
            }
        }
    }
});
