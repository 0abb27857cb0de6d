/// Implementation of `xnode stats`.
///
/// Replays a manifest through a `NodeList` and prints a node-kind
/// distribution plus structural facts about the stream.
///
/// # Example output
///
/// ```text
/// File:    button.json
/// Nodes:   7 total (1 line info markers)
///
/// Kind                   Count
/// ────────────────────────────
/// namespace                  1
/// start_object               1
/// end_object                 1
/// start_member               1
/// end_member                 1
/// value                      1
/// ────────────────────────────
/// Total                      6
///
/// Max depth:  2
/// Balanced:   yes
/// ```
use std::collections::BTreeMap;

use anyhow::Result;
use xnode_buffer::NodeList;
use xnode_reader::NodeReader;
use xnode_types::NodeType;
use xnode_writer::NodeWriter;

use crate::StatsArgs;
use crate::manifest;

/// Counts gathered from one pass over a stream.
#[derive(Debug, Default, PartialEq, Eq)]
struct Stats {
    by_kind: BTreeMap<NodeType, usize>,
    max_depth: usize,
    /// Depth after the last node; zero for a well-formed stream.
    final_depth: usize,
    /// Set if a close node arrived with nothing open.
    underflow: bool,
}

impl Stats {
    fn total(&self) -> usize {
        self.by_kind.values().sum()
    }

    fn balanced(&self) -> bool {
        self.final_depth == 0 && !self.underflow
    }
}

fn collect(reader: &mut impl NodeReader) -> Result<Stats> {
    let mut stats = Stats::default();
    let mut depth = 0usize;

    while reader.read()? {
        let kind = reader.node_type();
        *stats.by_kind.entry(kind).or_default() += 1;
        if kind.opens_scope() {
            depth += 1;
            stats.max_depth = stats.max_depth.max(depth);
        } else if matches!(kind, NodeType::EndObject | NodeType::EndMember) {
            match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => stats.underflow = true,
            }
        }
    }
    stats.final_depth = depth;
    Ok(stats)
}

/// Run the `xnode stats` command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded.
pub fn run(args: &StatsArgs) -> Result<()> {
    let nodes = manifest::load(&args.file)?;
    let mut list = NodeList::with_line_info();
    for node in &nodes {
        list.writer().write_node(node)?;
    }
    list.writer().close()?;

    let recorded = list.count();
    let stats = collect(&mut list.get_reader()?)?;
    let markers = recorded - stats.total();

    println!("File:    {}", args.file.display());
    println!("Nodes:   {recorded} total ({markers} line info markers)");
    println!();
    println!("{:<20} {:>7}", "Kind", "Count");
    println!("{}", "─".repeat(28));
    for (kind, count) in &stats.by_kind {
        println!("{:<20} {count:>7}", kind.as_str());
    }
    println!("{}", "─".repeat(28));
    println!("{:<20} {:>7}", "Total", stats.total());
    println!();
    println!("Max depth:  {}", stats.max_depth);
    println!("Balanced:   {}", if stats.balanced() { "yes" } else { "no" });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xnode_reader::DelegateReader;
    use xnode_types::{Node, XamlType};

    fn start() -> Node {
        Node::StartObject(Arc::new(XamlType::new("", "Grid")))
    }

    #[test]
    fn counts_and_depth() {
        let mut reader =
            DelegateReader::from_nodes(vec![start(), Node::GetObject, Node::EndObject, Node::EndObject]);
        let stats = collect(&mut reader).unwrap();
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.by_kind[&NodeType::EndObject], 2);
        assert_eq!(stats.max_depth, 2);
        assert!(stats.balanced());
    }

    #[test]
    fn unbalanced_streams_are_flagged() {
        let stats = collect(&mut DelegateReader::from_nodes(vec![start()])).unwrap();
        assert!(!stats.balanced());

        let stats = collect(&mut DelegateReader::from_nodes(vec![Node::EndMember])).unwrap();
        assert!(stats.underflow);
        assert!(!stats.balanced());
    }
}
