/// Implementation of `xnode inspect`.
///
/// Loads a manifest, writes it into the buffer chosen by `--via`, reads it
/// back and prints one line per node, indented by nesting depth.
///
/// # Example output
///
/// ```text
/// via list: 6 nodes
///    0  1:1    NamespaceDeclaration xmlns="urn:ui"
///    1  1:1    StartObject {urn:ui}Button
///    2  2:3      StartMember Button.Content
///    3  2:3        Value "OK"
///    4  2:3      EndMember
///    5  3:1    EndObject
/// ```
///
/// Positions are printed only with `--line-info`.
use anyhow::{Context, Result};
use xnode_buffer::{BackgroundConfig, BackgroundReader, NodeList, NodeQueue};
use xnode_reader::{DelegateReader, NodeReader};
use xnode_types::{Node, NodeType};
use xnode_writer::NodeWriter;

use crate::manifest;
use crate::{InspectArgs, Via};

/// Run the `xnode inspect` command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or a buffer rejects
/// the stream.
pub fn run(args: &InspectArgs) -> Result<()> {
    let nodes = manifest::load(&args.file)?;

    let lines = match args.via {
        Via::List => {
            let mut list = if args.line_info { NodeList::with_line_info() } else { NodeList::new() };
            fill(list.writer(), &nodes, args.line_info)?;
            list.writer().close()?;
            render(&mut list.get_reader()?)?
        }
        Via::Queue => {
            let mut queue = if args.line_info { NodeQueue::with_line_info() } else { NodeQueue::new() };
            fill(queue.writer(), &nodes, args.line_info)?;
            render(queue.reader())?
        }
        Via::Background => {
            let config = BackgroundConfig {
                capacity: args.capacity,
                provide_line_info: args.line_info,
                ..BackgroundConfig::default()
            };
            let mut reader = BackgroundReader::with_config(DelegateReader::from_nodes(nodes), config)?;
            reader.start_thread(Some("xnode-inspect"))?;
            render(&mut reader)?
        }
    };

    println!("via {}: {} nodes", via_name(args.via), lines.len());
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn via_name(via: Via) -> &'static str {
    match via {
        Via::List => "list",
        Via::Queue => "queue",
        Via::Background => "background",
    }
}

/// Write `nodes` into `writer`, dropping line info unless it is wanted.
fn fill(writer: &mut impl NodeWriter, nodes: &[Node], line_info: bool) -> Result<()> {
    for (index, node) in nodes.iter().enumerate() {
        if node.is_line_info() && !line_info {
            continue;
        }
        writer
            .write_node(node)
            .with_context(|| format!("buffer rejected node {index}"))?;
    }
    Ok(())
}

/// Drain `reader` into printable lines.
fn render(reader: &mut impl NodeReader) -> Result<Vec<String>> {
    let show_position = reader.has_line_info();
    let mut depth = 0usize;
    let mut lines = Vec::new();

    while reader.read()? {
        let node = reader.current();
        if matches!(node.node_type(), NodeType::EndObject | NodeType::EndMember) {
            depth = depth.saturating_sub(1);
        }
        let position = if show_position {
            format!("{:<7}", format!("{}:{}", reader.line_number(), reader.line_position()))
        } else {
            String::new()
        };
        lines.push(format!("{:>4}  {position}{}{node}", lines.len(), "  ".repeat(depth)));
        if node.node_type().opens_scope() {
            depth += 1;
        }
    }
    Ok(lines)
}
