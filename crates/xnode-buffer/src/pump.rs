use xnode_reader::NodeReader;
use xnode_writer::{NodeWriter, WriteError};

use crate::error::BufferError;

/// Write the reader's current node to the writer.
///
/// Dispatches through [`NodeWriter::write_node`], so a reader sitting on
/// `EndOfStream` closes the writer and one sitting on `StartOfStream`
/// writes nothing.
///
/// # Errors
///
/// Whatever the writer returns for the dispatched call.
pub fn write_current<R, W>(reader: &R, writer: &mut W) -> Result<(), WriteError>
where
    R: NodeReader + ?Sized,
    W: NodeWriter + ?Sized,
{
    writer.write_node(reader.current())
}

/// Drain `reader` into `writer`, returning the number of nodes written.
///
/// Line info is relayed only if the reader has it **and** the writer
/// asked for it, and only when the position actually changes between
/// nodes, so a stream without positions costs nothing extra.
///
/// ```text
///   loop reader.read():
///     [line info changed && both sides opted in] → writer.set_line_info(p)
///     write_current(reader, writer)
///   close_writer → writer.close()
/// ```
///
/// # Errors
///
/// - `BufferError::Read` if the reader fails; the writer is left open.
/// - `BufferError::Write` if the writer refuses a node.
pub fn transform<R, W>(reader: &mut R, writer: &mut W, close_writer: bool) -> Result<usize, BufferError>
where
    R: NodeReader + ?Sized,
    W: NodeWriter + ?Sized,
{
    let relay_line_info = reader.has_line_info() && writer.should_provide_line_info();
    let mut last_line_info = None;
    let mut written = 0;

    while reader.read()? {
        if relay_line_info
            && let Some(info) = reader.line_info()
            && last_line_info != Some(info)
        {
            writer.set_line_info(info)?;
            last_line_info = Some(info);
        }
        write_current(reader, writer)?;
        written += 1;
    }

    if close_writer {
        writer.close()?;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xnode_reader::{DelegateReader, ReadError};
    use xnode_types::{LineInfo, Node, NodeValue, XamlType};
    use xnode_writer::DelegateWriter;

    fn value(n: i64) -> Node {
        Node::Value(Arc::new(NodeValue::Int(n)))
    }

    fn positioned() -> Vec<Node> {
        vec![
            Node::LineInfo(LineInfo::new(1, 1)),
            Node::StartObject(Arc::new(XamlType::new("urn:ui", "List"))),
            Node::LineInfo(LineInfo::new(2, 1)),
            value(1),
            value(2),
            Node::LineInfo(LineInfo::new(3, 1)),
            Node::EndObject,
        ]
    }

    #[test]
    fn copies_every_node_and_closes() {
        let mut reader = DelegateReader::from_nodes(vec![value(1), value(2), value(3)]);
        let mut writer = DelegateWriter::new(Vec::new());

        let written = transform(&mut reader, &mut writer, true).unwrap();

        assert_eq!(written, 3);
        assert!(writer.is_closed());
        assert_eq!(writer.into_sink(), vec![value(1), value(2), value(3), Node::END_OF_STREAM]);
    }

    #[test]
    fn leaves_writer_open_when_asked() {
        let mut reader = DelegateReader::from_nodes(vec![value(1)]);
        let mut writer = DelegateWriter::new(Vec::new());
        transform(&mut reader, &mut writer, false).unwrap();
        assert!(!writer.is_closed());
    }

    #[test]
    fn relays_line_info_only_on_change() {
        let mut reader = DelegateReader::from_nodes(positioned());
        let mut writer = DelegateWriter::with_line_info(Vec::new());
        transform(&mut reader, &mut writer, true).unwrap();

        let nodes = writer.into_sink();
        assert_eq!(nodes.len(), positioned().len() + 1);
        assert_eq!(&nodes[..positioned().len()], positioned().as_slice());
    }

    #[test]
    fn drops_line_info_when_writer_opted_out() {
        let mut reader = DelegateReader::from_nodes(positioned());
        let mut writer = DelegateWriter::new(Vec::new());
        let written = transform(&mut reader, &mut writer, true).unwrap();

        assert_eq!(written, 4);
        assert!(writer.sink().iter().all(|n| !n.is_line_info()));
    }

    #[test]
    fn reader_failure_is_reported() {
        let mut calls = 0;
        let mut reader = DelegateReader::from_fn(|| {
            calls += 1;
            if calls < 3 {
                Ok(value(calls))
            } else {
                Err(ReadError::upstream("truncated input"))
            }
        });
        let mut writer = DelegateWriter::new(Vec::new());

        let err = transform(&mut reader, &mut writer, true).unwrap_err();
        assert!(matches!(err, BufferError::Read(ReadError::Upstream(_))));
        assert_eq!(writer.sink().len(), 2);
        assert!(!writer.is_closed());
    }

    #[test]
    fn writer_failure_is_reported() {
        let mut reader = DelegateReader::from_nodes(vec![value(1)]);
        let mut writer = DelegateWriter::new(Vec::new());
        writer.close().unwrap();

        let err = transform(&mut reader, &mut writer, true).unwrap_err();
        assert!(matches!(err, BufferError::Write(WriteError::Closed)));
    }

    #[test]
    fn write_current_follows_the_cursor() {
        let mut reader = DelegateReader::from_nodes(vec![Node::GetObject]);
        let mut writer = DelegateWriter::new(Vec::new());

        write_current(&reader, &mut writer).unwrap();
        assert!(writer.sink().is_empty());

        reader.read().unwrap();
        write_current(&reader, &mut writer).unwrap();
        reader.read().unwrap();
        write_current(&reader, &mut writer).unwrap();

        assert!(writer.is_closed());
        assert_eq!(writer.into_sink(), vec![Node::GetObject, Node::END_OF_STREAM]);
    }
}
