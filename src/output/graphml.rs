//! GraphML export
//!
//! Writes the graph in the GraphML interchange format with a single integer
//! node attribute for the content size. Bare nodes omit the attribute.

use crate::graph::EntityGraph;
use crate::output::{OutputError, OutputResult, CONTENT_SIZE_ATTR};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";
const SIZE_KEY: &str = "d0";

/// Writes a graph to a GraphML file
pub fn write_graphml(graph: &EntityGraph, path: &Path) -> OutputResult<()> {
    let document = format_graphml(graph)?;
    std::fs::write(path, document)?;
    Ok(())
}

/// Formats a graph as a GraphML document
///
/// Nodes and edges are sorted by id so the same graph always produces the
/// same document.
pub fn format_graphml(graph: &EntityGraph) -> OutputResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("graphml");
    root.push_attribute(("xmlns", GRAPHML_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    write(&mut writer, Event::Start(root))?;

    let mut key = BytesStart::new("key");
    key.push_attribute(("id", SIZE_KEY));
    key.push_attribute(("for", "node"));
    key.push_attribute(("attr.name", CONTENT_SIZE_ATTR));
    key.push_attribute(("attr.type", "long"));
    write(&mut writer, Event::Empty(key))?;

    let mut graph_el = BytesStart::new("graph");
    graph_el.push_attribute(("edgedefault", "directed"));
    write(&mut writer, Event::Start(graph_el))?;

    let mut nodes: Vec<_> = graph.nodes().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    for node in nodes {
        let mut node_el = BytesStart::new("node");
        node_el.push_attribute(("id", node.id.as_str()));

        match node.content_size {
            Some(size) => {
                write(&mut writer, Event::Start(node_el))?;
                let mut data = BytesStart::new("data");
                data.push_attribute(("key", SIZE_KEY));
                write(&mut writer, Event::Start(data))?;
                let size = size.to_string();
                write(&mut writer, Event::Text(BytesText::new(&size)))?;
                write(&mut writer, Event::End(BytesEnd::new("data")))?;
                write(&mut writer, Event::End(BytesEnd::new("node")))?;
            }
            None => write(&mut writer, Event::Empty(node_el))?,
        }
    }

    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort();
    for (source, target) in edges {
        let mut edge_el = BytesStart::new("edge");
        edge_el.push_attribute(("source", source.as_str()));
        edge_el.push_attribute(("target", target.as_str()));
        write(&mut writer, Event::Empty(edge_el))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("graph")))?;
    write(&mut writer, Event::End(BytesEnd::new("graphml")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| OutputError::Format(e.to_string()))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> OutputResult<()> {
    writer
        .write_event(event)
        .map_err(|e| OutputError::Write(format!("GraphML: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;

    #[test]
    fn test_format_graphml() {
        let mut graph = EntityGraph::new();
        graph.add_node(&EntityId::new("Johnny Cash"), 120);
        graph.add_edge(&EntityId::new("Johnny Cash"), &EntityId::new("June Carter Cash"));

        let xml = format_graphml(&graph).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"attr.name="length_of_content""#));
        assert!(xml.contains(r#"<graph edgedefault="directed">"#));
        assert!(xml.contains(r#"<node id="Johnny_Cash">"#));
        assert!(xml.contains(r#"<data key="d0">120</data>"#));
        assert!(xml.contains(r#"<node id="June_Carter_Cash"/>"#));
        assert!(xml.contains(r#"<edge source="Johnny_Cash" target="June_Carter_Cash"/>"#));
    }

    #[test]
    fn test_ids_are_escaped() {
        let mut graph = EntityGraph::new();
        graph.add_node(&EntityId::new("Brooks & Dunn"), 1);

        let xml = format_graphml(&graph).unwrap();
        assert!(xml.contains(r#"<node id="Brooks_&amp;_Dunn">"#));
    }

    #[test]
    fn test_empty_graph() {
        let xml = format_graphml(&EntityGraph::new()).unwrap();
        assert!(xml.contains("<graph edgedefault=\"directed\">"));
        assert!(!xml.contains("<node"));
    }
}
