//! Conversion of a [`RenderSpec`] into a graphviz directed graph.
//!
//! Statements are emitted in a fixed order: graph attributes, then nodes
//! outside any cluster, then one `cluster_N` subgraph per cluster, then
//! every edge. Within each group the spec's insertion order is kept, so the
//! same spec always prints the same DOT text.

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Subgraph, Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};

use arbor_core::spec::{Cluster, Label, LineStyle, RenderSpec, SpecEdge, SpecNode};

use crate::config::StyleConfig;

/// Builds the graph of `spec`.
pub fn to_graph(spec: &RenderSpec, style: &StyleConfig) -> Graph {
    let mut stmts = vec![Stmt::GAttribute(GraphAttributes::Graph(graph_attributes(
        spec, style,
    )))];

    if let Some(font) = style.font_name() {
        stmts.push(Stmt::GAttribute(GraphAttributes::Node(vec![Attribute(
            plain("fontname"),
            quoted(font),
        )])));
        stmts.push(Stmt::GAttribute(GraphAttributes::Edge(vec![Attribute(
            plain("fontname"),
            quoted(font),
        )])));
    }

    stmts.extend(
        spec.nodes()
            .filter(|node| node.cluster().is_none())
            .map(|node| Stmt::Node(node_stmt(node, style))),
    );

    let mut members: Vec<Vec<Stmt>> = spec.clusters().iter().map(|_| Vec::new()).collect();
    for node in spec.nodes() {
        let bucket = node
            .cluster()
            .and_then(|cluster| members.get_mut(cluster.index()));
        if let Some(bucket) = bucket {
            bucket.push(Stmt::Node(node_stmt(node, style)));
        }
    }
    for (index, (cluster, nodes)) in spec.clusters().iter().zip(members).enumerate() {
        let mut cluster_stmts = vec![Stmt::GAttribute(GraphAttributes::Graph(
            cluster_attributes(cluster),
        ))];
        cluster_stmts.extend(nodes);
        stmts.push(Stmt::Subgraph(Subgraph {
            id: plain(&format!("cluster_{index}")),
            stmts: cluster_stmts,
        }));
    }

    stmts.extend(spec.edges().iter().map(|edge| Stmt::Edge(edge_stmt(edge))));

    Graph::DiGraph {
        id: plain("G"),
        strict: false,
        stmts,
    }
}

/// Prints `spec` as DOT source text.
pub fn to_dot_string(spec: &RenderSpec, style: &StyleConfig) -> String {
    to_graph(spec, style).print(&mut PrinterContext::default())
}

fn graph_attributes(spec: &RenderSpec, style: &StyleConfig) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    if let Some(comment) = spec.comment() {
        attributes.push(Attribute(plain("comment"), quoted(comment)));
    }
    attributes.push(Attribute(plain("rankdir"), plain(spec.direction().rankdir())));
    if let Some(font) = style.font_name() {
        attributes.push(Attribute(plain("fontname"), quoted(font)));
    }
    attributes
}

fn cluster_attributes(cluster: &Cluster) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    if let Some(label) = cluster.label() {
        attributes.push(Attribute(plain("label"), quoted(label)));
    }
    if let Some(color) = cluster.color() {
        attributes.push(Attribute(plain("color"), quoted(&color.to_dot_string())));
    }
    if let Some(width) = cluster.pen_width() {
        attributes.push(Attribute(plain("penwidth"), plain(&width.to_string())));
    }
    attributes
}

fn node_stmt(node: &SpecNode, style: &StyleConfig) -> Node {
    let mut attributes = Vec::new();
    match node.label() {
        Label::Plain(lines) => {
            attributes.push(Attribute(plain("label"), plain_label(lines)));
            attributes.push(Attribute(plain("shape"), plain("box")));
        }
        Label::Record(fields) => {
            attributes.push(Attribute(plain("label"), record_label(fields)));
            attributes.push(Attribute(plain("shape"), plain("record")));
        }
    }
    attributes.push(Attribute(plain("style"), quoted(style.node_style())));

    Node {
        id: vertex_id(&node.id().to_string()),
        attributes,
    }
}

fn edge_stmt(edge: &SpecEdge) -> Edge {
    let hints = edge.hints();
    let mut attributes = vec![Attribute(plain("label"), quoted(edge.label()))];
    if hints.style() != LineStyle::Solid {
        attributes.push(Attribute(plain("style"), plain(hints.style().as_str())));
    }
    if hints.reversed() {
        attributes.push(Attribute(plain("dir"), plain("back")));
    }
    if let Some(color) = hints.color() {
        attributes.push(Attribute(plain("color"), quoted(&color.to_dot_string())));
    }

    Edge {
        ty: EdgeTy::Pair(
            Vertex::N(vertex_id(&edge.source().to_string())),
            Vertex::N(vertex_id(&edge.target().to_string())),
        ),
        attributes,
    }
}

fn plain(text: &str) -> Id {
    Id::Plain(text.to_string())
}

fn vertex_id(key: &str) -> NodeId {
    NodeId(quoted(key), None)
}

/// A double-quoted DOT string holding `text` verbatim.
fn quoted(text: &str) -> Id {
    Id::Escaped(format!("\"{}\"", escape(text)))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Lines of a box label, joined by graphviz's centered line break.
fn plain_label(lines: &[String]) -> Id {
    let body = lines
        .iter()
        .map(|line| escape(line))
        .collect::<Vec<_>>()
        .join("\\n");
    Id::Escaped(format!("\"{body}\""))
}

/// Fields of a vertical record, e.g. `{ person | 10502 | name : Ann }`.
fn record_label(fields: &[String]) -> Id {
    let body = fields
        .iter()
        .map(|field| escape_record_field(field))
        .collect::<Vec<_>>()
        .join(" | ");
    Id::Escaped(format!("\"{{ {body} }}\""))
}

fn escape_record_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in escape(field).chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
