//! The flattened render specification.
//!
//! A [`RenderSpec`] is the complete set of nodes, edges and clusters of one
//! diagram, plus global layout hints. Nodes are kept in insertion order and
//! keyed by [`Id`], so registering the same entity twice yields one node.
//!
//! # Invariants
//!
//! - Node order and edge order equal insertion order.
//! - A node key is registered at most once; the first registration wins.
//! - [`RenderSpec::validate`] succeeds only if every edge endpoint names a
//!   registered node.

use indexmap::IndexMap;
use log::trace;
use serde::Deserialize;
use thiserror::Error;

use crate::{color::Color, identifier::Id, model::Relationship};

/// Errors detected while checking a [`RenderSpec`] before export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("edge `{from}` -> `{to}` references unregistered node `{missing}`")]
    UnresolvedEndpoint { from: Id, to: Id, missing: Id },
}

/// Overall direction of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    #[serde(alias = "TB")]
    TopToBottom,
    #[serde(alias = "BT")]
    BottomToTop,
}

impl Direction {
    /// Graphviz `rankdir` value.
    pub fn rankdir(self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::BottomToTop => "BT",
        }
    }
}

/// Line pattern of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Graphviz `style` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }
}

/// Rendering hints attached to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeHints {
    reversed: bool,
    style: LineStyle,
    color: Option<Color>,
}

impl EdgeHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the arrowhead at the source end (`dir=back`).
    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn reversed(&self) -> bool {
        self.reversed
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

/// Text of a node label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Lines stacked in a rounded box.
    Plain(Vec<String>),
    /// Fields of a graphviz `record` shape, stacked vertically.
    Record(Vec<String>),
}

impl Label {
    /// The lines or fields of the label, in display order.
    pub fn parts(&self) -> &[String] {
        match self {
            Self::Plain(parts) | Self::Record(parts) => parts,
        }
    }

    /// Returns `true` if any part of the label contains `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.parts().iter().any(|part| part.contains(text))
    }
}

/// Handle of a cluster registered in a [`RenderSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterId(usize);

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A visual group of nodes (a graphviz `cluster_N` subgraph).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cluster {
    label: Option<String>,
    color: Option<Color>,
    pen_width: Option<f32>,
}

impl Cluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_pen_width(mut self, pen_width: f32) -> Self {
        self.pen_width = Some(pen_width);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn pen_width(&self) -> Option<f32> {
        self.pen_width
    }
}

/// A node registered in a [`RenderSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecNode {
    id: Id,
    label: Label,
    cluster: Option<ClusterId>,
}

impl SpecNode {
    pub fn new(id: Id, label: Label) -> Self {
        Self {
            id,
            label,
            cluster: None,
        }
    }

    pub fn with_cluster(mut self, cluster: Option<ClusterId>) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }
}

/// A directed edge between two registered nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecEdge {
    source: Id,
    target: Id,
    kind: Relationship,
    hints: EdgeHints,
}

impl SpecEdge {
    /// Creates an edge with the default hints of `kind`.
    pub fn new(source: Id, target: Id, kind: Relationship) -> Self {
        let hints = kind.default_hints();
        Self {
            source,
            target,
            kind,
            hints,
        }
    }

    pub fn with_hints(mut self, hints: EdgeHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn kind(&self) -> &Relationship {
        &self.kind
    }

    pub fn hints(&self) -> &EdgeHints {
        &self.hints
    }

    /// Label text drawn on the edge.
    pub fn label(&self) -> &str {
        self.kind.label()
    }
}

/// The complete flattened graph of one diagram.
#[derive(Debug, Clone, Default)]
pub struct RenderSpec {
    comment: Option<String>,
    direction: Direction,
    nodes: IndexMap<Id, SpecNode>,
    edges: Vec<SpecEdge>,
    clusters: Vec<Cluster>,
}

impl RenderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Adds a cluster and returns its handle.
    pub fn add_cluster(&mut self, cluster: Cluster) -> ClusterId {
        self.clusters.push(cluster);
        ClusterId(self.clusters.len() - 1)
    }

    /// Registers a node.
    ///
    /// Returns `false` and leaves the spec untouched if a node with the same
    /// key is already registered.
    pub fn register(&mut self, node: SpecNode) -> bool {
        if self.nodes.contains_key(&node.id) {
            trace!(node_id:% = node.id; "Node already registered");
            return false;
        }
        self.nodes.insert(node.id, node);
        true
    }

    /// Adds an edge.
    ///
    /// Returns `false` if an edge with the same endpoints and kind already
    /// exists. Endpoints are not checked here; see [`RenderSpec::validate`].
    pub fn add_edge(&mut self, edge: SpecEdge) -> bool {
        let duplicate = self.edges.iter().any(|existing| {
            existing.source == edge.source
                && existing.target == edge.target
                && existing.kind == edge.kind
        });
        if duplicate {
            trace!(source:% = edge.source, target:% = edge.target; "Duplicate edge skipped");
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn contains(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: Id) -> Option<&SpecNode> {
        self.nodes.get(&id)
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &SpecNode> {
        self.nodes.values()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[SpecEdge] {
        &self.edges
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0)
    }

    /// Nodes placed in `cluster`, in registration order.
    pub fn cluster_nodes(&self, cluster: ClusterId) -> impl Iterator<Item = &SpecNode> {
        self.nodes
            .values()
            .filter(move |node| node.cluster == Some(cluster))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Checks that every edge endpoint is a registered node.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnresolvedEndpoint`] for the first edge whose
    /// source or target is missing.
    pub fn validate(&self) -> Result<(), SpecError> {
        for edge in &self.edges {
            for endpoint in [edge.source, edge.target] {
                if !self.contains(endpoint) {
                    return Err(SpecError::UnresolvedEndpoint {
                        from: edge.source,
                        to: edge.target,
                        missing: endpoint,
                    });
                }
            }
        }
        Ok(())
    }
}
