//! Tree-to-spec rendering.
//!
//! [`TreeRenderer`] walks a nested [`Node`] structure depth-first and
//! registers every node and parent edge in a [`RenderSpec`]. Traversal order
//! is insertion order, so the same input always produces the same spec.

use log::{debug, trace, warn};

use arbor_core::{
    identifier::Id,
    model::{Node, Relationship},
    spec::{ClusterId, Label, RenderSpec, SpecEdge, SpecNode},
    template::{LabelFormat, LabelTemplates},
};

use crate::{codes::CodeGenerator, error::ArborError, layer::Layer};

/// Converts nested node trees into nodes and edges of a [`RenderSpec`].
///
/// A renderer is bound to one [`Layer`]: keys, names and codes of every
/// rendered node come from that layer.
///
/// # Examples
///
/// ```
/// use arbor::{CodeGenerator, Layer, TreeRenderer};
/// use arbor_core::{
///     model::{Node, Relationship},
///     spec::RenderSpec,
///     template::{LabelFormat, LabelTemplates},
/// };
///
/// let tree = Node::new("10502", "person")
///     .with_child(Node::new("25323", "professor"))
///     .with_child(Node::new("45356", "student"));
///
/// let templates = LabelTemplates::new();
/// let layer = Layer::default();
/// let mut codes = CodeGenerator::new(0, 5);
/// let mut spec = RenderSpec::new();
///
/// TreeRenderer::new(&templates, LabelFormat::Plain, &layer, &mut codes)
///     .render_node(&mut spec, &tree, None, &Relationship::IsA)
///     .unwrap();
///
/// assert_eq!(spec.node_count(), 3);
/// assert_eq!(spec.edge_count(), 2);
/// ```
pub struct TreeRenderer<'a> {
    templates: &'a LabelTemplates,
    format: LabelFormat,
    layer: &'a Layer,
    codes: &'a mut CodeGenerator,
    cluster: Option<ClusterId>,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(
        templates: &'a LabelTemplates,
        format: LabelFormat,
        layer: &'a Layer,
        codes: &'a mut CodeGenerator,
    ) -> Self {
        Self {
            templates,
            format,
            layer,
            codes,
            cluster: layer.cluster(),
        }
    }

    /// Places rendered nodes in `cluster` instead of the layer's cluster.
    pub fn with_cluster(mut self, cluster: Option<ClusterId>) -> Self {
        if cluster.is_some() {
            self.cluster = cluster;
        }
        self
    }

    /// Registers `node` and its subtree in `spec`.
    ///
    /// If `parent` is given, an edge between `node` and `parent` is added,
    /// oriented by the node's effective relationship: its own, if it declares
    /// one, else `relationship`. Children inherit the effective relationship.
    ///
    /// Returns the layer key of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::MalformedNode`] for the first node in traversal
    /// order that lacks an id or a category. Nodes visited before it remain
    /// registered in `spec`.
    pub fn render_node(
        &mut self,
        spec: &mut RenderSpec,
        node: &Node,
        parent: Option<Id>,
        relationship: &Relationship,
    ) -> Result<Id, ArborError> {
        let path = segment(node, None);
        self.render_at(spec, node, parent, relationship, &path)
    }

    fn render_at(
        &mut self,
        spec: &mut RenderSpec,
        node: &Node,
        parent: Option<Id>,
        relationship: &Relationship,
        path: &str,
    ) -> Result<Id, ArborError> {
        check_node(node, path)?;

        let key = self.layer.key(node.key());
        if spec.contains(key) {
            debug!(node_id:% = key; "Node already registered, reusing");
        } else {
            let label = self.label(node);
            trace!(node_id:% = key, label:?; "Registering node");
            spec.register(SpecNode::new(key, label).with_cluster(self.cluster));
        }

        let effective = node.relationship().unwrap_or(relationship);

        if let Some(parent) = parent {
            let (source, target) = effective.orient(key, parent);
            spec.add_edge(SpecEdge::new(source, target, effective.clone()));
        }

        for (index, child) in node.children().iter().enumerate() {
            let child_path = format!("{path} > {}", segment(child, Some(index)));
            self.render_at(spec, child, Some(key), effective, &child_path)?;
        }

        Ok(key)
    }

    /// Computes the label of `node` in this renderer's layer and format.
    ///
    /// The label holds the name line (if the layer shows names), the code
    /// line, then one `attribute : value` part per template field of the
    /// node's category. A category without a template gets no attribute
    /// parts.
    pub fn label(&mut self, node: &Node) -> Label {
        let mut parts = Vec::new();
        if let Some(name) = self.layer.display_name(node.category()) {
            parts.push(name);
        }
        parts.push(self.layer.display_code(node, self.codes));

        match self.templates.fields(node.category()) {
            Some(fields) => {
                for field in fields {
                    let value = node
                        .attribute(field.name())
                        .or(field.default_value())
                        .unwrap_or_else(|| {
                            warn!(
                                category = node.category(),
                                attribute = field.name();
                                "Node lacks a template attribute"
                            );
                            ""
                        });
                    parts.push(format!("{} : {value}", field.name()));
                }
            }
            None => {
                trace!(category = node.category(); "No label template, using identifier only");
            }
        }

        match self.format {
            LabelFormat::Plain => Label::Plain(parts),
            LabelFormat::Record => Label::Record(parts),
        }
    }
}

fn check_node(node: &Node, path: &str) -> Result<(), ArborError> {
    if is_blank(node.id()) {
        return Err(ArborError::malformed_node(path, "id"));
    }
    if is_blank(node.category()) {
        return Err(ArborError::malformed_node(path, "category"));
    }
    Ok(())
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Human-readable position of `node`: its key when well-formed, else its
/// child index.
fn segment(node: &Node, index: Option<usize>) -> String {
    match (is_blank(node.id()) || is_blank(node.category()), index) {
        (false, _) => node.key().to_string(),
        (true, Some(index)) => format!("children[{index}]"),
        (true, None) => "<root>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::{
        dataset::{CodePolicy, LayerSpec, NamePolicy},
        spec::{Cluster, LineStyle},
        template::Field,
    };

    use super::*;

    fn render(
        templates: &LabelTemplates,
        format: LabelFormat,
        layer: &Layer,
        node: &Node,
        parent: Option<Id>,
        relationship: &Relationship,
    ) -> (RenderSpec, Result<Id, ArborError>) {
        let mut spec = RenderSpec::new();
        let mut codes = CodeGenerator::new(0, 5);
        let result = TreeRenderer::new(templates, format, layer, &mut codes)
            .render_node(&mut spec, node, parent, relationship);
        (spec, result)
    }

    #[test]
    fn test_single_node_with_attributes() {
        let templates = LabelTemplates::new().with_category("person", ["name"]);
        let node = Node::new("1", "person").with_attribute("name", "Ann");

        let (spec, result) = render(
            &templates,
            LabelFormat::Record,
            &Layer::default(),
            &node,
            None,
            &Relationship::IsA,
        );

        assert_eq!(result.unwrap(), "person_1");
        assert_eq!(spec.node_count(), 1);
        assert_eq!(spec.edge_count(), 0);
        let node = spec.node(Id::new("person_1")).unwrap();
        assert!(node.label().contains("Ann"));
        assert_eq!(
            node.label().parts(),
            ["person".to_string(), "1".to_string(), "name : Ann".to_string()]
        );
    }

    #[test]
    fn test_is_a_edges_point_child_to_parent() {
        let tree = Node::new("10502", "person")
            .with_child(Node::new("25323", "professor"))
            .with_child(Node::new("45356", "student"));

        let (spec, result) = render(
            &LabelTemplates::new(),
            LabelFormat::Plain,
            &Layer::default(),
            &tree,
            None,
            &Relationship::IsA,
        );
        let root = result.unwrap();

        assert_eq!(spec.node_count(), 3);
        assert_eq!(spec.edge_count(), 2);
        for edge in spec.edges() {
            assert_eq!(edge.target(), root);
            assert_eq!(edge.label(), "IS-A");
            assert!(!edge.hints().reversed());
        }
        assert_eq!(spec.edges()[0].source(), "professor_25323");
        assert_eq!(spec.edges()[1].source(), "student_45356");
    }

    #[test]
    fn test_part_of_edges_point_parent_to_child_reversed() {
        let tree = Node::new("00500", "events").with_child(Node::new("48450", "graduation"));

        let (spec, _) = render(
            &LabelTemplates::new(),
            LabelFormat::Plain,
            &Layer::default(),
            &tree,
            Some(Id::new("entity_01740")),
            &Relationship::PartOf,
        );

        let edges = spec.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source(), "entity_01740");
        assert_eq!(edges[0].target(), "events_00500");
        assert_eq!(edges[1].source(), "events_00500");
        assert_eq!(edges[1].target(), "graduation_48450");
        for edge in edges {
            assert!(edge.hints().reversed());
            assert_eq!(edge.hints().style(), LineStyle::Dashed);
        }
    }

    #[test]
    fn test_child_relationship_override_propagates() {
        let tree = Node::new("10502", "professor")
            .with_relationship(Relationship::PartOf)
            .with_child(
                Node::new("25323", "person")
                    .with_relationship(Relationship::IsA)
                    .with_child(Node::new("01741", "entity")),
            );

        let (spec, _) = render(
            &LabelTemplates::new(),
            LabelFormat::Record,
            &Layer::default(),
            &tree,
            Some(Id::new("university_01740")),
            &Relationship::IsA,
        );

        let kinds: Vec<&Relationship> = spec.edges().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            [&Relationship::PartOf, &Relationship::IsA, &Relationship::IsA]
        );
    }

    #[test]
    fn test_missing_category_uses_identifier_only() {
        let templates = LabelTemplates::new().with_category("professor", ["name", "age"]);
        let node = Node::new("84321", "administrative staff").with_attribute("name", "Giovanna");

        let (spec, result) = render(
            &templates,
            LabelFormat::Record,
            &Layer::default(),
            &node,
            None,
            &Relationship::IsA,
        );

        let key = result.unwrap();
        assert_eq!(
            spec.node(key).unwrap().label().parts(),
            ["administrative staff".to_string(), "84321".to_string()]
        );
    }

    #[test]
    fn test_template_defaults_and_missing_attributes() {
        let templates = LabelTemplates::new().with_category(
            "course",
            [
                Field::new("title").with_default("string"),
                Field::new("credits"),
            ],
        );
        let node = Node::new("30112", "course");

        let (spec, result) = render(
            &templates,
            LabelFormat::Record,
            &Layer::default(),
            &node,
            None,
            &Relationship::IsA,
        );

        let key = result.unwrap();
        assert_eq!(
            spec.node(key).unwrap().label().parts(),
            [
                "course".to_string(),
                "30112".to_string(),
                "title : string".to_string(),
                "credits : ".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_node_reports_path() {
        let tree = Node::new("46884", "event")
            .with_child(Node::new("48370", "university event"))
            .with_child(Node::new("", "graduation"));

        let (spec, result) = render(
            &LabelTemplates::new(),
            LabelFormat::Plain,
            &Layer::default(),
            &tree,
            None,
            &Relationship::IsA,
        );

        match result {
            Err(ArborError::MalformedNode { path, missing }) => {
                assert_eq!(path, "event_46884 > children[1]");
                assert_eq!(missing, "id");
            }
            other => panic!("expected MalformedNode, got {other:?}"),
        }
        assert_eq!(spec.node_count(), 2);
    }

    #[test]
    fn test_blank_id_reports_child_index() {
        let tree = Node::new("10502", "person").with_child(Node::new("  ", "professor"));

        let (_, result) = render(
            &LabelTemplates::new(),
            LabelFormat::Plain,
            &Layer::default(),
            &tree,
            None,
            &Relationship::IsA,
        );

        match result {
            Err(ArborError::MalformedNode { path, missing }) => {
                assert_eq!(path, "person_10502 > children[0]");
                assert_eq!(missing, "id");
            }
            other => panic!("expected MalformedNode, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_root() {
        let node = Node::new("10502", "");
        let (_, result) = render(
            &LabelTemplates::new(),
            LabelFormat::Plain,
            &Layer::default(),
            &node,
            None,
            &Relationship::IsA,
        );
        assert!(matches!(
            result,
            Err(ArborError::MalformedNode { missing: "category", .. })
        ));
    }

    #[test]
    fn test_repeated_entity_collapses() {
        let templates = LabelTemplates::new();
        let layer = Layer::default();
        let mut codes = CodeGenerator::new(0, 5);
        let mut spec = RenderSpec::new();

        let isa = Node::new("48370", "university event").with_child(Node::new("48450", "graduation"));
        let part_of = Node::new("00500", "events").with_child(Node::new("48450", "graduation"));

        let mut renderer = TreeRenderer::new(&templates, LabelFormat::Plain, &layer, &mut codes);
        renderer
            .render_node(&mut spec, &isa, None, &Relationship::IsA)
            .unwrap();
        renderer
            .render_node(&mut spec, &part_of, None, &Relationship::PartOf)
            .unwrap();

        assert_eq!(spec.node_count(), 3);
        assert_eq!(spec.edge_count(), 2);

        // Rendering the same tree again adds nothing.
        renderer
            .render_node(&mut spec, &isa, None, &Relationship::IsA)
            .unwrap();
        assert_eq!(spec.node_count(), 3);
        assert_eq!(spec.edge_count(), 2);
    }

    #[test]
    fn test_rerendered_nodes_keep_their_random_code() {
        let mut layer_spec = LayerSpec::new("Italiano");
        layer_spec.codes = CodePolicy::Random;
        let layer = Layer::from_spec(&layer_spec, None);
        let templates = LabelTemplates::new();
        let tree = Node::new("10502", "person").with_child(Node::new("25323", "professor"));

        let mut spec = RenderSpec::new();
        let mut codes = CodeGenerator::new(11, 5);
        let mut renderer = TreeRenderer::new(&templates, LabelFormat::Plain, &layer, &mut codes);
        renderer
            .render_node(&mut spec, &tree, None, &Relationship::IsA)
            .unwrap();
        let first = spec.node(Id::new("person_10502")).unwrap().label().clone();
        renderer
            .render_node(&mut spec, &tree, None, &Relationship::IsA)
            .unwrap();

        assert_eq!(spec.node(Id::new("person_10502")).unwrap().label(), &first);

        // Two nodes drew two codes; the second pass drew none.
        let mut reference = CodeGenerator::new(11, 5);
        assert_eq!(first.parts()[1], reference.next_code());
        reference.next_code();
        assert_eq!(codes.next_code(), reference.next_code());
    }

    #[test]
    fn test_layer_keys_names_and_cluster() {
        let mut spec = RenderSpec::new();
        let cluster = spec.add_cluster(Cluster::new().with_label("UKC"));

        let mut layer_spec = LayerSpec::new("UKC");
        layer_spec.key_prefix = "ukc_".to_string();
        layer_spec.names = NamePolicy::Hidden;
        layer_spec.codes = CodePolicy::Random;
        let layer = Layer::from_spec(&layer_spec, Some(cluster));

        let templates = LabelTemplates::new();
        let mut codes = CodeGenerator::new(9, 5);
        let tree = Node::new("46884", "event").with_child(Node::new("48370", "university event"));

        let key = TreeRenderer::new(&templates, LabelFormat::Plain, &layer, &mut codes)
            .render_node(&mut spec, &tree, None, &Relationship::IsA)
            .unwrap();

        assert_eq!(key, "ukc_event_46884");
        let node = spec.node(key).unwrap();
        assert_eq!(node.cluster(), Some(cluster));
        assert_eq!(node.label().parts().len(), 1);
        assert_eq!(node.label().parts()[0].len(), 5);
        assert_eq!(spec.cluster_nodes(cluster).count(), 2);
    }

    #[test]
    fn test_forest_cluster_overrides_layer_cluster() {
        let mut spec = RenderSpec::new();
        let university = spec.add_cluster(Cluster::new().with_label("University"));

        let templates = LabelTemplates::new();
        let layer = Layer::default();
        let mut codes = CodeGenerator::new(0, 5);
        let tree = Node::new("40111", "location");

        let key = TreeRenderer::new(&templates, LabelFormat::Record, &layer, &mut codes)
            .with_cluster(Some(university))
            .render_node(&mut spec, &tree, None, &Relationship::IsA)
            .unwrap();

        assert_eq!(spec.node(key).unwrap().cluster(), Some(university));
    }
}
