//! Assembly of a [`Dataset`] into a validated [`RenderSpec`].
//!
//! Render order is fixed: forests (per layer), standalone entities,
//! relations, then alignment edges. The spec is validated before it is
//! handed back, so every edge endpoint of the result is registered.

use indexmap::IndexSet;
use log::{debug, info, trace};

use arbor_core::{
    color::Color,
    dataset::{Alignment, ClusterSpec, Dataset, Relation},
    identifier::Id,
    model::{Node, Relationship},
    spec::{Cluster, EdgeHints, LineStyle, RenderSpec, SpecEdge},
};

use crate::{
    codes::CodeGenerator, config::AppConfig, error::ArborError, layer::Layer,
    render::TreeRenderer,
};

/// Builds the spec of `dataset` under `config`.
pub(crate) fn assemble(dataset: &Dataset, config: &AppConfig) -> Result<RenderSpec, ArborError> {
    info!(dataset = dataset.title.as_str(), forests = dataset.forests.len(); "Assembling dataset");

    let mut assembly = Assembly::new(dataset, config)?;
    assembly.forests()?;
    assembly.entities()?;
    assembly.relations()?;
    if let Some(alignment) = &dataset.alignment {
        assembly.alignment(alignment)?;
    }

    let spec = assembly.spec;
    spec.validate()?;
    debug!(
        nodes = spec.node_count(),
        edges = spec.edge_count(),
        clusters = spec.clusters().len();
        "Dataset assembled"
    );
    Ok(spec)
}

struct Assembly<'a> {
    dataset: &'a Dataset,
    config: &'a AppConfig,
    cluster_color: Option<Color>,
    layers: Vec<Layer>,
    codes: CodeGenerator,
    spec: RenderSpec,
}

impl<'a> Assembly<'a> {
    fn new(dataset: &'a Dataset, config: &'a AppConfig) -> Result<Self, ArborError> {
        let cluster_color = config.style().cluster_color().map_err(ArborError::Config)?;

        let mut spec = RenderSpec::new().with_direction(dataset.direction);
        if let Some(comment) = &dataset.comment {
            spec = spec.with_comment(comment.as_str());
        }

        let layers = if dataset.layers.is_empty() {
            vec![Layer::default()]
        } else {
            dataset
                .layers
                .iter()
                .map(|layer| {
                    let cluster = layer.cluster.then(|| {
                        let mut cluster = Cluster::new().with_label(layer.name.as_str());
                        if let Some(color) = cluster_color {
                            cluster = cluster.with_color(color);
                        }
                        spec.add_cluster(cluster)
                    });
                    Layer::from_spec(layer, cluster)
                })
                .collect()
        };

        let render = config.render();
        Ok(Self {
            dataset,
            config,
            cluster_color,
            layers,
            codes: CodeGenerator::new(render.seed(), render.code_digits()),
            spec,
        })
    }

    fn forests(&mut self) -> Result<(), ArborError> {
        let dataset = self.dataset;
        for layer in &self.layers {
            for (index, forest) in dataset.forests.iter().enumerate() {
                debug!(layer = layer.name(), forest = index; "Rendering forest");

                let cluster = forest
                    .cluster
                    .as_ref()
                    .map(|spec| cluster_from(spec, self.cluster_color))
                    .transpose()?
                    .map(|cluster| self.spec.add_cluster(cluster));

                let mut renderer = TreeRenderer::new(
                    &dataset.templates,
                    dataset.labels,
                    layer,
                    &mut self.codes,
                );
                let root = match &forest.root {
                    Some(root) => Some(renderer.render_node(
                        &mut self.spec,
                        root,
                        None,
                        &forest.relationship,
                    )?),
                    None => None,
                };

                let mut renderer = renderer.with_cluster(cluster);
                for tree in &forest.trees {
                    renderer.render_node(&mut self.spec, tree, root, &forest.relationship)?;
                }
            }
        }
        Ok(())
    }

    fn entities(&mut self) -> Result<(), ArborError> {
        let dataset = self.dataset;
        let Some(layer) = self.layers.first() else {
            return Ok(());
        };
        let mut renderer =
            TreeRenderer::new(&dataset.templates, dataset.labels, layer, &mut self.codes);
        for entity in &dataset.entities {
            renderer.render_node(&mut self.spec, entity, None, &Relationship::IsA)?;
        }
        Ok(())
    }

    fn relations(&mut self) -> Result<(), ArborError> {
        for relation in &self.dataset.relations {
            let edge = self.relation_edge(relation)?;
            trace!(source:% = edge.source(), target:% = edge.target(); "Adding relation");
            self.spec.add_edge(edge);
        }
        Ok(())
    }

    fn relation_edge(&self, relation: &Relation) -> Result<SpecEdge, ArborError> {
        let layer = self.layer(relation.layer.as_deref())?;

        let kind = Relationship::from(relation.label.as_str());
        let mut hints = kind.default_hints();
        if let Some(style) = relation.style {
            hints = hints.with_style(style);
        }
        if relation.reversed {
            hints = hints.with_reversed(true);
        }
        if let Some(color) = &relation.color {
            let color = Color::new(color).map_err(|err| {
                ArborError::Config(format!("invalid color `{color}` on relation: {err}"))
            })?;
            hints = hints.with_color(color);
        }

        Ok(SpecEdge::new(
            layer.key(relation.source.key()),
            layer.key(relation.target.key()),
            kind,
        )
        .with_hints(hints))
    }

    fn alignment(&mut self, alignment: &Alignment) -> Result<(), ArborError> {
        let concept_index = self
            .layers
            .iter()
            .position(|layer| layer.name() == alignment.concept)
            .ok_or_else(|| ArborError::UnknownLayer(alignment.concept.clone()))?;
        let color = self
            .config
            .style()
            .alignment_color()
            .map_err(ArborError::Config)?;
        let hints = EdgeHints::new()
            .with_style(LineStyle::Dotted)
            .with_reversed(true)
            .with_color(color);

        let keys = if alignment.all {
            self.forest_keys()
        } else {
            alignment.nodes.iter().map(|key| Id::new(key)).collect()
        };
        info!(concept = alignment.concept.as_str(), keys = keys.len(); "Aligning layers");

        let concept = &self.layers[concept_index];
        for &key in &keys {
            let target = concept.key(key);
            for (index, layer) in self.layers.iter().enumerate() {
                if index == concept_index {
                    continue;
                }
                let edge = SpecEdge::new(layer.key(key), target, Relationship::labeled(""))
                    .with_hints(hints);
                self.spec.add_edge(edge);
            }
        }
        Ok(())
    }

    /// Unprefixed keys of every forest node, in registration order.
    ///
    /// Standalone entities live in the first layer only, so they have no
    /// counterpart to align with.
    fn forest_keys(&self) -> IndexSet<Id> {
        let mut keys = IndexSet::new();
        for forest in &self.dataset.forests {
            for node in forest.root.iter().chain(&forest.trees) {
                collect_keys(node, &mut keys);
            }
        }
        keys
    }

    fn layer(&self, name: Option<&str>) -> Result<&Layer, ArborError> {
        match name {
            None => self
                .layers
                .first()
                .ok_or_else(|| ArborError::UnknownLayer(String::new())),
            Some(name) => self
                .layers
                .iter()
                .find(|layer| layer.name() == name)
                .ok_or_else(|| ArborError::UnknownLayer(name.to_string())),
        }
    }
}

fn cluster_from(spec: &ClusterSpec, default_color: Option<Color>) -> Result<Cluster, ArborError> {
    let mut cluster = Cluster::new();
    if let Some(label) = &spec.label {
        cluster = cluster.with_label(label.as_str());
    }
    let color = match &spec.color {
        Some(color) => Some(Color::new(color).map_err(|err| {
            ArborError::Config(format!("invalid cluster color `{color}`: {err}"))
        })?),
        None => default_color,
    };
    if let Some(color) = color {
        cluster = cluster.with_color(color);
    }
    if let Some(width) = spec.pen_width {
        cluster = cluster.with_pen_width(width);
    }
    Ok(cluster)
}

fn collect_keys(node: &Node, keys: &mut IndexSet<Id>) {
    keys.insert(node.key());
    for child in node.children() {
        collect_keys(child, keys);
    }
}
