//! Serializable description of a complete diagram.
//!
//! A [`Dataset`] carries everything one diagram needs: forests of trees,
//! standalone entities, labeled relations between entities, language layers
//! and the alignment between layers. The renderer consumes it in that order.
//!
//! A minimal dataset in TOML:
//!
//! ```toml
//! title = "person_isa"
//! direction = "bottom-to-top"
//!
//! [[forests]]
//! relationship = "IS-A"
//! root = { id = "01740", category = "entity" }
//!
//! [[forests.trees]]
//! id = "10502"
//! category = "person"
//! children = [{ id = "25323", category = "professor" }]
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    identifier::Id,
    model::{Node, Relationship},
    spec::{Direction, LineStyle},
    template::{LabelFormat, LabelTemplates},
};

/// How a layer names its nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// The category as written in the dataset.
    #[default]
    Source,
    /// Looked up in the layer's translation table, falling back to the source.
    Translated,
    /// No name line at all.
    Hidden,
}

/// How a layer chooses the code shown under a node's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodePolicy {
    /// The node's code, or its id.
    #[default]
    Identifier,
    /// A cosmetic digit string from the seeded generator.
    Random,
}

/// One rendition of the dataset's trees (a language or lexicon).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    /// Layer name, used as the cluster label.
    pub name: String,

    /// Group the layer's nodes in a cluster.
    #[serde(default)]
    pub cluster: bool,

    /// Prepended to every node key of this layer.
    #[serde(default)]
    pub key_prefix: String,

    /// Prepended to every displayed code of this layer.
    #[serde(default)]
    pub code_prefix: String,

    #[serde(default)]
    pub names: NamePolicy,

    #[serde(default)]
    pub codes: CodePolicy,

    /// Source category → translated name.
    #[serde(default)]
    pub translations: IndexMap<String, String>,

    /// Unprefixed node key → displayed code, for this layer only.
    #[serde(default)]
    pub code_overrides: IndexMap<String, String>,
}

impl LayerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Styling of a cluster as written in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterSpec {
    #[serde(default)]
    pub label: Option<String>,

    /// Any CSS color string.
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub pen_width: Option<f32>,
}

/// A group of trees sharing a relationship kind and an optional root.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Forest {
    #[serde(default)]
    pub relationship: Relationship,

    /// Parent of every tree's top node.
    #[serde(default)]
    pub root: Option<Node>,

    /// Cluster holding the tree nodes; the root stays outside it.
    #[serde(default)]
    pub cluster: Option<ClusterSpec>,

    #[serde(default)]
    pub trees: Vec<Node>,
}

/// Reference to an entity by category and id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeRef {
    #[serde(alias = "name")]
    pub category: String,
    pub id: String,
}

impl NodeRef {
    pub fn new(category: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            id: id.into(),
        }
    }

    /// Stable key of the referenced entity.
    pub fn key(&self) -> Id {
        Id::entity(&self.category, &self.id)
    }
}

/// A labeled edge between two entities.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relation {
    pub source: NodeRef,
    pub target: NodeRef,

    #[serde(default)]
    pub label: String,

    /// Layer both endpoints live in; the first layer when absent.
    #[serde(default)]
    pub layer: Option<String>,

    #[serde(default)]
    pub style: Option<LineStyle>,

    #[serde(default)]
    pub reversed: bool,

    #[serde(default)]
    pub color: Option<String>,
}

/// Cross-layer alignment: every aligned key in every other layer points at
/// the concept layer's node of the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alignment {
    /// Name of the concept layer.
    pub concept: String,

    /// Unprefixed node keys (`category_id`) to align.
    #[serde(default)]
    pub nodes: Vec<String>,

    /// Align every node registered in the concept layer.
    #[serde(default)]
    pub all: bool,
}

/// A complete diagram description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    /// Subject of the diagram; names the output file.
    pub title: String,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub direction: Direction,

    #[serde(default)]
    pub labels: LabelFormat,

    #[serde(default)]
    pub templates: LabelTemplates,

    /// Layers to render; a single anonymous layer when empty.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,

    #[serde(default)]
    pub forests: Vec<Forest>,

    #[serde(default)]
    pub entities: Vec<Node>,

    #[serde(default)]
    pub relations: Vec<Relation>,

    #[serde(default)]
    pub alignment: Option<Alignment>,
}

impl Dataset {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
