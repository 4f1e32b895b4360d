//! The nested input model handed to the renderer.
//!
//! A [`Node`] is a tagged tree node: a category, an id, optional attributes
//! and an ordered list of owned children. The [`Relationship`] of a node
//! determines how the edge to its parent is oriented and styled.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    identifier::Id,
    spec::{EdgeHints, LineStyle},
};

/// Kind of the relationship between a node and its parent.
///
/// Deserializes from `"IS-A"`/`"ISA"`, `"PART-OF"` (case-insensitive) or any
/// other string, which becomes a generic [`Relationship::Labeled`] edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum Relationship {
    /// Taxonomic subtype relationship. Edges point child → parent.
    #[default]
    IsA,
    /// Compositional containment. Edges point parent → child, drawn reversed.
    PartOf,
    /// Any other relationship, drawn child → parent with the given label.
    Labeled(String),
}

impl Relationship {
    /// Creates a generic labeled relationship.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self::Labeled(label.into())
    }

    /// Returns the edge label text for this relationship.
    pub fn label(&self) -> &str {
        match self {
            Self::IsA => "IS-A",
            Self::PartOf => "PART-OF",
            Self::Labeled(label) => label,
        }
    }

    /// Orders the endpoints of the edge between `child` and `parent`.
    ///
    /// Returns `(source, target)`.
    pub fn orient(&self, child: Id, parent: Id) -> (Id, Id) {
        match self {
            Self::PartOf => (parent, child),
            Self::IsA | Self::Labeled(_) => (child, parent),
        }
    }

    /// Rendering hints an edge of this kind gets unless told otherwise.
    pub fn default_hints(&self) -> EdgeHints {
        match self {
            Self::PartOf => EdgeHints::new()
                .with_style(LineStyle::Dashed)
                .with_reversed(true),
            Self::IsA | Self::Labeled(_) => EdgeHints::new(),
        }
    }
}

impl From<String> for Relationship {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "IS-A" | "ISA" => Self::IsA,
            "PART-OF" | "PARTOF" => Self::PartOf,
            _ => Self::Labeled(value),
        }
    }
}

impl From<&str> for Relationship {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A node of an input tree.
///
/// `id` and `category` are required for rendering. They default to empty
/// strings when deserialized so that a missing key is reported by the
/// renderer together with the node's position in the tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Node {
    #[serde(default)]
    id: String,

    #[serde(default, alias = "name")]
    category: String,

    /// Display code shown instead of `id` in the label.
    #[serde(default)]
    code: Option<String>,

    #[serde(default)]
    attributes: IndexMap<String, String>,

    /// Relationship to the parent, overriding the inherited one.
    #[serde(default)]
    relationship: Option<Relationship>,

    #[serde(default)]
    children: Vec<Node>,
}

impl Node {
    /// Creates a leaf node.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::model::Node;
    ///
    /// let tree = Node::new("10502", "person")
    ///     .with_child(Node::new("25323", "professor"))
    ///     .with_child(Node::new("45356", "student"));
    /// assert_eq!(tree.children().len(), 2);
    /// ```
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationship = Some(relationship);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the code shown in labels: the explicit code, else the id.
    pub fn display_code(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.id)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn relationship(&self) -> Option<&Relationship> {
        self.relationship.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Stable key of this node, derived from category and id.
    pub fn key(&self) -> Id {
        Id::entity(&self.category, &self.id)
    }
}
