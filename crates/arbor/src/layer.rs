//! Language layers.
//!
//! A [`Layer`] is one rendition of the dataset's trees: it prefixes node
//! keys so that every layer gets its own copy of each entity, and decides
//! how names and codes appear in labels.

use indexmap::IndexMap;

use arbor_core::{
    dataset::{CodePolicy, LayerSpec, NamePolicy},
    identifier::Id,
    model::Node,
    spec::ClusterId,
};

use crate::codes::CodeGenerator;

/// Runtime form of a [`LayerSpec`], bound to its cluster in a spec.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    name: String,
    key_prefix: String,
    code_prefix: String,
    names: NamePolicy,
    codes: CodePolicy,
    translations: IndexMap<String, String>,
    code_overrides: IndexMap<String, String>,
    cluster: Option<ClusterId>,
}

impl Layer {
    /// Creates a layer from its description.
    ///
    /// `cluster` is the cluster the layer's nodes are placed in, if any.
    pub fn from_spec(spec: &LayerSpec, cluster: Option<ClusterId>) -> Self {
        Self {
            name: spec.name.clone(),
            key_prefix: spec.key_prefix.clone(),
            code_prefix: spec.code_prefix.clone(),
            names: spec.names,
            codes: spec.codes,
            translations: spec.translations.clone(),
            code_overrides: spec.code_overrides.clone(),
            cluster,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }

    /// Maps an unprefixed entity key to this layer's node key.
    pub fn key(&self, entity_key: Id) -> Id {
        entity_key.with_prefix(&self.key_prefix)
    }

    /// The name line for a node of `category`, if this layer shows names.
    pub fn display_name(&self, category: &str) -> Option<String> {
        match self.names {
            NamePolicy::Source => Some(category.to_string()),
            NamePolicy::Translated => Some(
                self.translations
                    .get(category)
                    .cloned()
                    .unwrap_or_else(|| category.to_string()),
            ),
            NamePolicy::Hidden => None,
        }
    }

    /// The code line for `node`, including the layer's code prefix.
    ///
    /// A per-layer override wins over both policies. Under
    /// [`CodePolicy::Random`] the node's own code is not used.
    pub fn display_code(&self, node: &Node, codes: &mut CodeGenerator) -> String {
        let key = node.key().to_string();
        let code = match (self.code_overrides.get(&key), self.codes) {
            (Some(code), _) => code.clone(),
            (None, CodePolicy::Identifier) => node.display_code().to_string(),
            (None, CodePolicy::Random) => codes.next_code(),
        };
        format!("{}{code}", self.code_prefix)
    }
}
