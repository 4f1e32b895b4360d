//! Per-category label templates.
//!
//! A [`LabelTemplates`] table maps a category name to the ordered list of
//! attribute [`Field`]s shown in that category's label. Categories missing
//! from the table are labeled with their name and code only.
//!
//! In TOML a field is either a bare attribute name or a table carrying a
//! default value:
//!
//! ```toml
//! [templates]
//! professor = ["name", "age"]
//! course = [{ name = "title", default = "string" }, { name = "credits", default = "int" }]
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

/// One attribute slot of a label template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "FieldRepr")]
pub struct Field {
    name: String,
    default: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl From<FieldRepr> for Field {
    fn from(repr: FieldRepr) -> Self {
        match repr {
            FieldRepr::Name(name) => Self::new(name),
            FieldRepr::Full { name, default } => Self { name, default },
        }
    }
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// Value shown when a node does not carry this attribute.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Mapping from category name to its ordered label fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LabelTemplates {
    categories: IndexMap<String, Vec<Field>>,
}

impl LabelTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the template of `category`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::template::{Field, LabelTemplates};
    ///
    /// let templates = LabelTemplates::new()
    ///     .with_category("professor", ["name", "age"])
    ///     .with_category("course", [Field::new("title").with_default("string")]);
    ///
    /// assert_eq!(templates.fields("professor").unwrap().len(), 2);
    /// assert!(templates.fields("student").is_none());
    /// ```
    pub fn with_category<F>(
        mut self,
        category: impl Into<String>,
        fields: impl IntoIterator<Item = F>,
    ) -> Self
    where
        F: Into<Field>,
    {
        self.categories
            .insert(category.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    /// Fields declared for `category`, or `None` if the category has no template.
    pub fn fields(&self, category: &str) -> Option<&[Field]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Visual format of node labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    /// Name and code on separate lines in a rounded box.
    #[default]
    Plain,
    /// `{ name | code | attr : value }` record shape.
    Record,
}
