//! Node identifiers backed by a global string interner.
//!
//! Every logical entity in a diagram is keyed by an [`Id`]. Keys are derived
//! from the entity's category and numeric id, so the same entity referenced
//! from several trees always resolves to the same key.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier of a node in a render.
///
/// Cheap to copy and compare. The string form is what ends up as the node
/// name in the exported graph.
///
/// # Examples
///
/// ```
/// use arbor_core::identifier::Id;
///
/// let key = Id::entity("professor", "25323");
/// assert_eq!(key, "professor_25323");
///
/// let italian = key.with_prefix("it");
/// assert_eq!(italian, "itprofessor_25323");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from its full string form.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the stable key of an entity from its category and id.
    ///
    /// # Arguments
    ///
    /// * `category` - Category (display name) of the entity, e.g. `"student"`
    /// * `id` - Numeric identifier of the entity, e.g. `"45356"`
    pub fn entity(category: &str, id: &str) -> Self {
        Self::new(&format!("{category}_{id}"))
    }

    /// Creates a new `Id` with `prefix` prepended to this identifier.
    ///
    /// An empty prefix returns the identifier unchanged.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return *self;
        }
        let mut interner = interner();
        let name = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let prefixed = format!("{prefix}{name}");
        Self(interner.get_or_intern(&prefixed))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("entity_01740");
        let id2 = Id::new("entity_01740");
        let id3 = Id::new("person_10502");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "entity_01740");
    }

    #[test]
    fn test_entity_key() {
        let key = Id::entity("research project", "65984");
        assert_eq!(key, "research project_65984");
        assert_eq!(key, Id::new("research project_65984"));
    }

    #[test]
    fn test_same_entity_collapses() {
        let first = Id::entity("graduation", "48450");
        let second = Id::entity("graduation", "48450");
        let other_category = Id::entity("lecture", "48450");

        assert_eq!(first, second);
        assert_ne!(first, other_category);
    }

    #[test]
    fn test_with_prefix() {
        let key = Id::entity("entity", "01740");

        assert_eq!(key.with_prefix("ukc_"), "ukc_entity_01740");
        assert_eq!(key.with_prefix("it"), "itentity_01740");
        assert_eq!(key.with_prefix(""), key);
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{id}"), "display_test");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("student_45356");

        assert!(id == "student_45356");
        assert!(id != "student");

        let empty = Id::new("");
        assert!(empty == "");
        assert!(empty != "non-empty");
    }
}
