//! Bidirectional placeholder mapping.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Bijective mapping between original identifiers and their placeholders.
///
/// Entries keep their assignment order, which is the first-occurrence order
/// of the originals. Serialized as a JSON object from placeholder to
/// original, in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    /// (placeholder, original) in assignment order
    entries: Vec<(String, String)>,
    /// Original -> index into `entries`
    forward: HashMap<String, usize>,
    /// Placeholder -> index into `entries`
    reverse: HashMap<String, usize>,
}

impl NameMapping {
    /// Create a new empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placeholder for an original identifier.
    ///
    /// Returns `false` and leaves the mapping untouched if either side is
    /// already mapped.
    pub fn insert(&mut self, placeholder: impl Into<String>, original: impl Into<String>) -> bool {
        let placeholder = placeholder.into();
        let original = original.into();
        if self.reverse.contains_key(&placeholder) || self.forward.contains_key(&original) {
            return false;
        }

        let index = self.entries.len();
        self.forward.insert(original.clone(), index);
        self.reverse.insert(placeholder.clone(), index);
        self.entries.push((placeholder, original));
        true
    }

    /// Look up the original identifier from a placeholder.
    pub fn to_original(&self, placeholder: &str) -> Option<&str> {
        self.reverse
            .get(placeholder)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Look up the placeholder assigned to an original identifier.
    pub fn to_placeholder(&self, original: &str) -> Option<&str> {
        self.forward
            .get(original)
            .map(|&i| self.entries[i].0.as_str())
    }

    /// Whether `name` has been handed out as a placeholder.
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.reverse.contains_key(name)
    }

    /// All (placeholder, original) pairs in assignment order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(p, o)| (p.as_str(), o.as_str()))
    }

    /// Number of mapped identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no identifier has been mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for NameMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (placeholder, original) in &self.entries {
            map.serialize_entry(placeholder, original)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NameMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NameMappingVisitor)
    }
}

struct NameMappingVisitor;

impl<'de> Visitor<'de> for NameMappingVisitor {
    type Value = NameMapping;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from placeholder to original identifier")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut mapping = NameMapping::new();
        while let Some((placeholder, original)) = access.next_entry::<String, String>()? {
            if !mapping.insert(placeholder.clone(), original.clone()) {
                return Err(serde::de::Error::custom(format!(
                    "mapping is not bijective at {:?} -> {:?}",
                    placeholder, original
                )));
            }
        }
        Ok(mapping)
    }
}
