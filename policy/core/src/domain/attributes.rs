// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Permitted Attribute Keys
//!
//! A permitted attribute is either a scalar key (`"headline"`) or a nested
//! group (`"rewards_attributes" => [...]`) naming the sub-keys a viewer may
//! submit for a sub-resource collection. Serialized, a list of them has the
//! familiar strong-parameters shape:
//!
//! ```json
//! ["headline", {"rewards_attributes": ["id", "title"]}]
//! ```
//!
//! [`AttributeSet`] is the composition type: insertion-ordered, unique by key,
//! with an explicit set-difference step for deny-lists.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Destroy marker accepted inside nested collections
pub const DESTROY_FLAG: &str = "_destroy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermittedAttribute {
    Key(String),
    Nested {
        key: String,
        attributes: Vec<PermittedAttribute>,
    },
}

impl PermittedAttribute {
    pub fn key(name: impl Into<String>) -> Self {
        PermittedAttribute::Key(name.into())
    }

    pub fn nested(key: impl Into<String>, attributes: Vec<PermittedAttribute>) -> Self {
        PermittedAttribute::Nested {
            key: key.into(),
            attributes,
        }
    }

    /// Build a nested group from plain sub-key names.
    pub fn nested_keys(key: impl Into<String>, names: &[&str]) -> Self {
        Self::nested(key, names.iter().map(|n| Self::key(*n)).collect())
    }

    pub fn name(&self) -> &str {
        match self {
            PermittedAttribute::Key(name) => name,
            PermittedAttribute::Nested { key, .. } => key,
        }
    }

    /// Sub-keys of a nested group; empty for scalar keys.
    pub fn children(&self) -> &[PermittedAttribute] {
        match self {
            PermittedAttribute::Key(_) => &[],
            PermittedAttribute::Nested { attributes, .. } => attributes,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, PermittedAttribute::Nested { .. })
    }
}

impl Serialize for PermittedAttribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PermittedAttribute::Key(name) => serializer.serialize_str(name),
            PermittedAttribute::Nested { key, attributes } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, attributes)?;
                map.end()
            }
        }
    }
}

/// Look up an attribute by key in a permitted list.
pub fn find<'a>(attributes: &'a [PermittedAttribute], name: &str) -> Option<&'a PermittedAttribute> {
    attributes.iter().find(|attr| attr.name() == name)
}

/// Insertion-ordered set of permitted attributes, unique by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: IndexMap<String, PermittedAttribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute; the first entry for a key wins. Returns whether it was added.
    pub fn insert(&mut self, attribute: PermittedAttribute) -> bool {
        let name = attribute.name().to_string();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, attribute);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PermittedAttribute> {
        self.entries.get(name)
    }

    /// Set difference by key.
    pub fn difference(&self, denied: &[&str]) -> AttributeSet {
        self.entries
            .values()
            .filter(|attr| !denied.contains(&attr.name()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermittedAttribute> {
        self.entries.values()
    }

    pub fn into_vec(self) -> Vec<PermittedAttribute> {
        self.entries.into_values().collect()
    }
}

impl Extend<PermittedAttribute> for AttributeSet {
    fn extend<T: IntoIterator<Item = PermittedAttribute>>(&mut self, iter: T) {
        for attribute in iter {
            self.insert(attribute);
        }
    }
}

impl FromIterator<PermittedAttribute> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = PermittedAttribute>>(iter: T) -> Self {
        let mut set = AttributeSet::new();
        set.extend(iter);
        set
    }
}
