//! Generic metadata node tree.
//!
//! Passes that know nothing about the typed compiler facts still need to
//! carry them around. They do so through [`MdNode`], a schema-less tree made
//! of scalars, optional markers, ordered lists and named records. Trees are
//! attached to a module or to a function through a [`NamedMetadata`] store.
//!
//! A handful of names are reserved for compiler-owned facts. Those slots are
//! addressed through marker types implementing [`MetadataKey`], which cannot
//! be implemented outside of this crate. The string-keyed user interface
//! refuses reserved names, so user metadata can never clobber them.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIs;

use crate::utils::Error;

/// A node of the generic metadata tree.
#[derive(Debug, Clone, PartialEq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MdNode {
    Bool(bool),
    /// Integer scalar. Unsigned 64-bit values are stored bit-cast.
    Int(i64),
    Float(f64),
    Str(String),
    /// Marker for an optional value that is not set.
    Absent,
    /// Marker for an optional value that is set.
    Present(Box<MdNode>),
    List(Vec<MdNode>),
    Record(MdRecord),
}

impl MdNode {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MdNode::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MdNode::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MdNode::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MdNode::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MdNode]> {
        match self {
            MdNode::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&MdRecord> {
        match self {
            MdNode::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Interpret the node as an optional marker.
    ///
    /// Returns `Some(None)` for [`MdNode::Absent`], `Some(Some(inner))` for
    /// [`MdNode::Present`] and `None` for any other kind of node.
    pub fn as_optional(&self) -> Option<Option<&MdNode>> {
        match self {
            MdNode::Absent => Some(None),
            MdNode::Present(inner) => Some(Some(inner)),
            _ => None,
        }
    }
}

/// An ordered set of named child nodes.
///
/// Children keep the order in which they were pushed. Lookups are by name;
/// when a name appears twice the first child wins.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MdRecord {
    fields: Vec<(String, MdNode)>,
}

impl MdRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Builder-style push of a named child.
    pub fn with(mut self, name: impl Into<String>, node: MdNode) -> Self {
        self.push(name, node);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, node: MdNode) {
        self.fields.push((name.into(), node));
    }

    pub fn get(&self, name: &str) -> Option<&MdNode> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, node)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MdNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<MdRecord> for MdNode {
    fn from(value: MdRecord) -> Self {
        MdNode::Record(value)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A reserved metadata root, addressed by type rather than by string.
pub trait MetadataKey: sealed::Sealed {
    const NAME: &'static str;
}

macro_rules! reserved_keys {
    (
        $(
            $(#[$doc:meta])*
            $key:ident => $name:literal
        ),+
        $(,)?
    ) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $key;

            impl sealed::Sealed for $key {}
            impl MetadataKey for $key {
                const NAME: &'static str = $name;
            }
        )+

        /// Every reserved root name, in declaration order.
        pub const RESERVED_NAMES: &[&str] = &[$($name),+];
    };
}

reserved_keys! {
    /// Module-level compiler facts.
    ModuleMetadataRoot => "gfx.module_md",
    /// Function-level compiler facts.
    FunctionMetadataRoot => "gfx.function_md",
    /// Function implementing the coarse-rate phase of a multi-rate pixel shader.
    CoarsePhase => "coarse_phase",
    /// Function implementing the per-pixel phase of a multi-rate pixel shader.
    PixelPhase => "pixel_phase",
}

/// Returns true if `name` is one of the [`RESERVED_NAMES`].
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Named metadata roots scoped to a single module or function.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedMetadata {
    roots: BTreeMap<String, MdNode>,
}

impl NamedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<K: MetadataKey>(&self) -> Option<&MdNode> {
        self.roots.get(K::NAME)
    }

    /// Attach `node` under the reserved root `K`, returning the previous tree.
    pub fn insert<K: MetadataKey>(&mut self, node: MdNode) -> Option<MdNode> {
        self.roots.insert(K::NAME.to_string(), node)
    }

    pub fn remove<K: MetadataKey>(&mut self) -> Option<MdNode> {
        self.roots.remove(K::NAME)
    }

    pub fn contains<K: MetadataKey>(&self) -> bool {
        self.roots.contains_key(K::NAME)
    }

    pub fn get_user(&self, name: &str) -> Result<Option<&MdNode>, Error> {
        Self::check_user_name(name)?;
        Ok(self.roots.get(name))
    }

    pub fn insert_user(&mut self, name: &str, node: MdNode) -> Result<Option<MdNode>, Error> {
        Self::check_user_name(name)?;
        Ok(self.roots.insert(name.to_string(), node))
    }

    pub fn remove_user(&mut self, name: &str) -> Result<Option<MdNode>, Error> {
        Self::check_user_name(name)?;
        Ok(self.roots.remove(name))
    }

    /// Iterate over user roots, skipping the reserved ones.
    pub fn user_roots(&self) -> impl Iterator<Item = (&str, &MdNode)> {
        self.roots
            .iter()
            .filter(|(name, _)| !is_reserved_name(name))
            .map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    fn check_user_name(name: &str) -> Result<(), Error> {
        if is_reserved_name(name) {
            Err(Error::ReservedMetadataName {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_refused_through_user_interface() {
        let mut store = NamedMetadata::new();
        let err = store
            .insert_user(CoarsePhase::NAME, MdNode::Bool(true))
            .unwrap_err();
        assert_eq!(
            err,
            Error::ReservedMetadataName {
                name: "coarse_phase".to_string()
            }
        );
        assert!(store.get_user("pixel_phase").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn user_and_reserved_roots_coexist() {
        let mut store = NamedMetadata::new();
        store.insert::<ModuleMetadataRoot>(MdNode::Int(1));
        store
            .insert_user("frontend.version", MdNode::Str("1.2".into()))
            .unwrap();

        assert_eq!(store.get::<ModuleMetadataRoot>(), Some(&MdNode::Int(1)));
        let user: Vec<_> = store.user_roots().map(|(name, _)| name).collect();
        assert_eq!(user, vec!["frontend.version"]);

        assert_eq!(store.remove::<ModuleMetadataRoot>(), Some(MdNode::Int(1)));
        assert!(!store.contains::<ModuleMetadataRoot>());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn record_lookup_prefers_first_child() {
        let record = MdRecord::new()
            .with("a", MdNode::Int(1))
            .with("b", MdNode::Absent)
            .with("a", MdNode::Int(2));
        assert_eq!(record.get("a"), Some(&MdNode::Int(1)));
        assert_eq!(record.get("b").and_then(MdNode::as_optional), Some(None));
        assert_eq!(record.get("c"), None);
        assert_eq!(record.len(), 3);
    }
}
