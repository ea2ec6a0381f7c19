//! Mapping between typed metadata and the generic node tree.
//!
//! Decoding never fails as a whole. A node that is missing or malformed
//! decodes to `None`, and the enclosing record keeps the documented default
//! for that field. Concretely:
//!
//! - enumerations are stored as their integer discriminant; unknown values
//!   leave the default in place;
//! - optional values are stored as [`MdNode::Absent`] or [`MdNode::Present`];
//! - lists decode element-wise, malformed elements becoming the element's
//!   default so indices stay stable;
//! - fixed-size arrays are truncated or padded with defaults;
//! - ordered maps are lists of `[key, value]` pairs, malformed pairs are
//!   skipped;
//! - unknown record children are ignored.
use std::{collections::BTreeMap, hash::Hash};

use gfxir::{
    metadata::{MdNode, MdRecord},
    module::{FunctionRef, GlobalRef, StructTypeRef},
};
use indexmap::IndexMap;
use log::trace;
use uuid::Uuid;

/// Two-way mapping between a value and a metadata node.
pub trait MdCodec: Sized {
    fn encode(&self) -> MdNode;

    /// Rebuild a value from `node`, or `None` if the node does not describe
    /// one.
    fn decode(node: &MdNode) -> Option<Self>;
}

/// Field access on records.
pub trait RecordExt {
    /// Overwrite `slot` with the child `name` if it is present and well
    /// formed. Leaves `slot` untouched otherwise.
    fn read<T: MdCodec>(&self, name: &str, slot: &mut T);
}

impl RecordExt for MdRecord {
    fn read<T: MdCodec>(&self, name: &str, slot: &mut T) {
        match self.get(name).map(T::decode) {
            Some(Some(value)) => *slot = value,
            Some(None) => trace!("malformed metadata field `{name}`, keeping default"),
            None => {}
        }
    }
}

/// Implement [`MdCodec`] for a record type.
///
/// The type must implement `Default`: decoding starts from the default value
/// and overwrites every listed field that is present and well formed. Each
/// field is stored under its own name unless another key is given with
/// `field = "key"`.
macro_rules! md_record {
    (@key $field:ident) => { stringify!($field) };
    (@key $field:ident $key:literal) => { $key };
    (
        $ty:ty {
            $( $field:ident $(= $key:literal)? ),*
            $(,)?
        }
    ) => {
        impl $crate::codec::MdCodec for $ty {
            fn encode(&self) -> gfxir::metadata::MdNode {
                let mut record = gfxir::metadata::MdRecord::new();
                $(
                    record.push(
                        md_record!(@key $field $($key)?),
                        $crate::codec::MdCodec::encode(&self.$field),
                    );
                )*
                gfxir::metadata::MdNode::Record(record)
            }

            fn decode(node: &gfxir::metadata::MdNode) -> Option<Self> {
                use $crate::codec::RecordExt;

                let record = node.as_record()?;
                let mut value = <$ty as Default>::default();
                $(
                    record.read(md_record!(@key $field $($key)?), &mut value.$field);
                )*
                Some(value)
            }
        }
    };
}

/// Implement [`MdCodec`] for fieldless enums deriving `strum::FromRepr` with a
/// `u32` representation.
macro_rules! md_enum {
    ( $( $ty:ty ),+ $(,)? ) => {
        $(
            impl $crate::codec::MdCodec for $ty {
                fn encode(&self) -> gfxir::metadata::MdNode {
                    gfxir::metadata::MdNode::Int(*self as u32 as i64)
                }

                fn decode(node: &gfxir::metadata::MdNode) -> Option<Self> {
                    let raw = u32::try_from(node.as_int()?).ok()?;
                    <$ty>::from_repr(raw)
                }
            }
        )+
    };
}

mod schema;

impl MdCodec for bool {
    fn encode(&self) -> MdNode {
        MdNode::Bool(*self)
    }

    fn decode(node: &MdNode) -> Option<Self> {
        node.as_bool()
    }
}

macro_rules! md_int {
    ( $( $ty:ty ),+ ) => {
        $(
            impl MdCodec for $ty {
                fn encode(&self) -> MdNode {
                    MdNode::Int(i64::from(*self))
                }

                fn decode(node: &MdNode) -> Option<Self> {
                    <$ty>::try_from(node.as_int()?).ok()
                }
            }
        )+
    };
}

md_int!(u8, u32, i32, i64);

impl MdCodec for u64 {
    fn encode(&self) -> MdNode {
        MdNode::Int(*self as i64)
    }

    fn decode(node: &MdNode) -> Option<Self> {
        node.as_int().map(|value| value as u64)
    }
}

impl MdCodec for f32 {
    fn encode(&self) -> MdNode {
        MdNode::Float(f64::from(*self))
    }

    fn decode(node: &MdNode) -> Option<Self> {
        let value = node.as_float()?;
        let narrowed = value as f32;
        // Finite values beyond the f32 range do not fit.
        if value.is_finite() && narrowed.is_infinite() {
            return None;
        }
        Some(narrowed)
    }
}

impl MdCodec for String {
    fn encode(&self) -> MdNode {
        MdNode::Str(self.clone())
    }

    fn decode(node: &MdNode) -> Option<Self> {
        node.as_str().map(str::to_string)
    }
}

impl<T: MdCodec> MdCodec for Option<T> {
    fn encode(&self) -> MdNode {
        match self {
            Some(value) => MdNode::Present(Box::new(value.encode())),
            None => MdNode::Absent,
        }
    }

    fn decode(node: &MdNode) -> Option<Self> {
        match node.as_optional()? {
            Some(inner) => T::decode(inner).map(Some),
            None => Some(None),
        }
    }
}

impl<T: MdCodec + Default> MdCodec for Vec<T> {
    fn encode(&self) -> MdNode {
        MdNode::List(self.iter().map(MdCodec::encode).collect())
    }

    fn decode(node: &MdNode) -> Option<Self> {
        let items = node.as_list()?;
        Some(
            items
                .iter()
                .map(|item| T::decode(item).unwrap_or_default())
                .collect(),
        )
    }
}

impl<T: MdCodec + Default, const N: usize> MdCodec for [T; N] {
    fn encode(&self) -> MdNode {
        MdNode::List(self.iter().map(MdCodec::encode).collect())
    }

    fn decode(node: &MdNode) -> Option<Self> {
        let items = node.as_list()?;
        if items.len() != N {
            trace!(
                "fixed-size list of {} elements read as {N}, truncating or padding",
                items.len()
            );
        }
        Some(std::array::from_fn(|index| {
            items
                .get(index)
                .and_then(T::decode)
                .unwrap_or_default()
        }))
    }
}

fn encode_pair<K: MdCodec, V: MdCodec>(key: &K, value: &V) -> MdNode {
    MdNode::List(vec![key.encode(), value.encode()])
}

fn decode_pairs<K: MdCodec, V: MdCodec>(node: &MdNode) -> Option<impl Iterator<Item = (K, V)>> {
    let items = node.as_list()?;
    Some(items.iter().filter_map(|item| match item.as_list()? {
        [key, value] => Some((K::decode(key)?, V::decode(value)?)),
        _ => None,
    }))
}

impl<K: MdCodec + Ord, V: MdCodec> MdCodec for BTreeMap<K, V> {
    fn encode(&self) -> MdNode {
        MdNode::List(self.iter().map(|(k, v)| encode_pair(k, v)).collect())
    }

    fn decode(node: &MdNode) -> Option<Self> {
        Some(decode_pairs(node)?.collect())
    }
}

impl<K: MdCodec + Hash + Eq, V: MdCodec> MdCodec for IndexMap<K, V> {
    fn encode(&self) -> MdNode {
        MdNode::List(self.iter().map(|(k, v)| encode_pair(k, v)).collect())
    }

    fn decode(node: &MdNode) -> Option<Self> {
        Some(decode_pairs(node)?.collect())
    }
}

macro_rules! md_handle {
    ( $( $ty:ty ),+ ) => {
        $(
            impl MdCodec for $ty {
                fn encode(&self) -> MdNode {
                    MdNode::Str(self.uuid().to_string())
                }

                fn decode(node: &MdNode) -> Option<Self> {
                    Uuid::parse_str(node.as_str()?).ok().map(<$ty>::from_uuid)
                }
            }
        )+
    };
}

md_handle!(FunctionRef, GlobalRef, StructTypeRef);
