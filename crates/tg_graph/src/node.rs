use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;
use tg_utils::hash::FixedHashState;

use crate::{Type, Value};

/// Ordered record fields.
pub type Fields = IndexMap<String, Value, FixedHashState>;

// -----------------------------------------------------------------------------
// Record

/// An ordered set of named fields, optionally tagged with a runtime [`Type`].
///
/// Typed records are instances, untyped records are plain wire records.
#[derive(Clone, Debug, Default)]
pub struct Record {
    ty: Option<Type>,
    fields: Fields,
}

impl Record {
    /// Creates an empty plain record.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty instance of `ty`.
    #[inline]
    pub fn typed(ty: Type) -> Self {
        Self {
            ty: Some(ty),
            fields: Fields::default(),
        }
    }

    /// Creates a record from parts.
    #[inline]
    pub fn from_parts(ty: Option<Type>, fields: Fields) -> Self {
        Self { ty, fields }
    }

    /// Runtime type of the record, `None` for plain records.
    #[inline]
    pub const fn ty(&self) -> Option<Type> {
        self.ty
    }

    #[inline]
    pub fn set_ty(&mut self, ty: Option<Type>) {
        self.ty = ty;
    }

    #[inline]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    #[inline]
    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Inserts a field. An existing field keeps its position.
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Removes a field, keeping the order of the remaining ones.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// -----------------------------------------------------------------------------
// Node

/// A graph node.
#[derive(Clone, Debug)]
pub enum Node {
    Record(Record),
    Array(Vec<Value>),
}

impl Node {
    #[inline]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Array(_) => None,
        }
    }

    #[inline]
    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Array(_) => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            Self::Record(_) => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(values) => Some(values),
            Self::Record(_) => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Array(_) => "array",
        }
    }
}

impl From<Record> for Node {
    #[inline]
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Vec<Value>> for Node {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

// -----------------------------------------------------------------------------
// Slot

/// A location inside a node that a value can be assigned to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Field(String),
    Index(usize),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "`{name}`"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}
