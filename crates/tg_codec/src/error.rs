use alloc::string::String;

use thiserror::Error;
use tg_graph::{GraphError, NodeId, Type};

use crate::factory::FactoryError;

// -----------------------------------------------------------------------------
// CodecError

/// A configuration error, reported with the path of the value being
/// converted when it was found.
///
/// Value shape problems are not errors: they are logged and the affected
/// value becomes absent.
#[derive(Debug, Error)]
#[error("at `{path}`: {kind}")]
pub struct CodecError {
    path: String,
    kind: ErrorKind,
}

impl CodecError {
    #[inline]
    pub fn new(path: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Path of the failing value, e.g. `$['items'][2]`.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

// -----------------------------------------------------------------------------
// ErrorKind

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("no type is registered under the alias `{0}`")]
    UnknownAlias(String),

    #[error("a lazy type argument resolved to nothing")]
    UnresolvedLazyType,

    #[error("`{ty}` has no generic argument at index {index}")]
    MissingGeneric { ty: Type, index: usize },

    #[error("discriminant `{discriminant}` matches no variant of `{ty}`")]
    NoDiscriminantMatch { ty: Type, discriminant: String },

    #[error("`{variant}` is not a registered variant of `{ty}`")]
    UnknownVariant { ty: Type, variant: Type },

    #[error("property `{property}` of `{ty}` declares no type")]
    UntypedProperty { ty: Type, property: String },

    #[error("factory of `{ty}` failed: {source}")]
    Factory { ty: Type, source: FactoryError },

    #[error("node {0} does not exist in the source graph")]
    DanglingNode(NodeId),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
