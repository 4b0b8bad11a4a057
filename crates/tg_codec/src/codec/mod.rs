//! Value converters.
//!
//! A [`Codec`] converts one value in both directions. The codec of a value
//! is the one of its property when set, else the one of its type.
//!
//! - [`TypeCodec`]: records described by type metadata, the default.
//! - [`BooleanCodec`], [`NumberCodec`], [`StringCodec`]: scalars.
//! - [`ArrayCodec`]: arrays, element type at generic argument 0.
//! - [`MapCodec`]: string keyed maps, key and value types at generic
//!   arguments 0 and 1.
//! - [`AnyCodec`]: copies values unchanged.
//!
//! Every codec starts from [`SerializerContext::present`], so the absent and
//! null policy is the same everywhere.

// -----------------------------------------------------------------------------
// Modules

mod any;
mod array;
mod map;
mod scalar;
mod type_codec;

// -----------------------------------------------------------------------------
// Exports

pub use any::AnyCodec;
pub use array::ArrayCodec;
pub use map::MapCodec;
pub use scalar::{BooleanCodec, NumberCodec, StringCodec};
pub use type_codec::TypeCodec;

use tg_graph::{NodeId, Value};

use crate::context::{Outcome, SerializerContext};
use crate::error::{CodecError, ErrorKind};

// -----------------------------------------------------------------------------
// Codec

/// Converts values of one kind between instances and wire shapes.
pub trait Codec: Send + Sync {
    /// Instance to wire.
    fn encode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError>;

    /// Wire to instance.
    fn decode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError>;
}

// -----------------------------------------------------------------------------
// Marker types

/// Type of arrays. Generic argument 0 is the element type.
#[derive(Debug, Clone, Copy)]
pub struct Array;

/// Type of string keyed maps. Generic arguments 0 and 1 are the key and
/// value types.
#[derive(Debug, Clone, Copy)]
pub struct Map;

/// Type of values converted as they are.
#[derive(Debug, Clone, Copy)]
pub struct Unknown;

// -----------------------------------------------------------------------------
// Helpers

/// Unwraps the value to convert, returning early with the policy outcome
/// when it is absent or null.
macro_rules! present {
    ($ctx:expr, $value:expr) => {
        match $ctx.present($value) {
            ::core::ops::ControlFlow::Continue(value) => value,
            ::core::ops::ControlFlow::Break(outcome) => return Ok(outcome),
        }
    };
}

pub(crate) use present;

/// The node held by `value`.
///
/// A scalar is a value shape problem: it is logged and `None` returned. A
/// handle missing from the source graph is an error.
pub(crate) fn node_of(
    ctx: &SerializerContext<'_, '_>,
    value: &Value,
    expected: &str,
) -> Result<Option<NodeId>, CodecError> {
    match value {
        Value::Node(id) if ctx.source().node(*id).is_some() => Ok(Some(*id)),
        Value::Node(id) => Err(ctx.error(ErrorKind::DanglingNode(*id))),
        other => {
            mismatch(ctx, expected, other.kind());
            Ok(None)
        }
    }
}

/// Logs a value of the wrong shape.
pub(crate) fn mismatch(ctx: &SerializerContext<'_, '_>, expected: &str, found: &str) {
    log::warn!("{}: expected {expected}, found {found}", ctx.path());
}
