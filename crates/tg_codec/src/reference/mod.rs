//! Strategies for shared and cyclic objects.
//!
//! Codecs of reference types (records and arrays) hand every node they
//! convert to a [`ReferenceHandler`] together with an initializer that does
//! the actual conversion. The handler decides whether the initializer runs.
//!
//! - The first time a key is met it is marked as visiting, converted, stored
//!   as resolved, and assignments waiting on it are carried out.
//! - Meeting a key again depends on the strategy:
//!
//! | strategy | visiting (cycle) | resolved (shared) |
//! |----------|------------------|-------------------|
//! | [`DirectReferenceHandler`] | deferred assignment | the same value |
//! | [`LeadReferenceHandler`] | undefined | undefined |
//! | [`PathReferenceHandler`] | `{ "$ref": path }` | `{ "$ref": path }` |
//!
//! The direct strategy keeps the full graph on both sides, so encoded cycles
//! stay cycles and cannot be written as text. The path strategy writes a
//! tree and restores the graph when decoding.

// -----------------------------------------------------------------------------
// Modules

mod direct;
mod lead;
mod path;

// -----------------------------------------------------------------------------
// Exports

pub use direct::DirectReferenceHandler;
pub use lead::LeadReferenceHandler;
pub use path::{PathReferenceHandler, REF_FIELD};

use tg_graph::NodeId;

use crate::context::{Outcome, SerializerContext};
use crate::error::{CodecError, ErrorKind};

// -----------------------------------------------------------------------------
// ReferenceHandler

/// The conversion a handler runs for an unseen key.
pub type Initializer<'f> = dyn FnMut(&mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> + 'f;

/// Decides how a node that may be met more than once is converted.
///
/// `key` is the node of the source graph. Returning
/// [`Outcome::Deferred`] asks the caller to register the slot of the value
/// with [`SerializerContext::defer`].
pub trait ReferenceHandler: Send + Sync {
    /// Encodes the node `key`.
    fn define(
        &self,
        ctx: &mut SerializerContext<'_, '_>,
        key: NodeId,
        init: &mut Initializer<'_>,
    ) -> Result<Outcome, CodecError>;

    /// Decodes the node `key`.
    fn restore(
        &self,
        ctx: &mut SerializerContext<'_, '_>,
        key: NodeId,
        init: &mut Initializer<'_>,
    ) -> Result<Outcome, CodecError>;
}

/// Converts an unseen `key`: marks it visiting, runs `init` and resolves the
/// key with the result.
pub fn materialize(
    ctx: &mut SerializerContext<'_, '_>,
    key: NodeId,
    init: &mut Initializer<'_>,
) -> Result<Outcome, CodecError> {
    ctx.session_mut().begin(key);
    let outcome = init(ctx)?;
    ctx.session_mut()
        .resolve(key, &outcome)
        .map_err(|error| ctx.error(ErrorKind::Graph(error)))?;
    Ok(outcome)
}
