use tg_graph::NodeId;

use crate::context::{Outcome, ReferenceState, SerializerContext};
use crate::error::CodecError;
use crate::reference::{Initializer, ReferenceHandler, materialize};

// -----------------------------------------------------------------------------
// DirectReferenceHandler

/// Keeps every shared and cyclic object.
///
/// A shared node converts once and every occurrence gets the same value. A
/// node met again while it is still converting is deferred and assigned as
/// soon as its conversion finishes, so cycles survive in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectReferenceHandler;

impl DirectReferenceHandler {
    fn handle(
        ctx: &mut SerializerContext<'_, '_>,
        key: NodeId,
        init: &mut Initializer<'_>,
    ) -> Result<Outcome, CodecError> {
        match ctx.session().reference(key) {
            Some(ReferenceState::Visiting) => Ok(Outcome::Deferred(key)),
            Some(ReferenceState::Resolved(value)) => Ok(Outcome::Value(value.clone())),
            None => materialize(ctx, key, init),
        }
    }
}

impl ReferenceHandler for DirectReferenceHandler {
    #[inline]
    fn define(
        &self,
        ctx: &mut SerializerContext<'_, '_>,
        key: NodeId,
        init: &mut Initializer<'_>,
    ) -> Result<Outcome, CodecError> {
        Self::handle(ctx, key, init)
    }

    #[inline]
    fn restore(
        &self,
        ctx: &mut SerializerContext<'_, '_>,
        key: NodeId,
        init: &mut Initializer<'_>,
    ) -> Result<Outcome, CodecError> {
        Self::handle(ctx, key, init)
    }
}
