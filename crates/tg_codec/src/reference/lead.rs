use tg_graph::NodeId;

use crate::context::{Outcome, SerializerContext};
use crate::error::CodecError;
use crate::reference::{Initializer, ReferenceHandler, materialize};

// -----------------------------------------------------------------------------
// LeadReferenceHandler

/// Keeps the first occurrence of an object only.
///
/// Every later occurrence, shared or cyclic, converts to nothing. The result
/// is always a tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadReferenceHandler;

impl LeadReferenceHandler {
    fn handle(
        ctx: &mut SerializerContext<'_, '_>,
        key: NodeId,
        init: &mut Initializer<'_>,
    ) -> Result<Outcome, CodecError> {
        if ctx.session().reference(key).is_some() {
            log::trace!("{}: dropping repeated {key}", ctx.path());
            return Ok(Outcome::Undefined);
        }
        materialize(ctx, key, init)
    }
}

impl ReferenceHandler for LeadReferenceHandler {
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
