use tg_graph::Value;

use crate::codec::{Codec, present};
use crate::context::{Outcome, SerializerContext};
use crate::error::CodecError;

// -----------------------------------------------------------------------------
// AnyCodec

/// Copies values as they are, nodes included.
///
/// Nodes copied more than once in one conversion keep their sharing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyCodec;

impl AnyCodec {
    fn convert(value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        let value = present!(ctx, value);
        Ok(Outcome::Value(ctx.session_mut().transplant(&value)))
    }
}

impl Codec for AnyCodec {
    #[inline]
    fn encode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        Self::convert(value, ctx)
    }

    #[inline]
    fn decode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        Self::convert(value, ctx)
    }
}
