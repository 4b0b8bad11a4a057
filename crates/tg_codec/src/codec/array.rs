use alloc::vec::Vec;

use tg_graph::{NodeId, Slot, Value};

use crate::codec::{Codec, mismatch, node_of, present};
use crate::context::{Direction, Outcome, SerializerContext};
use crate::error::CodecError;

// -----------------------------------------------------------------------------
// ArrayCodec

/// Arrays, converting every element through generic argument 0.
///
/// Arrays are reference tracked like records. Elements that convert to
/// nothing are written as `null` so indices are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayCodec;

impl ArrayCodec {
    fn convert(value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        let value = present!(ctx, value);
        let Some(node) = node_of(ctx, &value, "an array")? else {
            return Ok(Outcome::Undefined);
        };
        let handler = ctx.reference_handler();
        match ctx.direction() {
            Direction::Encode => handler.define(ctx, node, &mut |ctx| Self::convert_items(ctx, node)),
            Direction::Decode => handler.restore(ctx, node, &mut |ctx| Self::convert_items(ctx, node)),
        }
    }

    fn convert_items(ctx: &mut SerializerContext<'_, '_>, node: NodeId) -> Result<Outcome, CodecError> {
        let source = ctx.source();
        let Some(items) = source.array(node) else {
            let found = source.node(node).map_or("nothing", |node| node.kind());
            mismatch(ctx, "an array", found);
            return Ok(Outcome::Undefined);
        };

        let mut values = Vec::with_capacity(items.len());
        let mut deferred = Vec::new();
        let mut element = ctx.generic_context(0)?;
        for (index, item) in items.iter().enumerate() {
            match element.child_context(index).convert(Some(item.clone()))? {
                Outcome::Value(value) => values.push(value),
                Outcome::Undefined => values.push(Value::Null),
                Outcome::Deferred(key) => {
                    values.push(Value::Null);
                    deferred.push((Slot::Index(index), key));
                }
            }
        }

        let id = ctx.target_mut().alloc(values);
        ctx.defer_all(id, deferred)?;
        Ok(Outcome::Value(Value::Node(id)))
    }
}

impl Codec for ArrayCodec {
    #[inline]
    fn encode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        Self::convert(value, ctx)
    }

    #[inline]
    fn decode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        Self::convert(value, ctx)
    }
}
