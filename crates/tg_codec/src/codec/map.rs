use alloc::string::String;
use alloc::vec::Vec;

use tg_graph::{Fields, NodeId, Record, Slot, Type, Value};

use crate::codec::{Codec, Map, mismatch, node_of, present};
use crate::context::{Direction, Outcome, SerializerContext};
use crate::error::CodecError;

// -----------------------------------------------------------------------------
// MapCodec

/// String keyed maps.
///
/// Instances are records typed [`Map`], wire shapes are plain records.
/// Keys convert through generic argument 0 and must stay strings; values
/// convert through generic argument 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapCodec;

impl MapCodec {
    fn convert(value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        let value = present!(ctx, value);
        let Some(node) = node_of(ctx, &value, "a map")? else {
            return Ok(Outcome::Undefined);
        };
        let handler = ctx.reference_handler();
        match ctx.direction() {
            Direction::Encode => handler.define(ctx, node, &mut |ctx| Self::convert_entries(ctx, node)),
            Direction::Decode => handler.restore(ctx, node, &mut |ctx| Self::convert_entries(ctx, node)),
        }
    }

    fn convert_entries(ctx: &mut SerializerContext<'_, '_>, node: NodeId) -> Result<Outcome, CodecError> {
        let source = ctx.source();
        let Some(record) = source.record(node) else {
            let found = source.node(node).map_or("nothing", |node| node.kind());
            mismatch(ctx, "a map", found);
            return Ok(Outcome::Undefined);
        };

        let mut fields = Fields::default();
        let mut deferred = Vec::new();
        for (key, item) in record.iter() {
            let converted = ctx.generic_context(0)?.convert(Some(Value::from(key)))?;
            let Outcome::Value(Value::String(converted)) = converted else {
                log::warn!("{}: map key `{key}` did not convert to a string", ctx.path());
                continue;
            };
            // The path always names the wire side key.
            let path_key = match ctx.direction() {
                Direction::Encode => converted.clone(),
                Direction::Decode => String::from(key),
            };
            match ctx.generic_context(1)?.child_context(path_key).convert(Some(item.clone()))? {
                Outcome::Value(value) => {
                    fields.insert(converted, value);
                }
                Outcome::Undefined => {}
                Outcome::Deferred(reference) => deferred.push((Slot::Field(converted), reference)),
            }
        }

        let ty = match ctx.direction() {
            Direction::Encode => None,
            Direction::Decode => Some(Type::of::<Map>()),
        };
        let id = ctx.target_mut().alloc(Record::from_parts(ty, fields));
        ctx.defer_all(id, deferred)?;
        Ok(Outcome::Value(Value::Node(id)))
    }
}

impl Codec for MapCodec {
    #[inline]
    fn encode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        Self::convert(value, ctx)
    }

    #[inline]
    fn decode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        Self::convert(value, ctx)
    }
}
