use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use tg_graph::{Fields, NodeId, Record, Slot, Value};
use tg_utils::hash::HashSet;

use crate::codec::{Codec, mismatch, node_of, present};
use crate::context::{Outcome, SerializerContext};
use crate::error::{CodecError, ErrorKind};
use crate::factory::PropertyEntries;

// -----------------------------------------------------------------------------
// TypeCodec

/// Records described by their [`TypeMetadata`](crate::metadata::TypeMetadata).
///
/// Encoding writes every serializable property of the instance under its
/// wire name into a plain record. Decoding collects every deserializable
/// property by property name, followed by the wire fields no property
/// claims, and hands them to the type's factory.
///
/// Polymorphic types dispatch first: encoding by the runtime type of the
/// instance, decoding by the discriminator field of the wire record (a
/// record without one decodes as the declared type). The discriminator is
/// written when the type is polymorphic or preserves it, and removed
/// otherwise.
///
/// A property whose value is deferred by a cycle keeps its slot: it is
/// written as `null` in place and overwritten once the target exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCodec;

impl Codec for TypeCodec {
    fn encode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        let value = present!(ctx, value);
        let Some(node) = node_of(ctx, &value, "a record")? else {
            return Ok(Outcome::Undefined);
        };

        let metadata = ctx.type_metadata();
        if metadata.is_polymorphic()
            && let Some(runtime) = ctx.source().record(node).and_then(Record::ty)
            && runtime != metadata.ty()
        {
            return ctx.variant_context_by_type(runtime)?.serialize(Some(value));
        }

        let handler = ctx.reference_handler();
        handler.define(ctx, node, &mut |ctx| encode_record(ctx, node))
    }

    fn decode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        let value = present!(ctx, value);
        let Some(node) = node_of(ctx, &value, "a record")? else {
            return Ok(Outcome::Undefined);
        };

        let metadata = ctx.type_metadata().clone();
        if metadata.is_polymorphic()
            && let Some(record) = ctx.source().record(node)
        {
            match record.get(metadata.discriminator()) {
                None => {}
                Some(Value::String(discriminant)) => {
                    if metadata.variant_of(discriminant) != Some(metadata.ty()) {
                        return ctx
                            .variant_context_by_discriminant(discriminant)?
                            .deserialize(Some(value));
                    }
                }
                Some(other) => {
                    return Err(ctx.error(ErrorKind::NoDiscriminantMatch {
                        ty: metadata.ty(),
                        discriminant: format!("{other:?}"),
                    }));
                }
            }
        }

        let handler = ctx.reference_handler();
        handler.restore(ctx, node, &mut |ctx| decode_record(ctx, node))
    }
}

fn encode_record(ctx: &mut SerializerContext<'_, '_>, node: NodeId) -> Result<Outcome, CodecError> {
    let Some(record) = ctx.source().record(node) else {
        let found = ctx.source().node(node).map_or("nothing", |node| node.kind());
        mismatch(ctx, "a record", found);
        return Ok(Outcome::Undefined);
    };
    let metadata = ctx.type_metadata().clone();

    let mut fields = Fields::default();
    let mut deferred = Vec::new();
    for property in metadata.sorted_properties() {
        if !property.serializable() {
            continue;
        }
        let wire_name = metadata.wire_name(property).into_owned();
        let value = record.get(property.name()).cloned();
        match ctx.property_context(property)?.serialize(value)? {
            Outcome::Value(value) => {
                fields.insert(wire_name, value);
            }
            Outcome::Undefined => {}
            Outcome::Deferred(key) => {
                fields.insert(wire_name.clone(), Value::Null);
                deferred.push((wire_name, key));
            }
        }
    }

    let discriminator = metadata.discriminator();
    if ctx.is_polymorphic() || metadata.preserve_discriminator() {
        let discriminant = Value::from(metadata.discriminant());
        fields.shift_insert(0, String::from(discriminator), discriminant);
    } else {
        fields.shift_remove(discriminator);
    }
    deferred.retain(|(name, _)| name != discriminator);

    let id = ctx.target_mut().alloc(Record::from_parts(None, fields));
    ctx.defer_all(id, deferred.into_iter().map(|(name, key)| (Slot::Field(name), key)))?;
    Ok(Outcome::Value(Value::Node(id)))
}

fn decode_record(ctx: &mut SerializerContext<'_, '_>, node: NodeId) -> Result<Outcome, CodecError> {
    let Some(record) = ctx.source().record(node) else {
        let found = ctx.source().node(node).map_or("nothing", |node| node.kind());
        mismatch(ctx, "a record", found);
        return Ok(Outcome::Undefined);
    };
    let metadata = ctx.type_metadata().clone();

    let mut entries = PropertyEntries::default();
    let mut claimed = HashSet::default();
    let mut deferred = Vec::new();
    for property in metadata.sorted_properties() {
        let wire_name = metadata.wire_name(property);
        if property.deserializable() {
            let value = record.get(&wire_name).cloned();
            match ctx.property_context(property)?.deserialize(value)? {
                Outcome::Value(value) => {
                    entries.insert(String::from(property.name()), value);
                }
                Outcome::Undefined => {}
                Outcome::Deferred(key) => {
                    entries.insert(String::from(property.name()), Value::Null);
                    deferred.push((Slot::Field(String::from(property.name())), key));
                }
            }
        }
        claimed.insert(wire_name.into_owned());
    }

    let discriminator = metadata.discriminator();
    let preserve_discriminator = metadata.preserve_discriminator();
    for (name, value) in record.iter() {
        if claimed.contains(name) || entries.contains_key(name) {
            continue;
        }
        if name == discriminator && !preserve_discriminator {
            continue;
        }
        let value = ctx.session_mut().transplant(value);
        entries.insert(String::from(name), value);
    }

    let injector = metadata.injector().clone();
    let built = metadata
        .factory()
        .build(&metadata, entries, injector.as_ref(), ctx.target_mut())
        .map_err(|source| {
            ctx.error(ErrorKind::Factory {
                ty: metadata.ty(),
                source,
            })
        })?;

    match &built {
        Value::Node(id) => ctx.defer_all(*id, deferred)?,
        _ if !deferred.is_empty() => {
            log::warn!(
                "{}: factory of `{}` built a {}, {} deferred references are dropped",
                ctx.path(),
                metadata.name(),
                built.kind(),
                deferred.len(),
            );
        }
        _ => {}
    }
    Ok(Outcome::Value(built))
}
