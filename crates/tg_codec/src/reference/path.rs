use alloc::string::String;

use tg_graph::{NodeId, Path, Value};

use crate::context::{Outcome, ReferenceState, SerializerContext};
use crate::error::CodecError;
use crate::reference::{Initializer, ReferenceHandler, materialize};

/// Field holding the path of a reference marker.
pub const REF_FIELD: &str = "$ref";

// -----------------------------------------------------------------------------
// PathReferenceHandler

/// Writes repeated objects as `{ "$ref": path }` markers.
///
/// Encoding remembers the path where each object first appeared; every
/// later occurrence becomes a marker pointing there, so the wire shape is a
/// tree that any text format can hold.
///
/// Decoding walks a marker's path from the top-level wire value and resolves
/// the marker to whatever that node decodes to. A marker may point forward,
/// to a node that is decoded later: its slot is then assigned once that
/// node is done. A path that leads nowhere is logged and decodes to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathReferenceHandler;

impl PathReferenceHandler {
    /// Path of the marker `key`, if it is one.
    fn marker_path(ctx: &SerializerContext<'_, '_>, key: NodeId) -> Option<String> {
        match ctx.source().record(key)?.get(REF_FIELD)? {
            Value::String(path) => Some(path.clone()),
            _ => None,
        }
    }

    fn follow(ctx: &mut SerializerContext<'_, '_>, path: &str) -> Outcome {
        let target = match Path::parse(path) {
            Ok(parsed) => ctx.source().walk(ctx.session().root(), &parsed),
            Err(error) => {
                log::warn!("{}: invalid reference path: {error}", ctx.path());
                return Outcome::Undefined;
            }
        };
        let Some(Value::Node(target)) = target else {
            log::warn!("{}: reference `{path}` does not lead to an object", ctx.path());
            return Outcome::Undefined;
        };
        match ctx.session().reference(target) {
            Some(ReferenceState::Resolved(value)) => Outcome::Value(value.clone()),
            Some(ReferenceState::Visiting) => Outcome::Deferred(target),
            None => {
                log::debug!("{}: reference `{path}` points forward", ctx.path());
                Outcome::Deferred(target)
            }
        }
    }
}

impl ReferenceHandler for PathReferenceHandler {
    fn define(
        &self,
        ctx: &mut SerializerContext<'_, '_>,
        key: NodeId,
        init: &mut Initializer<'_>,
    ) -> Result<Outcome, CodecError> {
        if let Some(path) = ctx.session().first_path(key) {
            let marker = [(REF_FIELD, Value::String(String::from(path)))];
            let id = ctx.target_mut().alloc_record(marker);
            return Ok(Outcome::Value(Value::Node(id)));
        }
        let path = String::from(ctx.path());
        ctx.session_mut().record_path(key, &path);
        materialize(ctx, key, init)
    }

    fn restore(
        &self,
        ctx: &mut SerializerContext<'_, '_>,
        key: NodeId,
        init: &mut Initializer<'_>,
    ) -> Result<Outcome, CodecError> {
        if let Some(path) = Self::marker_path(ctx, key) {
            return Ok(Self::follow(ctx, &path));
        }
        match ctx.session().reference(key) {
            Some(ReferenceState::Visiting) => Ok(Outcome::Deferred(key)),
            Some(ReferenceState::Resolved(value)) => Ok(Outcome::Value(value.clone())),
            None => materialize(ctx, key, init),
        }
    }
}
