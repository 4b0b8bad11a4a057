use alloc::string::ToString;

use tg_graph::Value;

use crate::codec::{Codec, mismatch, present};
use crate::context::{Outcome, SerializerContext};
use crate::error::CodecError;

// -----------------------------------------------------------------------------
// Scalar codecs

/// Booleans. With implicit conversion, numbers convert by comparing with
/// zero and the strings `"true"` and `"false"` by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanCodec;

/// Numbers. With implicit conversion, booleans become `1` and `0` and
/// strings are parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberCodec;

/// Strings. With implicit conversion, booleans and numbers are formatted.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl BooleanCodec {
    fn convert(value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        let value = present!(ctx, value);
        let converted = match &value {
            Value::Bool(_) => Some(value.clone()),
            _ if !ctx.use_implicit_conversion() => None,
            Value::Number(n) => Some(Value::Bool(*n != 0.0)),
            Value::String(s) => match s.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        };
        Ok(settle(ctx, converted, "a boolean", &value))
    }
}

impl NumberCodec {
    fn convert(value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        let value = present!(ctx, value);
        let converted = match &value {
            Value::Number(_) => Some(value.clone()),
            _ if !ctx.use_implicit_conversion() => None,
            Value::Bool(b) => Some(Value::Number(if *b { 1.0 } else { 0.0 })),
            Value::String(s) => s.trim().parse::<f64>().ok().map(Value::Number),
            _ => None,
        };
        Ok(settle(ctx, converted, "a number", &value))
    }
}

impl StringCodec {
    fn convert(value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
        let value = present!(ctx, value);
        let converted = match &value {
            Value::String(_) => Some(value.clone()),
            _ if !ctx.use_implicit_conversion() => None,
            Value::Bool(b) => Some(Value::String(b.to_string())),
            Value::Number(n) => Some(Value::String(n.to_string())),
            _ => None,
        };
        Ok(settle(ctx, converted, "a string", &value))
    }
}

fn settle(ctx: &SerializerContext<'_, '_>, converted: Option<Value>, expected: &str, value: &Value) -> Outcome {
    match converted {
        Some(converted) => Outcome::Value(converted),
        None => {
            mismatch(ctx, expected, value.kind());
            Outcome::Undefined
        }
    }
}

macro_rules! impl_scalar_codec {
    ($($codec:ident)*) => {$(
        impl Codec for $codec {
            #[inline]
            fn encode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
                Self::convert(value, ctx)
            }

            #[inline]
            fn decode(&self, value: Option<Value>, ctx: &mut SerializerContext<'_, '_>) -> Result<Outcome, CodecError> {
                Self::convert(value, ctx)
            }
        }
    )*};
}

impl_scalar_codec!(BooleanCodec NumberCodec StringCodec);

#[cfg(test)]
mod tests {
    use tg_graph::{Graph, Type, Value};

    use crate::TypeManager;

    fn decode<T: 'static>(manager: &TypeManager, value: Value) -> Option<Value> {
        let wire = Graph::new();
        let mut graph = Graph::new();
        manager.deserialize(Type::of::<T>(), &wire, &value, &mut graph).unwrap()
    }

    #[test]
    fn matching_scalars_pass() {
        let manager = TypeManager::new();
        assert_eq!(decode::<bool>(&manager, Value::Bool(true)), Some(Value::Bool(true)));
        assert_eq!(decode::<f64>(&manager, Value::Number(2.5)), Some(Value::Number(2.5)));
        assert_eq!(decode::<String>(&manager, Value::from("x")), Some(Value::from("x")));
    }

    #[test]
    fn mismatches_are_absent_without_conversion() {
        let manager = TypeManager::new();
        assert_eq!(decode::<bool>(&manager, Value::Number(1.0)), None);
        assert_eq!(decode::<f64>(&manager, Value::from("1")), None);
        assert_eq!(decode::<String>(&manager, Value::Bool(false)), None);
    }

    #[test]
    fn implicit_conversion() {
        let mut manager = TypeManager::new();
        manager.configure_base(|base| base.use_implicit_conversion = true);

        assert_eq!(decode::<bool>(&manager, Value::Number(0.0)), Some(Value::Bool(false)));
        assert_eq!(decode::<bool>(&manager, Value::from("true")), Some(Value::Bool(true)));
        assert_eq!(decode::<bool>(&manager, Value::from("yes")), None);
        assert_eq!(decode::<f64>(&manager, Value::from(" 42 ")), Some(Value::Number(42.0)));
        assert_eq!(decode::<f64>(&manager, Value::Bool(true)), Some(Value::Number(1.0)));
        assert_eq!(decode::<String>(&manager, Value::Number(3.0)), Some(Value::from("3")));
        assert_eq!(decode::<String>(&manager, Value::Number(0.5)), Some(Value::from("0.5")));
    }
}
