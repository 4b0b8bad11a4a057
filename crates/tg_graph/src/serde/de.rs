use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error, MapAccess, SeqAccess, Visitor};

use crate::{Graph, Record, Value};

// -----------------------------------------------------------------------------
// GraphSeed

/// Deserializes any self-describing input into fresh nodes of a graph.
///
/// Maps become plain records, sequences become arrays, integers and floats
/// become [`Value::Number`], unit and `None` become [`Value::Null`].
///
/// # Examples
///
/// ```
/// use serde_core::de::DeserializeSeed;
/// use tg_graph::{Graph, serde::GraphSeed};
///
/// let mut graph = Graph::new();
/// let mut input = serde_json::Deserializer::from_str(r#"{"tags":["a","b"],"n":3}"#);
/// let root = GraphSeed::new(&mut graph).deserialize(&mut input).unwrap();
///
/// let record = graph.record(root.as_node().unwrap()).unwrap();
/// assert_eq!(record.get("n").and_then(|v| v.as_number()), Some(3.0));
/// assert_eq!(graph.len(), 2);
/// ```
pub struct GraphSeed<'g> {
    graph: &'g mut Graph,
}

impl<'g> GraphSeed<'g> {
    #[inline]
    pub fn new(graph: &'g mut Graph) -> Self {
        Self { graph }
    }
}

impl<'de> DeserializeSeed<'de> for GraphSeed<'_> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor { graph: self.graph })
    }
}

// -----------------------------------------------------------------------------
// ValueVisitor

struct ValueVisitor<'g> {
    graph: &'g mut Graph,
}

impl<'de> Visitor<'de> for ValueVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a record, an array or a scalar")
    }

    #[inline]
    fn visit_bool<E: Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }

    #[inline]
    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Number(v as f64))
    }

    #[inline]
    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::Number(v as f64))
    }

    #[inline]
    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Value::Number(v))
    }

    #[inline]
    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::String(String::from(v)))
    }

    #[inline]
    fn visit_string<E: Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::String(v))
    }

    #[inline]
    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        GraphSeed::new(self.graph).deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some(value) = seq.next_element_seed(GraphSeed::new(&mut *self.graph))? {
            values.push(value);
        }
        Ok(Value::Node(self.graph.alloc(values)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut record = Record::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(GraphSeed::new(&mut *self.graph))?;
            record.insert(key, value);
        }
        Ok(Value::Node(self.graph.alloc(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::GraphSeed;
    use crate::{Graph, Value, serde::GraphSerializer};
    use serde_core::de::DeserializeSeed;

    #[test]
    fn nested_input() {
        let mut graph = Graph::new();
        let mut input = serde_json::Deserializer::from_str(r#"[{"a":null},[1.25,"x"],false]"#);
        let root = GraphSeed::new(&mut graph).deserialize(&mut input).unwrap();

        let items = graph.array(root.as_node().unwrap()).unwrap().to_vec();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], Value::Bool(false));

        let first = graph.record(items[0].as_node().unwrap()).unwrap();
        assert_eq!(first.get("a"), Some(&Value::Null));

        let second = graph.array(items[1].as_node().unwrap()).unwrap();
        assert_eq!(second, &[Value::Number(1.25), Value::from("x")]);

        let text = serde_json::to_string(&GraphSerializer::new(&graph, &root)).unwrap();
        assert_eq!(text, r#"[{"a":null},[1.25,"x"],false]"#);
    }

    #[test]
    fn ron_input() {
        let mut graph = Graph::new();
        let mut input = ron::Deserializer::from_str(r#"{"k": [true, ()]}"#).unwrap();
        let root = GraphSeed::new(&mut graph).deserialize(&mut input).unwrap();

        let record = graph.record(root.as_node().unwrap()).unwrap();
        let list = graph.array(record.get("k").unwrap().as_node().unwrap()).unwrap();
        assert_eq!(list, &[Value::Bool(true), Value::Null]);
    }
}
