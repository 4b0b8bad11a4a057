use alloc::string::String;

use serde_core::de::DeserializeSeed;

use super::{GraphSeed, GraphSerializer};
use crate::{Graph, Value};

/// Converts a graph value into a [`serde_json::Value`] tree.
pub fn to_json(graph: &Graph, value: &Value) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(GraphSerializer::new(graph, value))
}

/// Writes a graph value as JSON text, record fields in stored order.
pub fn to_json_string(graph: &Graph, value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(&GraphSerializer::new(graph, value))
}

/// Writes a graph value as JSON text with every record's keys sorted.
///
/// Equal graph values always produce identical text, so the output can be
/// hashed.
pub fn to_canonical_json_string(graph: &Graph, value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(&GraphSerializer::new(graph, value).sorted())
}

/// Reads a [`serde_json::Value`] tree into fresh nodes of `graph`.
pub fn from_json(graph: &mut Graph, json: &serde_json::Value) -> Result<Value, serde_json::Error> {
    GraphSeed::new(graph).deserialize(json)
}

/// Parses JSON text into fresh nodes of `graph`.
pub fn from_json_str(graph: &mut Graph, text: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let value = GraphSeed::new(graph).deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{from_json, from_json_str, to_canonical_json_string, to_json, to_json_string};
    use crate::Graph;

    #[test]
    fn canonical_output_ignores_insertion_order() {
        let mut left = Graph::new();
        let a = from_json_str(&mut left, r#"{"z":1,"a":{"y":[2,{"c":3,"b":4}],"x":null}}"#).unwrap();
        let mut right = Graph::new();
        let b = from_json_str(&mut right, r#"{"a":{"x":null,"y":[2,{"b":4,"c":3}]},"z":1}"#).unwrap();

        let expected = r#"{"a":{"x":null,"y":[2,{"b":4,"c":3}]},"z":1}"#;
        assert_eq!(to_canonical_json_string(&left, &a).unwrap(), expected);
        assert_eq!(to_canonical_json_string(&right, &b).unwrap(), expected);
        assert_ne!(to_json_string(&left, &a).unwrap(), expected);
    }

    #[test]
    fn json_value_round_trip() {
        let json = serde_json::json!({ "list": [1, "two", true], "nested": { "n": 0.5 } });
        let mut graph = Graph::new();
        let value = from_json(&mut graph, &json).unwrap();
        assert_eq!(to_json(&graph, &value).unwrap(), json);
    }

    #[test]
    fn trailing_input_is_rejected() {
        let mut graph = Graph::new();
        assert!(from_json_str(&mut graph, "[1] [2]").is_err());
    }
}
