use alloc::vec::Vec;

use serde_core::ser::{Error, SerializeMap, SerializeSeq};
use serde_core::{Serialize, Serializer};

use crate::{Graph, GraphError, Node, NodeId, Value};

// -----------------------------------------------------------------------------
// Ancestors

// Nodes currently being written, innermost first.
struct Ancestor<'a> {
    id: NodeId,
    parent: Option<&'a Ancestor<'a>>,
}

impl Ancestor<'_> {
    fn contains(&self, id: NodeId) -> bool {
        let mut current = Some(self);
        while let Some(link) = current {
            if link.id == id {
                return true;
            }
            current = link.parent;
        }
        false
    }
}

// -----------------------------------------------------------------------------
// GraphSerializer

/// Serializes a graph value as a tree.
///
/// # Examples
///
/// ```
/// use tg_graph::{Graph, Value, serde::GraphSerializer};
///
/// let mut graph = Graph::new();
/// let list = graph.alloc_array([1, 2]);
/// let root = Value::Node(graph.alloc_record([("b", Value::Bool(true)), ("a", Value::Node(list))]));
///
/// let text = serde_json::to_string(&GraphSerializer::new(&graph, &root)).unwrap();
/// assert_eq!(text, r#"{"b":true,"a":[1,2]}"#);
///
/// let text = serde_json::to_string(&GraphSerializer::new(&graph, &root).sorted()).unwrap();
/// assert_eq!(text, r#"{"a":[1,2],"b":true}"#);
/// ```
pub struct GraphSerializer<'a> {
    graph: &'a Graph,
    value: &'a Value,
    sorted: bool,
    ancestors: Option<&'a Ancestor<'a>>,
}

impl<'a> GraphSerializer<'a> {
    /// Creates a serializer writing record fields in stored order.
    #[inline]
    pub const fn new(graph: &'a Graph, value: &'a Value) -> Self {
        Self {
            graph,
            value,
            sorted: false,
            ancestors: None,
        }
    }

    /// Writes record fields sorted by key, for deterministic output.
    #[inline]
    pub const fn sorted(mut self) -> Self {
        self.sorted = true;
        self
    }

    #[inline]
    fn child<'b>(&'b self, value: &'b Value, link: &'b Ancestor<'b>) -> GraphSerializer<'b> {
        GraphSerializer {
            graph: self.graph,
            value,
            sorted: self.sorted,
            ancestors: Some(link),
        }
    }
}

#[inline]
fn integral(n: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    (n.fract() == 0.0 && n.abs() <= LIMIT).then_some(n as i64)
}

impl Serialize for GraphSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let id = match self.value {
            Value::Null => return serializer.serialize_unit(),
            Value::Bool(b) => return serializer.serialize_bool(*b),
            Value::Number(n) => {
                return match integral(*n) {
                    Some(i) => serializer.serialize_i64(i),
                    None => serializer.serialize_f64(*n),
                };
            }
            Value::String(s) => return serializer.serialize_str(s),
            Value::Node(id) => *id,
        };

        if self.ancestors.is_some_and(|link| link.contains(id)) {
            return Err(S::Error::custom(GraphError::Cycle(id)));
        }
        let Some(node) = self.graph.node(id) else {
            return Err(S::Error::custom(GraphError::Dangling(id)));
        };
        let link = Ancestor {
            id,
            parent: self.ancestors,
        };

        match node {
            Node::Record(record) => {
                let mut entries: Vec<_> = record.iter().collect();
                if self.sorted {
                    entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
                }
                let mut state = serializer.serialize_map(Some(entries.len()))?;
                for (name, value) in entries {
                    state.serialize_entry(name, &self.child(value, &link))?;
                }
                state.end()
            }
            Node::Array(values) => {
                let mut state = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    state.serialize_element(&self.child(value, &link))?;
                }
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GraphSerializer;
    use crate::{Graph, Slot, Value};
    use alloc::string::ToString;

    #[test]
    fn shared_nodes_are_repeated() {
        let mut graph = Graph::new();
        let leaf = graph.alloc_record([("n", 1.5)]);
        let root = Value::Node(graph.alloc_array([Value::Node(leaf), Value::Node(leaf)]));

        let text = serde_json::to_string(&GraphSerializer::new(&graph, &root)).unwrap();
        assert_eq!(text, r#"[{"n":1.5},{"n":1.5}]"#);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = Graph::new();
        let node = graph.alloc_record([("name", "a")]);
        graph.assign(node, &Slot::Field("me".into()), Value::Node(node)).unwrap();

        let result = serde_json::to_string(&GraphSerializer::new(&graph, &Value::Node(node)));
        assert!(result.unwrap_err().to_string().contains("reachable from itself"));
    }

    #[test]
    fn ron_output() {
        let mut graph = Graph::new();
        let root = Value::Node(graph.alloc_record([("x", 1)]));
        let text = ron::to_string(&GraphSerializer::new(&graph, &root)).unwrap();
        assert_eq!(text, r#"{"x":1}"#);
    }
}
