use alloc::string::String;
use alloc::vec::Vec;

use tg_utils::hash::HashMap;

use crate::{GraphError, Node, NodeId, Path, PathKey, Record, Slot, Type, Value};

// -----------------------------------------------------------------------------
// Graph

/// An arena of [`Node`]s addressed by [`NodeId`].
///
/// Typed instances and plain wire shapes are both stored in graphs. Nodes are
/// never freed; a graph lives as long as the values pointing into it.
///
/// # Examples
///
/// ```
/// use tg_graph::{Graph, Type, Value};
///
/// struct Point;
///
/// let mut graph = Graph::new();
/// let point = graph.alloc_instance(Type::of::<Point>(), [("x", 1), ("y", 2)]);
/// let list = graph.alloc_array([Value::Node(point), Value::Node(point)]);
///
/// let items = graph.array(list).unwrap();
/// assert_eq!(items[0], items[1]);
/// assert_eq!(graph.record(point).unwrap().get("y"), Some(&Value::Number(2.0)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Creates an empty graph.
    #[inline]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stores a node and returns its handle.
    pub fn alloc(&mut self, node: impl Into<Node>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node.into());
        id
    }

    /// Stores an instance of `ty` with the given fields.
    pub fn alloc_instance<K, V>(&mut self, ty: Type, fields: impl IntoIterator<Item = (K, V)>) -> NodeId
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut record = Record::typed(ty);
        for (name, value) in fields {
            record.insert(name, value.into());
        }
        self.alloc(record)
    }

    /// Stores a plain (untyped) record with the given fields.
    pub fn alloc_record<K, V>(&mut self, fields: impl IntoIterator<Item = (K, V)>) -> NodeId
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut record = Record::new();
        for (name, value) in fields {
            record.insert(name, value.into());
        }
        self.alloc(record)
    }

    /// Stores an array.
    pub fn alloc_array<V: Into<Value>>(&mut self, values: impl IntoIterator<Item = V>) -> NodeId {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.alloc(values)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Returns the node a value points to, if any.
    #[inline]
    pub fn node_of(&self, value: &Value) -> Option<&Node> {
        value.as_node().and_then(|id| self.node(id))
    }

    #[inline]
    pub fn record(&self, id: NodeId) -> Option<&Record> {
        self.node(id).and_then(Node::as_record)
    }

    #[inline]
    pub fn record_mut(&mut self, id: NodeId) -> Option<&mut Record> {
        self.node_mut(id).and_then(Node::as_record_mut)
    }

    #[inline]
    pub fn array(&self, id: NodeId) -> Option<&[Value]> {
        self.node(id).and_then(Node::as_array)
    }

    #[inline]
    pub fn array_mut(&mut self, id: NodeId) -> Option<&mut Vec<Value>> {
        self.node_mut(id).and_then(Node::as_array_mut)
    }

    /// Writes `value` into `slot` of `node`.
    ///
    /// Record fields are inserted; array indices past the end pad with
    /// [`Value::Null`].
    pub fn assign(&mut self, node: NodeId, slot: &Slot, value: Value) -> Result<(), GraphError> {
        let invalid = || GraphError::InvalidSlot {
            node,
            slot: slot.clone(),
        };
        match (self.node_mut(node), slot) {
            (None, _) => Err(GraphError::Dangling(node)),
            (Some(Node::Record(record)), Slot::Field(name)) => {
                record.insert(name.clone(), value);
                Ok(())
            }
            (Some(Node::Array(values)), Slot::Index(index)) => {
                if *index >= values.len() {
                    values.resize(*index + 1, Value::Null);
                }
                values[*index] = value;
                Ok(())
            }
            (Some(_), _) => Err(invalid()),
        }
    }

    /// Follows `path` from `root`, returning the value found there.
    ///
    /// Members step into records, indices step into arrays.
    pub fn walk(&self, root: &Value, path: &Path) -> Option<Value> {
        let mut current = root.clone();
        for key in path.keys() {
            let node = self.node_of(&current)?;
            current = match (node, key) {
                (Node::Record(record), PathKey::Member(name)) => record.get(name)?.clone(),
                (Node::Array(values), PathKey::Index(index)) => values.get(*index)?.clone(),
                _ => return None,
            };
        }
        Some(current)
    }

    /// Copies `value` and everything reachable from it into `target`.
    ///
    /// Sharing and cycles are preserved; dangling handles become
    /// [`Value::Null`].
    pub fn transplant(&self, value: &Value, target: &mut Graph) -> Value {
        let mut copied = HashMap::default();
        self.transplant_with(value, target, &mut copied)
    }

    /// [`transplant`](Self::transplant) with a caller-owned memo, so that
    /// several values copied into the same target keep their sharing.
    pub fn transplant_with(
        &self,
        value: &Value,
        target: &mut Graph,
        copied: &mut HashMap<NodeId, NodeId>,
    ) -> Value {
        let Value::Node(id) = value else {
            return value.clone();
        };
        if let Some(mapped) = copied.get(id) {
            return Value::Node(*mapped);
        }
        let Some(node) = self.node(*id) else {
            return Value::Null;
        };
        match node {
            Node::Record(record) => {
                let new = target.alloc(Record::typed_or_plain(record.ty()));
                copied.insert(*id, new);
                for (name, field) in record.iter() {
                    let field = self.transplant_with(field, target, copied);
                    if let Some(out) = target.record_mut(new) {
                        out.insert(name, field);
                    }
                }
                Value::Node(new)
            }
            Node::Array(values) => {
                let new = target.alloc(Vec::<Value>::with_capacity(values.len()));
                copied.insert(*id, new);
                for item in values {
                    let item = self.transplant_with(item, target, copied);
                    if let Some(out) = target.array_mut(new) {
                        out.push(item);
                    }
                }
                Value::Node(new)
            }
        }
    }

    /// Deep equality of `a` in `self` and `b` in `other`.
    ///
    /// Records compare their runtime types and fields regardless of field
    /// order. Identity is compared as shape: a node of `self` must always
    /// pair with the same node of `other`, so cycles terminate and sharing
    /// has to match.
    pub fn structural_eq(&self, a: &Value, other: &Graph, b: &Value) -> bool {
        let mut pairs = HashMap::default();
        self.structural_eq_with(a, other, b, &mut pairs)
    }

    fn structural_eq_with(
        &self,
        a: &Value,
        other: &Graph,
        b: &Value,
        pairs: &mut HashMap<NodeId, NodeId>,
    ) -> bool {
        let (Value::Node(left), Value::Node(right)) = (a, b) else {
            return a == b;
        };
        if let Some(paired) = pairs.get(left) {
            return paired == right;
        }
        pairs.insert(*left, *right);

        match (self.node(*left), other.node(*right)) {
            (Some(Node::Record(x)), Some(Node::Record(y))) => {
                x.ty() == y.ty()
                    && x.len() == y.len()
                    && x.iter().all(|(name, value)| {
                        y.get(name)
                            .is_some_and(|other_value| self.structural_eq_with(value, other, other_value, pairs))
                    })
            }
            (Some(Node::Array(x)), Some(Node::Array(y))) => {
                x.len() == y.len()
                    && x.iter()
                        .zip(y)
                        .all(|(value, other_value)| self.structural_eq_with(value, other, other_value, pairs))
            }
            _ => false,
        }
    }
}

impl Record {
    #[inline]
    fn typed_or_plain(ty: Option<Type>) -> Self {
        match ty {
            Some(ty) => Self::typed(ty),
            None => Self::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Graph;
    use crate::{GraphError, Path, PathKey, Slot, Type, Value};

    struct Node;

    #[test]
    fn assign_slots() {
        let mut graph = Graph::new();
        let record = graph.alloc_record::<&str, Value>([]);
        let array = graph.alloc_array::<Value>([]);

        graph.assign(record, &Slot::Field("me".into()), Value::Node(record)).unwrap();
        graph.assign(array, &Slot::Index(2), Value::Bool(true)).unwrap();

        assert_eq!(graph.record(record).unwrap().get("me"), Some(&Value::Node(record)));
        assert_eq!(graph.array(array).unwrap(), &[Value::Null, Value::Null, Value::Bool(true)]);
        assert!(matches!(
            graph.assign(array, &Slot::Field("x".into()), Value::Null),
            Err(GraphError::InvalidSlot { .. })
        ));
    }

    #[test]
    fn walk_path() {
        let mut graph = Graph::new();
        let leaf = graph.alloc_record([("name", "leaf")]);
        let list = graph.alloc_array([Value::Null, Value::Node(leaf)]);
        let root = Value::Node(graph.alloc_record([("items", Value::Node(list))]));

        let path = Path::root().child(PathKey::from("items")).child(PathKey::Index(1));
        assert_eq!(graph.walk(&root, &path), Some(Value::Node(leaf)));
        assert_eq!(graph.walk(&root, &Path::root()), Some(root.clone()));
        assert_eq!(graph.walk(&root, &Path::root().child(PathKey::Index(0))), None);
    }

    #[test]
    fn transplant_keeps_identity() {
        let mut source = Graph::new();
        let shared = source.alloc_instance(Type::of::<Node>(), [("v", 1)]);
        let root = source.alloc_array([Value::Node(shared), Value::Node(shared)]);
        source.assign(shared, &Slot::Field("root".into()), Value::Node(root)).unwrap();

        let mut target = Graph::new();
        let copy = source.transplant(&Value::Node(root), &mut target);

        assert!(source.structural_eq(&Value::Node(root), &target, &copy));
        let items = target.array(copy.as_node().unwrap()).unwrap();
        assert_eq!(items[0], items[1]);
    }

    #[test]
    fn structural_eq_detects_differences() {
        let mut a = Graph::new();
        let mut b = Graph::new();
        let x = Value::Node(a.alloc_record([("k", 1)]));
        let y = Value::Node(b.alloc_record([("k", 2)]));
        let z = Value::Node(b.alloc_instance(Type::of::<Node>(), [("k", 1)]));

        assert!(!a.structural_eq(&x, &b, &y));
        assert!(!a.structural_eq(&x, &b, &z));
        assert!(a.structural_eq(&Value::from("s"), &b, &Value::from("s")));
    }
}
