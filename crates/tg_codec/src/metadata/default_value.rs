use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use tg_graph::{Graph, Value};

// -----------------------------------------------------------------------------
// DefaultValue

/// The value used in place of an absent one when default values are enabled.
///
/// Lazy defaults run once per use and may allocate nodes in the graph being
/// written, so that every use gets its own object.
///
/// # Example
///
/// ```
/// use tg_codec::metadata::DefaultValue;
/// use tg_graph::{Graph, Value};
///
/// let zero = DefaultValue::from(Value::Number(0.0));
/// let fresh_list = DefaultValue::lazy(|graph| Value::Node(graph.alloc_array::<Value>([])));
///
/// let mut graph = Graph::new();
/// assert_eq!(zero.resolve(&mut graph), Value::Number(0.0));
/// assert_ne!(fresh_list.resolve(&mut graph), fresh_list.resolve(&mut graph));
/// ```
#[derive(Clone)]
pub enum DefaultValue {
    Constant(Value),
    Lazy(Arc<dyn Fn(&mut Graph) -> Value + Send + Sync>),
}

impl DefaultValue {
    #[inline]
    pub fn lazy(f: impl Fn(&mut Graph) -> Value + Send + Sync + 'static) -> Self {
        Self::Lazy(Arc::new(f))
    }

    /// Produces the default inside `graph`.
    pub fn resolve(&self, graph: &mut Graph) -> Value {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Lazy(f) => f(graph),
        }
    }
}

impl From<Value> for DefaultValue {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

macro_rules! impl_from_constant {
    ($($ty:ty),*) => {$(
        impl From<$ty> for DefaultValue {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::Constant(Value::from(value))
            }
        }
    )*};
}

impl_from_constant!(bool, f64, i32, &'static str, String);

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}
