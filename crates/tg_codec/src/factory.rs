//! Builds instances from decoded properties.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use tg_graph::{Fields, Graph, Node, Record, Value};

use crate::injector::Injector;
use crate::metadata::TypeMetadata;

/// Decoded values keyed by property name, followed by the unrecognized
/// fields of the wire record.
pub type PropertyEntries = Fields;

/// Error returned by a [`Factory`].
pub type FactoryError = Box<dyn core::error::Error + Send + Sync>;

// -----------------------------------------------------------------------------
// Factory

/// Turns collected entries into an instance.
pub trait Factory: Send + Sync {
    fn build(
        &self,
        metadata: &TypeMetadata,
        entries: PropertyEntries,
        injector: &dyn Injector,
        graph: &mut Graph,
    ) -> Result<Value, FactoryError>;
}

// -----------------------------------------------------------------------------
// ObjectFactory

/// The default [`Factory`].
///
/// Takes the instance from the injector when it supplies one and allocates
/// an empty instance of the type otherwise. Every entry is written to the
/// instance, then each inject slot copies its key entry into its field.
///
/// # Examples
///
/// ```
/// use tg_codec::factory::{Factory, ObjectFactory, PropertyEntries};
/// use tg_codec::TypeManager;
/// use tg_graph::{Graph, Type, Value};
///
/// struct Point;
///
/// let manager = TypeManager::new();
/// let point = manager.resolve_type(Type::of::<Point>());
///
/// let mut entries = PropertyEntries::default();
/// entries.insert("x".into(), Value::from(3));
///
/// let mut graph = Graph::new();
/// let built = ObjectFactory
///     .build(&point, entries, point.injector().as_ref(), &mut graph)
///     .unwrap();
///
/// let record = graph.record(built.as_node().unwrap()).unwrap();
/// assert_eq!(record.ty(), Some(Type::of::<Point>()));
/// assert_eq!(record.get("x"), Some(&Value::Number(3.0)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectFactory;

impl Factory for ObjectFactory {
    fn build(
        &self,
        metadata: &TypeMetadata,
        entries: PropertyEntries,
        injector: &dyn Injector,
        graph: &mut Graph,
    ) -> Result<Value, FactoryError> {
        let arguments: Vec<(String, Value)> = metadata
            .sorted_injects()
            .into_iter()
            .filter_map(|inject| {
                let name = inject.name()?;
                let value = entries.get(inject.key()?)?;
                Some((String::from(name), value.clone()))
            })
            .collect();

        let id = match injector.get(metadata, graph) {
            None => graph.alloc(Record::typed(metadata.ty())),
            Some(Value::Node(id)) if matches!(graph.node(id), Some(Node::Record(_))) => id,
            Some(other) => {
                return Err(format!(
                    "injector of `{}` returned a {} instead of a record",
                    metadata.name(),
                    other.kind(),
                )
                .into());
            }
        };

        let Some(record) = graph.record_mut(id) else {
            return Err(format!("instance {id} of `{}` disappeared", metadata.name()).into());
        };
        if record.ty().is_none() {
            record.set_ty(Some(metadata.ty()));
        }
        for (name, value) in entries {
            record.insert(name, value);
        }
        for (name, value) in arguments {
            record.insert(name, value);
        }
        Ok(Value::Node(id))
    }
}
