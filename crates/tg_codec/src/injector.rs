//! Supplies instances to factories.

use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use tg_graph::{Graph, Type, Value};
use tg_utils::hash::HashMap;

use crate::metadata::TypeMetadata;

// -----------------------------------------------------------------------------
// Injector

/// Provides an existing instance for a type.
///
/// A factory asks the injector before allocating; the injected instance is
/// then filled with the decoded properties.
pub trait Injector: Send + Sync {
    fn get(&self, metadata: &TypeMetadata, graph: &mut Graph) -> Option<Value>;
}

// -----------------------------------------------------------------------------
// ServiceInjector

type Service = Arc<dyn Fn(&mut Graph) -> Value + Send + Sync>;

/// An [`Injector`] holding one constructor per type.
///
/// # Examples
///
/// ```
/// use tg_codec::injector::{Injector, ServiceInjector};
/// use tg_codec::TypeManager;
/// use tg_graph::{Graph, Type, Value};
///
/// struct Clock;
///
/// let injector = ServiceInjector::new().with::<Clock>(|graph| {
///     Value::Node(graph.alloc_instance(Type::of::<Clock>(), [("ticks", 0)]))
/// });
///
/// let manager = TypeManager::new();
/// let clock = manager.resolve_type(Type::of::<Clock>());
/// let mut graph = Graph::new();
///
/// assert!(injector.get(&clock, &mut graph).is_some());
/// assert_eq!(graph.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ServiceInjector {
    services: HashMap<Type, Service>,
}

impl ServiceInjector {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the constructor of `T`, replacing the previous one.
    pub fn register<T: ?Sized + Any>(&mut self, service: impl Fn(&mut Graph) -> Value + Send + Sync + 'static) {
        self.services.insert(Type::of::<T>(), Arc::new(service));
    }

    /// Builder form of [`register`](Self::register).
    #[inline]
    pub fn with<T: ?Sized + Any>(mut self, service: impl Fn(&mut Graph) -> Value + Send + Sync + 'static) -> Self {
        self.register::<T>(service);
        self
    }

    #[inline]
    pub fn contains(&self, ty: Type) -> bool {
        self.services.contains_key(&ty)
    }
}

impl Injector for ServiceInjector {
    fn get(&self, metadata: &TypeMetadata, graph: &mut Graph) -> Option<Value> {
        self.services.get(&metadata.ty()).map(|service| service(graph))
    }
}

impl fmt::Debug for ServiceInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.services.keys()).finish()
    }
}
