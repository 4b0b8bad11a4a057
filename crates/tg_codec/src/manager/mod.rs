//! The registry of type metadata.
//!
//! ## Menu
//!
//! - [`TypeManager`]: resolves [`TypeArgument`]s, owns the configuration and
//!   runs top-level conversions.
//! - [`TypeConfigurator`], [`PropertyConfigurator`], [`InjectConfigurator`]:
//!   the declarative configuration API.
//! - [`TypeRegistration`]: configuration collected at link time, feature
//!   `auto_register`.
//!
//! ## Configuration and caching
//!
//! Metadata of a type is created the first time it is resolved and lives as
//! long as the manager. Resolving the same type again returns the same
//! `Arc`. Configuration needs `&mut TypeManager` and rebuilds, at that
//! moment, the inherited properties of the configured type and its
//! descendants and the discriminant tables of the type and its ancestors.
//! `Arc`s handed out before a reconfiguration keep the old state.

// -----------------------------------------------------------------------------
// Modules

mod configurator;

#[cfg(feature = "auto_register")]
mod registration;

// -----------------------------------------------------------------------------
// Exports

pub use configurator::{InjectConfigurator, PropertyConfigurator, TypeConfigurator};

#[cfg(feature = "auto_register")]
pub use registration::TypeRegistration;

// -----------------------------------------------------------------------------
// TypeManager

use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use tg_graph::{Graph, Type, Value};
use tg_utils::TypeIdMap;
use tg_utils::hash::HashMap;

use crate::argument::{GenericArgument, TypeArgument};
use crate::codec::{AnyCodec, Array, ArrayCodec, BooleanCodec, Map, MapCodec, NumberCodec, StringCodec, Unknown};
use crate::context::{Direction, ROOT_PATH, SerializerContext, Session};
use crate::error::{CodecError, ErrorKind};
use crate::metadata::{PropertyMap, TypeMetadata, TypeOptionsBase};

type MetadataTable = TypeIdMap<Arc<TypeMetadata>>;

/// Resolves types to their metadata and converts values with it.
///
/// A new manager knows the built-in types:
///
/// | type | alias | codec |
/// |------|-------|-------|
/// | `bool` | `Boolean` | [`BooleanCodec`] |
/// | `f64` | `Number` | [`NumberCodec`] |
/// | `String` | `String` | [`StringCodec`] |
/// | [`Array`] | `Array` | [`ArrayCodec`] |
/// | [`Map`] | `Map` | [`MapCodec`] |
/// | [`Unknown`] | `Any` | [`AnyCodec`] |
///
/// Every other type uses the codec of the base options,
/// [`TypeCodec`](crate::codec::TypeCodec) unless changed.
///
/// # Examples
///
/// ```
/// use tg_codec::TypeManager;
/// use tg_graph::{Graph, Type, Value};
///
/// struct Point;
///
/// let mut manager = TypeManager::new();
/// manager.configure::<Point>(|t| {
///     t.property("x", |p| { p.ty::<f64>(); })
///         .property("y", |p| { p.ty::<f64>(); });
/// });
///
/// let mut instances = Graph::new();
/// let point = instances.alloc_instance(Type::of::<Point>(), [("x", 1.0), ("y", 2.0)]);
///
/// let mut wire = Graph::new();
/// let encoded = manager
///     .serialize(Type::of::<Point>(), &instances, &Value::Node(point), &mut wire)
///     .unwrap()
///     .unwrap();
/// let record = wire.node_of(&encoded).and_then(|node| node.as_record()).unwrap();
/// assert_eq!(record.get("y"), Some(&Value::Number(2.0)));
/// assert_eq!(record.ty(), None);
/// ```
pub struct TypeManager {
    base: Arc<TypeOptionsBase>,
    metadata: RwLock<MetadataTable>,
    aliases: HashMap<String, Type>,
}

impl Default for TypeManager {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeManager {
    /// Creates a manager with default base options.
    #[inline]
    pub fn new() -> Self {
        Self::with_options(TypeOptionsBase::default())
    }

    /// Creates a manager with the given base options.
    pub fn with_options(base: TypeOptionsBase) -> Self {
        let mut manager = Self {
            base: Arc::new(base),
            metadata: RwLock::new(TypeIdMap::new()),
            aliases: HashMap::default(),
        };
        manager
            .configure::<bool>(|t| {
                t.alias("Boolean").codec(BooleanCodec);
            })
            .configure::<f64>(|t| {
                t.alias("Number").codec(NumberCodec);
            })
            .configure::<String>(|t| {
                t.alias("String").codec(StringCodec);
            })
            .configure::<Array>(|t| {
                t.alias("Array").codec(ArrayCodec);
            })
            .configure::<Map>(|t| {
                t.alias("Map").codec(MapCodec);
            })
            .configure::<Unknown>(|t| {
                t.alias("Any").codec(AnyCodec);
            });
        manager
    }

    // -------------------------------------------------------------------------
    // Configuration

    #[inline]
    pub fn base(&self) -> &TypeOptionsBase {
        &self.base
    }

    /// Edits the base options shared by every type of this manager.
    ///
    /// # Examples
    ///
    /// ```
    /// use tg_codec::TypeManager;
    /// use tg_graph::Type;
    ///
    /// let mut manager = TypeManager::new();
    /// manager.configure_base(|base| base.discriminator = "kind".into());
    /// assert_eq!(manager.resolve_type(Type::of::<f64>()).discriminator(), "kind");
    /// ```
    pub fn configure_base(&mut self, f: impl FnOnce(&mut TypeOptionsBase)) -> &mut Self {
        f(Arc::make_mut(&mut self.base));
        let base = self.base.clone();
        let table = self.metadata.get_mut().unwrap_or_else(PoisonError::into_inner);
        for metadata in table.values_mut() {
            Arc::make_mut(metadata).set_base(base.clone());
        }
        self
    }

    /// Configures `T`, see [`TypeConfigurator`].
    #[inline]
    pub fn configure<T: ?Sized + Any>(&mut self, f: impl FnOnce(&mut TypeConfigurator<'_>)) -> &mut Self {
        self.configure_type(Type::of::<T>(), f)
    }

    /// Configures `ty`, see [`TypeConfigurator`].
    ///
    /// A parent that would make the type its own ancestor is logged and
    /// ignored, the previous parent stays.
    pub fn configure_type(&mut self, ty: Type, f: impl FnOnce(&mut TypeConfigurator<'_>)) -> &mut Self {
        let current = self.resolve_type(ty);
        let mut declaration = current.declaration().clone();
        let old_parent = declaration.parent;
        let old_alias = declaration.options.alias.clone();

        f(&mut TypeConfigurator::new(ty, &mut declaration, current.properties()));
        drop(current);

        let base = self.base.clone();
        let table = self.metadata.get_mut().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = declaration.parent
            && is_ancestor_or_self(table, ty, parent)
        {
            log::error!("`{ty}` cannot extend `{parent}`, the hierarchy would be cyclic");
            declaration.parent = old_parent;
        }
        let new_parent = declaration.parent;
        let new_alias = declaration.options.alias.clone();

        if let Some(metadata) = table.get_mut(&ty.id()) {
            Arc::make_mut(metadata).set_declaration(declaration);
        }

        if old_parent != new_parent {
            if let Some(old) = old_parent
                && let Some(metadata) = table.get_mut(&old.id())
            {
                Arc::make_mut(metadata).children_mut().retain(|child| *child != ty);
            }
            if let Some(new) = new_parent {
                let metadata = table.get_or_insert_with(new.id(), || Arc::new(TypeMetadata::new(new, base)));
                let children = Arc::make_mut(metadata).children_mut();
                if !children.contains(&ty) {
                    children.push(ty);
                }
            }
        }

        refresh_inherited(table, ty);
        refresh_discriminants(table, ty);
        if old_parent != new_parent
            && let Some(old) = old_parent
        {
            refresh_discriminants(table, old);
        }

        if old_alias != new_alias {
            if let Some(old) = old_alias
                && self.aliases.get(&old) == Some(&ty)
            {
                self.aliases.remove(&old);
            }
            if let Some(new) = new_alias {
                self.aliases.insert(new, ty);
            }
        }
        self
    }

    // -------------------------------------------------------------------------
    // Resolution

    /// Resolves `argument` to its metadata.
    ///
    /// Fails when a lazy argument yields nothing or an alias is unknown.
    pub fn resolve(&self, argument: &TypeArgument) -> Result<Arc<TypeMetadata>, ErrorKind> {
        match argument {
            TypeArgument::Type(ty) => Ok(self.resolve_type(*ty)),
            TypeArgument::Lazy(resolver) => resolver()
                .map(|ty| self.resolve_type(ty))
                .ok_or(ErrorKind::UnresolvedLazyType),
            TypeArgument::Alias(name) => self
                .resolve_alias(name)
                .ok_or_else(|| ErrorKind::UnknownAlias(String::from(name.as_ref()))),
        }
    }

    /// Metadata of `ty`, created with default options on first use.
    pub fn resolve_type(&self, ty: Type) -> Arc<TypeMetadata> {
        let table = self.metadata.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(metadata) = table.get(&ty.id()) {
            return metadata.clone();
        }
        drop(table);

        let mut table = self.metadata.write().unwrap_or_else(PoisonError::into_inner);
        table
            .get_or_insert_with(ty.id(), || {
                log::debug!("creating metadata of `{}`", ty.path());
                Arc::new(TypeMetadata::new(ty, self.base.clone()))
            })
            .clone()
    }

    /// Metadata of the type registered under `alias`.
    pub fn resolve_alias(&self, alias: &str) -> Option<Arc<TypeMetadata>> {
        self.aliases.get(alias).map(|ty| self.resolve_type(*ty))
    }

    /// Metadata of `ty` if it was already created.
    pub fn get(&self, ty: Type) -> Option<Arc<TypeMetadata>> {
        let table = self.metadata.read().unwrap_or_else(PoisonError::into_inner);
        table.get(&ty.id()).cloned()
    }

    #[inline]
    pub fn contains(&self, ty: Type) -> bool {
        let table = self.metadata.read().unwrap_or_else(PoisonError::into_inner);
        table.contains(&ty.id())
    }

    // -------------------------------------------------------------------------
    // Conversion

    /// Encodes `value`, an instance of `argument` living in `source`, into
    /// plain wire shapes allocated in `target`.
    ///
    /// Returns `None` when the value encodes to nothing.
    pub fn serialize(
        &self,
        argument: impl Into<GenericArgument>,
        source: &Graph,
        value: &Value,
        target: &mut Graph,
    ) -> Result<Option<Value>, CodecError> {
        self.run(Direction::Encode, argument.into(), source, value, target)
    }

    /// Decodes `value`, a wire shape living in `source`, into an instance of
    /// `argument` allocated in `target`.
    ///
    /// Returns `None` when the value decodes to nothing.
    pub fn deserialize(
        &self,
        argument: impl Into<GenericArgument>,
        source: &Graph,
        value: &Value,
        target: &mut Graph,
    ) -> Result<Option<Value>, CodecError> {
        self.run(Direction::Decode, argument.into(), source, value, target)
    }

    fn run(
        &self,
        direction: Direction,
        argument: GenericArgument,
        source: &Graph,
        value: &Value,
        target: &mut Graph,
    ) -> Result<Option<Value>, CodecError> {
        let metadata = self
            .resolve(argument.argument())
            .map_err(|kind| CodecError::new(ROOT_PATH, kind))?;

        let mut session = Session::new(self, direction, source, target, value.clone());
        let outcome = SerializerContext::root(&mut session, metadata, argument.chain()).convert(Some(value.clone()))?;
        session.finish();
        Ok(outcome.into_value())
    }

    /// Encodes `value` and renders the wire shape as JSON.
    ///
    /// Cyclic wire shapes cannot be rendered; use
    /// [`PathReferenceHandler`](crate::PathReferenceHandler) for cyclic
    /// graphs.
    #[cfg(feature = "json")]
    pub fn to_json_string(
        &self,
        argument: impl Into<GenericArgument>,
        graph: &Graph,
        value: &Value,
    ) -> Result<String, CodecError> {
        let mut wire = Graph::new();
        let encoded = self.serialize(argument, graph, value, &mut wire)?.unwrap_or(Value::Null);
        tg_graph::serde::to_json_string(&wire, &encoded).map_err(|error| CodecError::new(ROOT_PATH, error.into()))
    }

    /// Parses `text` as JSON and decodes it into `graph`.
    #[cfg(feature = "json")]
    pub fn from_json_str(
        &self,
        argument: impl Into<GenericArgument>,
        text: &str,
        graph: &mut Graph,
    ) -> Result<Option<Value>, CodecError> {
        let mut wire = Graph::new();
        let parsed =
            tg_graph::serde::from_json_str(&mut wire, text).map_err(|error| CodecError::new(ROOT_PATH, error.into()))?;
        self.deserialize(argument, &wire, &parsed, graph)
    }
}

impl fmt::Debug for TypeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.metadata.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("TypeManager")
            .field("base", &self.base)
            .field("types", &table.len())
            .field("aliases", &self.aliases)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Hierarchy maintenance

fn is_ancestor_or_self(table: &MetadataTable, ty: Type, mut candidate: Type) -> bool {
    loop {
        if candidate == ty {
            return true;
        }
        match table.get(&candidate.id()).and_then(|metadata| metadata.parent()) {
            Some(parent) => candidate = parent,
            None => return false,
        }
    }
}

/// Rebuilds the inherited properties and discriminator field of `ty` and
/// its descendants.
fn refresh_inherited(table: &mut MetadataTable, ty: Type) {
    let Some(metadata) = table.get(&ty.id()) else {
        return;
    };
    let parent = metadata.parent().and_then(|parent| table.get(&parent.id()));
    let discriminator = parent.and_then(|parent| parent.declared_discriminator()).map(String::from);
    let mut properties = match parent {
        Some(parent) => parent.properties().clone(),
        None => PropertyMap::default(),
    };
    for (name, property) in metadata.own_properties() {
        properties.insert(name.clone(), property.clone());
    }
    let children = metadata.children().to_vec();

    if let Some(metadata) = table.get_mut(&ty.id()) {
        let metadata = Arc::make_mut(metadata);
        metadata.set_properties(properties);
        metadata.set_inherited_discriminator(discriminator);
    }
    for child in children {
        refresh_inherited(table, child);
    }
}

/// Rebuilds the discriminant tables of `ty` and its ancestors.
fn refresh_discriminants(table: &mut MetadataTable, ty: Type) {
    let mut current = Some(ty);
    while let Some(ty) = current {
        let Some(metadata) = table.get(&ty.id()) else {
            return;
        };
        let mut discriminants = IndexMap::default();
        discriminants.insert(ty, String::from(metadata.discriminant()));
        for child in metadata.children() {
            let Some(child) = table.get(&child.id()) else {
                continue;
            };
            for (variant, discriminant) in child.discriminants() {
                discriminants
                    .entry(variant)
                    .or_insert_with(|| String::from(discriminant));
            }
        }
        current = metadata.parent();

        if let Some(metadata) = table.get_mut(&ty.id()) {
            Arc::make_mut(metadata).set_discriminants(discriminants);
        }
    }
}
