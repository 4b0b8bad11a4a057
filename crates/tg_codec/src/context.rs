use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::ControlFlow;

use tg_graph::{Graph, GraphError, NodeId, PathKey, Slot, Type, Value};
use tg_utils::hash::HashMap;

use crate::argument::GenericChain;
use crate::codec::Codec;
use crate::error::{CodecError, ErrorKind};
use crate::manager::TypeManager;
use crate::metadata::{DefaultValue, PropertyMetadata, TypeMetadata};
use crate::reference::ReferenceHandler;

/// Path of the top-level value.
pub(crate) const ROOT_PATH: &str = "$";

// -----------------------------------------------------------------------------
// Outcome

/// Which way a session converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Instances to wire shapes.
    Encode,
    /// Wire shapes to instances.
    Decode,
}

/// Result of converting one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The converted value.
    Value(Value),
    /// Nothing to write: the field is omitted, an array element is `null`.
    Undefined,
    /// The value of an object that is still being converted.
    ///
    /// The caller registers the slot the value belongs to with
    /// [`SerializerContext::defer`] once its own node exists.
    Deferred(NodeId),
}

impl Outcome {
    /// The converted value, if there is one yet.
    #[inline]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Undefined | Self::Deferred(_) => None,
        }
    }
}

/// A slot waiting for the converted value of a reference key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAssignment {
    pub node: NodeId,
    pub slot: Slot,
}

/// What a session knows about a reference key.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceState {
    /// Conversion of the key has started and not finished.
    Visiting,
    /// The key converted to this value.
    Resolved(Value),
}

// -----------------------------------------------------------------------------
// Session

/// State shared by every context of one top-level conversion.
///
/// Reference keys are nodes of the source graph. The session lives exactly
/// as long as one [`TypeManager::serialize`] or
/// [`TypeManager::deserialize`] call.
pub struct Session<'a> {
    manager: &'a TypeManager,
    direction: Direction,
    source: &'a Graph,
    target: &'a mut Graph,
    root: Value,
    references: HashMap<NodeId, ReferenceState>,
    paths: HashMap<NodeId, String>,
    callbacks: HashMap<NodeId, Vec<PendingAssignment>>,
    copied: HashMap<NodeId, NodeId>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        manager: &'a TypeManager,
        direction: Direction,
        source: &'a Graph,
        target: &'a mut Graph,
        root: Value,
    ) -> Self {
        Self {
            manager,
            direction,
            source,
            target,
            root,
            references: HashMap::default(),
            paths: HashMap::default(),
            callbacks: HashMap::default(),
            copied: HashMap::default(),
        }
    }

    #[inline]
    pub fn manager(&self) -> &'a TypeManager {
        self.manager
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Graph being read.
    #[inline]
    pub fn source(&self) -> &'a Graph {
        self.source
    }

    /// Graph being written.
    #[inline]
    pub fn target(&self) -> &Graph {
        &*self.target
    }

    #[inline]
    pub fn target_mut(&mut self) -> &mut Graph {
        &mut *self.target
    }

    /// The top-level input value, the `$` of every path.
    #[inline]
    pub fn root(&self) -> &Value {
        &self.root
    }

    #[inline]
    pub fn reference(&self, key: NodeId) -> Option<&ReferenceState> {
        self.references.get(&key)
    }

    /// Marks `key` as being converted.
    #[inline]
    pub fn begin(&mut self, key: NodeId) {
        self.references.insert(key, ReferenceState::Visiting);
    }

    /// Ends the conversion of `key`.
    ///
    /// A value is stored and handed to the pending assignments of the key in
    /// the order they were registered. Without a value the key is forgotten
    /// and its pending assignments are dropped.
    pub fn resolve(&mut self, key: NodeId, outcome: &Outcome) -> Result<(), GraphError> {
        let pending = self.callbacks.remove(&key).unwrap_or_default();
        let Outcome::Value(value) = outcome else {
            self.references.remove(&key);
            if !pending.is_empty() {
                log::debug!("dropping {} assignments waiting on {key}, it converted to nothing", pending.len());
            }
            return Ok(());
        };

        self.references.insert(key, ReferenceState::Resolved(value.clone()));
        for assignment in pending {
            log::trace!("assigning {key} to {} {}", assignment.node, assignment.slot);
            self.target.assign(assignment.node, &assignment.slot, value.clone())?;
        }
        Ok(())
    }

    /// Assigns the value of `key` to `assignment` once the key resolves, or
    /// right away when it already has.
    pub fn defer(&mut self, key: NodeId, assignment: PendingAssignment) -> Result<(), GraphError> {
        if let Some(ReferenceState::Resolved(value)) = self.references.get(&key) {
            return self.target.assign(assignment.node, &assignment.slot, value.clone());
        }
        log::debug!("{} {} waits on {key}", assignment.node, assignment.slot);
        self.callbacks.entry(key).or_default().push(assignment);
        Ok(())
    }

    /// Path where `key` was first met.
    #[inline]
    pub fn first_path(&self, key: NodeId) -> Option<&str> {
        self.paths.get(&key).map(String::as_str)
    }

    /// Remembers `path` for `key` unless the key already has one.
    pub fn record_path(&mut self, key: NodeId, path: &str) {
        self.paths.entry(key).or_insert_with(|| String::from(path));
    }

    /// Copies `value` from the source into the target graph unchanged.
    ///
    /// Nodes copied twice within one session map to the same copy.
    pub fn transplant(&mut self, value: &Value) -> Value {
        self.source.transplant_with(value, &mut *self.target, &mut self.copied)
    }

    pub(crate) fn finish(self) {
        let waiting: usize = self.callbacks.values().map(Vec::len).sum();
        if waiting > 0 {
            log::warn!(
                "{waiting} assignments still wait on {} references that never converted",
                self.callbacks.len()
            );
        }
    }
}

// -----------------------------------------------------------------------------
// SerializerContext

/// The state of one value being converted.
///
/// Contexts form a tree mirroring the converted graph. Each one knows its
/// path, the metadata of the type and property being converted and the
/// generic arguments in scope; everything else lives in the shared
/// [`Session`].
///
/// Codecs recurse by creating child contexts:
///
/// - [`child_context`](Self::child_context): same type, one path step deeper.
/// - [`property_context`](Self::property_context): a property of the type.
/// - [`generic_context`](Self::generic_context): a generic argument in scope.
/// - [`variant_context_by_type`](Self::variant_context_by_type) and
///   [`variant_context_by_discriminant`](Self::variant_context_by_discriminant):
///   a registered variant of a polymorphic type.
pub struct SerializerContext<'a, 's> {
    session: &'s mut Session<'a>,
    path: String,
    type_metadata: Arc<TypeMetadata>,
    property_metadata: Option<Arc<PropertyMetadata>>,
    generics: GenericChain,
    polymorphic: bool,
}

impl<'a, 's> SerializerContext<'a, 's> {
    /// Creates the context of the top-level value, at path `$`.
    pub fn root(session: &'s mut Session<'a>, type_metadata: Arc<TypeMetadata>, generics: GenericChain) -> Self {
        Self {
            session,
            path: String::from(ROOT_PATH),
            polymorphic: type_metadata.is_polymorphic(),
            type_metadata,
            property_metadata: None,
            generics,
        }
    }

    #[inline]
    pub fn session(&self) -> &Session<'a> {
        &*self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut Session<'a> {
        &mut *self.session
    }

    #[inline]
    pub fn manager(&self) -> &'a TypeManager {
        self.session.manager
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.session.direction
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn source(&self) -> &'a Graph {
        self.session.source
    }

    #[inline]
    pub fn target_mut(&mut self) -> &mut Graph {
        &mut *self.session.target
    }

    #[inline]
    pub fn type_metadata(&self) -> &Arc<TypeMetadata> {
        &self.type_metadata
    }

    #[inline]
    pub fn property_metadata(&self) -> Option<&Arc<PropertyMetadata>> {
        self.property_metadata.as_ref()
    }

    #[inline]
    pub fn generics(&self) -> &GenericChain {
        &self.generics
    }

    /// Returns `true` when the value must carry a discriminator: the type is
    /// polymorphic, or the context was entered as one of its variants.
    #[inline]
    pub fn is_polymorphic(&self) -> bool {
        self.polymorphic
    }

    /// Builds a configuration error at this path.
    #[inline]
    pub fn error(&self, kind: ErrorKind) -> CodecError {
        CodecError::new(self.path.as_str(), kind)
    }

    // -------------------------------------------------------------------------
    // Effective options, the property's before the type's

    pub fn codec(&self) -> Arc<dyn Codec> {
        self.property_metadata
            .as_ref()
            .and_then(|property| property.codec())
            .unwrap_or(self.type_metadata.codec())
            .clone()
    }

    pub fn reference_handler(&self) -> Arc<dyn ReferenceHandler> {
        self.property_metadata
            .as_ref()
            .and_then(|property| property.reference_handler())
            .unwrap_or(self.type_metadata.reference_handler())
            .clone()
    }

    pub fn preserve_null(&self) -> bool {
        self.property_metadata
            .as_ref()
            .and_then(|property| property.preserve_null())
            .unwrap_or_else(|| self.type_metadata.preserve_null())
    }

    pub fn use_default_value(&self) -> bool {
        self.property_metadata
            .as_ref()
            .and_then(|property| property.use_default_value())
            .unwrap_or_else(|| self.type_metadata.use_default_value())
    }

    pub fn use_implicit_conversion(&self) -> bool {
        self.property_metadata
            .as_ref()
            .and_then(|property| property.use_implicit_conversion())
            .unwrap_or_else(|| self.type_metadata.use_implicit_conversion())
    }

    /// The default value for the current direction, if one is configured.
    pub fn default_value(&self) -> Option<&DefaultValue> {
        let property = self.property_metadata.as_deref();
        match self.session.direction {
            Direction::Encode => property
                .and_then(PropertyMetadata::serialized_default_value)
                .or(self.type_metadata.serialized_default_value()),
            Direction::Decode => property
                .and_then(PropertyMetadata::deserialized_default_value)
                .or(self.type_metadata.deserialized_default_value()),
        }
    }

    // -------------------------------------------------------------------------
    // Conversion

    /// Encodes `value` with the active codec.
    pub fn serialize(&mut self, value: Option<Value>) -> Result<Outcome, CodecError> {
        let codec = self.codec();
        codec.encode(value, self)
    }

    /// Decodes `value` with the active codec.
    pub fn deserialize(&mut self, value: Option<Value>) -> Result<Outcome, CodecError> {
        let codec = self.codec();
        codec.decode(value, self)
    }

    /// [`serialize`](Self::serialize) or [`deserialize`](Self::deserialize),
    /// following the session direction.
    #[inline]
    pub fn convert(&mut self, value: Option<Value>) -> Result<Outcome, CodecError> {
        match self.session.direction {
            Direction::Encode => self.serialize(value),
            Direction::Decode => self.deserialize(value),
        }
    }

    /// Applies the absent and null policy.
    ///
    /// - `null` stays `null` when nulls are preserved.
    /// - Otherwise `null` and absent values become the default value when
    ///   default values are used, and stay absent when not.
    ///
    /// Any other value is handed back for conversion.
    pub fn present(&mut self, value: Option<Value>) -> ControlFlow<Outcome, Value> {
        match value {
            Some(Value::Null) if self.preserve_null() => ControlFlow::Break(Outcome::Value(Value::Null)),
            Some(Value::Null) | None => ControlFlow::Break(self.default_outcome()),
            Some(value) => ControlFlow::Continue(value),
        }
    }

    fn default_outcome(&mut self) -> Outcome {
        if !self.use_default_value() {
            return Outcome::Undefined;
        }
        match self.default_value().cloned() {
            Some(default) => Outcome::Value(default.resolve(&mut *self.session.target)),
            None => Outcome::Undefined,
        }
    }

    /// Registers `slot` of `node` to receive the value of `key`.
    pub fn defer(&mut self, key: NodeId, node: NodeId, slot: Slot) -> Result<(), CodecError> {
        self.session
            .defer(key, PendingAssignment { node, slot })
            .map_err(|error| self.error(ErrorKind::Graph(error)))
    }

    /// [`defer`](Self::defer) for every `(slot, key)` pair.
    pub fn defer_all(
        &mut self,
        node: NodeId,
        deferred: impl IntoIterator<Item = (Slot, NodeId)>,
    ) -> Result<(), CodecError> {
        for (slot, key) in deferred {
            self.defer(key, node, slot)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Child contexts

    /// Same type and property, one path step deeper.
    pub fn child_context(&mut self, key: impl Into<PathKey>) -> SerializerContext<'a, '_> {
        let mut path = self.path.clone();
        key.into().write_to(&mut path);
        SerializerContext {
            session: &mut *self.session,
            path,
            type_metadata: self.type_metadata.clone(),
            property_metadata: self.property_metadata.clone(),
            generics: self.generics.clone(),
            polymorphic: self.polymorphic,
        }
    }

    /// Context of `property`, at its wire name.
    ///
    /// Fails when the property has no type or its type does not resolve.
    pub fn property_context(&mut self, property: &Arc<PropertyMetadata>) -> Result<SerializerContext<'a, '_>, CodecError> {
        let mut path = self.path.clone();
        PathKey::Member(self.type_metadata.wire_name(property).into_owned()).write_to(&mut path);

        let Some(argument) = property.type_argument() else {
            let kind = ErrorKind::UntypedProperty {
                ty: property.declaring_type(),
                property: String::from(property.name()),
            };
            return Err(CodecError::new(path, kind));
        };
        let type_metadata = match self.session.manager.resolve(argument) {
            Ok(metadata) => metadata,
            Err(kind) => return Err(CodecError::new(path, kind)),
        };

        Ok(SerializerContext {
            session: &mut *self.session,
            path,
            polymorphic: type_metadata.is_polymorphic(),
            type_metadata,
            property_metadata: Some(property.clone()),
            generics: property.generics().clone(),
        })
    }

    /// Context of the generic argument at `index`, carrying that argument's
    /// own generics forward.
    ///
    /// The property binding is dropped: options of the generic value come
    /// from its type.
    pub fn generic_context(&mut self, index: usize) -> Result<SerializerContext<'a, '_>, CodecError> {
        let Some(node) = self.generics.get(index) else {
            return Err(self.error(ErrorKind::MissingGeneric {
                ty: self.type_metadata.ty(),
                index,
            }));
        };
        let type_metadata = self
            .session
            .manager
            .resolve(node.argument())
            .map_err(|kind| self.error(kind))?;
        let generics = node.generics().clone();

        Ok(SerializerContext {
            session: &mut *self.session,
            path: self.path.clone(),
            polymorphic: type_metadata.is_polymorphic(),
            type_metadata,
            property_metadata: None,
            generics,
        })
    }

    /// Context of the variant `ty` of the current type.
    ///
    /// Fails when `ty` is not in the discriminant table.
    pub fn variant_context_by_type(&mut self, ty: Type) -> Result<SerializerContext<'a, '_>, CodecError> {
        if self.type_metadata.discriminant_of(ty).is_none() {
            return Err(self.error(ErrorKind::UnknownVariant {
                ty: self.type_metadata.ty(),
                variant: ty,
            }));
        }
        let type_metadata = self.session.manager.resolve_type(ty);

        Ok(SerializerContext {
            session: &mut *self.session,
            path: self.path.clone(),
            type_metadata,
            property_metadata: self.property_metadata.clone(),
            generics: self.generics.clone(),
            polymorphic: true,
        })
    }

    /// Context of the first variant whose discriminant is `discriminant`.
    pub fn variant_context_by_discriminant(
        &mut self,
        discriminant: &str,
    ) -> Result<SerializerContext<'a, '_>, CodecError> {
        match self.type_metadata.variant_of(discriminant) {
            Some(ty) => self.variant_context_by_type(ty),
            None => Err(self.error(ErrorKind::NoDiscriminantMatch {
                ty: self.type_metadata.ty(),
                discriminant: String::from(discriminant),
            })),
        }
    }
}
