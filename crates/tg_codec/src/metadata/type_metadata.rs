use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;
use tg_graph::Type;
use tg_utils::hash::FixedHashState;

use crate::codec::Codec;
use crate::factory::Factory;
use crate::injector::Injector;
use crate::metadata::{CustomData, DefaultValue, InjectMetadata, PropertyMetadata, TypeOptions, TypeOptionsBase};
use crate::naming::NamingConvention;
use crate::reference::ReferenceHandler;
use crate::sorter::{InjectSorter, PropertySorter};

/// Properties keyed by property name, in declaration order.
pub type PropertyMap = IndexMap<String, Arc<PropertyMetadata>, FixedHashState>;

// -----------------------------------------------------------------------------
// TypeDeclaration

/// Everything configured directly on one type.
#[derive(Clone, Default)]
pub(crate) struct TypeDeclaration {
    pub options: TypeOptions,
    pub parent: Option<Type>,
    pub properties: PropertyMap,
    pub injects: BTreeMap<usize, Arc<InjectMetadata>>,
}

// -----------------------------------------------------------------------------
// TypeMetadata

/// The resolved contract of one type.
///
/// Created by a [`TypeManager`](crate::TypeManager) the first time the type
/// is resolved or configured, and shared as `Arc<TypeMetadata>` afterwards.
///
/// - Options read the type's own value, then the manager's
///   [`TypeOptionsBase`]. The discriminator field name is the exception:
///   a type without its own reads it from the nearest ancestor that sets
///   one, so every variant agrees with the base it is decoded through.
/// - [`properties`](Self::properties) holds the inherited properties
///   followed by the type's own; a redeclared property replaces the
///   inherited one in place.
/// - The discriminant table lists the type and every descendant, so a base
///   type can recognize all of its variants.
#[derive(Clone)]
pub struct TypeMetadata {
    ty: Type,
    base: Arc<TypeOptionsBase>,
    declaration: TypeDeclaration,
    properties: PropertyMap,
    inherited_discriminator: Option<String>,
    discriminants: IndexMap<Type, String, FixedHashState>,
    children: Vec<Type>,
}

impl TypeMetadata {
    pub(crate) fn new(ty: Type, base: Arc<TypeOptionsBase>) -> Self {
        let mut discriminants = IndexMap::default();
        discriminants.insert(ty, String::from(ty.name()));
        Self {
            ty,
            base,
            declaration: TypeDeclaration::default(),
            properties: PropertyMap::default(),
            inherited_discriminator: None,
            discriminants,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Canonical name, the short name of the type.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.ty.name()
    }

    /// Options set on this type only.
    #[inline]
    pub fn options(&self) -> &TypeOptions {
        &self.declaration.options
    }

    #[inline]
    pub fn base(&self) -> &Arc<TypeOptionsBase> {
        &self.base
    }

    #[inline]
    pub fn parent(&self) -> Option<Type> {
        self.declaration.parent
    }

    /// Direct subtypes, in the order they were attached.
    #[inline]
    pub fn children(&self) -> &[Type] {
        &self.children
    }

    #[inline]
    pub fn alias(&self) -> Option<&str> {
        self.declaration.options.alias.as_deref()
    }

    // -------------------------------------------------------------------------
    // Effective options

    /// Value written to the discriminator field, defaults to the type name.
    #[inline]
    pub fn discriminant(&self) -> &str {
        self.declaration.options.discriminant.as_deref().unwrap_or(self.ty.name())
    }

    /// Name of the discriminator field: own, then the nearest ancestor's,
    /// then the base one.
    #[inline]
    pub fn discriminator(&self) -> &str {
        self.declaration
            .options
            .discriminator
            .as_deref()
            .or(self.inherited_discriminator.as_deref())
            .unwrap_or(&self.base.discriminator)
    }

    /// Discriminator field set on this type or one of its ancestors.
    #[inline]
    pub(crate) fn declared_discriminator(&self) -> Option<&str> {
        self.declaration
            .options
            .discriminator
            .as_deref()
            .or(self.inherited_discriminator.as_deref())
    }

    #[inline]
    pub fn preserve_discriminator(&self) -> bool {
        self.declaration
            .options
            .preserve_discriminator
            .unwrap_or(self.base.preserve_discriminator)
    }

    #[inline]
    pub fn factory(&self) -> &Arc<dyn Factory> {
        self.declaration.options.factory.as_ref().unwrap_or(&self.base.factory)
    }

    #[inline]
    pub fn injector(&self) -> &Arc<dyn Injector> {
        self.declaration.options.injector.as_ref().unwrap_or(&self.base.injector)
    }

    #[inline]
    pub fn reference_handler(&self) -> &Arc<dyn ReferenceHandler> {
        self.declaration
            .options
            .reference_handler
            .as_ref()
            .unwrap_or(&self.base.reference_handler)
    }

    #[inline]
    pub fn codec(&self) -> &Arc<dyn Codec> {
        self.declaration.options.codec.as_ref().unwrap_or(&self.base.codec)
    }

    #[inline]
    pub fn naming_convention(&self) -> Option<&Arc<dyn NamingConvention>> {
        self.declaration
            .options
            .naming_convention
            .as_ref()
            .or(self.base.naming_convention.as_ref())
    }

    #[inline]
    pub fn preserve_null(&self) -> bool {
        self.declaration.options.preserve_null.unwrap_or(self.base.preserve_null)
    }

    #[inline]
    pub fn use_default_value(&self) -> bool {
        self.declaration
            .options
            .use_default_value
            .unwrap_or(self.base.use_default_value)
    }

    #[inline]
    pub fn use_implicit_conversion(&self) -> bool {
        self.declaration
            .options
            .use_implicit_conversion
            .unwrap_or(self.base.use_implicit_conversion)
    }

    #[inline]
    pub fn serialized_default_value(&self) -> Option<&DefaultValue> {
        self.declaration.options.serialized_default_value.as_ref()
    }

    #[inline]
    pub fn deserialized_default_value(&self) -> Option<&DefaultValue> {
        self.declaration.options.deserialized_default_value.as_ref()
    }

    #[inline]
    pub fn property_sorter(&self) -> Option<&Arc<dyn PropertySorter>> {
        self.declaration
            .options
            .property_sorter
            .as_ref()
            .or(self.base.property_sorter.as_ref())
    }

    #[inline]
    pub fn inject_sorter(&self) -> Option<&Arc<dyn InjectSorter>> {
        self.declaration
            .options
            .inject_sorter
            .as_ref()
            .or(self.base.inject_sorter.as_ref())
    }

    #[inline]
    pub fn custom_data(&self) -> &CustomData {
        &self.declaration.options.custom_data
    }

    // -------------------------------------------------------------------------
    // Properties

    /// Properties declared on this type only.
    #[inline]
    pub fn own_properties(&self) -> &PropertyMap {
        &self.declaration.properties
    }

    /// Inherited and own properties.
    #[inline]
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    #[inline]
    pub fn property(&self, name: &str) -> Option<&Arc<PropertyMetadata>> {
        self.properties.get(name)
    }

    /// Properties in [`PropertySorter`] order, or declaration order without
    /// a sorter.
    pub fn sorted_properties(&self) -> Vec<&Arc<PropertyMetadata>> {
        let mut properties: Vec<_> = self.properties.values().collect();
        if let Some(sorter) = self.property_sorter() {
            properties.sort_by(|a, b| sorter.compare(a, b));
        }
        properties
    }

    /// Name of `property` on the wire: its alias, else the name converted by
    /// the naming convention, else the name itself.
    pub fn wire_name<'p>(&self, property: &'p PropertyMetadata) -> Cow<'p, str> {
        if let Some(alias) = property.alias() {
            return Cow::Borrowed(alias);
        }
        match self.naming_convention() {
            Some(convention) => Cow::Owned(convention.convert(property.name())),
            None => Cow::Borrowed(property.name()),
        }
    }

    // -------------------------------------------------------------------------
    // Injection

    #[inline]
    pub fn injects(&self) -> impl ExactSizeIterator<Item = &Arc<InjectMetadata>> {
        self.declaration.injects.values()
    }

    #[inline]
    pub fn inject(&self, index: usize) -> Option<&Arc<InjectMetadata>> {
        self.declaration.injects.get(&index)
    }

    /// Inject slots in [`InjectSorter`] order, or index order without a
    /// sorter.
    pub fn sorted_injects(&self) -> Vec<&Arc<InjectMetadata>> {
        let mut injects: Vec<_> = self.declaration.injects.values().collect();
        if let Some(sorter) = self.inject_sorter() {
            injects.sort_by(|a, b| sorter.compare(a, b));
        }
        injects
    }

    // -------------------------------------------------------------------------
    // Polymorphism

    /// `(type, discriminant)` pairs of this type and its descendants.
    #[inline]
    pub fn discriminants(&self) -> impl ExactSizeIterator<Item = (Type, &str)> {
        self.discriminants.iter().map(|(ty, d)| (*ty, d.as_str()))
    }

    /// Returns `true` when the type has at least one registered variant.
    #[inline]
    pub fn is_polymorphic(&self) -> bool {
        self.discriminants.len() > 1
    }

    /// Discriminant of `ty` if it is this type or one of its descendants.
    #[inline]
    pub fn discriminant_of(&self, ty: Type) -> Option<&str> {
        self.discriminants.get(&ty).map(String::as_str)
    }

    /// First type whose discriminant equals `discriminant`.
    pub fn variant_of(&self, discriminant: &str) -> Option<Type> {
        self.discriminants
            .iter()
            .find(|(_, d)| d.as_str() == discriminant)
            .map(|(ty, _)| *ty)
    }

    // -------------------------------------------------------------------------
    // Maintained by `TypeManager`

    #[inline]
    pub(crate) fn declaration(&self) -> &TypeDeclaration {
        &self.declaration
    }

    #[inline]
    pub(crate) fn set_declaration(&mut self, declaration: TypeDeclaration) {
        self.declaration = declaration;
    }

    #[inline]
    pub(crate) fn set_base(&mut self, base: Arc<TypeOptionsBase>) {
        self.base = base;
    }

    #[inline]
    pub(crate) fn set_properties(&mut self, properties: PropertyMap) {
        self.properties = properties;
    }

    #[inline]
    pub(crate) fn set_inherited_discriminator(&mut self, discriminator: Option<String>) {
        self.inherited_discriminator = discriminator;
    }

    #[inline]
    pub(crate) fn set_discriminants(&mut self, discriminants: IndexMap<Type, String, FixedHashState>) {
        self.discriminants = discriminants;
    }

    #[inline]
    pub(crate) fn children_mut(&mut self) -> &mut Vec<Type> {
        &mut self.children
    }
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("ty", &self.ty)
            .field("options", &self.declaration.options)
            .field("parent", &self.declaration.parent)
            .field("children", &self.children)
            .field("inherited_discriminator", &self.inherited_discriminator)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("discriminants", &self.discriminants)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::borrow::Cow;
    use alloc::string::String;
    use alloc::sync::Arc;

    use tg_graph::Type;

    use super::TypeMetadata;
    use crate::metadata::{PropertyMetadata, TypeOptionsBase};
    use crate::naming::SnakeCase;

    struct Account;

    #[test]
    fn options_fall_back_to_base() {
        let base = TypeOptionsBase {
            preserve_null: false,
            ..TypeOptionsBase::default()
        };
        let mut meta = TypeMetadata::new(Type::of::<Account>(), Arc::new(base));
        assert!(!meta.preserve_null());
        assert_eq!(meta.discriminator(), "__type__");
        assert_eq!(meta.discriminant(), "Account");
        assert!(!meta.is_polymorphic());

        let mut declaration = meta.declaration().clone();
        declaration.options.preserve_null = Some(true);
        declaration.options.discriminant = Some(String::from("account"));
        meta.set_declaration(declaration);
        assert!(meta.preserve_null());
        assert_eq!(meta.discriminant(), "account");
    }

    #[test]
    fn wire_name_prefers_alias_then_convention() {
        let base = TypeOptionsBase {
            naming_convention: Some(Arc::new(SnakeCase)),
            ..TypeOptionsBase::default()
        };
        let meta = TypeMetadata::new(Type::of::<Account>(), Arc::new(base));

        let mut aliased = PropertyMetadata::new(Type::of::<Account>(), "createdAt");
        assert_eq!(meta.wire_name(&aliased), "created_at");
        aliased.set_alias(String::from("created"));
        assert!(matches!(meta.wire_name(&aliased), Cow::Borrowed("created")));

        let plain = TypeMetadata::new(Type::of::<Account>(), Arc::new(TypeOptionsBase::default()));
        assert_eq!(plain.wire_name(&aliased), "created");
        let named = PropertyMetadata::new(Type::of::<Account>(), "createdAt");
        assert_eq!(plain.wire_name(&named), "createdAt");
    }
}
