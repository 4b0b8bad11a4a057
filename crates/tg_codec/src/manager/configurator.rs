use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;

use tg_graph::Type;

use crate::argument::{GenericArgument, TypeArgument};
use crate::codec::Codec;
use crate::factory::Factory;
use crate::injector::Injector;
use crate::metadata::{DefaultValue, InjectMetadata, PropertyMap, PropertyMetadata, TypeDeclaration};
use crate::naming::NamingConvention;
use crate::reference::ReferenceHandler;
use crate::sorter::{InjectSorter, PropertySorter};

// -----------------------------------------------------------------------------
// TypeConfigurator

/// Edits the declaration of one type inside
/// [`TypeManager::configure`](crate::TypeManager::configure).
///
/// Every setter returns `&mut Self` so calls chain. Changes take effect when
/// the closure returns.
pub struct TypeConfigurator<'c> {
    ty: Type,
    declaration: &'c mut TypeDeclaration,
    inherited: &'c PropertyMap,
}

impl<'c> TypeConfigurator<'c> {
    #[inline]
    pub(crate) fn new(ty: Type, declaration: &'c mut TypeDeclaration, inherited: &'c PropertyMap) -> Self {
        Self {
            ty,
            declaration,
            inherited,
        }
    }

    /// The type being configured.
    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Registers a name that [`TypeArgument::Alias`] resolves to this type.
    pub fn alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.declaration.options.alias = Some(alias.into());
        self
    }

    /// Value of the discriminator field for this type.
    pub fn discriminant(&mut self, discriminant: impl Into<String>) -> &mut Self {
        self.declaration.options.discriminant = Some(discriminant.into());
        self
    }

    /// Name of the discriminator field.
    pub fn discriminator(&mut self, discriminator: impl Into<String>) -> &mut Self {
        self.declaration.options.discriminator = Some(discriminator.into());
        self
    }

    pub fn preserve_discriminator(&mut self, value: bool) -> &mut Self {
        self.declaration.options.preserve_discriminator = Some(value);
        self
    }

    /// Makes this type a variant of `P`.
    ///
    /// `P` inherits this type's discriminant, and this type inherits the
    /// properties of `P`.
    #[inline]
    pub fn parent<P: ?Sized + Any>(&mut self) -> &mut Self {
        self.parent_type(Type::of::<P>())
    }

    pub fn parent_type(&mut self, parent: Type) -> &mut Self {
        self.declaration.parent = Some(parent);
        self
    }

    pub fn factory(&mut self, factory: impl Factory + 'static) -> &mut Self {
        self.declaration.options.factory = Some(Arc::new(factory));
        self
    }

    pub fn injector(&mut self, injector: impl Injector + 'static) -> &mut Self {
        self.declaration.options.injector = Some(Arc::new(injector));
        self
    }

    pub fn reference_handler(&mut self, handler: impl ReferenceHandler + 'static) -> &mut Self {
        self.declaration.options.reference_handler = Some(Arc::new(handler));
        self
    }

    pub fn codec(&mut self, codec: impl Codec + 'static) -> &mut Self {
        self.declaration.options.codec = Some(Arc::new(codec));
        self
    }

    pub fn naming_convention(&mut self, convention: impl NamingConvention + 'static) -> &mut Self {
        self.declaration.options.naming_convention = Some(Arc::new(convention));
        self
    }

    pub fn preserve_null(&mut self, value: bool) -> &mut Self {
        self.declaration.options.preserve_null = Some(value);
        self
    }

    pub fn use_default_value(&mut self, value: bool) -> &mut Self {
        self.declaration.options.use_default_value = Some(value);
        self
    }

    pub fn use_implicit_conversion(&mut self, value: bool) -> &mut Self {
        self.declaration.options.use_implicit_conversion = Some(value);
        self
    }

    /// Sets the default of both directions.
    pub fn default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        let value = value.into();
        self.declaration.options.serialized_default_value = Some(value.clone());
        self.declaration.options.deserialized_default_value = Some(value);
        self
    }

    pub fn serialized_default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.declaration.options.serialized_default_value = Some(value.into());
        self
    }

    pub fn deserialized_default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.declaration.options.deserialized_default_value = Some(value.into());
        self
    }

    pub fn property_sorter(&mut self, sorter: impl PropertySorter + 'static) -> &mut Self {
        self.declaration.options.property_sorter = Some(Arc::new(sorter));
        self
    }

    pub fn inject_sorter(&mut self, sorter: impl InjectSorter + 'static) -> &mut Self {
        self.declaration.options.inject_sorter = Some(Arc::new(sorter));
        self
    }

    pub fn custom_data<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.declaration.options.custom_data.insert(value);
        self
    }

    /// Declares or edits the property `name`.
    ///
    /// Declaring a property the type already inherits overrides it for this
    /// type and its descendants, at the inherited position. The override
    /// starts as a copy of the inherited property.
    pub fn property(&mut self, name: impl Into<String>, f: impl FnOnce(&mut PropertyConfigurator<'_>)) -> &mut Self {
        let name = name.into();
        let ty = self.ty;
        let inherited = self.inherited;
        let property = self
            .declaration
            .properties
            .entry(name)
            .or_insert_with_key(|name| match inherited.get(name) {
                Some(property) => {
                    let mut property = PropertyMetadata::clone(property);
                    property.set_declaring_type(ty);
                    Arc::new(property)
                }
                None => Arc::new(PropertyMetadata::new(ty, name.as_str())),
            });
        f(&mut PropertyConfigurator {
            property: Arc::make_mut(property),
        });
        self
    }

    /// Declares or edits the constructor slot at `index`.
    pub fn inject(&mut self, index: usize, f: impl FnOnce(&mut InjectConfigurator<'_>)) -> &mut Self {
        let inject = self
            .declaration
            .injects
            .entry(index)
            .or_insert_with(|| Arc::new(InjectMetadata::new(index)));
        f(&mut InjectConfigurator {
            inject: Arc::make_mut(inject),
        });
        self
    }
}

// -----------------------------------------------------------------------------
// PropertyConfigurator

/// Edits one property inside [`TypeConfigurator::property`].
pub struct PropertyConfigurator<'c> {
    property: &'c mut PropertyMetadata,
}

impl PropertyConfigurator<'_> {
    /// Name of the property on the wire, ahead of any naming convention.
    pub fn alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.property.set_alias(alias.into());
        self
    }

    pub fn type_argument(&mut self, argument: impl Into<TypeArgument>) -> &mut Self {
        self.property.set_type_argument(argument.into());
        self
    }

    /// Shorthand for `type_argument(Type::of::<T>())`.
    #[inline]
    pub fn ty<T: ?Sized + Any>(&mut self) -> &mut Self {
        self.type_argument(Type::of::<T>())
    }

    /// A type resolved on use, for types that refer to themselves.
    #[inline]
    pub fn lazy_type(&mut self, resolver: fn() -> Option<Type>) -> &mut Self {
        self.type_argument(TypeArgument::lazy(resolver))
    }

    /// Appends a generic argument of the property type.
    pub fn generic(&mut self, generic: impl Into<GenericArgument>) -> &mut Self {
        self.property.push_generic(generic.into());
        self
    }

    /// Sets the default of both directions.
    pub fn default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        let value = value.into();
        self.property.set_serialized_default_value(value.clone());
        self.property.set_deserialized_default_value(value);
        self
    }

    pub fn serialized_default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.property.set_serialized_default_value(value.into());
        self
    }

    pub fn deserialized_default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.property.set_deserialized_default_value(value.into());
        self
    }

    pub fn preserve_null(&mut self, value: bool) -> &mut Self {
        self.property.set_preserve_null(value);
        self
    }

    pub fn use_default_value(&mut self, value: bool) -> &mut Self {
        self.property.set_use_default_value(value);
        self
    }

    pub fn use_implicit_conversion(&mut self, value: bool) -> &mut Self {
        self.property.set_use_implicit_conversion(value);
        self
    }

    pub fn reference_handler(&mut self, handler: impl ReferenceHandler + 'static) -> &mut Self {
        self.property.set_reference_handler(Arc::new(handler));
        self
    }

    pub fn codec(&mut self, codec: impl Codec + 'static) -> &mut Self {
        self.property.set_codec(Arc::new(codec));
        self
    }

    pub fn serializable(&mut self, value: bool) -> &mut Self {
        self.property.set_serializable(value);
        self
    }

    pub fn deserializable(&mut self, value: bool) -> &mut Self {
        self.property.set_deserializable(value);
        self
    }

    pub fn custom_data<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.property.custom_data_mut().insert(value);
        self
    }
}

// -----------------------------------------------------------------------------
// InjectConfigurator

/// Edits one constructor slot inside [`TypeConfigurator::inject`].
pub struct InjectConfigurator<'c> {
    inject: &'c mut InjectMetadata,
}

impl InjectConfigurator<'_> {
    /// Field of the built instance receiving the argument.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.inject.set_name(name);
        self
    }

    /// Collected entry supplying the argument, the slot name by default.
    pub fn key(&mut self, key: impl Into<String>) -> &mut Self {
        self.inject.set_key(key);
        self
    }
}
