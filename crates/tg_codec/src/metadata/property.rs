use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use tg_graph::Type;

use crate::argument::{GenericArgument, GenericChain, TypeArgument};
use crate::codec::Codec;
use crate::metadata::{CustomData, DefaultValue};
use crate::reference::ReferenceHandler;

// -----------------------------------------------------------------------------
// PropertyMetadata

/// One property of a type.
///
/// Options left unset fall back to the options of the property's type
/// metadata while converting. The wire name is chosen by
/// [`TypeMetadata::wire_name`](crate::metadata::TypeMetadata::wire_name).
#[derive(Clone)]
pub struct PropertyMetadata {
    declaring_type: Type,
    name: String,
    alias: Option<String>,
    type_argument: Option<TypeArgument>,
    generic_arguments: Vec<GenericArgument>,
    generics: GenericChain,
    serialized_default_value: Option<DefaultValue>,
    deserialized_default_value: Option<DefaultValue>,
    preserve_null: Option<bool>,
    use_default_value: Option<bool>,
    use_implicit_conversion: Option<bool>,
    reference_handler: Option<Arc<dyn ReferenceHandler>>,
    codec: Option<Arc<dyn Codec>>,
    serializable: bool,
    deserializable: bool,
    custom_data: CustomData,
}

impl PropertyMetadata {
    /// Creates an untyped property of `declaring_type`.
    pub fn new(declaring_type: Type, name: impl Into<String>) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            alias: None,
            type_argument: None,
            generic_arguments: Vec::new(),
            generics: GenericChain::empty(),
            serialized_default_value: None,
            deserialized_default_value: None,
            preserve_null: None,
            use_default_value: None,
            use_implicit_conversion: None,
            reference_handler: None,
            codec: None,
            serializable: true,
            deserializable: true,
            custom_data: CustomData::new(),
        }
    }

    /// Type that declared the property. Inherited properties keep the
    /// ancestor that declared them.
    #[inline]
    pub fn declaring_type(&self) -> Type {
        self.declaring_type
    }

    /// Name of the instance field.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[inline]
    pub fn type_argument(&self) -> Option<&TypeArgument> {
        self.type_argument.as_ref()
    }

    #[inline]
    pub fn generic_arguments(&self) -> &[GenericArgument] {
        &self.generic_arguments
    }

    #[inline]
    pub fn generics(&self) -> &GenericChain {
        &self.generics
    }

    #[inline]
    pub fn serialized_default_value(&self) -> Option<&DefaultValue> {
        self.serialized_default_value.as_ref()
    }

    #[inline]
    pub fn deserialized_default_value(&self) -> Option<&DefaultValue> {
        self.deserialized_default_value.as_ref()
    }

    #[inline]
    pub fn preserve_null(&self) -> Option<bool> {
        self.preserve_null
    }

    #[inline]
    pub fn use_default_value(&self) -> Option<bool> {
        self.use_default_value
    }

    #[inline]
    pub fn use_implicit_conversion(&self) -> Option<bool> {
        self.use_implicit_conversion
    }

    #[inline]
    pub fn reference_handler(&self) -> Option<&Arc<dyn ReferenceHandler>> {
        self.reference_handler.as_ref()
    }

    #[inline]
    pub fn codec(&self) -> Option<&Arc<dyn Codec>> {
        self.codec.as_ref()
    }

    #[inline]
    pub fn serializable(&self) -> bool {
        self.serializable
    }

    #[inline]
    pub fn deserializable(&self) -> bool {
        self.deserializable
    }

    #[inline]
    pub fn custom_data(&self) -> &CustomData {
        &self.custom_data
    }

    // -------------------------------------------------------------------------
    // Setters, used by `PropertyConfigurator`

    pub(crate) fn set_declaring_type(&mut self, ty: Type) {
        self.declaring_type = ty;
    }

    pub(crate) fn set_alias(&mut self, alias: String) {
        self.alias = Some(alias);
    }

    pub(crate) fn set_type_argument(&mut self, argument: TypeArgument) {
        self.type_argument = Some(argument);
    }

    pub(crate) fn push_generic(&mut self, generic: GenericArgument) {
        self.generic_arguments.push(generic);
        self.generics = GenericChain::compile(&self.generic_arguments);
    }

    pub(crate) fn set_serialized_default_value(&mut self, value: DefaultValue) {
        self.serialized_default_value = Some(value);
    }

    pub(crate) fn set_deserialized_default_value(&mut self, value: DefaultValue) {
        self.deserialized_default_value = Some(value);
    }

    pub(crate) fn set_preserve_null(&mut self, value: bool) {
        self.preserve_null = Some(value);
    }

    pub(crate) fn set_use_default_value(&mut self, value: bool) {
        self.use_default_value = Some(value);
    }

    pub(crate) fn set_use_implicit_conversion(&mut self, value: bool) {
        self.use_implicit_conversion = Some(value);
    }

    pub(crate) fn set_reference_handler(&mut self, handler: Arc<dyn ReferenceHandler>) {
        self.reference_handler = Some(handler);
    }

    pub(crate) fn set_codec(&mut self, codec: Arc<dyn Codec>) {
        self.codec = Some(codec);
    }

    pub(crate) fn set_serializable(&mut self, value: bool) {
        self.serializable = value;
    }

    pub(crate) fn set_deserializable(&mut self, value: bool) {
        self.deserializable = value;
    }

    pub(crate) fn custom_data_mut(&mut self) -> &mut CustomData {
        &mut self.custom_data
    }
}

impl fmt::Debug for PropertyMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("declaring_type", &self.declaring_type)
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("type_argument", &self.type_argument)
            .field("generic_arguments", &self.generic_arguments)
            .field("serializable", &self.serializable)
            .field("deserializable", &self.deserializable)
            .finish_non_exhaustive()
    }
}
