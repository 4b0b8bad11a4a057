use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::codec::{Codec, TypeCodec};
use crate::factory::{Factory, ObjectFactory};
use crate::injector::{Injector, ServiceInjector};
use crate::metadata::{CustomData, DefaultValue};
use crate::naming::NamingConvention;
use crate::reference::{DirectReferenceHandler, ReferenceHandler};
use crate::sorter::{InjectSorter, PropertySorter};

// -----------------------------------------------------------------------------
// TypeOptionsBase

/// Defaults shared by every type of one [`TypeManager`](crate::TypeManager).
///
/// | option | default |
/// |--------|---------|
/// | `discriminator` | `"__type__"` |
/// | `factory` | [`ObjectFactory`] |
/// | `injector` | [`ServiceInjector`] without services |
/// | `reference_handler` | [`DirectReferenceHandler`] |
/// | `codec` | [`TypeCodec`] |
/// | `naming_convention` | none |
/// | `preserve_discriminator` | `false` |
/// | `preserve_null` | `true` |
/// | `use_default_value` | `false` |
/// | `use_implicit_conversion` | `false` |
/// | `property_sorter`, `inject_sorter` | none, declaration order |
#[derive(Clone)]
pub struct TypeOptionsBase {
    pub discriminator: String,
    pub factory: Arc<dyn Factory>,
    pub injector: Arc<dyn Injector>,
    pub reference_handler: Arc<dyn ReferenceHandler>,
    pub codec: Arc<dyn Codec>,
    pub naming_convention: Option<Arc<dyn NamingConvention>>,
    pub preserve_discriminator: bool,
    pub preserve_null: bool,
    pub use_default_value: bool,
    pub use_implicit_conversion: bool,
    pub property_sorter: Option<Arc<dyn PropertySorter>>,
    pub inject_sorter: Option<Arc<dyn InjectSorter>>,
}

impl TypeOptionsBase {
    pub const DEFAULT_DISCRIMINATOR: &'static str = "__type__";
}

impl Default for TypeOptionsBase {
    fn default() -> Self {
        Self {
            discriminator: String::from(Self::DEFAULT_DISCRIMINATOR),
            factory: Arc::new(ObjectFactory),
            injector: Arc::new(ServiceInjector::new()),
            reference_handler: Arc::new(DirectReferenceHandler),
            codec: Arc::new(TypeCodec),
            naming_convention: None,
            preserve_discriminator: false,
            preserve_null: true,
            use_default_value: false,
            use_implicit_conversion: false,
            property_sorter: None,
            inject_sorter: None,
        }
    }
}

impl fmt::Debug for TypeOptionsBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOptionsBase")
            .field("discriminator", &self.discriminator)
            .field("preserve_discriminator", &self.preserve_discriminator)
            .field("preserve_null", &self.preserve_null)
            .field("use_default_value", &self.use_default_value)
            .field("use_implicit_conversion", &self.use_implicit_conversion)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeOptions

/// Options set on one type. Unset options fall back to the
/// [`TypeOptionsBase`] of the manager.
#[derive(Clone, Default)]
pub struct TypeOptions {
    pub alias: Option<String>,
    pub discriminant: Option<String>,
    pub discriminator: Option<String>,
    pub factory: Option<Arc<dyn Factory>>,
    pub injector: Option<Arc<dyn Injector>>,
    pub reference_handler: Option<Arc<dyn ReferenceHandler>>,
    pub codec: Option<Arc<dyn Codec>>,
    pub naming_convention: Option<Arc<dyn NamingConvention>>,
    pub preserve_discriminator: Option<bool>,
    pub preserve_null: Option<bool>,
    pub use_default_value: Option<bool>,
    pub use_implicit_conversion: Option<bool>,
    pub serialized_default_value: Option<DefaultValue>,
    pub deserialized_default_value: Option<DefaultValue>,
    pub property_sorter: Option<Arc<dyn PropertySorter>>,
    pub inject_sorter: Option<Arc<dyn InjectSorter>>,
    pub custom_data: CustomData,
}

impl fmt::Debug for TypeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOptions")
            .field("alias", &self.alias)
            .field("discriminant", &self.discriminant)
            .field("discriminator", &self.discriminator)
            .field("preserve_discriminator", &self.preserve_discriminator)
            .field("preserve_null", &self.preserve_null)
            .field("use_default_value", &self.use_default_value)
            .field("use_implicit_conversion", &self.use_implicit_conversion)
            .finish_non_exhaustive()
    }
}
