//! Per type and per property configuration.
//!
//! ## Menu
//!
//! - [`TypeMetadata`]: the resolved contract of one type.
//! - [`PropertyMetadata`]: one property of a type.
//! - [`InjectMetadata`]: one constructor slot filled by the factory.
//! - [`TypeOptionsBase`]: defaults shared by every type of a manager.
//! - [`TypeOptions`]: the overrides of one type.
//! - [`DefaultValue`]: a constant or computed default.
//! - [`CustomData`]: user data attached to a type or property.
//!
//! Every option of a type reads its own value first and falls back to the
//! manager's base options, so the mandatory ones (codec, factory, injector,
//! reference handler, discriminator) always resolve.

// -----------------------------------------------------------------------------
// Modules

mod custom_data;
mod default_value;
mod inject;
mod options;
mod property;
mod type_metadata;

// -----------------------------------------------------------------------------
// Exports

pub use custom_data::CustomData;
pub use default_value::DefaultValue;
pub use inject::InjectMetadata;
pub use options::{TypeOptions, TypeOptionsBase};
pub use property::PropertyMetadata;
pub use type_metadata::{PropertyMap, TypeMetadata};

pub(crate) use type_metadata::TypeDeclaration;
