#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Extern Crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod argument;
mod context;
mod error;

pub mod codec;
pub mod factory;
pub mod injector;
pub mod manager;
pub mod metadata;
pub mod naming;
pub mod reference;
pub mod sorter;

// -----------------------------------------------------------------------------
// Top-level exports

pub use argument::{GenericArgument, GenericChain, GenericNode, TypeArgument};
pub use context::{Direction, Outcome, PendingAssignment, ReferenceState, SerializerContext, Session};
pub use error::{CodecError, ErrorKind};
pub use manager::TypeManager;
pub use reference::{DirectReferenceHandler, LeadReferenceHandler, PathReferenceHandler, ReferenceHandler};

#[cfg(feature = "auto_register")]
pub use manager::TypeRegistration;

#[cfg(feature = "auto_register")]
pub use inventory;
