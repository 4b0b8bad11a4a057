#![doc = include_str!("../README.md")]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod graph;
mod node;
mod path;
mod ty;
mod value;

pub mod serde;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::GraphError;
pub use graph::Graph;
pub use node::{Fields, Node, Record, Slot};
pub use path::{ParseError, Path, PathKey};
pub use ty::Type;
pub use value::{NodeId, Value};
