//! The serde boundary of a [`Graph`](crate::Graph).
//!
//! - [`GraphSerializer`]: writes a value and everything reachable from it as a
//!   tree through any `serde` serializer. Records become maps, arrays become
//!   sequences, runtime types are not written. A node reachable from itself is
//!   an error; a shared node is written once per occurrence.
//! - [`GraphSeed`]: reads any self-describing format into fresh nodes of a graph.
//! - `json` feature: helpers over `serde_json`.

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

#[cfg(feature = "json")]
mod json;

// -----------------------------------------------------------------------------
// Exports

pub use de::GraphSeed;
pub use ser::GraphSerializer;

#[cfg(feature = "json")]
pub use json::{from_json, from_json_str, to_canonical_json_string, to_json, to_json_string};
