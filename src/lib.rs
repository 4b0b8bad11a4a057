#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use tg_codec as codec;
pub use tg_graph as graph;
pub use tg_utils as utils;

pub use tg_codec::{CodecError, ErrorKind, GenericArgument, TypeArgument, TypeManager};
pub use tg_graph::{Graph, NodeId, Type, Value};
