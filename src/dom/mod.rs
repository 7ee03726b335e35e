//! Form node arena: slotmap-backed element tree with key and path lookup.

pub mod node;
pub mod query;
pub mod tree;

pub use node::{LayoutStyle, ListModel, NodeData, NodeId, NodeKind};
pub use tree::Dom;
