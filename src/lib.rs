mod error;
mod node_traits;
mod ntree;
mod partition_cell;
mod partition_impl;
mod tree_node;
mod tree_traits;

use slotmap::new_key_type;
new_key_type! {pub struct NodeKey;}

/// User-level key carried by every payload.
pub type Key = i64;

pub use error::TreeError;

pub mod generic_tree {
    pub use crate::error::TreeError;
    pub use crate::node_traits::*;
    pub use crate::ntree::{NTree, PreorderIter};
    pub use crate::tree_node::TreeNode;
    pub use crate::tree_traits::*;
    pub use crate::Key;
}

pub mod partition {
    pub use crate::error::TreeError;
    pub use crate::node_traits::*;
    pub use crate::partition_cell::PartitionCell;
    pub use crate::partition_impl::*;
    pub use crate::Key;
}
