use crate::{node_traits::*, Key, NodeKey};

pub trait NodeStorage {
    type NodeType;
    type NodeKeyType;

    fn get_node_unchecked(&self, node_key: Self::NodeKeyType) -> &Self::NodeType;
    fn get_mut_node_unchecked(&mut self, node_key: Self::NodeKeyType) -> &mut Self::NodeType;
    fn insert_node(&mut self, node: Self::NodeType) -> Self::NodeKeyType;
    fn remove_node(&mut self, node_key: Self::NodeKeyType) -> Option<Self::NodeType>;
}

/// Traversals shared by every arity-`K` tree stored in a [`NodeStorage`].
///
/// All walks use an explicit stack so their depth is not limited by the call
/// stack.
pub trait TreeBehaviour<const K: usize>
where
    Self: NodeStorage<NodeKeyType = NodeKey>,
    <Self as NodeStorage>::NodeType: ChildBehaviour<K>,
{
    fn root_node(&self) -> Option<NodeKey>;

    fn key_of(&self, node_key: NodeKey) -> Key;

    /// Depth-first search in preorder, slot order `0..K`. When several nodes
    /// share `key` the first one visited wins.
    fn find(&self, key: Key) -> Option<NodeKey> {
        let mut pending_node_keys: Vec<NodeKey> = self.root_node().into_iter().collect();
        while let Some(node_key) = pending_node_keys.pop() {
            if self.key_of(node_key) == key {
                return Some(node_key);
            }
            let node = self.get_node_unchecked(node_key);
            pending_node_keys.extend(node.children().iter().rev().flatten());
        }
        None
    }

    fn preorder(&self) -> Vec<NodeKey> {
        let mut out = vec![];
        let mut pending_node_keys: Vec<NodeKey> = self.root_node().into_iter().collect();
        while let Some(node_key) = pending_node_keys.pop() {
            out.push(node_key);
            let node = self.get_node_unchecked(node_key);
            pending_node_keys.extend(node.children().iter().rev().flatten());
        }
        out
    }

    /// Every node below and including `start`, children before parents,
    /// siblings in slot order.
    fn post_order(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut out = vec![];
        let mut pending_node_keys = vec![start];
        while let Some(node_key) = pending_node_keys.pop() {
            out.push(node_key);
            let node = self.get_node_unchecked(node_key);
            pending_node_keys.extend(node.occupied_children());
        }
        out.reverse();
        out
    }

    fn depth(&self, mut node_key: NodeKey) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.get_node_unchecked(node_key).get_parent() {
            depth += 1;
            node_key = parent;
        }
        depth
    }

    /// Slot of `parent` holding a child whose key equals `key`.
    fn slot_of(&self, parent: NodeKey, key: Key) -> Option<usize> {
        self.get_node_unchecked(parent)
            .children()
            .iter()
            .position(|child| matches!(child, Some(c) if self.key_of(*c) == key))
    }
}
