use crate::{node_traits::*, NodeKey};

/// A node of an [`NTree`](crate::ntree::NTree): one owned payload, `K` child
/// slots and a back reference to the parent.
#[derive(Debug)]
pub struct TreeNode<T, const K: usize> {
    pub payload: T,
    pub parent: Option<NodeKey>,
    pub children: [Option<NodeKey>; K],
    pub child_count: usize,
}

impl<T, const K: usize> TreeNode<T, K> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            parent: None,
            children: [None; K],
            child_count: 0,
        }
    }
}

impl<T, const K: usize> ChildBehaviour<K> for TreeNode<T, K> {
    fn set_parent(&mut self, node_key: NodeKey) {
        self.parent = Some(node_key);
    }

    fn get_parent(&self) -> Option<NodeKey> {
        self.parent
    }

    fn children(&self) -> &[Option<NodeKey>; K] {
        &self.children
    }

    fn child_count(&self) -> usize {
        self.child_count
    }

    fn set_child(&mut self, slot: usize, child: NodeKey) {
        debug_assert!(self.children[slot].is_none());
        self.children[slot] = Some(child);
        self.child_count += 1;
    }

    fn clear_child(&mut self, slot: usize) -> Option<NodeKey> {
        let cleared = self.children[slot].take();
        if cleared.is_some() {
            self.child_count -= 1;
        }
        cleared
    }
}
