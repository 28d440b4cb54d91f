use std::io;

use crate::{error::TreeError, node_traits::*, tree_node::TreeNode, tree_traits::*, Key, NodeKey};
use slotmap::SlotMap;
use tracing::{debug, trace};

/// Tree of fixed arity `K` over opaque payloads.
///
/// Nodes live in a slot map; parent and child links are [`NodeKey`] handles.
/// Payloads are addressed by their own [`Payload::key`], which callers are
/// expected to keep unique.
pub struct NTree<T, const K: usize>
where
    T: Payload,
{
    nodes: SlotMap<NodeKey, TreeNode<T, K>>,
    root: Option<NodeKey>,
}

impl<T, const K: usize> Default for NTree<T, K>
where
    T: Payload,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const K: usize> NTree<T, K>
where
    T: Payload,
{
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::default(),
            root: None,
        }
    }

    pub fn arity(&self) -> usize {
        K
    }

    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Tears the whole tree down, children before parents, handing each
    /// payload to [`Payload::release`]. Does nothing on an empty tree.
    pub fn destroy(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        let order = self.post_order(root);
        debug!(nodes = order.len(), "destroying tree");
        for node_key in order {
            if let Some(node) = self.remove_node(node_key) {
                node.payload.release();
            }
        }
        debug_assert!(self.nodes.is_empty());
    }

    /// Stores a clone of `payload` under the node keyed `parent_key`.
    ///
    /// On an empty tree `parent_key` is ignored and the clone becomes the root.
    /// Otherwise the clone goes into the lowest free slot of the parent.
    pub fn add_leaf(&mut self, parent_key: Key, payload: &T) -> Result<NodeKey, TreeError> {
        if self.is_empty() {
            return Ok(self.plant_root(payload));
        }

        let parent = self.find(parent_key).ok_or(TreeError::NotFound(parent_key))?;
        let slot = self
            .get_node_unchecked(parent)
            .first_free_slot()
            .ok_or(TreeError::Full(parent_key))?;

        let mut child = TreeNode::new(payload.clone());
        child.set_parent(parent);
        let child_key = self.insert_node(child);
        self.get_mut_node_unchecked(parent).set_child(slot, child_key);
        debug!(parent = parent_key, key = payload.key(), slot, "added leaf");
        Ok(child_key)
    }

    /// Makes a clone of `payload` the root of an empty tree.
    pub(crate) fn plant_root(&mut self, payload: &T) -> NodeKey {
        debug_assert!(self.is_empty());
        let root = self.insert_node(TreeNode::new(payload.clone()));
        self.root = Some(root);
        debug!(key = payload.key(), "created root");
        root
    }

    pub fn get_root(&self) -> Result<T, TreeError> {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        Ok(self.get_node_unchecked(root).payload.clone())
    }

    pub fn get_node(&self, key: Key) -> Result<T, TreeError> {
        let node_key = self.lookup(key)?;
        Ok(self.get_node_unchecked(node_key).payload.clone())
    }

    /// Clones of the children of `key`, one entry per slot, `None` where the
    /// slot is empty. The returned vector always has length `K`.
    pub fn get_children(&self, key: Key) -> Result<Vec<Option<T>>, TreeError> {
        let node_key = self.lookup(key)?;
        let mut out = Vec::new();
        out.try_reserve_exact(K).map_err(|_| TreeError::AllocationFailure)?;
        out.extend(
            self.get_node_unchecked(node_key)
                .children()
                .iter()
                .map(|child| child.map(|c| self.get_node_unchecked(c).payload.clone())),
        );
        Ok(out)
    }

    pub fn node_is_active(&self, key: Key) -> Result<bool, TreeError> {
        let node_key = self.lookup(key)?;
        Ok(self.get_node_unchecked(node_key).is_active())
    }

    pub fn node_is_leaf(&self, key: Key) -> Result<bool, TreeError> {
        let node_key = self.lookup(key)?;
        Ok(!self.get_node_unchecked(node_key).has_children())
    }

    /// Removes the leaf keyed `key`. The stored payload goes through
    /// [`Payload::release`]; the caller gets a clone of it back.
    pub fn del_leaf(&mut self, key: Key) -> Result<T, TreeError> {
        let node_key = self.lookup(key)?;
        if self.get_node_unchecked(node_key).has_children() {
            return Err(TreeError::HasChildren(key));
        }

        match self.get_node_unchecked(node_key).get_parent() {
            Some(parent) => {
                let slot = self.slot_of(parent, key).ok_or(TreeError::NotFound(key))?;
                let cleared = self.get_mut_node_unchecked(parent).clear_child(slot);
                debug_assert_eq!(cleared, Some(node_key));
            }
            None => self.root = None,
        }

        let node = self.remove_node(node_key).ok_or(TreeError::NotFound(key))?;
        let payload = node.payload.clone();
        node.payload.release();
        debug!(key, remaining = self.count(), "deleted leaf");
        Ok(payload)
    }

    /// Clone of the parent's payload, `None` for the root.
    pub fn parent_of(&self, key: Key) -> Result<Option<T>, TreeError> {
        let node_key = self.lookup(key)?;
        Ok(self
            .get_node_unchecked(node_key)
            .get_parent()
            .map(|parent| self.get_node_unchecked(parent).payload.clone()))
    }

    /// Number of edges between the root and `key`.
    pub fn depth_of(&self, key: Key) -> Result<usize, TreeError> {
        let node_key = self.lookup(key)?;
        Ok(self.depth(node_key))
    }

    /// Edges on the longest root-to-leaf path. Zero for an empty tree.
    pub fn height(&self) -> usize {
        self.iter_leaf_nodes()
            .map(|(node_key, _)| self.depth(node_key))
            .max()
            .unwrap_or(0)
    }

    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.print_to(&mut lock)
    }

    /// Writes every payload in preorder through [`Payload::print`].
    pub fn print_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for node_key in self.preorder() {
            let node = self.get_node_unchecked(node_key);
            let children: Vec<Option<&T>> = node
                .children()
                .iter()
                .map(|child| child.map(|c| &self.get_node_unchecked(c).payload))
                .collect();
            node.payload.print(&children, &mut *out)?;
        }
        Ok(())
    }

    /// Payloads in preorder, the same order [`NTree::print_to`] uses.
    pub fn iter(&self) -> PreorderIter<'_, T, K> {
        PreorderIter {
            tree: self,
            pending_node_keys: self.root.into_iter().collect(),
        }
    }

    pub fn iter_leaf_nodes(&self) -> impl Iterator<Item = (NodeKey, &T)> {
        self.nodes
            .iter()
            .filter(|(_, node)| !node.has_children())
            .map(|(node_key, node)| (node_key, &node.payload))
    }

    fn lookup(&self, key: Key) -> Result<NodeKey, TreeError> {
        let found = self.find(key);
        trace!(key, found = found.is_some(), "lookup");
        found.ok_or(TreeError::NotFound(key))
    }
}

impl<T, const K: usize> Drop for NTree<T, K>
where
    T: Payload,
{
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<T, const K: usize> TreeBehaviour<K> for NTree<T, K>
where
    T: Payload,
{
    fn root_node(&self) -> Option<NodeKey> {
        self.root
    }

    fn key_of(&self, node_key: NodeKey) -> Key {
        self.get_node_unchecked(node_key).payload.key()
    }
}

impl<T, const K: usize> NodeStorage for NTree<T, K>
where
    T: Payload,
{
    type NodeType = TreeNode<T, K>;
    type NodeKeyType = NodeKey;

    fn get_node_unchecked(&self, node_key: Self::NodeKeyType) -> &Self::NodeType {
        &self.nodes[node_key]
    }

    fn get_mut_node_unchecked(&mut self, node_key: Self::NodeKeyType) -> &mut Self::NodeType {
        &mut self.nodes[node_key]
    }

    fn insert_node(&mut self, node: Self::NodeType) -> Self::NodeKeyType {
        self.nodes.insert(node)
    }

    fn remove_node(&mut self, node_key: Self::NodeKeyType) -> Option<Self::NodeType> {
        self.nodes.remove(node_key)
    }
}

pub struct PreorderIter<'a, T, const K: usize>
where
    T: Payload,
{
    tree: &'a NTree<T, K>,
    pending_node_keys: Vec<NodeKey>,
}

impl<'a, T, const K: usize> Iterator for PreorderIter<'a, T, K>
where
    T: Payload,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let node_key = self.pending_node_keys.pop()?;
        let node = tree.get_node_unchecked(node_key);
        self.pending_node_keys.extend(node.children().iter().rev().flatten());
        Some(&node.payload)
    }
}
