use std::io;

use crate::{error::TreeError, node_traits::*, ntree::NTree, partition_cell::PartitionCell, Key};
use tracing::{debug, trace, warn};

/// Children per partition cell.
pub const QUAD: usize = 4;

/// Key of the root cell, whatever the partition's history.
pub const ROOT_KEY: Key = 0;

pub type PartitionTree = NTree<PartitionCell, QUAD>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionConfig {
    pub x_left: f64,
    pub x_right: f64,
    pub y_bot: f64,
    pub y_top: f64,
    /// Deepest level a refinement may create. `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            x_left: 0.0,
            x_right: 1.0,
            y_bot: 0.0,
            y_top: 1.0,
            max_depth: None,
        }
    }
}

impl PartitionConfig {
    pub fn with_bounds(mut self, x_left: f64, x_right: f64, y_bot: f64, y_top: f64) -> Self {
        self.x_left = x_left;
        self.x_right = x_right;
        self.y_bot = y_bot;
        self.y_top = y_top;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    fn root_cell(&self) -> PartitionCell {
        PartitionCell::new(self.x_left, self.x_right, self.y_bot, self.y_top, ROOT_KEY)
    }

    fn validate(&self) -> Result<(), TreeError> {
        let finite = [self.x_left, self.x_right, self.y_bot, self.y_top]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(TreeError::InvalidArgument("partition bounds must be finite"));
        }
        if self.x_left >= self.x_right || self.y_bot >= self.y_top {
            return Err(TreeError::InvalidArgument("partition bounds must not be empty"));
        }
        Ok(())
    }
}

/// Source of cell keys. Counts up from [`ROOT_KEY`] and never hands out the
/// same key twice for the lifetime of the generator.
///
/// Each [`Partition`] owns its own generator, so two separate handles both
/// start again at key 1.
#[derive(Debug, Default)]
pub struct KeyGenerator {
    last: Key,
}

impl KeyGenerator {
    pub fn next_key(&mut self) -> Key {
        self.last += 1;
        self.last
    }

    pub fn last_issued(&self) -> Key {
        self.last
    }
}

/// Lazily refined quadtree decomposition of a rectangle, the unit square by
/// default.
///
/// This is a single-owner handle: every mutation takes `&mut self`. The key
/// generator belongs to the handle and survives [`Partition::init`], so keys
/// of an earlier partition are never reissued by the same handle.
pub struct Partition {
    tree: PartitionTree,
    keys: KeyGenerator,
    config: PartitionConfig,
}

impl Default for Partition {
    fn default() -> Self {
        Self::new()
    }
}

impl Partition {
    /// Partition of the unit square holding only the root cell.
    pub fn new() -> Self {
        Self::from_checked_config(PartitionConfig::default())
    }

    pub fn with_config(config: PartitionConfig) -> Result<Self, TreeError> {
        if let Err(e) = config.validate() {
            warn!(?config, error = %e, "rejected partition config");
            return Err(e);
        }
        Ok(Self::from_checked_config(config))
    }

    fn from_checked_config(config: PartitionConfig) -> Self {
        let mut partition = Self {
            tree: PartitionTree::new(),
            keys: KeyGenerator::default(),
            config,
        };
        partition.init();
        partition
    }

    /// Throws away every cell and starts over from a single root cell.
    pub fn init(&mut self) {
        self.tree.destroy();
        self.tree.plant_root(&self.config.root_cell());
        debug!(last_key = self.keys.last_issued(), "partition initialised");
    }

    /// Tears the partition down. Refinement fails with
    /// [`TreeError::EmptyTree`] until the next [`Partition::init`].
    pub fn destroy(&mut self) {
        self.tree.destroy();
    }

    /// Refines the partition one level towards `(x, y)`.
    ///
    /// Walks down through existing cells containing the point. At the first
    /// cell lacking a child for the point's quadrant, creates that quadrant
    /// and returns its key. Points outside the root bounds, and refinements
    /// past `max_depth`, leave the partition untouched and return `Ok(None)`.
    pub fn refine_cell(&mut self, x: f64, y: f64) -> Result<Option<Key>, TreeError> {
        if !self.config.root_cell().contains_point([x, y]) {
            trace!(x, y, "refinement outside the partition ignored");
            return Ok(None);
        }

        let (frontier, depth) = self.descend(x, y)?;
        if self.config.max_depth.is_some_and(|max| depth >= max) {
            trace!(x, y, depth, "refinement depth limit reached");
            return Ok(None);
        }

        let key = self.keys.next_key();
        let cell = frontier.quadrant_of(x, y, key);
        self.tree.add_leaf(frontier.key, &cell)?;
        debug!(x, y, parent = frontier.key, key, depth = depth + 1, "refined cell");
        Ok(Some(key))
    }

    /// Deepest existing cell containing `(x, y)`.
    pub fn locate(&self, x: f64, y: f64) -> Option<PartitionCell> {
        if !self.config.root_cell().contains_point([x, y]) {
            return None;
        }
        self.descend(x, y).ok().map(|(cell, _)| cell)
    }

    /// Follows existing children containing `(x, y)` from the root, returning
    /// the last cell reached and its depth.
    fn descend(&self, x: f64, y: f64) -> Result<(PartitionCell, usize), TreeError> {
        let mut current = self.tree.get_root()?;
        let mut depth = 0;
        loop {
            let next = self
                .tree
                .get_children(current.key)?
                .into_iter()
                .flatten()
                .find(|child| child.contains_point([x, y]));
            match next {
                Some(child) => {
                    trace!(from = current.key, to = child.key, "descending");
                    current = child;
                    depth += 1;
                }
                None => return Ok((current, depth)),
            }
        }
    }

    pub fn print(&self) -> io::Result<()> {
        self.tree.print()
    }

    pub fn print_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.tree.print_to(out)
    }

    pub fn count(&self) -> usize {
        self.tree.count()
    }

    pub fn depth(&self) -> usize {
        self.tree.height()
    }

    pub fn root_key(&self) -> Key {
        ROOT_KEY
    }

    pub fn cell(&self, key: Key) -> Result<PartitionCell, TreeError> {
        self.tree.get_node(key)
    }

    pub fn children(&self, key: Key) -> Result<Vec<Option<PartitionCell>>, TreeError> {
        self.tree.get_children(key)
    }

    /// Cells without children, ordered by key.
    pub fn leaf_cells(&self) -> Vec<PartitionCell> {
        let mut leaves: Vec<PartitionCell> =
            self.tree.iter_leaf_nodes().map(|(_, cell)| *cell).collect();
        leaves.sort_by_key(|cell| cell.key);
        leaves
    }

    pub fn last_issued_key(&self) -> Key {
        self.keys.last_issued()
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }
}
