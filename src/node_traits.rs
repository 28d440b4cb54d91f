use std::io;

use crate::{Key, NodeKey};

/// Capabilities a tree needs from the values it stores.
///
/// The tree never looks inside a payload. It asks for the key when searching,
/// clones on the way in and out (through [`Clone`]), prints through
/// [`Payload::print`] and hands the owned value back through
/// [`Payload::release`] when the node holding it is torn down.
pub trait Payload: Clone {
    fn key(&self) -> Key;

    /// Renders this payload. `children` holds the payloads of the node's
    /// immediate children in slot order, `None` for empty slots.
    fn print(&self, children: &[Option<&Self>], out: &mut dyn io::Write) -> io::Result<()>;

    fn release(self) {}
}

pub trait ChildBehaviour<const K: usize> {
    fn set_parent(&mut self, node_key: NodeKey);

    fn get_parent(&self) -> Option<NodeKey>;

    fn children(&self) -> &[Option<NodeKey>; K];

    fn child_count(&self) -> usize;

    fn has_children(&self) -> bool {
        self.child_count() > 0
    }

    /// True while at least one child slot is free.
    fn is_active(&self) -> bool {
        self.child_count() < K
    }

    fn first_free_slot(&self) -> Option<usize> {
        self.children().iter().position(Option::is_none)
    }

    fn occupied_children(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.children().iter().flatten().copied()
    }

    fn set_child(&mut self, slot: usize, child: NodeKey);

    fn clear_child(&mut self, slot: usize) -> Option<NodeKey>;
}

/// Axis-aligned half-open box `[min, max)` on every axis.
pub trait Boundary<const D: usize> {
    fn min(&self) -> [f64; D];
    fn max(&self) -> [f64; D];

    fn contains_point(&self, pos: [f64; D]) -> bool {
        pos.iter()
            .zip(self.min().iter().zip(self.max().iter()))
            .all(|(p, (lo, hi))| *lo <= *p && *p < *hi)
    }

    fn midpoint(&self) -> [f64; D] {
        let (min, max) = (self.min(), self.max());
        let mut mid = [0.0; D];
        for i in 0..D {
            mid[i] = min[i] + (max[i] - min[i]) / 2.0;
        }
        mid
    }

    /// Bounds of the sub-box obtained by splitting at the midpoint on every
    /// axis and keeping the half that holds `pos`. Points below the midpoint
    /// go to the lower half, everything else to the upper half.
    fn sub_bounds_containing(&self, pos: [f64; D]) -> ([f64; D], [f64; D]) {
        let mid = self.midpoint();
        let mut min = self.min();
        let mut max = self.max();
        for i in 0..D {
            if pos[i] < mid[i] {
                max[i] = mid[i];
            } else {
                min[i] = mid[i];
            }
        }
        (min, max)
    }
}
