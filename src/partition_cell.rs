use std::io;

use crate::{node_traits::*, Key};

/// A rectangle `[x_left, x_right) × [y_bot, y_top)` of the partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionCell {
    pub x_left: f64,
    pub x_right: f64,
    pub y_bot: f64,
    pub y_top: f64,
    pub key: Key,
}

impl PartitionCell {
    pub fn new(x_left: f64, x_right: f64, y_bot: f64, y_top: f64, key: Key) -> Self {
        Self {
            x_left,
            x_right,
            y_bot,
            y_top,
            key,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_right - self.x_left
    }

    pub fn height(&self) -> f64 {
        self.y_top - self.y_bot
    }

    /// The quadrant of this cell holding `(x, y)`, carrying `key`.
    pub fn quadrant_of(&self, x: f64, y: f64, key: Key) -> Self {
        let (min, max) = self.sub_bounds_containing([x, y]);
        Self::new(min[0], max[0], min[1], max[1], key)
    }

    fn write_bounds(&self, out: &mut dyn io::Write) -> io::Result<()> {
        write!(
            out,
            "([{:.6}, {:.6}], [{:.6}, {:.6}])",
            self.x_left, self.x_right, self.y_bot, self.y_top
        )
    }
}

impl Boundary<2> for PartitionCell {
    fn min(&self) -> [f64; 2] {
        [self.x_left, self.y_bot]
    }

    fn max(&self) -> [f64; 2] {
        [self.x_right, self.y_top]
    }
}

impl Payload for PartitionCell {
    fn key(&self) -> Key {
        self.key
    }

    /// One line: the cell's bounds followed by `\` and the bounds of each
    /// existing child.
    fn print(&self, children: &[Option<&Self>], out: &mut dyn io::Write) -> io::Result<()> {
        self.write_bounds(out)?;
        for child in children.iter().flatten() {
            write!(out, "\\")?;
            child.write_bounds(out)?;
        }
        writeln!(out)
    }
}
