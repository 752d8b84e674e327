//! [`Grid`] as a search graph: orthogonal moves, unit cost, Manhattan
//! estimate.

use pathviz_core::{Grid, Point, Range};

use crate::distance::manhattan;
use crate::traits::{AstarPather, Pather, WeightedPather};

impl Pather for Grid {
    fn bounds(&self) -> Range {
        Grid::bounds(self)
    }

    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(Grid::neighbors(self, p));
    }
}

impl WeightedPather for Grid {
    #[inline]
    fn cost(&self, _from: Point, _to: Point) -> i32 {
        1
    }
}

impl AstarPather for Grid {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> i32 {
        manhattan(from, to)
    }
}
