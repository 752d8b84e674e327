use pathviz_core::{Point, Range};

/// Minimal search interface: bounds and neighbor enumeration.
pub trait Pather {
    /// Rectangle every searchable point lies in.
    fn bounds(&self) -> Range;

    /// Append neighbors of `p` into `buf`, in a deterministic order. The
    /// caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> i32;
}

/// Full A* pather with a heuristic.
pub trait AstarPather: WeightedPather {
    /// Estimate of the distance from `from` to `to`.
    /// Must never overestimate the true cost (admissible).
    fn estimate(&self, from: Point, to: Point) -> i32;
}
