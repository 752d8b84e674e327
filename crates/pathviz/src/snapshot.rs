//! Render-ready copies of the controller state.

use pathviz_core::{CellState, Point, Range};
use pathviz_search::SearchState;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    /// Row-major cell states, `width * height` long.
    pub cells: Vec<CellState>,
    pub state: SearchState,
    /// Nodes expanded so far in the current run.
    pub expanded: usize,
    /// The path of a successful run, empty otherwise.
    pub path: Vec<Point>,
}

impl Snapshot {
    /// State of the cell at `p`, or `None` outside the frame.
    pub fn at(&self, p: Point) -> Option<CellState> {
        Range::new(0, 0, self.width, self.height)
            .index(p)
            .and_then(|i| self.cells.get(i).copied())
    }

    /// Cells grouped by row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> + '_ {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Count cells equal to `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }
}
