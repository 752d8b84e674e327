//! The [`Grid`] type: the editable substrate a search runs over.
//!
//! A `Grid` is a plain owned value: a row-major buffer of [`CellState`]s
//! plus the positions of the two endpoints. Editing keeps the endpoint
//! invariant (at most one start, at most one end, never on an obstacle,
//! never on the same cell). Search annotations share the buffer but never
//! replace authored obstacles or endpoints.

use crate::cell::CellState;
use crate::error::GridError;
use crate::geom::{Point, Range};

/// A rectangular grid of [`CellState`]s with optional start and end cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    bounds: Range,
    cells: Vec<CellState>,
    start: Option<Point>,
    end: Option<Point>,
}

#[derive(Copy, Clone)]
enum Endpoint {
    Start,
    End,
}

impl Grid {
    /// Create an all-empty grid.
    ///
    /// Fails with [`GridError::InvalidDimensions`] for non-positive sizes and
    /// for sizes whose cell buffer cannot be allocated.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| invalid.clone())?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| invalid)?;
        cells.resize(len, CellState::Empty);
        Ok(Self {
            bounds: Range::new(0, 0, width, height),
            cells,
            start: None,
            end: None,
        })
    }

    /// The bounding range of the grid, anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (i32, i32) {
        (self.bounds.width(), self.bounds.height())
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Current start cell, if any.
    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    /// Current end cell, if any.
    #[inline]
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    #[inline]
    fn idx(&self, p: Point) -> Result<usize, GridError> {
        self.bounds.index(p).ok_or(GridError::OutOfBounds(p))
    }

    /// State of the cell at `p`.
    pub fn cell_state(&self, p: Point) -> Result<CellState, GridError> {
        Ok(self.cells[self.idx(p)?])
    }

    /// State of the cell at `p`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, p: Point) -> Option<CellState> {
        self.bounds.index(p).map(|i| self.cells[i])
    }

    /// Whether a search may enter `p`: inside the grid and not an obstacle.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.get(p).is_some_and(CellState::is_passable)
    }

    /// Row-major cell buffer.
    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Place an obstacle. Endpoints are left untouched.
    pub fn set_obstacle(&mut self, p: Point) -> Result<(), GridError> {
        let i = self.idx(p)?;
        if !self.cells[i].is_endpoint() {
            self.cells[i] = CellState::Obstacle;
        }
        Ok(())
    }

    /// Remove an obstacle. Anything other than an obstacle is left untouched.
    pub fn clear_obstacle(&mut self, p: Point) -> Result<(), GridError> {
        let i = self.idx(p)?;
        if self.cells[i] == CellState::Obstacle {
            self.cells[i] = CellState::Empty;
        }
        Ok(())
    }

    /// Place or move the start cell.
    pub fn set_start(&mut self, p: Point) -> Result<(), GridError> {
        self.set_endpoint(p, Endpoint::Start)
    }

    /// Place or move the end cell.
    pub fn set_end(&mut self, p: Point) -> Result<(), GridError> {
        self.set_endpoint(p, Endpoint::End)
    }

    fn set_endpoint(&mut self, p: Point, which: Endpoint) -> Result<(), GridError> {
        let i = self.idx(p)?;
        if self.cells[i] == CellState::Obstacle {
            return Err(GridError::OccupiedByObstacle(p));
        }
        let (slot, other, state) = match which {
            Endpoint::Start => (&mut self.start, &mut self.end, CellState::Start),
            Endpoint::End => (&mut self.end, &mut self.start, CellState::End),
        };
        if let Some(old) = slot.replace(p) {
            if old != p {
                if let Some(j) = self.bounds.index(old) {
                    self.cells[j] = CellState::Empty;
                }
            }
        }
        // Taking over the other endpoint's cell unsets it.
        if *other == Some(p) {
            *other = None;
        }
        self.cells[i] = state;
        Ok(())
    }

    /// Unset the start cell, returning it to empty.
    pub fn clear_start(&mut self) {
        if let Some(p) = self.start.take() {
            if let Some(i) = self.bounds.index(p) {
                self.cells[i] = CellState::Empty;
            }
        }
    }

    /// Unset the end cell, returning it to empty.
    pub fn clear_end(&mut self) {
        if let Some(p) = self.end.take() {
            if let Some(i) = self.bounds.index(p) {
                self.cells[i] = CellState::Empty;
            }
        }
    }

    /// Return whatever the user placed at `p` (obstacle or endpoint) to empty.
    pub fn erase(&mut self, p: Point) -> Result<(), GridError> {
        let i = self.idx(p)?;
        match self.cells[i] {
            CellState::Start => self.start = None,
            CellState::End => self.end = None,
            _ => {}
        }
        self.cells[i] = CellState::Empty;
        Ok(())
    }

    /// Clear every cell back to empty and unset both endpoints.
    pub fn reset(&mut self) {
        self.cells.fill(CellState::Empty);
        self.start = None;
        self.end = None;
    }

    // -----------------------------------------------------------------------
    // Search support
    // -----------------------------------------------------------------------

    /// Passable orthogonal neighbours of `p` in the order up, right, down,
    /// left.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        p.neighbors_4()
            .into_iter()
            .filter(move |&n| self.is_passable(n))
    }

    /// Layer a search annotation onto `p`.
    ///
    /// Annotations never cover obstacles or endpoints, `Frontier` never
    /// covers `Visited`, and `Path` covers both. Returns whether the cell
    /// changed. Non-annotation states are ignored.
    pub fn annotate(&mut self, p: Point, state: CellState) -> Result<bool, GridError> {
        let i = self.idx(p)?;
        let cur = self.cells[i];
        if !state.is_annotation() || cur.authored() != CellState::Empty {
            return Ok(false);
        }
        let apply = match state {
            CellState::Frontier => !matches!(cur, CellState::Visited | CellState::Path),
            CellState::Visited => cur != CellState::Path,
            _ => true,
        };
        if apply && cur != state {
            self.cells[i] = state;
            return Ok(true);
        }
        Ok(false)
    }

    /// Wipe every search annotation, keeping authored cells.
    pub fn clear_annotations(&mut self) {
        for c in &mut self.cells {
            *c = c.authored();
        }
    }

    /// Count cells equal to `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Row-major iterator over `(Point, CellState)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellState)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }
}
