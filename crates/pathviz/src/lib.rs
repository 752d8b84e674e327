//! Stepwise A* pathfinding visualization.
//!
//! `pathviz` ties an editable [`Grid`] to a stepwise search [`Engine`] behind
//! one [`VisualizationController`]. A front end edits the grid, starts a run,
//! and either advances it frame by frame or solves it at once; every
//! [`StepEvent`] is folded into the grid as a cell annotation, so drawing a
//! frame is a matter of reading [`VisualizationController::snapshot`].
//!
//! ```
//! use pathviz::{CellState, Point, SearchState, VisualizationController};
//!
//! let mut c = VisualizationController::new(5, 5)?;
//! c.set_start(Point::from_row_col(0, 0))?;
//! c.set_end(Point::from_row_col(4, 4))?;
//! for row in 0..4 {
//!     c.set_obstacle(Point::from_row_col(row, 2))?;
//! }
//!
//! c.run_animated()?;
//! while c.current_state() == SearchState::Running {
//!     c.step()?;
//! }
//! assert_eq!(c.path().map(<[Point]>::len), Some(9));
//! assert_eq!(c.cell_state(Point::from_row_col(4, 2))?, CellState::Path);
//! # Ok::<(), pathviz::Error>(())
//! ```

mod controller;
mod error;
mod snapshot;

pub use controller::{Listener, VisualizationController};
pub use error::Error;
pub use snapshot::Snapshot;

pub use pathviz_core::{CellState, Grid, GridError, Point, Range};
pub use pathviz_search::{
    Engine, SearchError, SearchNode, SearchState, StepEvent, TraceDecoder, TraceEncoder,
    encode_trace,
};
