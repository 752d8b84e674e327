//! The [`VisualizationController`], the one object a front end talks to.
//!
//! It owns an editable [`Grid`] and an [`Engine`], rejects edits while a run
//! is in progress, and turns every [`StepEvent`] into cell annotations that a
//! renderer can draw. Animation cadence is up to the caller: start a run with
//! [`run_animated`](VisualizationController::run_animated) and call
//! [`step`](VisualizationController::step) from a timer or frame callback,
//! or solve in one go with
//! [`run_instant`](VisualizationController::run_instant).

use pathviz_core::{CellState, Grid, GridError, Point, scatter_obstacles};
use pathviz_search::{Engine, SearchError, SearchState, StepEvent};
use rand::Rng;

use crate::error::Error;
use crate::snapshot::Snapshot;

/// Callback invoked for every event a run produces.
pub type Listener = Box<dyn FnMut(&StepEvent)>;

/// Façade over a [`Grid`] and the [`Engine`] searching it.
pub struct VisualizationController {
    grid: Grid,
    engine: Engine,
    listeners: Vec<Listener>,
}

impl VisualizationController {
    /// Create a controller over an empty `width × height` grid.
    pub fn new(width: i32, height: i32) -> Result<Self, Error> {
        Ok(Self::with_grid(Grid::new(width, height)?))
    }

    /// Take over an existing grid. Stale annotations are dropped.
    pub fn with_grid(mut grid: Grid) -> Self {
        grid.clear_annotations();
        Self {
            grid,
            engine: Engine::new(),
            listeners: Vec::new(),
        }
    }

    /// The grid, annotations included.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The engine, for inspecting per-node costs of the current run.
    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// State of the cell at `p`.
    pub fn cell_state(&self, p: Point) -> Result<CellState, Error> {
        Ok(self.grid.cell_state(p)?)
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (i32, i32) {
        self.grid.dimensions()
    }

    /// Lifecycle state of the current run.
    #[inline]
    pub fn current_state(&self) -> SearchState {
        self.engine.state()
    }

    /// The path of a successful run.
    pub fn path(&self) -> Option<&[Point]> {
        self.engine.path()
    }

    /// Copy of everything a renderer needs for one frame.
    pub fn snapshot(&self) -> Snapshot {
        let (width, height) = self.grid.dimensions();
        Snapshot {
            width,
            height,
            cells: self.grid.cells().to_vec(),
            state: self.engine.state(),
            expanded: self.engine.expanded(),
            path: self.engine.path().map(<[Point]>::to_vec).unwrap_or_default(),
        }
    }

    /// Register a callback that receives every applied event, in order.
    pub fn subscribe(&mut self, listener: impl FnMut(&StepEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Run an edit against the grid unless a search is in progress. A
    /// successful edit after a finished run drops that run and its
    /// annotations.
    fn edit<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Grid) -> Result<T, GridError>,
    ) -> Result<T, Error> {
        let state = self.engine.state();
        if state == SearchState::Running {
            log::debug!("rejected {op}: search is running");
            return Err(SearchError::InvalidState { op, state }.into());
        }
        let out = f(&mut self.grid)?;
        if state.is_terminal() {
            self.engine.reset();
            self.grid.clear_annotations();
        }
        Ok(out)
    }

    pub fn set_obstacle(&mut self, p: Point) -> Result<(), Error> {
        self.edit("place obstacle", |g| g.set_obstacle(p))
    }

    pub fn clear_obstacle(&mut self, p: Point) -> Result<(), Error> {
        self.edit("clear obstacle", |g| g.clear_obstacle(p))
    }

    pub fn set_start(&mut self, p: Point) -> Result<(), Error> {
        self.edit("set start", |g| g.set_start(p))
    }

    pub fn set_end(&mut self, p: Point) -> Result<(), Error> {
        self.edit("set end", |g| g.set_end(p))
    }

    pub fn clear_start(&mut self) -> Result<(), Error> {
        self.edit("clear start", |g| {
            g.clear_start();
            Ok(())
        })
    }

    pub fn clear_end(&mut self) -> Result<(), Error> {
        self.edit("clear end", |g| {
            g.clear_end();
            Ok(())
        })
    }

    /// Return the obstacle or endpoint at `p` to empty.
    pub fn erase(&mut self, p: Point) -> Result<(), Error> {
        self.edit("erase", |g| g.erase(p))
    }

    /// Randomly fill empty cells with obstacles. Returns how many were placed.
    pub fn scatter_obstacles(&mut self, rng: &mut impl Rng, density: f64) -> Result<usize, Error> {
        self.edit("scatter obstacles", |g| Ok(scatter_obstacles(g, rng, density)))
    }

    /// Drop the annotations of a finished run, keeping the layout.
    pub fn clear_search(&mut self) -> Result<(), Error> {
        self.edit("clear search", |_| Ok(()))?;
        self.grid.clear_annotations();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Run control
    // -----------------------------------------------------------------------

    fn begin(&mut self) -> Result<(), Error> {
        self.engine.start(&self.grid)?;
        self.grid.clear_annotations();
        log::debug!("run started on {}x{} grid", self.grid.width(), self.grid.height());
        Ok(())
    }

    /// Start a run that the caller advances with [`step`](Self::step).
    pub fn run_animated(&mut self) -> Result<(), Error> {
        self.begin()
    }

    /// Advance the active run by one expansion, apply its events and return
    /// them.
    pub fn step(&mut self) -> Result<&[StepEvent], Error> {
        let events = self.engine.step(&self.grid)?;
        for e in events {
            dispatch(&mut self.grid, &mut self.listeners, e)?;
        }
        Ok(events)
    }

    /// Finish the active run at once, returning the events it still had.
    pub fn finish(&mut self) -> Result<Vec<StepEvent>, Error> {
        let events = self.engine.run_to_completion(&self.grid)?;
        for e in &events {
            dispatch(&mut self.grid, &mut self.listeners, e)?;
        }
        Ok(events)
    }

    /// Solve from scratch without animation, returning the full event
    /// sequence.
    pub fn run_instant(&mut self) -> Result<Vec<StepEvent>, Error> {
        self.begin()?;
        self.finish()
    }

    /// Abandon the active run and wipe its annotations.
    pub fn cancel(&mut self) -> Result<(), Error> {
        self.engine.cancel()?;
        self.grid.clear_annotations();
        Ok(())
    }

    /// Cancel any run and clear the grid completely. Safe to repeat.
    pub fn reset(&mut self) {
        if self.engine.is_running() {
            log::debug!("reset cancels the active run");
        }
        self.engine.reset();
        self.grid.reset();
    }
}

/// Apply one event to the grid's annotation layer, then notify listeners.
fn dispatch(grid: &mut Grid, listeners: &mut [Listener], event: &StepEvent) -> Result<(), Error> {
    match event {
        StepEvent::NodeExpanded(p) => {
            grid.annotate(*p, CellState::Visited)?;
        }
        StepEvent::NodeDiscovered { pos, .. } | StepEvent::NodeUpdated { pos, .. } => {
            grid.annotate(*pos, CellState::Frontier)?;
        }
        StepEvent::SearchSucceeded(path) => {
            for &p in path {
                grid.annotate(p, CellState::Path)?;
            }
        }
        StepEvent::SearchFailed => {}
    }
    for l in listeners.iter_mut() {
        l(event);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_search::{encode_trace, manhattan};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn controller(layout: &str) -> VisualizationController {
        VisualizationController::with_grid(Grid::from_layout(layout).unwrap())
    }

    fn is_invalid_state(err: &Error) -> bool {
        matches!(err, Error::Search(SearchError::InvalidState { .. }))
    }

    #[test]
    fn new_rejects_bad_dimensions() {
        assert!(matches!(
            VisualizationController::new(0, 3),
            Err(Error::Grid(GridError::InvalidDimensions { .. }))
        ));
        assert!(matches!(
            VisualizationController::new(i32::MAX, i32::MAX),
            Err(Error::Grid(GridError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn open_grid_path_matches_manhattan() {
        for (w, h, s, e) in [
            (6, 4, p(0, 0), p(5, 3)),
            (5, 5, p(4, 0), p(0, 4)),
            (9, 2, p(3, 1), p(8, 0)),
            (1, 7, p(0, 6), p(0, 0)),
        ] {
            let mut c = VisualizationController::new(w, h).unwrap();
            c.set_start(s).unwrap();
            c.set_end(e).unwrap();
            let events = c.run_instant().unwrap();
            let Some(StepEvent::SearchSucceeded(path)) = events.last() else {
                panic!("expected success, got {:?}", events.last());
            };
            assert_eq!(path.len() as i32 - 1, manhattan(s, e));
            assert_eq!(c.current_state(), SearchState::Succeeded);
        }
    }

    #[test]
    fn walled_off_goal_fails() {
        let mut c = controller(
            "\
S..#...
...#...
...#..E
...#...",
        );
        let events = c.run_instant().unwrap();
        assert_eq!(events.last(), Some(&StepEvent::SearchFailed));
        assert_eq!(c.current_state(), SearchState::Failed);
        assert_eq!(c.engine().frontier_len(), 0);
        assert!(events.iter().all(|e| e.pos() != Some(p(6, 2))));
        assert_eq!(c.path(), None);
        // Everything left of the wall was explored.
        assert_eq!(c.grid().count(CellState::Visited), 11);
        assert_eq!(c.grid().count(CellState::Path), 0);
    }

    #[test]
    fn wall_with_gap_scenario() {
        let mut c = VisualizationController::new(5, 5).unwrap();
        c.set_start(Point::from_row_col(0, 0)).unwrap();
        c.set_end(Point::from_row_col(4, 4)).unwrap();
        for row in 0..4 {
            c.set_obstacle(Point::from_row_col(row, 2)).unwrap();
        }
        c.run_instant().unwrap();
        let path = c.path().unwrap().to_vec();
        assert_eq!(path.len() - 1, 8);
        assert!(path.contains(&Point::from_row_col(4, 2)));
        assert_eq!(c.cell_state(Point::from_row_col(4, 2)), Ok(CellState::Path));
        assert_eq!(c.cell_state(Point::from_row_col(0, 0)), Ok(CellState::Start));
        assert_eq!(c.cell_state(Point::from_row_col(4, 4)), Ok(CellState::End));
    }

    #[test]
    fn adjacent_endpoints() {
        let mut c = controller("SE.");
        let events = c.run_instant().unwrap();
        let expansions = events
            .iter()
            .filter(|e| matches!(e, StepEvent::NodeExpanded(_)))
            .count();
        assert_eq!(expansions, 2);
        assert_eq!(c.path(), Some(&[p(0, 0), p(1, 0)][..]));
    }

    #[test]
    fn reset_twice_is_identical() {
        let mut c = controller("S.#\n...\n#.E");
        c.run_instant().unwrap();
        c.reset();
        let once = c.snapshot();
        c.reset();
        assert_eq!(c.snapshot(), once);
        assert_eq!(once.count(CellState::Empty), 9);
        assert_eq!(once.state, SearchState::Idle);
        assert_eq!(c.grid().start(), None);
    }

    #[test]
    fn instant_runs_are_deterministic() {
        let mut c = controller(
            "\
S.....#...
.####.#.#.
.#....#.#.
.#.####.#.
.#......#E",
        );
        let first = c.run_instant().unwrap();
        let frame = c.snapshot();
        let second = c.run_instant().unwrap();
        assert_eq!(first, second);
        assert_eq!(encode_trace(&first).unwrap(), encode_trace(&second).unwrap());
        assert_eq!(c.snapshot(), frame);
    }

    #[test]
    fn moving_start_leaves_one_start() {
        let mut c = VisualizationController::new(4, 4).unwrap();
        c.set_start(p(0, 0)).unwrap();
        c.set_start(p(2, 3)).unwrap();
        assert_eq!(c.cell_state(p(0, 0)), Ok(CellState::Empty));
        assert_eq!(c.cell_state(p(2, 3)), Ok(CellState::Start));
        assert_eq!(c.snapshot().count(CellState::Start), 1);
    }

    #[test]
    fn step_while_idle_is_invalid() {
        let mut c = controller("S.E");
        let err = c.step().unwrap_err();
        assert!(is_invalid_state(&err));
    }

    #[test]
    fn edits_rejected_while_running() {
        let mut c = controller("S..\n...\n..E");
        c.run_animated().unwrap();
        assert_eq!(c.current_state(), SearchState::Running);

        let before = c.snapshot();
        assert!(is_invalid_state(&c.set_obstacle(p(1, 1)).unwrap_err()));
        assert!(is_invalid_state(&c.set_start(p(1, 1)).unwrap_err()));
        assert!(is_invalid_state(&c.erase(p(0, 0)).unwrap_err()));
        assert!(is_invalid_state(&c.run_animated().unwrap_err()));
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn run_requires_endpoints() {
        let mut c = VisualizationController::new(3, 3).unwrap();
        assert_eq!(
            c.run_instant().unwrap_err(),
            Error::Search(SearchError::MissingStart)
        );
        c.set_start(p(0, 0)).unwrap();
        assert_eq!(
            c.run_animated().unwrap_err(),
            Error::Search(SearchError::MissingEnd)
        );
        assert_eq!(c.current_state(), SearchState::Idle);
    }

    #[test]
    fn animated_steps_annotate_cells() {
        let mut c = controller("...\n.S.\n..E");
        c.run_animated().unwrap();
        let events = c.step().unwrap().to_vec();
        assert_eq!(events.len(), 5);
        assert_eq!(c.cell_state(p(1, 1)), Ok(CellState::Start));
        for n in [p(1, 0), p(2, 1), p(1, 2), p(0, 1)] {
            assert_eq!(c.cell_state(n), Ok(CellState::Frontier));
        }

        let mut steps = 1;
        while c.current_state() == SearchState::Running {
            c.step().unwrap();
            steps += 1;
        }
        assert_eq!(c.current_state(), SearchState::Succeeded);
        assert!(steps >= 3);
        let path = c.path().unwrap().to_vec();
        for &q in &path[1..path.len() - 1] {
            assert_eq!(c.cell_state(q), Ok(CellState::Path));
        }
        assert!(c.snapshot().count(CellState::Frontier) + c.snapshot().count(CellState::Visited) > 0);
    }

    #[test]
    fn animated_and_instant_traces_agree() {
        let layout = "S..#\n.#..\n...#\n#..E";
        let mut instant = controller(layout);
        let expected = instant.run_instant().unwrap();

        let mut animated = controller(layout);
        animated.run_animated().unwrap();
        let mut got = Vec::new();
        while animated.current_state() == SearchState::Running {
            got.extend_from_slice(animated.step().unwrap());
        }
        assert_eq!(got, expected);
        assert_eq!(animated.snapshot(), instant.snapshot());
    }

    #[test]
    fn finish_completes_animated_run() {
        let mut c = controller("S...\n....\n...E");
        let expected = controller("S...\n....\n...E").run_instant().unwrap();
        c.run_animated().unwrap();
        let mut got = c.step().unwrap().to_vec();
        got.extend(c.finish().unwrap());
        assert_eq!(got, expected);
        assert!(is_invalid_state(&c.finish().unwrap_err()));
    }

    #[test]
    fn cancel_clears_annotations() {
        let mut c = controller("S...\n....\n...E");
        assert!(is_invalid_state(&c.cancel().unwrap_err()));
        c.run_animated().unwrap();
        c.step().unwrap();
        c.step().unwrap();
        c.cancel().unwrap();
        assert_eq!(c.current_state(), SearchState::Idle);
        assert_eq!(c.grid().count(CellState::Visited), 0);
        assert_eq!(c.grid().count(CellState::Frontier), 0);
        assert_eq!(c.grid().start(), Some(p(0, 0)));
        // Edits are accepted again.
        c.set_obstacle(p(1, 1)).unwrap();
    }

    #[test]
    fn reset_cancels_active_run() {
        let mut c = controller("S..\n...\n..E");
        c.run_animated().unwrap();
        c.step().unwrap();
        c.reset();
        assert_eq!(c.current_state(), SearchState::Idle);
        assert_eq!(c.grid(), &Grid::new(3, 3).unwrap());
    }

    #[test]
    fn edit_after_finished_run_drops_annotations() {
        let mut c = controller("S..\n...\n..E");
        c.run_instant().unwrap();
        assert!(c.grid().count(CellState::Path) > 0);

        // A failing edit leaves the finished run alone.
        assert!(c.set_obstacle(p(5, 5)).is_err());
        assert_eq!(c.current_state(), SearchState::Succeeded);

        c.set_obstacle(p(1, 1)).unwrap();
        assert_eq!(c.current_state(), SearchState::Idle);
        assert_eq!(c.grid().count(CellState::Path), 0);
        assert_eq!(c.grid().count(CellState::Visited), 0);
        assert_eq!(c.cell_state(p(1, 1)), Ok(CellState::Obstacle));
    }

    #[test]
    fn clear_search_keeps_layout() {
        let mut c = controller("S#.\n...\n..E");
        c.run_instant().unwrap();
        c.clear_search().unwrap();
        assert_eq!(c.current_state(), SearchState::Idle);
        assert_eq!(c.grid().to_string(), "S#.\n...\n..E");
    }

    #[test]
    fn listeners_see_every_event() {
        let mut c = controller("S.#\n...\n#.E");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        c.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let events = c.run_instant().unwrap();
        assert_eq!(*seen.borrow(), events);

        seen.borrow_mut().clear();
        c.run_animated().unwrap();
        let first = c.step().unwrap().to_vec();
        assert_eq!(*seen.borrow(), first);
    }

    #[test]
    fn scatter_respects_endpoints_and_state() {
        let mut c = VisualizationController::new(10, 10).unwrap();
        c.set_start(p(0, 0)).unwrap();
        c.set_end(p(9, 9)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let placed = c.scatter_obstacles(&mut rng, 0.25).unwrap();
        assert_eq!(c.grid().count(CellState::Obstacle), placed);
        assert_eq!(c.cell_state(p(0, 0)), Ok(CellState::Start));
        assert_eq!(c.cell_state(p(9, 9)), Ok(CellState::End));

        c.run_animated().unwrap();
        assert!(is_invalid_state(
            &c.scatter_obstacles(&mut rng, 0.5).unwrap_err()
        ));
    }

    #[test]
    fn snapshot_reflects_grid() {
        let mut c = controller("S#\n.E");
        c.run_instant().unwrap();
        let snap = c.snapshot();
        assert_eq!((snap.width, snap.height), (2, 2));
        assert_eq!(snap.at(p(1, 0)), Some(CellState::Obstacle));
        assert_eq!(snap.at(p(0, 1)), Some(CellState::Path));
        assert_eq!(snap.at(p(2, 0)), None);
        assert_eq!(snap.rows().count(), 2);
        assert_eq!(snap.path, vec![p(0, 0), p(0, 1), p(1, 1)]);
        assert_eq!(snap.state, SearchState::Succeeded);
    }

    #[test]
    fn out_of_bounds_query() {
        let c = VisualizationController::new(2, 2).unwrap();
        assert_eq!(
            c.cell_state(p(2, 0)),
            Err(Error::Grid(GridError::OutOfBounds(p(2, 0))))
        );
        assert_eq!(c.dimensions(), (2, 2));
    }
}
