//! Stepwise A* search.
//!
//! [`Engine`] runs A* one expansion at a time so that every intermediate
//! action can be observed. A run goes `Idle → Running → Succeeded | Failed`;
//! [`Engine::step`] advances it by exactly one frontier extraction and
//! reports what happened as [`StepEvent`]s.

use std::fmt;

use pathviz_core::{Grid, Point, Range};

use crate::error::SearchError;
use crate::event::StepEvent;
use crate::frontier::PriorityFrontier;
use crate::traits::AstarPather;

/// Sentinel g-score for nodes without a known route.
pub const UNREACHABLE: i32 = i32::MAX;

const NO_PARENT: usize = usize::MAX;

/// Lifecycle of a search run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl SearchState {
    /// Whether the run has ended.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        })
    }
}

/// Where a node stands in the current run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Membership {
    #[default]
    Unvisited,
    InFrontier,
    Settled,
}

/// Per-cell bookkeeping of a run, as seen from outside the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchNode {
    pub pos: Point,
    /// Best known cost from the start.
    pub g: i32,
    /// `g` plus the estimate to the goal.
    pub f: i32,
    /// Predecessor on the best known route.
    pub parent: Option<Point>,
    pub membership: Membership,
}

#[derive(Clone, Copy)]
struct Node {
    g: i32,
    f: i32,
    parent: usize,
    membership: Membership,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            f: UNREACHABLE,
            parent: NO_PARENT,
            membership: Membership::Unvisited,
        }
    }
}

/// Stepwise A* engine.
///
/// The engine does not own the graph it searches: every call that advances a
/// run borrows the pather (usually a [`Grid`]) again. The caller must not
/// change the pather between [`start`](Engine::start) and the end of the
/// run.
#[derive(Default)]
pub struct Engine {
    state: SearchState,
    rng: Range,
    from: Point,
    to: Point,
    nodes: Vec<Node>,
    frontier: PriorityFrontier,
    events: Vec<StepEvent>,
    /// Index of the first event in `events` not yet handed out by [`Steps`].
    pending: usize,
    path: Vec<Point>,
    expanded: usize,
    nbuf: Vec<Point>,
}

impl Engine {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == SearchState::Running
    }

    /// Start and goal of the current or last run. `None` while idle.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        (self.state != SearchState::Idle).then_some((self.from, self.to))
    }

    /// Number of nodes expanded so far in this run.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of points waiting on the frontier.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// The path found by a successful run.
    pub fn path(&self) -> Option<&[Point]> {
        (self.state == SearchState::Succeeded).then_some(self.path.as_slice())
    }

    /// Events produced by the most recent [`step`](Engine::step).
    #[inline]
    pub fn last_events(&self) -> &[StepEvent] {
        &self.events
    }

    /// Bookkeeping for `p` in the current run, or `None` if the node has
    /// not been reached (or no run is active).
    pub fn node(&self, p: Point) -> Option<SearchNode> {
        let n = self.nodes.get(self.rng.index(p)?)?;
        if n.membership == Membership::Unvisited {
            return None;
        }
        Some(SearchNode {
            pos: p,
            g: n.g,
            f: n.f,
            parent: (n.parent != NO_PARENT).then(|| self.rng.point(n.parent)),
            membership: n.membership,
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Begin a run from the grid's start cell to its end cell.
    pub fn start(&mut self, grid: &Grid) -> Result<(), SearchError> {
        self.ensure_not_running("start")?;
        let from = grid.start().ok_or(SearchError::MissingStart)?;
        let to = grid.end().ok_or(SearchError::MissingEnd)?;
        self.start_with(grid, from, to)
    }

    /// Begin a run over any pather.
    ///
    /// A finished run is discarded first; starting while another run is
    /// active fails with [`SearchError::InvalidState`].
    pub fn start_with<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
    ) -> Result<(), SearchError> {
        self.ensure_not_running("start")?;
        let rng = pather.bounds();
        let start_idx = rng.index(from).ok_or(SearchError::OutOfBounds(from))?;
        if !rng.contains(to) {
            return Err(SearchError::OutOfBounds(to));
        }

        self.discard();
        self.rng = rng;
        self.from = from;
        self.to = to;
        self.nodes.resize(rng.len(), Node::default());

        let f = pather.estimate(from, to);
        let node = &mut self.nodes[start_idx];
        node.g = 0;
        node.f = f;
        node.membership = Membership::InFrontier;
        self.frontier.insert_or_update(from, f);

        self.state = SearchState::Running;
        log::debug!("search started: {from} -> {to} over {rng}");
        Ok(())
    }

    /// Abandon the active run without a terminal event.
    pub fn cancel(&mut self) -> Result<(), SearchError> {
        if self.state != SearchState::Running {
            return Err(SearchError::InvalidState {
                op: "cancel",
                state: self.state,
            });
        }
        log::debug!("search cancelled after {} expansions", self.expanded);
        self.discard();
        self.state = SearchState::Idle;
        Ok(())
    }

    /// Return to idle from any state, dropping all run data.
    pub fn reset(&mut self) {
        self.discard();
        self.state = SearchState::Idle;
    }

    fn discard(&mut self) {
        self.nodes.clear();
        self.frontier.clear();
        self.events.clear();
        self.pending = 0;
        self.path.clear();
        self.expanded = 0;
    }

    fn ensure_not_running(&self, op: &'static str) -> Result<(), SearchError> {
        if self.state == SearchState::Running {
            return Err(SearchError::InvalidState {
                op,
                state: self.state,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Advance the run by one expansion.
    ///
    /// Returns the events of this step, borrowed from a buffer that the next
    /// step reuses. `pather` must be the one the run was started with.
    pub fn step<P: AstarPather>(&mut self, pather: &P) -> Result<&[StepEvent], SearchError> {
        self.advance(pather)?;
        self.pending = self.events.len();
        Ok(&self.events)
    }

    fn advance<P: AstarPather>(&mut self, pather: &P) -> Result<(), SearchError> {
        if self.state != SearchState::Running {
            return Err(SearchError::InvalidState {
                op: "step",
                state: self.state,
            });
        }
        self.expand(pather);
        Ok(())
    }

    /// One A* iteration. The run must be `Running`.
    fn expand<P: AstarPather>(&mut self, pather: &P) {
        self.events.clear();

        // The frontier only yields live entries of unsettled, in-bounds nodes.
        let Ok((cp, _)) = self.frontier.extract_min() else {
            self.events.push(StepEvent::SearchFailed);
            self.state = SearchState::Failed;
            log::debug!(
                "search failed: {} -> {} unreachable after {} expansions",
                self.from,
                self.to,
                self.expanded
            );
            return;
        };
        let ci = self.idx(cp);

        self.nodes[ci].membership = Membership::Settled;
        self.expanded += 1;
        self.events.push(StepEvent::NodeExpanded(cp));
        log::trace!("expand {cp} g={} f={}", self.nodes[ci].g, self.nodes[ci].f);

        if cp == self.to {
            self.reconstruct(ci);
            self.events.push(StepEvent::SearchSucceeded(self.path.clone()));
            self.state = SearchState::Succeeded;
            log::debug!(
                "search succeeded: path of {} cells after {} expansions",
                self.path.len(),
                self.expanded
            );
            return;
        }

        let current_g = self.nodes[ci].g;
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        pather.neighbors(cp, &mut nbuf);

        for &np in nbuf.iter() {
            let Some(ni) = self.rng.index(np) else {
                continue;
            };
            let n = &mut self.nodes[ni];
            if n.membership == Membership::Settled {
                continue;
            }
            let tentative = current_g + pather.cost(cp, np);
            let discovered = n.g == UNREACHABLE;
            if !discovered && tentative >= n.g {
                continue;
            }

            n.g = tentative;
            n.f = tentative + pather.estimate(np, self.to);
            n.parent = ci;
            n.membership = Membership::InFrontier;
            self.frontier.insert_or_update(np, n.f);

            self.events.push(if discovered {
                StepEvent::NodeDiscovered {
                    pos: np,
                    cost: tentative,
                }
            } else {
                StepEvent::NodeUpdated {
                    pos: np,
                    cost: tentative,
                }
            });
        }

        self.nbuf = nbuf;
    }

    /// Flat index of an in-bounds point.
    #[inline]
    fn idx(&self, p: Point) -> usize {
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        y * self.rng.width() as usize + x
    }

    fn reconstruct(&mut self, goal_idx: usize) {
        self.path.clear();
        let mut ci = goal_idx;
        while ci != NO_PARENT {
            self.path.push(self.rng.point(ci));
            ci = self.nodes[ci].parent;
        }
        self.path.reverse();
    }

    /// Step until the run ends, returning every event in order.
    ///
    /// Events of the current step that a [`Steps`] iterator has not handed
    /// out yet are included first.
    pub fn run_to_completion<P: AstarPather>(
        &mut self,
        pather: &P,
    ) -> Result<Vec<StepEvent>, SearchError> {
        if self.state != SearchState::Running {
            return Err(SearchError::InvalidState {
                op: "run to completion",
                state: self.state,
            });
        }
        let mut all = self.events[self.pending..].to_vec();
        self.pending = self.events.len();
        while self.state == SearchState::Running {
            all.extend_from_slice(self.step(pather)?);
        }
        Ok(all)
    }

    /// Lazily yield the remaining events of the active run, one at a time.
    ///
    /// The iterator steps the engine on demand and ends after the terminal
    /// event. Dropping it early leaves the run where it stopped, so a new
    /// iterator (or [`step`](Engine::step)) resumes from there.
    pub fn steps<'a, P: AstarPather>(&'a mut self, pather: &'a P) -> Steps<'a, P> {
        Steps {
            engine: self,
            pather,
        }
    }
}

/// Lazy event sequence returned by [`Engine::steps`].
pub struct Steps<'a, P> {
    engine: &'a mut Engine,
    pather: &'a P,
}

impl<P: AstarPather> Iterator for Steps<'_, P> {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        loop {
            let engine = &mut *self.engine;
            if let Some(e) = engine.events.get(engine.pending) {
                engine.pending += 1;
                return Some(e.clone());
            }
            if !engine.is_running() {
                return None;
            }
            engine.expand(self.pather);
            engine.pending = 0;
        }
    }
}
