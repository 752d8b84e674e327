use std::fmt;

use pathviz_core::Point;

/// One atomic action of a search run, emitted in causal order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepEvent {
    /// The node was taken off the frontier and settled.
    NodeExpanded(Point),
    /// The node received its first cost estimate and joined the frontier.
    NodeDiscovered { pos: Point, cost: i32 },
    /// A cheaper route to an already discovered node was found.
    NodeUpdated { pos: Point, cost: i32 },
    /// The goal was expanded. The path runs start to goal, inclusive.
    SearchSucceeded(Vec<Point>),
    /// The frontier ran dry before reaching the goal.
    SearchFailed,
}

impl StepEvent {
    /// Whether this event ends a run.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::SearchSucceeded(_) | Self::SearchFailed)
    }

    /// The single cell this event is about, if any.
    pub fn pos(&self) -> Option<Point> {
        match *self {
            Self::NodeExpanded(pos)
            | Self::NodeDiscovered { pos, .. }
            | Self::NodeUpdated { pos, .. } => Some(pos),
            Self::SearchSucceeded(_) | Self::SearchFailed => None,
        }
    }
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeExpanded(p) => write!(f, "expanded {p}"),
            Self::NodeDiscovered { pos, cost } => write!(f, "discovered {pos} at cost {cost}"),
            Self::NodeUpdated { pos, cost } => write!(f, "updated {pos} to cost {cost}"),
            Self::SearchSucceeded(path) => write!(f, "succeeded with {} cells", path.len()),
            Self::SearchFailed => f.write_str("failed"),
        }
    }
}
