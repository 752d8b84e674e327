use std::fmt;

use pathviz_core::Point;

use crate::engine::SearchState;

/// Errors raised by the search engine. A failed call leaves the engine in
/// the state it was in.
///
/// "No path exists" is not an error: it is reported as
/// [`StepEvent::SearchFailed`](crate::StepEvent::SearchFailed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The grid has no start cell.
    MissingStart,
    /// The grid has no end cell.
    MissingEnd,
    /// `op` is not allowed while the engine is in `state`.
    InvalidState { op: &'static str, state: SearchState },
    /// A search endpoint lies outside the searchable bounds.
    OutOfBounds(Point),
    /// Extraction from an empty frontier. The engine turns this into a
    /// failed search, so callers of the engine never see it.
    EmptyFrontier,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => f.write_str("no start cell set"),
            Self::MissingEnd => f.write_str("no end cell set"),
            Self::InvalidState { op, state } => {
                write!(f, "cannot {op} while search is {state}")
            }
            Self::OutOfBounds(p) => write!(f, "search endpoint {p} is out of bounds"),
            Self::EmptyFrontier => f.write_str("frontier is empty"),
        }
    }
}

impl std::error::Error for SearchError {}
