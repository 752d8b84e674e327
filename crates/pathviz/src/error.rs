use std::fmt;

use pathviz_core::GridError;
use pathviz_search::SearchError;

/// Any error the controller can report: an editing failure from the grid or
/// a lifecycle failure from the search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Grid(GridError),
    Search(SearchError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Search(e) => write!(f, "search: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Search(e) => Some(e),
        }
    }
}

impl From<GridError> for Error {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<SearchError> for Error {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}
