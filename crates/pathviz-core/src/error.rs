use std::fmt;

use crate::geom::Point;

/// Errors raised by [`Grid`](crate::Grid) construction, editing and layout
/// parsing. A failed call never modifies the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is not strictly positive.
    InvalidDimensions { width: i32, height: i32 },
    /// The coordinate lies outside the grid.
    OutOfBounds(Point),
    /// An endpoint cannot be placed on an obstacle.
    OccupiedByObstacle(Point),
    /// Layout lines have different widths. `line` is zero-based.
    InconsistentLayout { line: usize, expected: usize, found: usize },
    /// A layout contains an unknown glyph.
    InvalidGlyph { ch: char, pos: Point },
    /// A layout marks more than one start or end cell.
    DuplicateEndpoint { ch: char, pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            }
            Self::OutOfBounds(p) => write!(f, "coordinate {p} is out of bounds"),
            Self::OccupiedByObstacle(p) => write!(f, "cell {p} is occupied by an obstacle"),
            Self::InconsistentLayout {
                line,
                expected,
                found,
            } => write!(
                f,
                "layout: line {line} has {found} cells, expected {expected}"
            ),
            Self::InvalidGlyph { ch, pos } => {
                write!(f, "layout contains invalid glyph \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::DuplicateEndpoint { ch, pos } => {
                write!(f, "layout: second \u{201c}{ch}\u{201d} endpoint at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}
