//! The [`CellState`] type, what a renderer draws for a single grid cell.

use std::fmt;

/// State of one grid cell.
///
/// `Empty`, `Obstacle`, `Start` and `End` are authored by the user.
/// `Visited`, `Frontier` and `Path` are annotations derived from a search
/// run; they only ever sit on top of otherwise empty cells and are wiped
/// before the next run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    Obstacle,
    Start,
    End,
    Visited,
    Frontier,
    Path,
}

impl CellState {
    /// Every state, in declaration order.
    pub const ALL: [CellState; 7] = [
        Self::Empty,
        Self::Obstacle,
        Self::Start,
        Self::End,
        Self::Visited,
        Self::Frontier,
        Self::Path,
    ];

    /// Whether this state is a search-derived annotation.
    #[inline]
    pub const fn is_annotation(self) -> bool {
        matches!(self, Self::Visited | Self::Frontier | Self::Path)
    }

    /// Whether this state is one of the endpoints.
    #[inline]
    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// Whether a search may move through the cell.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Obstacle)
    }

    /// The authored state underneath any annotation.
    #[inline]
    pub const fn authored(self) -> Self {
        if self.is_annotation() {
            Self::Empty
        } else {
            self
        }
    }

    /// Layout glyph for this state.
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Obstacle => '#',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Visited => 'o',
            Self::Frontier => '+',
            Self::Path => '*',
        }
    }

    /// Inverse of [`glyph`](CellState::glyph).
    pub const fn from_glyph(ch: char) -> Option<Self> {
        Some(match ch {
            '.' => Self::Empty,
            '#' => Self::Obstacle,
            'S' => Self::Start,
            'E' => Self::End,
            'o' => Self::Visited,
            '+' => Self::Frontier,
            '*' => Self::Path,
            _ => return None,
        })
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Obstacle => "obstacle",
            Self::Start => "start",
            Self::End => "end",
            Self::Visited => "visited",
            Self::Frontier => "frontier",
            Self::Path => "path",
        };
        f.write_str(name)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn every_state_round_trips() {
        let json = serde_json::to_string(&CellState::ALL).unwrap();
        let back: Vec<CellState> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellState::ALL.to_vec());
    }
}
