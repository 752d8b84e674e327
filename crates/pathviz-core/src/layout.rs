//! Plain-text grid layouts.
//!
//! One line per row, one glyph per cell (see [`CellState::glyph`]):
//!
//! ```text
//! S.#..
//! ..#..
//! ....E
//! ```
//!
//! Annotation glyphs are accepted when parsing but read back as empty
//! cells, so a printed frame can be parsed again as an editable grid.

use std::fmt;
use std::str::FromStr;

use crate::cell::CellState;
use crate::error::GridError;
use crate::geom::Point;
use crate::grid::Grid;

impl Grid {
    /// Parse a grid from a text layout. Leading and trailing blank lines are
    /// ignored; every other line must have the same number of glyphs.
    pub fn from_layout(layout: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = layout
            .trim_matches(|c| c == '\n' || c == '\r')
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .collect();
        let height = lines.len();
        let width = lines.first().map_or(0, |l| l.chars().count());
        if height == 0 || width == 0 {
            return Err(GridError::InvalidDimensions {
                width: width as i32,
                height: height as i32,
            });
        }

        let mut grid = Grid::new(width as i32, height as i32)?;
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridError::InconsistentLayout {
                    line: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                let state = CellState::from_glyph(ch).ok_or(GridError::InvalidGlyph { ch, pos })?;
                match state.authored() {
                    CellState::Obstacle => grid.set_obstacle(pos)?,
                    CellState::Start => {
                        if grid.start().is_some() {
                            return Err(GridError::DuplicateEndpoint { ch, pos });
                        }
                        grid.set_start(pos)?;
                    }
                    CellState::End => {
                        if grid.end().is_some() {
                            return Err(GridError::DuplicateEndpoint { ch, pos });
                        }
                        grid.set_end(pos)?;
                    }
                    _ => {}
                }
            }
        }
        Ok(grid)
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::from_layout(s)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.width();
        for (p, state) in self.iter() {
            write!(f, "{}", state.glyph())?;
            if p.x == w - 1 && p.y < self.height() - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
