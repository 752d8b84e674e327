//! **pathviz-core**: grid model for stepwise pathfinding visualization.
//!
//! This crate provides the types shared by the search engine and the
//! visualization controller: geometry primitives, the [`CellState`] of a
//! grid cell, and the editable [`Grid`] itself, together with text layouts
//! and random obstacle placement.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;
pub mod layout;
pub mod mapgen;

pub use cell::CellState;
pub use error::GridError;
pub use geom::{Point, Range};
pub use grid::Grid;
pub use mapgen::scatter_obstacles;
