//! Random obstacle placement.

use rand::{Rng, RngExt};

use crate::cell::CellState;
use crate::grid::Grid;

/// Turn each empty cell into an obstacle with probability `density`.
///
/// `density` is clamped to `[0, 1]`. Endpoints and existing obstacles are
/// left as they are. Returns the number of obstacles placed.
pub fn scatter_obstacles(grid: &mut Grid, rng: &mut impl Rng, density: f64) -> usize {
    let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
    let mut placed = 0;
    for p in grid.bounds().iter() {
        if grid.get(p).map(CellState::authored) != Some(CellState::Empty) {
            continue;
        }
        if rng.random_bool(density) && grid.set_obstacle(p).is_ok() {
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zero_and_full_density() {
        let mut g = Grid::new(6, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(scatter_obstacles(&mut g, &mut rng, 0.0), 0);
        assert_eq!(g.count(CellState::Obstacle), 0);

        g.set_start(Point::new(0, 0)).unwrap();
        g.set_end(Point::new(5, 3)).unwrap();
        assert_eq!(scatter_obstacles(&mut g, &mut rng, 1.5), 22);
        assert_eq!(g.count(CellState::Obstacle), 22);
        assert_eq!(g.start(), Some(Point::new(0, 0)));
        assert_eq!(g.end(), Some(Point::new(5, 3)));
    }

    #[test]
    fn seeded_scatter_is_reproducible() {
        let mut a = Grid::new(20, 20).unwrap();
        let mut b = Grid::new(20, 20).unwrap();
        let na = scatter_obstacles(&mut a, &mut StdRng::seed_from_u64(42), 0.3);
        let nb = scatter_obstacles(&mut b, &mut StdRng::seed_from_u64(42), 0.3);
        assert_eq!(na, nb);
        assert_eq!(a, b);
        assert!(na > 0 && na < 400);
    }
}
