/// Lifesim Engine: Grid Positions and Routes
///
/// Positions are immutable integer cells on a square grid.
/// Routes are ordered cell sequences measured step by step.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Side length of the standard town grid.
pub const DEFAULT_GRID_SIZE: i32 = 5;

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Cell on the standard 5x5 grid.
    pub fn new(x: i32, y: i32) -> Result<Self, EngineError> {
        Self::with_grid(x, y, DEFAULT_GRID_SIZE)
    }

    /// Cell on a `size` x `size` grid.
    pub fn with_grid(x: i32, y: i32, size: i32) -> Result<Self, EngineError> {
        if !(0..size).contains(&x) || !(0..size).contains(&y) {
            return Err(EngineError::OutOfBounds { x, y, size });
        }
        Ok(Self { x, y })
    }

    /// The top-left cell, where every player starts.
    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Manhattan distance.
    pub fn distance_to(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn is_within(&self, size: i32) -> bool {
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }

    /// Unchecked constructor for cells already known to be on the grid.
    pub(crate) const fn at(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An ordered walk between two cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    start: Position,
    end: Position,
    positions: Vec<Position>,
    distance: i32,
}

impl Route {
    /// Build a route. An explicit path must begin at `start` and finish at
    /// `end`; without one the walk goes along x first, then along y.
    pub fn new(
        start: Position,
        end: Position,
        positions: Option<Vec<Position>>,
    ) -> Result<Self, EngineError> {
        let positions = match positions {
            Some(path) => {
                match (path.first(), path.last()) {
                    (Some(first), Some(last)) if *first == start && *last == end => {}
                    (None, _) | (_, None) => {
                        return Err(EngineError::InvalidRoute(
                            "explicit path is empty".to_string(),
                        ))
                    }
                    _ => {
                        return Err(EngineError::InvalidRoute(format!(
                            "path must run from {} to {}",
                            start, end
                        )))
                    }
                }
                path
            }
            None => manhattan_walk(start, end),
        };

        let distance = positions
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum();

        Ok(Self {
            start,
            end,
            positions,
            distance,
        })
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn distance(&self) -> i32 {
        self.distance
    }

    /// Number of cells visited, endpoints included.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Consecutive (from, to) pairs.
    pub fn steps(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.positions.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

fn manhattan_walk(start: Position, end: Position) -> Vec<Position> {
    let mut path = vec![start];
    let (mut x, mut y) = (start.x, start.y);

    while x != end.x {
        x += (end.x - x).signum();
        path.push(Position::at(x, y));
    }
    while y != end.y {
        y += (end.y - y).signum();
        path.push(Position::at(x, y));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y).unwrap()
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert!(matches!(
            Position::new(5, 0),
            Err(EngineError::OutOfBounds { x: 5, y: 0, size: 5 })
        ));
        assert!(Position::new(-1, 2).is_err());
        assert!(Position::with_grid(7, 7, 8).is_ok());
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(pos(0, 0).distance_to(&pos(3, 2)), 5);
        assert_eq!(pos(4, 4).distance_to(&pos(4, 4)), 0);
    }

    #[test]
    fn default_route_moves_horizontally_first() {
        let route = Route::new(pos(0, 0), pos(3, 2), None).unwrap();
        assert_eq!(route.distance(), 5);
        assert_eq!(route.len(), 6);
        let xs: Vec<(i32, i32)> = route.positions().iter().map(|p| (p.x(), p.y())).collect();
        assert_eq!(xs, vec![(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2)]);
    }

    #[test]
    fn route_to_self_has_one_cell() {
        let route = Route::new(pos(2, 2), pos(2, 2), None).unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route.distance(), 0);
    }

    #[test]
    fn explicit_path_must_match_endpoints() {
        let bad = Route::new(pos(0, 0), pos(1, 1), Some(vec![pos(0, 0), pos(1, 0)]));
        assert!(matches!(bad, Err(EngineError::InvalidRoute(_))));
        let empty = Route::new(pos(0, 0), pos(1, 1), Some(vec![]));
        assert!(empty.is_err());
    }

    #[test]
    fn explicit_detour_is_measured_step_by_step() {
        let detour = vec![pos(0, 0), pos(0, 1), pos(1, 1), pos(1, 0), pos(2, 0)];
        let route = Route::new(pos(0, 0), pos(2, 0), Some(detour)).unwrap();
        assert_eq!(route.distance(), 4);
        assert_eq!(route.steps().count(), 4);
    }
}
