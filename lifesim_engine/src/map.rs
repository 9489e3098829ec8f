/// Lifesim Engine: Town Map
///
/// Fixed-size grid of building slots. Occupancy constrains placement only;
/// routes pass through occupied cells freely.

use std::collections::BTreeMap;

use crate::buildings::{standard_buildings, Building};
use crate::error::EngineError;
use crate::position::{Position, Route, DEFAULT_GRID_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    size: i32,
    occupancy: BTreeMap<Position, String>,
    buildings: Vec<Building>,
}

impl GameMap {
    /// An empty `size` x `size` grid.
    pub fn new(size: i32) -> Self {
        Self {
            size,
            occupancy: BTreeMap::new(),
            buildings: Vec::new(),
        }
    }

    /// The standard 5x5 town with one building of every kind.
    pub fn standard() -> Self {
        let mut map = Self::new(DEFAULT_GRID_SIZE);
        for building in standard_buildings() {
            // the standard layout never collides
            if let Err(err) = map.add_building(building) {
                tracing::error!(%err, "standard town layout rejected a building");
            }
        }
        map
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn add_building(&mut self, building: Building) -> Result<(), EngineError> {
        let pos = building.position;
        if !pos.is_within(self.size) {
            return Err(EngineError::OutOfBounds {
                x: pos.x(),
                y: pos.y(),
                size: self.size,
            });
        }
        if let Some(occupant) = self.occupancy.get(&pos) {
            return Err(EngineError::CellOccupied {
                x: pos.x(),
                y: pos.y(),
                occupant: occupant.clone(),
            });
        }
        if self.buildings.iter().any(|b| b.id == building.id) {
            return Err(EngineError::DuplicateBuilding(building.id));
        }
        self.occupancy.insert(pos, building.id.clone());
        self.buildings.push(building);
        Ok(())
    }

    /// Free the building's cell. Returns whether anything was removed.
    pub fn remove_building(&mut self, id: &str) -> bool {
        let Some(idx) = self.buildings.iter().position(|b| b.id == id) else {
            return false;
        };
        let removed = self.buildings.remove(idx);
        self.occupancy.remove(&removed.position);
        true
    }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn building_at(&self, position: Position) -> Option<&Building> {
        self.occupancy
            .get(&position)
            .and_then(|id| self.building(id))
    }

    pub fn all_buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupancy.contains_key(&position)
    }

    pub fn route(&self, from: Position, to: Position) -> Result<Route, EngineError> {
        for pos in [from, to] {
            if !pos.is_within(self.size) {
                return Err(EngineError::OutOfBounds {
                    x: pos.x(),
                    y: pos.y(),
                    size: self.size,
                });
            }
        }
        Route::new(from, to, None)
    }

    /// Orthogonal neighbours that stay on the grid.
    pub fn adjacent_positions(&self, position: Position) -> Vec<Position> {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .iter()
            .filter_map(|(dx, dy)| {
                Position::with_grid(position.x() + dx, position.y() + dy, self.size).ok()
            })
            .collect()
    }

    /// Manhattan distance, or -1 when either end is off the grid.
    pub fn distance(&self, from: Position, to: Position) -> i32 {
        if !from.is_within(self.size) || !to.is_within(self.size) {
            return -1;
        }
        from.distance_to(&to)
    }
}

impl Default for GameMap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::BuildingKind;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y).unwrap()
    }

    fn shop(id: &str, at: Position) -> Building {
        Building::new(id, BuildingKind::Supermarket, id, "", at)
    }

    #[test]
    fn rejects_occupied_and_duplicate() {
        let mut map = GameMap::new(5);
        map.add_building(shop("a", pos(1, 1))).unwrap();
        assert!(matches!(
            map.add_building(shop("b", pos(1, 1))),
            Err(EngineError::CellOccupied { .. })
        ));
        assert!(matches!(
            map.add_building(shop("a", pos(2, 2))),
            Err(EngineError::DuplicateBuilding(_))
        ));
    }

    #[test]
    fn rejects_buildings_beyond_a_small_grid() {
        let mut map = GameMap::new(3);
        assert!(matches!(
            map.add_building(shop("far", pos(4, 4))),
            Err(EngineError::OutOfBounds { size: 3, .. })
        ));
    }

    #[test]
    fn remove_frees_cell() {
        let mut map = GameMap::new(5);
        map.add_building(shop("a", pos(1, 1))).unwrap();
        assert!(map.remove_building("a"));
        assert!(!map.remove_building("a"));
        assert!(!map.is_occupied(pos(1, 1)));
        map.add_building(shop("b", pos(1, 1))).unwrap();
        assert_eq!(map.building_at(pos(1, 1)).unwrap().id, "b");
    }

    #[test]
    fn adjacency_counts() {
        let map = GameMap::new(5);
        assert_eq!(map.adjacent_positions(pos(0, 0)).len(), 2);
        assert_eq!(map.adjacent_positions(pos(2, 0)).len(), 3);
        assert_eq!(map.adjacent_positions(pos(2, 2)).len(), 4);
        assert_eq!(map.adjacent_positions(pos(4, 4)).len(), 2);
    }

    #[test]
    fn distance_is_minus_one_off_grid() {
        let map = GameMap::new(3);
        assert_eq!(map.distance(pos(0, 0), pos(2, 2)), 4);
        assert_eq!(map.distance(pos(0, 0), pos(4, 4)), -1);
        assert!(map.route(pos(0, 0), pos(4, 4)).is_err());
    }

    #[test]
    fn routes_ignore_buildings() {
        let map = GameMap::standard();
        let route = map.route(pos(0, 0), pos(4, 0)).unwrap();
        assert_eq!(route.distance(), 4);
        assert!(route.positions().iter().any(|p| map.is_occupied(*p)));
    }

    #[test]
    fn standard_town_has_every_kind() {
        let map = GameMap::standard();
        assert_eq!(map.all_buildings().len(), BuildingKind::ALL.len());
        for kind in BuildingKind::ALL {
            assert!(map.all_buildings().iter().any(|b| b.kind == kind), "{:?}", kind);
        }
    }
}
