//! Sparse tile grid at fractional resolution.
//!
//! The map is a hash of snapped coordinates to tiles — no bounds, a missing
//! key simply means "off the map". Every lookup and insert snaps its point
//! to the nearest multiple of the tile size first, so callers never need to
//! pre-align coordinates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TILE_SIZE;
use crate::geometry::{Direction, Point, Rectangle};

/// Integer grid cell identity: the multiple-of-`tile_size` index pair.
/// Hashable stand-in for a snapped point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridKey(pub i32, pub i32);

impl GridKey {
    pub fn for_point(point: &Point, tile_size: f32) -> Self {
        Self(
            (point.x / tile_size).round() as i32,
            (point.y / tile_size).round() as i32,
        )
    }

    pub fn to_point(self, tile_size: f32) -> Point {
        Point::new(self.0 as f32 * tile_size, self.1 as f32 * tile_size)
    }
}

/// Surface types. Walk speed is a movement-rate multiplier consumed by the
/// movement system, not by the pathfinder — the pathfinder only cares
/// whether the surface is walkable at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Floor,
    Path,
    Grass,
    Sand,
    Shallows,
    Water,
    Wall,
}

impl Terrain {
    pub fn walk_speed(&self) -> f32 {
        match self {
            Terrain::Floor => 1.0,
            Terrain::Path => 1.2,
            Terrain::Grass => 0.9,
            Terrain::Sand => 0.7,
            Terrain::Shallows => 0.5,
            Terrain::Water => 0.0,
            Terrain::Wall => 0.0,
        }
    }

    pub fn is_walkable(&self) -> bool {
        !matches!(self, Terrain::Water | Terrain::Wall)
    }
}

/// One grid cell. Mutable in place — terrain and walkability can be edited
/// after creation; identity is the grid coordinate, not the tile value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub walkable: bool,
    /// Name of the zone this tile was rasterized for, if any.
    pub zone: Option<String>,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            walkable: terrain.is_walkable(),
            zone: None,
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}

/// Sparse tile map keyed by snapped coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    tile_size: f32,
    tiles: HashMap<GridKey, Tile>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl TileMap {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            tiles: HashMap::new(),
        }
    }

    /// A map at the standard half-unit resolution.
    pub fn standard() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Round a point to the nearest multiple of the tile size.
    pub fn snap_to_grid(&self, point: &Point) -> Point {
        GridKey::for_point(point, self.tile_size).to_point(self.tile_size)
    }

    pub fn key_for(&self, point: &Point) -> GridKey {
        GridKey::for_point(point, self.tile_size)
    }

    pub fn get(&self, point: &Point) -> Option<&Tile> {
        self.tiles.get(&self.key_for(point))
    }

    pub fn get_mut(&mut self, point: &Point) -> Option<&mut Tile> {
        let key = self.key_for(point);
        self.tiles.get_mut(&key)
    }

    pub fn set(&mut self, point: &Point, tile: Tile) {
        self.tiles.insert(self.key_for(point), tile);
    }

    pub fn remove(&mut self, point: &Point) -> Option<Tile> {
        let key = self.key_for(point);
        self.tiles.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tile one resolution-step away, or `None` when off-map.
    pub fn neighbour(&self, point: &Point, direction: Direction) -> Option<(Point, &Tile)> {
        let snapped = self.snap_to_grid(point);
        let next = snapped.step(direction, self.tile_size);
        self.get(&next).map(|tile| (self.snap_to_grid(&next), tile))
    }

    /// Cardinal neighbours that exist on the map. Off-map neighbours are
    /// silently omitted.
    pub fn neighbours4(&self, point: &Point) -> Vec<(Point, &Tile)> {
        Direction::CARDINAL
            .iter()
            .filter_map(|&d| self.neighbour(point, d))
            .collect()
    }

    /// All eight neighbours that exist on the map.
    pub fn neighbours8(&self, point: &Point) -> Vec<(Point, &Tile)> {
        Direction::ALL
            .iter()
            .filter_map(|&d| self.neighbour(point, d))
            .collect()
    }

    /// Rasterize a rectangle into individual tile writes. Loader support:
    /// zone/panel definitions become terrain this way at world build time.
    pub fn fill(&mut self, area: &Rectangle, terrain: Terrain, zone: Option<&str>) {
        for point in area.points(self.tile_size) {
            let mut tile = Tile::new(terrain);
            if let Some(name) = zone {
                tile.zone = Some(name.to_string());
            }
            self.set(&point, tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_map() -> TileMap {
        let mut map = TileMap::new(0.5);
        let area = Rectangle::new(Point::new(0.0, 2.0), Point::new(2.0, 0.0));
        map.fill(&area, Terrain::Floor, Some("hall"));
        map
    }

    #[test]
    fn test_snap_to_grid() {
        let map = TileMap::new(0.5);
        assert_eq!(map.snap_to_grid(&Point::new(1.3, 0.74)), Point::new(1.5, 0.5));
        assert_eq!(map.snap_to_grid(&Point::new(-0.3, -0.26)), Point::new(-0.5, -0.5));
        assert_eq!(map.snap_to_grid(&Point::new(1.0, 1.0)), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_get_set_auto_snaps() {
        let mut map = TileMap::new(0.5);
        map.set(&Point::new(1.1, 1.1), Tile::new(Terrain::Grass));
        let tile = map.get(&Point::new(0.9, 0.9)).unwrap();
        assert_eq!(tile.terrain, Terrain::Grass);
    }

    #[test]
    fn test_missing_key_is_off_map() {
        let map = filled_map();
        assert!(map.get(&Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_fill_rasterizes_with_zone() {
        let map = filled_map();
        // 5x5 half-unit cells across a 2x2 area
        assert_eq!(map.len(), 25);
        let tile = map.get(&Point::new(1.0, 1.0)).unwrap();
        assert_eq!(tile.zone.as_deref(), Some("hall"));
        assert!(tile.walkable);
    }

    #[test]
    fn test_neighbour_steps_one_resolution() {
        let map = filled_map();
        let (point, _) = map.neighbour(&Point::new(1.0, 1.0), Direction::East).unwrap();
        assert_eq!(point, Point::new(1.5, 1.0));
        let (point, _) = map
            .neighbour(&Point::new(1.0, 1.0), Direction::NorthWest)
            .unwrap();
        assert_eq!(point, Point::new(0.5, 1.5));
    }

    #[test]
    fn test_neighbours_omit_off_map() {
        let map = filled_map();
        // Corner cell has 2 on-map cardinal neighbours, 3 of 8 total
        assert_eq!(map.neighbours4(&Point::new(0.0, 0.0)).len(), 2);
        assert_eq!(map.neighbours8(&Point::new(0.0, 0.0)).len(), 3);
        // Interior cell has all of them
        assert_eq!(map.neighbours4(&Point::new(1.0, 1.0)).len(), 4);
        assert_eq!(map.neighbours8(&Point::new(1.0, 1.0)).len(), 8);
    }

    #[test]
    fn test_tile_editable_in_place() {
        let mut map = filled_map();
        let tile = map.get_mut(&Point::new(1.0, 1.0)).unwrap();
        tile.walkable = false;
        tile.terrain = Terrain::Wall;
        assert!(!map.get(&Point::new(1.0, 1.0)).unwrap().walkable);
    }

    #[test]
    fn test_terrain_walk_speeds() {
        assert!(Terrain::Path.walk_speed() > Terrain::Sand.walk_speed());
        assert_eq!(Terrain::Water.walk_speed(), 0.0);
        assert!(!Terrain::Wall.is_walkable());
        assert!(Terrain::Shallows.is_walkable());
    }
}
