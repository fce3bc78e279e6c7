//! The world context: tile map plus zone/passage/character/item registries.
//!
//! There is no global locator — everything that needs world state takes a
//! `&World`, so tests build isolated maps freely. All registries iterate in
//! name order (`BTreeMap`) to keep lookups like `zone_at` deterministic.
//!
//! Occupancy bookkeeping: any item registration, removal or move rebuilds
//! the affected zones' blocked-point sets from scratch. A full rebuild per
//! change is cheap because it is bounded by the zone area, and it can never
//! leave stale entries behind.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Direction, Point, Rectangle};
use crate::grid::TileMap;
use crate::zone::{Passage, PassageState, Zone, ZoneError};

/// Registry contract violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("unknown zone `{0}`")]
    UnknownZone(String),
    #[error("unknown passage `{0}`")]
    UnknownPassage(String),
    #[error("unknown character `{0}`")]
    UnknownCharacter(String),
    #[error("unknown item `{0}`")]
    UnknownItem(String),
    #[error("a {kind} named `{name}` is already registered")]
    DuplicateName { kind: &'static str, name: String },
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

/// A moving character with a rectangular footprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub position: Point,
    pub width: f32,
    pub height: f32,
}

impl Character {
    pub fn new(name: impl Into<String>, position: Point, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            position,
            width,
            height,
        }
    }

    pub fn footprint(&self) -> Rectangle {
        Rectangle::from_center(self.position, self.width, self.height)
    }
}

/// A placed object. Pickable items never block movement; static ones
/// contribute their whole footprint to the owning zone's occupancy set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub position: Point,
    pub width: f32,
    pub height: f32,
    pub pickable: bool,
}

impl Item {
    pub fn new(
        name: impl Into<String>,
        position: Point,
        width: f32,
        height: f32,
        pickable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            width,
            height,
            pickable,
        }
    }

    pub fn footprint(&self) -> Rectangle {
        Rectangle::from_center(self.position, self.width, self.height)
    }
}

/// Mutable shared state of the simulated world. Single-threaded by design:
/// callers mutate between ticks, searches run to completion within one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    tiles: TileMap,
    zones: BTreeMap<String, Zone>,
    passages: BTreeMap<String, Passage>,
    characters: BTreeMap<String, Character>,
    items: BTreeMap<String, Item>,
}

impl World {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tiles: TileMap::new(tile_size),
            zones: BTreeMap::new(),
            passages: BTreeMap::new(),
            characters: BTreeMap::new(),
            items: BTreeMap::new(),
        }
    }

    /// A world at the standard half-unit grid resolution.
    pub fn standard() -> Self {
        Self {
            tiles: TileMap::standard(),
            zones: BTreeMap::new(),
            passages: BTreeMap::new(),
            characters: BTreeMap::new(),
            items: BTreeMap::new(),
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tiles.tile_size()
    }

    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut TileMap {
        &mut self.tiles
    }

    // ── Zones ───────────────────────────────────────────────────────────

    pub fn add_zone(&mut self, zone: Zone) -> Result<(), WorldError> {
        if self.zones.contains_key(zone.name()) {
            return Err(WorldError::DuplicateName {
                kind: "zone",
                name: zone.name().to_string(),
            });
        }
        self.zones.insert(zone.name().to_string(), zone);
        Ok(())
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// The zone whose area contains `point`, lowest name first when areas
    /// share a boundary.
    pub fn zone_at(&self, point: &Point) -> Option<&Zone> {
        self.zones.values().find(|z| z.contains(point))
    }

    // ── Passages ────────────────────────────────────────────────────────

    /// Register a passage; both endpoint zones must exist, and the passage
    /// id is inserted into both zones' exit sets.
    pub fn add_passage(&mut self, passage: Passage) -> Result<(), WorldError> {
        if self.passages.contains_key(passage.name()) {
            return Err(WorldError::DuplicateName {
                kind: "passage",
                name: passage.name().to_string(),
            });
        }
        let (zone_a, zone_b) = passage.zones();
        let (zone_a, zone_b) = (zone_a.to_string(), zone_b.to_string());
        for name in [&zone_a, &zone_b] {
            if !self.zones.contains_key(name.as_str()) {
                return Err(WorldError::UnknownZone(name.clone()));
            }
        }
        let id = passage.name().to_string();
        if let Some(z) = self.zones.get_mut(&zone_a) {
            z.add_exit(id.clone());
        }
        if let Some(z) = self.zones.get_mut(&zone_b) {
            z.add_exit(id.clone());
        }
        self.passages.insert(id, passage);
        Ok(())
    }

    pub fn passage(&self, name: &str) -> Option<&Passage> {
        self.passages.get(name)
    }

    pub fn passages(&self) -> impl Iterator<Item = &Passage> {
        self.passages.values()
    }

    /// The passage whose doorway area contains `point`, if any.
    pub fn passage_at(&self, point: &Point) -> Option<&Passage> {
        self.passages.values().find(|p| p.area().contains(point))
    }

    pub fn set_passage_state(&mut self, name: &str, state: PassageState) -> Result<(), WorldError> {
        let passage = self
            .passages
            .get_mut(name)
            .ok_or_else(|| WorldError::UnknownPassage(name.to_string()))?;
        passage.set_state(state);
        Ok(())
    }

    // ── Characters ──────────────────────────────────────────────────────

    pub fn register_character(&mut self, character: Character) -> Result<(), WorldError> {
        if self.characters.contains_key(&character.name) {
            return Err(WorldError::DuplicateName {
                kind: "character",
                name: character.name.clone(),
            });
        }
        if let Some(zone) = self.zone_name_at(&character.position) {
            if let Some(z) = self.zones.get_mut(&zone) {
                z.add_character(character.name.clone());
            }
        }
        self.characters.insert(character.name.clone(), character);
        Ok(())
    }

    pub fn unregister_character(&mut self, name: &str) -> Result<(), WorldError> {
        let character = self
            .characters
            .remove(name)
            .ok_or_else(|| WorldError::UnknownCharacter(name.to_string()))?;
        if let Some(zone) = self.zone_name_at(&character.position) {
            if let Some(z) = self.zones.get_mut(&zone) {
                z.remove_character(name);
            }
        }
        Ok(())
    }

    pub fn move_character(&mut self, name: &str, position: Point) -> Result<(), WorldError> {
        let old_position = self
            .characters
            .get(name)
            .map(|c| c.position)
            .ok_or_else(|| WorldError::UnknownCharacter(name.to_string()))?;
        let old_zone = self.zone_name_at(&old_position);
        let new_zone = self.zone_name_at(&position);
        if old_zone != new_zone {
            if let Some(zone) = old_zone {
                if let Some(z) = self.zones.get_mut(&zone) {
                    z.remove_character(name);
                }
            }
            if let Some(zone) = new_zone {
                if let Some(z) = self.zones.get_mut(&zone) {
                    z.add_character(name.to_string());
                }
            }
        }
        if let Some(character) = self.characters.get_mut(name) {
            character.position = position;
        }
        Ok(())
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    /// Does any character footprint (other than `exclude`) overlap the
    /// given candidate footprint?
    pub fn is_area_occupied(&self, footprint: &Rectangle, exclude: Option<&str>) -> bool {
        self.characters
            .values()
            .filter(|c| Some(c.name.as_str()) != exclude)
            .any(|c| c.footprint().intersects(footprint))
    }

    /// Point-sized occupancy probe.
    pub fn is_point_occupied(&self, point: &Point, exclude: Option<&str>) -> bool {
        self.characters
            .values()
            .filter(|c| Some(c.name.as_str()) != exclude)
            .any(|c| c.footprint().contains(point))
    }

    // ── Items ───────────────────────────────────────────────────────────

    pub fn register_item(&mut self, item: Item) -> Result<(), WorldError> {
        if self.items.contains_key(&item.name) {
            return Err(WorldError::DuplicateName {
                kind: "item",
                name: item.name.clone(),
            });
        }
        let zone = self.zone_name_at(&item.position);
        if let Some(zone) = &zone {
            if let Some(z) = self.zones.get_mut(zone) {
                z.add_item(item.name.clone());
            }
        }
        self.items.insert(item.name.clone(), item);
        if let Some(zone) = zone {
            self.rebuild_occupancy(&zone);
        }
        Ok(())
    }

    pub fn remove_item(&mut self, name: &str) -> Result<Item, WorldError> {
        let item = self
            .items
            .remove(name)
            .ok_or_else(|| WorldError::UnknownItem(name.to_string()))?;
        if let Some(zone) = self.zone_name_at(&item.position) {
            if let Some(z) = self.zones.get_mut(&zone) {
                z.remove_item(name);
            }
            self.rebuild_occupancy(&zone);
        }
        Ok(item)
    }

    pub fn move_item(&mut self, name: &str, position: Point) -> Result<(), WorldError> {
        let old_position = self
            .items
            .get(name)
            .map(|i| i.position)
            .ok_or_else(|| WorldError::UnknownItem(name.to_string()))?;
        let old_zone = self.zone_name_at(&old_position);
        let new_zone = self.zone_name_at(&position);
        if let Some(item) = self.items.get_mut(name) {
            item.position = position;
        }
        if old_zone != new_zone {
            if let Some(zone) = &old_zone {
                if let Some(z) = self.zones.get_mut(zone) {
                    z.remove_item(name);
                }
            }
            if let Some(zone) = &new_zone {
                if let Some(z) = self.zones.get_mut(zone) {
                    z.add_item(name.to_string());
                }
            }
        }
        // Both sides re-derive; a move within one zone rebuilds it once.
        if let Some(zone) = &old_zone {
            self.rebuild_occupancy(zone);
        }
        if let Some(zone) = &new_zone {
            if old_zone != new_zone {
                self.rebuild_occupancy(zone);
            }
        }
        Ok(())
    }

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    /// Rebuild a zone's blocked-point set from the footprints of its
    /// current non-pickable items.
    pub fn rebuild_occupancy(&mut self, zone_name: &str) {
        let tile_size = self.tile_size();
        let footprints: Vec<Rectangle> = self
            .zones
            .get(zone_name)
            .map(|zone| {
                zone.items()
                    .iter()
                    .filter_map(|name| self.items.get(name))
                    .filter(|item| !item.pickable)
                    .map(Item::footprint)
                    .collect()
            })
            .unwrap_or_default();
        if let Some(zone) = self.zones.get_mut(zone_name) {
            zone.clear_blocked_points();
            for footprint in &footprints {
                zone.gather_nonwalkables(footprint, tile_size);
            }
        }
    }

    // ── Zone graph ──────────────────────────────────────────────────────

    /// Recompute one zone's neighbour set by sampling every point on the
    /// perimeter of its area extended by one unit and resolving each to the
    /// zone containing it. Must re-run whenever the zone's area changes.
    pub fn rebuild_neighbours(&mut self, zone_name: &str) -> Result<(), WorldError> {
        let zone = self
            .zones
            .get(zone_name)
            .ok_or_else(|| WorldError::UnknownZone(zone_name.to_string()))?;
        let extended = zone.area().extend(1.0);
        let tile_size = self.tile_size();
        let mut neighbours = BTreeSet::new();
        for side in Direction::CARDINAL {
            for point in extended.perimeter_points(side, tile_size) {
                if let Some(other) = self.zone_at(&point) {
                    if other.name() != zone_name {
                        neighbours.insert(other.name().to_string());
                    }
                }
            }
        }
        if let Some(zone) = self.zones.get_mut(zone_name) {
            zone.set_neighbours(neighbours);
        }
        Ok(())
    }

    pub fn rebuild_all_neighbours(&mut self) {
        let names: Vec<String> = self.zones.keys().cloned().collect();
        for name in names {
            let _ = self.rebuild_neighbours(&name);
        }
    }

    /// For every passage owned by `zone_name`, the zone on its other side.
    pub fn accessible_zones(&self, zone_name: &str) -> Vec<&Zone> {
        let Some(zone) = self.zones.get(zone_name) else {
            return Vec::new();
        };
        zone.exits()
            .iter()
            .filter_map(|exit| self.passages.get(exit))
            .filter_map(|passage| passage.other_side(zone_name))
            .filter_map(|other| self.zones.get(other))
            .collect()
    }

    /// Single-hop: is `other` on the far side of one of `zone_name`'s
    /// passages? Door state does not matter here.
    pub fn is_behind_door(&self, zone_name: &str, other: &str) -> bool {
        self.accessible_zones(zone_name)
            .iter()
            .any(|z| z.name() == other)
    }

    /// Single-hop reachability: `other` is a direct spatial neighbour, or
    /// sits behind one of this zone's passages that is currently open.
    pub fn is_accessible(&self, zone_name: &str, other: &str) -> bool {
        if let Some(zone) = self.zones.get(zone_name) {
            if zone.neighbours().contains(other) {
                return true;
            }
        }
        self.zones
            .get(zone_name)
            .map(|zone| {
                zone.exits()
                    .iter()
                    .filter_map(|exit| self.passages.get(exit))
                    .filter(|p| p.is_traversable())
                    .any(|p| p.other_side(zone_name) == Some(other))
            })
            .unwrap_or(false)
    }

    fn zone_name_at(&self, point: &Point) -> Option<String> {
        self.zone_at(point).map(|z| z.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Terrain;

    fn rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Rectangle {
        Rectangle::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    /// Two 10x10 zones side by side with one door at the shared wall.
    fn two_zone_world() -> World {
        let mut world = World::standard();
        world
            .add_zone(Zone::new("east", rect(10.0, 10.0, 20.0, 0.0)).unwrap())
            .unwrap();
        world
            .add_zone(Zone::new("west", rect(0.0, 10.0, 10.0, 0.0)).unwrap())
            .unwrap();
        world
            .add_passage(Passage::new("arch", rect(10.0, 6.0, 10.0, 5.0), "west", "east").unwrap())
            .unwrap();
        world.rebuild_all_neighbours();
        world
    }

    #[test]
    fn test_zone_at_resolves_points() {
        let world = two_zone_world();
        assert_eq!(world.zone_at(&Point::new(2.0, 2.0)).unwrap().name(), "west");
        assert_eq!(world.zone_at(&Point::new(15.0, 2.0)).unwrap().name(), "east");
        assert!(world.zone_at(&Point::new(30.0, 30.0)).is_none());
    }

    #[test]
    fn test_add_passage_updates_both_exits() {
        let world = two_zone_world();
        assert!(world.zone("west").unwrap().exits().contains("arch"));
        assert!(world.zone("east").unwrap().exits().contains("arch"));
    }

    #[test]
    fn test_add_passage_rejects_unknown_zone() {
        let mut world = two_zone_world();
        let bad = Passage::new("hatch", rect(0.0, 1.0, 0.0, 0.0), "west", "attic").unwrap();
        assert_eq!(
            world.add_passage(bad),
            Err(WorldError::UnknownZone("attic".into()))
        );
    }

    #[test]
    fn test_neighbours_found_across_shared_wall() {
        let world = two_zone_world();
        assert!(world.zone("west").unwrap().neighbours().contains("east"));
        assert!(world.zone("east").unwrap().neighbours().contains("west"));
    }

    #[test]
    fn test_accessible_zones_follow_passages() {
        let world = two_zone_world();
        let accessible = world.accessible_zones("west");
        assert_eq!(accessible.len(), 1);
        assert_eq!(accessible[0].name(), "east");
        assert!(world.is_behind_door("west", "east"));
        assert!(!world.is_behind_door("west", "west"));
    }

    #[test]
    fn test_accessibility_tracks_door_state() {
        let mut world = two_zone_world();
        assert!(world.is_accessible("west", "east"));
        world.set_passage_state("arch", PassageState::Locked).unwrap();
        // Still spatial neighbours, so single-hop accessibility holds;
        // door-gated reachability is the pathfinder's concern.
        assert!(world.is_accessible("west", "east"));
        assert!(world.is_behind_door("west", "east"));
    }

    #[test]
    fn test_item_registration_blocks_points() {
        let mut world = two_zone_world();
        world
            .register_item(Item::new("barrel", Point::new(5.0, 5.0), 1.0, 1.0, false))
            .unwrap();
        let west = world.zone("west").unwrap();
        assert!(!west.is_walkable(&Point::new(5.0, 5.0), world.tile_size()));
        assert!(west.items().contains("barrel"));
    }

    #[test]
    fn test_pickable_items_never_block() {
        let mut world = two_zone_world();
        world
            .register_item(Item::new("coin", Point::new(5.0, 5.0), 0.5, 0.5, true))
            .unwrap();
        let west = world.zone("west").unwrap();
        assert!(west.is_walkable(&Point::new(5.0, 5.0), world.tile_size()));
    }

    #[test]
    fn test_moving_item_rederives_occupancy() {
        let mut world = two_zone_world();
        world
            .register_item(Item::new("barrel", Point::new(5.0, 5.0), 1.0, 1.0, false))
            .unwrap();
        world.move_item("barrel", Point::new(15.0, 5.0)).unwrap();
        let tile_size = world.tile_size();
        assert!(world
            .zone("west")
            .unwrap()
            .is_walkable(&Point::new(5.0, 5.0), tile_size));
        assert!(!world
            .zone("east")
            .unwrap()
            .is_walkable(&Point::new(15.0, 5.0), tile_size));
        assert!(world.zone("east").unwrap().items().contains("barrel"));
        assert!(!world.zone("west").unwrap().items().contains("barrel"));
    }

    #[test]
    fn test_removing_item_unblocks() {
        let mut world = two_zone_world();
        world
            .register_item(Item::new("barrel", Point::new(5.0, 5.0), 1.0, 1.0, false))
            .unwrap();
        world.remove_item("barrel").unwrap();
        let tile_size = world.tile_size();
        assert!(world
            .zone("west")
            .unwrap()
            .is_walkable(&Point::new(5.0, 5.0), tile_size));
    }

    #[test]
    fn test_character_occupancy_probes() {
        let mut world = two_zone_world();
        world
            .register_character(Character::new("rhea", Point::new(3.0, 3.0), 1.0, 1.0))
            .unwrap();
        assert!(world.is_point_occupied(&Point::new(3.0, 3.0), None));
        assert!(!world.is_point_occupied(&Point::new(3.0, 3.0), Some("rhea")));
        assert!(!world.is_point_occupied(&Point::new(8.0, 8.0), None));
        let probe = Rectangle::from_center(Point::new(3.5, 3.0), 1.0, 1.0);
        assert!(world.is_area_occupied(&probe, None));
    }

    #[test]
    fn test_move_character_updates_zone_membership() {
        let mut world = two_zone_world();
        world
            .register_character(Character::new("rhea", Point::new(3.0, 3.0), 1.0, 1.0))
            .unwrap();
        assert!(world.zone("west").unwrap().characters().contains("rhea"));
        world.move_character("rhea", Point::new(15.0, 3.0)).unwrap();
        assert!(!world.zone("west").unwrap().characters().contains("rhea"));
        assert!(world.zone("east").unwrap().characters().contains("rhea"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut world = two_zone_world();
        let duplicate = Zone::new("west", rect(0.0, 5.0, 5.0, 0.0)).unwrap();
        assert!(matches!(
            world.add_zone(duplicate),
            Err(WorldError::DuplicateName { kind: "zone", .. })
        ));
    }

    #[test]
    fn test_tiles_shared_through_world() {
        let mut world = two_zone_world();
        let area = rect(0.0, 10.0, 20.0, 0.0);
        world.tiles_mut().fill(&area, Terrain::Floor, None);
        assert!(world.tiles().get(&Point::new(7.3, 2.2)).is_some());
    }
}
