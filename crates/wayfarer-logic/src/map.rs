//! Declarative map definitions.
//!
//! A `MapDefinition` is the plain-data form of a world: zones with their
//! terrain, wall rectangles, passages, items and characters, with all
//! geometry written as coordinate strings (`"x1,y1,x2,y2"`). The simtest
//! harness ships one as JSON; tests build them inline. `build` turns a
//! definition into a ready `World`: terrain rasterized, passages cut into
//! the walls, occupancy and zone adjacency derived.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GeometryError, Point, Rectangle};
use crate::grid::Terrain;
use crate::world::{Character, Item, World, WorldError};
use crate::zone::{Passage, PassageState, Zone, ZoneError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Zone(#[from] ZoneError),
    #[error(transparent)]
    World(#[from] WorldError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDefinition {
    pub tile_size: f32,
    pub zones: Vec<ZoneDef>,
    #[serde(default)]
    pub walls: Vec<String>,
    #[serde(default)]
    pub passages: Vec<PassageDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub characters: Vec<CharacterDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDef {
    pub name: String,
    pub area: String,
    pub terrain: Terrain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageDef {
    pub name: String,
    pub area: String,
    pub zones: [String; 2],
    #[serde(default = "default_passage_state")]
    pub state: PassageState,
}

fn default_passage_state() -> PassageState {
    PassageState::Open
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    pub position: String,
    pub width: f32,
    pub height: f32,
    pub pickable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterDef {
    pub name: String,
    pub position: String,
    pub width: f32,
    pub height: f32,
}

/// Build a world from a definition.
///
/// Order matters: zone terrain first, walls over it, then passage areas
/// re-opened as floor so a doorway tile is walkable terrain whose gating
/// is purely the passage state.
pub fn build(definition: &MapDefinition) -> Result<World, MapError> {
    let mut world = World::new(definition.tile_size);

    for def in &definition.zones {
        let area: Rectangle = def.area.parse()?;
        world.add_zone(Zone::new(&def.name, area)?)?;
        world.tiles_mut().fill(&area, def.terrain, Some(&def.name));
    }

    for wall in &definition.walls {
        let area: Rectangle = wall.parse()?;
        world.tiles_mut().fill(&area, Terrain::Wall, None);
    }

    for def in &definition.passages {
        let area: Rectangle = def.area.parse()?;
        let mut passage = Passage::new(&def.name, area, &def.zones[0], &def.zones[1])?;
        passage.set_state(def.state);
        world.tiles_mut().fill(&area, Terrain::Floor, None);
        world.add_passage(passage)?;
    }

    for def in &definition.items {
        let position: Point = def.position.parse()?;
        world.register_item(Item::new(&def.name, position, def.width, def.height, def.pickable))?;
    }

    for def in &definition.characters {
        let position: Point = def.position.parse()?;
        world.register_character(Character::new(&def.name, position, def.width, def.height))?;
    }

    world.rebuild_all_neighbours();
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> MapDefinition {
        MapDefinition {
            tile_size: 0.5,
            zones: vec![
                ZoneDef {
                    name: "parlour".into(),
                    area: "0,10,10,0".into(),
                    terrain: Terrain::Floor,
                },
                ZoneDef {
                    name: "yard".into(),
                    area: "10.5,10,20,0".into(),
                    terrain: Terrain::Grass,
                },
            ],
            walls: vec!["10,10,10.5,0".into()],
            passages: vec![PassageDef {
                name: "side-door".into(),
                area: "10,5.5,10.5,5".into(),
                zones: ["parlour".into(), "yard".into()],
                state: PassageState::Open,
            }],
            items: vec![ItemDef {
                name: "trough".into(),
                position: "15,5".into(),
                width: 1.0,
                height: 1.0,
                pickable: false,
            }],
            characters: vec![CharacterDef {
                name: "farmhand".into(),
                position: "3,3".into(),
                width: 1.0,
                height: 1.0,
            }],
        }
    }

    #[test]
    fn test_build_rasterizes_terrain() {
        let world = build(&definition()).unwrap();
        assert_eq!(
            world.tiles().get(&Point::new(5.0, 5.0)).unwrap().terrain,
            Terrain::Floor
        );
        assert_eq!(
            world.tiles().get(&Point::new(15.0, 8.0)).unwrap().terrain,
            Terrain::Grass
        );
        // Wall between, except at the doorway
        assert_eq!(
            world.tiles().get(&Point::new(10.0, 8.0)).unwrap().terrain,
            Terrain::Wall
        );
        assert_eq!(
            world.tiles().get(&Point::new(10.0, 5.0)).unwrap().terrain,
            Terrain::Floor
        );
    }

    #[test]
    fn test_build_registers_everything() {
        let world = build(&definition()).unwrap();
        assert!(world.zone("parlour").is_some());
        assert!(world.passage("side-door").is_some());
        assert!(world.character("farmhand").is_some());
        assert!(world.item("trough").is_some());
        // Item blocked its zone's points
        let yard = world.zone("yard").unwrap();
        assert!(!yard.is_walkable(&Point::new(15.0, 5.0), world.tile_size()));
    }

    #[test]
    fn test_build_rejects_bad_geometry_strings() {
        let mut bad = definition();
        bad.zones[0].area = "0,10,10".into();
        assert!(matches!(build(&bad), Err(MapError::Geometry(_))));
    }

    #[test]
    fn test_definition_round_trips_through_json() {
        let json = serde_json::to_string(&definition()).unwrap();
        let parsed: MapDefinition = serde_json::from_str(&json).unwrap();
        let world = build(&parsed).unwrap();
        assert_eq!(world.zones().count(), 2);
    }
}
