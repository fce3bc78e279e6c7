//! Zones and the passages that join them.
//!
//! A zone is a named rectangular area owning its exits, its occupants and
//! a derived occupancy set of blocked grid points. A passage connects
//! exactly two distinct zones and gates walkability through its state.
//! Graph-level queries (neighbour discovery, single-hop accessibility)
//! live on [`crate::world::World`], which holds the registries.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ZONE_MIN_HEIGHT, ZONE_MIN_WIDTH};
use crate::geometry::{Point, Rectangle};
use crate::grid::GridKey;

/// Contract violations raised by zone and passage constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    #[error("zone `{name}` is {width}x{height}, smaller than the {min_width}x{min_height} minimum")]
    TooSmall {
        name: String,
        width: f32,
        height: f32,
        min_width: f32,
        min_height: f32,
    },
    #[error("passage `{name}` must connect exactly two distinct zones")]
    PassageEndpoints { name: String },
}

/// Open/closed/locked state of a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassageState {
    Open,
    Closed,
    Locked,
}

/// A doorway between exactly two distinct zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    name: String,
    area: Rectangle,
    zone_a: String,
    zone_b: String,
    state: PassageState,
}

impl Passage {
    /// Fails immediately when the endpoints are not two distinct zones.
    pub fn new(
        name: impl Into<String>,
        area: Rectangle,
        zone_a: impl Into<String>,
        zone_b: impl Into<String>,
    ) -> Result<Self, ZoneError> {
        let name = name.into();
        let zone_a = zone_a.into();
        let zone_b = zone_b.into();
        if zone_a.is_empty() || zone_b.is_empty() || zone_a == zone_b {
            return Err(ZoneError::PassageEndpoints { name });
        }
        Ok(Self {
            name,
            area,
            zone_a,
            zone_b,
            state: PassageState::Open,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn area(&self) -> &Rectangle {
        &self.area
    }

    pub fn state(&self) -> PassageState {
        self.state
    }

    pub fn set_state(&mut self, state: PassageState) {
        self.state = state;
    }

    /// Characters may walk through only while open.
    pub fn is_traversable(&self) -> bool {
        self.state == PassageState::Open
    }

    pub fn zones(&self) -> (&str, &str) {
        (&self.zone_a, &self.zone_b)
    }

    /// The zone on the other side, or `None` when `zone` is not an endpoint.
    pub fn other_side(&self, zone: &str) -> Option<&str> {
        if self.zone_a == zone {
            Some(&self.zone_b)
        } else if self.zone_b == zone {
            Some(&self.zone_a)
        } else {
            None
        }
    }

    pub fn connects(&self, zone: &str) -> bool {
        self.zone_a == zone || self.zone_b == zone
    }
}

/// Named rectangular area of the map.
///
/// `blocked_points` is rebuilt from scratch whenever occupants change —
/// never decremented — so stale entries cannot survive an item moving or
/// resizing. Pickable items never contribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    name: String,
    area: Rectangle,
    exits: BTreeSet<String>,
    characters: BTreeSet<String>,
    items: BTreeSet<String>,
    blocked_points: HashSet<GridKey>,
    neighbours: BTreeSet<String>,
}

impl Zone {
    /// Fails when the area is smaller than the zone minimum.
    pub fn new(name: impl Into<String>, area: Rectangle) -> Result<Self, ZoneError> {
        let name = name.into();
        if area.width() < ZONE_MIN_WIDTH || area.height() < ZONE_MIN_HEIGHT {
            return Err(ZoneError::TooSmall {
                name,
                width: area.width(),
                height: area.height(),
                min_width: ZONE_MIN_WIDTH,
                min_height: ZONE_MIN_HEIGHT,
            });
        }
        Ok(Self {
            name,
            area: area.with_minimum_size(ZONE_MIN_WIDTH, ZONE_MIN_HEIGHT),
            exits: BTreeSet::new(),
            characters: BTreeSet::new(),
            items: BTreeSet::new(),
            blocked_points: HashSet::new(),
            neighbours: BTreeSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn area(&self) -> &Rectangle {
        &self.area
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.area.contains(point)
    }

    // ── Exits ───────────────────────────────────────────────────────────

    pub fn exits(&self) -> &BTreeSet<String> {
        &self.exits
    }

    pub fn add_exit(&mut self, passage: impl Into<String>) {
        self.exits.insert(passage.into());
    }

    pub fn remove_exit(&mut self, passage: &str) {
        self.exits.remove(passage);
    }

    // ── Occupants ───────────────────────────────────────────────────────

    pub fn characters(&self) -> &BTreeSet<String> {
        &self.characters
    }

    pub fn items(&self) -> &BTreeSet<String> {
        &self.items
    }

    pub fn add_character(&mut self, name: impl Into<String>) {
        self.characters.insert(name.into());
    }

    pub fn remove_character(&mut self, name: &str) {
        self.characters.remove(name);
    }

    pub fn add_item(&mut self, name: impl Into<String>) {
        self.items.insert(name.into());
    }

    pub fn remove_item(&mut self, name: &str) {
        self.items.remove(name);
    }

    // ── Occupancy set ───────────────────────────────────────────────────

    pub fn blocked_points(&self) -> &HashSet<GridKey> {
        &self.blocked_points
    }

    pub fn clear_blocked_points(&mut self) {
        self.blocked_points.clear();
    }

    /// Add every grid point under a static item's footprint to the
    /// occupancy set. Callers clear first and re-gather all footprints —
    /// removal is re-derivation, not decrement.
    pub fn gather_nonwalkables(&mut self, footprint: &Rectangle, tile_size: f32) {
        for point in footprint.points(tile_size) {
            self.blocked_points.insert(GridKey::for_point(&point, tile_size));
        }
    }

    /// Is a single point free of static obstacles?
    pub fn is_walkable(&self, point: &Point, tile_size: f32) -> bool {
        !self
            .blocked_points
            .contains(&GridKey::for_point(point, tile_size))
    }

    /// Is every grid point of the area free of static obstacles?
    pub fn is_walkable_area(&self, area: &Rectangle, tile_size: f32) -> bool {
        area.points(tile_size)
            .all(|p| self.is_walkable(&p, tile_size))
    }

    // ── Adjacency ───────────────────────────────────────────────────────

    pub fn neighbours(&self) -> &BTreeSet<String> {
        &self.neighbours
    }

    pub(crate) fn set_neighbours(&mut self, neighbours: BTreeSet<String>) {
        self.neighbours = neighbours;
    }
}
