//! Pure grid navigation logic for Wayfarer.
//!
//! This crate answers two questions for a tick-based simulated world:
//! "is this area walkable right now?" and "what sequence of points connects
//! A to B given current doors, static objects and other characters?"
//! Everything is plain data and explicit context — no engine, no I/O, no
//! global state — so each piece is unit-testable in isolation.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Grid resolution, search margin, zone minimums |
//! | [`geometry`] | Points, directions, axis-aligned rectangles |
//! | [`grid`] | Terrain, tiles, the sparse snapped-coordinate tile map |
//! | [`map`] | Declarative JSON-friendly map definitions and the world builder |
//! | [`pathfinding`] | Bounded A* search aware of doors, items and characters |
//! | [`queue`] | Generic binary min-heap priority queue |
//! | [`world`] | World context: zone/passage/character/item registries |
//! | [`zone`] | Zones, passages, per-zone occupancy sets |

pub mod constants;
pub mod geometry;
pub mod grid;
pub mod map;
pub mod pathfinding;
pub mod queue;
pub mod world;
pub mod zone;
