//! Shared tuning values — grid resolution, search bounds, zone minimums.
//!
//! Plain `f32`/`i32` constants with no dependencies. Both the logic crate
//! and the simtest harness use these.

/// Grid resolution: every tile coordinate is a multiple of this.
pub const DEFAULT_TILE_SIZE: f32 = 0.5;

/// Decimal places kept on point coordinates to avoid floating drift.
pub const COORD_DECIMALS: u32 = 2;

/// How far beyond the start/goal bounding rectangle the A* search may
/// expand, in world units. Bounds search cost independent of map size.
pub const SEARCH_MARGIN: f32 = 10.0;

/// Smallest zone footprint the world accepts.
pub const ZONE_MIN_WIDTH: f32 = 3.0;
pub const ZONE_MIN_HEIGHT: f32 = 3.0;

/// Default minimum dimensions a rectangle may be reduced to.
pub const RECT_MIN_SIZE: f32 = 1.0;
