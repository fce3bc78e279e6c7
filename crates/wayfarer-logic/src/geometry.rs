//! Axis-aligned rectangle geometry and the point/direction primitives.
//!
//! `Rectangle` is an immutable value type: every constructor normalizes the
//! corner order, so `upper_left.x <= lower_right.x` and
//! `upper_left.y >= lower_right.y` hold for the lifetime of the value
//! (y grows upward). Coordinates are rounded to a fixed decimal precision
//! so repeated arithmetic never drifts off the grid.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{COORD_DECIMALS, RECT_MIN_SIZE};

/// Geometry contract violations. These surface at the offending call site
/// and are never caught or retried inside the navigation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A reduce operation would shrink a rectangle below its minimum size.
    #[error("cannot reduce rectangle below its {min_width}x{min_height} minimum")]
    MinimumSize { min_width: f32, min_height: f32 },
    /// A coordinate string did not parse as `x,y`.
    #[error("invalid point string `{0}`")]
    ParsePoint(String),
    /// A coordinate string did not parse as `x1,y1,x2,y2`.
    #[error("invalid rectangle string `{0}`")]
    ParseRectangle(String),
}

/// Round a coordinate to the fixed decimal precision.
pub fn round_coord(value: f32) -> f32 {
    let factor = 10f32.powi(COORD_DECIMALS as i32);
    (value * factor).round() / factor
}

/// A 2D world point, rounded to the fixed decimal precision at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: round_coord(x),
            y: round_coord(y),
        }
    }

    /// Straight-line distance to another point, rounded.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        round_coord((dx * dx + dy * dy).sqrt())
    }

    /// Manhattan distance — the pathfinder heuristic.
    pub fn manhattan_distance(&self, other: &Point) -> f32 {
        round_coord((self.x - other.x).abs() + (self.y - other.y).abs())
    }

    /// The point one step away in `direction`.
    pub fn step(&self, direction: Direction, step: f32) -> Point {
        let (dx, dy) = direction.offset();
        Point::new(self.x + dx * step, self.y + dy * step)
    }
}

impl FromStr for Point {
    type Err = GeometryError;

    /// Parse `"x,y"` (whitespace around components tolerated).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(GeometryError::ParsePoint(s.to_string()));
        }
        let x = parts[0]
            .parse::<f32>()
            .map_err(|_| GeometryError::ParsePoint(s.to_string()))?;
        let y = parts[1]
            .parse::<f32>()
            .map_err(|_| GeometryError::ParsePoint(s.to_string()))?;
        Ok(Point::new(x, y))
    }
}

/// The eight compass directions. Cardinal directions double as rectangle
/// sides for the extend/reduce operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Unit offset of this direction (y grows northward).
    pub fn offset(&self) -> (f32, f32) {
        match self {
            Direction::North => (0.0, 1.0),
            Direction::NorthEast => (1.0, 1.0),
            Direction::East => (1.0, 0.0),
            Direction::SouthEast => (1.0, -1.0),
            Direction::South => (0.0, -1.0),
            Direction::SouthWest => (-1.0, -1.0),
            Direction::West => (-1.0, 0.0),
            Direction::NorthWest => (-1.0, 1.0),
        }
    }
}

/// Axis-aligned rectangle with canonical corner order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    upper_left: Point,
    lower_right: Point,
    min_width: f32,
    min_height: f32,
}

impl Rectangle {
    /// Build from two corner points in any order; corners are normalized.
    pub fn new(a: Point, b: Point) -> Self {
        let upper_left = Point::new(a.x.min(b.x), a.y.max(b.y));
        let lower_right = Point::new(a.x.max(b.x), a.y.min(b.y));
        Self {
            upper_left,
            lower_right,
            min_width: RECT_MIN_SIZE,
            min_height: RECT_MIN_SIZE,
        }
    }

    /// Build from a center point and dimensions.
    pub fn from_center(center: Point, width: f32, height: f32) -> Self {
        Self::new(
            Point::new(center.x - width / 2.0, center.y + height / 2.0),
            Point::new(center.x + width / 2.0, center.y - height / 2.0),
        )
    }

    /// Replace the minimum dimensions enforced by `reduce_side`.
    pub fn with_minimum_size(mut self, min_width: f32, min_height: f32) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    pub fn upper_left(&self) -> Point {
        self.upper_left
    }

    pub fn lower_right(&self) -> Point {
        self.lower_right
    }

    pub fn width(&self) -> f32 {
        round_coord(self.lower_right.x - self.upper_left.x)
    }

    pub fn height(&self) -> f32 {
        round_coord(self.upper_left.y - self.lower_right.y)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.upper_left.x + self.lower_right.x) / 2.0,
            (self.upper_left.y + self.lower_right.y) / 2.0,
        )
    }

    /// All four corners: upper-left, upper-right, lower-right, lower-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.upper_left,
            Point::new(self.lower_right.x, self.upper_left.y),
            self.lower_right,
            Point::new(self.upper_left.x, self.lower_right.y),
        ]
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.upper_left.x
            && point.x <= self.lower_right.x
            && point.y <= self.upper_left.y
            && point.y >= self.lower_right.y
    }

    /// AABB overlap test (touching edges count as intersecting).
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.upper_left.x <= other.lower_right.x
            && other.upper_left.x <= self.lower_right.x
            && self.lower_right.y <= other.upper_left.y
            && other.lower_right.y <= self.upper_left.y
    }

    /// Nearest point of this rectangle to `point` — `point` itself when
    /// inside, otherwise a clamp onto the closest edge or corner.
    pub fn closest_point(&self, point: &Point) -> Point {
        Point::new(
            point.x.clamp(self.upper_left.x, self.lower_right.x),
            point.y.clamp(self.lower_right.y, self.upper_left.y),
        )
    }

    /// Distance from a point: 0 inside, else the straight-line gap.
    pub fn distance_from_point(&self, point: &Point) -> f32 {
        if self.contains(point) {
            return 0.0;
        }
        self.closest_point(point).distance(point)
    }

    /// Distance between two rectangles: 0 when overlapping, otherwise the
    /// per-axis gaps combined as a Euclidean distance.
    pub fn distance_from(&self, other: &Rectangle) -> f32 {
        let gap_x = (self.upper_left.x - other.lower_right.x)
            .max(other.upper_left.x - self.lower_right.x)
            .max(0.0);
        let gap_y = (self.lower_right.y - other.upper_left.y)
            .max(other.lower_right.y - self.upper_left.y)
            .max(0.0);
        round_coord((gap_x * gap_x + gap_y * gap_y).sqrt())
    }

    /// Grow every side outward by `amount`.
    pub fn extend(&self, amount: f32) -> Rectangle {
        Rectangle::new(
            Point::new(self.upper_left.x - amount, self.upper_left.y + amount),
            Point::new(self.lower_right.x + amount, self.lower_right.y - amount),
        )
        .with_minimum_size(self.min_width, self.min_height)
    }

    /// Grow one side outward by `amount`. Diagonal directions grow the two
    /// adjacent sides.
    pub fn extend_side(&self, direction: Direction, amount: f32) -> Rectangle {
        let (dx, dy) = direction.offset();
        let mut upper_left = self.upper_left;
        let mut lower_right = self.lower_right;
        if dx < 0.0 {
            upper_left.x = round_coord(upper_left.x - amount);
        } else if dx > 0.0 {
            lower_right.x = round_coord(lower_right.x + amount);
        }
        if dy > 0.0 {
            upper_left.y = round_coord(upper_left.y + amount);
        } else if dy < 0.0 {
            lower_right.y = round_coord(lower_right.y - amount);
        }
        Rectangle::new(upper_left, lower_right).with_minimum_size(self.min_width, self.min_height)
    }

    /// Shrink one side inward by `amount`. Fails when the result would be
    /// smaller than the rectangle's minimum dimensions.
    pub fn reduce_side(&self, direction: Direction, amount: f32) -> Result<Rectangle, GeometryError> {
        let (dx, dy) = direction.offset();
        let mut upper_left = self.upper_left;
        let mut lower_right = self.lower_right;
        if dx < 0.0 {
            upper_left.x = round_coord(upper_left.x + amount);
        } else if dx > 0.0 {
            lower_right.x = round_coord(lower_right.x - amount);
        }
        if dy > 0.0 {
            upper_left.y = round_coord(upper_left.y - amount);
        } else if dy < 0.0 {
            lower_right.y = round_coord(lower_right.y + amount);
        }
        if lower_right.x - upper_left.x < self.min_width
            || upper_left.y - lower_right.y < self.min_height
        {
            return Err(GeometryError::MinimumSize {
                min_width: self.min_width,
                min_height: self.min_height,
            });
        }
        Ok(Rectangle::new(upper_left, lower_right)
            .with_minimum_size(self.min_width, self.min_height))
    }

    /// Lazy iterator over every grid-aligned point inside the rectangle at
    /// `resolution`. Finite and restartable — calling again yields a fresh
    /// pass over the same points.
    pub fn points(&self, resolution: f32) -> PointIter {
        PointIter::area(self, resolution)
    }

    /// Grid-aligned points along one edge only. Used for neighbour
    /// discovery on extended zone perimeters.
    pub fn perimeter_points(&self, side: Direction, resolution: f32) -> PointIter {
        PointIter::edge(self, side, resolution)
    }
}

impl FromStr for Rectangle {
    type Err = GeometryError;

    /// Parse `"x1,y1,x2,y2"`; corner order is normalized as usual.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(GeometryError::ParseRectangle(s.to_string()));
        }
        let mut coords = [0f32; 4];
        for (i, part) in parts.iter().enumerate() {
            coords[i] = part
                .parse::<f32>()
                .map_err(|_| GeometryError::ParseRectangle(s.to_string()))?;
        }
        Ok(Rectangle::new(
            Point::new(coords[0], coords[1]),
            Point::new(coords[2], coords[3]),
        ))
    }
}

/// Iterator over grid-aligned points of a rectangle area or a single edge.
///
/// Rows run top to bottom, columns left to right, so iteration order is
/// deterministic for tests and occupancy rebuilds.
#[derive(Debug, Clone)]
pub struct PointIter {
    origin_x: f32,
    origin_y: f32,
    cols: u32,
    rows: u32,
    resolution: f32,
    index: u32,
}

impl PointIter {
    fn area(rect: &Rectangle, resolution: f32) -> Self {
        let (origin_x, cols) = span(rect.upper_left.x, rect.lower_right.x, resolution);
        let (origin_y_low, rows) = span(rect.lower_right.y, rect.upper_left.y, resolution);
        // origin is the top-left on-grid point
        let origin_y = origin_y_low + (rows.saturating_sub(1)) as f32 * resolution;
        Self {
            origin_x,
            origin_y,
            cols,
            rows,
            resolution,
            index: 0,
        }
    }

    fn edge(rect: &Rectangle, side: Direction, resolution: f32) -> Self {
        let (origin_x, cols) = span(rect.upper_left.x, rect.lower_right.x, resolution);
        let (origin_y_low, rows) = span(rect.lower_right.y, rect.upper_left.y, resolution);
        let origin_y = origin_y_low + (rows.saturating_sub(1)) as f32 * resolution;
        match side {
            Direction::North => Self {
                origin_x,
                origin_y,
                cols,
                rows: rows.min(1),
                resolution,
                index: 0,
            },
            Direction::South => Self {
                origin_x,
                origin_y: origin_y_low,
                cols,
                rows: rows.min(1),
                resolution,
                index: 0,
            },
            Direction::West => Self {
                origin_x,
                origin_y,
                cols: cols.min(1),
                rows,
                resolution,
                index: 0,
            },
            Direction::East => Self {
                origin_x: origin_x + (cols.saturating_sub(1)) as f32 * resolution,
                origin_y,
                cols: cols.min(1),
                rows,
                resolution,
                index: 0,
            },
            // Diagonal "sides" degenerate to the matching corner.
            Direction::NorthWest => Self {
                origin_x,
                origin_y,
                cols: cols.min(1),
                rows: rows.min(1),
                resolution,
                index: 0,
            },
            Direction::NorthEast => Self {
                origin_x: origin_x + (cols.saturating_sub(1)) as f32 * resolution,
                origin_y,
                cols: cols.min(1),
                rows: rows.min(1),
                resolution,
                index: 0,
            },
            Direction::SouthEast => Self {
                origin_x: origin_x + (cols.saturating_sub(1)) as f32 * resolution,
                origin_y: origin_y_low,
                cols: cols.min(1),
                rows: rows.min(1),
                resolution,
                index: 0,
            },
            Direction::SouthWest => Self {
                origin_x,
                origin_y: origin_y_low,
                cols: cols.min(1),
                rows: rows.min(1),
                resolution,
                index: 0,
            },
        }
    }
}

impl Iterator for PointIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.index >= self.cols * self.rows {
            return None;
        }
        let col = self.index % self.cols;
        let row = self.index / self.cols;
        self.index += 1;
        Some(Point::new(
            self.origin_x + col as f32 * self.resolution,
            self.origin_y - row as f32 * self.resolution,
        ))
    }
}

/// First on-grid coordinate at or above `low`, and how many grid steps fit
/// up to `high` inclusive.
fn span(low: f32, high: f32, resolution: f32) -> (f32, u32) {
    let eps = resolution * 1e-3;
    let first = (low / resolution - eps).ceil() * resolution;
    if first > high + eps {
        return (round_coord(first), 0);
    }
    let count = ((high - first) / resolution + eps).floor() as u32 + 1;
    (round_coord(first), count)
}
