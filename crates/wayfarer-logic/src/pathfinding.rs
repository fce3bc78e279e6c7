//! A* search over the tile grid, aware of doors, static obstacles and
//! other characters.
//!
//! The search is bounded: expansion never leaves the rectangle spanned by
//! start and goal extended by [`SEARCH_MARGIN`], so one call's cost is
//! independent of total map size. The open set is a binary heap plus a
//! coordinate-to-node map; there is no decrease-key — a cheaper rediscovery
//! re-enqueues and the closed-set check drops the stale duplicate when it
//! surfaces. Heap ties break first-enqueued-wins via a monotone sequence
//! number, so path output is reproducible.
//!
//! "No path" is an expected outcome, returned as `None` — same-zone
//! mismatches and degenerate through-flag combinations report the same way,
//! never as an error.

use std::collections::{HashMap, HashSet};

use crate::constants::SEARCH_MARGIN;
use crate::geometry::{Direction, Point, Rectangle};
use crate::grid::GridKey;
use crate::queue::PriorityQueue;
use crate::world::World;

/// One explored coordinate: accumulated step cost and the parent link the
/// final path is reconstructed from. Parent links form a tree rooted at the
/// start node; the closed set prevents cycles.
#[derive(Debug, Clone)]
struct PathNode {
    coords: Point,
    cost: u32,
    parent: Option<GridKey>,
}

impl PathNode {
    /// Heuristic distance to the goal in grid steps, recomputed on demand.
    fn distance(&self, goal: &Point, tile_size: f32) -> f32 {
        self.coords.manhattan_distance(goal) / tile_size
    }

    /// `cost + distance`: the heap priority.
    fn price(&self, goal: &Point, tile_size: f32) -> f32 {
        self.cost as f32 + self.distance(goal, tile_size)
    }
}

/// Everything a caller specifies about one search.
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub start: Point,
    pub goal: Point,
    /// Fail immediately unless both endpoints resolve to the same zone.
    pub same_zone: bool,
    /// May the start cell itself appear as a traversable/returned point?
    pub through_start: bool,
    /// May the goal cell itself be stepped onto? When false the path ends
    /// on a cell adjacent to the goal.
    pub through_goal: bool,
    pub character_width: f32,
    pub character_height: f32,
    /// The requesting character, excluded from footprint-overlap blocking.
    pub mover: Option<String>,
}

impl PathRequest {
    pub fn new(start: Point, goal: Point) -> Self {
        Self {
            start,
            goal,
            same_zone: false,
            through_start: false,
            through_goal: true,
            character_width: 1.0,
            character_height: 1.0,
            mover: None,
        }
    }
}

/// Per-call A* orchestrator. Borrows the world; search state is created
/// fresh inside `find_path` and discarded when it returns.
pub struct PathFinder<'a> {
    world: &'a World,
}

impl<'a> PathFinder<'a> {
    pub fn new(world: &'a World) -> Self {
        Self { world }
    }

    /// Find an ordered sequence of walkable points from start to goal, or
    /// `None` when no path exists under the request's constraints.
    pub fn find_path(&self, request: &PathRequest) -> Option<Vec<Point>> {
        let tile_size = self.world.tile_size();
        let tiles = self.world.tiles();
        let start = tiles.snap_to_grid(&request.start);
        let goal = tiles.snap_to_grid(&request.goal);
        let start_key = tiles.key_for(&start);
        let goal_key = tiles.key_for(&goal);

        if request.same_zone {
            let start_zone = self.world.zone_at(&start)?;
            let goal_zone = self.world.zone_at(&goal)?;
            if start_zone.name() != goal_zone.name() {
                return None;
            }
        }

        // All expansion stays inside this box.
        let bounds = Rectangle::new(
            Point::new(start.x.min(goal.x), start.y.max(goal.y)),
            Point::new(start.x.max(goal.x), start.y.min(goal.y)),
        )
        .extend(SEARCH_MARGIN);

        let mut open: PriorityQueue<GridKey, (f32, u64)> = PriorityQueue::with_capacity(64);
        let mut nodes: HashMap<GridKey, PathNode> = HashMap::new();
        let mut closed: HashSet<GridKey> = HashSet::new();
        let mut sequence: u64 = 0;

        let seed = PathNode {
            coords: start,
            cost: 0,
            parent: None,
        };
        open.enqueue(start_key, (seed.price(&goal, tile_size), sequence));
        sequence += 1;
        nodes.insert(start_key, seed);

        while let Some(current_key) = open.dequeue() {
            if closed.contains(&current_key) {
                // Stale duplicate of an already-finalized coordinate.
                continue;
            }
            let (current_coords, current_cost) = {
                let node = nodes.get(&current_key)?;
                (node.coords, node.cost)
            };

            if self.reached_goal(&current_coords, &goal, goal_key, request, tile_size) {
                return self.reconstruct(&nodes, current_key, start_key, request);
            }
            closed.insert(current_key);

            for direction in Direction::CARDINAL {
                let next = current_coords.step(direction, tile_size);
                let next_key = tiles.key_for(&next);
                if closed.contains(&next_key) || !bounds.contains(&next) {
                    continue;
                }
                if !self.is_walkable(&next, next_key, start_key, goal_key, request, tile_size) {
                    // Never worth re-examining.
                    closed.insert(next_key);
                    continue;
                }
                let cost = current_cost + 1;
                match nodes.get_mut(&next_key) {
                    Some(existing) => {
                        // Cheaper rediscovery: new parent, re-enqueue; the
                        // stale heap entry dies against the closed set.
                        if cost < existing.cost {
                            existing.cost = cost;
                            existing.parent = Some(current_key);
                            let price = existing.price(&goal, tile_size);
                            open.enqueue(next_key, (price, sequence));
                            sequence += 1;
                        }
                    }
                    None => {
                        let node = PathNode {
                            coords: next,
                            cost,
                            parent: Some(current_key),
                        };
                        open.enqueue(next_key, (node.price(&goal, tile_size), sequence));
                        sequence += 1;
                        nodes.insert(next_key, node);
                    }
                }
            }
        }

        None
    }

    fn reached_goal(
        &self,
        coords: &Point,
        goal: &Point,
        goal_key: GridKey,
        request: &PathRequest,
        tile_size: f32,
    ) -> bool {
        let key = self.world.tiles().key_for(coords);
        if key == goal_key {
            return true;
        }
        // Ending adjacent to the goal counts when the goal cell itself may
        // not be stepped onto.
        !request.through_goal && coords.manhattan_distance(goal) <= tile_size * 1.01
    }

    /// A cell is expandable iff its tile is walkable terrain, any passage
    /// over it is open, no other character's footprint overlaps it, no
    /// zone occupancy set covers its footprint, and it is not the start or
    /// goal cell unless the through-flags allow.
    fn is_walkable(
        &self,
        point: &Point,
        key: GridKey,
        start_key: GridKey,
        goal_key: GridKey,
        request: &PathRequest,
        tile_size: f32,
    ) -> bool {
        if key == start_key {
            return request.through_start;
        }
        if key == goal_key && !request.through_goal {
            return false;
        }
        match self.world.tiles().get(point) {
            Some(tile) if tile.walkable => {}
            _ => return false,
        }
        if let Some(passage) = self.world.passage_at(point) {
            if !passage.is_traversable() {
                return false;
            }
        }
        let footprint =
            Rectangle::from_center(*point, request.character_width, request.character_height);
        if self
            .world
            .is_area_occupied(&footprint, request.mover.as_deref())
        {
            return false;
        }
        for covered in footprint.points(tile_size) {
            if let Some(zone) = self.world.zone_at(&covered) {
                if !zone.is_walkable(&covered, tile_size) {
                    return false;
                }
            }
        }
        true
    }

    /// Follow parent links back to the start, reverse into forward order,
    /// apply the degenerate-length rules, then drop the start element
    /// unless `through_start`.
    fn reconstruct(
        &self,
        nodes: &HashMap<GridKey, PathNode>,
        finish: GridKey,
        start_key: GridKey,
        request: &PathRequest,
    ) -> Option<Vec<Point>> {
        let mut path = Vec::new();
        let mut cursor = Some(finish);
        while let Some(key) = cursor {
            let node = nodes.get(&key)?;
            path.push(node.coords);
            if key == start_key {
                break;
            }
            cursor = node.parent;
        }
        path.reverse();

        match path.len() {
            0 => return None,
            1 if request.through_start != request.through_goal => return None,
            2 if request.through_start && request.through_goal => return None,
            _ => {}
        }
        if !request.through_start {
            path.remove(0);
        }
        if path.is_empty() {
            return None;
        }
        Some(path)
    }
}
