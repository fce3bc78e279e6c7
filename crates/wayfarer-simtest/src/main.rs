//! Wayfarer Headless Navigation Harness
//!
//! Validates the navigation logic against the shipped map data without an
//! engine. Runs entirely in-process — no rendering, no I/O beyond stdout.
//!
//! Usage:
//!   cargo run -p wayfarer-simtest
//!   cargo run -p wayfarer-simtest -- --verbose

use wayfarer_logic::constants::SEARCH_MARGIN;
use wayfarer_logic::geometry::{Point, Rectangle};
use wayfarer_logic::map::{self, MapDefinition};
use wayfarer_logic::pathfinding::{PathFinder, PathRequest};
use wayfarer_logic::queue::PriorityQueue;
use wayfarer_logic::world::World;
use wayfarer_logic::zone::PassageState;

// ── World map (same JSON a game loader would consume) ───────────────────
const WORLD_MAP_JSON: &str = include_str!("../../../data/world_map.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Wayfarer Navigation Harness ===\n");

    let mut results = Vec::new();

    // 1. Map definition parse + build
    let definition: MapDefinition = match serde_json::from_str(WORLD_MAP_JSON) {
        Ok(d) => d,
        Err(e) => {
            println!("✗ map_parse: JSON parse error: {}", e);
            std::process::exit(1);
        }
    };
    results.extend(validate_map_build(&definition, verbose));

    let world = match map::build(&definition) {
        Ok(w) => w,
        Err(e) => {
            println!("✗ map_build: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Rectangle geometry sweep
    results.extend(validate_geometry(&world, verbose));

    // 3. Priority queue ordering
    results.extend(validate_queue(verbose));

    // 4. Zone graph consistency
    results.extend(validate_zone_graph(&world, verbose));

    // 5. Pathfinding scenarios
    results.extend(validate_pathfinding(&world, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Map build ────────────────────────────────────────────────────────

fn validate_map_build(definition: &MapDefinition, verbose: bool) -> Vec<TestResult> {
    println!("--- Map Build ---");
    let mut results = Vec::new();

    results.push(TestResult::new(
        "map_has_zones",
        definition.zones.len() >= 3,
        format!("{} zones defined", definition.zones.len()),
    ));

    match map::build(definition) {
        Ok(world) => {
            results.push(TestResult::new(
                "map_builds",
                true,
                format!(
                    "{} zones, {} passages, {} tiles",
                    world.zones().count(),
                    world.passages().count(),
                    world.tiles().len()
                ),
            ));
            let orphan_tiles = world.tiles().is_empty();
            results.push(TestResult::new(
                "map_rasterized",
                !orphan_tiles,
                if orphan_tiles {
                    "no terrain rasterized".to_string()
                } else {
                    "terrain rasterized".to_string()
                },
            ));
        }
        Err(e) => results.push(TestResult::new("map_builds", false, e.to_string())),
    }

    if verbose {
        for zone in &definition.zones {
            println!("  zone {} @ {}", zone.name, zone.area);
        }
    }
    results
}

// ── 2. Geometry ─────────────────────────────────────────────────────────

fn validate_geometry(world: &World, _verbose: bool) -> Vec<TestResult> {
    println!("--- Rectangle Geometry ---");
    let mut results = Vec::new();

    let centers_inside = world.zones().all(|z| z.area().contains(&z.area().center()));
    results.push(TestResult::new(
        "zone_centers_inside",
        centers_inside,
        "every zone contains its own center",
    ));

    let identity = world.zones().all(|z| {
        let c = z.area().center();
        z.area().closest_point(&c) == c && z.area().distance_from_point(&c) == 0.0
    });
    results.push(TestResult::new(
        "closest_point_identity",
        identity,
        "closest point of an interior point is itself",
    ));

    let hall = world.zone("hall").map(|z| *z.area());
    let court = world.zone("court").map(|z| *z.area());
    let gap_ok = match (hall, court) {
        (Some(a), Some(b)) => a.distance_from(&b) == 0.5 && !a.intersects(&b),
        _ => false,
    };
    results.push(TestResult::new(
        "wall_gap_measured",
        gap_ok,
        "hall/court separated by the wall thickness",
    ));

    results
}

// ── 3. Priority queue ───────────────────────────────────────────────────

fn validate_queue(_verbose: bool) -> Vec<TestResult> {
    println!("--- Priority Queue ---");
    let mut results = Vec::new();

    let mut queue = PriorityQueue::new();
    let mut value: u64 = 7;
    let mut inserted = Vec::new();
    for _ in 0..200 {
        value = value
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let p = (value >> 40) as u32;
        inserted.push(p);
        queue.enqueue(p, p);
    }
    inserted.sort_unstable();
    let drained: Vec<u32> = std::iter::from_fn(|| queue.dequeue()).collect();
    results.push(TestResult::new(
        "queue_sorted_drain",
        drained == inserted,
        format!("{} elements drained in non-decreasing order", drained.len()),
    ));

    let mut empty: PriorityQueue<u32, u32> = PriorityQueue::new();
    results.push(TestResult::new(
        "queue_empty_dequeue",
        empty.dequeue().is_none(),
        "empty dequeue reports None",
    ));

    results
}

// ── 4. Zone graph ───────────────────────────────────────────────────────

fn validate_zone_graph(world: &World, verbose: bool) -> Vec<TestResult> {
    println!("--- Zone Graph ---");
    let mut results = Vec::new();

    let bidirectional = world.passages().all(|p| {
        let (a, b) = p.zones();
        a != b
            && world
                .zone(a)
                .map(|z| z.exits().contains(p.name()))
                .unwrap_or(false)
            && world
                .zone(b)
                .map(|z| z.exits().contains(p.name()))
                .unwrap_or(false)
    });
    results.push(TestResult::new(
        "passages_bidirectional",
        bidirectional,
        "every passage is listed as an exit of both endpoints",
    ));

    let adjacency = world
        .zone("hall")
        .map(|z| z.neighbours().contains("court"))
        .unwrap_or(false)
        && world
            .zone("court")
            .map(|z| z.neighbours().contains("hall"))
            .unwrap_or(false);
    results.push(TestResult::new(
        "perimeter_adjacency",
        adjacency,
        "hall and court discover each other across the wall",
    ));

    results.push(TestResult::new(
        "behind_door_is_state_independent",
        world.is_behind_door("court", "garden"),
        "closed gate still counts as a door edge",
    ));

    if verbose {
        for zone in world.zones() {
            println!("  {} -> {:?}", zone.name(), zone.neighbours());
        }
    }
    results
}

// ── 5. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(world: &World, verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();
    let finder = PathFinder::new(world);

    let mut request = PathRequest::new(Point::new(1.0, 1.0), Point::new(19.0, 9.0));
    request.character_width = 0.5;
    request.character_height = 0.5;

    match finder.find_path(&request) {
        Some(path) => {
            let goal = request.goal;
            let ends_at_goal = path
                .last()
                .map(|p| p.distance(&goal) <= world.tile_size())
                .unwrap_or(false);
            results.push(TestResult::new(
                "open_door_path",
                ends_at_goal,
                format!("{} points, hall → court through the oak door", path.len()),
            ));

            let bounds = Rectangle::new(request.start, request.goal).extend(SEARCH_MARGIN);
            results.push(TestResult::new(
                "path_inside_margin_box",
                path.iter().all(|p| bounds.contains(p)),
                "every point within the bounded search box",
            ));

            let chest = Rectangle::from_center(Point::new(5.0, 5.0), 1.0, 1.0);
            results.push(TestResult::new(
                "path_avoids_chest",
                path.iter().all(|p| !chest.contains(p)),
                "static chest footprint never entered",
            ));

            let warden = world.character("warden").map(|c| c.footprint());
            results.push(TestResult::new(
                "path_avoids_warden",
                warden
                    .map(|f| path.iter().all(|p| !f.contains(p)))
                    .unwrap_or(false),
                "other character's footprint never entered",
            ));

            if verbose {
                println!("  path: {:?}", path);
            }
        }
        None => results.push(TestResult::new(
            "open_door_path",
            false,
            "no path found through the open door",
        )),
    }

    let gate_request = {
        let mut r = PathRequest::new(Point::new(12.0, 2.0), Point::new(29.0, 5.0));
        r.character_width = 0.5;
        r.character_height = 0.5;
        r
    };
    results.push(TestResult::new(
        "closed_gate_blocks",
        finder.find_path(&gate_request).is_none(),
        "court → garden fails while the iron gate is closed",
    ));

    let mut opened = world.clone();
    if opened
        .set_passage_state("iron-gate", PassageState::Open)
        .is_ok()
    {
        let finder = PathFinder::new(&opened);
        results.push(TestResult::new(
            "opened_gate_routes",
            finder.find_path(&gate_request).is_some(),
            "court → garden succeeds once the gate opens",
        ));
    }

    let p = Point::new(3.0, 2.0);
    let mut self_request = PathRequest::new(p, p);
    self_request.through_start = true;
    self_request.through_goal = true;
    results.push(TestResult::new(
        "self_path_single_point",
        finder.find_path(&self_request) == Some(vec![p]),
        "p → p with both through-flags yields [p]",
    ));

    let mut mismatch = PathRequest::new(Point::new(1.0, 1.0), Point::new(19.0, 9.0));
    mismatch.same_zone = true;
    results.push(TestResult::new(
        "same_zone_mismatch",
        finder.find_path(&mismatch).is_none(),
        "same-zone request across zones reports no path",
    ));

    results
}
