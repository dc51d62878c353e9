//! Pathfinder Tests - Costs, Turn Budget, and Passability
//!
//! Tests for the A* search: optimal distances under the movement cost model,
//! the turn-forfeit rule, impassable edges, and search-state reuse across
//! consecutive searches.

use hex_map_engine::{HexCoordinates, HexDirection, HexGrid, MapConfig, Pathfinder};

fn grid(x: i32, z: i32) -> HexGrid {
    let mut grid = HexGrid::new(MapConfig::default());
    assert!(grid.create_map(x, z));
    grid
}

fn at(grid: &HexGrid, x: i32, z: i32) -> u32 {
    grid.cell_index_at(HexCoordinates::from_offset(x, z)).unwrap()
}

// ============================================================================
// Basic Costs and Optimality
// ============================================================================

#[test]
fn test_flat_path_costs_five_per_step() {
    let grid = grid(5, 5);
    let mut pathfinder = Pathfinder::new();

    let from = at(&grid, 0, 0);
    let to = at(&grid, 3, 0);
    assert!(pathfinder.find_path(&grid, from, to, 24));

    // Three flat moves of cost 5 fit in one 24-point turn.
    assert_eq!(pathfinder.distance(to), Some(15));
    let path = pathfinder.path();
    assert_eq!(path.len(), 4);
    assert_eq!(path.first(), Some(&from));
    assert_eq!(path.last(), Some(&to));
    assert_eq!(pathfinder.arrival_turn(to, 24), Some(0));
}

#[test]
fn test_path_steps_are_adjacent() {
    let grid = grid(10, 10);
    let mut pathfinder = Pathfinder::new();
    let from = at(&grid, 1, 1);
    let to = at(&grid, 7, 6);
    assert!(pathfinder.find_path(&grid, from, to, 24));

    let path = pathfinder.path();
    for pair in path.windows(2) {
        let step = grid
            .cell(pair[0])
            .coordinates()
            .distance_to(grid.cell(pair[1]).coordinates());
        assert_eq!(step, 1, "path must move one hex at a time");
    }
}

#[test]
fn test_slope_costs_ten() {
    let mut grid = grid(5, 5);
    let to = at(&grid, 1, 0);
    grid.set_elevation(to, 1);

    let mut pathfinder = Pathfinder::new();
    assert!(pathfinder.find_path(&grid, at(&grid, 0, 0), to, 24));
    assert_eq!(pathfinder.distance(to), Some(10));
}

#[test]
fn test_feature_levels_add_friction() {
    let mut grid = grid(5, 5);
    let to = at(&grid, 1, 0);
    grid.set_urban_level(to, 2);
    grid.set_plant_level(to, 1);

    let mut pathfinder = Pathfinder::new();
    assert!(pathfinder.find_path(&grid, at(&grid, 0, 0), to, 24));
    assert_eq!(pathfinder.distance(to), Some(8));
}

#[test]
fn test_road_costs_one_regardless_of_slope() {
    let mut grid = grid(5, 5);
    let from = at(&grid, 0, 0);
    let to = at(&grid, 1, 0);
    grid.set_elevation(to, 1);
    grid.add_road(from, HexDirection::E);

    let mut pathfinder = Pathfinder::new();
    assert!(pathfinder.find_path(&grid, from, to, 24));
    assert_eq!(pathfinder.distance(to), Some(1));
}

#[test]
fn test_search_prefers_cheap_detour() {
    let mut grid = grid(5, 5);
    let from = at(&grid, 0, 0);
    let to = at(&grid, 2, 0);
    // Make the direct middle cell expensive.
    grid.set_urban_level(at(&grid, 1, 0), 3);
    grid.set_farm_level(at(&grid, 1, 0), 3);
    grid.set_plant_level(at(&grid, 1, 0), 3);

    let mut pathfinder = Pathfinder::new();
    assert!(pathfinder.find_path(&grid, from, to, 100));
    // Three flat steps through the row above (15) beat the direct route,
    // which pays 5 + 9 friction entering the middle cell (19 total).
    assert_eq!(pathfinder.distance(to), Some(15));
    assert!(!pathfinder.path().contains(&at(&grid, 1, 0)));
}

// ============================================================================
// Turn Budget
// ============================================================================

#[test]
fn test_turn_boundary_forfeits_leftover_points() {
    let grid = grid(5, 5);
    let mut pathfinder = Pathfinder::new();
    let from = at(&grid, 0, 0);
    let to = at(&grid, 3, 0);

    // Speed 7: the second and third moves each start a new turn, forfeiting
    // the two leftover points: 5, then 7+5, then 14+5.
    assert!(pathfinder.find_path(&grid, from, to, 7));
    assert_eq!(pathfinder.distance(to), Some(19));
    assert_eq!(pathfinder.arrival_turn(to, 7), Some(2));
    assert_eq!(pathfinder.arrival_turn(at(&grid, 1, 0), 7), Some(0));
}

#[test]
fn test_exact_budget_boundary_starts_new_turn() {
    let grid = grid(5, 5);
    let mut pathfinder = Pathfinder::new();
    let to = at(&grid, 2, 0);

    // Spending the full 10-point budget counts as crossing into turn 1, so
    // the second move is re-charged from the turn boundary: 10 + 5.
    assert!(pathfinder.find_path(&grid, at(&grid, 0, 0), to, 10));
    assert_eq!(pathfinder.distance(to), Some(15));
    assert_eq!(pathfinder.arrival_turn(to, 10), Some(1));
}

// ============================================================================
// Passability
// ============================================================================

#[test]
fn test_cliff_wall_blocks_all_routes() {
    let mut grid = grid(5, 5);
    // Raise the middle column into a cliff across the whole map.
    for z in 0..5 {
        grid.set_elevation(at(&grid, 2, z), 3);
    }

    let mut pathfinder = Pathfinder::new();
    let found = pathfinder.find_path(&grid, at(&grid, 0, 2), at(&grid, 4, 2), 24);
    assert!(!found, "cliff column must be impassable");
    assert!(!pathfinder.has_path());
    assert!(pathfinder.path().is_empty());
}

#[test]
fn test_underwater_cells_are_impassable() {
    let mut grid = grid(5, 5);
    for z in 0..5 {
        grid.set_water_level(at(&grid, 2, z), 1);
    }

    let mut pathfinder = Pathfinder::new();
    assert!(!pathfinder.find_path(&grid, at(&grid, 0, 2), at(&grid, 4, 2), 24));
}

#[test]
fn test_occupied_cells_are_impassable() {
    let mut grid = grid(5, 5);
    for z in 0..5 {
        grid.add_unit(at(&grid, 2, z), 0.0).unwrap();
    }

    let mut pathfinder = Pathfinder::new();
    assert!(!pathfinder.find_path(&grid, at(&grid, 0, 2), at(&grid, 4, 2), 24));
}

#[test]
fn test_wall_boundary_blocks_movement() {
    let mut grid = grid(5, 5);
    let from = at(&grid, 0, 0);
    let to = at(&grid, 1, 0);
    // Wall around the destination only; crossing a one-sided wall is
    // forbidden everywhere, so the goal is unreachable.
    grid.set_walled(to, true);

    let mut pathfinder = Pathfinder::new();
    assert!(!pathfinder.find_path(&grid, from, to, 24));
}

#[test]
fn test_road_passes_through_wall_boundary() {
    let mut grid = grid(5, 5);
    let from = at(&grid, 0, 0);
    let to = at(&grid, 1, 0);
    grid.set_walled(to, true);
    grid.add_road(from, HexDirection::E);

    let mut pathfinder = Pathfinder::new();
    assert!(pathfinder.find_path(&grid, from, to, 24));
    assert_eq!(pathfinder.distance(to), Some(1));
}

#[test]
fn test_walled_interior_is_traversable() {
    let mut grid = grid(5, 5);
    // Both sides walled: no boundary, normal movement.
    let from = at(&grid, 0, 0);
    let to = at(&grid, 1, 0);
    grid.set_walled(from, true);
    grid.set_walled(to, true);

    let mut pathfinder = Pathfinder::new();
    assert!(pathfinder.find_path(&grid, from, to, 24));
    assert_eq!(pathfinder.distance(to), Some(5));
}

// ============================================================================
// Search Lifecycle
// ============================================================================

#[test]
fn test_no_path_before_any_search() {
    let pathfinder = Pathfinder::new();
    assert!(!pathfinder.has_path());
    assert!(pathfinder.path().is_empty());
}

#[test]
fn test_new_search_supersedes_previous() {
    let grid = grid(10, 10);
    let mut pathfinder = Pathfinder::new();

    assert!(pathfinder.find_path(&grid, at(&grid, 0, 0), at(&grid, 9, 9), 24));
    let long = pathfinder.path().len();

    assert!(pathfinder.find_path(&grid, at(&grid, 0, 0), at(&grid, 2, 0), 24));
    let path = pathfinder.path();
    assert_eq!(path.len(), 3);
    assert!(path.len() < long);
    assert_eq!(pathfinder.distance(at(&grid, 2, 0)), Some(10));
}

#[test]
fn test_clear_path_resets_result() {
    let grid = grid(5, 5);
    let mut pathfinder = Pathfinder::new();
    assert!(pathfinder.find_path(&grid, at(&grid, 0, 0), at(&grid, 3, 0), 24));

    pathfinder.clear_path();
    assert!(!pathfinder.has_path());
    assert!(pathfinder.path().is_empty());
}

#[test]
fn test_degenerate_inputs_fail_cleanly() {
    let grid = grid(5, 5);
    let mut pathfinder = Pathfinder::new();
    assert!(!pathfinder.find_path(&grid, 0, 9999, 24));
    assert!(!pathfinder.find_path(&grid, 9999, 0, 24));
    assert!(!pathfinder.find_path(&grid, 0, 3, 0));
}

#[test]
fn test_path_to_self() {
    let grid = grid(5, 5);
    let mut pathfinder = Pathfinder::new();
    assert!(pathfinder.find_path(&grid, 7, 7, 24));
    assert_eq!(pathfinder.path(), vec![7]);
    assert_eq!(pathfinder.distance(7), Some(0));
}
