//! Triangulation Tests - Layer Emission and Rebuild Scheduling
//!
//! Tests for the chunk triangulator: which geometry layers appear for which
//! cell states, buffer channel consistency, determinism, and the dirty-chunk
//! rebuild flow.

use hex_map_engine::{
    ChunkMesh, ChunkTriangulator, HexCoordinates, HexDirection, HexGrid, MapConfig,
};

fn grid(x: i32, z: i32) -> HexGrid {
    let mut grid = HexGrid::new(MapConfig::default());
    assert!(grid.create_map(x, z));
    grid
}

fn at(grid: &HexGrid, x: i32, z: i32) -> u32 {
    grid.cell_index_at(HexCoordinates::from_offset(x, z)).unwrap()
}

fn triangulate_all(grid: &HexGrid) -> Vec<ChunkMesh> {
    (0..grid.chunk_count())
        .map(|c| ChunkTriangulator::new(grid).triangulate(c))
        .collect()
}

// ============================================================================
// Terrain Layer
// ============================================================================

#[test]
fn test_flat_map_emits_only_terrain() {
    let grid = grid(5, 5);
    let mesh = ChunkTriangulator::new(&grid).triangulate(0);

    assert!(!mesh.terrain.is_empty());
    assert!(mesh.rivers.is_empty());
    assert!(mesh.roads.is_empty());
    assert!(mesh.water.is_empty());
    assert!(mesh.water_shore.is_empty());
    assert!(mesh.estuaries.is_empty());
    assert!(mesh.walls.is_empty());
}

#[test]
fn test_terrain_channels_are_consistent() {
    let mut grid = grid(5, 5);
    // Mix elevations so strips, terraces, and corners all appear.
    grid.set_elevation(at(&grid, 1, 1), 1);
    grid.set_elevation(at(&grid, 3, 3), 2);
    grid.set_elevation(at(&grid, 2, 3), 4);

    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    let n = mesh.terrain.vertex_count();
    assert!(n > 0);
    assert_eq!(mesh.terrain.colors.len(), n, "one splat weight per vertex");
    assert_eq!(mesh.terrain.terrain_types.len(), n, "one type triple per vertex");
    assert_eq!(mesh.terrain.indices.len() % 3, 0);
    assert!(mesh
        .terrain
        .indices
        .iter()
        .all(|&i| (i as usize) < n), "indices stay in bounds");

    let buffer = mesh.terrain.vertex_buffer();
    assert_eq!(buffer.len(), n);
}

#[test]
fn test_flat_chunk_triangle_count() {
    let grid = grid(5, 5);
    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    // Every cell fans 4 triangles per direction; flat connections add one
    // 4-quad strip per shared edge and one triangle per shared corner.
    // 20 horizontal pairs plus 9 links across each of the 4 row boundaries.
    let cells = 25;
    let edges = 56;
    let corners = 32;
    let expected = cells * 24 + edges * 8 + corners;
    assert_eq!(mesh.terrain.triangle_count(), expected);
}

#[test]
fn test_triangulation_is_deterministic() {
    let grid = grid(5, 5);
    let a = ChunkTriangulator::new(&grid).triangulate(0);
    let b = ChunkTriangulator::new(&grid).triangulate(0);
    assert_eq!(a.terrain.positions, b.terrain.positions);
    assert_eq!(a.terrain.indices, b.terrain.indices);
}

#[test]
fn test_terraces_emit_more_geometry_than_flat() {
    let flat = grid(5, 5);
    let flat_mesh = ChunkTriangulator::new(&flat).triangulate(0);

    let mut sloped = grid(5, 5);
    sloped.set_elevation(at(&sloped, 2, 2), 1);
    let sloped_mesh = ChunkTriangulator::new(&sloped).triangulate(0);

    // Slope edges become terraced staircases of strips.
    assert!(sloped_mesh.terrain.triangle_count() > flat_mesh.terrain.triangle_count());
}

// ============================================================================
// Water Layers
// ============================================================================

#[test]
fn test_submerged_map_emits_open_water() {
    let mut grid = grid(5, 5);
    for i in 0..grid.cell_count() as u32 {
        grid.set_water_level(i, 1);
    }
    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    assert!(!mesh.water.is_empty());
    // No dry neighbors anywhere, so no shoreline.
    assert!(mesh.water_shore.is_empty());
    assert!(mesh.estuaries.is_empty());
}

#[test]
fn test_island_emits_shoreline() {
    let mut grid = grid(5, 5);
    for i in 0..grid.cell_count() as u32 {
        grid.set_water_level(i, 1);
    }
    // One dry cell in the middle.
    grid.set_elevation(at(&grid, 2, 2), 1);

    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    assert!(!mesh.water.is_empty());
    assert!(!mesh.water_shore.is_empty());
    let n = mesh.water_shore.vertex_count();
    assert_eq!(mesh.water_shore.uvs.len(), n, "shore UVs per vertex");
}

// ============================================================================
// Rivers
// ============================================================================

fn river_grid() -> HexGrid {
    let mut grid = grid(5, 5);
    // A short river flowing east along the middle row.
    let a = at(&grid, 1, 2);
    let b = at(&grid, 2, 2);
    grid.set_outgoing_river(a, HexDirection::E);
    grid.set_outgoing_river(b, HexDirection::E);
    grid
}

#[test]
fn test_river_emits_surface_quads() {
    let grid = river_grid();
    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    assert!(!mesh.rivers.is_empty());
    let n = mesh.rivers.vertex_count();
    assert_eq!(mesh.rivers.uvs.len(), n, "flow UVs per river vertex");
}

#[test]
fn test_river_into_water_emits_estuary() {
    let mut grid = grid(5, 5);
    let source = at(&grid, 1, 2);
    let mouth = at(&grid, 2, 2);
    grid.set_elevation(source, 1);
    grid.set_water_level(mouth, 1);
    grid.set_outgoing_river(source, HexDirection::E);

    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    assert!(!mesh.estuaries.is_empty());
    let n = mesh.estuaries.vertex_count();
    assert_eq!(mesh.estuaries.uvs.len(), n);
    assert_eq!(mesh.estuaries.uv2s.len(), n, "estuaries carry flow UV2s");
}

// ============================================================================
// Roads
// ============================================================================

#[test]
fn test_road_emits_overlay() {
    let mut grid = grid(5, 5);
    grid.add_road(at(&grid, 1, 2), HexDirection::E);
    grid.add_road(at(&grid, 2, 2), HexDirection::E);

    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    assert!(!mesh.roads.is_empty());
    let n = mesh.roads.vertex_count();
    assert_eq!(mesh.roads.uvs.len(), n);
}

// ============================================================================
// Walls
// ============================================================================

#[test]
fn test_walled_cell_grows_walls() {
    let mut grid = grid(5, 5);
    grid.set_walled(at(&grid, 2, 2), true);

    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    assert!(!mesh.walls.is_empty());
}

#[test]
fn test_no_walls_without_boundary() {
    let mut grid = grid(5, 5);
    // Everything walled: no walled/unwalled boundary anywhere.
    for i in 0..grid.cell_count() as u32 {
        grid.set_walled(i, true);
    }
    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    assert!(mesh.walls.is_empty());
}

#[test]
fn test_cliffs_interrupt_walls() {
    let mut grid = grid(5, 5);
    let i = at(&grid, 2, 2);
    grid.set_walled(i, true);
    grid.set_elevation(i, 3);

    // Every edge of the walled cell is a cliff; no wall can stand.
    let mesh = ChunkTriangulator::new(&grid).triangulate(0);
    assert!(mesh.walls.is_empty());
}

// ============================================================================
// Rebuild Scheduling
// ============================================================================

#[test]
fn test_rebuild_dirty_covers_fresh_map_once() {
    let mut grid = grid(10, 10);
    let rebuilt = grid.rebuild_dirty();
    assert_eq!(rebuilt.len(), 4, "a fresh map rebuilds every chunk");
    assert!(grid.rebuild_dirty().is_empty(), "flags clear after rebuild");
}

#[test]
fn test_edit_marks_owning_chunk() {
    let mut grid = grid(10, 10);
    grid.rebuild_dirty();

    // Offset (2, 2) sits inside chunk 0, away from chunk borders.
    grid.set_elevation(at(&grid, 2, 2), 1);
    let rebuilt = grid.rebuild_dirty();
    assert_eq!(rebuilt.len(), 1);
    assert_eq!(rebuilt[0].0, 0);
}

#[test]
fn test_border_edit_marks_neighbor_chunks() {
    let mut grid = grid(10, 10);
    grid.rebuild_dirty();

    // Offset (4, 2) touches the chunk to its east.
    grid.set_elevation(at(&grid, 4, 2), 1);
    let rebuilt = grid.rebuild_dirty();
    let chunks: Vec<usize> = rebuilt.iter().map(|(c, _)| *c).collect();
    assert!(chunks.contains(&0));
    assert!(chunks.contains(&1));
}

#[test]
fn test_coalesced_edits_rebuild_once() {
    let mut grid = grid(10, 10);
    grid.rebuild_dirty();

    let i = at(&grid, 2, 2);
    grid.set_elevation(i, 1);
    grid.set_terrain_type_index(i, 2);
    grid.set_urban_level(i, 1);
    assert_eq!(grid.rebuild_dirty().len(), 1);
}

#[test]
fn test_all_chunks_cover_all_cells() {
    let grid = grid(10, 10);
    let meshes = triangulate_all(&grid);
    assert_eq!(meshes.len(), 4);
    for mesh in &meshes {
        assert!(!mesh.terrain.is_empty());
    }
}
