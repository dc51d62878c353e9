//! Chunk Triangulation
//!
//! Turns cell state into watertight triangle geometry, one chunk at a time.
//! Each cell emits a fan (or river/water variant) for each of its six
//! directions; connection strips are emitted for the first three directions
//! only and corner triangles for the first two, so every shared edge and
//! every three-cell corner is built exactly once.
//!
//! Terrain triangles carry splat blend weights plus a per-vertex terrain
//! type channel; the three weight constants identify which of a triangle's
//! up-to-three source cells each vertex belongs to.
//!
//! Submodules: river-meets-water and open water surfaces in `water`, road
//! overlays in `roads`, wall extrusion in `walls`.

mod roads;
mod walls;
mod water;

use glam::Vec3;

use crate::grid::HexGrid;
use crate::hex::{EdgeVertices, HexDirection, HexEdgeType, HexMetrics};
use crate::mesh::MeshData;

/// Splat weight of the triangle's first source cell.
const WEIGHTS1: Vec3 = Vec3::new(1.0, 0.0, 0.0);
/// Splat weight of the second source cell.
const WEIGHTS2: Vec3 = Vec3::new(0.0, 1.0, 0.0);
/// Splat weight of the third source cell.
const WEIGHTS3: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// All geometry layers of one rebuilt chunk.
#[derive(Default)]
pub struct ChunkMesh {
    pub terrain: MeshData,
    pub rivers: MeshData,
    pub roads: MeshData,
    pub water: MeshData,
    pub water_shore: MeshData,
    pub estuaries: MeshData,
    pub walls: MeshData,
}

/// One-shot emitter: borrow the grid, triangulate a chunk, hand back the
/// buffers. Holds no state between rebuilds.
pub struct ChunkTriangulator<'a> {
    grid: &'a HexGrid,
    metrics: &'a HexMetrics,
    terrain: MeshData,
    rivers: MeshData,
    roads: MeshData,
    water: MeshData,
    water_shore: MeshData,
    estuaries: MeshData,
    walls: MeshData,
}

impl<'a> ChunkTriangulator<'a> {
    pub fn new(grid: &'a HexGrid) -> ChunkTriangulator<'a> {
        ChunkTriangulator {
            grid,
            metrics: grid.metrics(),
            terrain: MeshData::new(),
            rivers: MeshData::new(),
            roads: MeshData::new(),
            water: MeshData::new(),
            water_shore: MeshData::new(),
            estuaries: MeshData::new(),
            walls: MeshData::new(),
        }
    }

    /// Regenerate every layer of one chunk from scratch.
    pub fn triangulate(mut self, chunk: usize) -> ChunkMesh {
        for cell in self.grid.chunk_cells(chunk) {
            self.triangulate_cell(cell);
        }
        ChunkMesh {
            terrain: self.terrain,
            rivers: self.rivers,
            roads: self.roads,
            water: self.water,
            water_shore: self.water_shore,
            estuaries: self.estuaries,
            walls: self.walls,
        }
    }

    fn triangulate_cell(&mut self, cell: u32) {
        for d in HexDirection::ALL {
            self.triangulate_direction(d, cell);
        }
    }

    fn triangulate_direction(&mut self, direction: HexDirection, cell: u32) {
        let grid = self.grid;
        let m = self.metrics;
        let c = grid.cell(cell);
        let center = c.position();
        let mut e = EdgeVertices::new(
            center + m.first_solid_corner(direction),
            center + m.second_solid_corner(direction),
        );

        if c.has_river() {
            if c.has_river_through_edge(direction) {
                e.v3.y = c.stream_bed_y(m);
                if c.has_river_begin_or_end() {
                    self.triangulate_with_river_begin_or_end(direction, cell, center, &e);
                } else {
                    self.triangulate_with_river(direction, cell, center, &e);
                }
            } else {
                self.triangulate_adjacent_to_river(direction, cell, center, &e);
            }
        } else {
            self.triangulate_without_river(direction, cell, center, &e);
        }

        // One connection strip per shared edge.
        if direction.index() <= HexDirection::SE.index() {
            self.triangulate_connection(cell, direction, &e);
        }

        if c.is_underwater() {
            self.triangulate_water(direction, cell, center);
        }
    }

    fn triangulate_without_river(
        &mut self,
        direction: HexDirection,
        cell: u32,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let c = self.grid.cell(cell);
        self.triangulate_edge_fan(center, e, c.terrain_type_index() as f32);

        if c.has_roads() {
            let interpolators = self.road_interpolators(direction, cell);
            self.triangulate_road(
                center,
                center.lerp(e.v1, interpolators.x),
                center.lerp(e.v5, interpolators.y),
                e,
                c.has_road_through_edge(direction),
            );
        }
    }

    /// River flowing through the middle of the cell: the center line is bent
    /// toward the river's course and the channel carved between two half
    /// strips.
    fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        cell: u32,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;
        let c = self.grid.cell(cell);
        let t = c.terrain_type_index() as f32;

        let center_l;
        let center_r;
        if c.has_river_through_edge(direction.opposite()) {
            // Straight channel: widen the center into a line.
            center_l = center + m.first_solid_corner(direction.previous()) * 0.25;
            center_r = center + m.second_solid_corner(direction.next()) * 0.25;
        } else if c.has_river_through_edge(direction.next()) {
            center_l = center;
            center_r = center.lerp(e.v5, 2.0 / 3.0);
        } else if c.has_river_through_edge(direction.previous()) {
            center_l = center.lerp(e.v1, 2.0 / 3.0);
            center_r = center;
        } else if c.has_river_through_edge(direction.next2()) {
            center_l = center;
            center_r = center + m.solid_edge_middle(direction.next()) * (0.5 * m.inner_to_outer);
        } else {
            center_l = center + m.solid_edge_middle(direction.previous()) * (0.5 * m.inner_to_outer);
            center_r = center;
        }
        let mut center = center_l.lerp(center_r, 0.5);

        let mut middle = EdgeVertices::with_outer_step(
            center_l.lerp(e.v1, 0.5),
            center_r.lerp(e.v5, 0.5),
            1.0 / 6.0,
        );
        middle.v3.y = e.v3.y;
        center.y = e.v3.y;

        self.triangulate_edge_strip(&middle, WEIGHTS1, t, e, WEIGHTS1, t, false);

        self.terrain.add_triangle(m, center_l, middle.v1, middle.v2);
        self.terrain.add_triangle(m, center_r, middle.v4, middle.v5);
        self.terrain.add_quad(m, center_l, center, middle.v2, middle.v3);
        self.terrain.add_quad(m, center, center_r, middle.v3, middle.v4);

        self.terrain.add_triangle_color(WEIGHTS1);
        self.terrain.add_triangle_color(WEIGHTS1);
        self.terrain.add_quad_color(WEIGHTS1);
        self.terrain.add_quad_color(WEIGHTS1);

        let types = Vec3::splat(t);
        self.terrain.add_triangle_terrain_types(types);
        self.terrain.add_triangle_terrain_types(types);
        self.terrain.add_quad_terrain_types(types);
        self.terrain.add_quad_terrain_types(types);

        if !c.is_underwater() {
            let reversed = c.incoming_river() == Some(direction);
            let surface = c.river_surface_y(m);
            self.triangulate_river_quad(
                center_l, center_r, middle.v2, middle.v4, surface, 0.4, reversed,
            );
            self.triangulate_river_quad(
                middle.v2, middle.v4, e.v2, e.v4, surface, 0.6, reversed,
            );
        }
    }

    /// Source or sink of a river: the channel fans out from the cell center.
    fn triangulate_with_river_begin_or_end(
        &mut self,
        _direction: HexDirection,
        cell: u32,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;
        let c = self.grid.cell(cell);
        let t = c.terrain_type_index() as f32;

        let mut middle = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        middle.v3.y = e.v3.y;

        self.triangulate_edge_strip(&middle, WEIGHTS1, t, e, WEIGHTS1, t, false);
        self.triangulate_edge_fan(center, &middle, t);

        if !c.is_underwater() {
            let reversed = c.incoming_river().is_some();
            let surface = c.river_surface_y(m);
            self.triangulate_river_quad(middle.v2, middle.v4, e.v2, e.v4, surface, 0.6, reversed);

            let mut center = center;
            let mut v2 = middle.v2;
            let mut v4 = middle.v4;
            center.y = surface;
            v2.y = surface;
            v4.y = surface;
            self.rivers.add_triangle(m, center, v2, v4);
            if reversed {
                self.rivers.add_triangle_uv(
                    glam::Vec2::new(0.5, 0.4),
                    glam::Vec2::new(1.0, 0.2),
                    glam::Vec2::new(0.0, 0.2),
                );
            } else {
                self.rivers.add_triangle_uv(
                    glam::Vec2::new(0.5, 0.4),
                    glam::Vec2::new(0.0, 0.6),
                    glam::Vec2::new(1.0, 0.6),
                );
            }
        }
    }

    /// Cell has a river, but not through this edge: the center shifts away
    /// from the channel so the fan does not cut into it.
    fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: u32,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;
        let c = self.grid.cell(cell);

        if c.has_roads() {
            self.triangulate_road_adjacent_to_river(direction, cell, center, e);
        }

        let mut center = center;
        if c.has_river_through_edge(direction.next()) {
            if c.has_river_through_edge(direction.previous()) {
                // Inside of a curve.
                center += m.solid_edge_middle(direction) * (m.inner_to_outer * 0.5);
            } else if c.has_river_through_edge(direction.previous2()) {
                // Alongside a straight channel.
                center += m.first_solid_corner(direction) * 0.25;
            }
        } else if c.has_river_through_edge(direction.previous())
            && c.has_river_through_edge(direction.next2())
        {
            center += m.second_solid_corner(direction) * 0.25;
        }

        let middle = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        let t = c.terrain_type_index() as f32;

        self.triangulate_edge_strip(&middle, WEIGHTS1, t, e, WEIGHTS1, t, false);
        self.triangulate_edge_fan(center, &middle, t);
    }

    // ------------------------------------------------------------------
    // Fans, strips, terraces
    // ------------------------------------------------------------------

    /// Fan of four triangles between a center point and an edge.
    fn triangulate_edge_fan(&mut self, center: Vec3, edge: &EdgeVertices, terrain_type: f32) {
        let m = self.metrics;
        self.terrain.add_triangle(m, center, edge.v1, edge.v2);
        self.terrain.add_triangle(m, center, edge.v2, edge.v3);
        self.terrain.add_triangle(m, center, edge.v3, edge.v4);
        self.terrain.add_triangle(m, center, edge.v4, edge.v5);

        for _ in 0..4 {
            self.terrain.add_triangle_color(WEIGHTS1);
            self.terrain
                .add_triangle_terrain_types(Vec3::splat(terrain_type));
        }
    }

    /// Strip of four quads between two edges.
    #[allow(clippy::too_many_arguments)]
    fn triangulate_edge_strip(
        &mut self,
        e1: &EdgeVertices,
        w1: Vec3,
        type1: f32,
        e2: &EdgeVertices,
        w2: Vec3,
        type2: f32,
        has_road: bool,
    ) {
        let m = self.metrics;
        self.terrain.add_quad(m, e1.v1, e1.v2, e2.v1, e2.v2);
        self.terrain.add_quad(m, e1.v2, e1.v3, e2.v2, e2.v3);
        self.terrain.add_quad(m, e1.v3, e1.v4, e2.v3, e2.v4);
        self.terrain.add_quad(m, e1.v4, e1.v5, e2.v4, e2.v5);

        let types = Vec3::new(type1, type2, type1);
        for _ in 0..4 {
            self.terrain.add_quad_color2(w1, w2);
            self.terrain.add_quad_terrain_types(types);
        }

        if has_road {
            self.triangulate_road_segment(e1.v2, e1.v3, e1.v4, e2.v2, e2.v3, e2.v4);
        }
    }

    /// Fill the blend region between a cell and its neighbor across one
    /// edge, then the corner triangle shared with the next neighbor.
    fn triangulate_connection(&mut self, cell: u32, direction: HexDirection, e1: &EdgeVertices) {
        let grid = self.grid;
        let m = self.metrics;
        let c = grid.cell(cell);
        let Some(neighbor_index) = c.neighbor(direction) else {
            return;
        };
        let neighbor = grid.cell(neighbor_index);

        let mut bridge = m.bridge(direction);
        bridge.y = neighbor.position().y - c.position().y;
        let mut e2 = EdgeVertices::new(e1.v1 + bridge, e1.v5 + bridge);

        let has_river = c.has_river_through_edge(direction);
        let has_road = c.has_road_through_edge(direction);

        if has_river {
            e2.v3.y = neighbor.stream_bed_y(m);
            if !c.is_underwater() {
                if !neighbor.is_underwater() {
                    self.triangulate_river_quad2(
                        e1.v2,
                        e1.v4,
                        e2.v2,
                        e2.v4,
                        c.river_surface_y(m),
                        neighbor.river_surface_y(m),
                        0.8,
                        c.incoming_river() == Some(direction),
                    );
                } else if c.elevation() > neighbor.water_level() {
                    self.triangulate_waterfall_in_water(
                        e1.v2,
                        e1.v4,
                        e2.v2,
                        e2.v4,
                        c.river_surface_y(m),
                        neighbor.river_surface_y(m),
                        neighbor.water_surface_y(m),
                    );
                }
            } else if !neighbor.is_underwater() && neighbor.elevation() > c.water_level() {
                // Waterfall falling toward this cell's water.
                self.triangulate_waterfall_in_water(
                    e2.v4,
                    e2.v2,
                    e1.v4,
                    e1.v2,
                    neighbor.river_surface_y(m),
                    c.river_surface_y(m),
                    c.water_surface_y(m),
                );
            }
        }

        if grid.edge_type_between(cell, neighbor_index) == HexEdgeType::Slope {
            self.triangulate_edge_terraces(e1, cell, &e2, neighbor_index, has_road);
        } else {
            self.triangulate_edge_strip(
                e1,
                WEIGHTS1,
                c.terrain_type_index() as f32,
                &e2,
                WEIGHTS2,
                neighbor.terrain_type_index() as f32,
                has_road,
            );
        }

        self.add_wall_edge(e1, cell, &e2, neighbor_index, has_river, has_road);

        // Corner triangle between this cell, the neighbor, and the next one.
        if direction.index() <= HexDirection::E.index() {
            if let Some(next_index) = c.neighbor(direction.next()) {
                let next_neighbor = grid.cell(next_index);
                let mut v5 = e1.v5 + m.bridge(direction.next());
                v5.y = next_neighbor.position().y;

                // Orient the corner around its lowest cell.
                if c.elevation() <= neighbor.elevation() {
                    if c.elevation() <= next_neighbor.elevation() {
                        self.triangulate_corner(
                            e1.v5,
                            cell,
                            e2.v5,
                            neighbor_index,
                            v5,
                            next_index,
                        );
                    } else {
                        self.triangulate_corner(
                            v5,
                            next_index,
                            e1.v5,
                            cell,
                            e2.v5,
                            neighbor_index,
                        );
                    }
                } else if neighbor.elevation() <= next_neighbor.elevation() {
                    self.triangulate_corner(e2.v5, neighbor_index, v5, next_index, e1.v5, cell);
                } else {
                    self.triangulate_corner(v5, next_index, e1.v5, cell, e2.v5, neighbor_index);
                }
            }
        }
    }

    /// Slope connection rendered as a staircase of strips.
    fn triangulate_edge_terraces(
        &mut self,
        begin: &EdgeVertices,
        begin_cell: u32,
        end: &EdgeVertices,
        end_cell: u32,
        has_road: bool,
    ) {
        let m = self.metrics;
        let t1 = self.grid.cell(begin_cell).terrain_type_index() as f32;
        let t2 = self.grid.cell(end_cell).terrain_type_index() as f32;

        let mut e2 = m.terrace_lerp_edge(begin, end, 1);
        let mut w2 = m.terrace_lerp_color(WEIGHTS1, WEIGHTS2, 1);

        self.triangulate_edge_strip(begin, WEIGHTS1, t1, &e2, w2, t2, has_road);

        for step in 2..m.terrace_steps {
            let e1 = e2;
            let w1 = w2;
            e2 = m.terrace_lerp_edge(begin, end, step);
            w2 = m.terrace_lerp_color(WEIGHTS1, WEIGHTS2, step);
            self.triangulate_edge_strip(&e1, w1, t1, &e2, w2, t2, has_road);
        }

        self.triangulate_edge_strip(&e2, w2, t1, end, WEIGHTS2, t2, has_road);
    }

    // ------------------------------------------------------------------
    // Corners
    // ------------------------------------------------------------------

    /// Fill the triangle where three cells meet. `bottom` is the lowest
    /// cell; the pair of edge types against it picks one of four fill
    /// strategies.
    fn triangulate_corner(
        &mut self,
        bottom: Vec3,
        bottom_cell: u32,
        left: Vec3,
        left_cell: u32,
        right: Vec3,
        right_cell: u32,
    ) {
        let grid = self.grid;
        let left_edge = grid.edge_type_between(bottom_cell, left_cell);
        let right_edge = grid.edge_type_between(bottom_cell, right_cell);

        if left_edge == HexEdgeType::Slope {
            if right_edge == HexEdgeType::Slope {
                self.triangulate_corner_terraces(bottom, bottom_cell, left, left_cell, right, right_cell);
            } else if right_edge == HexEdgeType::Flat {
                self.triangulate_corner_terraces(left, left_cell, right, right_cell, bottom, bottom_cell);
            } else {
                self.triangulate_corner_terraces_cliff(
                    bottom, bottom_cell, left, left_cell, right, right_cell,
                );
            }
        } else if right_edge == HexEdgeType::Slope {
            if left_edge == HexEdgeType::Flat {
                self.triangulate_corner_terraces(right, right_cell, bottom, bottom_cell, left, left_cell);
            } else {
                self.triangulate_corner_cliff_terraces(
                    bottom, bottom_cell, left, left_cell, right, right_cell,
                );
            }
        } else if grid.edge_type_between(left_cell, right_cell) == HexEdgeType::Slope {
            // Both lower edges are cliffs; the top pair terraces sideways.
            if grid.cell(left_cell).elevation() < grid.cell(right_cell).elevation() {
                self.triangulate_corner_cliff_terraces(
                    right, right_cell, bottom, bottom_cell, left, left_cell,
                );
            } else {
                self.triangulate_corner_terraces_cliff(
                    left, left_cell, right, right_cell, bottom, bottom_cell,
                );
            }
        } else {
            // All flat or all cliff: one plain triangle.
            let types = Vec3::new(
                grid.cell(bottom_cell).terrain_type_index() as f32,
                grid.cell(left_cell).terrain_type_index() as f32,
                grid.cell(right_cell).terrain_type_index() as f32,
            );
            self.terrain.add_triangle(self.metrics, bottom, left, right);
            self.terrain.add_triangle_colors(WEIGHTS1, WEIGHTS2, WEIGHTS3);
            self.terrain.add_triangle_terrain_types(types);
        }

        self.add_wall_corner(bottom, bottom_cell, left, left_cell, right, right_cell);
    }

    /// Double-terraced corner between two slopes and a flat.
    fn triangulate_corner_terraces(
        &mut self,
        begin: Vec3,
        begin_cell: u32,
        left: Vec3,
        left_cell: u32,
        right: Vec3,
        right_cell: u32,
    ) {
        let m = self.metrics;
        let types = Vec3::new(
            self.grid.cell(begin_cell).terrain_type_index() as f32,
            self.grid.cell(left_cell).terrain_type_index() as f32,
            self.grid.cell(right_cell).terrain_type_index() as f32,
        );

        let mut v3 = m.terrace_lerp(begin, left, 1);
        let mut v4 = m.terrace_lerp(begin, right, 1);
        let mut w3 = m.terrace_lerp_color(WEIGHTS1, WEIGHTS2, 1);
        let mut w4 = m.terrace_lerp_color(WEIGHTS1, WEIGHTS3, 1);

        self.terrain.add_triangle(m, begin, v3, v4);
        self.terrain.add_triangle_colors(WEIGHTS1, w3, w4);
        self.terrain.add_triangle_terrain_types(types);

        for step in 2..m.terrace_steps {
            let v1 = v3;
            let v2 = v4;
            let w1 = w3;
            let w2 = w4;
            v3 = m.terrace_lerp(begin, left, step);
            v4 = m.terrace_lerp(begin, right, step);
            w3 = m.terrace_lerp_color(WEIGHTS1, WEIGHTS2, step);
            w4 = m.terrace_lerp_color(WEIGHTS1, WEIGHTS3, step);
            self.terrain.add_quad(m, v1, v2, v3, v4);
            self.terrain.add_quad_colors(w1, w2, w3, w4);
            self.terrain.add_quad_terrain_types(types);
        }

        self.terrain.add_quad(m, v3, v4, left, right);
        self.terrain.add_quad_colors(w3, w4, WEIGHTS2, WEIGHTS3);
        self.terrain.add_quad_terrain_types(types);
    }

    /// Terraces meeting a cliff on the right: terraces collapse onto a
    /// boundary point on the cliff face.
    fn triangulate_corner_terraces_cliff(
        &mut self,
        begin: Vec3,
        begin_cell: u32,
        left: Vec3,
        left_cell: u32,
        right: Vec3,
        right_cell: u32,
    ) {
        let grid = self.grid;
        let m = self.metrics;
        let mut b = 1.0
            / (grid.cell(right_cell).elevation() - grid.cell(begin_cell).elevation()) as f32;
        if b < 0.0 {
            b = -b;
        }
        // The boundary sits on the perturbed cliff, so everything built
        // against it is emitted unperturbed.
        let boundary = m.perturb(begin).lerp(m.perturb(right), b);
        let boundary_weights = WEIGHTS1.lerp(WEIGHTS3, b);
        let types = Vec3::new(
            grid.cell(begin_cell).terrain_type_index() as f32,
            grid.cell(left_cell).terrain_type_index() as f32,
            grid.cell(right_cell).terrain_type_index() as f32,
        );

        self.triangulate_boundary_triangle(begin, WEIGHTS1, left, WEIGHTS2, boundary, boundary_weights, types);

        if grid.edge_type_between(left_cell, right_cell) == HexEdgeType::Slope {
            self.triangulate_boundary_triangle(
                left, WEIGHTS2, right, WEIGHTS3, boundary, boundary_weights, types,
            );
        } else {
            self.terrain
                .add_triangle_unperturbed(m.perturb(left), m.perturb(right), boundary);
            self.terrain
                .add_triangle_colors(WEIGHTS2, WEIGHTS3, boundary_weights);
            self.terrain.add_triangle_terrain_types(types);
        }
    }

    /// Mirror case: cliff on the left.
    fn triangulate_corner_cliff_terraces(
        &mut self,
        begin: Vec3,
        begin_cell: u32,
        left: Vec3,
        left_cell: u32,
        right: Vec3,
        right_cell: u32,
    ) {
        let grid = self.grid;
        let m = self.metrics;
        let mut b =
            1.0 / (grid.cell(left_cell).elevation() - grid.cell(begin_cell).elevation()) as f32;
        if b < 0.0 {
            b = -b;
        }
        let boundary = m.perturb(begin).lerp(m.perturb(left), b);
        let boundary_weights = WEIGHTS1.lerp(WEIGHTS2, b);
        let types = Vec3::new(
            grid.cell(begin_cell).terrain_type_index() as f32,
            grid.cell(left_cell).terrain_type_index() as f32,
            grid.cell(right_cell).terrain_type_index() as f32,
        );

        self.triangulate_boundary_triangle(right, WEIGHTS3, begin, WEIGHTS1, boundary, boundary_weights, types);

        if grid.edge_type_between(left_cell, right_cell) == HexEdgeType::Slope {
            self.triangulate_boundary_triangle(
                left, WEIGHTS2, right, WEIGHTS3, boundary, boundary_weights, types,
            );
        } else {
            self.terrain
                .add_triangle_unperturbed(m.perturb(left), m.perturb(right), boundary);
            self.terrain
                .add_triangle_colors(WEIGHTS2, WEIGHTS3, boundary_weights);
            self.terrain.add_triangle_terrain_types(types);
        }
    }

    /// Terrace steps collapsing onto a fixed boundary point.
    #[allow(clippy::too_many_arguments)]
    fn triangulate_boundary_triangle(
        &mut self,
        begin: Vec3,
        begin_weights: Vec3,
        left: Vec3,
        left_weights: Vec3,
        boundary: Vec3,
        boundary_weights: Vec3,
        types: Vec3,
    ) {
        let m = self.metrics;
        let mut v2 = m.perturb(m.terrace_lerp(begin, left, 1));
        let mut w2 = m.terrace_lerp_color(begin_weights, left_weights, 1);

        self.terrain
            .add_triangle_unperturbed(m.perturb(begin), v2, boundary);
        self.terrain
            .add_triangle_colors(begin_weights, w2, boundary_weights);
        self.terrain.add_triangle_terrain_types(types);

        for step in 2..m.terrace_steps {
            let v1 = v2;
            let w1 = w2;
            v2 = m.perturb(m.terrace_lerp(begin, left, step));
            w2 = m.terrace_lerp_color(begin_weights, left_weights, step);
            self.terrain.add_triangle_unperturbed(v1, v2, boundary);
            self.terrain.add_triangle_colors(w1, w2, boundary_weights);
            self.terrain.add_triangle_terrain_types(types);
        }

        self.terrain
            .add_triangle_unperturbed(v2, m.perturb(left), boundary);
        self.terrain
            .add_triangle_colors(w2, left_weights, boundary_weights);
        self.terrain.add_triangle_terrain_types(types);
    }

    // ------------------------------------------------------------------
    // River surface quads
    // ------------------------------------------------------------------

    /// Flat river surface quad at one height.
    fn triangulate_river_quad(
        &mut self,
        v1: Vec3,
        v2: Vec3,
        v3: Vec3,
        v4: Vec3,
        y: f32,
        v: f32,
        reversed: bool,
    ) {
        self.triangulate_river_quad2(v1, v2, v3, v4, y, y, v, reversed);
    }

    /// River surface quad spanning two heights, with flow encoded in the UV
    /// direction.
    #[allow(clippy::too_many_arguments)]
    fn triangulate_river_quad2(
        &mut self,
        mut v1: Vec3,
        mut v2: Vec3,
        mut v3: Vec3,
        mut v4: Vec3,
        y1: f32,
        y2: f32,
        v: f32,
        reversed: bool,
    ) {
        v1.y = y1;
        v2.y = y1;
        v3.y = y2;
        v4.y = y2;
        self.rivers.add_quad(self.metrics, v1, v2, v3, v4);
        if reversed {
            self.rivers.add_quad_uv_rect(1.0, 0.0, 0.8 - v, 0.6 - v);
        } else {
            self.rivers.add_quad_uv_rect(0.0, 1.0, v, v + 0.2);
        }
    }
}
