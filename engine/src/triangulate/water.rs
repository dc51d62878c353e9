//! Water Surfaces
//!
//! Open water between underwater cells, shore strips against dry neighbors,
//! estuaries where a river meets a shore, and waterfalls where a river drops
//! into a lower water surface. Shore UVs run 0 at open water to 1 at the
//! land edge; estuary UV2s encode river flow through the shore.

use glam::{Vec2, Vec3};

use crate::hex::{EdgeVertices, HexDirection};

use super::ChunkTriangulator;

impl ChunkTriangulator<'_> {
    pub(super) fn triangulate_water(&mut self, direction: HexDirection, cell: u32, center: Vec3) {
        let grid = self.grid;
        let c = grid.cell(cell);
        let mut center = center;
        center.y = c.water_surface_y(self.metrics);

        let neighbor = c.neighbor(direction);
        match neighbor {
            Some(n) if !grid.cell(n).is_underwater() => {
                self.triangulate_water_shore(direction, cell, n, center);
            }
            _ => self.triangulate_open_water(direction, cell, neighbor, center),
        }
    }

    fn triangulate_open_water(
        &mut self,
        direction: HexDirection,
        cell: u32,
        neighbor: Option<u32>,
        center: Vec3,
    ) {
        let m = self.metrics;
        let c1 = center + m.first_water_corner(direction);
        let c2 = center + m.second_water_corner(direction);

        self.water.add_triangle(m, center, c1, c2);

        // Connection strip and corner, built once per shared edge like the
        // terrain above water.
        if direction.index() <= HexDirection::SE.index() && neighbor.is_some() {
            let bridge = m.water_bridge(direction);
            let e1 = c1 + bridge;
            let e2 = c2 + bridge;

            self.water.add_quad(m, c1, c2, e1, e2);

            if direction.index() <= HexDirection::E.index() {
                let Some(next_neighbor) = self.grid.cell(cell).neighbor(direction.next()) else {
                    return;
                };
                if !self.grid.cell(next_neighbor).is_underwater() {
                    return;
                }
                self.water
                    .add_triangle(m, c2, e2, c2 + m.water_bridge(direction.next()));
            }
        }
    }

    fn triangulate_water_shore(
        &mut self,
        direction: HexDirection,
        cell: u32,
        neighbor: u32,
        center: Vec3,
    ) {
        let grid = self.grid;
        let m = self.metrics;
        let c = grid.cell(cell);

        // The water side of the shore is a fan so its edge matches the
        // subdivided strip.
        let e1 = EdgeVertices::new(
            center + m.first_water_corner(direction),
            center + m.second_water_corner(direction),
        );
        self.water.add_triangle(m, center, e1.v1, e1.v2);
        self.water.add_triangle(m, center, e1.v2, e1.v3);
        self.water.add_triangle(m, center, e1.v3, e1.v4);
        self.water.add_triangle(m, center, e1.v4, e1.v5);

        // The land side works from the neighbor's solid edge, pulled down to
        // the water surface.
        let mut center2 = grid.cell(neighbor).position();
        center2.y = center.y;
        let e2 = EdgeVertices::new(
            center2 + m.second_solid_corner(direction.opposite()),
            center2 + m.first_solid_corner(direction.opposite()),
        );

        if c.has_river_through_edge(direction) {
            self.triangulate_estuary(&e1, &e2, c.incoming_river() == Some(direction));
        } else {
            self.water_shore.add_quad(m, e1.v1, e1.v2, e2.v1, e2.v2);
            self.water_shore.add_quad(m, e1.v2, e1.v3, e2.v2, e2.v3);
            self.water_shore.add_quad(m, e1.v3, e1.v4, e2.v3, e2.v4);
            self.water_shore.add_quad(m, e1.v4, e1.v5, e2.v4, e2.v5);
            for _ in 0..4 {
                self.water_shore.add_quad_uv_rect(0.0, 0.0, 0.0, 1.0);
            }
        }

        // Shore corner triangle; the third cell decides whether it meets
        // water or land.
        if let Some(next_neighbor) = c.neighbor(direction.next()) {
            let nn = grid.cell(next_neighbor);
            let corner = if nn.is_underwater() {
                m.first_water_corner(direction.previous())
            } else {
                m.first_solid_corner(direction.previous())
            };
            let mut v3 = nn.position() + corner;
            v3.y = center.y;
            self.water_shore.add_triangle(m, e1.v5, e2.v5, v3);
            self.water_shore.add_triangle_uv(
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, if nn.is_underwater() { 0.0 } else { 1.0 }),
            );
        }
    }

    /// River mouth: shore quads give way to an estuary patch whose UV2
    /// channel carries the flow direction for the shader.
    fn triangulate_estuary(&mut self, e1: &EdgeVertices, e2: &EdgeVertices, incoming_river: bool) {
        let m = self.metrics;

        self.water_shore.add_triangle(m, e2.v1, e1.v2, e1.v1);
        self.water_shore.add_triangle(m, e2.v5, e1.v5, e1.v4);
        self.water_shore.add_triangle_uv(
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
        );
        self.water_shore.add_triangle_uv(
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
        );

        // Left quad is rotated so the patch stays symmetrical.
        self.estuaries.add_quad(m, e2.v1, e1.v2, e2.v2, e1.v3);
        self.estuaries.add_triangle(m, e1.v3, e2.v2, e2.v4);
        self.estuaries.add_quad(m, e1.v3, e1.v4, e2.v4, e2.v5);

        self.estuaries.add_quad_uv(
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 0.0),
        );
        self.estuaries.add_triangle_uv(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 1.0),
        );
        self.estuaries.add_quad_uv(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        );

        if incoming_river {
            self.estuaries.add_quad_uv2(
                Vec2::new(1.5, 1.0),
                Vec2::new(0.7, 1.15),
                Vec2::new(1.0, 0.8),
                Vec2::new(0.5, 1.1),
            );
            self.estuaries.add_triangle_uv2(
                Vec2::new(0.5, 1.1),
                Vec2::new(1.0, 0.8),
                Vec2::new(0.0, 0.8),
            );
            self.estuaries.add_quad_uv2(
                Vec2::new(0.5, 1.1),
                Vec2::new(0.3, 1.15),
                Vec2::new(0.0, 0.8),
                Vec2::new(-0.5, 1.0),
            );
        } else {
            self.estuaries.add_quad_uv2(
                Vec2::new(-0.5, -0.2),
                Vec2::new(0.3, -0.35),
                Vec2::new(0.0, 0.0),
                Vec2::new(0.5, -0.3),
            );
            self.estuaries.add_triangle_uv2(
                Vec2::new(0.5, -0.3),
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
            );
            self.estuaries.add_quad_uv2(
                Vec2::new(0.5, -0.3),
                Vec2::new(0.7, -0.35),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.5, -0.2),
            );
        }
    }

    /// A river dropping into standing water: the falling quad is clipped
    /// against the receiving surface so it never pokes through.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn triangulate_waterfall_in_water(
        &mut self,
        mut v1: Vec3,
        mut v2: Vec3,
        mut v3: Vec3,
        mut v4: Vec3,
        y1: f32,
        y2: f32,
        water_y: f32,
    ) {
        let m = self.metrics;
        v1.y = y1;
        v2.y = y1;
        v3.y = y2;
        v4.y = y2;
        let v1 = m.perturb(v1);
        let v2 = m.perturb(v2);
        let mut v3 = m.perturb(v3);
        let mut v4 = m.perturb(v4);

        let t = (water_y - y2) / (y1 - y2);
        v3 = v3.lerp(v1, t);
        v4 = v4.lerp(v2, t);

        self.rivers.add_quad_unperturbed(v1, v2, v3, v4);
        self.rivers.add_quad_uv_rect(0.0, 1.0, 0.8, 1.0);
    }
}
