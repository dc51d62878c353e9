//! Road Overlays
//!
//! Roads are thin strips draped over the terrain, emitted into their own
//! layer with a centerline UV (u runs 1 at the middle to 0 at the verge).
//! Cells with rivers push the road center away from the channel with fixed
//! offsets keyed on the river's shape; bridges appear once per qualifying
//! cell where a road crosses a straight channel.

use glam::{Vec2, Vec3};

use crate::hex::{EdgeVertices, HexDirection};

use super::ChunkTriangulator;

/// Half-width of an emitted bridge deck.
const BRIDGE_DECK_HALF_WIDTH: f32 = 1.5;

impl ChunkTriangulator<'_> {
    /// How far toward each corner the road spreads: halfway along edges that
    /// carry the road, a quarter otherwise.
    pub(super) fn road_interpolators(&self, direction: HexDirection, cell: u32) -> Vec2 {
        let c = self.grid.cell(cell);
        if c.has_road_through_edge(direction) {
            Vec2::new(0.5, 0.5)
        } else {
            Vec2::new(
                if c.has_road_through_edge(direction.previous()) {
                    0.5
                } else {
                    0.25
                },
                if c.has_road_through_edge(direction.next()) {
                    0.5
                } else {
                    0.25
                },
            )
        }
    }

    /// Two-quad strip carrying the road across a connection or cell middle.
    pub(super) fn triangulate_road_segment(
        &mut self,
        v1: Vec3,
        v2: Vec3,
        v3: Vec3,
        v4: Vec3,
        v5: Vec3,
        v6: Vec3,
    ) {
        let m = self.metrics;
        self.roads.add_quad(m, v1, v2, v4, v5);
        self.roads.add_quad(m, v2, v3, v5, v6);
        self.roads.add_quad_uv_rect(0.0, 1.0, 0.0, 0.0);
        self.roads.add_quad_uv_rect(1.0, 0.0, 0.0, 0.0);
    }

    /// Road geometry inside the cell for one direction: a full segment when
    /// the road exits this edge, otherwise just the center filler.
    pub(super) fn triangulate_road(
        &mut self,
        center: Vec3,
        middle_left: Vec3,
        middle_right: Vec3,
        e: &EdgeVertices,
        has_road_through_edge: bool,
    ) {
        if has_road_through_edge {
            let m = self.metrics;
            let middle_center = middle_left.lerp(middle_right, 0.5);
            self.triangulate_road_segment(middle_left, middle_center, middle_right, e.v2, e.v3, e.v4);
            self.roads.add_triangle(m, center, middle_left, middle_center);
            self.roads.add_triangle(m, center, middle_center, middle_right);
            self.roads.add_triangle_uv(
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
            );
            self.roads.add_triangle_uv(
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 0.0),
            );
        } else {
            self.triangulate_road_edge(center, middle_left, middle_right);
        }
    }

    /// Center filler triangle closing the road hub.
    pub(super) fn triangulate_road_edge(&mut self, center: Vec3, middle_left: Vec3, middle_right: Vec3) {
        self.roads
            .add_triangle(self.metrics, center, middle_left, middle_right);
        self.roads.add_triangle_uv(
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
        );
    }

    /// Road geometry in a cell that also carries a river: the road center is
    /// displaced away from the channel, and sides without a road are pruned.
    pub(super) fn triangulate_road_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: u32,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;
        let c = self.grid.cell(cell);
        let has_road_through_edge = c.has_road_through_edge(direction);
        let previous_has_river = c.has_river_through_edge(direction.previous());
        let next_has_river = c.has_river_through_edge(direction.next());
        let interpolators = self.road_interpolators(direction, cell);

        let mut road_center = center;
        let mut center = center;

        if c.has_river_begin_or_end() {
            if let Some(river_direction) = c.river_begin_or_end_direction() {
                road_center += m.solid_edge_middle(river_direction.opposite()) * (1.0 / 3.0);
            }
        } else if let (Some(incoming), Some(outgoing)) = (c.incoming_river(), c.outgoing_river()) {
            if incoming == outgoing.opposite() {
                // Straight channel: the road hugs one bank.
                let corner;
                if previous_has_river {
                    if !has_road_through_edge && !c.has_road_through_edge(direction.next()) {
                        return;
                    }
                    corner = m.second_solid_corner(direction);
                } else {
                    if !has_road_through_edge && !c.has_road_through_edge(direction.previous()) {
                        return;
                    }
                    corner = m.first_solid_corner(direction);
                }
                road_center += corner * 0.5;
                // One bridge per cell, only when the far bank has a road too.
                if incoming == direction.next()
                    && (c.has_road_through_edge(direction.next2())
                        || c.has_road_through_edge(direction.opposite()))
                {
                    self.add_bridge(road_center, center - corner * 0.5);
                }
                center += corner * 0.25;
            } else if incoming == outgoing.previous() {
                // Zigzag, turning against the winding order.
                road_center -= m.second_corner(incoming) * 0.2;
            } else if incoming == outgoing.next() {
                // Zigzag, turning with it.
                road_center -= m.first_corner(incoming) * 0.2;
            } else if previous_has_river && next_has_river {
                // Inside of a curved channel.
                if !has_road_through_edge {
                    return;
                }
                let offset = m.solid_edge_middle(direction) * m.inner_to_outer;
                road_center += offset * 0.7;
                center += offset * 0.5;
            } else {
                // Outside of the curve; prune if no road leaves this side.
                let middle = if previous_has_river {
                    direction.next()
                } else if next_has_river {
                    direction.previous()
                } else {
                    direction
                };
                if !c.has_road_through_edge(middle.previous())
                    && !c.has_road_through_edge(middle)
                    && !c.has_road_through_edge(middle.next())
                {
                    return;
                }
                let offset = m.solid_edge_middle(middle);
                road_center += offset * 0.25;
                if direction == middle && c.has_road_through_edge(direction.opposite()) {
                    self.add_bridge(road_center, center - offset * (m.inner_to_outer * 0.7));
                }
            }
        }

        let middle_left = road_center.lerp(e.v1, interpolators.x);
        let middle_right = road_center.lerp(e.v5, interpolators.y);
        self.triangulate_road(road_center, middle_left, middle_right, e, has_road_through_edge);
        if previous_has_river {
            self.triangulate_road_edge(road_center, center, middle_left);
        }
        if next_has_river {
            self.triangulate_road_edge(road_center, middle_right, center);
        }
    }

    /// Flat deck spanning the two displaced road centers on either bank.
    fn add_bridge(&mut self, road_center1: Vec3, road_center2: Vec3) {
        let m = self.metrics;
        let c1 = m.perturb(road_center1);
        let c2 = m.perturb(road_center2);

        let mut along = c2 - c1;
        along.y = 0.0;
        let side = along.normalize_or_zero().cross(Vec3::Y) * BRIDGE_DECK_HALF_WIDTH;

        self.roads
            .add_quad_unperturbed(c1 - side, c1 + side, c2 - side, c2 + side);
        self.roads.add_quad_uv_rect(0.0, 1.0, 0.0, 0.0);
    }
}
