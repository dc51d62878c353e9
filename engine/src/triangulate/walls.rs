//! Wall Extrusion
//!
//! Walls follow the boundary between walled and open territory: every
//! connection whose two cells disagree on the walled flag grows a segment,
//! and corners stitch the runs together around their pivot cell. Segments
//! are extruded prisms (two faces and a top) centered on the connection via
//! `wall_lerp`; rivers and roads leave capped gaps, cliffs interrupt the
//! run with caps or wedges.

use glam::Vec3;

use crate::hex::{EdgeVertices, HexEdgeType};

use super::ChunkTriangulator;

impl ChunkTriangulator<'_> {
    /// Wall along one connection strip, with a gap where a river or road
    /// passes through.
    pub(super) fn add_wall_edge(
        &mut self,
        near: &EdgeVertices,
        near_cell: u32,
        far: &EdgeVertices,
        far_cell: u32,
        has_river: bool,
        has_road: bool,
    ) {
        let grid = self.grid;
        let nc = grid.cell(near_cell);
        let fc = grid.cell(far_cell);

        let boundary = nc.walled() != fc.walled()
            && !nc.is_underwater()
            && !fc.is_underwater()
            && grid.edge_type_between(near_cell, far_cell) != HexEdgeType::Cliff;
        if !boundary {
            return;
        }

        self.add_wall_segment(near.v1, far.v1, near.v2, far.v2);
        if has_river || has_road {
            // Leave a gate over the channel or road.
            self.add_wall_cap(near.v2, far.v2);
            self.add_wall_cap(far.v4, near.v4);
        } else {
            self.add_wall_segment(near.v2, far.v2, near.v3, far.v3);
            self.add_wall_segment(near.v3, far.v3, near.v4, far.v4);
        }
        self.add_wall_segment(near.v4, far.v4, near.v5, far.v5);
    }

    /// Wall stitching at a three-cell corner. The walled pattern picks the
    /// pivot cell the wall bends around.
    pub(super) fn add_wall_corner(
        &mut self,
        c1: Vec3,
        cell1: u32,
        c2: Vec3,
        cell2: u32,
        c3: Vec3,
        cell3: u32,
    ) {
        let grid = self.grid;
        let walled1 = grid.cell(cell1).walled();
        let walled2 = grid.cell(cell2).walled();
        let walled3 = grid.cell(cell3).walled();

        if walled1 {
            if walled2 {
                if !walled3 {
                    self.add_wall_corner_segment(c3, cell3, c1, cell1, c2, cell2);
                }
            } else if walled3 {
                self.add_wall_corner_segment(c2, cell2, c3, cell3, c1, cell1);
            } else {
                self.add_wall_corner_segment(c1, cell1, c2, cell2, c3, cell3);
            }
        } else if walled2 {
            if walled3 {
                self.add_wall_corner_segment(c1, cell1, c2, cell2, c3, cell3);
            } else {
                self.add_wall_corner_segment(c2, cell2, c3, cell3, c1, cell1);
            }
        } else if walled3 {
            self.add_wall_corner_segment(c3, cell3, c1, cell1, c2, cell2);
        }
    }

    /// Corner piece pivoting on the odd cell out. Cliff sides cannot carry a
    /// wall, so the run ends in a cap or folds into a wedge against the
    /// cliff face.
    fn add_wall_corner_segment(
        &mut self,
        pivot: Vec3,
        pivot_cell: u32,
        left: Vec3,
        left_cell: u32,
        right: Vec3,
        right_cell: u32,
    ) {
        let grid = self.grid;
        if grid.cell(pivot_cell).is_underwater() {
            return;
        }

        let has_left_wall = !grid.cell(left_cell).is_underwater()
            && grid.edge_type_between(pivot_cell, left_cell) != HexEdgeType::Cliff;
        let has_right_wall = !grid.cell(right_cell).is_underwater()
            && grid.edge_type_between(pivot_cell, right_cell) != HexEdgeType::Cliff;

        if has_left_wall {
            if has_right_wall {
                self.add_wall_segment(pivot, left, pivot, right);
            } else if grid.cell(left_cell).elevation() < grid.cell(right_cell).elevation() {
                self.add_wall_wedge(pivot, left, right);
            } else {
                self.add_wall_cap(pivot, left);
            }
        } else if has_right_wall {
            if grid.cell(right_cell).elevation() < grid.cell(left_cell).elevation() {
                self.add_wall_wedge(right, pivot, left);
            } else {
                self.add_wall_cap(right, pivot);
            }
        }
    }

    /// One extruded wall piece between two cross-sections of the connection.
    fn add_wall_segment(
        &mut self,
        near_left: Vec3,
        far_left: Vec3,
        near_right: Vec3,
        far_right: Vec3,
    ) {
        let m = self.metrics;
        let near_left = m.perturb(near_left);
        let far_left = m.perturb(far_left);
        let near_right = m.perturb(near_right);
        let far_right = m.perturb(far_right);

        let left = m.wall_lerp(near_left, far_left);
        let right = m.wall_lerp(near_right, far_right);
        let left_offset = m.wall_thickness_offset(near_left, far_left);
        let right_offset = m.wall_thickness_offset(near_right, far_right);

        let left_top = left.y + m.wall_height;
        let right_top = right.y + m.wall_height;

        let mut v1 = left - left_offset;
        let mut v2 = right - right_offset;
        let mut v3 = v1;
        let mut v4 = v2;
        v3.y = left_top;
        v4.y = right_top;
        self.walls.add_quad_unperturbed(v1, v2, v3, v4);

        let t1 = v3;
        let t2 = v4;

        v1 = left + left_offset;
        v2 = right + right_offset;
        v3 = v1;
        v4 = v2;
        v3.y = left_top;
        v4.y = right_top;
        self.walls.add_quad_unperturbed(v2, v1, v4, v3);

        self.walls.add_quad_unperturbed(t1, t2, v3, v4);
    }

    /// Flat end piece sealing an interrupted wall run.
    fn add_wall_cap(&mut self, near: Vec3, far: Vec3) {
        let m = self.metrics;
        let near = m.perturb(near);
        let far = m.perturb(far);

        let center = m.wall_lerp(near, far);
        let thickness = m.wall_thickness_offset(near, far);

        let v1 = center - thickness;
        let v2 = center + thickness;
        let mut v3 = v1;
        let mut v4 = v2;
        v3.y = center.y + m.wall_height;
        v4.y = center.y + m.wall_height;
        self.walls.add_quad_unperturbed(v1, v2, v3, v4);
    }

    /// Wedge folding the wall run into a cliff face at a corner.
    fn add_wall_wedge(&mut self, near: Vec3, far: Vec3, point: Vec3) {
        let m = self.metrics;
        let near = m.perturb(near);
        let far = m.perturb(far);
        let mut point = m.perturb(point);

        let center = m.wall_lerp(near, far);
        let thickness = m.wall_thickness_offset(near, far);

        let top = center.y + m.wall_height;
        point.y = center.y;
        let mut point_top = point;
        point_top.y = top;

        let v1 = center - thickness;
        let v2 = center + thickness;
        let mut v3 = v1;
        let mut v4 = v2;
        v3.y = top;
        v4.y = top;

        self.walls.add_quad_unperturbed(v1, point, v3, point_top);
        self.walls.add_quad_unperturbed(point, v2, point_top, v4);
        self.walls.add_triangle_unperturbed(point_top, v3, v4);
    }
}
