//! Mesh Buffers
//!
//! The triangulator's output sink: plain vertex/index buffers a host can
//! upload as-is. Each geometry layer (terrain, rivers, roads, water, shore,
//! estuaries, walls) fills one [`MeshData`] with the channels it uses;
//! unused channels stay empty and flatten to zero.
//!
//! Positions are perturbed on the way in (the `*_unperturbed` emitters skip
//! that), so downstream code never re-perturbs.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::hex::HexMetrics;

/// Interleaved vertex for host-side buffer upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    /// Splat blend weights between the three terrain types of a triangle.
    pub color: [f32; 3],
    pub uv: [f32; 2],
    pub uv2: [f32; 2],
    /// Terrain type indices carried per vertex for the splat shader.
    pub terrain_types: [f32; 3],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 52]);

/// One geometry layer's growing buffers.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub uv2s: Vec<Vec2>,
    pub terrain_types: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> MeshData {
        MeshData::default()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.uvs.clear();
        self.uv2s.clear();
        self.terrain_types.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    // ------------------------------------------------------------------
    // Triangles
    // ------------------------------------------------------------------

    pub fn add_triangle(&mut self, metrics: &HexMetrics, v1: Vec3, v2: Vec3, v3: Vec3) {
        self.add_triangle_unperturbed(metrics.perturb(v1), metrics.perturb(v2), metrics.perturb(v3));
    }

    pub fn add_triangle_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[v1, v2, v3]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    pub fn add_triangle_color(&mut self, color: Vec3) {
        self.colors.extend_from_slice(&[color, color, color]);
    }

    pub fn add_triangle_colors(&mut self, c1: Vec3, c2: Vec3, c3: Vec3) {
        self.colors.extend_from_slice(&[c1, c2, c3]);
    }

    pub fn add_triangle_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uvs.extend_from_slice(&[uv1, uv2, uv3]);
    }

    pub fn add_triangle_uv2(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uv2s.extend_from_slice(&[uv1, uv2, uv3]);
    }

    pub fn add_triangle_terrain_types(&mut self, types: Vec3) {
        self.terrain_types.extend_from_slice(&[types, types, types]);
    }

    // ------------------------------------------------------------------
    // Quads
    // ------------------------------------------------------------------

    pub fn add_quad(&mut self, metrics: &HexMetrics, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        self.add_quad_unperturbed(
            metrics.perturb(v1),
            metrics.perturb(v2),
            metrics.perturb(v3),
            metrics.perturb(v4),
        );
    }

    /// v1-v2 is the near edge, v3-v4 the far edge.
    pub fn add_quad_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[v1, v2, v3, v4]);
        self.indices
            .extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
    }

    pub fn add_quad_color(&mut self, color: Vec3) {
        self.colors.extend_from_slice(&[color, color, color, color]);
    }

    pub fn add_quad_color2(&mut self, c1: Vec3, c2: Vec3) {
        self.colors.extend_from_slice(&[c1, c1, c2, c2]);
    }

    pub fn add_quad_colors(&mut self, c1: Vec3, c2: Vec3, c3: Vec3, c4: Vec3) {
        self.colors.extend_from_slice(&[c1, c2, c3, c4]);
    }

    pub fn add_quad_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        self.uvs.extend_from_slice(&[uv1, uv2, uv3, uv4]);
    }

    /// Axis-aligned UV rectangle: u across the near edge, v toward the far.
    pub fn add_quad_uv_rect(&mut self, u_min: f32, u_max: f32, v_min: f32, v_max: f32) {
        self.add_quad_uv(
            Vec2::new(u_min, v_min),
            Vec2::new(u_max, v_min),
            Vec2::new(u_min, v_max),
            Vec2::new(u_max, v_max),
        );
    }

    pub fn add_quad_uv2(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        self.uv2s.extend_from_slice(&[uv1, uv2, uv3, uv4]);
    }

    pub fn add_quad_terrain_types(&mut self, types: Vec3) {
        self.terrain_types.extend_from_slice(&[types, types, types, types]);
    }

    // ------------------------------------------------------------------
    // Flattening
    // ------------------------------------------------------------------

    /// Interleave the channels into an upload-ready vertex stream. Channels
    /// this layer never wrote come out zeroed.
    pub fn vertex_buffer(&self) -> Vec<MeshVertex> {
        let n = self.positions.len();
        let mut vertices = Vec::with_capacity(n);
        for i in 0..n {
            vertices.push(MeshVertex {
                position: self.positions[i].to_array(),
                color: self.colors.get(i).copied().unwrap_or(Vec3::ZERO).to_array(),
                uv: self.uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
                uv2: self.uv2s.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
                terrain_types: self
                    .terrain_types
                    .get(i)
                    .copied()
                    .unwrap_or(Vec3::ZERO)
                    .to_array(),
            });
        }
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_indices() {
        let mut mesh = MeshData::new();
        mesh.add_triangle_unperturbed(Vec3::ZERO, Vec3::X, Vec3::Z);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_quad_is_two_triangles() {
        let mut mesh = MeshData::new();
        mesh.add_quad_unperturbed(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 2, 1, 1, 2, 3]);
    }

    #[test]
    fn test_vertex_buffer_zero_fills_missing_channels() {
        let mut mesh = MeshData::new();
        mesh.add_triangle_unperturbed(Vec3::ZERO, Vec3::X, Vec3::Z);
        let buffer = mesh.vertex_buffer();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer[0].color, [0.0; 3]);
        assert_eq!(buffer[2].uv, [0.0; 2]);
    }

    #[test]
    fn test_vertex_buffer_is_pod() {
        let mut mesh = MeshData::new();
        mesh.add_triangle_unperturbed(Vec3::ZERO, Vec3::X, Vec3::Z);
        let buffer = mesh.vertex_buffer();
        let bytes: &[u8] = bytemuck::cast_slice(&buffer);
        assert_eq!(bytes.len(), 3 * std::mem::size_of::<MeshVertex>());
    }
}
