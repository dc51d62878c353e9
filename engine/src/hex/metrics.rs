//! Hex Metrics
//!
//! Geometry context for one map: radii, corner vectors, terrace
//! interpolation, wall placement math, and the seeded perturbation noise
//! grid. Constructed once per grid from a [`MapConfig`] and passed explicitly
//! to every geometry routine; nothing here is global state.
//!
//! ## Layout
//! Cells are pointy-top hexagons. The six corner vectors start straight
//! "up" (+z) and step 60 degrees clockwise. The inner radius is the outer
//! radius times sqrt(3)/2.

use glam::{Vec3, Vec4};

use crate::config::MapConfig;
use crate::hex::direction::HexDirection;

/// Side length of the square perturbation noise grid.
const NOISE_GRID_SIZE: usize = 256;

/// Elevation relationship between two adjacent cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HexEdgeType {
    /// No elevation difference.
    Flat,
    /// Difference of exactly one level; rendered as terraces.
    Slope,
    /// Difference of two or more levels; rendered as a sheer face.
    Cliff,
}

// ============================================================================
// EDGE VERTICES
// ============================================================================

/// Five evenly spread vertices along one solid edge of a cell.
///
/// Four sub-quads per edge strip keeps terraces and river channels smooth
/// without subdividing triangles downstream.
#[derive(Copy, Clone, Debug)]
pub struct EdgeVertices {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    pub v4: Vec3,
    pub v5: Vec3,
}

impl EdgeVertices {
    /// Edge with the default outer interpolation step of 1/4.
    pub fn new(corner1: Vec3, corner2: Vec3) -> EdgeVertices {
        EdgeVertices::with_outer_step(corner1, corner2, 0.25)
    }

    /// Edge with a custom outer step; river channels use 1/6 so the middle
    /// three vertices straddle the stream bed.
    pub fn with_outer_step(corner1: Vec3, corner2: Vec3, outer_step: f32) -> EdgeVertices {
        EdgeVertices {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Geometric constants and perturbation noise for one map.
#[derive(Clone)]
pub struct HexMetrics {
    /// Center-to-corner distance.
    pub outer_radius: f32,
    /// Center-to-edge distance: outer_radius * sqrt(3)/2.
    pub inner_radius: f32,
    /// Ratio converting an inner-radius length back to outer scale.
    pub inner_to_outer: f32,

    /// Fraction of the hex that belongs to the cell alone; the rest blends
    /// with neighbors in connection strips.
    pub solid_factor: f32,
    pub blend_factor: f32,

    /// World-space height of one elevation level.
    pub elevation_step: f32,

    /// Sloped terrace count per slope edge.
    pub terraces_per_slope: u32,
    /// Interpolation step count: 2 * terraces_per_slope + 1.
    pub terrace_steps: u32,
    horizontal_terrace_step: f32,
    vertical_terrace_step: f32,

    /// Stream bed depth relative to cell elevation, in elevation levels.
    pub stream_bed_elevation_offset: f32,
    /// River and water surface drop relative to their level, in levels.
    pub water_elevation_offset: f32,

    /// Solid fraction of an underwater cell's water hex.
    pub water_factor: f32,
    pub water_blend_factor: f32,

    /// Horizontal vertex jitter amplitude.
    pub cell_perturb_strength: f32,
    /// Vertical cell-center jitter amplitude.
    pub elevation_perturb_strength: f32,
    /// World-to-noise-space scale for perturbation sampling.
    pub noise_scale: f32,

    pub wall_height: f32,
    pub wall_y_offset: f32,
    pub wall_thickness: f32,
    /// Vertical placement bias keeping walls on the upper terrace ledge.
    pub wall_elevation_offset: f32,

    /// Cells per chunk along x.
    pub chunk_size_x: usize,
    /// Cells per chunk along z.
    pub chunk_size_z: usize,

    corners: [Vec3; 7],
    noise: Vec<Vec4>,
}

impl HexMetrics {
    pub fn new(config: &MapConfig) -> HexMetrics {
        let outer_radius = config.outer_radius;
        let inner_radius = outer_radius * 3f32.sqrt() * 0.5;
        let terraces_per_slope = 2u32;
        let terrace_steps = terraces_per_slope * 2 + 1;
        let vertical_terrace_step = 1.0 / (terraces_per_slope + 1) as f32;

        let half = outer_radius * 0.5;
        let corners = [
            Vec3::new(0.0, 0.0, outer_radius),
            Vec3::new(inner_radius, 0.0, half),
            Vec3::new(inner_radius, 0.0, -half),
            Vec3::new(0.0, 0.0, -outer_radius),
            Vec3::new(-inner_radius, 0.0, -half),
            Vec3::new(-inner_radius, 0.0, half),
            Vec3::new(0.0, 0.0, outer_radius),
        ];

        HexMetrics {
            outer_radius,
            inner_radius,
            inner_to_outer: 1.0 / (3f32.sqrt() * 0.5),
            solid_factor: 0.8,
            blend_factor: 0.2,
            elevation_step: 3.0,
            terraces_per_slope,
            terrace_steps,
            horizontal_terrace_step: 1.0 / terrace_steps as f32,
            vertical_terrace_step,
            stream_bed_elevation_offset: -1.75,
            water_elevation_offset: -0.5,
            water_factor: 0.6,
            water_blend_factor: 0.4,
            cell_perturb_strength: 4.0,
            elevation_perturb_strength: 1.5,
            noise_scale: 0.003,
            wall_height: 4.0,
            wall_y_offset: -1.0,
            wall_thickness: 0.75,
            wall_elevation_offset: vertical_terrace_step,
            chunk_size_x: config.chunk_size_x,
            chunk_size_z: config.chunk_size_z,
            corners,
            noise: build_noise_grid(config.seed),
        }
    }

    // ------------------------------------------------------------------
    // Corners and bridges
    // ------------------------------------------------------------------

    pub fn first_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index()]
    }

    pub fn second_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index() + 1]
    }

    pub fn first_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index()] * self.solid_factor
    }

    pub fn second_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index() + 1] * self.solid_factor
    }

    /// Midpoint of a solid edge, useful for river and road centerlines.
    pub fn solid_edge_middle(&self, direction: HexDirection) -> Vec3 {
        (self.corners[direction.index()] + self.corners[direction.index() + 1])
            * (0.5 * self.solid_factor)
    }

    /// Offset spanning the blend region between two adjacent cells.
    pub fn bridge(&self, direction: HexDirection) -> Vec3 {
        (self.corners[direction.index()] + self.corners[direction.index() + 1])
            * self.blend_factor
    }

    pub fn first_water_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index()] * self.water_factor
    }

    pub fn second_water_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index() + 1] * self.water_factor
    }

    pub fn water_bridge(&self, direction: HexDirection) -> Vec3 {
        (self.corners[direction.index()] + self.corners[direction.index() + 1])
            * self.water_blend_factor
    }

    // ------------------------------------------------------------------
    // Terraces
    // ------------------------------------------------------------------

    /// Stair-step interpolation between two points.
    ///
    /// The horizontal plane advances every step, but height only advances on
    /// odd steps; even steps are flat ledges. Step 0 is exactly `a` and step
    /// `terrace_steps` is exactly `b`.
    pub fn terrace_lerp(&self, a: Vec3, b: Vec3, step: u32) -> Vec3 {
        let h = step as f32 * self.horizontal_terrace_step;
        let v = ((step + 1) / 2) as f32 * self.vertical_terrace_step;
        Vec3::new(
            a.x + (b.x - a.x) * h,
            a.y + (b.y - a.y) * v,
            a.z + (b.z - a.z) * h,
        )
    }

    /// Color counterpart: plain interpolation at the horizontal rate.
    pub fn terrace_lerp_color(&self, a: Vec3, b: Vec3, step: u32) -> Vec3 {
        a.lerp(b, step as f32 * self.horizontal_terrace_step)
    }

    /// Terrace-interpolate a whole edge.
    pub fn terrace_lerp_edge(&self, a: &EdgeVertices, b: &EdgeVertices, step: u32) -> EdgeVertices {
        EdgeVertices {
            v1: self.terrace_lerp(a.v1, b.v1, step),
            v2: self.terrace_lerp(a.v2, b.v2, step),
            v3: self.terrace_lerp(a.v3, b.v3, step),
            v4: self.terrace_lerp(a.v4, b.v4, step),
            v5: self.terrace_lerp(a.v5, b.v5, step),
        }
    }

    /// Classify the elevation relationship between two cells.
    pub fn edge_type(&self, elevation1: i32, elevation2: i32) -> HexEdgeType {
        match (elevation1 - elevation2).abs() {
            0 => HexEdgeType::Flat,
            1 => HexEdgeType::Slope,
            _ => HexEdgeType::Cliff,
        }
    }

    // ------------------------------------------------------------------
    // Walls
    // ------------------------------------------------------------------

    /// Midpoint of a wall segment between the near and far edge of a
    /// connection, biased toward the upper terrace ledge.
    pub fn wall_lerp(&self, near: Vec3, far: Vec3) -> Vec3 {
        let v = if near.y < far.y {
            self.wall_elevation_offset
        } else {
            1.0 - self.wall_elevation_offset
        };
        Vec3::new(
            near.x + (far.x - near.x) * 0.5,
            near.y + (far.y - near.y) * v + self.wall_y_offset,
            near.z + (far.z - near.z) * 0.5,
        )
    }

    /// Half-thickness offset perpendicular to the wall run, in the ground
    /// plane.
    pub fn wall_thickness_offset(&self, near: Vec3, far: Vec3) -> Vec3 {
        let offset = Vec3::new(far.x - near.x, 0.0, far.z - near.z);
        offset.normalize_or_zero() * (self.wall_thickness * 0.5)
    }

    // ------------------------------------------------------------------
    // Perturbation
    // ------------------------------------------------------------------

    /// Bilinear sample of the wrapped noise grid at a world position.
    pub fn sample_noise(&self, position: Vec3) -> Vec4 {
        let size = NOISE_GRID_SIZE as f32;
        let u = (position.x * self.noise_scale).rem_euclid(1.0) * size;
        let v = (position.z * self.noise_scale).rem_euclid(1.0) * size;

        let x0 = u.floor() as usize % NOISE_GRID_SIZE;
        let y0 = v.floor() as usize % NOISE_GRID_SIZE;
        let x1 = (x0 + 1) % NOISE_GRID_SIZE;
        let y1 = (y0 + 1) % NOISE_GRID_SIZE;
        let fx = u.fract();
        let fy = v.fract();

        let s00 = self.noise[y0 * NOISE_GRID_SIZE + x0];
        let s10 = self.noise[y0 * NOISE_GRID_SIZE + x1];
        let s01 = self.noise[y1 * NOISE_GRID_SIZE + x0];
        let s11 = self.noise[y1 * NOISE_GRID_SIZE + x1];

        s00.lerp(s10, fx).lerp(s01.lerp(s11, fx), fy)
    }

    /// Jitter a vertex in the horizontal plane. Height is never perturbed
    /// here; cell centers get their vertical jitter once, at placement.
    pub fn perturb(&self, position: Vec3) -> Vec3 {
        let sample = self.sample_noise(position);
        Vec3::new(
            position.x + (sample.x * 2.0 - 1.0) * self.cell_perturb_strength,
            position.y,
            position.z + (sample.z * 2.0 - 1.0) * self.cell_perturb_strength,
        )
    }

    /// World-space height of a cell center at the given elevation, with the
    /// per-cell vertical jitter applied.
    pub fn perturbed_cell_y(&self, elevation: i32, position: Vec3) -> f32 {
        let y = elevation as f32 * self.elevation_step;
        y + (self.sample_noise(position).y * 2.0 - 1.0) * self.elevation_perturb_strength
    }
}

// ============================================================================
// NOISE GRID
// ============================================================================

/// Deterministic [0, 1) hash of a grid point and channel.
fn hash_point(seed: u32, x: f32, y: f32, channel: f32) -> f32 {
    let n = (x * 127.1 + y * 311.7 + channel * 74.7 + seed as f32 * 0.1031).sin() * 43758.5453;
    n - n.floor()
}

/// Precompute the wrapped pseudo-random grid the perturbation samples from.
fn build_noise_grid(seed: u32) -> Vec<Vec4> {
    let mut grid = Vec::with_capacity(NOISE_GRID_SIZE * NOISE_GRID_SIZE);
    for y in 0..NOISE_GRID_SIZE {
        for x in 0..NOISE_GRID_SIZE {
            let (fx, fy) = (x as f32, y as f32);
            grid.push(Vec4::new(
                hash_point(seed, fx, fy, 0.0),
                hash_point(seed, fx, fy, 1.0),
                hash_point(seed, fx, fy, 2.0),
                hash_point(seed, fx, fy, 3.0),
            ));
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> HexMetrics {
        HexMetrics::new(&MapConfig::default())
    }

    #[test]
    fn test_inner_radius_ratio() {
        let m = metrics();
        assert!((m.inner_radius - m.outer_radius * 0.866_025_4).abs() < 1e-4);
    }

    #[test]
    fn test_corner_spacing() {
        let m = metrics();
        for d in HexDirection::ALL {
            let c1 = m.first_corner(d);
            let c2 = m.second_corner(d);
            // Every hex side has the same length as the outer radius.
            assert!((c1.distance(c2) - m.outer_radius).abs() < 1e-3);
        }
    }

    #[test]
    fn test_terrace_lerp_endpoints() {
        let m = metrics();
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 3.0, -4.0);
        assert_eq!(m.terrace_lerp(a, b, 0), a);
        let end = m.terrace_lerp(a, b, m.terrace_steps);
        assert!((end - b).length() < 1e-4);
    }

    #[test]
    fn test_terrace_lerp_flat_steps_hold_height() {
        let m = metrics();
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 3.0, 0.0);
        // Even steps reuse the previous odd step's height.
        for step in (2..m.terrace_steps).step_by(2) {
            let flat = m.terrace_lerp(a, b, step);
            let prev = m.terrace_lerp(a, b, step - 1);
            assert_eq!(flat.y, prev.y);
            assert!(flat.x > prev.x);
        }
    }

    #[test]
    fn test_edge_type_classification() {
        let m = metrics();
        assert_eq!(m.edge_type(2, 2), HexEdgeType::Flat);
        assert_eq!(m.edge_type(2, 3), HexEdgeType::Slope);
        assert_eq!(m.edge_type(3, 2), HexEdgeType::Slope);
        assert_eq!(m.edge_type(0, 2), HexEdgeType::Cliff);
        assert_eq!(m.edge_type(5, 1), HexEdgeType::Cliff);
    }

    #[test]
    fn test_noise_deterministic_for_seed() {
        let a = HexMetrics::new(&MapConfig::default());
        let b = HexMetrics::new(&MapConfig::default());
        let p = Vec3::new(37.5, 0.0, -12.25);
        assert_eq!(a.sample_noise(p), b.sample_noise(p));
        assert_eq!(a.perturb(p), b.perturb(p));
    }

    #[test]
    fn test_perturb_leaves_height_alone() {
        let m = metrics();
        let p = Vec3::new(5.0, 7.5, 9.0);
        assert_eq!(m.perturb(p).y, p.y);
    }

    #[test]
    fn test_edge_vertices_spread() {
        let e = EdgeVertices::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(e.v2.x, 1.0);
        assert_eq!(e.v3.x, 2.0);
        assert_eq!(e.v4.x, 3.0);
    }
}
