//! Hex Cell
//!
//! Per-cell state held in the grid's flat arena. Neighbors are arena indices,
//! never references; cells live exactly as long as the grid. Anything that
//! must stay symmetric across a connection (rivers, roads, neighbor links) is
//! mutated through [`HexGrid`](crate::grid::HexGrid), which owns the arena —
//! the queries here only read this cell's own flags.

use glam::Vec3;

use crate::hex::{HexCoordinates, HexDirection, HexMetrics};

/// One cell of the hex grid.
#[derive(Clone, Debug)]
pub struct HexCell {
    pub(crate) coordinates: HexCoordinates,
    pub(crate) index: u32,
    pub(crate) chunk: u32,
    pub(crate) position: Vec3,

    pub(crate) elevation: i32,
    pub(crate) water_level: i32,
    pub(crate) terrain_type_index: u8,
    pub(crate) urban_level: u8,
    pub(crate) farm_level: u8,
    pub(crate) plant_level: u8,
    pub(crate) special_index: u8,
    pub(crate) walled: bool,

    pub(crate) incoming_river: Option<HexDirection>,
    pub(crate) outgoing_river: Option<HexDirection>,
    pub(crate) roads: [bool; HexDirection::COUNT],

    pub(crate) neighbors: [Option<u32>; HexDirection::COUNT],
    pub(crate) unit: Option<u32>,
}

impl HexCell {
    pub(crate) fn new(coordinates: HexCoordinates, index: u32, chunk: u32, position: Vec3) -> HexCell {
        HexCell {
            coordinates,
            index,
            chunk,
            position,
            elevation: 0,
            water_level: 0,
            terrain_type_index: 0,
            urban_level: 0,
            farm_level: 0,
            plant_level: 0,
            special_index: 0,
            walled: false,
            incoming_river: None,
            outgoing_river: None,
            roads: [false; HexDirection::COUNT],
            neighbors: [None; HexDirection::COUNT],
            unit: None,
        }
    }

    // ------------------------------------------------------------------
    // Identity and topology
    // ------------------------------------------------------------------

    pub fn coordinates(&self) -> HexCoordinates {
        self.coordinates
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Chunk this cell belongs to, for rebuild batching.
    pub fn chunk(&self) -> u32 {
        self.chunk
    }

    /// Perturbed world-space center.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Arena index of the neighbor across the given edge, if any.
    pub fn neighbor(&self, direction: HexDirection) -> Option<u32> {
        self.neighbors[direction.index()]
    }

    /// Unit currently occupying this cell.
    pub fn unit(&self) -> Option<u32> {
        self.unit
    }

    // ------------------------------------------------------------------
    // Terrain attributes
    // ------------------------------------------------------------------

    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    pub fn terrain_type_index(&self) -> u8 {
        self.terrain_type_index
    }

    pub fn urban_level(&self) -> u8 {
        self.urban_level
    }

    pub fn farm_level(&self) -> u8 {
        self.farm_level
    }

    pub fn plant_level(&self) -> u8 {
        self.plant_level
    }

    pub fn special_index(&self) -> u8 {
        self.special_index
    }

    pub fn is_special(&self) -> bool {
        self.special_index > 0
    }

    pub fn walled(&self) -> bool {
        self.walled
    }

    // ------------------------------------------------------------------
    // Rivers
    // ------------------------------------------------------------------

    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    pub fn has_river(&self) -> bool {
        self.incoming_river.is_some() || self.outgoing_river.is_some()
    }

    /// True when a river starts or ends here rather than flowing through.
    pub fn has_river_begin_or_end(&self) -> bool {
        self.incoming_river.is_some() != self.outgoing_river.is_some()
    }

    /// The single river edge of a source or sink cell.
    pub fn river_begin_or_end_direction(&self) -> Option<HexDirection> {
        if self.has_river_begin_or_end() {
            self.incoming_river.or(self.outgoing_river)
        } else {
            None
        }
    }

    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    // ------------------------------------------------------------------
    // Roads
    // ------------------------------------------------------------------

    pub fn has_roads(&self) -> bool {
        self.roads.iter().any(|&road| road)
    }

    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads[direction.index()]
    }

    // ------------------------------------------------------------------
    // Derived heights
    // ------------------------------------------------------------------

    /// Vertical position of the river channel floor.
    pub fn stream_bed_y(&self, metrics: &HexMetrics) -> f32 {
        (self.elevation as f32 + metrics.stream_bed_elevation_offset) * metrics.elevation_step
    }

    /// Vertical position of the river's water surface.
    pub fn river_surface_y(&self, metrics: &HexMetrics) -> f32 {
        (self.elevation as f32 + metrics.water_elevation_offset) * metrics.elevation_step
    }

    /// Vertical position of standing water over this cell.
    pub fn water_surface_y(&self, metrics: &HexMetrics) -> f32 {
        (self.water_level as f32 + metrics.water_elevation_offset) * metrics.elevation_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> HexCell {
        HexCell::new(HexCoordinates::new(0, 0), 0, 0, Vec3::ZERO)
    }

    #[test]
    fn test_underwater_threshold() {
        let mut c = cell();
        c.elevation = 1;
        c.water_level = 1;
        assert!(!c.is_underwater());
        c.water_level = 2;
        assert!(c.is_underwater());
    }

    #[test]
    fn test_river_begin_or_end() {
        let mut c = cell();
        assert!(!c.has_river_begin_or_end());
        c.outgoing_river = Some(HexDirection::E);
        assert!(c.has_river_begin_or_end());
        assert_eq!(c.river_begin_or_end_direction(), Some(HexDirection::E));
        c.incoming_river = Some(HexDirection::W);
        assert!(c.has_river() && !c.has_river_begin_or_end());
        assert_eq!(c.river_begin_or_end_direction(), None);
    }

    #[test]
    fn test_river_through_edge() {
        let mut c = cell();
        c.incoming_river = Some(HexDirection::NW);
        c.outgoing_river = Some(HexDirection::SE);
        assert!(c.has_river_through_edge(HexDirection::NW));
        assert!(c.has_river_through_edge(HexDirection::SE));
        assert!(!c.has_river_through_edge(HexDirection::E));
    }
}
