//! Hex Grid
//!
//! Owns the flat cell arena, the neighbor topology, chunk dirty tracking,
//! and the unit list. All editing operations live here because they touch
//! both sides of a connection (river/road symmetry) or need to mark chunks
//! for rebuild.
//!
//! ## Editing contract
//! Invalid edits never fail loudly: a river pushed uphill, a road across a
//! cliff, or a coordinate outside the map are ignored, matching drag-editor
//! ergonomics. Only map creation and file IO report errors.

pub mod cell;
pub mod io;
pub mod unit;

use glam::Vec3;

use crate::config::MapConfig;
use crate::hex::{HexCoordinates, HexDirection, HexEdgeType, HexMetrics};
use crate::triangulate::{ChunkMesh, ChunkTriangulator};

pub use cell::HexCell;
pub use io::MapFileError;
pub use unit::HexUnit;

/// Default map size used when a version-0 save carries no dimensions.
pub(crate) const LEGACY_CELL_COUNT_X: i32 = 30;
pub(crate) const LEGACY_CELL_COUNT_Z: i32 = 25;

/// The hex map: cell arena, topology, chunks, units.
pub struct HexGrid {
    metrics: HexMetrics,
    cell_count_x: i32,
    cell_count_z: i32,
    chunk_count_x: i32,
    chunk_count_z: i32,
    cells: Vec<HexCell>,
    dirty_chunks: Vec<bool>,
    units: Vec<HexUnit>,
}

impl HexGrid {
    /// An empty grid; call [`create_map`](Self::create_map) to populate it.
    pub fn new(config: MapConfig) -> HexGrid {
        HexGrid {
            metrics: HexMetrics::new(&config),
            cell_count_x: 0,
            cell_count_z: 0,
            chunk_count_x: 0,
            chunk_count_z: 0,
            cells: Vec::new(),
            dirty_chunks: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Rebuild the grid at the given size. Returns false (leaving the grid
    /// unchanged) when a dimension is non-positive or not a multiple of the
    /// chunk size.
    pub fn create_map(&mut self, x: i32, z: i32) -> bool {
        let csx = self.metrics.chunk_size_x as i32;
        let csz = self.metrics.chunk_size_z as i32;
        if x <= 0 || x % csx != 0 || z <= 0 || z % csz != 0 {
            return false;
        }

        self.clear_units();
        self.cell_count_x = x;
        self.cell_count_z = z;
        self.chunk_count_x = x / csx;
        self.chunk_count_z = z / csz;
        self.dirty_chunks = vec![true; (self.chunk_count_x * self.chunk_count_z) as usize];
        self.create_cells();
        true
    }

    fn create_cells(&mut self) {
        self.cells = Vec::with_capacity((self.cell_count_x * self.cell_count_z) as usize);
        for z in 0..self.cell_count_z {
            for x in 0..self.cell_count_x {
                self.create_cell(x, z);
            }
        }
        // Apply the per-cell vertical jitter now that every cell exists.
        for i in 0..self.cells.len() {
            self.refresh_position(i as u32);
        }
    }

    fn create_cell(&mut self, x: i32, z: i32) {
        let m = &self.metrics;
        // Every second row shifts half a cell to the left.
        let px = (x as f32 + z as f32 * 0.5 - (z / 2) as f32) * (m.inner_radius * 2.0);
        let pz = z as f32 * (m.outer_radius * 1.5);

        let chunk_x = x / m.chunk_size_x as i32;
        let chunk_z = z / m.chunk_size_z as i32;
        let chunk = (chunk_x + chunk_z * self.chunk_count_x) as u32;

        let i = self.cells.len() as u32;
        self.cells.push(HexCell::new(
            HexCoordinates::from_offset(x, z),
            i,
            chunk,
            Vec3::new(px, 0.0, pz),
        ));

        let width = self.cell_count_x;
        if x > 0 {
            self.link_neighbors(i, HexDirection::W, i - 1);
        }
        if z > 0 {
            if z & 1 == 0 {
                self.link_neighbors(i, HexDirection::SE, i - width as u32);
                if x > 0 {
                    self.link_neighbors(i, HexDirection::SW, i - width as u32 - 1);
                }
            } else {
                self.link_neighbors(i, HexDirection::SW, i - width as u32);
                if x < width - 1 {
                    self.link_neighbors(i, HexDirection::SE, i - width as u32 + 1);
                }
            }
        }
    }

    fn link_neighbors(&mut self, cell: u32, direction: HexDirection, neighbor: u32) {
        self.cells[cell as usize].neighbors[direction.index()] = Some(neighbor);
        self.cells[neighbor as usize].neighbors[direction.opposite().index()] = Some(cell);
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    pub fn cell_count_x(&self) -> i32 {
        self.cell_count_x
    }

    pub fn cell_count_z(&self) -> i32 {
        self.cell_count_z
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, index: u32) -> &HexCell {
        &self.cells[index as usize]
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Arena index for cube coordinates, if they fall inside the map.
    pub fn cell_index_at(&self, coordinates: HexCoordinates) -> Option<u32> {
        let z = coordinates.z();
        if z < 0 || z >= self.cell_count_z {
            return None;
        }
        let x = coordinates.x() + z / 2;
        if x < 0 || x >= self.cell_count_x {
            return None;
        }
        Some((x + z * self.cell_count_x) as u32)
    }

    /// Nearest cell to a world position, if inside the map.
    pub fn cell_index_at_position(&self, position: Vec3) -> Option<u32> {
        self.cell_index_at(HexCoordinates::from_position(position, &self.metrics))
    }

    pub fn neighbor(&self, cell: u32, direction: HexDirection) -> Option<u32> {
        self.cells[cell as usize].neighbor(direction)
    }

    /// Elevation relationship across an edge; None without a neighbor.
    pub fn edge_type(&self, cell: u32, direction: HexDirection) -> Option<HexEdgeType> {
        self.neighbor(cell, direction)
            .map(|n| self.edge_type_between(cell, n))
    }

    pub fn edge_type_between(&self, a: u32, b: u32) -> HexEdgeType {
        self.metrics
            .edge_type(self.cells[a as usize].elevation, self.cells[b as usize].elevation)
    }

    fn elevation_difference(&self, cell: u32, direction: HexDirection) -> i32 {
        match self.neighbor(cell, direction) {
            Some(n) => (self.cells[cell as usize].elevation - self.cells[n as usize].elevation).abs(),
            None => 0,
        }
    }

    // ------------------------------------------------------------------
    // Chunks
    // ------------------------------------------------------------------

    pub fn chunk_count(&self) -> usize {
        self.dirty_chunks.len()
    }

    pub fn is_chunk_dirty(&self, chunk: usize) -> bool {
        self.dirty_chunks[chunk]
    }

    /// Cell arena indices of one chunk, row-major within the chunk.
    pub fn chunk_cells(&self, chunk: usize) -> Vec<u32> {
        let csx = self.metrics.chunk_size_x as i32;
        let csz = self.metrics.chunk_size_z as i32;
        let chunk_x = chunk as i32 % self.chunk_count_x;
        let chunk_z = chunk as i32 / self.chunk_count_x;

        let mut indices = Vec::with_capacity((csx * csz) as usize);
        for lz in 0..csz {
            for lx in 0..csx {
                let x = chunk_x * csx + lx;
                let z = chunk_z * csz + lz;
                indices.push((x + z * self.cell_count_x) as u32);
            }
        }
        indices
    }

    fn mark_chunk_dirty(&mut self, chunk: u32) {
        self.dirty_chunks[chunk as usize] = true;
    }

    /// Mark the cell's chunk, and every neighboring chunk that shares an
    /// edge with this cell, for rebuild.
    fn refresh(&mut self, cell: u32) {
        let chunk = self.cells[cell as usize].chunk;
        self.mark_chunk_dirty(chunk);
        for d in HexDirection::ALL {
            if let Some(n) = self.cells[cell as usize].neighbor(d) {
                let neighbor_chunk = self.cells[n as usize].chunk;
                if neighbor_chunk != chunk {
                    self.mark_chunk_dirty(neighbor_chunk);
                }
            }
        }
    }

    fn refresh_self_only(&mut self, cell: u32) {
        let chunk = self.cells[cell as usize].chunk;
        self.mark_chunk_dirty(chunk);
    }

    /// Re-triangulate every dirty chunk and clear the flags. The host calls
    /// this once per frame tick; edits in between coalesce into one rebuild.
    pub fn rebuild_dirty(&mut self) -> Vec<(usize, ChunkMesh)> {
        let dirty: Vec<usize> = (0..self.dirty_chunks.len())
            .filter(|&c| self.dirty_chunks[c])
            .collect();
        for &c in &dirty {
            self.dirty_chunks[c] = false;
        }
        dirty
            .into_iter()
            .map(|c| (c, ChunkTriangulator::new(self).triangulate(c)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Terrain editing
    // ------------------------------------------------------------------

    pub fn set_elevation(&mut self, cell: u32, elevation: i32) {
        if self.cells.get(cell as usize).is_none()
            || self.cells[cell as usize].elevation == elevation
        {
            return;
        }
        self.cells[cell as usize].elevation = elevation;
        self.refresh_position(cell);
        self.validate_rivers(cell);
        // Roads cannot climb more than one level; drop any that now would.
        for d in HexDirection::ALL {
            if self.cells[cell as usize].roads[d.index()] && self.elevation_difference(cell, d) > 1 {
                self.set_road(cell, d, false);
            }
        }
        self.refresh(cell);
    }

    pub fn set_water_level(&mut self, cell: u32, water_level: i32) {
        if self.cells.get(cell as usize).is_none()
            || self.cells[cell as usize].water_level == water_level
        {
            return;
        }
        self.cells[cell as usize].water_level = water_level;
        self.validate_rivers(cell);
        self.refresh(cell);
    }

    pub fn set_terrain_type_index(&mut self, cell: u32, terrain_type_index: u8) {
        let Some(c) = self.cells.get(cell as usize) else {
            return;
        };
        if c.terrain_type_index == terrain_type_index {
            return;
        }
        self.cells[cell as usize].terrain_type_index = terrain_type_index;
        self.refresh(cell);
    }

    pub fn set_urban_level(&mut self, cell: u32, level: u8) {
        let level = level.min(3);
        let Some(c) = self.cells.get(cell as usize) else {
            return;
        };
        if c.urban_level == level {
            return;
        }
        self.cells[cell as usize].urban_level = level;
        self.refresh_self_only(cell);
    }

    pub fn set_farm_level(&mut self, cell: u32, level: u8) {
        let level = level.min(3);
        let Some(c) = self.cells.get(cell as usize) else {
            return;
        };
        if c.farm_level == level {
            return;
        }
        self.cells[cell as usize].farm_level = level;
        self.refresh_self_only(cell);
    }

    pub fn set_plant_level(&mut self, cell: u32, level: u8) {
        let level = level.min(3);
        let Some(c) = self.cells.get(cell as usize) else {
            return;
        };
        if c.plant_level == level {
            return;
        }
        self.cells[cell as usize].plant_level = level;
        self.refresh_self_only(cell);
    }

    /// Special features are mutually exclusive with rivers and clear roads.
    pub fn set_special_index(&mut self, cell: u32, special_index: u8) {
        let Some(c) = self.cells.get(cell as usize) else {
            return;
        };
        if c.special_index == special_index || c.has_river() {
            return;
        }
        self.cells[cell as usize].special_index = special_index;
        self.remove_roads(cell);
        self.refresh_self_only(cell);
    }

    pub fn set_walled(&mut self, cell: u32, walled: bool) {
        let Some(c) = self.cells.get(cell as usize) else {
            return;
        };
        if c.walled == walled {
            return;
        }
        self.cells[cell as usize].walled = walled;
        self.refresh(cell);
    }

    fn refresh_position(&mut self, cell: u32) {
        let c = &self.cells[cell as usize];
        let y = self.metrics.perturbed_cell_y(c.elevation, c.position);
        self.cells[cell as usize].position.y = y;
    }

    // ------------------------------------------------------------------
    // Rivers
    // ------------------------------------------------------------------

    /// Rivers flow downhill, or sideways onto a cell whose surface sits at
    /// this cell's water level.
    fn is_valid_river_destination(&self, from: u32, to: Option<u32>) -> bool {
        let Some(to) = to else {
            return false;
        };
        let from = &self.cells[from as usize];
        let to = &self.cells[to as usize];
        from.elevation >= to.elevation || from.water_level == to.elevation
    }

    fn validate_rivers(&mut self, cell: u32) {
        if let Some(d) = self.cells[cell as usize].outgoing_river {
            let n = self.cells[cell as usize].neighbor(d);
            if !self.is_valid_river_destination(cell, n) {
                self.remove_outgoing_river(cell);
            }
        }
        if let Some(d) = self.cells[cell as usize].incoming_river {
            if let Some(n) = self.cells[cell as usize].neighbor(d) {
                if !self.is_valid_river_destination(n, Some(cell)) {
                    self.remove_incoming_river(cell);
                }
            }
        }
    }

    /// Start (or redirect) the river leaving this cell. Ignored when the
    /// destination is missing or uphill.
    pub fn set_outgoing_river(&mut self, cell: u32, direction: HexDirection) {
        if self.cells.get(cell as usize).is_none()
            || self.cells[cell as usize].outgoing_river == Some(direction)
        {
            return;
        }
        let Some(neighbor) = self.cells[cell as usize].neighbor(direction) else {
            return;
        };
        if !self.is_valid_river_destination(cell, Some(neighbor)) {
            return;
        }

        self.remove_outgoing_river(cell);
        if self.cells[cell as usize].incoming_river == Some(direction) {
            self.remove_incoming_river(cell);
        }
        self.cells[cell as usize].outgoing_river = Some(direction);
        self.cells[cell as usize].special_index = 0;

        self.remove_incoming_river(neighbor);
        self.cells[neighbor as usize].incoming_river = Some(direction.opposite());
        self.cells[neighbor as usize].special_index = 0;

        // A river claims the edge; any road there is washed out. This also
        // refreshes both chunks.
        self.set_road(cell, direction, false);
    }

    pub fn remove_outgoing_river(&mut self, cell: u32) {
        let Some(d) = self.cells.get(cell as usize).and_then(|c| c.outgoing_river) else {
            return;
        };
        self.cells[cell as usize].outgoing_river = None;
        self.refresh_self_only(cell);
        if let Some(n) = self.cells[cell as usize].neighbor(d) {
            self.cells[n as usize].incoming_river = None;
            self.refresh_self_only(n);
        }
    }

    pub fn remove_incoming_river(&mut self, cell: u32) {
        let Some(d) = self.cells.get(cell as usize).and_then(|c| c.incoming_river) else {
            return;
        };
        self.cells[cell as usize].incoming_river = None;
        self.refresh_self_only(cell);
        if let Some(n) = self.cells[cell as usize].neighbor(d) {
            self.cells[n as usize].outgoing_river = None;
            self.refresh_self_only(n);
        }
    }

    pub fn remove_river(&mut self, cell: u32) {
        self.remove_outgoing_river(cell);
        self.remove_incoming_river(cell);
    }

    // ------------------------------------------------------------------
    // Roads
    // ------------------------------------------------------------------

    /// Add a road across an edge. Ignored over rivers, cliffs, missing
    /// neighbors, and special-feature cells.
    pub fn add_road(&mut self, cell: u32, direction: HexDirection) {
        let Some(c) = self.cells.get(cell as usize) else {
            return;
        };
        if c.roads[direction.index()]
            || c.has_river_through_edge(direction)
            || c.is_special()
        {
            return;
        }
        let Some(n) = c.neighbor(direction) else {
            return;
        };
        if self.cells[n as usize].is_special() || self.elevation_difference(cell, direction) > 1 {
            return;
        }
        self.set_road(cell, direction, true);
    }

    pub fn remove_roads(&mut self, cell: u32) {
        for d in HexDirection::ALL {
            if self
                .cells
                .get(cell as usize)
                .is_some_and(|c| c.roads[d.index()])
            {
                self.set_road(cell, d, false);
            }
        }
    }

    fn set_road(&mut self, cell: u32, direction: HexDirection, state: bool) {
        self.cells[cell as usize].roads[direction.index()] = state;
        if let Some(n) = self.cells[cell as usize].neighbor(direction) {
            self.cells[n as usize].roads[direction.opposite().index()] = state;
            self.refresh_self_only(n);
        }
        self.refresh_self_only(cell);
    }

    // ------------------------------------------------------------------
    // Units
    // ------------------------------------------------------------------

    pub fn units(&self) -> &[HexUnit] {
        &self.units
    }

    pub fn unit(&self, unit: u32) -> &HexUnit {
        &self.units[unit as usize]
    }

    /// A unit can stand on any dry, unoccupied cell.
    pub fn is_valid_unit_destination(&self, cell: u32) -> bool {
        self.cells
            .get(cell as usize)
            .is_some_and(|c| !c.is_underwater() && c.unit.is_none())
    }

    /// Place a new unit; None when the cell is invalid as a destination.
    pub fn add_unit(&mut self, cell: u32, orientation: f32) -> Option<u32> {
        if !self.is_valid_unit_destination(cell) {
            return None;
        }
        let unit = self.units.len() as u32;
        self.units.push(HexUnit {
            location: cell,
            orientation,
        });
        self.cells[cell as usize].unit = Some(unit);
        Some(unit)
    }

    /// Move a unit, clearing its old cell's occupancy link. Ignored when the
    /// destination is invalid.
    pub fn move_unit(&mut self, unit: u32, cell: u32) {
        if unit as usize >= self.units.len() || !self.is_valid_unit_destination(cell) {
            return;
        }
        let old = self.units[unit as usize].location;
        self.cells[old as usize].unit = None;
        self.cells[cell as usize].unit = Some(unit);
        self.units[unit as usize].location = cell;
    }

    /// Destroy a unit. The last unit takes over the removed slot.
    pub fn remove_unit(&mut self, unit: u32) {
        if unit as usize >= self.units.len() {
            return;
        }
        let location = self.units[unit as usize].location;
        self.cells[location as usize].unit = None;
        self.units.swap_remove(unit as usize);
        if (unit as usize) < self.units.len() {
            let moved_location = self.units[unit as usize].location;
            self.cells[moved_location as usize].unit = Some(unit);
        }
    }

    pub fn clear_units(&mut self) {
        for unit in &self.units {
            self.cells[unit.location as usize].unit = None;
        }
        self.units.clear();
    }
}
