//! Map File Save/Load
//!
//! Versioned little-endian binary format for the whole grid plus units.
//! Layout: `i32` format version | `i32` width, `i32` height | one record per
//! cell (row-major) | `i32` unit count | one record per unit.
//!
//! Cell records are single bytes in a fixed order: terrain type, elevation,
//! water level, urban/farm/plant levels, special index, walled flag, incoming
//! river, outgoing river, road flags. River bytes store direction + 128, or
//! zero for no river. Units store their cube x and z as `i32` and their
//! orientation as `f32`.

use std::io::{Read, Write};
use std::path::Path;

use crate::grid::{HexGrid, LEGACY_CELL_COUNT_X, LEGACY_CELL_COUNT_Z};
use crate::hex::{HexCoordinates, HexDirection};

/// Current file format version.
pub const MAP_FORMAT_VERSION: i32 = 2;

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors that can occur during map save/load.
#[derive(Debug)]
pub enum MapFileError {
    /// File version is newer than this build understands.
    UnsupportedVersion(i32),
    /// Saved dimensions fail map-size validation.
    InvalidMapSize { x: i32, z: i32 },
    /// A saved unit sits on coordinates outside the map.
    InvalidUnitLocation,
    /// Standard I/O error (including truncated files).
    IoError(std::io::Error),
}

impl std::fmt::Display for MapFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapFileError::UnsupportedVersion(v) => {
                write!(f, "unsupported map format version: {v}")
            }
            MapFileError::InvalidMapSize { x, z } => {
                write!(f, "invalid map size in file: {x} x {z}")
            }
            MapFileError::InvalidUnitLocation => {
                write!(f, "unit location outside map bounds")
            }
            MapFileError::IoError(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for MapFileError {}

impl From<std::io::Error> for MapFileError {
    fn from(e: std::io::Error) -> Self {
        MapFileError::IoError(e)
    }
}

// ============================================================================
// PRIMITIVES
// ============================================================================

fn write_i32<W: Write>(w: &mut W, value: i32) -> std::io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

fn write_f32<W: Write>(w: &mut W, value: f32) -> std::io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

fn write_u8<W: Write>(w: &mut W, value: u8) -> std::io::Result<()> {
    w.write_all(&[value])
}

fn read_i32<R: Read>(r: &mut R) -> std::io::Result<i32> {
    let mut bytes = [0u8; 4];
    r.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

fn read_f32<R: Read>(r: &mut R) -> std::io::Result<f32> {
    let mut bytes = [0u8; 4];
    r.read_exact(&mut bytes)?;
    Ok(f32::from_le_bytes(bytes))
}

fn read_u8<R: Read>(r: &mut R) -> std::io::Result<u8> {
    let mut byte = [0u8; 1];
    r.read_exact(&mut byte)?;
    Ok(byte[0])
}

fn write_river<W: Write>(w: &mut W, river: Option<HexDirection>) -> std::io::Result<()> {
    match river {
        Some(d) => write_u8(w, d.index() as u8 + 128),
        None => write_u8(w, 0),
    }
}

fn read_river<R: Read>(r: &mut R) -> std::io::Result<Option<HexDirection>> {
    let byte = read_u8(r)?;
    if byte >= 128 {
        Ok(Some(HexDirection::from_index((byte - 128) as usize)))
    } else {
        Ok(None)
    }
}

// ============================================================================
// SAVE
// ============================================================================

/// Write the grid and its units to a stream.
pub fn save_map<W: Write>(grid: &HexGrid, writer: &mut W) -> Result<(), MapFileError> {
    write_i32(writer, MAP_FORMAT_VERSION)?;
    write_i32(writer, grid.cell_count_x())?;
    write_i32(writer, grid.cell_count_z())?;

    for cell in grid.cells() {
        write_u8(writer, cell.terrain_type_index())?;
        write_u8(writer, cell.elevation() as u8)?;
        write_u8(writer, cell.water_level() as u8)?;
        write_u8(writer, cell.urban_level())?;
        write_u8(writer, cell.farm_level())?;
        write_u8(writer, cell.plant_level())?;
        write_u8(writer, cell.special_index())?;
        write_u8(writer, cell.walled() as u8)?;
        write_river(writer, cell.incoming_river())?;
        write_river(writer, cell.outgoing_river())?;

        let mut road_flags = 0u8;
        for d in HexDirection::ALL {
            if cell.has_road_through_edge(d) {
                road_flags |= 1 << d.index();
            }
        }
        write_u8(writer, road_flags)?;
    }

    write_i32(writer, grid.units().len() as i32)?;
    for unit in grid.units() {
        let coordinates = grid.cell(unit.location()).coordinates();
        write_i32(writer, coordinates.x())?;
        write_i32(writer, coordinates.z())?;
        write_f32(writer, unit.orientation())?;
    }
    Ok(())
}

/// Write the grid to a file, creating parent directories as needed.
pub fn save_map_file(grid: &HexGrid, path: &Path) -> Result<(), MapFileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    save_map(grid, &mut file)
}

// ============================================================================
// LOAD
// ============================================================================

/// Read a map from a stream into the grid, rebuilding it at the saved
/// dimensions when they differ. On success every chunk is marked dirty so
/// the next rebuild regenerates all geometry.
pub fn load_map<R: Read>(grid: &mut HexGrid, reader: &mut R) -> Result<(), MapFileError> {
    let version = read_i32(reader)?;
    if version > MAP_FORMAT_VERSION {
        return Err(MapFileError::UnsupportedVersion(version));
    }

    // Version 0 predates stored dimensions.
    let (x, z) = if version >= 1 {
        (read_i32(reader)?, read_i32(reader)?)
    } else {
        (LEGACY_CELL_COUNT_X, LEGACY_CELL_COUNT_Z)
    };

    grid.clear_units();
    let needs_rebuild =
        grid.cell_count() == 0 || x != grid.cell_count_x() || z != grid.cell_count_z();
    if needs_rebuild && !grid.create_map(x, z) {
        return Err(MapFileError::InvalidMapSize { x, z });
    }

    for i in 0..grid.cell_count() as u32 {
        load_cell(grid, i, reader)?;
    }
    for dirty in grid.dirty_chunks.iter_mut() {
        *dirty = true;
    }

    if version >= 2 {
        let unit_count = read_i32(reader)?;
        for _ in 0..unit_count {
            let cx = read_i32(reader)?;
            let cz = read_i32(reader)?;
            let orientation = read_f32(reader)?;
            let cell = grid
                .cell_index_at(HexCoordinates::new(cx, cz))
                .ok_or(MapFileError::InvalidUnitLocation)?;
            grid.add_unit(cell, orientation);
        }
    }
    Ok(())
}

/// Read a map from a file.
pub fn load_map_file(grid: &mut HexGrid, path: &Path) -> Result<(), MapFileError> {
    let mut file = std::io::BufReader::new(std::fs::File::open(path)?);
    load_map(grid, &mut file)
}

/// Cell records bypass the editing setters: symmetry is already encoded in
/// the file, so fields are assigned directly and only the position is
/// recomputed.
fn load_cell<R: Read>(grid: &mut HexGrid, index: u32, reader: &mut R) -> Result<(), MapFileError> {
    let terrain_type_index = read_u8(reader)?;
    let elevation = read_u8(reader)? as i32;
    let water_level = read_u8(reader)? as i32;
    let urban_level = read_u8(reader)?;
    let farm_level = read_u8(reader)?;
    let plant_level = read_u8(reader)?;
    let special_index = read_u8(reader)?;
    let walled = read_u8(reader)? != 0;
    let incoming_river = read_river(reader)?;
    let outgoing_river = read_river(reader)?;
    let road_flags = read_u8(reader)?;

    let y = grid
        .metrics
        .perturbed_cell_y(elevation, grid.cells[index as usize].position);
    let cell = &mut grid.cells[index as usize];
    cell.terrain_type_index = terrain_type_index;
    cell.elevation = elevation;
    cell.water_level = water_level;
    cell.urban_level = urban_level;
    cell.farm_level = farm_level;
    cell.plant_level = plant_level;
    cell.special_index = special_index;
    cell.walled = walled;
    cell.incoming_river = incoming_river;
    cell.outgoing_river = outgoing_river;
    for d in HexDirection::ALL {
        cell.roads[d.index()] = road_flags & (1 << d.index()) != 0;
    }
    cell.position.y = y;
    Ok(())
}
