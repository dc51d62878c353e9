//! Hex Map Engine Library
//!
//! A hexagonal map engine: grid model, seamless terrain triangulation, and
//! turn-aware pathfinding. The engine is host-agnostic — it produces vertex
//! and index buffers and consumes plain method calls; rendering, input, and
//! scheduling belong to the embedding application.
//!
//! # Modules
//!
//! - [`hex`] - Coordinates, directions, and the per-map geometry context
//! - [`grid`] - The cell arena, editing operations, units, and save/load
//! - [`search`] - A* pathfinding with a per-turn movement budget
//! - [`triangulate`] - Chunked mesh generation for every geometry layer
//! - [`mesh`] - Buffer types the triangulator emits
//! - [`config`] - Construction-time map parameters
//!
//! # Example
//!
//! ```ignore
//! use hex_map_engine::{HexGrid, MapConfig, Pathfinder};
//!
//! let mut grid = HexGrid::new(MapConfig::default());
//! grid.create_map(20, 15);
//!
//! // Edit some terrain, then rebuild whatever changed.
//! let cell = grid.cell_index_at_position(glam::Vec3::ZERO).unwrap();
//! grid.set_elevation(cell, 2);
//! for (chunk, mesh) in grid.rebuild_dirty() {
//!     upload(chunk, mesh.terrain.vertex_buffer());
//! }
//!
//! // Find a route with 24 movement points per turn.
//! let mut pathfinder = Pathfinder::new();
//! if pathfinder.find_path(&grid, from, to, 24) {
//!     for step in pathfinder.path() {
//!         println!("{}", grid.cell(step).coordinates());
//!     }
//! }
//! ```

pub mod config;
pub mod grid;
pub mod hex;
pub mod mesh;
pub mod search;
pub mod triangulate;

// Re-export the main types at crate level for convenience
pub use config::MapConfig;
pub use grid::{HexCell, HexGrid, HexUnit, MapFileError};
pub use hex::{EdgeVertices, HexCoordinates, HexDirection, HexEdgeType, HexMetrics};
pub use mesh::{MeshData, MeshVertex};
pub use search::{CellPriorityQueue, Pathfinder};
pub use triangulate::{ChunkMesh, ChunkTriangulator};
