//! Hex Geometry Module
//!
//! Coordinate system, directions, and the per-map geometry context.

pub mod coords;
pub mod direction;
pub mod metrics;

pub use coords::HexCoordinates;
pub use direction::HexDirection;
pub use metrics::{EdgeVertices, HexEdgeType, HexMetrics};
