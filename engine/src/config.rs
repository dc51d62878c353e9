//! Map Configuration
//!
//! Tunable parameters fixed at grid construction. Hosts can persist these as
//! JSON alongside their own settings; everything derived (radii ratios,
//! terrace step sizes, noise tables) lives in
//! [`HexMetrics`](crate::hex::HexMetrics).

use serde::{Deserialize, Serialize};

/// Construction-time map parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Seed for the perturbation noise grid. Same seed, same terrain jitter.
    pub seed: u32,
    /// Center-to-corner distance of one cell, in world units.
    pub outer_radius: f32,
    /// Cells per rebuild chunk along x. Map widths must be a multiple.
    pub chunk_size_x: usize,
    /// Cells per rebuild chunk along z. Map heights must be a multiple.
    pub chunk_size_z: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seed: 1234,
            outer_radius: 10.0,
            chunk_size_x: 5,
            chunk_size_z: 5,
        }
    }
}

impl MapConfig {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<MapConfig, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let config = MapConfig {
            seed: 99,
            outer_radius: 12.5,
            chunk_size_x: 4,
            chunk_size_z: 8,
        };
        let json = config.to_json().unwrap();
        assert_eq!(MapConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_default_chunk_size() {
        let config = MapConfig::default();
        assert_eq!(config.chunk_size_x, 5);
        assert_eq!(config.chunk_size_z, 5);
    }
}
