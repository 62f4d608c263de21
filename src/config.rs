//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest number of broad-phase cells a configuration may ask for.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// World and grid parameters shared by the graph and its simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimConfig {
    /// Width of the world rectangle (default: 1024.0).
    /// New entities spawn inside it and the broad-phase grid covers it.
    pub world_width: f32,
    /// Height of the world rectangle (default: 768.0).
    pub world_height: f32,
    /// Side length of one broad-phase grid cell (default: 64.0).
    pub cell_size: f32,
    /// Size given to newly created entities (default: 20.0).
    pub default_size: f32,
    /// Seed for spawn positions and random source selection (default: 0).
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: 1024.0,
            world_height: 768.0,
            cell_size: 64.0,
            default_size: 20.0,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Check that the grid can be built and sizes make sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        let world_ok = |v: f32| v.is_finite() && v > 0.0;
        if !world_ok(self.world_width) || !world_ok(self.world_height) {
            return Err(ConfigError::InvalidWorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if !(self.default_size.is_finite() && self.default_size >= 0.0) {
            return Err(ConfigError::InvalidEntitySize(self.default_size));
        }
        let (cols, rows) = self.grid_dims();
        match cols.checked_mul(rows) {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok(()),
            _ => Err(ConfigError::GridTooLarge { cols, rows }),
        }
    }

    /// Number of grid columns and rows covering the world.
    ///
    /// Saturates for degenerate sizes; `validate` rejects those.
    pub fn grid_dims(&self) -> (usize, usize) {
        let cols = (self.world_width / self.cell_size).ceil().max(1.0) as usize;
        let rows = (self.world_height / self.cell_size).ceil().max(1.0) as usize;
        (cols, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.grid_dims(), (16, 12));
    }

    #[test]
    fn test_grid_dims_round_up() {
        let config = SimConfig {
            world_width: 100.0,
            world_height: 10.0,
            cell_size: 30.0,
            ..SimConfig::default()
        };
        assert_eq!(config.grid_dims(), (4, 1));
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        for cell_size in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            let config = SimConfig {
                cell_size,
                ..SimConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidCellSize(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_world() {
        let config = SimConfig {
            world_height: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidWorldSize {
                width: 1024.0,
                height: 0.0
            })
        );
    }

    #[test]
    fn test_rejects_bad_entity_size() {
        let config = SimConfig {
            default_size: -1.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidEntitySize(-1.0))
        );
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let tiny_cells = SimConfig {
            cell_size: 1e-3,
            ..SimConfig::default()
        };
        assert!(matches!(
            tiny_cells.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));

        let huge_world = SimConfig {
            world_width: 1e30,
            world_height: 1e30,
            ..SimConfig::default()
        };
        assert!(matches!(
            huge_world.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_grid_at_cap_is_valid() {
        let config = SimConfig {
            world_width: 1024.0,
            world_height: 1024.0,
            cell_size: 1.0,
            ..SimConfig::default()
        };
        assert_eq!(config.grid_dims(), (1024, 1024));
        assert_eq!(config.validate(), Ok(()));
    }
}
