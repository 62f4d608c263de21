//! Error types.

use thiserror::Error;

/// Rejected simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    #[error("world size must be positive and finite, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },
    #[error("default entity size must be non-negative and finite, got {0}")]
    InvalidEntitySize(f32),
    #[error("grid of {cols}x{rows} cells exceeds the cell limit")]
    GridTooLarge { cols: usize, rows: usize },
}
