//! # Generation Error Types
//!
//! All errors that can occur while building a room.
//!
//! None of these are fatal to a session. A caller that receives one keeps
//! the previous room and carries on.

use thiserror::Error;

use crate::grid::CellType;

/// Errors that can occur in the generation pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcgenError {
    /// A grid was requested with a zero-length side.
    #[error("invalid grid dimensions: {width}x{height} (both sides must be > 0)")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A cell access fell outside the grid.
    #[error("cell ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// A seed outside the valid room seed domain.
    #[error("seed {value} is outside the room seed domain [0, {ceiling})")]
    SeedOutOfRange {
        /// The rejected value.
        value: i64,
        /// Exclusive upper bound of the domain.
        ceiling: u32,
    },

    /// A piece descriptor that can never be placed or selected.
    #[error("invalid piece '{asset}' for {cell_type:?}: {reason}")]
    InvalidPiece {
        /// Asset handle of the offending piece.
        asset: String,
        /// Classification the piece was registered for.
        cell_type: CellType,
        /// What is wrong with it.
        reason: String,
    },

    /// Generation parameters that cannot produce a room.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for generation operations.
pub type ProcgenResult<T> = Result<T, ProcgenError>;
