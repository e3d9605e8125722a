//! # DELVE Procedural Generation
//!
//! Deterministic room generation from integer seeds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed + same configuration = same grid and
//!    same placement list, bit for bit
//! 2. **Greedy**: One column-by-column placement pass, no backtracking
//! 3. **Non-fatal**: Configuration gaps skip cells, they never abort a build
//!
//! ## Core Components
//!
//! - `Grid`: Bounds-checked 2D array of classified cells
//! - `NoiseClassifier`: Irregular region of ground, water and lava
//! - `SeparationEnforcer`: Keeps one classification away from another
//! - `PieceCatalog` / `PieceSelector`: Weighted multi-cell pieces
//! - `RoomBuilder`: Greedy occupancy-checked placement
//! - `RoomGenerator`: The whole pipeline behind one call
//!
//! ## Example
//!
//! ```rust
//! use delve_procedural::{GenerationConfig, PieceCatalog, RoomContext, RoomGenerator, RoomSeed};
//!
//! let generator = RoomGenerator::new(GenerationConfig::default(), PieceCatalog::standard())?;
//! let seed = RoomSeed::new(12345)?;
//!
//! let room = generator.build(seed, RoomContext::at(0))?;
//! let again = generator.build(seed, RoomContext::at(0))?;
//! assert_eq!(room.grid, again.grid);
//! assert_eq!(room.placements, again.placements);
//! # Ok::<(), delve_procedural::ProcgenError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod classifier;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod layout;
pub mod noise;
pub mod pieces;
pub mod separation;

pub use builder::{BuildOutput, BuildReport, Placement, RoomBuilder};
pub use classifier::NoiseClassifier;
pub use config::{
    BorderedSettings, ContentSettings, FieldSettings, GenerationConfig, LayoutMode,
    SeparationSettings, ShapeSettings,
};
pub use error::{ProcgenError, ProcgenResult};
pub use generator::{RoomBlueprint, RoomGenerator};
pub use grid::{CellType, Grid, OccupancyMask};
pub use layout::{back_door_cell, bordered_room, forward_door_cell, RoomContext};
pub use noise::{RoomSeed, SimplexNoise, SEED_CEILING};
pub use pieces::{Piece, PieceCatalog, PieceSelector};
pub use separation::SeparationEnforcer;
