//! # Room Generator
//!
//! Ties the pipeline together: seed → classified grid → placements.
//!
//! ```text
//! RoomSeed ──► NoiseClassifier ──► SeparationEnforcer ──┐
//!          └─► bordered_room ───────────────────────────┴─► Grid ──► RoomBuilder ──► placements
//! ```
//!
//! Everything here is a pure function of the seed, the room context and
//! the fixed configuration.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::builder::{BuildOutput, BuildReport, Placement, RoomBuilder};
use crate::classifier::NoiseClassifier;
use crate::config::{GenerationConfig, LayoutMode};
use crate::error::ProcgenResult;
use crate::grid::{Grid, OccupancyMask};
use crate::layout::{bordered_room, RoomContext};
use crate::noise::{RoomSeed, STREAM_PIECES};
use crate::pieces::{PieceCatalog, PieceSelector};
use crate::separation::SeparationEnforcer;

/// Everything generated for one room.
#[derive(Clone, Debug)]
pub struct RoomBlueprint {
    /// Seed the room was built from.
    pub seed: RoomSeed,
    /// Classified cells.
    pub grid: Grid,
    /// Placed pieces, in placement order.
    pub placements: Vec<Placement>,
    /// Cells covered by placements.
    pub occupancy: OccupancyMask,
    /// Build counters.
    pub report: BuildReport,
}

/// Deterministic room generator with fixed configuration.
#[derive(Clone, Debug)]
pub struct RoomGenerator {
    config: GenerationConfig,
    catalog: PieceCatalog,
}

impl RoomGenerator {
    /// Creates a generator after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error for an unusable configuration.
    pub fn new(config: GenerationConfig, catalog: PieceCatalog) -> ProcgenResult<Self> {
        config.validate()?;
        Ok(Self { config, catalog })
    }

    /// The fixed configuration.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// The piece catalog.
    #[must_use]
    pub const fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.config.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.config.height
    }

    /// World size of one cell.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.config.cell_size
    }

    /// Classifies a grid for `seed` as the first room of a chain (index 0).
    ///
    /// In bordered layouts index 0 has no back door. Use
    /// [`classify`](Self::classify) or [`build`](Self::build) with
    /// [`RoomContext::at`] for any later chain position.
    ///
    /// # Errors
    ///
    /// Cannot fail for a validated configuration; the `Result` mirrors
    /// [`Grid::new`].
    pub fn generate_with_seed(&self, seed: RoomSeed) -> ProcgenResult<Grid> {
        self.classify(seed, RoomContext::default())
    }

    /// Like [`generate_with_seed`](Self::generate_with_seed) for a raw
    /// integer seed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProcgenError::SeedOutOfRange`] for values outside the
    /// room seed domain.
    pub fn generate_with_raw_seed(&self, seed: i64) -> ProcgenResult<Grid> {
        self.generate_with_seed(RoomSeed::new(seed)?)
    }

    /// Classifies a grid for `seed` at a given chain position.
    ///
    /// # Errors
    ///
    /// Cannot fail for a validated configuration.
    pub fn classify(&self, seed: RoomSeed, context: RoomContext) -> ProcgenResult<Grid> {
        let config = &self.config;
        match config.layout {
            LayoutMode::Noise => {
                let classifier =
                    NoiseClassifier::new(seed, config.shape.clone(), config.content.clone());
                let mut grid = classifier.classify(config.width, config.height)?;
                SeparationEnforcer::new(config.separation.clone()).enforce(&mut grid);
                Ok(grid)
            }
            LayoutMode::Bordered => {
                bordered_room(config.width, config.height, &config.bordered, context)
            }
        }
    }

    /// Generates the full room: grid plus placements.
    ///
    /// # Errors
    ///
    /// Cannot fail for a validated configuration.
    pub fn build(&self, seed: RoomSeed, context: RoomContext) -> ProcgenResult<RoomBlueprint> {
        let grid = self.classify(seed, context)?;
        let mut selector = PieceSelector::new(ChaCha8Rng::seed_from_u64(seed.stream(STREAM_PIECES)));
        let BuildOutput {
            placements,
            occupancy,
            report,
        } = RoomBuilder::new(&self.catalog).build(&grid, &mut selector);

        tracing::debug!(
            seed = seed.value(),
            room = context.index,
            fingerprint = grid.fingerprint(),
            placements = placements.len(),
            "room generated"
        );

        Ok(RoomBlueprint {
            seed,
            grid,
            placements,
            occupancy,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellType;

    fn generator(layout: LayoutMode) -> RoomGenerator {
        let config = GenerationConfig {
            width: 40,
            height: 40,
            layout,
            ..GenerationConfig::default()
        };
        RoomGenerator::new(config, PieceCatalog::standard()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GenerationConfig {
            height: 0,
            ..GenerationConfig::default()
        };
        assert!(RoomGenerator::new(config, PieceCatalog::standard()).is_err());
    }

    #[test]
    fn test_same_seed_same_room() {
        let gen = generator(LayoutMode::Noise);
        let seed = RoomSeed::new(31_337).unwrap();
        let a = gen.build(seed, RoomContext::at(3)).unwrap();
        let b = gen.build(seed, RoomContext::at(3)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.placements, b.placements);
    }

    #[test]
    fn test_raw_seed_validation() {
        let gen = generator(LayoutMode::Noise);
        assert!(gen.generate_with_raw_seed(-5).is_err());
        assert!(gen.generate_with_raw_seed(10_000_000).is_err());
        assert_eq!(
            gen.generate_with_raw_seed(12).unwrap(),
            gen.generate_with_seed(RoomSeed::new(12).unwrap()).unwrap()
        );
    }

    #[test]
    fn test_generate_with_seed_is_first_room() {
        let gen = generator(LayoutMode::Bordered);
        let seed = RoomSeed::new(77).unwrap();
        let grid = gen.generate_with_seed(seed).unwrap();
        assert_eq!(grid, gen.classify(seed, RoomContext::at(0)).unwrap());

        let later = gen.classify(seed, RoomContext::at(1)).unwrap();
        assert_ne!(grid, later);
        assert_eq!(grid.count(CellType::Door), 1);
        assert_eq!(later.count(CellType::Door), 2);
    }

    #[test]
    fn test_bordered_layout_is_placed() {
        let gen = generator(LayoutMode::Bordered);
        let room = gen.build(RoomSeed::new(8).unwrap(), RoomContext::at(1)).unwrap();
        assert_eq!(room.grid.count(CellType::Door), 2);
        assert!(room.report.uncovered.is_empty());
        assert!(room.placements.iter().any(|p| p.piece.cell_type == CellType::Door));
    }

    #[test]
    fn test_noise_rooms_vary_with_seed() {
        let gen = generator(LayoutMode::Noise);
        let fingerprints: std::collections::HashSet<u64> = (0..8)
            .map(|s| gen.generate_with_raw_seed(s * 1_000).unwrap().fingerprint())
            .collect();
        assert!(fingerprints.len() > 1);
    }

    #[test]
    fn test_dimension_accessors() {
        let gen = generator(LayoutMode::Noise);
        assert_eq!((gen.width(), gen.height()), (40, 40));
        assert!((gen.cell_size() - 1.0).abs() < f64::EPSILON);
    }
}
