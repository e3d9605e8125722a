//! # Room Builder
//!
//! Greedy single-pass piece placement.
//!
//! Cells are visited in grid scan order (`x` outer, `y` inner). At each
//! unoccupied cell with a
//! catalog entry, one piece is selected and placed if its whole footprint,
//! anchored at the cell, is inside the grid and unoccupied. A piece that
//! does not fit is skipped outright: no partial placement, no retry with a
//! smaller piece. Gaps left behind are accepted.

use std::collections::BTreeSet;

use rand::RngCore;

use crate::grid::{CellType, Grid, OccupancyMask};
use crate::pieces::{Piece, PieceCatalog, PieceSelector};

/// One placed piece.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// The template that was placed.
    pub piece: Piece,
    /// Anchor (lowest x, lowest y) cell of the footprint.
    pub anchor: (usize, usize),
    /// Footprint centre in grid units: `anchor + footprint / 2`.
    pub centre: (f64, f64),
}

impl Placement {
    fn new(piece: &Piece, x: usize, y: usize) -> Self {
        Self {
            piece: piece.clone(),
            anchor: (x, y),
            centre: (
                x as f64 + piece.width() as f64 / 2.0,
                y as f64 + piece.height() as f64 / 2.0,
            ),
        }
    }

    /// World-space position `[x, 0, z]` of the footprint centre.
    #[must_use]
    pub fn world_position(&self, cell_size: f64) -> [f64; 3] {
        [self.centre.0 * cell_size, 0.0, self.centre.1 * cell_size]
    }

    /// Returns true if `(x, y)` lies under this placement's footprint.
    #[must_use]
    pub const fn covers(&self, x: usize, y: usize) -> bool {
        x >= self.anchor.0
            && y >= self.anchor.1
            && x < self.anchor.0 + self.piece.footprint[0]
            && y < self.anchor.1 + self.piece.footprint[1]
    }
}

/// Counters for one build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Pieces placed.
    pub placed: usize,
    /// Cells skipped because their classification has no pieces.
    pub skipped_no_catalog: usize,
    /// Cells skipped because the selected footprint did not fit.
    pub skipped_no_fit: usize,
    /// Classifications that had cells but no pieces.
    pub uncovered: BTreeSet<CellType>,
}

/// Result of one build: placements in scan order plus the final mask.
#[derive(Clone, Debug)]
pub struct BuildOutput {
    /// Placement records, in the order they were placed.
    pub placements: Vec<Placement>,
    /// Cells covered by the placements.
    pub occupancy: OccupancyMask,
    /// Build counters.
    pub report: BuildReport,
}

/// Places catalog pieces onto a classified grid.
pub struct RoomBuilder<'c> {
    catalog: &'c PieceCatalog,
}

impl<'c> RoomBuilder<'c> {
    /// Creates a builder over a catalog.
    #[must_use]
    pub const fn new(catalog: &'c PieceCatalog) -> Self {
        Self { catalog }
    }

    /// Runs the greedy placement pass.
    ///
    /// `None` cells are never placed on.
    pub fn build<R: RngCore>(&self, grid: &Grid, selector: &mut PieceSelector<R>) -> BuildOutput {
        let mut occupancy = OccupancyMask::for_grid(grid);
        let mut placements = Vec::new();
        let mut report = BuildReport::default();

        for (x, y, cell_type) in grid.cells() {
            if cell_type == CellType::None || occupancy.is_occupied(x, y) {
                continue;
            }

            let Some(piece) = selector.select(self.catalog.candidates(cell_type)) else {
                report.skipped_no_catalog += 1;
                if report.uncovered.insert(cell_type) {
                    tracing::warn!(?cell_type, "no pieces registered for classification, skipping its cells");
                }
                continue;
            };

            if !occupancy.mark(x, y, piece.width(), piece.height()) {
                report.skipped_no_fit += 1;
                tracing::trace!(x, y, asset = %piece.asset, "footprint does not fit");
                continue;
            }

            placements.push(Placement::new(piece, x, y));
        }

        report.placed = placements.len();
        tracing::debug!(
            placed = report.placed,
            skipped_no_catalog = report.skipped_no_catalog,
            skipped_no_fit = report.skipped_no_fit,
            "room build complete"
        );

        BuildOutput {
            placements,
            occupancy,
            report,
        }
    }
}
