//! # Piece Catalog
//!
//! Read-only templates for multi-cell room pieces and weighted selection.
//!
//! ## Selection
//!
//! For one classification the candidates are walked in catalog order,
//! subtracting each weight from a uniform draw in `[0, total)` until the
//! remainder drops to zero or below. If rounding leaves a positive
//! remainder after the last candidate, the last candidate is returned, so a
//! non-empty list always yields a piece.

use std::collections::HashMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{ProcgenError, ProcgenResult};
use crate::grid::CellType;

/// A placeable multi-cell piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Opaque handle to the piece's external representation.
    pub asset: String,
    /// Classification this piece fills.
    pub cell_type: CellType,
    /// Selection weight (higher = more common).
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Footprint `[width, height]` in whole cells.
    #[serde(default = "default_footprint")]
    pub footprint: [usize; 2],
}

fn default_weight() -> f64 {
    1.0
}

fn default_footprint() -> [usize; 2] {
    [1, 1]
}

impl Piece {
    /// Creates a piece descriptor.
    #[must_use]
    pub fn new(asset: impl Into<String>, cell_type: CellType, weight: f64, footprint: [usize; 2]) -> Self {
        Self {
            asset: asset.into(),
            cell_type,
            weight,
            footprint,
        }
    }

    /// Footprint width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.footprint[0]
    }

    /// Footprint height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.footprint[1]
    }

    /// Checks that the piece can ever be selected and placed.
    ///
    /// # Errors
    ///
    /// Returns [`ProcgenError::InvalidPiece`] for a non-positive or
    /// non-finite weight, an empty footprint, or a `None` classification.
    pub fn validate(&self) -> ProcgenResult<()> {
        let reason = if !(self.weight.is_finite() && self.weight > 0.0) {
            Some(format!("weight must be positive, got {}", self.weight))
        } else if self.width() == 0 || self.height() == 0 {
            Some(format!("footprint must be at least 1x1, got {:?}", self.footprint))
        } else if self.cell_type == CellType::None {
            Some("pieces cannot fill None cells".to_string())
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ProcgenError::InvalidPiece {
                asset: self.asset.clone(),
                cell_type: self.cell_type,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Pieces grouped by classification, in registration order.
#[derive(Clone, Debug, Default)]
pub struct PieceCatalog {
    entries: HashMap<CellType, Vec<Piece>>,
}

impl PieceCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from descriptors, validating each one.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProcgenError::InvalidPiece`] encountered.
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> ProcgenResult<Self> {
        let mut catalog = Self::new();
        for piece in pieces {
            catalog.insert(piece)?;
        }
        Ok(catalog)
    }

    /// Appends a piece to its classification's candidate list.
    ///
    /// # Errors
    ///
    /// Returns [`ProcgenError::InvalidPiece`] if the piece fails validation.
    pub fn insert(&mut self, piece: Piece) -> ProcgenResult<()> {
        piece.validate()?;
        self.entries.entry(piece.cell_type).or_default().push(piece);
        Ok(())
    }

    /// Candidates for one classification (empty if none registered).
    #[must_use]
    pub fn candidates(&self, cell_type: CellType) -> &[Piece] {
        self.entries.get(&cell_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if at least one piece fills `cell_type`.
    #[must_use]
    pub fn covers(&self, cell_type: CellType) -> bool {
        !self.candidates(cell_type).is_empty()
    }

    /// Total number of pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns true if the catalog holds no pieces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The reference catalog: single-cell pieces for every classification
    /// plus a few larger ground and floor pieces.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for piece in Self::standard_pieces() {
            catalog.entries.entry(piece.cell_type).or_default().push(piece);
        }
        catalog
    }

    /// Descriptors behind [`standard`](Self::standard), in registration order.
    #[must_use]
    pub fn standard_pieces() -> Vec<Piece> {
        vec![
            Piece::new("ground_tile", CellType::Ground, 6.0, [1, 1]),
            Piece::new("ground_slab", CellType::Ground, 2.0, [2, 2]),
            Piece::new("ground_boulder", CellType::Ground, 0.5, [3, 3]),
            Piece::new("water_tile", CellType::Water, 1.0, [1, 1]),
            Piece::new("lava_tile", CellType::Lava, 1.0, [1, 1]),
            Piece::new("floor_tile", CellType::Floor, 4.0, [1, 1]),
            Piece::new("floor_rug", CellType::Floor, 1.0, [2, 3]),
            Piece::new("wall_segment", CellType::Wall, 1.0, [1, 1]),
            Piece::new("door_frame", CellType::Door, 1.0, [1, 1]),
            Piece::new("window_frame", CellType::Window, 1.0, [1, 1]),
        ]
    }
}

/// Total weight of a candidate list.
#[must_use]
pub fn total_weight(candidates: &[Piece]) -> f64 {
    candidates.iter().map(|p| p.weight).sum()
}

/// Picks a candidate for a draw already scaled to `[0, total_weight)`.
///
/// Returns `None` only for an empty list.
#[must_use]
pub fn select_with_draw(candidates: &[Piece], draw: f64) -> Option<&Piece> {
    let mut remainder = draw;
    for piece in candidates {
        remainder -= piece.weight;
        if remainder <= 0.0 {
            return Some(piece);
        }
    }
    candidates.last()
}

/// Weighted random piece selection over a random source.
pub struct PieceSelector<R: RngCore> {
    rng: R,
}

impl<R: RngCore> PieceSelector<R> {
    /// Wraps a seeded random source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draws a uniform value in `[0, bound)`.
    pub fn draw(&mut self, bound: f64) -> f64 {
        self.rng.gen::<f64>() * bound
    }

    /// Selects one candidate, or `None` for an empty list.
    ///
    /// Consumes exactly one draw per non-empty selection.
    pub fn select<'a>(&mut self, candidates: &'a [Piece]) -> Option<&'a Piece> {
        if candidates.is_empty() {
            return None;
        }
        let draw = self.draw(total_weight(candidates));
        select_with_draw(candidates, draw)
    }

    /// Releases the random source.
    pub fn into_inner(self) -> R {
        self.rng
    }
}
