//! # Noise Classification
//!
//! Fills a grid with an irregular region of classified cells.
//!
//! Three independent noise fields are sampled per cell:
//! - **shape**: perturbs a radial falloff so the region boundary is ragged
//! - **field A / field B**: compete for each inside cell (water vs lava by default)
//!
//! A cell is inside iff `distance + shape * 0.5 < threshold`, where
//! `distance` is the cell's distance from the grid centre divided by the
//! centre's distance from the origin. Inside cells take the type of the
//! field that beats both its own threshold and the other field; otherwise
//! the fallback type. Exact ties fall through to the fallback.

use crate::config::{ContentSettings, ShapeSettings};
use crate::error::ProcgenResult;
use crate::grid::{CellType, Grid};
use crate::noise::{RoomSeed, SimplexNoise, STREAM_FIELD_A, STREAM_FIELD_B, STREAM_SHAPE};

/// Samples three seeded noise fields to classify room cells.
pub struct NoiseClassifier {
    shape_noise: SimplexNoise,
    field_a_noise: SimplexNoise,
    field_b_noise: SimplexNoise,
    shape: ShapeSettings,
    content: ContentSettings,
}

impl NoiseClassifier {
    /// Creates a classifier whose fields are seeded from `seed`.
    #[must_use]
    pub fn new(seed: RoomSeed, shape: ShapeSettings, content: ContentSettings) -> Self {
        Self {
            shape_noise: SimplexNoise::new(seed.stream(STREAM_SHAPE)),
            field_a_noise: SimplexNoise::new(seed.stream(STREAM_FIELD_A)),
            field_b_noise: SimplexNoise::new(seed.stream(STREAM_FIELD_B)),
            shape,
            content,
        }
    }

    /// Returns true if the cell lies inside the generated region.
    #[must_use]
    pub fn is_inside(&self, x: usize, y: usize, width: usize, height: usize) -> bool {
        let centre_x = width as f64 / 2.0;
        let centre_y = height as f64 / 2.0;
        let max_distance = centre_x.hypot(centre_y);

        let (fx, fy) = (x as f64, y as f64);
        let distance = (fx - centre_x).hypot(fy - centre_y) / max_distance;
        let boundary = self
            .shape_noise
            .sample01(fx * self.shape.scale, fy * self.shape.scale);

        distance + boundary * 0.5 < self.shape.threshold
    }

    /// Classifies one inside cell from the two content fields.
    #[must_use]
    pub fn classify_content(&self, x: usize, y: usize) -> CellType {
        let content = &self.content;
        let (a, b) = (&content.field_a, &content.field_b);
        let (fx, fy) = (x as f64, y as f64);

        let value_a = self
            .field_a_noise
            .sample01((fx + a.offset) * content.scale, (fy + a.offset) * content.scale);
        let value_b = self
            .field_b_noise
            .sample01((fx + b.offset) * content.scale, (fy + b.offset) * content.scale);

        decide(value_a, value_b, a.threshold, b.threshold)
            .map_or(content.fallback, |wins_a| {
                if wins_a { a.cell_type } else { b.cell_type }
            })
    }

    /// Classifies every cell of a fresh `width x height` grid.
    ///
    /// # Errors
    ///
    /// Returns an error only for zero dimensions.
    pub fn classify(&self, width: usize, height: usize) -> ProcgenResult<Grid> {
        let mut grid = Grid::new(width, height, CellType::None)?;
        for x in 0..width {
            for y in 0..height {
                if !self.is_inside(x, y, width, height) {
                    continue;
                }
                grid.set(x, y, self.classify_content(x, y))?;
            }
        }

        tracing::trace!(
            width,
            height,
            inside = width * height - grid.count(CellType::None),
            "classified grid"
        );
        Ok(grid)
    }
}

/// Picks the winning field: `Some(true)` for A, `Some(false)` for B,
/// `None` for the fallback. Comparisons are strict.
#[inline]
fn decide(value_a: f64, value_b: f64, threshold_a: f64, threshold_b: f64) -> Option<bool> {
    if value_a > threshold_a && value_a > value_b {
        Some(true)
    } else if value_b > threshold_b && value_b > value_a {
        Some(false)
    } else {
        None
    }
}
