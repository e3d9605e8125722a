//! # Separation Enforcement
//!
//! Guarantees a minimum spacing between two classifications.
//!
//! The rule is one-directional: a suppressed cell with a protected cell
//! closer than `min_distance` (Euclidean) becomes the replacement type.
//! Protected cells are never modified, so the result does not depend
//! on scan order.

use crate::config::SeparationSettings;
use crate::grid::{CellType, Grid};

/// Post-processes a classified grid to enforce a [`SeparationSettings`] rule.
#[derive(Clone, Debug)]
pub struct SeparationEnforcer {
    settings: SeparationSettings,
}

impl SeparationEnforcer {
    /// Creates an enforcer for one rule.
    #[must_use]
    pub const fn new(settings: SeparationSettings) -> Self {
        Self { settings }
    }

    /// Returns true if any protected cell lies strictly closer than the
    /// minimum distance to `(x, y)`.
    #[must_use]
    pub fn near_protected(&self, grid: &Grid, x: usize, y: usize) -> bool {
        let radius = self.settings.min_distance as usize;
        if radius == 0 {
            return false;
        }
        let limit = u64::from(self.settings.min_distance).pow(2);

        let x_range = x.saturating_sub(radius)..=(x + radius).min(grid.width() - 1);
        let mut y_range = y.saturating_sub(radius)..=(y + radius).min(grid.height() - 1);

        y_range.any(|ny| {
            x_range.clone().any(|nx| {
                let dx = nx.abs_diff(x) as u64;
                let dy = ny.abs_diff(y) as u64;
                dx * dx + dy * dy < limit && grid.get(nx, ny) == Some(self.settings.protected)
            })
        })
    }

    /// Applies the rule in place. Returns the number of converted cells.
    pub fn enforce(&self, grid: &mut Grid) -> usize {
        let suppressed = self.settings.suppressed;
        let view: &Grid = grid;
        let doomed: Vec<(usize, usize)> = view
            .cells()
            .filter(|(x, y, cell)| *cell == suppressed && self.near_protected(view, *x, *y))
            .map(|(x, y, _)| (x, y))
            .collect();

        for &(x, y) in &doomed {
            grid.put(x, y, self.settings.replacement);
        }

        if !doomed.is_empty() {
            tracing::debug!(
                converted = doomed.len(),
                suppressed = ?suppressed,
                protected = ?self.settings.protected,
                "separation enforced"
            );
        }
        doomed.len()
    }

    /// Checks the rule without modifying the grid.
    #[must_use]
    pub fn holds(&self, grid: &Grid) -> bool {
        grid.cells()
            .filter(|(_, _, cell)| *cell == self.settings.suppressed)
            .all(|(x, y, _)| !self.near_protected(grid, x, y))
    }
}

/// Euclidean distance from `from` to the nearest cell of `target`.
#[must_use]
pub fn closest_distance(grid: &Grid, from: (usize, usize), target: CellType) -> Option<f64> {
    grid.cells()
        .filter(|(_, _, cell)| *cell == target)
        .map(|(x, y, _)| {
            let dx = x as f64 - from.0 as f64;
            let dy = y as f64 - from.1 as f64;
            dx.hypot(dy)
        })
        .min_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(min_distance: u32) -> SeparationSettings {
        SeparationSettings {
            min_distance,
            ..SeparationSettings::default()
        }
    }

    #[test]
    fn test_lava_near_water_becomes_ground() {
        let mut grid = Grid::new(10, 1, CellType::Ground).unwrap();
        grid.set(0, 0, CellType::Water).unwrap();
        grid.set(2, 0, CellType::Lava).unwrap(); // distance 2 < 3
        grid.set(3, 0, CellType::Lava).unwrap(); // distance 3, not < 3
        grid.set(9, 0, CellType::Lava).unwrap();

        let converted = SeparationEnforcer::new(settings(3)).enforce(&mut grid);
        assert_eq!(converted, 1);
        assert_eq!(grid.get(2, 0), Some(CellType::Ground));
        assert_eq!(grid.get(3, 0), Some(CellType::Lava));
        assert_eq!(grid.get(9, 0), Some(CellType::Lava));
        assert_eq!(grid.get(0, 0), Some(CellType::Water), "water is never altered");
    }

    #[test]
    fn test_uses_euclidean_not_chebyshev_distance() {
        let mut grid = Grid::new(5, 5, CellType::Ground).unwrap();
        grid.set(0, 0, CellType::Water).unwrap();
        // Chebyshev distance 2, Euclidean sqrt(8) ~ 2.83
        grid.set(2, 2, CellType::Lava).unwrap();

        let mut copy = grid.clone();
        SeparationEnforcer::new(settings(2)).enforce(&mut grid);
        assert_eq!(grid.get(2, 2), Some(CellType::Lava), "sqrt(8) is not < 2");

        SeparationEnforcer::new(settings(3)).enforce(&mut copy);
        assert_eq!(copy.get(2, 2), Some(CellType::Ground), "sqrt(8) < 3");
    }

    #[test]
    fn test_zero_distance_is_noop() {
        let mut grid = Grid::new(2, 1, CellType::Water).unwrap();
        grid.set(1, 0, CellType::Lava).unwrap();
        assert_eq!(SeparationEnforcer::new(settings(0)).enforce(&mut grid), 0);
        assert_eq!(grid.get(1, 0), Some(CellType::Lava));
    }

    #[test]
    fn test_neighbourhood_clipped_at_edges() {
        let mut grid = Grid::new(3, 3, CellType::Lava).unwrap();
        grid.set(2, 2, CellType::Water).unwrap();
        let enforcer = SeparationEnforcer::new(settings(50));
        assert_eq!(enforcer.enforce(&mut grid), 8);
        assert!(enforcer.holds(&grid));
    }

    #[test]
    fn test_invariant_holds_after_enforcement() {
        let mut grid = Grid::new(30, 30, CellType::Ground).unwrap();
        for i in 0..30 {
            grid.set(i, (i * 7) % 30, CellType::Water).unwrap();
            grid.set((i * 11) % 30, i, CellType::Lava).unwrap();
        }
        let enforcer = SeparationEnforcer::new(settings(4));
        enforcer.enforce(&mut grid);
        assert!(enforcer.holds(&grid));

        for (x, y, cell) in grid.cells() {
            if cell == CellType::Lava {
                let nearest = closest_distance(&grid, (x, y), CellType::Water);
                assert!(nearest.map_or(true, |d| d >= 4.0));
            }
        }
    }
}
