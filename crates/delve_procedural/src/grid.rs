//! # Classified Grids
//!
//! A room is a fixed-size 2D array of classified cells.
//!
//! ## Storage
//!
//! Cells are stored row-major (`index = y * width + x`) as one byte each,
//! so a whole grid can be viewed as raw bytes for hashing and comparison.
//! Every accessor goes through the same bounds check: out-of-range reads
//! return `None`, out-of-range writes return an error.
//!
//! ## Scan Order
//!
//! Generation passes visit cells with `x` outer and `y` inner:
//! `(0,0), (0,1), .., (0,h-1), (1,0), ..`. Placement order, and with
//! multi-cell pieces which pieces fit, follows from this order.

use bytemuck::NoUninit;
use serde::{Deserialize, Serialize};

use crate::error::{ProcgenError, ProcgenResult};

/// Classification of one grid cell.
///
/// The noise generator uses `None`/`Ground`/`Water`/`Lava`; the bordered
/// generator uses `Wall`/`Floor`/`Door`/`Window`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, NoUninit, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CellType {
    /// Outside the generated region. Never placed on.
    #[default]
    None = 0,
    /// Walkable fallback terrain.
    Ground = 1,
    /// Water zone.
    Water = 2,
    /// Lava zone.
    Lava = 3,
    /// Room wall.
    Wall = 4,
    /// Room floor.
    Floor = 5,
    /// Doorway in a wall.
    Door = 6,
    /// Window in a wall.
    Window = 7,
}

impl CellType {
    /// All variants, in discriminant order.
    pub const ALL: [Self; 8] = [
        Self::None,
        Self::Ground,
        Self::Water,
        Self::Lava,
        Self::Wall,
        Self::Floor,
        Self::Door,
        Self::Window,
    ];

    /// Single-character glyph used by debug renderings.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::None => ' ',
            Self::Ground => '.',
            Self::Water => '~',
            Self::Lava => '^',
            Self::Wall => '#',
            Self::Floor => '_',
            Self::Door => 'D',
            Self::Window => 'W',
        }
    }
}

/// A `width x height` array of classified cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
}

impl Grid {
    /// Creates a grid with every cell set to `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcgenError::InvalidDimensions`] if either side is zero.
    pub fn new(width: usize, height: usize, fill: CellType) -> ProcgenResult<Self> {
        if width == 0 || height == 0 {
            return Err(ProcgenError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![fill; width * height],
        })
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns true if `(x, y)` lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        self.contains(x, y).then(|| y * self.width + x)
    }

    /// Reads a cell. Returns `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<CellType> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Writes a cell.
    ///
    /// # Errors
    ///
    /// Returns [`ProcgenError::OutOfBounds`] outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: CellType) -> ProcgenResult<()> {
        let index = self.index(x, y).ok_or(ProcgenError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Iterates `(x, y, cell)` in scan order: `x` outer, `y` inner.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellType)> + '_ {
        let (width, height) = (self.width, self.height);
        (0..width).flat_map(move |x| (0..height).map(move |y| (x, y, self.cells[y * width + x])))
    }

    /// Writes a cell known to be inside the grid, such as one yielded by
    /// [`cells`](Self::cells).
    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, cell: CellType) {
        debug_assert!(self.contains(x, y));
        self.cells[y * self.width + x] = cell;
    }

    /// Counts cells of one classification.
    #[must_use]
    pub fn count(&self, cell_type: CellType) -> usize {
        self.cells.iter().filter(|c| **c == cell_type).count()
    }

    /// Raw byte view (one byte per cell, row-major).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// FNV-1a hash of the cell bytes and dimensions.
    ///
    /// Two grids with the same fingerprint are, for practical purposes,
    /// identical. Used for cheap determinism checks and log lines.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hash = 0xcbf2_9ce4_8422_2325_u64;
        let dims = [self.width as u64, self.height as u64];
        for byte in dims
            .iter()
            .flat_map(|d| d.to_le_bytes())
            .chain(self.as_bytes().iter().copied())
        {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }

    /// Renders the grid as text, highest row first so `y` grows upwards.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                out.push(self.cells[y * self.width + x].glyph());
            }
            out.push('\n');
        }
        out
    }
}

/// Boolean mask of cells covered by placed pieces.
///
/// Same dimensions as the grid it shadows.
#[derive(Clone, Debug)]
pub struct OccupancyMask {
    width: usize,
    height: usize,
    occupied: Vec<bool>,
}

impl OccupancyMask {
    /// Creates an empty mask matching `grid`.
    #[must_use]
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            occupied: vec![false; grid.width() * grid.height()],
        }
    }

    /// Returns true if `(x, y)` is inside the mask and occupied.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.occupied[y * self.width + x]
    }

    /// Returns true if a `w x h` footprint anchored at `(x, y)` lies fully
    /// inside the mask and over unoccupied cells only.
    #[must_use]
    pub fn is_free(&self, x: usize, y: usize, w: usize, h: usize) -> bool {
        if w == 0 || h == 0 {
            return false;
        }
        let (Some(x_end), Some(y_end)) = (x.checked_add(w), y.checked_add(h)) else {
            return false;
        };
        if x_end > self.width || y_end > self.height {
            return false;
        }
        (y..y_end).all(|cy| {
            let row = cy * self.width;
            self.occupied[row + x..row + x_end].iter().all(|o| !*o)
        })
    }

    /// Marks a footprint occupied.
    ///
    /// Returns `false` and marks nothing unless the whole footprint is free,
    /// so no cell is ever marked twice.
    pub fn mark(&mut self, x: usize, y: usize, w: usize, h: usize) -> bool {
        if !self.is_free(x, y, w, h) {
            return false;
        }
        for cy in y..y + h {
            let row = cy * self.width;
            self.occupied[row + x..row + x + w].fill(true);
        }
        true
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|o| **o).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Grid::new(0, 5, CellType::None),
            Err(ProcgenError::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(Grid::new(5, 0, CellType::None).is_err());
    }

    #[test]
    fn test_get_set_bounds() {
        let mut grid = Grid::new(4, 3, CellType::Ground).unwrap();
        assert_eq!(grid.get(3, 2), Some(CellType::Ground));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 3), None);

        grid.set(1, 2, CellType::Water).unwrap();
        assert_eq!(grid.get(1, 2), Some(CellType::Water));
        assert!(matches!(
            grid.set(4, 0, CellType::Lava),
            Err(ProcgenError::OutOfBounds { x: 4, y: 0, .. })
        ));
    }

    #[test]
    fn test_scan_order_is_x_outer() {
        let mut grid = Grid::new(3, 2, CellType::Floor).unwrap();
        grid.set(2, 0, CellType::Wall).unwrap();
        let scanned: Vec<(usize, usize, CellType)> = grid.cells().collect();
        assert_eq!(
            scanned,
            vec![
                (0, 0, CellType::Floor),
                (0, 1, CellType::Floor),
                (1, 0, CellType::Floor),
                (1, 1, CellType::Floor),
                (2, 0, CellType::Wall),
                (2, 1, CellType::Floor),
            ]
        );
    }

    #[test]
    fn test_put_writes_in_bounds_cell() {
        let mut grid = Grid::new(3, 2, CellType::Lava).unwrap();
        grid.put(2, 1, CellType::Ground);
        assert_eq!(grid.get(2, 1), Some(CellType::Ground));
        assert_eq!(grid.as_bytes()[5], CellType::Ground as u8, "row-major storage");
        assert_eq!(grid.count(CellType::Lava), 5);
    }

    #[test]
    fn test_bytes_and_fingerprint() {
        let mut a = Grid::new(3, 3, CellType::Ground).unwrap();
        let b = a.clone();
        assert_eq!(a.as_bytes(), &[1u8; 9][..]);
        assert_eq!(a.fingerprint(), b.fingerprint());

        a.set(2, 2, CellType::Lava).unwrap();
        assert_eq!(a.as_bytes()[8], CellType::Lava as u8);
        assert_ne!(a.fingerprint(), b.fingerprint());

        // Same bytes, different shape
        let wide = Grid::new(9, 1, CellType::Ground).unwrap();
        assert_ne!(wide.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_occupancy_footprints() {
        let grid = Grid::new(4, 4, CellType::Ground).unwrap();
        let mut mask = OccupancyMask::for_grid(&grid);

        assert!(mask.mark(0, 0, 2, 2));
        assert_eq!(mask.occupied_count(), 4);
        assert!(!mask.is_free(1, 1, 2, 2), "overlaps existing footprint");
        assert!(!mask.mark(1, 1, 2, 2));
        assert_eq!(mask.occupied_count(), 4, "rejected mark must not touch cells");

        assert!(!mask.is_free(3, 3, 2, 1), "extends past right edge");
        assert!(!mask.is_free(0, 3, 1, 2), "extends past top edge");
        assert!(!mask.is_free(usize::MAX, 0, 2, 1));
        assert!(mask.is_free(2, 2, 2, 2));
        assert!(mask.is_occupied(1, 1));
        assert!(!mask.is_occupied(9, 9));
    }

    #[test]
    fn test_ascii_rendering() {
        let mut grid = Grid::new(2, 2, CellType::Ground).unwrap();
        grid.set(0, 1, CellType::Water).unwrap();
        assert_eq!(grid.to_ascii(), "~.\n..\n");
    }
}
