//! # Bordered Layouts
//!
//! The simple walled room: wall cells on the border, floor inside, a back
//! door at the bottom-centre border cell and a forward door at the
//! top-centre border cell. The first room in a chain has no back door.

use crate::config::BorderedSettings;
use crate::error::ProcgenResult;
use crate::grid::{CellType, Grid};

/// Where a room sits in its chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoomContext {
    /// Position in the chain (0 = first room).
    pub index: usize,
}

impl RoomContext {
    /// Context for the room at `index`.
    #[must_use]
    pub const fn at(index: usize) -> Self {
        Self { index }
    }

    /// Returns true for the first room in a chain.
    #[must_use]
    pub const fn is_first(self) -> bool {
        self.index == 0
    }
}

/// Cell of the back door (bottom border, centre column).
#[must_use]
pub const fn back_door_cell(width: usize) -> (usize, usize) {
    (width / 2, 0)
}

/// Cell of the forward door (top border, centre column).
#[must_use]
pub const fn forward_door_cell(width: usize, height: usize) -> (usize, usize) {
    (width / 2, height - 1)
}

/// Builds a bordered room of `width x height` cells.
///
/// # Errors
///
/// Returns an error only for zero dimensions.
pub fn bordered_room(
    width: usize,
    height: usize,
    settings: &BorderedSettings,
    context: RoomContext,
) -> ProcgenResult<Grid> {
    let mut grid = Grid::new(width, height, CellType::Floor)?;

    for x in 0..width {
        grid.set(x, 0, CellType::Wall)?;
        grid.set(x, height - 1, CellType::Wall)?;
    }
    for y in 0..height {
        grid.set(0, y, CellType::Wall)?;
        grid.set(width - 1, y, CellType::Wall)?;
    }

    let spacing = settings.window_spacing;
    if spacing > 0 {
        for y in (spacing..height.saturating_sub(1)).step_by(spacing) {
            grid.set(0, y, CellType::Window)?;
            grid.set(width - 1, y, CellType::Window)?;
        }
    }

    let (fx, fy) = forward_door_cell(width, height);
    grid.set(fx, fy, CellType::Door)?;
    if !context.is_first() {
        let (bx, by) = back_door_cell(width);
        grid.set(bx, by, CellType::Door)?;
    }

    Ok(grid)
}
