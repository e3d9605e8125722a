//! # Room Realizer
//!
//! The seam to whatever turns a room into something visible: meshes,
//! spawned objects, colliders. The controller drives it on every
//! transition, in this order:
//!
//! 1. `destroy_current_room` (skipped for the very first room)
//! 2. `realize_grid`
//! 3. `realize_placements`

use delve_procedural::{Grid, Placement};

/// Consumer of generated rooms.
pub trait RoomRealizer {
    /// Builds terrain for a classified grid.
    fn realize_grid(&mut self, grid: &Grid, cell_size: f64);

    /// Instantiates placed pieces. Also called with single placements when
    /// a scheduled respawn comes due.
    fn realize_placements(&mut self, placements: &[Placement], cell_size: f64);

    /// Tears down everything realized for the current room.
    fn destroy_current_room(&mut self);
}

/// Realizer that does nothing. For headless sessions and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRealizer;

impl RoomRealizer for NullRealizer {
    fn realize_grid(&mut self, _grid: &Grid, _cell_size: f64) {}

    fn realize_placements(&mut self, _placements: &[Placement], _cell_size: f64) {}

    fn destroy_current_room(&mut self) {}
}

impl<R: RoomRealizer + ?Sized> RoomRealizer for Box<R> {
    fn realize_grid(&mut self, grid: &Grid, cell_size: f64) {
        (**self).realize_grid(grid, cell_size);
    }

    fn realize_placements(&mut self, placements: &[Placement], cell_size: f64) {
        (**self).realize_placements(placements, cell_size);
    }

    fn destroy_current_room(&mut self) {
        (**self).destroy_current_room();
    }
}
