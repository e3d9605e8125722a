//! # Navigation Controller
//!
//! Moves through a chain of seeded rooms.
//!
//! ## States
//!
//! - **Idle**: no room built yet (`current_index() == None`)
//! - **Active(i)**: room `i` is current
//!
//! ## Transitions
//!
//! | Call         | Condition             | Result                                  |
//! |--------------|-----------------------|-----------------------------------------|
//! | `go_forward` | next index < max      | new seed drawn, slot appended or overwritten |
//! | `go_forward` | next index >= max     | `LimitReached`, no state change         |
//! | `go_back`    | current index > 0     | stored seed rebuilt                     |
//! | `go_back`    | Idle or index 0       | `AtStart`, no state change              |
//!
//! ## Determinism
//!
//! A room is a pure function of its seed, its chain position and the fixed
//! generation config, so going back always rebuilds the room exactly as it
//! was first seen.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use delve_procedural::{
    back_door_cell, forward_door_cell, CellType, Grid, LayoutMode, OccupancyMask, Placement,
    RoomBlueprint, RoomContext, RoomGenerator, RoomSeed,
};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{DelveConfig, NavigationConfig};
use crate::error::{DelveError, DelveResult};
use crate::events::{EventHub, NavigationEvent};
use crate::history::SeedHistory;
use crate::realizer::{NullRealizer, RoomRealizer};
use crate::scheduler::{DeadlineQueue, TaskId};

/// Height above the floor at which players are spawned.
pub const SPAWN_HEIGHT: f64 = 1.0;

/// How the player entered a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arrival {
    /// Through the previous room's forward door. Spawns inside the back door.
    Forward,
    /// Through the next room's back door. Spawns inside the forward door.
    Back,
}

/// Result of a navigation request.
///
/// Boundaries are ordinary outcomes, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A room was built and is now current.
    Entered {
        /// Chain position of the new room.
        index: usize,
        /// Seed it was built from.
        seed: RoomSeed,
        /// Direction of travel.
        arrival: Arrival,
    },
    /// Already at the last room of the chain.
    LimitReached {
        /// Position of the current room.
        index: usize,
    },
    /// Already at the first room, or no room yet.
    AtStart,
    /// Another transition is in flight.
    Busy,
}

impl NavigationOutcome {
    /// Returns true if the request changed the current room.
    #[must_use]
    pub const fn is_entered(&self) -> bool {
        matches!(self, Self::Entered { .. })
    }
}

/// The current room. Owned by the controller and replaced wholesale on
/// every transition.
#[derive(Clone, Debug)]
pub struct RoomInstance {
    index: usize,
    arrival: Arrival,
    cell_size: f64,
    layout: LayoutMode,
    blueprint: RoomBlueprint,
}

impl RoomInstance {
    /// Chain position.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Seed the room was built from.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> RoomSeed {
        self.blueprint.seed
    }

    /// How the player entered.
    #[inline]
    #[must_use]
    pub const fn arrival(&self) -> Arrival {
        self.arrival
    }

    /// Classified cells.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.blueprint.grid
    }

    /// Placed pieces, in placement order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.blueprint.placements
    }

    /// Cells covered by placements.
    #[must_use]
    pub const fn occupancy(&self) -> &OccupancyMask {
        &self.blueprint.occupancy
    }

    /// Everything generated for the room.
    #[must_use]
    pub const fn blueprint(&self) -> &RoomBlueprint {
        &self.blueprint
    }

    /// World position of the grid centre at floor level.
    #[must_use]
    pub fn centre(&self) -> [f64; 3] {
        let grid = self.grid();
        [
            grid.width() as f64 * self.cell_size / 2.0,
            0.0,
            grid.height() as f64 * self.cell_size / 2.0,
        ]
    }

    /// Grid cell a player arriving from `arrival` starts on.
    ///
    /// Bordered rooms use the cell one step inside the matching door.
    /// Noise rooms have no doors, so both arrivals use the inside cell
    /// nearest the grid centre (the centre cell itself if nothing is
    /// inside).
    #[must_use]
    pub fn spawn_cell(&self, arrival: Arrival) -> (usize, usize) {
        let (width, height) = (self.grid().width(), self.grid().height());
        match (self.layout, arrival) {
            (LayoutMode::Bordered, Arrival::Forward) => {
                let (x, y) = back_door_cell(width);
                (x, (y + 1).min(height - 1))
            }
            (LayoutMode::Bordered, Arrival::Back) => {
                let (x, y) = forward_door_cell(width, height);
                (x, y.saturating_sub(1))
            }
            (LayoutMode::Noise, _) => self.nearest_inside_cell(),
        }
    }

    fn nearest_inside_cell(&self) -> (usize, usize) {
        let grid = self.grid();
        let (cx, cy) = (grid.width() / 2, grid.height() / 2);
        grid.cells()
            .filter(|&(_, _, cell)| cell != CellType::None)
            .min_by_key(|&(x, y, _)| {
                let (dx, dy) = (x.abs_diff(cx), y.abs_diff(cy));
                dx * dx + dy * dy
            })
            .map_or((cx, cy), |(x, y, _)| (x, y))
    }

    /// Where to place a player arriving from `arrival`: the centre of
    /// [`spawn_cell`](Self::spawn_cell) at [`SPAWN_HEIGHT`].
    #[must_use]
    pub fn spawn_point(&self, arrival: Arrival) -> [f64; 3] {
        let (x, y) = self.spawn_cell(arrival);
        [
            (x as f64 + 0.5) * self.cell_size,
            SPAWN_HEIGHT,
            (y as f64 + 0.5) * self.cell_size,
        ]
    }

    /// Spawn point for the way the player actually arrived.
    #[must_use]
    pub fn spawn(&self) -> [f64; 3] {
        self.spawn_point(self.arrival)
    }
}

/// A placement waiting to come back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Respawn {
    room: usize,
    placement: usize,
}

/// Owns the seed history, the current room and everything scoped to it.
pub struct NavigationController<R = NullRealizer> {
    generator: RoomGenerator,
    max_rooms: usize,
    history: SeedHistory,
    rng: ChaCha8Rng,
    current: Option<RoomInstance>,
    events: EventHub,
    respawns: DeadlineQueue<Respawn>,
    clock: u64,
    realizer: R,
}

impl NavigationController<NullRealizer> {
    /// Creates a headless controller from a full session configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error for an unusable configuration.
    pub fn headless(config: &DelveConfig) -> DelveResult<Self> {
        Self::from_config(config, NullRealizer)
    }
}

impl<R: RoomRealizer> NavigationController<R> {
    /// Creates a controller in the idle state.
    ///
    /// # Errors
    ///
    /// Returns [`DelveError::InvalidConfig`] if `max_rooms` is zero.
    pub fn new(generator: RoomGenerator, navigation: &NavigationConfig, realizer: R) -> DelveResult<Self> {
        if navigation.max_rooms == 0 {
            return Err(DelveError::InvalidConfig(
                "navigation.max_rooms must be at least 1".to_string(),
            ));
        }
        let session_seed = navigation.session_seed.unwrap_or_else(clock_seed);
        tracing::debug!(session_seed, max_rooms = navigation.max_rooms, "navigation session started");

        Ok(Self {
            generator,
            max_rooms: navigation.max_rooms,
            history: SeedHistory::new(),
            rng: ChaCha8Rng::seed_from_u64(session_seed),
            current: None,
            events: EventHub::new(),
            respawns: DeadlineQueue::new(),
            clock: 0,
            realizer,
        })
    }

    /// Creates a controller from a full session configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error for an unusable configuration.
    pub fn from_config(config: &DelveConfig, realizer: R) -> DelveResult<Self> {
        config.validate()?;
        let generator = RoomGenerator::new(config.generation.clone(), config.catalog()?)?;
        Self::new(generator, &config.navigation, realizer)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Moves to a freshly generated next room.
    ///
    /// At the last room of the chain this is a no-op that reports
    /// [`NavigationOutcome::LimitReached`].
    ///
    /// # Errors
    ///
    /// Returns an error only if generation fails, which a validated
    /// configuration rules out. State is unchanged on error.
    pub fn go_forward(&mut self) -> DelveResult<NavigationOutcome> {
        let index = self.history.next_index();
        if index >= self.max_rooms {
            let last = index.saturating_sub(1);
            tracing::info!(index = last, max_rooms = self.max_rooms, "room limit reached");
            self.events.emit(&NavigationEvent::LimitReached { index: last });
            return Ok(NavigationOutcome::LimitReached { index: last });
        }

        let seed = RoomSeed::draw(&mut self.rng);
        let blueprint = self.generator.build(seed, RoomContext::at(index))?;

        self.discard_current();
        let (index, replaced) = self.history.advance(seed);
        if let Some(old) = replaced {
            tracing::debug!(index, old_seed = old.value(), "overwrote stored seed");
        }
        tracing::info!(index, seed = seed.value(), "going forward");
        Ok(self.enter(index, Arrival::Forward, blueprint))
    }

    /// Moves back to the previous room, rebuilt from its stored seed.
    ///
    /// At the first room (or before any room) this is a no-op that reports
    /// [`NavigationOutcome::AtStart`].
    ///
    /// # Errors
    ///
    /// As [`go_forward`](Self::go_forward).
    pub fn go_back(&mut self) -> DelveResult<NavigationOutcome> {
        let Some((index, seed)) = self.history.previous() else {
            tracing::info!("already at the first room");
            self.events.emit(&NavigationEvent::AtStart);
            return Ok(NavigationOutcome::AtStart);
        };

        let blueprint = self.generator.build(seed, RoomContext::at(index))?;

        self.discard_current();
        self.history.retreat();
        tracing::info!(index, seed = seed.value(), "going back");
        Ok(self.enter(index, Arrival::Back, blueprint))
    }

    /// Goes forward or back according to a door's direction flag.
    ///
    /// # Errors
    ///
    /// As [`go_forward`](Self::go_forward).
    pub fn traverse(&mut self, forward: bool) -> DelveResult<NavigationOutcome> {
        if forward {
            self.go_forward()
        } else {
            self.go_back()
        }
    }

    fn discard_current(&mut self) {
        let Some(room) = self.current.take() else {
            return;
        };
        let cancelled = self.respawns.clear();
        if cancelled > 0 {
            tracing::debug!(cancelled, room = room.index, "cancelled pending respawns");
        }
        self.realizer.destroy_current_room();
        self.events.emit(&NavigationEvent::RoomDiscarded {
            index: room.index,
            seed: room.seed(),
        });
    }

    fn enter(&mut self, index: usize, arrival: Arrival, blueprint: RoomBlueprint) -> NavigationOutcome {
        let cell_size = self.generator.cell_size();
        let layout = self.generator.config().layout;
        self.realizer.realize_grid(&blueprint.grid, cell_size);
        self.realizer.realize_placements(&blueprint.placements, cell_size);

        let seed = blueprint.seed;
        self.current = Some(RoomInstance {
            index,
            arrival,
            cell_size,
            layout,
            blueprint,
        });
        self.events.emit(&NavigationEvent::RoomEntered {
            index,
            seed,
            arrival,
        });
        NavigationOutcome::Entered {
            index,
            seed,
            arrival,
        }
    }

    // =========================================================================
    // Respawns
    // =========================================================================

    /// Schedules placement `placement` of the current room to be realized
    /// again `delay_ticks` after the current clock.
    ///
    /// Returns `None` if there is no current room or no such placement.
    /// Pending respawns are cancelled when the room is discarded.
    pub fn schedule_respawn(&mut self, placement: usize, delay_ticks: u64) -> Option<TaskId> {
        let room = self.current.as_ref()?;
        if placement >= room.placements().len() {
            return None;
        }
        let deadline = self.clock.saturating_add(delay_ticks);
        let id = self.respawns.schedule(
            deadline,
            Respawn {
                room: room.index,
                placement,
            },
        );
        tracing::trace!(placement, deadline, "respawn scheduled");
        Some(id)
    }

    /// Cancels a pending respawn. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel_respawn(&mut self, id: TaskId) -> bool {
        self.respawns.cancel(id).is_some()
    }

    /// Number of pending respawns.
    #[must_use]
    pub fn pending_respawns(&self) -> usize {
        self.respawns.len()
    }

    /// Advances the clock to `now` and realizes every respawn that came due.
    ///
    /// The clock never runs backwards; an earlier `now` is ignored.
    /// Returns the respawned placements in deadline order.
    pub fn advance_clock(&mut self, now: u64) -> Vec<Placement> {
        self.clock = self.clock.max(now);
        let due = self.respawns.poll(self.clock);
        let Some(room) = self.current.as_ref() else {
            return Vec::new();
        };

        let respawned: Vec<Placement> = due
            .into_iter()
            .filter(|respawn| respawn.room == room.index)
            .filter_map(|respawn| room.placements().get(respawn.placement).cloned())
            .collect();
        if !respawned.is_empty() {
            tracing::debug!(count = respawned.len(), tick = self.clock, "respawning placements");
            self.realizer
                .realize_placements(&respawned, self.generator.cell_size());
        }
        respawned
    }

    /// Current tick.
    #[must_use]
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current chain position, `None` while idle.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.history.current_index()
    }

    /// Seed of the current room, `None` while idle.
    #[must_use]
    pub fn current_seed(&self) -> Option<RoomSeed> {
        self.history.current_seed()
    }

    /// The current room, `None` while idle.
    #[must_use]
    pub const fn current_room(&self) -> Option<&RoomInstance> {
        self.current.as_ref()
    }

    /// Visited seeds.
    #[must_use]
    pub const fn history(&self) -> &SeedHistory {
        &self.history
    }

    /// Number of rooms in the chain.
    #[must_use]
    pub const fn max_rooms(&self) -> usize {
        self.max_rooms
    }

    /// The room generator.
    #[must_use]
    pub const fn generator(&self) -> &RoomGenerator {
        &self.generator
    }

    /// Room width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.generator.width()
    }

    /// Room height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.generator.height()
    }

    /// World size of one cell.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.generator.cell_size()
    }

    /// Event subscriptions.
    pub fn events(&mut self) -> &mut EventHub {
        &mut self.events
    }

    /// The realizer.
    #[must_use]
    pub const fn realizer(&self) -> &R {
        &self.realizer
    }

    /// The realizer, mutably.
    pub fn realizer_mut(&mut self) -> &mut R {
        &mut self.realizer
    }

    /// Tears the session down: destroys the current room, cancels pending
    /// respawns and drops every subscriber. History is kept.
    pub fn shutdown(&mut self) {
        if self.current.take().is_some() {
            self.realizer.destroy_current_room();
        }
        self.respawns.clear();
        self.events.clear();
        tracing::debug!(rooms = self.history.len(), "navigation session shut down");
    }
}

impl<R> std::fmt::Debug for NavigationController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("max_rooms", &self.max_rooms)
            .field("history", &self.history)
            .field("events", &self.events)
            .field("pending_respawns", &self.respawns.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Session seed from the wall clock.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

// =============================================================================
// Shared access
// =============================================================================

/// Cloneable handle to a controller for triggers that live elsewhere.
///
/// Requests made while another transition holds the controller (including
/// from an event listener during dispatch) return
/// [`NavigationOutcome::Busy`] instead of waiting.
pub struct SharedNavigator<R = NullRealizer> {
    inner: Arc<Mutex<NavigationController<R>>>,
}

impl<R> Clone for SharedNavigator<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: RoomRealizer> SharedNavigator<R> {
    /// Wraps a controller.
    #[must_use]
    pub fn new(controller: NavigationController<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Goes forward unless a transition is in flight.
    ///
    /// # Errors
    ///
    /// As [`NavigationController::go_forward`].
    pub fn go_forward(&self) -> DelveResult<NavigationOutcome> {
        self.traverse(true)
    }

    /// Goes back unless a transition is in flight.
    ///
    /// # Errors
    ///
    /// As [`NavigationController::go_back`].
    pub fn go_back(&self) -> DelveResult<NavigationOutcome> {
        self.traverse(false)
    }

    /// Goes forward or back unless a transition is in flight.
    ///
    /// # Errors
    ///
    /// As [`NavigationController::go_forward`].
    pub fn traverse(&self, forward: bool) -> DelveResult<NavigationOutcome> {
        match self.inner.try_lock() {
            Some(mut controller) => controller.traverse(forward),
            None => {
                tracing::debug!(forward, "navigation busy, request ignored");
                Ok(NavigationOutcome::Busy)
            }
        }
    }

    /// Runs `f` with the controller, or returns `None` if it is in use.
    pub fn try_with<T>(&self, f: impl FnOnce(&mut NavigationController<R>) -> T) -> Option<T> {
        self.inner.try_lock().map(|mut controller| f(&mut controller))
    }

    /// Runs `f` with the controller, waiting for it if necessary.
    ///
    /// Must not be called from an event listener; use
    /// [`try_with`](Self::try_with) there.
    pub fn with<T>(&self, f: impl FnOnce(&mut NavigationController<R>) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

/// A door: fires a navigation request in one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorTrigger {
    /// True for the forward door, false for the back door.
    pub forward: bool,
}

impl DoorTrigger {
    /// The door leading to the next room.
    pub const FORWARD: Self = Self { forward: true };
    /// The door leading to the previous room.
    pub const BACK: Self = Self { forward: false };

    /// Delivers the traversal signal.
    ///
    /// # Errors
    ///
    /// As [`NavigationController::go_forward`].
    pub fn fire<R: RoomRealizer>(self, navigator: &SharedNavigator<R>) -> DelveResult<NavigationOutcome> {
        navigator.traverse(self.forward)
    }
}
