//! # DELVE
//!
//! A chain of procedurally generated rooms the player can walk forward and
//! back through.
//!
//! ## Architecture
//!
//! ```text
//! DoorTrigger { forward } ──► SharedNavigator ──try_lock──► NavigationController
//!                                                               │
//!   session ChaCha8Rng ──► SeedHistory ──seed──► RoomGenerator ─┤
//!                                                               ▼
//!                                                         RoomInstance
//!                                                               │
//!                      ┌──────────────────┬─────────────────────┤
//!                      ▼                  ▼                     ▼
//!                RoomRealizer         EventHub            DeadlineQueue
//! ```
//!
//! Only seeds are kept between rooms. Going back rebuilds the previous room
//! from its stored seed, bit for bit.
//!
//! ## Example
//!
//! ```rust
//! use delve::{DelveConfig, NavigationController, NavigationOutcome};
//!
//! let mut config = DelveConfig::default();
//! config.navigation.max_rooms = 2;
//! config.navigation.session_seed = Some(42);
//!
//! let mut nav = NavigationController::headless(&config)?;
//! assert!(nav.go_forward()?.is_entered());
//! assert!(nav.go_forward()?.is_entered());
//! assert_eq!(nav.go_forward()?, NavigationOutcome::LimitReached { index: 1 });
//! assert!(nav.go_back()?.is_entered());
//! assert_eq!(nav.go_back()?, NavigationOutcome::AtStart);
//! # Ok::<(), delve::DelveError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod navigation;
pub mod realizer;
pub mod scheduler;

// Re-export the generation crate
pub use delve_procedural as procedural;

pub use config::{DelveConfig, NavigationConfig};
pub use error::{DelveError, DelveResult};
pub use events::{EventHub, NavigationEvent, SubscriptionId};
pub use history::SeedHistory;
pub use navigation::{
    Arrival, DoorTrigger, NavigationController, NavigationOutcome, RoomInstance, SharedNavigator,
    SPAWN_HEIGHT,
};
pub use realizer::{NullRealizer, RoomRealizer};
pub use scheduler::{DeadlineQueue, TaskId};
