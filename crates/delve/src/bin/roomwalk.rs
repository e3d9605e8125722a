//! # Room Walk
//!
//! Walks a room chain from the terminal and prints every room.
//!
//! ```bash
//! # Default config, default walk
//! roomwalk
//!
//! # Custom config and move script (f = forward, b = back)
//! roomwalk data/delve.toml ffbfff
//!
//! # Move script only
//! roomwalk fbf
//!
//! # More log output
//! RUST_LOG=debug roomwalk
//! ```

use delve::procedural::{CellType, Grid, Placement};
use delve::{DelveConfig, NavigationController, NavigationEvent, NavigationOutcome, RoomRealizer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_MOVES: &str = "fffbbff";

/// Counts what a real realizer would have built.
#[derive(Default)]
struct ConsoleRealizer {
    cells: usize,
    pieces: usize,
    destroyed: usize,
}

impl RoomRealizer for ConsoleRealizer {
    fn realize_grid(&mut self, grid: &Grid, _cell_size: f64) {
        self.cells = grid.width() * grid.height() - grid.count(CellType::None);
    }

    fn realize_placements(&mut self, placements: &[Placement], _cell_size: f64) {
        self.pieces = placements.len();
    }

    fn destroy_current_room(&mut self) {
        self.destroyed += 1;
    }
}

fn is_move_script(arg: &str) -> bool {
    !arg.is_empty() && arg.chars().all(|c| matches!(c, 'f' | 'b'))
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, moves) = match args.as_slice() {
        [] => (None, DEFAULT_MOVES.to_string()),
        [one] if is_move_script(one) => (None, one.clone()),
        [path] => (Some(path.clone()), DEFAULT_MOVES.to_string()),
        [path, script, ..] => (Some(path.clone()), script.clone()),
    };
    if !is_move_script(&moves) {
        eprintln!("✗ Move script must contain only 'f' and 'b', got {moves:?}");
        std::process::exit(2);
    }

    let config = match &config_path {
        Some(path) => DelveConfig::from_file(path),
        None => Ok(DelveConfig::default()),
    };
    let config = config.unwrap_or_else(|e| {
        eprintln!("✗ FATAL: {e}");
        std::process::exit(1);
    });

    let mut nav = NavigationController::from_config(&config, ConsoleRealizer::default())
        .unwrap_or_else(|e| {
            eprintln!("✗ FATAL: {e}");
            std::process::exit(1);
        });
    nav.events().subscribe(|event| {
        if let NavigationEvent::RoomDiscarded { index, seed } = event {
            tracing::debug!(index, seed = seed.value(), "room discarded");
        }
    });

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                         DELVE ROOM WALK");
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  Config:   {}", config_path.as_deref().unwrap_or("(defaults)"));
    println!("  Rooms:    {}", nav.max_rooms());
    println!("  Size:     {}x{} cells", nav.width(), nav.height());
    println!("  Moves:    {moves}");
    println!();

    for step in moves.chars() {
        let outcome = match nav.traverse(step == 'f') {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("✗ FATAL: {e}");
                std::process::exit(1);
            }
        };

        match outcome {
            NavigationOutcome::Entered { index, seed, arrival } => {
                let realizer = nav.realizer();
                println!("── room {index} (seed {seed}, arrived {arrival:?}) ──");
                println!(
                    "   {} cells, {} pieces, {} rooms destroyed so far",
                    realizer.cells, realizer.pieces, realizer.destroyed
                );
                if let Some(room) = nav.current_room() {
                    let [x, y, z] = room.spawn();
                    println!("   spawn at ({x:.1}, {y:.1}, {z:.1})");
                    print!("{}", room.grid().to_ascii());
                }
            }
            NavigationOutcome::LimitReached { index } => {
                println!("── room {index} is the last room ──");
            }
            NavigationOutcome::AtStart => println!("── already at the first room ──"),
            NavigationOutcome::Busy => println!("── busy ──"),
        }
        println!();
    }

    let seeds: Vec<String> = nav.history().seeds().iter().map(ToString::to_string).collect();
    println!("History: [{}]", seeds.join(", "));
    nav.shutdown();
}
