//! Core match-resolution engine - pure, deterministic, and testable
//!
//! This crate owns the grid, the match rules and the timed resolution pipeline.
//! It has **no dependencies** on rendering, input devices or I/O; everything it
//! wants the outside world to show is queued as an [`EngineEvent`](types::EngineEvent).
//!
//! - **Deterministic**: the same seed and the same intents reproduce the same game
//! - **Headless**: a front-end only calls `tick`, `apply_intent` and reads snapshots
//! - **Inspectable**: every phase can be stepped and asserted on in tests
//!
//! # Module Structure
//!
//! - [`grid`]: 8x8 cell index plus the tile registry, gravity and permutation
//! - [`matcher`]: run detection and connected-shape grouping
//! - [`classifier`]: which special a match shape earns, and where
//! - [`scoring`]: combo multipliers and point values
//! - [`game_state`]: session state and the phase machine driven by `tick`
//! - [`snapshot`]: copyable read-only view for renderers
//! - [`observe`]: observer trait used to publish snapshots and events
//! - [`rng`]: seeded LCG for fills, refills and reshuffles
//!
//! Swap validation, the resolution cycle and items are implemented on
//! [`GameState`] in private modules.
//!
//! # Example
//!
//! ```
//! use gem_cascade_core::GameState;
//! use gem_cascade_core::types::{Intent, LEVELS};
//!
//! let mut game = GameState::new(12345);
//! game.start_level(LEVELS[0]);
//!
//! // Find a swap the engine will accept and play it out
//! let (a, b) = game.find_legal_swap().expect("fresh boards always have a move");
//! assert!(game.apply_intent(Intent::Swap { a, b }));
//! game.settle();
//!
//! assert_eq!(game.moves_left(), LEVELS[0].moves - 1);
//! assert!(game.score() > 0);
//! assert!(game.grid().is_full());
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed time (16ms steps at ~60 FPS). Each phase waits out its own delay
//! before the next transition; see the constants in [`types`].

pub mod classifier;
pub mod game_state;
pub mod grid;
mod items;
pub mod matcher;
pub mod observe;
mod resolve;
pub mod rng;
pub mod scoring;
pub mod snapshot;
mod swap;

pub use gem_cascade_types as types;

// Re-export commonly used types for convenience
pub use classifier::{classify, SpecialSpawn};
pub use game_state::{GameState, Phase, MAX_SETTLE_TICKS};
pub use grid::{Grid, Tile};
pub use matcher::{find_matches, group_matches, MatchGroup, MatchSet};
pub use observe::{Observer, Recorder};
pub use rng::SimpleRng;
pub use snapshot::{GameSnapshot, TileView, TimersSnapshot};
pub use swap::is_swap_combo;
