//! Terminal input module (engine-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key
//! events into [`UiAction`]s and keeps the cursor/selection state that turns
//! those actions into engine [`Intent`](crate::types::Intent)s.

pub mod handler;
pub mod map;

pub use gem_cascade_types as types;

pub use handler::{Command, InputHandler};
pub use map::{handle_key_event, should_quit, Direction, UiAction};
