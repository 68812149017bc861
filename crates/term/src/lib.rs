//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders into a plain framebuffer that is diffed and flushed to
//! the terminal.
//!
//! - [`hud`] collects engine notifications into timed on-screen state
//! - [`game_view`] draws a snapshot plus the HUD into a framebuffer (no I/O)
//! - [`renderer`] owns the terminal and writes frames

pub mod fb;
pub mod game_view;
pub mod hud;
pub mod renderer;

pub use gem_cascade_core as core;
pub use gem_cascade_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Overlay, Viewport};
pub use hud::{Hud, ScoreGain};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
