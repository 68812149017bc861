//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no engine logic, making them usable in any
//! context (core resolution engine, terminal rendering, input translation).
//!
//! # Grid Dimensions
//!
//! - **Columns**: 8 (indexed 0-7, left to right)
//! - **Rows**: 8 (indexed 0-7, top to bottom; gravity pulls toward row 7)
//!
//! # Phase Timing Constants
//!
//! The resolution cascade is a sequence of timed phases advanced by `tick`.
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SWAP_DELAY_MS` | 200 | Swap settle before validation |
//! | `POP_DELAY_MS` | 300 | Matched tiles shown before removal |
//! | `GRAVITY_STEP_MS` | 50 | One gravity/refill step |
//! | `SETTLE_DELAY_MS` | 400 | Post-gravity settle before re-scan |
//! | `CASCADE_DELAY_MS` | 200 | Pause before a cascade cycle |
//! | `RESHUFFLE_LOCK_MS` | 1000 | Input lock after a reshuffle |
//! | `COMBO_TIME_LIMIT_MS` | 3000 | Combo decay window |
//!
//! # Scoring
//!
//! Multipliers are kept in tenths so that scoring stays in integer math:
//! a combo of 1 is `11` tenths (1.1x), a multi-match adds `10` tenths (+1.0x).
//!
//! # Examples
//!
//! ```
//! use gem_cascade_types::{Color, Pos, SpecialKind, GRID_COLS, GRID_ROWS};
//!
//! let color = Color::from_char('r').unwrap();
//! assert_eq!(color, Color::Red);
//! assert!(Color::White.is_wildcard());
//!
//! let a = Pos::new(3, 4);
//! assert!(a.is_adjacent(Pos::new(3, 5)));
//! assert!(!a.is_adjacent(Pos::new(4, 5)));
//!
//! assert_eq!(SpecialKind::from_str("rainbow"), Some(SpecialKind::Rainbow));
//! assert_eq!((GRID_COLS, GRID_ROWS), (8, 8));
//! ```

use serde::{Deserialize, Serialize};

pub mod level;

pub use level::{level_config, Difficulty, LevelConfig, LEVELS};

/// Grid width in cells (8 columns)
pub const GRID_COLS: u8 = 8;

/// Grid height in cells (8 rows)
pub const GRID_ROWS: u8 = 8;

/// Total number of cells on the grid
pub const GRID_CELLS: usize = (GRID_COLS as usize) * (GRID_ROWS as usize);

/// Minimum straight run length that counts as a match
pub const MIN_RUN: usize = 3;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Time the swapped tiles sit in place before the swap is validated
pub const SWAP_DELAY_MS: u32 = 200;

/// Time matched tiles stay on the grid (pop animation) before removal
pub const POP_DELAY_MS: u32 = 300;

/// Duration of a single gravity/refill step
pub const GRAVITY_STEP_MS: u32 = 50;

/// Settle time after gravity finishes, before the grid is re-scanned
pub const SETTLE_DELAY_MS: u32 = 400;

/// Pause between a settled grid with new matches and the cascade cycle
pub const CASCADE_DELAY_MS: u32 = 200;

/// Input lock after the grid has been reshuffled
pub const RESHUFFLE_LOCK_MS: u32 = 1000;

/// Combo decay window (180 frames at 60 FPS)
pub const COMBO_TIME_LIMIT_MS: u32 = 3000;

/// How long presentation layers keep transient messages on screen
pub const MESSAGE_DISMISS_MS: u32 = 2000;

/// Base points per matched tile, before the multiplier
pub const BASE_TILE_SCORE: u32 = 10;

/// Multiplier in tenths when no combo is active (1.0x)
pub const BASE_MULTIPLIER_TENTHS: u32 = 10;

/// Multiplier gained per combo step, in tenths (+0.1x)
pub const COMBO_STEP_TENTHS: u32 = 1;

/// Flat multiplier bonus for a multi-match cycle, in tenths (+1.0x)
pub const MULTI_MATCH_BONUS_TENTHS: u32 = 10;

/// Points per tile destroyed by a triggered special
pub const BLAST_TILE_SCORE: u32 = 20;

/// Points per tile hit by the bomb item
pub const BOMB_TILE_SCORE: u32 = 50;

/// Points per tile removed by a rainbow + plain swap
pub const RAINBOW_TILE_SCORE: u32 = 50;

/// Points per tile removed by a rainbow + rainbow swap
pub const FULL_CLEAR_TILE_SCORE: u32 = 100;

/// Bomb charges granted at level start
pub const DEFAULT_BOMBS: u8 = 3;

/// Reshuffle charges granted at level start
pub const DEFAULT_RESHUFFLES: u8 = 3;

/// Fewest distinct colors a level may use
pub const MIN_COLORS: u8 = 4;

/// Most distinct colors a level may use
pub const MAX_COLORS: u8 = 6;

/// Color range a cascade-triggered rainbow picks its target from
pub const RAINBOW_TRIGGER_COLORS: u8 = 5;

/// Attempts at producing an initial fill with at least one legal swap
pub const INITIAL_FILL_ATTEMPTS: u32 = 16;


/// Gem colors
///
/// Six playable colors plus `White`, which only rainbow tiles carry.
/// A level uses the first `color_count` playable colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    /// Wildcard color of rainbow tiles; never forms runs.
    White,
}

impl Color {
    /// Colors a level can spawn, in draw order.
    pub const PLAYABLE: [Color; 6] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
    ];

    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::White,
    ];

    /// Map a color index (0-5 playable, 6 white) to a color
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// White never participates in runs.
    pub fn is_wildcard(self) -> bool {
        self == Color::White
    }

    /// Parse a layout character (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_cascade_types::Color;
    ///
    /// assert_eq!(Color::from_char('B'), Some(Color::Blue));
    /// assert_eq!(Color::from_char('w'), Some(Color::White));
    /// assert_eq!(Color::from_char('.'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'O' => Some(Color::Orange),
            'Y' => Some(Color::Yellow),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            'P' => Some(Color::Purple),
            'W' => Some(Color::White),
            _ => None,
        }
    }

    /// Uppercase layout character
    pub fn as_char(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Orange => 'O',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Purple => 'P',
            Color::White => 'W',
        }
    }
}

/// Power-tile kinds
///
/// - **RowClear**: clears its entire row when triggered
/// - **ColClear**: clears its entire column when triggered
/// - **AreaBlast**: clears the 3x3 neighborhood around it
/// - **Rainbow**: clears every tile of one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    #[default]
    None,
    RowClear,
    ColClear,
    AreaBlast,
    Rainbow,
}

impl SpecialKind {
    pub fn is_special(self) -> bool {
        self != SpecialKind::None
    }

    /// Parse special kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(SpecialKind::None),
            "row" | "row_clear" | "row-clear" => Some(SpecialKind::RowClear),
            "col" | "col_clear" | "col-clear" => Some(SpecialKind::ColClear),
            "area" | "area_blast" | "area-blast" => Some(SpecialKind::AreaBlast),
            "rainbow" => Some(SpecialKind::Rainbow),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpecialKind::None => "none",
            SpecialKind::RowClear => "row_clear",
            SpecialKind::ColClear => "col_clear",
            SpecialKind::AreaBlast => "area_blast",
            SpecialKind::Rainbow => "rainbow",
        }
    }
}

/// Grid coordinates: `col` 0-7 left to right, `row` 0-7 top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub col: u8,
    pub row: u8,
}

impl Pos {
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Whether the position lies inside the grid
    pub fn in_bounds(self) -> bool {
        self.col < GRID_COLS && self.row < GRID_ROWS
    }

    /// Flat row-major index (row * COLS + col)
    #[inline(always)]
    pub fn index(self) -> usize {
        (self.row as usize) * (GRID_COLS as usize) + (self.col as usize)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= GRID_CELLS {
            return None;
        }
        let cols = GRID_COLS as usize;
        Some(Self::new((index % cols) as u8, (index / cols) as u8))
    }

    /// Shift by (dc, dr); `None` if the result leaves the grid
    pub fn offset(self, dc: i8, dr: i8) -> Option<Self> {
        let col = self.col as i16 + dc as i16;
        let row = self.row as i16 + dr as i16;
        if col < 0 || row < 0 || col >= GRID_COLS as i16 || row >= GRID_ROWS as i16 {
            return None;
        }
        Some(Self::new(col as u8, row as u8))
    }

    /// 4-directional adjacency
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dc = self.col.abs_diff(other.col);
        let dr = self.row.abs_diff(other.row);
        dc + dr == 1
    }
}

/// Unique, monotonically increasing tile identity.
///
/// Ids start at 1 and are never reused within a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// Consumable item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Clears the 3x3 neighborhood of a target tile
    Bomb,
    /// Permutes every tile position
    Reshuffle,
}

/// Remaining consumable charges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inventory {
    pub bombs: u8,
    pub reshuffles: u8,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            bombs: DEFAULT_BOMBS,
            reshuffles: DEFAULT_RESHUFFLES,
        }
    }
}

/// Player intents produced by input translation.
///
/// Illegal intents are rejected silently by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// Swap the tiles at two adjacent cells
    Swap { a: Pos, b: Pos },
    /// Tap a special tile to detonate it in place
    Activate { at: Pos },
    /// Use a consumable item (bombs need a target)
    UseItem { item: ItemKind, target: Option<Pos> },
}

/// Level-level notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    Win,
    Lose,
    Reshuffle,
    MultiMatch,
}

impl GameEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            GameEvent::Win => "win",
            GameEvent::Lose => "lose",
            GameEvent::Reshuffle => "reshuffle",
            GameEvent::MultiMatch => "multi_match",
        }
    }
}

/// Terminal result of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
}

/// Severity tier of floating score text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTier {
    Normal,
    Combo,
    Critical,
}

/// Full-width callouts shown over the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Callout {
    MultiMatch,
    MaxClear,
    Boom,
}

impl Callout {
    pub fn text(self) -> &'static str {
        match self {
            Callout::MultiMatch => "MULTI-MATCH!",
            Callout::MaxClear => "MAX CLEAR!",
            Callout::Boom => "BOOM!",
        }
    }
}

/// Audio cues (fire-and-forget)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum SoundCue {
    Swap,
    Invalid,
    Match { combo: u32 },
    Explosion,
    Win,
}

/// Presentation cues emitted by the engine.
///
/// None of these feed back into gameplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Particle burst at a cell in a tile color
    Burst { at: Pos, color: Color },
    /// Floating score text at a cell
    ScoreText { at: Pos, amount: u32, tier: TextTier },
    /// Callout anchored at a cell, or centered when `at` is `None`
    Callout { at: Option<Pos>, callout: Callout },
    /// Screen shake intensity (0 = none)
    Shake { intensity: u8 },
    Sound(SoundCue),
}

/// Queued engine notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineEvent {
    Game(GameEvent),
    Effect(Effect),
}
