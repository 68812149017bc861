//! Level configuration - externally supplied, immutable per level
//!
//! The engine only ever sees a final [`LevelConfig`]; difficulty scaling is
//! applied beforehand with [`LevelConfig::scaled`].

use serde::{Deserialize, Serialize};

/// Configuration for a single level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    /// 1-based level number
    pub level: u32,
    /// Score that wins the level
    pub target_score: u32,
    /// Move allowance
    pub moves: u32,
    /// Number of distinct colors (4-6)
    pub color_count: u8,
}

impl LevelConfig {
    pub const fn new(level: u32, target_score: u32, moves: u32, color_count: u8) -> Self {
        Self {
            level,
            target_score,
            moves,
            color_count,
        }
    }

    /// Apply difficulty multipliers to moves and target score (floored)
    ///
    /// Moves never drop below one unless the base config already has none.
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_cascade_types::{Difficulty, LevelConfig};
    ///
    /// let base = LevelConfig::new(1, 1000, 20, 4);
    /// let easy = base.scaled(Difficulty::Easy);
    /// assert_eq!(easy.moves, 30);
    /// assert_eq!(easy.target_score, 800);
    ///
    /// let hard = base.scaled(Difficulty::Hard);
    /// assert_eq!(hard.moves, 16);
    /// assert_eq!(hard.target_score, 1200);
    /// ```
    pub fn scaled(self, difficulty: Difficulty) -> Self {
        let (moves_num, score_num) = difficulty.multipliers_tenths();
        // A playable level never scales down to zero moves
        let moves = (self.moves.saturating_mul(moves_num) / 10).max(self.moves.min(1));
        Self {
            moves,
            target_score: self.target_score.saturating_mul(score_num) / 10,
            ..self
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        LEVELS[0]
    }
}

/// Built-in level table
pub const LEVELS: [LevelConfig; 5] = [
    LevelConfig::new(1, 1000, 20, 4),
    LevelConfig::new(2, 2500, 25, 5),
    LevelConfig::new(3, 5000, 30, 6),
    LevelConfig::new(4, 8000, 35, 6),
    LevelConfig::new(5, 12000, 40, 6),
];

/// Look up a built-in level (0-based index) and scale it
pub fn level_config(index: usize, difficulty: Difficulty) -> Option<LevelConfig> {
    LEVELS.get(index).map(|cfg| cfg.scaled(difficulty))
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// (moves, target score) multipliers in tenths
    fn multipliers_tenths(self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (15, 8),
            Difficulty::Normal => (10, 10),
            Difficulty::Hard => (8, 12),
        }
    }

    /// Parse difficulty from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "normal" | "n" => Some(Difficulty::Normal),
            "hard" | "h" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}
