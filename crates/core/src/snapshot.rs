use crate::game_state::Phase;
use crate::grid::Tile;
use crate::types::{
    Color, Inventory, Outcome, Pos, SpecialKind, TileId, GRID_COLS, GRID_ROWS,
};

/// Read-only view of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileView {
    pub id: TileId,
    pub pos: Pos,
    pub color: Color,
    pub special: SpecialKind,
    pub matched: bool,
}

impl From<Tile> for TileView {
    fn from(value: Tile) -> Self {
        Self {
            id: value.id,
            pos: value.pos,
            color: value.color,
            special: value.special,
            matched: value.matched,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimersSnapshot {
    /// Time left in the current pipeline phase
    pub phase_ms: u32,
    /// Time left before the combo counter decays
    pub combo_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Cells indexed `[row][col]`
    pub cells: [[Option<TileView>; GRID_COLS as usize]; GRID_ROWS as usize],
    pub phase: Phase,
    pub cascade_depth: u32,
    pub outcome: Option<Outcome>,
    pub started: bool,
    pub seed: u32,
    pub level: u32,
    pub score: u32,
    pub target_score: u32,
    pub moves_left: u32,
    pub combo: u32,
    pub items: Inventory,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.cells = [[None; GRID_COLS as usize]; GRID_ROWS as usize];
        self.phase = Phase::Idle;
        self.cascade_depth = 0;
        self.outcome = None;
        self.started = false;
        self.seed = 0;
        self.level = 0;
        self.score = 0;
        self.target_score = 0;
        self.moves_left = 0;
        self.combo = 0;
        self.items = Inventory::default();
        self.timers = TimersSnapshot {
            phase_ms: 0,
            combo_ms: 0,
        };
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&TileView> {
        if !pos.in_bounds() {
            return None;
        }
        self.cells[pos.row as usize][pos.col as usize].as_ref()
    }

    /// Resolution is running; intents would be rejected
    pub fn busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Whether the engine would accept a player intent right now
    pub fn playable(&self) -> bool {
        self.started && self.outcome.is_none() && !self.busy()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            cells: [[None; GRID_COLS as usize]; GRID_ROWS as usize],
            phase: Phase::Idle,
            cascade_depth: 0,
            outcome: None,
            started: false,
            seed: 0,
            level: 0,
            score: 0,
            target_score: 0,
            moves_left: 0,
            combo: 0,
            items: Inventory::default(),
            timers: TimersSnapshot {
                phase_ms: 0,
                combo_ms: 0,
            },
        };
        s.clear();
        s
    }
}
