//! Game state - session bookkeeping and the resolution phase machine
//!
//! Resolution is modeled as explicit phases, each with a remaining-time
//! counter. [`GameState::tick`] burns down the counter and performs exactly one
//! transition when it runs out, so the whole cascade is driven by the caller's
//! fixed timestep and can be stepped deterministically in tests.
//!
//! ```text
//! Idle --swap--> Swapping --valid--> Popping --> Falling* --> Settling
//!                   |                   ^                        |
//!                   +--invalid--> Idle  +------ Cascading <------+ (new matches)
//!                                                                |
//!                              Idle / Reshuffling <--------------+ (stable)
//! ```
//!
//! The rules for each phase live in `swap`, `resolve` and `items`.

use tracing::{debug, info, instrument, trace};

use crate::classifier::SpecialSpawn;
use crate::grid::Grid;
use crate::matcher::MatchSet;
use crate::observe::Observer;
use crate::rng::SimpleRng;
use crate::snapshot::{GameSnapshot, TileView, TimersSnapshot};
use crate::types::{
    Color, Effect, EngineEvent, GameEvent, Intent, Inventory, LevelConfig, Outcome, Pos,
    SpecialKind, GRID_CELLS, GRID_COLS, GRID_ROWS, INITIAL_FILL_ATTEMPTS, MAX_COLORS, MIN_COLORS,
    TICK_MS,
};

use arrayvec::ArrayVec;

/// Upper bound on ticks [`GameState::settle`] will run
pub const MAX_SETTLE_TICKS: u32 = 100_000;

/// Resolution pipeline phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Waiting for player input
    #[default]
    Idle,
    /// Two tiles have been exchanged and wait for validation
    Swapping { a: Pos, b: Pos },
    /// Matched tiles are flagged and shown before removal
    Popping,
    /// Gravity and refill steps
    Falling,
    /// Grid is full, waiting before the re-scan
    Settling,
    /// New matches found after settling, waiting before the next cycle
    Cascading,
    /// Tiles were permuted; input stays locked
    Reshuffling,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Swapping { .. } => "swapping",
            Phase::Popping => "popping",
            Phase::Falling => "falling",
            Phase::Settling => "settling",
            Phase::Cascading => "cascading",
            Phase::Reshuffling => "reshuffling",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) grid: Grid,
    pub(crate) rng: SimpleRng,
    seed: u32,
    config: LevelConfig,
    started: bool,
    pub(crate) phase: Phase,
    pub(crate) phase_ms: u32,
    /// Resolution cycles in the current chain (0 when idle)
    pub(crate) cascade_depth: u32,
    pub(crate) score: u32,
    pub(crate) moves_left: u32,
    pub(crate) combo: u32,
    pub(crate) combo_ms: u32,
    pub(crate) items: Inventory,
    pub(crate) outcome: Option<Outcome>,
    /// Specials to create once the current pop finishes
    pub(crate) pending_specials: Vec<SpecialSpawn>,
    /// Matches found by the last settle, resolved after the cascade delay
    pub(crate) pending_matches: MatchSet,
    /// Queued notifications (consumed by observers)
    events: Vec<EngineEvent>,
}

impl GameState {
    /// Create a session with the given RNG seed; call `start_level` to play
    pub fn new(seed: u32) -> Self {
        Self {
            grid: Grid::new(),
            rng: SimpleRng::new(seed),
            seed,
            config: LevelConfig::default(),
            started: false,
            phase: Phase::Idle,
            phase_ms: 0,
            cascade_depth: 0,
            score: 0,
            moves_left: 0,
            combo: 0,
            combo_ms: 0,
            items: Inventory::default(),
            outcome: None,
            pending_specials: Vec::new(),
            pending_matches: MatchSet::new(),
            events: Vec::new(),
        }
    }

    /// Create a session on a prepared grid instead of a random fill
    pub fn from_grid(seed: u32, config: LevelConfig, grid: Grid) -> Self {
        let mut state = Self::new(seed);
        state.reset_level(config);
        state.grid = grid;
        info!(level = state.config.level, seed, "level started on prepared grid");
        state
    }

    /// Reset score, moves, combo and items, then fill a fresh grid
    #[instrument(skip(self), fields(level = config.level))]
    pub fn start_level(&mut self, config: LevelConfig) {
        self.reset_level(config);
        self.fill_grid();
        info!(
            target_score = self.config.target_score,
            moves = self.config.moves,
            colors = self.config.color_count,
            "level started"
        );
    }

    /// Restart the current level with the same configuration
    pub fn restart(&mut self) {
        let config = self.config;
        self.start_level(config);
    }

    fn reset_level(&mut self, config: LevelConfig) {
        self.config = LevelConfig {
            color_count: config.color_count.clamp(MIN_COLORS, MAX_COLORS),
            ..config
        };
        self.started = true;
        self.phase = Phase::Idle;
        self.phase_ms = 0;
        self.cascade_depth = 0;
        self.score = 0;
        self.moves_left = config.moves;
        self.combo = 0;
        self.combo_ms = 0;
        self.items = Inventory::default();
        self.outcome = None;
        self.pending_specials.clear();
        self.pending_matches.clear();
        self.events.clear();
    }

    /// Fill every cell without creating a run, retrying until a swap exists
    fn fill_grid(&mut self) {
        for attempt in 1..=INITIAL_FILL_ATTEMPTS {
            self.grid.clear();
            for index in 0..GRID_CELLS {
                let Some(pos) = Pos::from_index(index) else {
                    continue;
                };
                let color = self.fill_color(pos);
                self.grid.spawn(pos, color, SpecialKind::None);
            }
            if self.has_legal_move() {
                debug!(attempt, "initial fill accepted");
                return;
            }
            debug!(attempt, "initial fill has no legal swap, refilling");
        }
    }

    /// Random level color that does not complete a run with the two cells
    /// to the left or the two cells above
    fn fill_color(&mut self, pos: Pos) -> Color {
        let same_pair = |grid: &Grid, dc: i8, dr: i8| -> Option<Color> {
            let first = grid.tile_at(pos.offset(dc, dr)?)?.color;
            let second = grid.tile_at(pos.offset(dc * 2, dr * 2)?)?.color;
            (first == second).then_some(first)
        };
        let left = same_pair(&self.grid, -1, 0);
        let up = same_pair(&self.grid, 0, -1);

        let candidates: ArrayVec<Color, 6> = Color::PLAYABLE
            [..self.config.color_count as usize]
            .iter()
            .copied()
            .filter(|&c| Some(c) != left && Some(c) != up)
            .collect();
        if candidates.is_empty() {
            return self.rng.next_color(self.config.color_count);
        }
        candidates[self.rng.next_range(candidates.len() as u32) as usize]
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.config.level
    }

    pub fn target_score(&self) -> u32 {
        self.config.target_score
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn combo_ms(&self) -> u32 {
        self.combo_ms
    }

    pub fn items(&self) -> Inventory {
        self.items
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Remaining time in the current phase
    pub fn phase_ms(&self) -> u32 {
        self.phase_ms
    }

    pub fn cascade_depth(&self) -> u32 {
        self.cascade_depth
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Resolution is in progress
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Intents are only honored while idle, before an outcome
    pub(crate) fn accepts_input(&self) -> bool {
        self.started && self.outcome.is_none() && self.phase == Phase::Idle
    }

    /// Tile views in id order
    pub fn tile_views(&self) -> impl Iterator<Item = TileView> + '_ {
        self.grid.tiles().map(|t| TileView::from(*t))
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.cells = [[None; GRID_COLS as usize]; GRID_ROWS as usize];
        for view in self.tile_views() {
            out.cells[view.pos.row as usize][view.pos.col as usize] = Some(view);
        }
        out.phase = self.phase;
        out.cascade_depth = self.cascade_depth;
        out.outcome = self.outcome;
        out.started = self.started;
        out.seed = self.seed;
        out.level = self.config.level;
        out.score = self.score;
        out.target_score = self.config.target_score;
        out.moves_left = self.moves_left;
        out.combo = self.combo;
        out.items = self.items;
        out.timers = TimersSnapshot {
            phase_ms: self.phase_ms,
            combo_ms: self.combo_ms,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    pub(crate) fn emit(&mut self, effect: Effect) {
        self.events.push(EngineEvent::Effect(effect));
    }

    pub(crate) fn emit_game(&mut self, event: GameEvent) {
        debug!(event = event.as_str(), "game event");
        self.events.push(EngineEvent::Game(event));
    }

    /// Queued notifications, oldest first
    pub fn pending_events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Take every queued notification
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, EngineEvent> {
        self.events.drain(..)
    }

    /// Hand the current snapshot, then every queued event, to an observer
    pub fn publish<O: Observer + ?Sized>(&mut self, observer: &mut O) {
        let snapshot = self.snapshot();
        observer.on_snapshot(&snapshot);
        for event in self.events.drain(..) {
            match event {
                EngineEvent::Game(e) => observer.on_game_event(e),
                EngineEvent::Effect(fx) => observer.on_effect(&fx),
            }
        }
    }

    pub(crate) fn enter(&mut self, phase: Phase, duration_ms: u32) {
        trace!(from = self.phase.as_str(), to = phase.as_str(), duration_ms, "phase");
        self.phase = phase;
        self.phase_ms = duration_ms;
    }

    /// Advance timers; returns true when a phase transition happened
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.started {
            return false;
        }

        if self.combo > 0 {
            self.combo_ms = self.combo_ms.saturating_sub(elapsed_ms);
            if self.combo_ms == 0 {
                trace!(combo = self.combo, "combo expired");
                self.combo = 0;
            }
        }

        if self.phase == Phase::Idle {
            return false;
        }

        self.phase_ms = self.phase_ms.saturating_sub(elapsed_ms);
        if self.phase_ms > 0 {
            return false;
        }

        match self.phase {
            Phase::Idle => {}
            Phase::Swapping { a, b } => self.finish_swap(a, b),
            Phase::Popping => self.finish_pop(),
            Phase::Falling => self.step_gravity(),
            Phase::Settling => self.finish_settle(),
            Phase::Cascading => {
                let matches = std::mem::take(&mut self.pending_matches);
                self.begin_cycle(matches);
            }
            Phase::Reshuffling => self.enter(Phase::Idle, 0),
        }
        true
    }

    /// Tick at [`TICK_MS`] until the pipeline is idle; returns ticks taken
    pub fn settle(&mut self) -> u32 {
        let mut ticks = 0;
        while self.phase != Phase::Idle && ticks < MAX_SETTLE_TICKS {
            self.tick(TICK_MS);
            ticks += 1;
        }
        ticks
    }

    /// Apply a player intent; false when it was rejected
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        let accepted = match intent {
            Intent::Swap { a, b } => self.request_swap(a, b),
            Intent::Activate { at } => self.activate(at),
            Intent::UseItem { item, target } => self.use_item(item, target),
        };
        if !accepted {
            trace!(?intent, phase = self.phase.as_str(), "intent rejected");
        }
        accepted
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
