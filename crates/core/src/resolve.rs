//! Resolution pipeline - match cycles, special chains, gravity and termination
//!
//! One cycle runs in a fixed order: bump the combo, group and score the
//! matches, queue earned specials, flag every seed tile, then chain through
//! any specials among them. Flagging all seeds before the chain starts keeps a
//! special from being triggered twice in one cycle.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info, instrument, warn};

use crate::classifier::classify;
use crate::game_state::{GameState, Phase};
use crate::grid::{neighborhood, Tile};
use crate::matcher::{find_matches, group_matches, swap_creates_run, MatchSet};
use crate::scoring::{cycle_shake, match_score, multiplier_tenths, text_tier};
use crate::swap::is_swap_combo;
use crate::types::{
    Callout, Effect, GameEvent, Outcome, Pos, SoundCue, SpecialKind, TextTier, TileId,
    BLAST_TILE_SCORE, CASCADE_DELAY_MS, COMBO_TIME_LIMIT_MS, GRAVITY_STEP_MS, GRID_COLS,
    GRID_ROWS, MIN_RUN, POP_DELAY_MS, RAINBOW_TRIGGER_COLORS, RESHUFFLE_LOCK_MS,
    SETTLE_DELAY_MS,
};

/// Shake strength for a multi-match cycle
const MULTI_MATCH_SHAKE: u8 = 15;

impl GameState {
    /// Start a resolution cycle for `matched` and enter the pop delay
    #[instrument(skip(self, matched), fields(tiles = matched.len()))]
    pub(crate) fn begin_cycle(&mut self, matched: MatchSet) {
        self.combo += 1;
        self.combo_ms = COMBO_TIME_LIMIT_MS;
        self.cascade_depth += 1;

        let groups = group_matches(&self.grid, &matched);
        let multi = groups.len() >= 2;
        let mult = multiplier_tenths(self.combo, multi);

        if multi {
            self.emit_game(GameEvent::MultiMatch);
            self.emit(Effect::Callout {
                at: None,
                callout: Callout::MultiMatch,
            });
            self.emit(Effect::Shake {
                intensity: MULTI_MATCH_SHAKE,
            });
        }

        for group in &groups {
            if group.len() >= MIN_RUN {
                if let Some(mid) = group.midpoint() {
                    self.emit(Effect::ScoreText {
                        at: mid.pos,
                        amount: match_score(group.len(), mult),
                        tier: text_tier(group.len(), mult),
                    });
                }
            }
            if let Some(spawn) = classify(group) {
                debug!(kind = spawn.kind.as_str(), col = spawn.at.col, row = spawn.at.row, "special earned");
                self.pending_specials.push(spawn);
            }
        }

        // Tiles flagged before the cycle (swap combos) have already fired
        let mut seeds = Vec::new();
        for &id in &matched {
            if !self.grid.set_matched(id) {
                continue;
            }
            self.burst(id);
            if self.grid.tile(id).is_some_and(Tile::is_special) {
                seeds.push(id);
            }
        }
        self.trigger_chain(seeds);

        let points = match_score(matched.len(), mult);
        self.score = self.score.saturating_add(points);
        if !matched.is_empty() {
            self.emit(Effect::Shake {
                intensity: cycle_shake(self.combo),
            });
            self.emit(Effect::Sound(SoundCue::Match { combo: self.combo }));
        }

        debug!(
            combo = self.combo,
            depth = self.cascade_depth,
            groups = groups.len(),
            points,
            score = self.score,
            "resolution cycle"
        );
        self.enter(Phase::Popping, POP_DELAY_MS);
    }

    /// Trigger each special in `seeds`, chaining into specials they hit
    ///
    /// A tile is triggered at most once per call and every newly flagged
    /// tile is worth [`BLAST_TILE_SCORE`].
    pub(crate) fn trigger_chain(&mut self, seeds: Vec<TileId>) {
        let mut queue: VecDeque<TileId> = seeds.into();
        let mut triggered: BTreeSet<TileId> = BTreeSet::new();

        while let Some(id) = queue.pop_front() {
            if !triggered.insert(id) {
                continue;
            }
            let Some(tile) = self.grid.tile(id).copied() else {
                continue;
            };
            if !tile.is_special() {
                continue;
            }
            if self.grid.set_matched(id) {
                self.burst(id);
            }
            self.emit(Effect::Sound(SoundCue::Explosion));

            let mut blasted = 0u32;
            for target in self.blast_targets(&tile) {
                if !self.grid.set_matched(target) {
                    continue;
                }
                blasted += 1;
                self.burst(target);
                if self.grid.tile(target).is_some_and(Tile::is_special) {
                    queue.push_back(target);
                }
            }

            let points = blasted * BLAST_TILE_SCORE;
            self.score = self.score.saturating_add(points);
            if points > 0 {
                self.emit(Effect::ScoreText {
                    at: tile.pos,
                    amount: points,
                    tier: TextTier::Critical,
                });
            }
            debug!(kind = tile.special.as_str(), blasted, "special triggered");
        }
    }

    /// Tiles a triggered special flags
    fn blast_targets(&mut self, tile: &Tile) -> Vec<TileId> {
        match tile.special {
            SpecialKind::None => Vec::new(),
            SpecialKind::RowClear => (0..GRID_COLS)
                .filter_map(|col| self.grid.at(Pos::new(col, tile.pos.row)))
                .collect(),
            SpecialKind::ColClear => (0..GRID_ROWS)
                .filter_map(|row| self.grid.at(Pos::new(tile.pos.col, row)))
                .collect(),
            SpecialKind::AreaBlast => neighborhood(tile.pos)
                .into_iter()
                .filter_map(|p| self.grid.at(p))
                .collect(),
            SpecialKind::Rainbow => {
                let color = self.rng.next_color(RAINBOW_TRIGGER_COLORS);
                self.grid.ids_with_color(color)
            }
        }
    }

    pub(crate) fn burst(&mut self, id: TileId) {
        if let Some(tile) = self.grid.tile(id).copied() {
            self.emit(Effect::Burst {
                at: tile.pos,
                color: tile.color,
            });
        }
    }

    /// Pop delay elapsed: remove flagged tiles and place earned specials
    pub(crate) fn finish_pop(&mut self) {
        let removed = self.grid.remove_matched();
        for spawn in std::mem::take(&mut self.pending_specials) {
            if self.grid.spawn(spawn.at, spawn.color, spawn.kind).is_none() {
                warn!(col = spawn.at.col, row = spawn.at.row, "special cell still occupied");
            }
        }
        debug!(removed = removed.len(), "tiles removed");
        self.enter(Phase::Falling, GRAVITY_STEP_MS);
    }

    /// One gravity pass plus a top-row refill
    pub(crate) fn step_gravity(&mut self) {
        let moved = self.grid.gravity_step();
        let spawned = self.refill_top();
        if moved || spawned > 0 {
            self.enter(Phase::Falling, GRAVITY_STEP_MS);
        } else {
            self.enter(Phase::Settling, SETTLE_DELAY_MS);
        }
    }

    fn refill_top(&mut self) -> usize {
        let colors = self.config().color_count;
        let empty = self.grid.empty_top_cells();
        for &pos in &empty {
            let color = self.rng.next_color(colors);
            self.grid.spawn(pos, color, SpecialKind::None);
        }
        empty.len()
    }

    /// Settle delay elapsed: cascade on new matches, otherwise wrap up
    pub(crate) fn finish_settle(&mut self) {
        let matches = find_matches(&self.grid);
        if matches.is_empty() {
            self.finish_resolution();
        } else {
            debug!(tiles = matches.len(), "cascade");
            self.pending_matches = matches;
            self.enter(Phase::Cascading, CASCADE_DELAY_MS);
        }
    }

    /// The grid is stable: decide win, loss, dead board or idle
    fn finish_resolution(&mut self) {
        debug_assert!(self.grid.is_full(), "stable grid has holes");
        debug_assert!(self.grid.is_consistent(), "cell index out of sync");
        self.cascade_depth = 0;

        if self.moves_left == 0 && self.score < self.target_score() {
            self.outcome = Some(Outcome::Lost);
            self.emit_game(GameEvent::Lose);
            info!(score = self.score, target = self.target_score(), "level lost");
            self.enter(Phase::Idle, 0);
        } else if self.score >= self.target_score() {
            self.outcome = Some(Outcome::Won);
            self.emit_game(GameEvent::Win);
            self.emit(Effect::Sound(SoundCue::Win));
            info!(score = self.score, moves_left = self.moves_left, "level won");
            self.enter(Phase::Idle, 0);
        } else if !self.has_legal_move() {
            info!("no legal swap left, reshuffling");
            self.reshuffle_board();
        } else {
            self.enter(Phase::Idle, 0);
        }
    }

    /// Permute every tile and lock input for [`RESHUFFLE_LOCK_MS`]
    pub(crate) fn reshuffle_board(&mut self) {
        self.grid.permute(&mut self.rng);
        self.emit_game(GameEvent::Reshuffle);
        self.enter(Phase::Reshuffling, RESHUFFLE_LOCK_MS);
    }

    /// Whether any adjacent swap would be accepted
    pub fn has_legal_move(&self) -> bool {
        self.find_legal_swap().is_some()
    }

    /// First adjacent swap (scanning right, then down) that would be accepted
    pub fn find_legal_swap(&self) -> Option<(Pos, Pos)> {
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let a = Pos::new(col, row);
                let Some(ta) = self.grid.tile_at(a) else {
                    continue;
                };
                for b in [a.offset(1, 0), a.offset(0, 1)].into_iter().flatten() {
                    let Some(tb) = self.grid.tile_at(b) else {
                        continue;
                    };
                    if is_swap_combo(ta, tb) || swap_creates_run(&self.grid, a, b) {
                        return Some((a, b));
                    }
                }
            }
        }
        None
    }

    /// Tap a special tile to detonate it in place (costs one move)
    #[instrument(skip(self))]
    pub fn activate(&mut self, at: Pos) -> bool {
        if !self.accepts_input() || self.moves_left == 0 {
            return false;
        }
        let Some(tile) = self.grid.tile_at(at).copied() else {
            return false;
        };
        if !tile.is_special() {
            return false;
        }
        self.moves_left -= 1;
        self.begin_cycle(MatchSet::from([tile.id]));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::types::{Color, LevelConfig, GRID_CELLS};

    const CHECKER: [&str; 8] = [
        "RGBYRGBY", "BYRGBYRG", "RGBYRGBY", "BYRGBYRG", "RGBYRGBY", "BYRGBYRG", "RGBYRGBY",
        "BYRGBYRG",
    ];

    fn game_on(rows: [&str; 8]) -> GameState {
        let grid = Grid::from_layout(&rows).unwrap();
        GameState::from_grid(9, LevelConfig::new(1, 100_000, 20, 4), grid)
    }

    #[test]
    fn test_checker_has_no_legal_swap() {
        let game = game_on(CHECKER);
        assert!(!game.has_legal_move());
    }

    #[test]
    fn test_special_pair_counts_as_legal_swap() {
        let mut game = game_on(CHECKER);
        game.grid_mut().set_special(Pos::new(3, 3), SpecialKind::RowClear);
        game.grid_mut().set_special(Pos::new(4, 3), SpecialKind::AreaBlast);
        assert_eq!(
            game.find_legal_swap(),
            Some((Pos::new(3, 3), Pos::new(4, 3)))
        );
    }

    #[test]
    fn test_rainbow_next_to_anything_is_legal() {
        let mut game = game_on(CHECKER);
        game.grid_mut().set_special(Pos::new(0, 7), SpecialKind::Rainbow);
        assert!(game.has_legal_move());
    }

    #[test]
    fn test_row_clear_chain_flags_whole_row() {
        let mut game = game_on(CHECKER);
        let center = Pos::new(3, 5);
        game.grid_mut().set_special(center, SpecialKind::RowClear);
        let id = game.grid().at(center).unwrap();

        game.begin_cycle(MatchSet::from([id]));

        assert_eq!(game.phase(), Phase::Popping);
        for col in 0..GRID_COLS {
            let tile = game.grid().tile_at(Pos::new(col, 5)).unwrap();
            assert!(tile.matched, "col {} not flagged", col);
        }
        assert_eq!(game.grid().matched_count(), GRID_COLS as usize);
        // seed tile: 1 * 10 * 1.1, plus 7 blasted tiles at 20
        assert_eq!(game.score(), 11 + 7 * BLAST_TILE_SCORE);
    }

    #[test]
    fn test_chain_reaches_second_special_once() {
        let mut game = game_on(CHECKER);
        game.grid_mut().set_special(Pos::new(1, 2), SpecialKind::RowClear);
        game.grid_mut().set_special(Pos::new(6, 2), SpecialKind::ColClear);
        let id = game.grid().at(Pos::new(1, 2)).unwrap();

        game.begin_cycle(MatchSet::from([id]));

        // Row 2 plus column 6 share one cell
        assert_eq!(
            game.grid().matched_count(),
            GRID_COLS as usize + GRID_ROWS as usize - 1
        );
        let expected = 11 + 7 * BLAST_TILE_SCORE + 7 * BLAST_TILE_SCORE;
        assert_eq!(game.score(), expected);
    }

    #[test]
    fn test_area_blast_flags_neighborhood() {
        let mut game = game_on(CHECKER);
        game.grid_mut().set_special(Pos::new(0, 0), SpecialKind::AreaBlast);
        let id = game.grid().at(Pos::new(0, 0)).unwrap();
        game.begin_cycle(MatchSet::from([id]));
        assert_eq!(game.grid().matched_count(), 4);
    }

    #[test]
    fn test_pop_then_gravity_refills_everything() {
        let mut game = game_on(CHECKER);
        game.grid_mut().set_special(Pos::new(4, 4), SpecialKind::ColClear);
        let id = game.grid().at(Pos::new(4, 4)).unwrap();
        game.begin_cycle(MatchSet::from([id]));

        // Pop delay
        while game.phase() == Phase::Popping {
            game.tick(16);
        }
        assert_eq!(game.phase(), Phase::Falling);
        assert_eq!(game.grid().len(), GRID_CELLS - GRID_ROWS as usize);

        while game.phase() == Phase::Falling {
            game.tick(16);
        }
        assert!(game.grid().is_full());
        assert!(game.grid().is_consistent());
        assert_eq!(game.grid().matched_count(), 0);
    }

    #[test]
    fn test_earned_special_spawns_after_pop() {
        let mut rows = CHECKER;
        rows[7] = "POOOOYRG";
        let mut game = game_on(rows);
        let matched = find_matches(game.grid());
        assert_eq!(matched.len(), 4);

        game.begin_cycle(matched);
        while game.phase() == Phase::Popping {
            game.tick(16);
        }
        let tile = game.grid().tile_at(Pos::new(3, 7)).unwrap();
        assert_eq!(tile.special, SpecialKind::RowClear);
        assert_eq!(tile.color, Color::Orange);
        assert!(!tile.matched);
    }

    #[test]
    fn test_dead_board_reshuffles_once() {
        let mut game = game_on(CHECKER);
        game.finish_resolution();
        assert_eq!(game.phase(), Phase::Reshuffling);
        let reshuffles = game
            .drain_events()
            .filter(|e| *e == crate::types::EngineEvent::Game(GameEvent::Reshuffle))
            .count();
        assert_eq!(reshuffles, 1);
        assert!(game.outcome().is_none());
    }

    #[test]
    fn test_activate_requires_special_and_moves() {
        let mut game = game_on(CHECKER);
        assert!(!game.activate(Pos::new(2, 2)));
        game.grid_mut().set_special(Pos::new(2, 2), SpecialKind::AreaBlast);
        assert!(game.activate(Pos::new(2, 2)));
        assert_eq!(game.moves_left(), 19);
        assert!(game.is_busy());
        // Busy pipeline rejects a second tap
        assert!(!game.activate(Pos::new(2, 2)));
    }

    #[test]
    fn test_rainbow_in_chain_clears_a_drawn_color() {
        let mut any_hit = false;
        for seed in 1..16 {
            let grid = Grid::from_layout(&CHECKER).unwrap();
            let mut game = GameState::from_grid(seed, LevelConfig::new(1, 100_000, 20, 4), grid);
            game.grid_mut().set_special(Pos::new(1, 2), SpecialKind::RowClear);
            game.grid_mut().set_special(Pos::new(5, 2), SpecialKind::Rainbow);
            let color = game.rng.clone().next_color(RAINBOW_TRIGGER_COLORS);
            let off_row = game
                .grid()
                .tiles()
                .filter(|t| t.color == color && t.pos.row != 2)
                .count();
            any_hit |= off_row > 0;

            let id = game.grid().at(Pos::new(1, 2)).unwrap();
            game.begin_cycle(MatchSet::from([id]));

            for tile in game.grid().tiles().filter(|t| t.color == color) {
                assert!(tile.matched, "seed {}: {:?} at {:?}", seed, color, tile.pos);
            }
            assert_eq!(game.grid().matched_count(), GRID_COLS as usize + off_row);
            let blasted = (7 + off_row) as u32;
            assert_eq!(game.score(), 11 + blasted * BLAST_TILE_SCORE);
        }
        assert!(any_hit, "no seed drew a color present on the board");
    }
}
