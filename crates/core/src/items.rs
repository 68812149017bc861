//! Consumable items
//!
//! Items cost a charge instead of a move and are only usable while idle.
//! The bomb jumps straight to the pop step of the pipeline; the reshuffle
//! permutes the board and locks input briefly.

use tracing::{debug, instrument};

use crate::game_state::{GameState, Phase};
use crate::grid::{neighborhood, Tile};
use crate::types::{
    Callout, Effect, ItemKind, Pos, SoundCue, BOMB_TILE_SCORE, POP_DELAY_MS,
};

/// Shake strength of a bomb blast
const BOMB_SHAKE: u8 = 20;

impl GameState {
    pub fn use_item(&mut self, item: ItemKind, target: Option<Pos>) -> bool {
        match item {
            ItemKind::Bomb => target.is_some_and(|pos| self.use_bomb(pos)),
            ItemKind::Reshuffle => self.use_reshuffle(),
        }
    }

    /// Flag the 3x3 around `target` and detonate any specials inside it
    #[instrument(skip(self))]
    pub fn use_bomb(&mut self, target: Pos) -> bool {
        if !self.accepts_input() || self.items.bombs == 0 {
            return false;
        }
        if self.grid.at(target).is_none() {
            return false;
        }
        self.items.bombs -= 1;
        self.emit(Effect::Sound(SoundCue::Explosion));

        let mut flagged = 0u32;
        let mut specials = Vec::new();
        for pos in neighborhood(target) {
            let Some(id) = self.grid.at(pos) else {
                continue;
            };
            if self.grid.set_matched(id) {
                flagged += 1;
                self.burst(id);
            }
            if self.grid.tile(id).is_some_and(Tile::is_special) {
                specials.push(id);
            }
        }
        self.score = self.score.saturating_add(flagged * BOMB_TILE_SCORE);
        self.trigger_chain(specials);

        self.emit(Effect::Shake {
            intensity: BOMB_SHAKE,
        });
        self.emit(Effect::Callout {
            at: Some(target),
            callout: Callout::Boom,
        });
        debug!(flagged, bombs_left = self.items.bombs, "bomb used");
        self.enter(Phase::Popping, POP_DELAY_MS);
        true
    }

    /// Permute every tile position
    #[instrument(skip(self))]
    pub fn use_reshuffle(&mut self) -> bool {
        if !self.accepts_input() || self.items.reshuffles == 0 {
            return false;
        }
        self.items.reshuffles -= 1;
        debug!(reshuffles_left = self.items.reshuffles, "reshuffle used");
        self.reshuffle_board();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::types::{
        GameEvent, EngineEvent, LevelConfig, SpecialKind, BLAST_TILE_SCORE, DEFAULT_BOMBS,
        TICK_MS,
    };

    fn checker_game() -> GameState {
        let grid = Grid::from_layout(&[
            "RGBYRGBY", "BYRGBYRG", "RGBYRGBY", "BYRGBYRG", "RGBYRGBY", "BYRGBYRG", "RGBYRGBY",
            "BYRGBYRG",
        ])
        .unwrap();
        GameState::from_grid(5, LevelConfig::new(1, 100_000, 20, 4), grid)
    }

    #[test]
    fn test_bomb_flags_neighborhood_and_scores() {
        let mut game = checker_game();
        assert!(game.use_item(ItemKind::Bomb, Some(Pos::new(4, 4))));
        assert_eq!(game.items().bombs, DEFAULT_BOMBS - 1);
        assert_eq!(game.grid().matched_count(), 9);
        assert_eq!(game.score(), 9 * BOMB_TILE_SCORE);
        assert_eq!(game.phase(), Phase::Popping);
        assert_eq!(game.moves_left(), 20);
        assert_eq!(game.combo(), 0);
    }

    #[test]
    fn test_bomb_on_corner_is_clipped() {
        let mut game = checker_game();
        assert!(game.use_bomb(Pos::new(7, 0)));
        assert_eq!(game.grid().matched_count(), 4);
    }

    #[test]
    fn test_bomb_detonates_specials_inside() {
        let mut game = checker_game();
        game.grid_mut().set_special(Pos::new(4, 4), SpecialKind::RowClear);
        assert!(game.use_bomb(Pos::new(4, 4)));
        // 3x3 plus the rest of row 4
        assert_eq!(game.grid().matched_count(), 9 + 5);
        assert_eq!(game.score(), 9 * BOMB_TILE_SCORE + 5 * BLAST_TILE_SCORE);
    }

    #[test]
    fn test_bomb_needs_target_and_charge() {
        let mut game = checker_game();
        assert!(!game.use_item(ItemKind::Bomb, None));
        game.items.bombs = 0;
        assert!(!game.use_bomb(Pos::new(1, 1)));
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_items_rejected_while_busy() {
        let mut game = checker_game();
        assert!(game.use_bomb(Pos::new(2, 2)));
        assert!(!game.use_reshuffle());
        assert!(!game.use_bomb(Pos::new(5, 5)));
        assert_eq!(game.items().bombs, DEFAULT_BOMBS - 1);
    }

    #[test]
    fn test_reshuffle_keeps_tiles_and_locks_input() {
        let mut game = checker_game();
        let mut before: Vec<_> = game.grid().tiles().map(|t| (t.id, t.color)).collect();
        assert!(game.use_reshuffle());
        assert_eq!(game.phase(), Phase::Reshuffling);
        assert!(game
            .pending_events()
            .contains(&EngineEvent::Game(GameEvent::Reshuffle)));

        let mut after: Vec<_> = game.grid().tiles().map(|t| (t.id, t.color)).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(game.grid().is_consistent());

        game.tick(TICK_MS);
        assert!(!game.use_reshuffle());
        game.settle();
        assert!(game.use_reshuffle());
        assert_eq!(game.items().reshuffles, 1);
    }
}
