//! Swap validation and special swap combos
//!
//! A swap is applied to the grid immediately and validated once the swap delay
//! has elapsed. It commits when it forms a run or pairs up specials:
//!
//! - rainbow + rainbow: every tile on the board is flagged
//! - rainbow + plain tile: every tile of the partner's color is flagged
//! - any other special pair: both are triggered
//!
//! Anything else is swapped back and costs nothing.

use tracing::{debug, instrument};

use crate::game_state::{GameState, Phase};
use crate::grid::Tile;
use crate::matcher::find_matches;
use crate::types::{
    Callout, Color, Effect, Pos, SoundCue, SpecialKind, TextTier, TileId, FULL_CLEAR_TILE_SCORE,
    RAINBOW_TILE_SCORE, SWAP_DELAY_MS,
};

/// Whether swapping these two tiles commits without forming a run
pub fn is_swap_combo(a: &Tile, b: &Tile) -> bool {
    (a.is_special() && b.is_special())
        || a.special == SpecialKind::Rainbow
        || b.special == SpecialKind::Rainbow
}

impl GameState {
    /// Exchange two adjacent tiles and start validation
    #[instrument(skip(self))]
    pub fn request_swap(&mut self, a: Pos, b: Pos) -> bool {
        if !self.accepts_input() || self.moves_left == 0 {
            return false;
        }
        if !a.in_bounds() || !b.in_bounds() || !a.is_adjacent(b) {
            return false;
        }
        if !self.grid.swap(a, b) {
            return false;
        }
        self.emit(Effect::Sound(SoundCue::Swap));
        self.enter(Phase::Swapping { a, b }, SWAP_DELAY_MS);
        true
    }

    /// Swap delay elapsed: commit or revert
    pub(crate) fn finish_swap(&mut self, a: Pos, b: Pos) {
        // The tile that started at `a` now sits at `b`
        let (Some(first), Some(second)) =
            (self.grid.tile_at(b).copied(), self.grid.tile_at(a).copied())
        else {
            self.enter(Phase::Idle, 0);
            return;
        };

        let matches = find_matches(&self.grid);
        let combo = is_swap_combo(&first, &second);

        if matches.is_empty() && !combo {
            self.grid.swap(a, b);
            self.emit(Effect::Sound(SoundCue::Invalid));
            debug!("swap reverted");
            self.enter(Phase::Idle, 0);
            return;
        }

        self.moves_left = self.moves_left.saturating_sub(1);
        debug!(moves_left = self.moves_left, combo, tiles = matches.len(), "swap committed");
        if combo {
            self.swap_combo(first, second);
        }
        self.begin_cycle(matches);
    }

    fn swap_combo(&mut self, first: Tile, second: Tile) {
        for tile in [first, second] {
            if self.grid.set_matched(tile.id) {
                self.burst(tile.id);
            }
        }

        let (rainbow, partner) = match (first.special, second.special) {
            (SpecialKind::Rainbow, _) => (first, second),
            (_, SpecialKind::Rainbow) => (second, first),
            _ => {
                self.trigger_chain(vec![first.id, second.id]);
                return;
            }
        };

        if partner.special == SpecialKind::Rainbow {
            self.emit(Effect::Sound(SoundCue::Explosion));
            self.clear_board();
        } else if !partner.is_special() {
            self.emit(Effect::Sound(SoundCue::Explosion));
            self.clear_color(rainbow, partner);
        } else {
            // Both fire on their own; each trigger plays its own explosion
            self.trigger_chain(vec![first.id, second.id]);
        }
    }

    /// Rainbow + rainbow: flag every tile on the board
    fn clear_board(&mut self) {
        let ids: Vec<TileId> = self.grid.tiles().map(|t| t.id).collect();
        for &id in &ids {
            if self.grid.set_matched(id) {
                self.burst(id);
            }
        }
        let points = (ids.len() as u32).saturating_mul(FULL_CLEAR_TILE_SCORE);
        self.score = self.score.saturating_add(points);
        self.emit(Effect::Callout {
            at: None,
            callout: Callout::MaxClear,
        });
        debug!(tiles = ids.len(), points, "board cleared");
    }

    /// Rainbow + plain tile: flag every tile of the partner's color
    fn clear_color(&mut self, rainbow: Tile, partner: Tile) {
        let color: Color = partner.color;
        let ids = self.grid.ids_with_color(color);
        let mut chain = Vec::new();
        for &id in &ids {
            if self.grid.set_matched(id) {
                self.burst(id);
            }
            if id != rainbow.id
                && id != partner.id
                && self.grid.tile(id).is_some_and(Tile::is_special)
            {
                chain.push(id);
            }
        }
        self.trigger_chain(chain);

        let points = (ids.len() as u32).saturating_mul(RAINBOW_TILE_SCORE);
        self.score = self.score.saturating_add(points);
        self.emit(Effect::ScoreText {
            at: partner.pos,
            amount: points,
            tier: TextTier::Critical,
        });
        debug!(?color, tiles = ids.len(), points, "color cleared");
    }
}
