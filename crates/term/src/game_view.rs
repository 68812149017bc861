//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Phase, TileView};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::hud::ScoreGain;
use crate::types::{Color, Outcome, Pos, SpecialKind, TextTier, GRID_COLS, GRID_ROWS};

const BOARD_BG: Rgb = Rgb::new(24, 24, 34);
const PANEL_W: u16 = 18;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Front-end state drawn on top of the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    pub cursor: Option<Pos>,
    pub selected: Option<Pos>,
    pub message: Option<&'a str>,
    pub gain: Option<ScoreGain>,
    /// Horizontal board offset (screen shake)
    pub shake: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the gem board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 3x1: room for a cursor bracket on each side of the glyph.
        Self {
            cell_w: 3,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Board frame size including the border.
    pub fn frame_size(&self) -> (u16, u16) {
        (
            GRID_COLS as u16 * self.cell_w + 2,
            GRID_ROWS as u16 * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let total_w = frame_w + 2 + PANEL_W;
        let start_x = viewport.width.saturating_sub(total_w) / 2 + overlay.shake;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h + 2) / 2,
            AnchorY::Top => 0,
        };

        let board_style = CellStyle::fg(Rgb::new(70, 70, 85)).on(BOARD_BG);
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            board_style,
        );
        let border = if snap.busy() {
            CellStyle::fg(Rgb::new(120, 120, 140))
        } else {
            CellStyle::fg(Rgb::new(210, 210, 210))
        };
        fb.draw_box(start_x, start_y, frame_w, frame_h, border);

        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let pos = Pos::new(col, row);
                match snap.tile_at(pos) {
                    Some(tile) => self.draw_tile(fb, start_x, start_y, tile, overlay),
                    None => self.fill_cell(fb, start_x, start_y, pos, '·', board_style.dim()),
                }
            }
        }

        if let Some(cursor) = overlay.cursor {
            self.draw_cursor(fb, start_x, start_y, cursor);
        }

        self.draw_side_panel(fb, snap, overlay, viewport, start_x + frame_w + 2, start_y);

        let msg_y = start_y + frame_h;
        let msg_style = CellStyle::fg(Rgb::new(255, 230, 120)).bold();
        match snap.outcome {
            Some(Outcome::Won) => {
                self.draw_banner(fb, start_x, start_y, frame_w, frame_h, "LEVEL COMPLETE")
            }
            Some(Outcome::Lost) => {
                self.draw_banner(fb, start_x, start_y, frame_w, frame_h, "OUT OF MOVES")
            }
            None => {}
        }
        if let Some(msg) = overlay.message {
            fb.put_centered(start_x, frame_w, msg_y, msg, msg_style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn cell_origin(&self, start_x: u16, start_y: u16, pos: Pos) -> (u16, u16) {
        (
            start_x + 1 + pos.col as u16 * self.cell_w,
            start_y + 1 + pos.row as u16 * self.cell_h,
        )
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        pos: Pos,
        ch: char,
        style: CellStyle,
    ) {
        let (px, py) = self.cell_origin(start_x, start_y, pos);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, ch, style);
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        tile: &TileView,
        overlay: &Overlay<'_>,
    ) {
        let mut style = CellStyle::fg(color_rgb(tile.color)).on(BOARD_BG);
        if tile.special.is_special() {
            style = style.bold();
        }
        let ch = if tile.matched {
            style = style.dim();
            '✶'
        } else {
            glyph(tile.special)
        };
        if overlay.selected == Some(tile.pos) {
            style = style.reverse();
        }
        self.fill_cell(fb, start_x, start_y, tile.pos, ch, style);
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, pos: Pos) {
        if self.cell_w < 3 {
            return;
        }
        let (px, py) = self.cell_origin(start_x, start_y, pos);
        let y = py + self.cell_h / 2;
        let style = CellStyle::fg(Rgb::new(255, 255, 255)).on(BOARD_BG).bold();
        fb.put_char(px, y, '[', style);
        fb.put_char(px + self.cell_w - 1, y, ']', style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::fg(Rgb::new(200, 200, 200));

        let mut y = start_y;
        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_u32(panel_x + 8, y, snap.level, value);
        y += 2;

        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        let x = fb.put_u32(panel_x, y, snap.score, value);
        let x = fb.put_str(x, y, " / ", value.dim());
        fb.put_u32(x, y, snap.target_score, value.dim());
        if let Some(gain) = overlay.gain {
            y += 1;
            let style = match gain.tier {
                TextTier::Normal => CellStyle::fg(Rgb::new(160, 230, 160)),
                TextTier::Combo => CellStyle::fg(Rgb::new(255, 210, 90)).bold(),
                TextTier::Critical => CellStyle::fg(Rgb::new(255, 110, 90)).bold(),
            };
            let x = fb.put_str(panel_x, y, "+", style);
            fb.put_u32(x, y, gain.amount, style);
        }
        y += 2;

        fb.put_str(panel_x, y, "MOVES", label);
        fb.put_u32(panel_x + 8, y, snap.moves_left, value);
        y += 1;
        fb.put_str(panel_x, y, "COMBO", label);
        if snap.combo > 0 {
            let x = fb.put_str(panel_x + 8, y, "x", value);
            fb.put_u32(x, y, snap.combo, value);
        } else {
            fb.put_str(panel_x + 8, y, "-", value.dim());
        }
        y += 2;

        fb.put_str(panel_x, y, "BOMBS", label);
        fb.put_u32(panel_x + 8, y, snap.items.bombs as u32, value);
        y += 1;
        fb.put_str(panel_x, y, "SHUFFLE", label);
        fb.put_u32(panel_x + 8, y, snap.items.reshuffles as u32, value);
        y += 2;

        let phase = match snap.phase {
            Phase::Idle => "ready",
            Phase::Reshuffling => "shuffling",
            _ => "resolving",
        };
        fb.put_str(panel_x, y, phase, value.dim());
        if snap.cascade_depth > 1 {
            let x = fb.put_str(panel_x + 10, y, "chain ", value.dim());
            fb.put_u32(x, y, snap.cascade_depth, value.dim());
        }
    }

    fn draw_banner(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let style = CellStyle::fg(Rgb::new(255, 255, 255))
            .on(Rgb::new(60, 40, 90))
            .bold();
        let y = start_y + frame_h / 2;
        fb.fill_rect(start_x + 1, y, frame_w - 2, 1, ' ', style);
        fb.put_centered(start_x, frame_w, y, text, style);
    }
}

/// Glyph for a live tile
pub fn glyph(special: SpecialKind) -> char {
    match special {
        SpecialKind::None => '●',
        SpecialKind::RowClear => '═',
        SpecialKind::ColClear => '║',
        SpecialKind::AreaBlast => '✸',
        SpecialKind::Rainbow => '◆',
    }
}

pub fn color_rgb(color: Color) -> Rgb {
    match color {
        Color::Red => Rgb::new(235, 80, 80),
        Color::Orange => Rgb::new(255, 160, 60),
        Color::Yellow => Rgb::new(240, 220, 80),
        Color::Green => Rgb::new(100, 210, 110),
        Color::Blue => Rgb::new(80, 140, 240),
        Color::Purple => Rgb::new(190, 110, 230),
        Color::White => Rgb::new(250, 250, 250),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_are_distinct() {
        let kinds = [
            SpecialKind::None,
            SpecialKind::RowClear,
            SpecialKind::ColClear,
            SpecialKind::AreaBlast,
            SpecialKind::Rainbow,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(glyph(*a), glyph(*b));
            }
        }
    }

    #[test]
    fn frame_size_matches_cell_geometry() {
        assert_eq!(GameView::default().frame_size(), (26, 10));
        assert_eq!(GameView::new(2, 1).frame_size(), (18, 10));
    }

    #[test]
    fn empty_snapshot_renders_border() {
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let fb = view.render(
            &GameSnapshot::default(),
            &Overlay::default(),
            Viewport::new(60, 14),
        );
        let top = fb.row_text(0);
        assert!(top.contains('┌'));
        assert!(top.contains("LEVEL"));
    }
}
