//! Cursor and selection handling.
//!
//! A terminal has no pointer, so swaps are made in two steps: select a tile,
//! then select an adjacent one. Selecting anything else moves the selection.

use crate::map::UiAction;
use crate::types::{Intent, ItemKind, Pos, GRID_COLS, GRID_ROWS};

/// What the front-end should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward to the engine
    Intent(Intent),
    Restart,
    NextLevel,
}

/// Tracks the cursor and the currently selected tile.
#[derive(Debug, Clone)]
pub struct InputHandler {
    cursor: Pos,
    selected: Option<Pos>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            cursor: Pos::new(GRID_COLS / 2, GRID_ROWS / 2),
            selected: None,
        }
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    /// Drop the selection (e.g. after a level change)
    pub fn reset(&mut self) {
        self.selected = None;
    }

    /// Apply an action; returns a command when one is ready.
    pub fn handle(&mut self, action: UiAction) -> Option<Command> {
        match action {
            UiAction::Move(dir) => {
                let (dc, dr) = dir.delta();
                if let Some(next) = self.cursor.offset(dc, dr) {
                    self.cursor = next;
                }
                None
            }
            UiAction::Select => self.select(),
            UiAction::Activate => {
                self.selected = None;
                Some(Command::Intent(Intent::Activate { at: self.cursor }))
            }
            UiAction::Bomb => {
                self.selected = None;
                Some(Command::Intent(Intent::UseItem {
                    item: ItemKind::Bomb,
                    target: Some(self.cursor),
                }))
            }
            UiAction::Reshuffle => {
                self.selected = None;
                Some(Command::Intent(Intent::UseItem {
                    item: ItemKind::Reshuffle,
                    target: None,
                }))
            }
            UiAction::Restart => {
                self.selected = None;
                Some(Command::Restart)
            }
            UiAction::NextLevel => {
                self.selected = None;
                Some(Command::NextLevel)
            }
        }
    }

    fn select(&mut self) -> Option<Command> {
        match self.selected {
            None => {
                self.selected = Some(self.cursor);
                None
            }
            Some(sel) if sel == self.cursor => {
                self.selected = None;
                None
            }
            Some(sel) if sel.is_adjacent(self.cursor) => {
                self.selected = None;
                Some(Command::Intent(Intent::Swap {
                    a: sel,
                    b: self.cursor,
                }))
            }
            Some(_) => {
                self.selected = Some(self.cursor);
                None
            }
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Direction;

    #[test]
    fn test_cursor_clamped_to_grid() {
        let mut h = InputHandler::new();
        for _ in 0..20 {
            h.handle(UiAction::Move(Direction::Left));
            h.handle(UiAction::Move(Direction::Up));
        }
        assert_eq!(h.cursor(), Pos::new(0, 0));
        for _ in 0..20 {
            h.handle(UiAction::Move(Direction::Right));
            h.handle(UiAction::Move(Direction::Down));
        }
        assert_eq!(h.cursor(), Pos::new(GRID_COLS - 1, GRID_ROWS - 1));
    }

    #[test]
    fn test_select_then_adjacent_swaps() {
        let mut h = InputHandler::new();
        let start = h.cursor();
        assert_eq!(h.handle(UiAction::Select), None);
        assert_eq!(h.selected(), Some(start));
        h.handle(UiAction::Move(Direction::Right));
        let cmd = h.handle(UiAction::Select);
        assert_eq!(
            cmd,
            Some(Command::Intent(Intent::Swap {
                a: start,
                b: Pos::new(start.col + 1, start.row),
            }))
        );
        assert_eq!(h.selected(), None);
    }

    #[test]
    fn test_select_same_cell_toggles() {
        let mut h = InputHandler::new();
        h.handle(UiAction::Select);
        h.handle(UiAction::Select);
        assert_eq!(h.selected(), None);
    }

    #[test]
    fn test_select_far_cell_moves_selection() {
        let mut h = InputHandler::new();
        h.handle(UiAction::Select);
        h.handle(UiAction::Move(Direction::Right));
        h.handle(UiAction::Move(Direction::Right));
        assert_eq!(h.handle(UiAction::Select), None);
        assert_eq!(h.selected(), Some(h.cursor()));
    }

    #[test]
    fn test_item_commands_target_cursor() {
        let mut h = InputHandler::new();
        let at = h.cursor();
        assert_eq!(
            h.handle(UiAction::Bomb),
            Some(Command::Intent(Intent::UseItem {
                item: ItemKind::Bomb,
                target: Some(at),
            }))
        );
        assert_eq!(
            h.handle(UiAction::Activate),
            Some(Command::Intent(Intent::Activate { at }))
        );
        assert_eq!(h.handle(UiAction::NextLevel), Some(Command::NextLevel));
    }
}
