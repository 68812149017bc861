//! Grid module - the tile registry and the cell index into it
//!
//! The grid is an 8x8 flat array of optional tile ids (row-major, `row * COLS + col`)
//! backed by a registry of tile records keyed by id. Every tile stores its own
//! `(col, row)`; the two representations must always agree, so every coordinate
//! mutation (swap, gravity, reshuffle) goes through this module.
//!
//! Out-of-bounds positions are a caller contract violation; public accessors
//! answer `None`/`false` for them instead of panicking.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::{Color, Pos, SpecialKind, TileId, GRID_CELLS, GRID_COLS, GRID_ROWS};

/// A single gem on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub pos: Pos,
    pub color: Color,
    pub special: SpecialKind,
    /// Pending removal in the current resolution cycle
    pub matched: bool,
}

impl Tile {
    pub fn is_special(&self) -> bool {
        self.special.is_special()
    }
}

/// Grid/state store: cell index plus tile registry
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: [Option<TileId>; GRID_CELLS],
    tiles: BTreeMap<TileId, Tile>,
    next_id: u32,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_CELLS],
            tiles: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn cols(&self) -> u8 {
        GRID_COLS
    }

    pub fn rows(&self) -> u8 {
        GRID_ROWS
    }

    /// Tile id occupying `pos`, if any
    pub fn at(&self, pos: Pos) -> Option<TileId> {
        if !pos.in_bounds() {
            return None;
        }
        self.cells[pos.index()]
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&Tile> {
        self.at(pos).and_then(|id| self.tiles.get(&id))
    }

    /// Number of tiles in the registry
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Every cell holds a tile
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Tiles in id order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Next id that `spawn` will hand out
    pub fn next_id(&self) -> TileId {
        TileId(self.next_id)
    }

    /// Create a tile at an empty cell and return its id
    pub fn spawn(&mut self, pos: Pos, color: Color, special: SpecialKind) -> Option<TileId> {
        if !pos.in_bounds() || self.cells[pos.index()].is_some() {
            return None;
        }
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.tiles.insert(
            id,
            Tile {
                id,
                pos,
                color,
                special,
                matched: false,
            },
        );
        self.cells[pos.index()] = Some(id);
        Some(id)
    }

    /// Move a tile to an empty cell, updating the cell index and the tile together
    pub fn place(&mut self, id: TileId, pos: Pos) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        if matches!(self.cells[pos.index()], Some(other) if other != id) {
            return false;
        }
        let Some(tile) = self.tiles.get_mut(&id) else {
            return false;
        };
        let old = tile.pos;
        if self.cells[old.index()] == Some(id) {
            self.cells[old.index()] = None;
        }
        tile.pos = pos;
        self.cells[pos.index()] = Some(id);
        true
    }

    /// Clear the tile's cell and delete its record
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.tiles.remove(&id)?;
        let idx = tile.pos.index();
        debug_assert_eq!(self.cells[idx], Some(id), "tile {:?} not at its cell", id);
        if self.cells[idx] == Some(id) {
            self.cells[idx] = None;
        }
        Some(tile)
    }

    /// Exchange the occupants of two cells; both must be occupied
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        if a == b {
            return false;
        }
        let (Some(id_a), Some(id_b)) = (self.at(a), self.at(b)) else {
            return false;
        };
        self.cells[a.index()] = Some(id_b);
        self.cells[b.index()] = Some(id_a);
        if let Some(t) = self.tiles.get_mut(&id_a) {
            t.pos = b;
        }
        if let Some(t) = self.tiles.get_mut(&id_b) {
            t.pos = a;
        }
        true
    }

    /// Mark a tile as pending removal
    ///
    /// Returns true only when the tile was not already matched.
    pub fn set_matched(&mut self, id: TileId) -> bool {
        match self.tiles.get_mut(&id) {
            Some(t) if !t.matched => {
                t.matched = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_matched(&self, id: TileId) -> bool {
        self.tiles.get(&id).is_some_and(|t| t.matched)
    }

    pub fn matched_count(&self) -> usize {
        self.tiles.values().filter(|t| t.matched).count()
    }

    /// Recolor a tile in place
    pub fn set_color(&mut self, id: TileId, color: Color) -> bool {
        match self.tiles.get_mut(&id) {
            Some(t) => {
                t.color = color;
                true
            }
            None => false,
        }
    }

    /// Give the tile at `pos` a special kind; rainbow tiles turn white
    pub fn set_special(&mut self, pos: Pos, special: SpecialKind) -> bool {
        let Some(id) = self.at(pos) else {
            return false;
        };
        let Some(t) = self.tiles.get_mut(&id) else {
            return false;
        };
        t.special = special;
        if special == SpecialKind::Rainbow {
            t.color = Color::White;
        }
        true
    }

    /// Remove every matched tile, returning the removed records in id order
    pub fn remove_matched(&mut self) -> Vec<Tile> {
        let ids: Vec<TileId> = self
            .tiles
            .values()
            .filter(|t| t.matched)
            .map(|t| t.id)
            .collect();
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// One gravity pass: every tile with an empty cell below drops one row
    ///
    /// Scans each column bottom-up, so a whole stack above a gap shifts in a
    /// single pass. Returns true if anything moved.
    pub fn gravity_step(&mut self) -> bool {
        let mut moved = false;
        for col in 0..GRID_COLS {
            for row in (1..GRID_ROWS).rev() {
                let below = Pos::new(col, row);
                let above = Pos::new(col, row - 1);
                if self.cells[below.index()].is_none() {
                    if let Some(id) = self.cells[above.index()] {
                        self.place(id, below);
                        moved = true;
                    }
                }
            }
        }
        moved
    }

    /// Empty cells in the top row, left to right
    pub fn empty_top_cells(&self) -> ArrayVec<Pos, { GRID_COLS as usize }> {
        (0..GRID_COLS)
            .map(|col| Pos::new(col, 0))
            .filter(|p| self.cells[p.index()].is_none())
            .collect()
    }

    /// Randomly permute the positions of all tiles (colors and specials unchanged)
    pub fn permute(&mut self, rng: &mut SimpleRng) {
        let ids: Vec<TileId> = self.tiles.keys().copied().collect();
        let mut positions: Vec<Pos> = ids.iter().map(|id| self.tiles[id].pos).collect();
        rng.shuffle(&mut positions);

        self.cells = [None; GRID_CELLS];
        for (id, pos) in ids.into_iter().zip(positions) {
            if let Some(t) = self.tiles.get_mut(&id) {
                t.pos = pos;
            }
            self.cells[pos.index()] = Some(id);
        }
    }

    /// Drop every tile (ids keep increasing)
    pub fn clear(&mut self) {
        self.cells = [None; GRID_CELLS];
        self.tiles.clear();
    }

    /// Ids of every tile with the given color, in id order
    pub fn ids_with_color(&self, color: Color) -> Vec<TileId> {
        self.tiles
            .values()
            .filter(|t| t.color == color)
            .map(|t| t.id)
            .collect()
    }

    /// Check the bookkeeping invariant
    ///
    /// Every occupied cell refers to a registered tile whose stored position is
    /// that cell, and every registered tile occupies exactly its own cell.
    pub fn is_consistent(&self) -> bool {
        let mut occupied = 0usize;
        for (idx, cell) in self.cells.iter().enumerate() {
            if let Some(id) = cell {
                occupied += 1;
                match self.tiles.get(id) {
                    Some(t) if t.pos.index() == idx => {}
                    _ => return false,
                }
            }
        }
        occupied == self.tiles.len()
            && self
                .tiles
                .values()
                .all(|t| t.pos.in_bounds() && self.cells[t.pos.index()] == Some(t.id))
    }

    /// Build a grid from text rows, top row first
    ///
    /// Each row has one character per column: a color letter (`R O Y G B P W`,
    /// case-insensitive) or `.` for an empty cell. Specials are added afterwards
    /// with [`Grid::set_special`].
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_cascade_core::Grid;
    /// use gem_cascade_core::types::{Color, Pos};
    ///
    /// let grid = Grid::from_layout(&[
    ///     "RGBYRGBY",
    ///     "BYRGBYRG",
    ///     "RGBYRGBY",
    ///     "BYRGBYRG",
    ///     "RGBYRGBY",
    ///     "BYRGBYRG",
    ///     "RGBYRGBY",
    ///     "BYRGBYR.",
    /// ])
    /// .unwrap();
    /// assert_eq!(grid.tile_at(Pos::new(1, 0)).unwrap().color, Color::Green);
    /// assert!(grid.at(Pos::new(7, 7)).is_none());
    /// assert_eq!(grid.len(), 63);
    /// ```
    pub fn from_layout(rows: &[&str]) -> Option<Self> {
        if rows.len() != GRID_ROWS as usize {
            return None;
        }
        let mut grid = Self::new();
        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != GRID_COLS as usize {
                return None;
            }
            for (col, ch) in chars.into_iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                let color = Color::from_char(ch)?;
                grid.spawn(Pos::new(col as u8, row as u8), color, SpecialKind::None)?;
            }
        }
        Some(grid)
    }

    /// Render as text rows (inverse of [`Grid::from_layout`])
    pub fn to_layout(&self) -> Vec<String> {
        (0..GRID_ROWS)
            .map(|row| {
                (0..GRID_COLS)
                    .map(|col| {
                        self.tile_at(Pos::new(col, row))
                            .map_or('.', |t| t.color.as_char())
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// In-bounds 4-neighbors of a cell (up, down, left, right)
pub fn neighbors(pos: Pos) -> ArrayVec<Pos, 4> {
    [(0, -1), (0, 1), (-1, 0), (1, 0)]
        .into_iter()
        .filter_map(|(dc, dr)| pos.offset(dc, dr))
        .collect()
}

/// In-bounds 3x3 neighborhood centered on a cell (including the cell)
pub fn neighborhood(pos: Pos) -> ArrayVec<Pos, 9> {
    let mut out = ArrayVec::new();
    for dr in -1..=1 {
        for dc in -1..=1 {
            if let Some(p) = pos.offset(dc, dr) {
                out.push(p);
            }
        }
    }
    out
}
