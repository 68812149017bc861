//! Match detection and grouping
//!
//! Detection scans every row and column for straight runs of at least
//! [`MIN_RUN`] same-colored tiles. Horizontal and vertical results are unioned
//! into one id set; a run longer than three contributes every member.
//! Empty cells and wildcard (white) tiles never extend or start a run.
//!
//! Grouping then labels 4-connected components of the matched set so that
//! two separate 3-runs can be told apart from a single L-shaped 5-run.

use std::collections::{BTreeSet, VecDeque};

use crate::grid::{neighbors, Grid, Tile};
use crate::types::{Color, Pos, TileId, GRID_CELLS, GRID_COLS, GRID_ROWS, MIN_RUN};

/// Ids of matched tiles, in id order
pub type MatchSet = BTreeSet<TileId>;

/// A connected shape of matched tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    /// Member tiles sorted top-to-bottom, then left-to-right
    pub members: Vec<Tile>,
}

impl MatchGroup {
    fn new(mut members: Vec<Tile>) -> Self {
        members.sort_by_key(|t| (t.pos.row, t.pos.col));
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn single_row(&self) -> bool {
        self.members
            .first()
            .is_some_and(|f| self.members.iter().all(|t| t.pos.row == f.pos.row))
    }

    pub fn single_col(&self) -> bool {
        self.members
            .first()
            .is_some_and(|f| self.members.iter().all(|t| t.pos.col == f.pos.col))
    }

    /// All members share one row or one column
    pub fn is_line(&self) -> bool {
        self.single_row() || self.single_col()
    }

    /// Middle member in sorted order (index `len / 2`)
    pub fn midpoint(&self) -> Option<&Tile> {
        self.members.get(self.members.len() / 2)
    }

    /// First member that shares a row with one member and a column with another
    pub fn corner(&self) -> Option<&Tile> {
        self.members.iter().find(|t| {
            let same_row = self
                .members
                .iter()
                .any(|o| o.pos.row == t.pos.row && o.pos.col != t.pos.col);
            let same_col = self
                .members
                .iter()
                .any(|o| o.pos.col == t.pos.col && o.pos.row != t.pos.row);
            same_row && same_col
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.members.iter().map(|t| t.id)
    }
}

/// Find every tile that belongs to a run of [`MIN_RUN`] or more
pub fn find_matches(grid: &Grid) -> MatchSet {
    let mut matched = MatchSet::new();

    for row in 0..GRID_ROWS {
        let line: Vec<Pos> = (0..GRID_COLS).map(|col| Pos::new(col, row)).collect();
        collect_runs(grid, &line, &mut matched);
    }
    for col in 0..GRID_COLS {
        let line: Vec<Pos> = (0..GRID_ROWS).map(|row| Pos::new(col, row)).collect();
        collect_runs(grid, &line, &mut matched);
    }

    matched
}

/// Scan one line of cells and add every run member to `out`
fn collect_runs(grid: &Grid, line: &[Pos], out: &mut MatchSet) {
    let mut start = 0usize;
    while start < line.len() {
        let Some(color) = run_color(grid, line[start]) else {
            start += 1;
            continue;
        };
        let mut end = start + 1;
        while end < line.len() && run_color(grid, line[end]) == Some(color) {
            end += 1;
        }
        if end - start >= MIN_RUN {
            out.extend(line[start..end].iter().filter_map(|&p| grid.at(p)));
        }
        start = end;
    }
}

/// Color that can take part in a run; empty cells and wildcards yield `None`
fn run_color(grid: &Grid, pos: Pos) -> Option<Color> {
    grid.tile_at(pos)
        .map(|t| t.color)
        .filter(|c| !c.is_wildcard())
}

/// Split a matched set into 4-connected groups
///
/// Groups come out in order of their smallest member id.
pub fn group_matches(grid: &Grid, matched: &MatchSet) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    let mut visited: BTreeSet<TileId> = BTreeSet::new();

    for &seed in matched {
        if !visited.insert(seed) {
            continue;
        }
        let mut members = Vec::new();
        let mut queue = VecDeque::from([seed]);

        while let Some(id) = queue.pop_front() {
            let Some(tile) = grid.tile(id) else {
                continue;
            };
            members.push(*tile);
            for n in neighbors(tile.pos) {
                if let Some(nid) = grid.at(n) {
                    if matched.contains(&nid) && visited.insert(nid) {
                        queue.push_back(nid);
                    }
                }
            }
        }

        if !members.is_empty() {
            groups.push(MatchGroup::new(members));
        }
    }

    groups
}

/// Per-cell run colors with empty and wildcard cells as `None`
pub(crate) fn color_map(grid: &Grid) -> [Option<Color>; GRID_CELLS] {
    let mut colors = [None; GRID_CELLS];
    for tile in grid.tiles() {
        if !tile.color.is_wildcard() {
            colors[tile.pos.index()] = Some(tile.color);
        }
    }
    colors
}

/// Whether a run of [`MIN_RUN`] passes through `pos` in the given color map
pub(crate) fn has_run_through(colors: &[Option<Color>; GRID_CELLS], pos: Pos) -> bool {
    let Some(color) = colors[pos.index()] else {
        return false;
    };
    let reach = |dc: i8, dr: i8| {
        let mut n = 0usize;
        let mut p = pos;
        while let Some(next) = p.offset(dc, dr) {
            if colors[next.index()] != Some(color) {
                break;
            }
            n += 1;
            p = next;
        }
        n
    };
    1 + reach(-1, 0) + reach(1, 0) >= MIN_RUN || 1 + reach(0, -1) + reach(0, 1) >= MIN_RUN
}

/// Whether swapping the tiles at `a` and `b` would produce a run
///
/// Works on a copy of the color map; the grid is not touched.
pub fn swap_creates_run(grid: &Grid, a: Pos, b: Pos) -> bool {
    let mut colors = color_map(grid);
    colors.swap(a.index(), b.index());
    has_run_through(&colors, a) || has_run_through(&colors, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpecialKind;

    const CHECKER: [&str; 8] = [
        "RGBYRGBY", "BYRGBYRG", "RGBYRGBY", "BYRGBYRG", "RGBYRGBY", "BYRGBYRG", "RGBYRGBY",
        "BYRGBYRG",
    ];

    fn grid_with(edits: &[(usize, &str)]) -> Grid {
        let mut rows = CHECKER;
        for &(row, text) in edits {
            rows[row] = text;
        }
        Grid::from_layout(&rows).unwrap()
    }

    fn ids_at(grid: &Grid, cells: &[(u8, u8)]) -> MatchSet {
        cells
            .iter()
            .map(|&(c, r)| grid.at(Pos::new(c, r)).unwrap())
            .collect()
    }

    #[test]
    fn test_checker_has_no_matches() {
        let grid = Grid::from_layout(&CHECKER).unwrap();
        assert!(find_matches(&grid).is_empty());
    }

    #[test]
    fn test_horizontal_run_of_three() {
        let grid = grid_with(&[(0, "RRRYBGBY")]);
        let m = find_matches(&grid);
        assert_eq!(m, ids_at(&grid, &[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn test_long_run_contributes_all_members() {
        let grid = grid_with(&[(2, "OOOOOGBY")]);
        let m = find_matches(&grid);
        assert_eq!(m.len(), 5);
    }

    #[test]
    fn test_vertical_run() {
        // Column 7 rows 0-2: Y, G, Y in checker; make them all P
        let grid = grid_with(&[(0, "RGBYRGBP"), (1, "BYRGBYRP"), (2, "RGBYRGBP")]);
        let m = find_matches(&grid);
        assert_eq!(m, ids_at(&grid, &[(7, 0), (7, 1), (7, 2)]));
    }

    #[test]
    fn test_white_never_matches() {
        let grid = grid_with(&[(4, "WWWYRGBY")]);
        assert!(find_matches(&grid).is_empty());
    }

    #[test]
    fn test_empty_cells_break_runs() {
        let grid = grid_with(&[(3, "OO.OOYRG")]);
        assert!(find_matches(&grid).is_empty());
    }

    #[test]
    fn test_detection_is_idempotent() {
        let grid = grid_with(&[(0, "RRRYBGBY"), (5, "BYPPPYRG")]);
        assert_eq!(find_matches(&grid), find_matches(&grid));
    }

    #[test]
    fn test_two_separate_runs_make_two_groups() {
        let grid = grid_with(&[(0, "RRRYBGBY"), (5, "BYPPPYRG")]);
        let m = find_matches(&grid);
        let groups = group_matches(&grid, &m);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.len() == 3 && g.is_line()));
    }

    #[test]
    fn test_l_shape_is_one_group() {
        // Row 4 cols 0-2 red, column 0 rows 2-4 red -> L of 5
        let grid = grid_with(&[(2, "RGBYRGBY"), (3, "RYBGBYRG"), (4, "RRRYRGBY")]);
        let m = find_matches(&grid);
        let groups = group_matches(&grid, &m);
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.len(), 5);
        assert!(!g.is_line());
        assert_eq!(g.corner().unwrap().pos, Pos::new(0, 4));
    }

    #[test]
    fn test_group_members_sorted_and_midpoint() {
        let grid = grid_with(&[(6, "YPPPPGBY")]);
        let m = find_matches(&grid);
        let groups = group_matches(&grid, &m);
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert!(g.single_row());
        let cols: Vec<u8> = g.members.iter().map(|t| t.pos.col).collect();
        assert_eq!(cols, vec![1, 2, 3, 4]);
        assert_eq!(g.midpoint().unwrap().pos, Pos::new(3, 6));
    }

    #[test]
    fn test_swap_creates_run_detection() {
        // Row 0: R R G R ... swapping (2,0) and (3,0) lines up three reds
        let grid = grid_with(&[(0, "RRGRBYBY")]);
        assert!(swap_creates_run(&grid, Pos::new(2, 0), Pos::new(3, 0)));
        let plain = Grid::from_layout(&CHECKER).unwrap();
        assert!(!swap_creates_run(&plain, Pos::new(0, 0), Pos::new(1, 0)));
    }

    #[test]
    fn test_specials_with_color_still_match() {
        let mut grid = grid_with(&[(0, "RRRYBGBY")]);
        grid.set_special(Pos::new(1, 0), SpecialKind::RowClear);
        assert_eq!(find_matches(&grid).len(), 3);
    }
}
