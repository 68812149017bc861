//! Special classifier - decides which power tile a match group earns
//!
//! | Group                   | Spawn            | Cell                     |
//! |-------------------------|------------------|--------------------------|
//! | 4 in one row            | `RowClear`       | midpoint                 |
//! | 4 in one column         | `ColClear`       | midpoint                 |
//! | 5+ in one line          | `Rainbow` (white)| midpoint                 |
//! | 5+ any other shape      | `AreaBlast`      | corner, else midpoint    |
//!
//! The midpoint is the member at index `len / 2` of the group sorted by
//! `(row, col)`. Groups of three, and bent groups of four, earn nothing.

use crate::matcher::MatchGroup;
use crate::types::{Color, Pos, SpecialKind};

/// A special queued for creation once its group has been removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialSpawn {
    pub at: Pos,
    pub color: Color,
    pub kind: SpecialKind,
}

/// Classify a group's shape into the special it spawns, if any
pub fn classify(group: &MatchGroup) -> Option<SpecialSpawn> {
    let len = group.len();
    if len < 4 {
        return None;
    }

    if len == 4 {
        let kind = if group.single_row() {
            SpecialKind::RowClear
        } else if group.single_col() {
            SpecialKind::ColClear
        } else {
            return None;
        };
        let mid = group.midpoint()?;
        return Some(SpecialSpawn {
            at: mid.pos,
            color: mid.color,
            kind,
        });
    }

    if group.is_line() {
        let mid = group.midpoint()?;
        return Some(SpecialSpawn {
            at: mid.pos,
            color: Color::White,
            kind: SpecialKind::Rainbow,
        });
    }

    let cell = group.corner().or_else(|| group.midpoint())?;
    Some(SpecialSpawn {
        at: cell.pos,
        color: cell.color,
        kind: SpecialKind::AreaBlast,
    })
}
