//! Scoring module - multiplier and point calculations
//!
//! All multipliers are integer tenths: `10` is 1.0x. Points are floored.
//!
//! # Examples
//!
//! ```
//! use gem_cascade_core::scoring::{match_score, multiplier_tenths};
//!
//! // First match of a chain: combo 1 -> 1.1x, three tiles -> 33
//! let mult = multiplier_tenths(1, false);
//! assert_eq!(mult, 11);
//! assert_eq!(match_score(3, mult), 33);
//!
//! // Two groups in one cycle add a flat +1.0x
//! assert_eq!(multiplier_tenths(1, true), 21);
//! ```

use crate::types::{
    TextTier, BASE_MULTIPLIER_TENTHS, BASE_TILE_SCORE, COMBO_STEP_TENTHS, MULTI_MATCH_BONUS_TENTHS,
};

/// Combo multiplier: 1.0 + 0.1 per combo step, +1.0 for a multi-match
pub fn multiplier_tenths(combo: u32, multi_match: bool) -> u32 {
    let bonus = if multi_match {
        MULTI_MATCH_BONUS_TENTHS
    } else {
        0
    };
    BASE_MULTIPLIER_TENTHS + combo.saturating_mul(COMBO_STEP_TENTHS) + bonus
}

/// Points for `tiles` matched tiles at the given multiplier
pub fn match_score(tiles: usize, multiplier_tenths: u32) -> u32 {
    let tiles = u32::try_from(tiles).unwrap_or(u32::MAX);
    tiles
        .saturating_mul(BASE_TILE_SCORE)
        .saturating_mul(multiplier_tenths)
        / 10
}

/// Floating text tier for a group
pub fn text_tier(group_len: usize, multiplier_tenths: u32) -> TextTier {
    if group_len >= 5 {
        TextTier::Critical
    } else if multiplier_tenths > 15 {
        TextTier::Combo
    } else {
        TextTier::Normal
    }
}

/// Screen shake for a resolution cycle, growing with the combo
pub fn cycle_shake(combo: u32) -> u8 {
    let intensity = 5 + combo.saturating_mul(2);
    intensity.min(u8::MAX as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_grows_with_combo() {
        assert_eq!(multiplier_tenths(0, false), 10);
        assert_eq!(multiplier_tenths(1, false), 11);
        assert_eq!(multiplier_tenths(5, false), 15);
        assert_eq!(multiplier_tenths(3, true), 23);
    }

    #[test]
    fn test_match_score_floors() {
        assert_eq!(match_score(3, 11), 33);
        assert_eq!(match_score(4, 12), 48);
        // 7 * 10 * 1.3 = 91
        assert_eq!(match_score(7, 13), 91);
        assert_eq!(match_score(0, 25), 0);
    }

    #[test]
    fn test_text_tiers() {
        assert_eq!(text_tier(3, 11), TextTier::Normal);
        assert_eq!(text_tier(3, 15), TextTier::Normal);
        assert_eq!(text_tier(4, 16), TextTier::Combo);
        assert_eq!(text_tier(5, 11), TextTier::Critical);
    }

    #[test]
    fn test_cycle_shake() {
        assert_eq!(cycle_shake(1), 7);
        assert_eq!(cycle_shake(1000), u8::MAX);
    }
}
