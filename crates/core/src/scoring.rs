//! Scoring module - line clear points, level progression and gravity speed
//!
//! Points use the classic table `{0, 40, 100, 300, 1200}` multiplied by the
//! level in effect *before* the clear. No soft drop, hard drop, combo or
//! back-to-back bonuses exist.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, LINES_PER_LEVEL, LINE_SCORES, START_LEVEL,
};

/// Calculate line clear score
/// lines: number of lines cleared (0-4)
/// level: level before the clear (1-based)
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    if lines > 4 {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Level reached after clearing `total_lines` lines in one game
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + START_LEVEL
}

/// Gravity period for a level, in milliseconds
///
/// `max(100, 1000 - (level - 1) * 100)`
pub fn gravity_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(speedup)
        .max(DROP_INTERVAL_MIN_MS)
}
