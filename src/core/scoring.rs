//! Score, level, and gravity schedules.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_FLOOR_MS, DROP_MS_PER_LEVEL, LINES_PER_LEVEL, LINE_SCORES,
};

/// Points for clearing `lines` rows at once.
///
/// The schedule is nonlinear: 0, 100, 300, 500, 800. Clears beyond four
/// lines (impossible with the standard shapes, allowed in principle) score
/// the same as four.
pub fn line_score(lines: u32) -> u32 {
    LINE_SCORES[(lines as usize).min(LINE_SCORES.len() - 1)]
}

/// Level derived from the total cleared-line count: one level per ten
/// lines, starting at 1.
pub fn level_for(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level, floored at the minimum.
pub fn drop_interval_ms(level: u32) -> u32 {
    BASE_DROP_MS
        .saturating_sub(level.saturating_mul(DROP_MS_PER_LEVEL))
        .max(DROP_INTERVAL_FLOOR_MS)
}
