//! Day-level classification.

/// Highest activity level.
pub const MAX_LEVEL: u8 = 4;

/// Map a daily contribution count to its activity level (0..=4).
pub fn contribution_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        _ => MAX_LEVEL,
    }
}
