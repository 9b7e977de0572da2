//! core::palette
//!
//! Branch color assignment.
//!
//! New branches take the first palette entry no existing branch uses. Once
//! the palette runs out, candidates come from a walk over the full 24-bit
//! color space. The walk multiplies the step index by an odd constant modulo
//! 2^24, which is a bijection, so every color is visited exactly once and
//! the search always terminates.

use std::collections::HashSet;

use super::types::BranchColor;

/// Color of the initial `main` branch.
pub const MAIN_COLOR: u32 = 0x2196f3;

/// Preferred colors, in assignment order.
pub const PALETTE: [u32; 12] = [
    MAIN_COLOR, 0x4caf50, 0xff9800, 0x9c27b0, 0xf44336, 0x009688, 0xe91e63, 0x795548, 0x3f51b5,
    0xcddc39, 0x00bcd4, 0x607d8b,
];

const COLOR_SPACE: u32 = 1 << 24;
const WALK_STEP: u32 = 0x9e_3779;

/// Pick a color distinct from every color in `used`.
///
/// Returns `None` only when all 2^24 colors are taken.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use gitquest::core::palette::next_color;
///
/// let used = HashSet::new();
/// assert_eq!(next_color(&used).unwrap().as_str(), "#2196f3");
/// ```
pub fn next_color(used: &HashSet<&BranchColor>) -> Option<BranchColor> {
    let palette = PALETTE.iter().map(|&rgb| BranchColor::from_rgb(rgb));
    let walk = (0..COLOR_SPACE).map(|i| BranchColor::from_rgb(i.wrapping_mul(WALK_STEP)));

    palette.chain(walk).find(|candidate| !used.contains(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_used_palette_entries() {
        let main = BranchColor::from_rgb(MAIN_COLOR);
        let used: HashSet<_> = [&main].into_iter().collect();
        assert_eq!(next_color(&used).unwrap().as_str(), "#4caf50");
    }

    #[test]
    fn falls_back_past_exhausted_palette() {
        let taken: Vec<BranchColor> = PALETTE.iter().map(|&c| BranchColor::from_rgb(c)).collect();
        let used: HashSet<_> = taken.iter().collect();
        let color = next_color(&used).unwrap();
        assert!(!taken.contains(&color));
    }

    #[test]
    fn walk_step_is_odd() {
        // An odd multiplier is what makes the walk a permutation.
        assert_eq!(WALK_STEP % 2, 1);
    }

    #[test]
    fn many_branches_get_distinct_colors() {
        let mut assigned: Vec<BranchColor> = Vec::new();
        for _ in 0..100 {
            let color = {
                let used: HashSet<_> = assigned.iter().collect();
                next_color(&used).unwrap()
            };
            assert!(!assigned.contains(&color));
            assigned.push(color);
        }
    }
}
