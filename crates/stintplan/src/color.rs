//! Display colors for pilots.

use crate::team::UNASSIGNED;

/// A CSS hex color.
pub type Color = &'static str;

/// Color for empty slots.
pub const NEUTRAL: Color = "#f0f2f6";

/// Fixed palette, indexed by pilot position.
pub const PALETTE: [Color; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22",
    "#17becf", "#4A90E2",
];

/// Color for `pilot`, given the team's pilots in display order.
///
/// Known pilots cycle through [`PALETTE`] by position. Names missing from the
/// list get a stable hash-derived palette entry, so every string maps to a
/// color.
#[must_use]
pub fn color_for(pilot: &str, pilots: &[&str]) -> Color {
    if pilot.is_empty() || pilot == UNASSIGNED {
        return NEUTRAL;
    }
    let index = pilots
        .iter()
        .position(|p| *p == pilot)
        .unwrap_or_else(|| stable_index(pilot));
    PALETTE[index % PALETTE.len()]
}

/// Foreground color readable on `background`.
#[must_use]
pub fn text_color_for(background: Color) -> Color {
    if background == NEUTRAL {
        "black"
    } else {
        "white"
    }
}

fn stable_index(name: &str) -> usize {
    let hash = blake3::hash(name.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    #[allow(clippy::cast_possible_truncation)]
    let index = (u64::from_le_bytes(prefix) % PALETTE.len() as u64) as usize;
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    const PILOTS: [&str; 3] = ["Ana", "Ben", "Cal"];

    #[test]
    fn test_neutral_for_unassigned_and_empty() {
        assert_eq!(color_for(UNASSIGNED, &PILOTS), NEUTRAL);
        assert_eq!(color_for("", &PILOTS), NEUTRAL);
        assert_eq!(color_for("", &[]), NEUTRAL);
    }

    #[test]
    fn test_position_picks_palette() {
        assert_eq!(color_for("Ana", &PILOTS), PALETTE[0]);
        assert_eq!(color_for("Cal", &PILOTS), PALETTE[2]);
    }

    #[test]
    fn test_palette_wraps() {
        let names: Vec<String> = (0..12).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(color_for("P10", &refs), PALETTE[0]);
        assert_eq!(color_for("P11", &refs), PALETTE[1]);
    }

    #[test]
    fn test_unknown_name_is_stable() {
        let first = color_for("Stale Name", &PILOTS);
        let second = color_for("Stale Name", &[]);
        assert_eq!(first, second);
        assert!(PALETTE.contains(&first));
        assert_ne!(first, NEUTRAL);
    }

    #[test]
    fn test_text_color() {
        assert_eq!(text_color_for(NEUTRAL), "black");
        assert_eq!(text_color_for(PALETTE[3]), "white");
    }
}
