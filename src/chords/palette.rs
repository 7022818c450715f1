//! Chord pickers: the ordered choices offered for a chord's name.

use super::ChordMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteItem {
    Chord(&'static str),
    Separator,
}

use PaletteItem::{Chord, Separator};

const MINOR_FIRST: [PaletteItem; 16] = [
    Chord("1m"),
    Chord("2mb5"),
    Chord("b3"),
    Chord("4m"),
    Chord("5m"),
    Chord("b6"),
    Chord("b7"),
    Separator,
    Chord("1"),
    Chord("2m"),
    Chord("3m"),
    Chord("4"),
    Chord("5"),
    Chord("6m"),
    Separator,
    Chord("b2"),
];

const MAJOR_FIRST: [PaletteItem; 16] = [
    Chord("1"),
    Chord("2m"),
    Chord("3m"),
    Chord("4"),
    Chord("5"),
    Chord("6m"),
    Separator,
    Chord("1m"),
    Chord("2mb5"),
    Chord("b3"),
    Chord("4m"),
    Chord("5m"),
    Chord("b6"),
    Chord("b7"),
    Separator,
    Chord("b2"),
];

const INTERLEAVED: [PaletteItem; 14] = [
    Chord("1"),
    Chord("1m"),
    Chord("2m"),
    Chord("2mb5"),
    Chord("3m"),
    Chord("b3"),
    Chord("4"),
    Chord("4m"),
    Chord("5"),
    Chord("5m"),
    Chord("6m"),
    Chord("b6"),
    Chord("b7"),
    Chord("b2"),
];

/// Picker for a chord on a `mode` tab. With `opposite_after_current` the
/// current mode's chords come first, otherwise degrees are interleaved.
pub fn chord_palette(mode: ChordMode, opposite_after_current: bool) -> &'static [PaletteItem] {
    match (opposite_after_current, mode) {
        (true, ChordMode::Minor) => &MINOR_FIRST,
        (true, ChordMode::Major) => &MAJOR_FIRST,
        (false, _) => &INTERLEAVED,
    }
}

/// Slot showing `name`, or 0 for names the picker does not offer.
pub fn palette_index(palette: &[PaletteItem], name: &str) -> usize {
    palette
        .iter()
        .position(|item| matches!(item, Chord(n) if *n == name))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_sit_between_modes() {
        let palette = chord_palette(ChordMode::Minor, true);
        assert_eq!(palette[7], Separator);
        assert_eq!(palette[14], Separator);
        assert_eq!(palette_index(palette, "1"), 8);
        assert_eq!(palette_index(chord_palette(ChordMode::Major, true), "1m"), 7);
    }

    #[test]
    fn test_interleaved_ignores_mode() {
        assert_eq!(
            chord_palette(ChordMode::Major, false),
            chord_palette(ChordMode::Minor, false)
        );
        assert!(!chord_palette(ChordMode::Major, false).contains(&Separator));
    }

    #[test]
    fn test_every_palette_covers_both_vocabularies() {
        let palettes: [&[PaletteItem]; 3] = [&MINOR_FIRST, &MAJOR_FIRST, &INTERLEAVED];
        for palette in palettes {
            for mode in [ChordMode::Major, ChordMode::Minor] {
                for &name in mode.vocabulary() {
                    assert!(palette.contains(&Chord(name)), "{name} missing");
                }
            }
        }
        assert_eq!(palette_index(&INTERLEAVED, "unknown"), 0);
    }
}
