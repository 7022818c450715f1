//! Major/minor chord names and conversion between the two modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ChordTimeline;

/// Diatonic chords of a major key, plus the Neapolitan `b2`.
pub const MAJOR_CHORDS: [&str; 7] = ["1", "2m", "3m", "4", "5", "6m", "b2"];

/// Diatonic chords of a minor key, plus `b2`.
pub const MINOR_CHORDS: [&str; 8] = ["1m", "2mb5", "b3", "4m", "5m", "b6", "b7", "b2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordMode {
    Major,
    Minor,
}

impl ChordMode {
    pub fn from_minor(minor: bool) -> Self {
        if minor {
            ChordMode::Minor
        } else {
            ChordMode::Major
        }
    }

    pub fn is_minor(self) -> bool {
        self == ChordMode::Minor
    }

    pub fn opposite(self) -> Self {
        match self {
            ChordMode::Major => ChordMode::Minor,
            ChordMode::Minor => ChordMode::Major,
        }
    }

    /// Name given to new chords and to unconvertible ones.
    pub fn tonic(self) -> &'static str {
        match self {
            ChordMode::Major => "1",
            ChordMode::Minor => "1m",
        }
    }

    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            ChordMode::Major => &MAJOR_CHORDS,
            ChordMode::Minor => &MINOR_CHORDS,
        }
    }
}

impl fmt::Display for ChordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordMode::Major => write!(f, "Major"),
            ChordMode::Minor => write!(f, "Minor"),
        }
    }
}

impl FromStr for ChordMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(ChordMode::Major),
            "minor" => Ok(ChordMode::Minor),
            other => Err(format!("unknown chord mode '{other}', expected major or minor")),
        }
    }
}

/// How chord names move between modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStyle {
    /// Map each degree onto the target mode's chord; chords already in the
    /// target vocabulary stay.
    #[default]
    Retarget,
    /// Swap every degree with its parallel-mode counterpart, so chords
    /// borrowed from the other mode are swapped as well.
    SwapBorrowed,
}

impl ConversionStyle {
    pub fn from_swap_flag(swap_borrowed: bool) -> Self {
        if swap_borrowed {
            ConversionStyle::SwapBorrowed
        } else {
            ConversionStyle::Retarget
        }
    }
}

/// The name `name` takes in a timeline converted to `target`.
pub fn convert_name(name: &str, target: ChordMode, style: ConversionStyle) -> &str {
    match style {
        ConversionStyle::Retarget => retarget(name, target),
        ConversionStyle::SwapBorrowed => swap_borrowed(name, target),
    }
}

fn retarget(name: &str, target: ChordMode) -> &str {
    match (target, name) {
        (ChordMode::Minor, "1") => "1m",
        (ChordMode::Minor, "2m") => "2mb5",
        (ChordMode::Minor, "3m") => "b3",
        (ChordMode::Minor, "4") => "4m",
        (ChordMode::Minor, "5") => "5m",
        (ChordMode::Minor, "6m") => "b6",
        (ChordMode::Major, "1m") => "1",
        (ChordMode::Major, "2mb5") => "2m",
        (ChordMode::Major, "b3") => "3m",
        (ChordMode::Major, "4m") => "4",
        (ChordMode::Major, "5m" | "b7") => "5",
        (ChordMode::Major, "b6") => "6m",
        _ if target.vocabulary().contains(&name) => name,
        _ => target.tonic(),
    }
}

fn swap_borrowed(name: &str, target: ChordMode) -> &str {
    match name {
        "1" => "1m",
        "1m" => "1",
        "2m" => "2mb5",
        "2mb5" => "2m",
        "3m" => "b3",
        "b3" => "3m",
        "4" => "4m",
        "4m" => "4",
        "5m" | "b7" => "5",
        "5" => "5m",
        "b6" => "6m",
        "6m" => "b6",
        "b2" => name,
        _ => target.tonic(),
    }
}

/// Copy of `timeline` with every chord renamed for `target`. Ticks are kept.
pub fn convert_mode(timeline: &ChordTimeline, target: ChordMode, style: ConversionStyle) -> ChordTimeline {
    let mut converted = timeline.clone();
    for event in converted.events_mut() {
        event.name = convert_name(&event.name, target, style).to_string();
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chords::ChordEvent;
    use test_case::test_case;

    #[test_case("1" => "1m")]
    #[test_case("2m" => "2mb5")]
    #[test_case("3m" => "b3")]
    #[test_case("4" => "4m")]
    #[test_case("5" => "5m")]
    #[test_case("6m" => "b6")]
    #[test_case("b2" => "b2")]
    #[test_case("1m" => "1m")]
    #[test_case("2mb5" => "2mb5")]
    #[test_case("b3" => "b3")]
    #[test_case("4m" => "4m")]
    #[test_case("5m" => "5m")]
    #[test_case("b6" => "b6")]
    #[test_case("b7" => "b7")]
    #[test_case("sus4" => "1m" ; "unknown to minor tonic")]
    fn test_retarget_to_minor(name: &str) -> String {
        convert_name(name, ChordMode::Minor, ConversionStyle::Retarget).to_string()
    }

    #[test_case("1m" => "1")]
    #[test_case("2mb5" => "2m")]
    #[test_case("b3" => "3m")]
    #[test_case("4m" => "4")]
    #[test_case("5m" => "5")]
    #[test_case("b6" => "6m")]
    #[test_case("b7" => "5")]
    #[test_case("b2" => "b2")]
    #[test_case("1" => "1")]
    #[test_case("2m" => "2m")]
    #[test_case("3m" => "3m")]
    #[test_case("4" => "4")]
    #[test_case("5" => "5")]
    #[test_case("6m" => "6m")]
    #[test_case("" => "1" ; "empty to major tonic")]
    fn test_retarget_to_major(name: &str) -> String {
        convert_name(name, ChordMode::Major, ConversionStyle::Retarget).to_string()
    }

    #[test_case("1", "1m")]
    #[test_case("1m", "1")]
    #[test_case("2m", "2mb5")]
    #[test_case("2mb5", "2m")]
    #[test_case("3m", "b3")]
    #[test_case("b3", "3m")]
    #[test_case("4", "4m")]
    #[test_case("4m", "4")]
    #[test_case("5", "5m")]
    #[test_case("5m", "5")]
    #[test_case("b7", "5")]
    #[test_case("6m", "b6")]
    #[test_case("b6", "6m")]
    #[test_case("b2", "b2")]
    fn test_swap_borrowed_ignores_target(name: &str, expected: &str) {
        for target in [ChordMode::Major, ChordMode::Minor] {
            assert_eq!(convert_name(name, target, ConversionStyle::SwapBorrowed), expected);
        }
    }

    #[test]
    fn test_swap_borrowed_unknown_to_tonic() {
        let style = ConversionStyle::SwapBorrowed;
        assert_eq!(convert_name("x", ChordMode::Minor, style), "1m");
        assert_eq!(convert_name("x", ChordMode::Major, style), "1");
    }

    #[test]
    fn test_swap_borrowed_round_trip_on_core_degrees() {
        let source = ChordTimeline::from_events(
            ["1", "2m", "3m", "4", "5", "6m"]
                .iter()
                .enumerate()
                .map(|(i, name)| ChordEvent::new(i as i32 * 480, i as i32 * 480 + 1, name))
                .collect(),
        );
        let style = ConversionStyle::SwapBorrowed;
        let minor = convert_mode(&source, ChordMode::Minor, style);
        let names: Vec<&str> = minor.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["1m", "2mb5", "b3", "4m", "5m", "b6"]);
        assert_eq!(convert_mode(&minor, ChordMode::Major, style), source);
    }

    #[test]
    fn test_convert_mode_keeps_ticks() {
        let source = ChordTimeline::from_events(vec![
            ChordEvent::new(0, 1920, "1"),
            ChordEvent::new(480, 481, "5"),
        ]);
        let converted = convert_mode(&source, ChordMode::Minor, ConversionStyle::default());
        let pairs: Vec<(i32, i32, &str)> = converted
            .iter()
            .map(|e| (e.start, e.end, e.name.as_str()))
            .collect();
        assert_eq!(pairs, vec![(0, 1920, "1m"), (480, 481, "5m")]);
        assert_eq!(source.get(0).unwrap().name, "1");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Minor".parse::<ChordMode>().unwrap(), ChordMode::Minor);
        assert!("dorian".parse::<ChordMode>().is_err());
        assert_eq!(ConversionStyle::from_swap_flag(true), ConversionStyle::SwapBorrowed);
    }
}
