//! Cel Module
//!
//! A cel is one playable section of a song package. It carries two audio
//! configurations (the disc and the riser transition), each made of sample
//! files plus the fusion patch that maps them, and two MIDI resources (major
//! and minor) that share one loop length.
//!
//! - `audio_files`: add/remove/relabel samples while keeping keyzone
//!   `sample_path`s and `audio_labels` consistent
//! - `mode`: the simple/advanced toggle and the simple-mode helpers

mod audio_files;
mod mode;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio::SampleResource;
use crate::error::{CelError, Result};
use crate::fusion::FusionPatch;
use crate::keyzone::Keymap;
use crate::midi::{sync_loop_length, LoopLength, LoopSyncReport, MidiFileResource};

/// Which audio configuration of a cel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CelPart {
    Disc,
    Riser,
}

impl CelPart {
    /// Suffix appended to the cel's short name to form sample names.
    pub fn name_suffix(&self) -> &'static str {
        match self {
            CelPart::Disc => "",
            CelPart::Riser => "_trans",
        }
    }
}

impl fmt::Display for CelPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CelPart::Disc => write!(f, "disc"),
            CelPart::Riser => write!(f, "riser"),
        }
    }
}

/// Short names may only contain ASCII letters, digits and `_`.
pub fn validate_short_name(name: &str) -> Result<()> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(CelError::InvalidShortName {
            name: name.to_string(),
        })
    }
}

/// Sample files and the fusion patch of one cel part.
#[derive(Debug, Clone, PartialEq)]
pub struct CelAudio {
    short_name: String,
    part: CelPart,
    files: Vec<SampleResource>,
    patch: FusionPatch,
}

impl CelAudio {
    pub fn new(
        short_name: &str,
        part: CelPart,
        files: Vec<SampleResource>,
        patch: FusionPatch,
    ) -> Self {
        Self {
            short_name: short_name.to_string(),
            part,
            files,
            patch,
        }
    }

    pub fn part(&self) -> CelPart {
        self.part
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Base of every sample's logical name: the short name, plus `_trans` for risers.
    pub fn sample_base(&self) -> String {
        format!("{}{}", self.short_name, self.part.name_suffix())
    }

    pub fn files(&self) -> &[SampleResource] {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut Vec<SampleResource> {
        &mut self.files
    }

    pub fn patch(&self) -> &FusionPatch {
        &self.patch
    }

    pub fn patch_mut(&mut self) -> &mut FusionPatch {
        &mut self.patch
    }

    pub fn keymap(&mut self) -> Result<Keymap<'_>> {
        self.patch.keymap()
    }

    pub fn logical_names(&self) -> Vec<&str> {
        self.files.iter().map(SampleResource::logical_name).collect()
    }

    /// Distinct `sample_path`s referenced by the keyzones.
    pub fn referenced_paths(&self) -> BTreeSet<String> {
        self.patch
            .keymap_tree()
            .into_iter()
            .flat_map(|zones| zones.iter())
            .filter_map(|n| n.value.as_tree())
            .map(|z| {
                z.find_child("sample_path")
                    .and_then(|p| p.value.as_str())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    pub fn is_advanced(&self) -> bool {
        self.patch.is_advanced()
    }
}

/// One cel: disc and riser audio plus the major/minor MIDI it loops over.
#[derive(Debug, Clone, PartialEq)]
pub struct CelData {
    short_name: String,
    pub disc: CelAudio,
    pub riser: CelAudio,
    pub loop_length: LoopLength,
    pub major_midi: MidiFileResource,
    pub minor_midi: MidiFileResource,
}

impl CelData {
    pub fn new(
        short_name: &str,
        disc: (Vec<SampleResource>, FusionPatch),
        riser: (Vec<SampleResource>, FusionPatch),
        major_midi: MidiFileResource,
        minor_midi: MidiFileResource,
    ) -> Result<Self> {
        validate_short_name(short_name)?;
        let loop_length = LoopLength::from_ticks(major_midi.final_tick);
        Ok(Self {
            short_name: short_name.to_string(),
            disc: CelAudio::new(short_name, CelPart::Disc, disc.0, disc.1),
            riser: CelAudio::new(short_name, CelPart::Riser, riser.0, riser.1),
            loop_length,
            major_midi,
            minor_midi,
        })
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn audio(&self, part: CelPart) -> &CelAudio {
        match part {
            CelPart::Disc => &self.disc,
            CelPart::Riser => &self.riser,
        }
    }

    pub fn audio_mut(&mut self, part: CelPart) -> &mut CelAudio {
        match part {
            CelPart::Disc => &mut self.disc,
            CelPart::Riser => &mut self.riser,
        }
    }

    /// Switch the disc to simple mode, resetting the shared loop length.
    pub fn switch_disc_to_simple(&mut self) -> Result<()> {
        self.disc.switch_to_simple(&mut self.loop_length)
    }

    /// Switch the riser to simple mode, resetting the shared loop length.
    pub fn switch_riser_to_simple(&mut self) -> Result<()> {
        self.riser.switch_to_simple(&mut self.loop_length)
    }

    /// Push the current loop length into both MIDI resources.
    pub fn update_midi_length(&mut self) -> LoopSyncReport {
        sync_loop_length(
            &mut self.major_midi,
            &mut self.minor_midi,
            self.loop_length.ticks,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::cel_audio;
    use super::*;

    #[test]
    fn test_short_name_validation() {
        assert!(validate_short_name("custom_song2").is_ok());
        assert!(validate_short_name("").is_err());
        assert!(matches!(
            validate_short_name("my song"),
            Err(CelError::InvalidShortName { .. })
        ));
        assert!(validate_short_name("café").is_err());
    }

    #[test]
    fn test_sample_base() {
        let disc = cel_audio(CelPart::Disc, &["song_0"], &["song_0"]);
        let riser = cel_audio(CelPart::Riser, &["song_trans_0"], &["song_trans_0"]);
        assert_eq!(disc.sample_base(), "song");
        assert_eq!(riser.sample_base(), "song_trans");
    }

    #[test]
    fn test_referenced_paths() {
        let audio = cel_audio(CelPart::Disc, &["song_0", "song_1"], &["song_0", "song_0"]);
        let paths = audio.referenced_paths();
        assert_eq!(paths.len(), 1);
        assert!(paths.contains("C:/song_0.mogg"));
    }

    #[test]
    fn test_cel_data_loop_length_from_midi() {
        let major = MidiFileResource::single_note(30720, false);
        let minor = MidiFileResource::single_note(30720, true);
        let cel = CelData::new(
            "song",
            (vec![SampleResource::new("song_0")], FusionPatch::default()),
            (vec![SampleResource::new("song_trans_0")], FusionPatch::default()),
            major,
            minor,
        )
        .unwrap();
        assert_eq!(cel.loop_length.ticks, 30720);
        assert_eq!(cel.loop_length.selected, Some(1));
        assert_eq!(cel.audio(CelPart::Riser).sample_base(), "song_trans");
    }

    #[test]
    fn test_update_midi_length() {
        let mut cel = CelData::new(
            "song",
            (vec![SampleResource::new("song_0")], FusionPatch::default()),
            (vec![SampleResource::new("song_trans_0")], FusionPatch::default()),
            MidiFileResource::single_note(30720, false),
            MidiFileResource::single_note(30720, true),
        )
        .unwrap();
        cel.loop_length.select_canonical(3);
        let report = cel.update_midi_length();
        assert!(report.all_updated());
        assert_eq!(cel.major_midi.final_tick, 122880);
        assert_eq!(cel.minor_midi.final_tick_minus_one, 122879);
    }
}
