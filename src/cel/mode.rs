//! Simple and advanced editing modes.
//!
//! Simple mode is the two-zone layout the game expects by default: zone 0
//! plays the major sample, zone 1 the minor one, and at most two files back
//! them (one when the audio is duplicated).

use log::{debug, info, warn};

use crate::audio::{self, SampleResource};
use crate::error::{CelError, Result};
use crate::fusion::LayerSelectMode;
use crate::keyzone::{KeymapPreset, Keyzone};
use crate::midi::LoopLength;
use crate::tree::Node;

use super::audio_files::rebuild_labels;
use super::{CelAudio, CelPart};

const SIMPLE_ZONES: [(&str, KeymapPreset); 2] = [
    ("Major", KeymapPreset::Major),
    ("Minor", KeymapPreset::Minor),
];

impl CelAudio {
    /// Collapse the cel part into simple mode.
    ///
    /// Keeps at most the two files referenced by zones 0 and 1, renamed
    /// `<base>_0`/`<base>_1`. The keymap is cut to, or grown to, exactly two
    /// zones with the Major/Minor presets, and the loop length snaps to a
    /// canonical value.
    pub fn switch_to_simple(&mut self, loop_length: &mut LoopLength) -> Result<()> {
        // Work on a copy of the patch; files and patch are committed together.
        let mut patch = self.patch.clone();
        let used: Vec<String> = {
            let mut keymap = patch.keymap()?;
            if keymap.is_empty() {
                return Err(CelError::EmptyKeymap);
            }
            (0..keymap.len().min(2))
                .map(|i| Ok(keymap.zone(i)?.sample_path().to_string()))
                .collect::<Result<_>>()?
        };

        let base = self.sample_base();
        let placeholder;
        let files: &[SampleResource] = if self.files.is_empty() {
            placeholder = [SampleResource::new(&audio::numbered_name(&base, 0))];
            &placeholder
        } else {
            &self.files
        };
        let mut keep: Vec<usize> = files
            .iter()
            .enumerate()
            .filter(|(_, f)| used.contains(&f.file_name))
            .map(|(i, _)| i)
            .take(2)
            .collect();
        if keep.is_empty() {
            warn!("No sample matches the keyzones of the {}; keeping the first file", self.part);
            keep.push(0);
        }
        let mut previous = Vec::with_capacity(keep.len());
        let mut kept = Vec::with_capacity(keep.len());
        for (i, &source) in keep.iter().enumerate() {
            let mut file = files[source].clone();
            previous.push(file.logical_name().to_string());
            file.rename(&audio::numbered_name(&base, i));
            kept.push(file);
        }

        let file_names: Vec<String> = kept.iter().map(|f| f.file_name.clone()).collect();
        let mut keymap = patch.keymap()?;
        if keymap.len() == 1 {
            keymap.add_zone(0)?;
        }
        keymap.truncate(2);
        let mut file_index = 0;
        for (i, (label, preset)) in SIMPLE_ZONES.iter().enumerate() {
            let mut zone = keymap.zone(i)?;
            zone.set_label(label);
            zone.select_preset(*preset);
            zone.set_sample_path(&file_names[file_index]);
            let mut ts = zone.timestretch();
            ts.set_maintain_time(true);
            ts.set_sync_tempo(true);
            if file_names.len() > 1 {
                file_index += 1;
            }
        }

        patch.set_advanced(false)?;
        patch.set_layer_select_mode(LayerSelectMode::Layers)?;
        rebuild_labels(&mut patch, &kept, &previous)?;

        self.patch = patch;
        self.files = kept;
        loop_length.snap_to_canonical();
        info!(
            "Switched {} to simple mode with {} file(s), loop length {}",
            self.part,
            self.files.len(),
            loop_length.ticks
        );
        Ok(())
    }

    /// Enter advanced mode. Nothing else changes.
    pub fn switch_to_advanced(&mut self) -> Result<()> {
        self.patch.set_advanced(true)?;
        info!("Switched {} to advanced mode", self.part);
        Ok(())
    }

    /// True when every keyzone plays the same sample.
    pub fn is_duplicate_audio(&self) -> bool {
        self.referenced_paths().len() == 1
    }

    /// Toggle between one shared sample and separate major/minor samples.
    pub fn set_duplicate_audio(&mut self, duplicate: bool) -> Result<()> {
        let base = self.sample_base();
        let mut patch = self.patch.clone();
        if duplicate {
            let drop_second = self.files.len() == 2;
            if drop_second {
                patch.audio_labels()?.remove(self.files[1].logical_name());
            }
            let mut keymap = patch.keymap()?;
            if keymap.len() == 2 {
                let path = keymap.zone(0)?.sample_path().to_string();
                keymap.zone(1)?.set_sample_path(&path);
            }
            if drop_second {
                self.files.truncate(1);
            }
        } else {
            let second = audio::numbered_name(&base, 1);
            let added = if self.files.len() == 1 {
                let labels = patch.audio_labels()?;
                if !labels.contains_key(&second) {
                    labels.push(Node::new(second.as_str(), second.as_str()));
                }
                let mut file = self.files[0].clone();
                file.rename(&second);
                Some(file)
            } else {
                None
            };
            let mut keymap = patch.keymap()?;
            if keymap.len() == 2 {
                keymap.zone(1)?.set_sample(&second);
            }
            self.files.extend(added);
        }
        self.patch = patch;
        debug!("Duplicate audio for {} set to {duplicate}", self.part);
        Ok(())
    }

    /// Apply `edit` to the (at most two) simple-mode zones.
    fn for_simple_zones(&mut self, mut edit: impl FnMut(&mut Keyzone<'_>)) -> Result<()> {
        let mut keymap = self.patch.keymap()?;
        for i in 0..keymap.len().min(2) {
            edit(&mut keymap.zone(i)?);
        }
        Ok(())
    }

    pub fn set_simple_unpitched(&mut self, on: bool) -> Result<()> {
        self.for_simple_zones(|zone| zone.set_unpitched(on))
    }

    /// "Natural pitching" keeps formants while the sample is pitched.
    pub fn set_simple_natural_pitching(&mut self, on: bool) -> Result<()> {
        self.for_simple_zones(|zone| zone.timestretch().set_maintain_formant(on))
    }

    /// Whether `orig_tempo` follows the song tempo. Read from zone 0.
    pub fn set_simple_orig_tempo_sync(&mut self, on: bool) -> Result<()> {
        let mut keymap = self.patch.keymap()?;
        if keymap.is_empty() {
            return Err(CelError::EmptyKeymap);
        }
        keymap.zone(0)?.timestretch().set_orig_tempo_sync(on);
        Ok(())
    }

    /// Set the original tempo of both simple-mode zones.
    pub fn set_simple_orig_tempo(&mut self, bpm: i32) -> Result<()> {
        self.for_simple_zones(|zone| zone.timestretch().set_orig_tempo(bpm))
    }

    /// Discs play their zones as singletons, risers never do.
    pub fn enforce_simple_singleton(&mut self) -> Result<()> {
        let singleton = self.part == CelPart::Disc;
        self.for_simple_zones(|zone| zone.set_singleton(singleton))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cel::fixtures::cel_audio;

    fn zone_field(audio: &mut CelAudio, index: usize, read: fn(&mut Keyzone<'_>) -> String) -> String {
        let mut keymap = audio.keymap().unwrap();
        let mut zone = keymap.zone(index).unwrap();
        read(&mut zone)
    }

    #[test]
    fn test_switch_to_simple_from_many_zones() {
        let mut audio = cel_audio(
            CelPart::Disc,
            &["song_0", "song_1", "song_2", "song_3"],
            &["song_2", "song_3", "song_0"],
        );
        audio.switch_to_advanced().unwrap();
        audio.set_audio_label(3, "Minor Pad").unwrap();
        let mut length = LoopLength::from_ticks(50000);

        audio.switch_to_simple(&mut length).unwrap();

        assert!(!audio.is_advanced());
        assert_eq!(audio.logical_names(), vec!["song_0", "song_1"]);
        assert_eq!(audio.patch().zone_count(), 2);
        assert_eq!(length.ticks, 61440);
        assert_eq!(length.selected, Some(2));
        assert!(!length.advanced);

        let mut keymap = audio.keymap().unwrap();
        let mut major = keymap.zone(0).unwrap();
        assert_eq!(major.label(), "Major");
        assert_eq!(major.classify(), KeymapPreset::Major);
        assert_eq!(major.sample_path(), "C:/song_0.mogg");
        assert!(major.timestretch().maintain_time());
        assert!(major.timestretch().sync_tempo());
        let mut minor = keymap.zone(1).unwrap();
        assert_eq!(minor.label(), "Minor");
        assert_eq!(minor.preset(), KeymapPreset::Minor);
        assert_eq!(minor.sample_path(), "C:/song_1.mogg");

        // old song_3 is the new song_1 and keeps its label
        assert_eq!(audio.audio_label(1).unwrap(), "Minor Pad");
        assert_eq!(
            audio.patch_mut().layer_select_mode().unwrap(),
            LayerSelectMode::Layers
        );
    }

    #[test]
    fn test_switch_to_simple_duplicates_single_zone() {
        let mut audio = cel_audio(CelPart::Riser, &["song_trans_0"], &["song_trans_0"]);
        let mut length = LoopLength::from_ticks(30720);
        audio.switch_to_simple(&mut length).unwrap();

        assert_eq!(audio.patch().zone_count(), 2);
        assert_eq!(length.ticks, 30720);
        assert_eq!(
            zone_field(&mut audio, 1, |z| z.sample_path().to_string()),
            "C:/song_trans_0.mogg"
        );
        assert!(audio.is_duplicate_audio());
    }

    #[test]
    fn test_failed_switch_leaves_cel_untouched() {
        let mut audio = cel_audio(CelPart::Disc, &["song_0", "song_1", "song_2"], &["song_2"]);
        audio
            .patch_mut()
            .root_mut()
            .push(Node::new("edit_advanced", "yes"));
        let before = audio.clone();
        let mut length = LoopLength::from_ticks(50000);

        let err = audio.switch_to_simple(&mut length).unwrap_err();
        assert_eq!(err.error_code(), "TYPE_MISMATCH");
        assert_eq!(audio, before);
        assert_eq!(length.ticks, 50000);
        assert!(length.advanced);
    }

    #[test]
    fn test_switch_to_simple_without_matching_file() {
        let mut audio = cel_audio(CelPart::Disc, &["song_0", "song_1"], &["elsewhere"]);
        let mut length = LoopLength::from_ticks(15360);
        audio.switch_to_simple(&mut length).unwrap();
        assert_eq!(audio.files().len(), 1);
        assert_eq!(audio.logical_names(), vec!["song_0"]);
        assert_eq!(
            zone_field(&mut audio, 0, |z| z.sample_path().to_string()),
            "C:/song_0.mogg"
        );
    }

    #[test]
    fn test_duplicate_audio_round_trip() {
        let mut audio = cel_audio(CelPart::Disc, &["song_0", "song_1"], &["song_0", "song_1"]);
        assert!(!audio.is_duplicate_audio());

        audio.set_duplicate_audio(true).unwrap();
        assert_eq!(audio.files().len(), 1);
        assert!(audio.is_duplicate_audio());
        assert_eq!(audio.audio_labels().unwrap().len(), 1);

        audio.set_duplicate_audio(false).unwrap();
        assert_eq!(audio.logical_names(), vec!["song_0", "song_1"]);
        assert!(!audio.is_duplicate_audio());
        assert_eq!(
            zone_field(&mut audio, 1, |z| z.sample_path().to_string()),
            "C:/song_1.mogg"
        );
    }

    #[test]
    fn test_simple_helpers_touch_both_zones() {
        let mut audio = cel_audio(CelPart::Riser, &["song_trans_0"], &["song_trans_0", "song_trans_0"]);
        audio.set_simple_unpitched(true).unwrap();
        audio.set_simple_natural_pitching(true).unwrap();
        audio.set_simple_orig_tempo(128).unwrap();
        audio.set_simple_orig_tempo_sync(false).unwrap();
        audio.enforce_simple_singleton().unwrap();

        let mut keymap = audio.keymap().unwrap();
        for i in 0..2 {
            let mut zone = keymap.zone(i).unwrap();
            assert!(zone.unpitched());
            assert!(!zone.singleton());
            assert!(zone.timestretch().maintain_formant());
            assert_eq!(zone.timestretch().orig_tempo(), 128);
        }
        assert!(!keymap.zone(0).unwrap().timestretch().orig_tempo_sync());
        assert!(keymap.zone(1).unwrap().timestretch().orig_tempo_sync());
    }
}
