//! Upgrades for patches written before the editor's bookkeeping fields.
//!
//! Every field is inserted at the front of its parent, and only when it is
//! missing, so running a migration twice changes nothing.

use std::fmt;

use log::info;
use serde::Serialize;

use crate::audio;
use crate::error::Result;
use crate::fusion::FusionPatch;
use crate::keyzone::{KeymapPreset, ZoneShape, MAJOR_RANGE, MINOR_RANGE};
use crate::tree::{Node, Tree};

/// One inserted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum MigrationStep {
    EditAdvanced,
    AudioLabels { count: usize },
    ZoneLabel { zone: usize, label: String },
    KeymapPreset { zone: usize, preset: KeymapPreset },
    OrigTempoSync { zone: usize },
    SplitSingleZone,
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationStep::EditAdvanced => write!(f, "edit_advanced = 0"),
            MigrationStep::AudioLabels { count } => write!(f, "audio_labels ({count} label(s))"),
            MigrationStep::ZoneLabel { zone, label } => write!(f, "keyzone {zone}: zone_label = {label:?}"),
            MigrationStep::KeymapPreset { zone, preset } => {
                write!(f, "keyzone {zone}: keymap_preset = {} ({preset})", preset.index())
            }
            MigrationStep::OrigTempoSync { zone } => {
                write!(f, "keyzone {zone}: timestretch_settings.orig_tempo_sync = 1")
            }
            MigrationStep::SplitSingleZone => write!(f, "single keyzone split into Major/Minor"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub steps: Vec<MigrationStep>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Label a zone without one gets when the patch is loaded.
fn default_zone_label(index: usize, advanced: bool) -> String {
    match (advanced, index) {
        (true, _) => format!("Keyzone {index}"),
        (false, 0) => "Major".to_string(),
        (false, 1) => "Minor".to_string(),
        (false, _) => "UNKNOWN".to_string(),
    }
}

/// Bring `patch` up to date.
///
/// `file_names` are the cel part's sample files, in order; they seed
/// `audio_labels` with each file's logical name. When `advanced_labels` is
/// set and the patch is in advanced mode, unlabelled zones get
/// `Keyzone <i>`, otherwise `Major`/`Minor`/`UNKNOWN`.
pub fn migrate_patch<S: AsRef<str>>(
    patch: &mut FusionPatch,
    file_names: &[S],
    advanced_labels: bool,
) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();
    let root = patch.root_mut();

    if !root.contains_key("edit_advanced") {
        root.insert_front(Node::new("edit_advanced", 0));
        report.steps.push(MigrationStep::EditAdvanced);
    }
    let advanced = advanced_labels && patch.is_advanced();

    let mut keymap = patch.keymap()?;
    for index in 0..keymap.len() {
        let zone = keymap.zone_tree_mut(index)?;
        if !zone.contains_key("zone_label") {
            let label = default_zone_label(index, advanced);
            zone.insert_front(Node::new("zone_label", label.as_str()));
            report.steps.push(MigrationStep::ZoneLabel { zone: index, label });
        }
        if !zone.contains_key("keymap_preset") {
            let preset = KeymapPreset::classify(&ZoneShape::read(zone));
            zone.insert_front(Node::new("keymap_preset", preset.index()));
            report.steps.push(MigrationStep::KeymapPreset { zone: index, preset });
        }
    }

    if !patch.has_audio_labels() {
        let labels: Tree = file_names
            .iter()
            .map(|name| {
                let logical = audio::logical_name(name.as_ref());
                Node::new(logical, logical)
            })
            .collect();
        let count = labels.len();
        patch.root_mut().insert_front(Node::new("audio_labels", labels));
        report.steps.push(MigrationStep::AudioLabels { count });
    }

    let mut keymap = patch.keymap()?;
    for index in 0..keymap.len() {
        if keymap.zone(index)?.timestretch().ensure_orig_tempo_sync() {
            report.steps.push(MigrationStep::OrigTempoSync { zone: index });
        }
    }

    if !report.is_empty() {
        info!("Migrated patch: {} field(s) added", report.len());
    }
    Ok(report)
}

/// Turn a one-zone keymap into the Major/Minor pair: the zone is duplicated,
/// the first copy stops at note 71 and the second covers 72..=127 rooted at
/// 84. Returns false when the keymap does not have exactly one zone.
pub fn split_single_zone(patch: &mut FusionPatch) -> Result<bool> {
    let mut keymap = patch.keymap()?;
    if keymap.len() != 1 {
        return Ok(false);
    }
    keymap.add_zone(0)?;
    let (_, _, major_max) = MAJOR_RANGE;
    let (minor_min, minor_root, _) = MINOR_RANGE;
    *keymap.zone_tree_mut(0)?.try_int("max_note")? = major_max;
    let minor = keymap.zone_tree_mut(1)?;
    *minor.try_int("root_note")? = minor_root;
    *minor.try_int("min_note")? = minor_min;

    for (index, label) in ["Major", "Minor"].into_iter().enumerate() {
        let mut zone = keymap.zone(index)?;
        zone.set_label(label);
        let preset = zone.classify();
        zone.select_preset(preset);
    }
    info!("Split single keyzone into Major/Minor ranges");
    Ok(true)
}
