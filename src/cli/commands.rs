//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::chords::{convert_mode, ChordMode, ConversionStyle};
use crate::config::EditorConfig;
use crate::fusion::FusionPatch;
use crate::keyzone::{NoteField, VelocityBound};
use crate::midi::{sync_loop_length, MidiFileResource};
use crate::migration::{migrate_patch, split_single_zone, MigrationStep};
use crate::tree::Tree;

const FUSION_EXTENSION: &str = "fusion";

fn read_patch(path: &Path) -> Result<(String, FusionPatch)> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let patch = FusionPatch::from_text(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok((text, patch))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn read_midi(path: &Path) -> Result<MidiFileResource> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    MidiFileResource::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn write_midi(path: &Path, midi: &MidiFileResource) -> Result<()> {
    write_text(path, &midi.to_json()?)
}

/// Rewrite a fusion file canonically, or only check it.
pub fn fmt(path: &Path, check: bool) -> Result<()> {
    let (text, patch) = read_patch(path)?;
    let canonical = patch.to_text();
    if text == canonical {
        println!("{} is formatted", path.display());
        return Ok(());
    }
    if check {
        bail!("{} is not in canonical layout", path.display());
    }
    write_text(path, &canonical)?;
    println!("Formatted {}", path.display());
    Ok(())
}

/// Print a summary of a fusion file.
pub fn inspect(path: &Path, config: &EditorConfig) -> Result<()> {
    let (_, mut patch) = read_patch(path)?;
    let advanced = patch.is_advanced();
    let labels: Vec<(String, String)> = patch
        .root()
        .find_child("audio_labels")
        .and_then(|n| n.value.as_tree())
        .map(|t: &Tree| {
            t.iter()
                .map(|n| (n.key.clone(), n.value.as_str().unwrap_or_default().to_string()))
                .collect()
        })
        .unwrap_or_default();

    println!("File: {}", path.display());
    println!("Mode: {}", if advanced { "advanced" } else { "simple" });
    println!("Layer select: {}", patch.layer_select_mode()?);
    println!("Track gain: {:.2}", patch.track_gain()?);

    println!("Audio labels:");
    if labels.is_empty() {
        println!("  (none)");
    }
    for (name, label) in &labels {
        println!("  {name}: {label}");
    }

    let mut keymap = patch.keymap()?;
    println!("Keyzones ({}):", keymap.len());
    println!("{:-<72}", "");
    for index in 0..keymap.len() {
        let mut zone = keymap.zone(index)?;
        let stored = zone.preset();
        let classified = zone.classify();
        let label = zone.label().to_string();
        let notes = (
            zone.note(NoteField::Min),
            zone.note(NoteField::Root),
            zone.note(NoteField::Max),
        );
        let percent = config.use_percent_velocity;
        let velocity = (
            zone.velocity_display(VelocityBound::Min, percent),
            zone.velocity_display(VelocityBound::Max, percent),
        );
        let path = zone.sample_path().to_string();
        println!(
            "  {index}: {label:<16} preset {stored:<7} notes {}..{} root {} vel {}..{} {path}",
            notes.0, notes.2, notes.1, velocity.0, velocity.1
        );
        if classified != stored {
            warn!("Keyzone {index} is stored as {stored} but its shape is {classified}");
        }
    }
    Ok(())
}

/// Add missing bookkeeping fields to a fusion file.
pub fn migrate(path: &Path, advanced: bool, audio: &[String], split: bool) -> Result<()> {
    let (text, mut patch) = read_patch(path)?;
    let mut report = migrate_patch(&mut patch, audio, advanced)?;
    if split && !patch.is_advanced() && split_single_zone(&mut patch)? {
        report.steps.push(MigrationStep::SplitSingleZone);
    }

    if report.is_empty() {
        println!("{} is up to date", path.display());
        return Ok(());
    }
    for step in &report.steps {
        println!("  + {step}");
    }
    let migrated = patch.to_text();
    if migrated != text {
        write_text(path, &migrated)?;
    }
    println!("Migrated {} ({} change(s))", path.display(), report.len());
    Ok(())
}

/// Parse, print and re-parse every fusion file below `dir`.
pub fn check(dir: &Path) -> Result<()> {
    let mut checked = 0usize;
    let mut skipped = 0usize;
    let mut failures = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("reading {}", dir.display()));
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                skipped += 1;
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(FUSION_EXTENSION)
        {
            continue;
        }
        checked += 1;
        debug!("Checking {}", path.display());
        if let Err(e) = check_round_trip(path) {
            warn!("{}: {e:#}", path.display());
            failures.push(path.to_path_buf());
        }
    }

    println!(
        "Checked {checked} fusion file(s), {} failure(s), {skipped} skipped",
        failures.len()
    );
    for path in &failures {
        println!("  FAIL {}", path.display());
    }
    if !failures.is_empty() {
        bail!("{} fusion file(s) failed the round trip", failures.len());
    }
    Ok(())
}

fn check_round_trip(path: &Path) -> Result<()> {
    let (_, patch) = read_patch(path)?;
    let reparsed = FusionPatch::from_text(&patch.to_text()).context("re-parsing canonical text")?;
    if reparsed != patch {
        bail!("tree changed after a write/read cycle");
    }
    Ok(())
}

/// Convert a MIDI resource's chords to `target`.
pub fn convert_chords(
    path: &Path,
    target: ChordMode,
    swap: bool,
    output: Option<&Path>,
    config: &EditorConfig,
) -> Result<()> {
    let mut midi = read_midi(path)?;
    let style = ConversionStyle::from_swap_flag(swap || config.swap_borrowed_chords);
    midi.chords = convert_mode(&midi.chords, target, style);

    let out = output.unwrap_or(path);
    write_midi(out, &midi)?;
    info!("Converted {} chord(s) to {target} ({style:?})", midi.chords.len());
    println!("Wrote {}", out.display());
    Ok(())
}

/// Set the loop length of a major/minor MIDI pair.
pub fn sync_length(major_path: &Path, minor_path: &Path, length: i32) -> Result<()> {
    if length <= 0 {
        bail!("loop length must be positive, got {length}");
    }
    let mut major = read_midi(major_path)?;
    let mut minor = read_midi(minor_path)?;

    let report = sync_loop_length(&mut major, &mut minor, length);
    write_midi(major_path, &major)?;
    write_midi(minor_path, &minor)?;
    println!("{report}");
    Ok(())
}

pub fn show_config(path: &Path, config: &EditorConfig) -> Result<()> {
    println!("Config: {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
