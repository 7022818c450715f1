//! Editor preferences, persisted as JSON.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::cel::validate_short_name;
use crate::error::{CelError, Result};
use crate::fusion::FusionPatch;

pub const DEFAULT_SHORT_NAME: &str = "custom_song";

/// Cel instruments, in the order the gain arrays use.
pub const INSTRUMENTS: [&str; 4] = ["beat", "bass", "loop", "lead"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Show and enter velocities as 0..=100 instead of 0..=127.
    pub use_percent_velocity: bool,
    pub default_short_name: String,
    /// List the current mode's chords before the opposite mode's.
    pub opposite_chords_after_cur_mode: bool,
    pub swap_borrowed_chords: bool,
    pub disable_clamping: bool,
    /// Track gain given to a new disc, per instrument.
    pub disc_gains: [f32; 4],
    /// Track gain given to a new riser, per instrument.
    pub riser_gains: [f32; 4],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            use_percent_velocity: false,
            default_short_name: DEFAULT_SHORT_NAME.to_string(),
            opposite_chords_after_cur_mode: true,
            swap_borrowed_chords: false,
            disable_clamping: false,
            disc_gains: [0.0; 4],
            riser_gains: [0.0; 4],
        }
    }
}

impl EditorConfig {
    /// Load the config, writing the defaults first when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|e| CelError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config: EditorConfig = serde_json::from_str(&content)?;
        let name = config.default_short_name.clone();
        if let Err(e) = config.set_default_short_name(&name) {
            warn!("{e}; using '{DEFAULT_SHORT_NAME}'");
            config.default_short_name = DEFAULT_SHORT_NAME.to_string();
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CelError::FileWriteError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| CelError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// An empty name resets to `custom_song`.
    pub fn set_default_short_name(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            self.default_short_name = DEFAULT_SHORT_NAME.to_string();
            return Ok(());
        }
        validate_short_name(name)?;
        self.default_short_name = name.to_string();
        Ok(())
    }

    /// Whether song BPM should be clamped to the game's range.
    pub fn clamp_bpm(&self) -> bool {
        !self.disable_clamping
    }

    /// Seed the track gain of a new cel's disc and riser patches.
    pub fn apply_default_gains(
        &self,
        cel_index: usize,
        disc: &mut FusionPatch,
        riser: &mut FusionPatch,
    ) -> Result<()> {
        let out_of_range = || CelError::IndexOutOfRange {
            what: "cel",
            index: cel_index,
            len: INSTRUMENTS.len(),
        };
        let disc_gain = *self.disc_gains.get(cel_index).ok_or_else(out_of_range)?;
        let riser_gain = *self.riser_gains.get(cel_index).ok_or_else(out_of_range)?;
        disc.set_track_gain(disc_gain)?;
        riser.set_track_gain(riser_gain)?;
        info!(
            "Default gains for {} cel: disc {disc_gain}, riser {riser_gain}",
            INSTRUMENTS[cel_index]
        );
        Ok(())
    }
}
