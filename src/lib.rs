//! Celforge - data layer for custom song cels
//!
//! A cel is a section of a custom song package: a disc and a riser, each a
//! set of audio samples mapped by a fusion patch, plus a major and a minor
//! MIDI resource that loop over the same length.
//!
//! # Architecture
//!
//! - `tree`: the schema-less property tree behind every fusion block
//! - `fusion`, `keyzone`: typed views over a patch and its keyzones
//! - `cel`: sample bookkeeping and the simple/advanced editing modes
//! - `chords`, `pickups`, `time`: timeline editing in ticks and beats
//! - `midi`: loop-length synchronization across the major/minor resources
//! - `migration`, `config`: legacy upgrades and editor preferences

pub mod audio;
pub mod cel;
pub mod chords;
pub mod cli;
pub mod config;
pub mod error;
pub mod fusion;
pub mod keyzone;
pub mod midi;
pub mod migration;
pub mod pickups;
pub mod time;
pub mod tree;

pub use audio::{AudioEncoder, EncodedSample, SampleResource};
pub use cel::{CelAudio, CelData, CelPart};
pub use chords::{ChordClipboard, ChordEvent, ChordMode, ChordTimeline, ConversionStyle};
pub use config::EditorConfig;
pub use error::{CelError, Result};
pub use fusion::{FusionPatch, LayerSelectMode};
pub use keyzone::{Keymap, KeymapPreset, Keyzone};
pub use midi::{sync_loop_length, LoopLength, LoopSyncReport, MidiFileResource};
pub use migration::{migrate_patch, MigrationReport};
pub use pickups::Pickups;
pub use tree::{Node, Tree, Value, ValueKind};
