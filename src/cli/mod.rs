//! CLI Module
//!
//! Command-line interface for inspecting and repairing cel data files.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::chords::ChordMode;

/// Default config file, next to where the tool is run.
pub const DEFAULT_CONFIG_FILE: &str = "celforge.json";

/// Celforge - custom song cel editor toolkit
#[derive(Parser, Debug)]
#[command(name = "celforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Editor config file (created with defaults when missing)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Major,
    Minor,
}

impl From<ModeArg> for ChordMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Major => ChordMode::Major,
            ModeArg::Minor => ChordMode::Minor,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite a fusion file in canonical layout
    #[command(name = "fmt")]
    Fmt {
        /// Fusion text file
        file: PathBuf,

        /// Only report whether the file is already canonical
        #[arg(long)]
        check: bool,
    },

    /// Print the keyzones, labels and settings of a fusion file
    #[command(name = "inspect")]
    Inspect {
        /// Fusion text file
        file: PathBuf,
    },

    /// Add the editor's bookkeeping fields to a legacy fusion file
    #[command(name = "migrate")]
    Migrate {
        /// Fusion text file, rewritten in place
        file: PathBuf,

        /// Label unlabelled zones "Keyzone <i>" when the patch is advanced
        #[arg(long)]
        advanced: bool,

        /// Sample file names of the cel part, in order
        #[arg(long = "audio", num_args = 1..)]
        audio: Vec<String>,

        /// Split a single keyzone into the Major/Minor pair
        #[arg(long)]
        split_single_zone: bool,
    },

    /// Verify that every fusion file under a directory survives a round trip
    #[command(name = "check")]
    Check {
        /// Directory to scan for *.fusion files
        dir: PathBuf,
    },

    /// Convert the chords of a MIDI resource to the other mode
    #[command(name = "convert-chords")]
    ConvertChords {
        /// MIDI resource JSON
        midi: PathBuf,

        /// Target mode
        #[arg(long, value_enum)]
        to: ModeArg,

        /// Swap borrowed chords too (defaults to the config setting)
        #[arg(long)]
        swap: bool,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Set the loop length of a cel's major and minor MIDI resources
    #[command(name = "sync-length")]
    SyncLength {
        /// Major MIDI resource JSON
        #[arg(long)]
        major: PathBuf,

        /// Minor MIDI resource JSON
        #[arg(long)]
        minor: PathBuf,

        /// Loop length in ticks
        #[arg(long)]
        length: i32,
    },

    /// Print the editor config
    #[command(name = "config")]
    ShowConfig,
}
