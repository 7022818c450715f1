//! Fusion patches.
//!
//! A `FusionPatch` owns the root tree of one fusion block and gives names to
//! the well-known sub-nodes: `keymap`, `audio_labels`, `edit_advanced` and the
//! first entry of `presets` (track gain and layering mode).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CelError, Result};
use crate::keyzone::Keymap;
use crate::tree::{Node, Tree, Value, ValueKind};

/// How overlapping keyzones are triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSelectMode {
    /// Every overlapping keyzone plays at once.
    #[default]
    Layers,
    /// One random keyzone, never the same twice in a row.
    Random,
    RandomWithRepetition,
    /// Keyzones on the same note play in turn.
    Cycle,
}

impl LayerSelectMode {
    pub const ALL: [LayerSelectMode; 4] = [
        LayerSelectMode::Layers,
        LayerSelectMode::Random,
        LayerSelectMode::RandomWithRepetition,
        LayerSelectMode::Cycle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerSelectMode::Layers => "layers",
            LayerSelectMode::Random => "random",
            LayerSelectMode::RandomWithRepetition => "random_with_repetition",
            LayerSelectMode::Cycle => "cycle",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for LayerSelectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The property tree of one fusion block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FusionPatch {
    root: Tree,
}

impl FusionPatch {
    pub fn new(root: Tree) -> Self {
        Self { root }
    }

    pub fn from_text(text: &str) -> Result<Self> {
        Ok(Self::new(Tree::from_text(text)?))
    }

    pub fn to_text(&self) -> String {
        self.root.to_text()
    }

    pub fn root(&self) -> &Tree {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Tree {
        &mut self.root
    }

    pub fn into_tree(self) -> Tree {
        self.root
    }

    /// The keyzone list, created empty when absent.
    pub fn keymap(&mut self) -> Result<Keymap<'_>> {
        Ok(Keymap::new(self.root.try_node("keymap")?))
    }

    /// Read-only view of the keyzone trees, without materializing anything.
    pub fn keymap_tree(&self) -> Option<&Tree> {
        self.root.find_child("keymap").and_then(|n| n.value.as_tree())
    }

    pub fn zone_count(&self) -> usize {
        self.keymap_tree().map_or(0, Tree::len)
    }

    pub fn audio_labels(&mut self) -> Result<&mut Tree> {
        self.root.try_node("audio_labels")
    }

    pub fn has_audio_labels(&self) -> bool {
        self.root.contains_key("audio_labels")
    }

    /// True when the patch is edited in advanced mode.
    pub fn is_advanced(&self) -> bool {
        self.root
            .find_child("edit_advanced")
            .and_then(|n| n.value.as_int())
            == Some(1)
    }

    pub fn set_advanced(&mut self, advanced: bool) -> Result<()> {
        *self.root.try_int("edit_advanced")? = i32::from(advanced);
        Ok(())
    }

    /// First entry of `presets`, created when the list is empty.
    pub fn preset_settings(&mut self) -> Result<&mut Tree> {
        let presets = self.root.try_node("presets")?;
        if presets.is_empty() {
            presets.push(Node::new("preset", Tree::new()));
        }
        match presets.node_at_mut(0) {
            Some(Node {
                value: Value::Tree(tree),
                ..
            }) => Ok(tree),
            Some(Node { key, value }) => Err(CelError::TypeMismatch {
                key: key.clone(),
                expected: ValueKind::Tree,
                found: value.kind(),
            }),
            None => Err(CelError::IndexOutOfRange {
                what: "preset",
                index: 0,
                len: 0,
            }),
        }
    }

    /// Whole-track gain in dB.
    pub fn track_gain(&mut self) -> Result<f32> {
        Ok(*self.preset_settings()?.try_float("volume")?)
    }

    pub fn set_track_gain(&mut self, gain: f32) -> Result<()> {
        *self.preset_settings()?.try_float("volume")? = gain;
        Ok(())
    }

    /// Current layering mode. An unknown value is reset to `layers`.
    pub fn layer_select_mode(&mut self) -> Result<LayerSelectMode> {
        let stored = self.preset_settings()?.try_string("layer_select_mode")?;
        match LayerSelectMode::parse(stored) {
            Some(mode) => Ok(mode),
            None => {
                log::debug!("Resetting unknown layer_select_mode '{stored}'");
                *stored = LayerSelectMode::Layers.as_str().to_string();
                Ok(LayerSelectMode::Layers)
            }
        }
    }

    pub fn set_layer_select_mode(&mut self, mode: LayerSelectMode) -> Result<()> {
        *self.preset_settings()?.try_string("layer_select_mode")? = mode.as_str().to_string();
        Ok(())
    }
}

impl FromStr for FusionPatch {
    type Err = CelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

impl From<Tree> for FusionPatch {
    fn from(root: Tree) -> Self {
        Self::new(root)
    }
}
