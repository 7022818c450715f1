//! Sample file bookkeeping.
//!
//! Three things must agree after every edit: the file list, the
//! `audio_labels` tree (one label per file, same order, keyed by logical
//! name) and the `sample_path` of every keyzone.

use log::{debug, warn};

use crate::audio::{self, AudioEncoder, SampleResource};
use crate::error::{CelError, Result};
use crate::fusion::FusionPatch;
use crate::tree::{Node, Tree};

use super::CelAudio;

impl CelAudio {
    fn check_file_index(&self, index: usize) -> Result<()> {
        if index < self.files.len() {
            Ok(())
        } else {
            Err(CelError::IndexOutOfRange {
                what: "audio file",
                index,
                len: self.files.len(),
            })
        }
    }

    /// Add a label for every file that lacks one. Returns how many were added.
    pub fn ensure_labels(&mut self) -> Result<usize> {
        let labels = self.patch.audio_labels()?;
        Ok(fill_missing_labels(
            labels,
            self.files.iter().map(SampleResource::logical_name),
        ))
    }

    /// Display label of the file at `index`, defaulting to its logical name.
    pub fn audio_label(&mut self, index: usize) -> Result<String> {
        self.check_file_index(index)?;
        let name = self.files[index].logical_name().to_string();
        let labels = self.patch.audio_labels()?;
        if !labels.contains_key(&name) {
            labels.push(Node::new(name.as_str(), name.as_str()));
        }
        Ok(labels.try_string(&name)?.clone())
    }

    pub fn set_audio_label(&mut self, index: usize, text: &str) -> Result<()> {
        self.check_file_index(index)?;
        let name = self.files[index].logical_name().to_string();
        *self.patch.audio_labels()?.try_string(&name)? = text.to_string();
        Ok(())
    }

    /// `(logical name, label)` for every file, in file order.
    pub fn audio_labels(&mut self) -> Result<Vec<(String, String)>> {
        (0..self.files.len())
            .map(|i| {
                let label = self.audio_label(i)?;
                Ok((self.files[i].logical_name().to_string(), label))
            })
            .collect()
    }

    /// Smallest `n` such that `<base>_<n>` names no existing file.
    fn free_sample_number(&self) -> usize {
        let base = self.sample_base();
        (0..)
            .find(|n| {
                let candidate = audio::sample_file_name(&audio::numbered_name(&base, *n));
                !self.files.iter().any(|f| f.file_name == candidate)
            })
            .unwrap_or(self.files.len())
    }

    /// Append a new sample cloned from the first file and return its index.
    ///
    /// The name reuses the smallest free number, so a gap left by an earlier
    /// removal is filled before the list grows past it.
    pub fn add_audio_file(&mut self) -> Result<usize> {
        self.ensure_labels()?;
        let logical = audio::numbered_name(&self.sample_base(), self.free_sample_number());
        let mut file = self
            .files
            .first()
            .cloned()
            .unwrap_or_else(|| SampleResource::new(&logical));
        file.rename(&logical);
        self.files.push(file);
        let labels = self.patch.audio_labels()?;
        match labels.find_child_mut(&logical) {
            Some(stale) => stale.value = logical.as_str().into(),
            None => labels.push(Node::new(logical.as_str(), logical.as_str())),
        }
        debug!("Added audio file {logical}");
        Ok(self.files.len() - 1)
    }

    /// Remove the sample at `selected` and return the selection to use afterwards.
    ///
    /// Survivors are renamed `<base>_<i>` in list order, their labels follow
    /// them, and every keyzone is re-pointed: a zone that referenced a
    /// surviving file follows it to its new name, any other zone falls back to
    /// file 0.
    pub fn remove_audio_file(&mut self, selected: usize) -> Result<usize> {
        if self.files.len() <= 1 {
            return Err(CelError::LastAudioFile);
        }
        self.check_file_index(selected)?;

        let base = self.sample_base();
        let removed = self.files[selected].logical_name().to_string();
        let survivors: Vec<&SampleResource> = self
            .files
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != selected)
            .map(|(_, f)| f)
            .collect();
        let old_logical: Vec<String> = survivors.iter().map(|f| f.logical_name().to_string()).collect();
        let old_names: Vec<String> = survivors.iter().map(|f| f.file_name.clone()).collect();
        let new_logical: Vec<String> = (0..survivors.len())
            .map(|i| audio::numbered_name(&base, i))
            .collect();
        let new_names: Vec<String> = new_logical.iter().map(|l| audio::sample_file_name(l)).collect();

        // Work on a copy of the patch; files and patch are committed together.
        let mut patch = self.patch.clone();
        let labels = patch.audio_labels()?;
        fill_missing_labels(labels, self.files.iter().map(SampleResource::logical_name));
        if let Some(pos) = labels.position(&removed) {
            labels.remove_at(pos);
        }
        let slots: Vec<Option<usize>> = old_logical.iter().map(|name| labels.position(name)).collect();
        for (slot, logical) in slots.into_iter().zip(&new_logical) {
            if let Some(label) = slot.and_then(|s| labels.node_at_mut(s)) {
                label.key = logical.clone();
            }
        }

        let fallback = &new_names[0];
        let mut keymap = patch.keymap()?;
        for z in 0..keymap.len() {
            let mut zone = keymap.zone(z)?;
            let path = zone.sample_path().to_string();
            match old_names.iter().position(|old| *old == path) {
                Some(j) => zone.set_sample_path(&new_names[j]),
                None => {
                    warn!(
                        "Keyzone {z} referenced '{path}', which no longer exists; using '{fallback}'"
                    );
                    zone.set_sample_path(fallback);
                }
            }
        }

        self.patch = patch;
        self.files.remove(selected);
        for (file, logical) in self.files.iter_mut().zip(&new_logical) {
            file.rename(logical);
        }
        debug!("Removed audio file {removed}");
        Ok(selected.min(self.files.len() - 1))
    }

    /// Replace the audio behind file `index` with freshly encoded data.
    ///
    /// The file keeps its name. With `replace_label` the label becomes the
    /// stem of `source_name`.
    pub fn replace_audio(
        &mut self,
        index: usize,
        encoder: &dyn AudioEncoder,
        raw: &[u8],
        source_name: &str,
        replace_label: bool,
    ) -> Result<()> {
        self.check_file_index(index)?;
        let encoded = encoder.encode(raw)?;
        if encoded.data.is_empty() {
            return Err(CelError::Encoder {
                reason: format!("no data produced for '{source_name}'"),
            });
        }
        let file = &mut self.files[index];
        file.data = encoded.data;
        file.sample_rate = encoded.sample_rate;
        file.sample_count = encoded.sample_count;
        if replace_label {
            let stem = audio::source_stem(source_name);
            self.set_audio_label(index, &stem)?;
        }
        debug!("Replaced audio of file {index} from {source_name}");
        Ok(())
    }
}

fn fill_missing_labels<'n>(labels: &mut Tree, names: impl IntoIterator<Item = &'n str>) -> usize {
    let mut added = 0;
    for name in names {
        if !labels.contains_key(name) {
            labels.push(Node::new(name, name));
            added += 1;
        }
    }
    added
}

/// Rebuild `audio_labels` for `files`, keeping labels whose file survived
/// under `previous` logical names.
pub(super) fn rebuild_labels(
    patch: &mut FusionPatch,
    files: &[SampleResource],
    previous: &[String],
) -> Result<()> {
    let labels = patch.audio_labels()?;
    let mut rebuilt = Tree::new();
    for (i, file) in files.iter().enumerate() {
        let logical = file.logical_name();
        let text = previous
            .get(i)
            .and_then(|p| labels.find_child(p))
            .and_then(|n| n.value.as_str())
            .unwrap_or(logical);
        rebuilt.push(Node::new(logical, text));
    }
    *labels = rebuilt;
    Ok(())
}
