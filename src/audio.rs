//! Audio sample resources and naming conventions.
//!
//! Sample files inside a package are named `C:/<logical>.mogg`. Keyzones store
//! the full file name in `sample_path`; labels are keyed by the logical name.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const SAMPLE_PREFIX: &str = "C:/";
pub const SAMPLE_SUFFIX: &str = ".mogg";

/// Full package file name for a logical sample name.
pub fn sample_file_name(logical: &str) -> String {
    format!("{SAMPLE_PREFIX}{logical}{SAMPLE_SUFFIX}")
}

/// Logical name of a package file name. Names that do not follow the
/// convention are returned unchanged.
pub fn logical_name(file_name: &str) -> &str {
    file_name
        .strip_prefix(SAMPLE_PREFIX)
        .and_then(|s| s.strip_suffix(SAMPLE_SUFFIX))
        .unwrap_or(file_name)
}

/// `<short>_<n>`, the logical name of the n-th sample of a cel.
pub fn numbered_name(short_name: &str, n: usize) -> String {
    format!("{short_name}_{n}")
}

/// File stem of an imported source file, used as its display label.
pub fn source_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// An encoded audio sample stored behind a file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleResource {
    pub file_name: String,
    pub sample_rate: u32,
    pub sample_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
}

impl SampleResource {
    pub fn new(logical: &str) -> Self {
        Self {
            file_name: sample_file_name(logical),
            sample_rate: 48000,
            sample_count: 0,
            data: Vec::new(),
        }
    }

    pub fn logical_name(&self) -> &str {
        logical_name(&self.file_name)
    }

    pub fn rename(&mut self, logical: &str) {
        self.file_name = sample_file_name(logical);
    }
}

/// Output of an [`AudioEncoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSample {
    pub data: Vec<u8>,
    pub sample_rate: u32,
    pub sample_count: u32,
}

/// Converts raw input audio into the encrypted package format.
///
/// Implemented outside this crate; the cel only stores what it returns.
pub trait AudioEncoder {
    fn encode(&self, raw: &[u8]) -> Result<EncodedSample>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_convention() {
        assert_eq!(sample_file_name("song_0"), "C:/song_0.mogg");
        assert_eq!(logical_name("C:/song_0.mogg"), "song_0");
        assert_eq!(logical_name("plain"), "plain");
        assert_eq!(numbered_name("song_trans", 2), "song_trans_2");
    }

    #[test]
    fn test_source_stem() {
        assert_eq!(source_stem("/music/Bass Loop.ogg"), "Bass Loop");
        assert_eq!(source_stem("lead.ogg"), "lead");
    }

    #[test]
    fn test_rename_keeps_payload() {
        let mut sample = SampleResource::new("a_0");
        sample.data = vec![0x0b, 1, 2];
        sample.rename("a_1");
        assert_eq!(sample.file_name, "C:/a_1.mogg");
        assert_eq!(sample.logical_name(), "a_1");
        assert_eq!(sample.data, vec![0x0b, 1, 2]);
    }
}
