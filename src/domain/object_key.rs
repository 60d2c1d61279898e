use std::fmt;
use std::path::Path;

use super::RequestId;

pub const DEFAULT_KEY_PREFIX: &str = "audio";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// `{prefix}/{request_id}/part_{n}.wav` with a 1-based `n`.
    pub fn for_split_part(prefix: &str, request_id: &RequestId, chunk_index: u64) -> Self {
        Self(format!(
            "{}/{}/part_{}.wav",
            prefix.trim_end_matches('/'),
            request_id.as_str(),
            chunk_index + 1
        ))
    }

    /// `{prefix}/{unix_ts}_{file_stem}.wav`, used when the caller names no key.
    pub fn for_upload(prefix: &str, file_path: &Path, unix_ts: i64) -> Self {
        let stem = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("audio");
        Self(format!(
            "{}/{}_{}.wav",
            prefix.trim_end_matches('/'),
            unix_ts,
            stem
        ))
    }

    /// The bare file name, for single-put uploads of already-processed files.
    pub fn for_file_name(file_path: &Path) -> Self {
        let name = file_path
            .file_name()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("audio");
        Self(name.to_string())
    }

    pub fn from_raw(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        let trimmed = key.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err("object key must not be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
