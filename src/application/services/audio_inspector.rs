use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

use crate::domain::{
    AudioExtension, AudioMeta, ContainerKind, MAX_AUDIO_FILE_BYTES, WAV_HEADER_LEN, WavHeader,
    WavHeaderError,
};

/// Checks that a local file is an audio payload the pipeline can transfer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioInspector;

impl AudioInspector {
    pub fn new() -> Self {
        Self
    }

    /// Existence, size limit, extension and, for `wav`, the 44-byte header.
    pub async fn validate(&self, path: &Path) -> Result<AudioMeta, AudioValidationError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AudioValidationError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(AudioValidationError::Io(e)),
        };

        if !metadata.is_file() {
            return Err(AudioValidationError::NotAFile(path.to_path_buf()));
        }

        let size_bytes = metadata.len();
        if size_bytes > MAX_AUDIO_FILE_BYTES {
            return Err(AudioValidationError::TooLarge {
                size_bytes,
                max_bytes: MAX_AUDIO_FILE_BYTES,
            });
        }

        let extension = AudioExtension::from_path(path)
            .map_err(AudioValidationError::UnsupportedFormat)?;

        let meta = match extension.container_kind() {
            ContainerKind::Wav => {
                let header = read_wav_header(path).await?;
                AudioMeta::wav(path.to_path_buf(), size_bytes, header)
            }
            ContainerKind::Other => AudioMeta::opaque(path.to_path_buf(), size_bytes, extension),
        };

        tracing::debug!(
            path = %path.display(),
            size_bytes,
            extension = %meta.extension,
            channels = ?meta.channels,
            sample_rate_hz = ?meta.sample_rate_hz,
            "Audio file validated"
        );

        Ok(meta)
    }
}

/// Reads and parses the first 44 bytes of `path`.
pub async fn read_wav_header(path: &Path) -> Result<WavHeader, AudioValidationError> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut buf = Vec::with_capacity(WAV_HEADER_LEN);
    (&mut file)
        .take(WAV_HEADER_LEN as u64)
        .read_to_end(&mut buf)
        .await?;

    Ok(WavHeader::parse(&buf)?)
}

#[derive(Debug, thiserror::Error)]
pub enum AudioValidationError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("file too large: {size_bytes} bytes exceeds the {max_bytes} byte limit")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
    #[error("unsupported audio format: '{0}', supported: wav, mp3, pcm, m4a, aac")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Header(#[from] WavHeaderError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
