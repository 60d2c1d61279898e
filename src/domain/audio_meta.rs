use std::path::PathBuf;

use super::{AudioExtension, ContainerKind, WAV_HEADER_LEN, WavHeader};

/// Largest file accepted for transfer: 5 GiB.
pub const MAX_AUDIO_FILE_BYTES: u64 = 5 * 1024 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioMeta {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub extension: AudioExtension,
    pub is_wav_container: bool,
    pub channels: Option<u16>,
    pub sample_rate_hz: Option<u32>,
    pub bits_per_sample: Option<u16>,
    pub data_size_bytes: Option<u64>,
    pub header: Option<WavHeader>,
}

impl AudioMeta {
    /// Metadata for a supported non-WAV container: size and extension only.
    pub fn opaque(path: PathBuf, size_bytes: u64, extension: AudioExtension) -> Self {
        Self {
            path,
            size_bytes,
            extension,
            is_wav_container: false,
            channels: None,
            sample_rate_hz: None,
            bits_per_sample: None,
            data_size_bytes: None,
            header: None,
        }
    }

    pub fn wav(path: PathBuf, size_bytes: u64, header: WavHeader) -> Self {
        Self {
            path,
            size_bytes,
            extension: AudioExtension::Wav,
            is_wav_container: true,
            channels: Some(header.channels()),
            sample_rate_hz: Some(header.sample_rate()),
            bits_per_sample: Some(header.bits_per_sample()),
            data_size_bytes: Some(size_bytes.saturating_sub(WAV_HEADER_LEN as u64)),
            header: Some(header),
        }
    }

    pub fn container_kind(&self) -> ContainerKind {
        if self.is_wav_container {
            ContainerKind::Wav
        } else {
            ContainerKind::Other
        }
    }
}
