use super::AudioFormat;

pub const WAV_HEADER_LEN: usize = 44;

const RIFF_TAG: &[u8; 4] = b"RIFF";
const WAVE_TAG: &[u8; 4] = b"WAVE";
const PCM_FMT_CHUNK_SIZE: u32 = 16;

const RIFF_SIZE_OFFSET: usize = 4;
const FMT_CHUNK_SIZE_OFFSET: usize = 16;
const CHANNELS_OFFSET: usize = 22;
const SAMPLE_RATE_OFFSET: usize = 24;
const BYTE_RATE_OFFSET: usize = 28;
const BLOCK_ALIGN_OFFSET: usize = 32;
const BITS_PER_SAMPLE_OFFSET: usize = 34;
const DATA_SIZE_OFFSET: usize = 40;

/// Canonical 44-byte little-endian PCM WAV header.
///
/// The raw bytes are kept verbatim so that a rewrite only touches the
/// fields it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader([u8; WAV_HEADER_LEN]);

/// Target of a [`WavHeader::rewrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRewrite {
    /// New sample format; the RIFF size is derived from the size of the whole file.
    Resample {
        format: AudioFormat,
        total_file_size: u64,
    },
    /// New data region length for a standalone part. Format fields stay untouched.
    Resize { data_size: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WavHeaderError {
    #[error("malformed header: expected {WAV_HEADER_LEN} bytes, got {available}")]
    MalformedHeader { available: usize },
    #[error("invalid magic: missing RIFF/WAVE tags")]
    InvalidMagic,
}

impl WavHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, WavHeaderError> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(WavHeaderError::MalformedHeader {
                available: bytes.len(),
            });
        }

        let mut raw = [0u8; WAV_HEADER_LEN];
        raw.copy_from_slice(&bytes[..WAV_HEADER_LEN]);

        if !has_wav_magic(&raw) {
            return Err(WavHeaderError::InvalidMagic);
        }

        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; WAV_HEADER_LEN] {
        &self.0
    }

    pub fn riff_size(&self) -> u32 {
        self.read_u32(RIFF_SIZE_OFFSET)
    }

    pub fn fmt_chunk_size(&self) -> u32 {
        self.read_u32(FMT_CHUNK_SIZE_OFFSET)
    }

    pub fn channels(&self) -> u16 {
        self.read_u16(CHANNELS_OFFSET)
    }

    pub fn sample_rate(&self) -> u32 {
        self.read_u32(SAMPLE_RATE_OFFSET)
    }

    pub fn byte_rate(&self) -> u32 {
        self.read_u32(BYTE_RATE_OFFSET)
    }

    pub fn block_align(&self) -> u16 {
        self.read_u16(BLOCK_ALIGN_OFFSET)
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.read_u16(BITS_PER_SAMPLE_OFFSET)
    }

    pub fn data_size(&self) -> u32 {
        self.read_u32(DATA_SIZE_OFFSET)
    }

    /// Produces a new header for the given target. Bytes outside the updated
    /// fields are copied from `self` unchanged.
    pub fn rewrite(&self, target: HeaderRewrite) -> WavHeader {
        let mut header = *self;

        match target {
            HeaderRewrite::Resample {
                format,
                total_file_size,
            } => {
                let riff_size = total_file_size.saturating_sub(8).min(u32::MAX as u64) as u32;

                header.write_u16(CHANNELS_OFFSET, format.channels);
                header.write_u32(SAMPLE_RATE_OFFSET, format.sample_rate_hz);
                header.write_u32(BYTE_RATE_OFFSET, format.byte_rate());
                header.write_u16(BLOCK_ALIGN_OFFSET, format.block_align());
                header.write_u16(BITS_PER_SAMPLE_OFFSET, format.bits_per_sample);
                header.write_u32(FMT_CHUNK_SIZE_OFFSET, PCM_FMT_CHUNK_SIZE);
                header.write_u32(RIFF_SIZE_OFFSET, riff_size);
            }
            HeaderRewrite::Resize { data_size } => {
                header.write_u32(DATA_SIZE_OFFSET, data_size);
                header.write_u32(RIFF_SIZE_OFFSET, data_size.saturating_add(36));
            }
        }

        header
    }

    fn read_u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.0[offset], self.0[offset + 1]])
    }

    fn read_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.0[offset],
            self.0[offset + 1],
            self.0[offset + 2],
            self.0[offset + 3],
        ])
    }

    fn write_u16(&mut self, offset: usize, value: u16) {
        self.0[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, offset: usize, value: u32) {
        self.0[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// True when bytes 0..4 read `RIFF` and bytes 8..12 read `WAVE`.
pub fn has_wav_magic(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == RIFF_TAG && &bytes[8..12] == WAVE_TAG
}
