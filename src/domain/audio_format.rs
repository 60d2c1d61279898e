use std::fmt;

/// Sample layout a recording is rewritten to before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl AudioFormat {
    pub fn new(sample_rate_hz: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate_hz,
            channels,
            bits_per_sample,
        }
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate_hz
            .saturating_mul(self.channels as u32)
            .saturating_mul(self.bits_per_sample as u32)
            / 8
    }

    pub fn block_align(&self) -> u16 {
        ((self.channels as u32 * self.bits_per_sample as u32) / 8) as u16
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::new(16_000, 1, 16)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz / {} ch / {} bit",
            self.sample_rate_hz, self.channels, self.bits_per_sample
        )
    }
}
