use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioExtension {
    Wav,
    Mp3,
    Pcm,
    M4a,
    Aac,
}

/// Whether a payload carries a WAV header the rewriter can work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Wav,
    Other,
}

impl AudioExtension {
    pub const SUPPORTED: [AudioExtension; 5] = [
        AudioExtension::Wav,
        AudioExtension::Mp3,
        AudioExtension::Pcm,
        AudioExtension::M4a,
        AudioExtension::Aac,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioExtension::Wav => "wav",
            AudioExtension::Mp3 => "mp3",
            AudioExtension::Pcm => "pcm",
            AudioExtension::M4a => "m4a",
            AudioExtension::Aac => "aac",
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }

    pub fn container_kind(&self) -> ContainerKind {
        match self {
            AudioExtension::Wav => ContainerKind::Wav,
            _ => ContainerKind::Other,
        }
    }
}

impl FromStr for AudioExtension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wav" => Ok(AudioExtension::Wav),
            "mp3" => Ok(AudioExtension::Mp3),
            "pcm" => Ok(AudioExtension::Pcm),
            "m4a" => Ok(AudioExtension::M4a),
            "aac" => Ok(AudioExtension::Aac),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for AudioExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
