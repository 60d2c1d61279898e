mod audio_extension;
mod audio_format;
mod audio_meta;
mod chunk_range;
mod credentials;
mod object_key;
mod request_id;
mod transfer_outcome;
mod wav_header;

pub use audio_extension::{AudioExtension, ContainerKind};
pub use audio_format::AudioFormat;
pub use audio_meta::{AudioMeta, MAX_AUDIO_FILE_BYTES};
pub use chunk_range::{ChunkRange, ChunkRanges, PartitionError, partition};
pub use credentials::TemporaryCredentials;
pub use object_key::{DEFAULT_KEY_PREFIX, ObjectKey};
pub use request_id::RequestId;
pub use transfer_outcome::{SplitOutcome, UploadOutcome};
pub use wav_header::{HeaderRewrite, WAV_HEADER_LEN, WavHeader, WavHeaderError, has_wav_magic};
