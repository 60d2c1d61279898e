mod audio_inspector;
mod part_source;
mod transfer_pipeline;
mod upload_session;

pub use audio_inspector::{AudioInspector, AudioValidationError, read_wav_header};
pub use part_source::{BytesPartSource, FilePartSource, PartSource};
pub use transfer_pipeline::{PipelineError, TransferPipeline};
pub use upload_session::{SessionState, TransferError, TransferStage, UploadSession};
