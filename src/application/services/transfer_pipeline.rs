use std::io::{self, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use chrono::Utc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufWriter};
use uuid::Uuid;

use crate::application::ports::{
    CredentialBroker, CredentialError, ProgressEvent, ProgressSink, SilentProgress,
    StoreConnector, TransferStore, TransferStoreError,
};
use crate::domain::{
    AudioFormat, AudioMeta, ContainerKind, HeaderRewrite, ObjectKey, PartitionError, RequestId,
    SplitOutcome, TemporaryCredentials, UploadOutcome, WAV_HEADER_LEN, WavHeader, WavHeaderError,
    has_wav_magic, partition,
};
use crate::presentation::config::TransferSettings;

use super::{
    AudioInspector, AudioValidationError, FilePartSource, PartSource, SessionState,
    TransferError, TransferStage, UploadSession, read_wav_header,
};

/// Largest data region a standalone WAV part can describe in its header.
const MAX_WAV_DATA_BYTES: u64 = (u32::MAX - 36) as u64;

/// Orchestrates validation, header rewriting, partitioning and remote
/// transfer. Credentials are fetched once per invocation and dropped with it.
pub struct TransferPipeline {
    inspector: AudioInspector,
    broker: Arc<dyn CredentialBroker>,
    connector: Arc<dyn StoreConnector>,
    progress: Arc<dyn ProgressSink>,
}

impl TransferPipeline {
    pub fn new(broker: Arc<dyn CredentialBroker>, connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            inspector: AudioInspector::new(),
            broker,
            connector,
            progress: Arc::new(SilentProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Rewrites the header of any input carrying RIFF/WAVE magic to `target`,
    /// whatever its extension, stages the result in a scratch directory and
    /// uploads it as a multipart transfer. Other inputs pass through
    /// unchanged. The scratch directory is removed on every exit path.
    pub async fn resample_and_upload(
        &self,
        path: &Path,
        object_key: Option<ObjectKey>,
        target: AudioFormat,
        settings: &TransferSettings,
    ) -> Result<UploadOutcome, PipelineError> {
        let meta = self.inspector.validate(path).await?;

        let scratch = create_scratch_dir(settings)?;
        let staged_path = scratch
            .path()
            .join(format!("processed_{}.wav", Uuid::new_v4().simple()));

        let result = async {
            let staged_size = stage_resampled(&meta, target, &staged_path).await?;
            let key = object_key.unwrap_or_else(|| default_key(settings, path));

            tracing::info!(
                source = %path.display(),
                staged_bytes = staged_size,
                target = %target,
                object_key = %key,
                "Resampled audio staged for upload"
            );

            let store = self.connect_store().await?;
            self.multipart_upload(
                store,
                &key,
                &staged_path,
                staged_size,
                settings.resample_part_size_bytes,
                settings,
            )
            .await
        }
        .await;

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            tracing::warn!(
                error = %e,
                path = %scratch_path.display(),
                "Failed to remove scratch directory"
            );
        }

        result
    }

    /// Splits a WAV recording into independently playable parts of at most
    /// `split_part_data_bytes` of audio data each and uploads every part as
    /// its own object under `{prefix}/{request_id}/part_{n}.wav`.
    pub async fn split_and_upload(
        &self,
        path: &Path,
        request_id: &RequestId,
        settings: &TransferSettings,
    ) -> Result<SplitOutcome, PipelineError> {
        let meta = self.inspector.validate(path).await?;

        let header = match meta.container_kind() {
            ContainerKind::Wav => match meta.header {
                Some(h) => h,
                None => read_wav_header(path).await?,
            },
            // Non-WAV extensions only pass if the bytes still carry a WAV header.
            ContainerKind::Other => read_wav_header(path).await?,
        };

        if settings.split_part_data_bytes > MAX_WAV_DATA_BYTES {
            return Err(PipelineError::Partition(PartitionError::PartTooLarge(
                settings.split_part_data_bytes,
            )));
        }

        let data_size = meta
            .data_size_bytes
            .unwrap_or_else(|| meta.size_bytes.saturating_sub(WAV_HEADER_LEN as u64));
        let ranges = partition(data_size, settings.split_part_data_bytes)?;
        let total = ranges.part_count();

        tracing::info!(
            source = %path.display(),
            request_id = %request_id,
            data_bytes = data_size,
            channels = header.channels(),
            sample_rate_hz = header.sample_rate(),
            bits_per_sample = header.bits_per_sample(),
            parts = total,
            "Splitting audio file"
        );

        let store = self.connect_store().await?;
        let mut source = FilePartSource::open_at(path, WAV_HEADER_LEN as u64).await?;

        let mut object_keys = Vec::with_capacity(total as usize);
        let mut urls = Vec::with_capacity(total as usize);

        self.progress.report(ProgressEvent::Start {
            label: format!("split {}", request_id),
            total_parts: total,
        });

        for range in ranges {
            let part_number = range.part_number() as u32;
            let data = source.read_range(&range).await?;

            let part_header = header.rewrite(HeaderRewrite::Resize {
                data_size: range.length as u32,
            });
            let mut buf = BytesMut::with_capacity(WAV_HEADER_LEN + data.len());
            buf.extend_from_slice(part_header.as_bytes());
            buf.extend_from_slice(&data);

            let key = ObjectKey::for_split_part(&settings.key_prefix, request_id, range.index);

            store
                .put_object(&key, buf.freeze())
                .await
                .map_err(TransferError::at(TransferStage::Part(part_number)))?;

            verify_exists(store.as_ref(), &key).await?;

            let url = store
                .signed_url(&key, settings.url_ttl())
                .await
                .map_err(TransferError::at(TransferStage::Sign))?;

            tracing::info!(
                request_id = %request_id,
                object_key = %key,
                part = part_number,
                total,
                bytes = range.length + WAV_HEADER_LEN as u64,
                "Split part uploaded"
            );

            self.progress.report(ProgressEvent::Advance {
                part_number: range.part_number(),
                bytes: range.length + WAV_HEADER_LEN as u64,
            });

            object_keys.push(key);
            urls.push(url);
        }

        self.progress.report(ProgressEvent::Finish);

        tracing::info!(
            request_id = %request_id,
            total_parts = urls.len(),
            "Split and upload completed"
        );

        Ok(SplitOutcome::new(request_id, object_keys, urls))
    }

    /// Uploads a validated file as-is through a multipart transfer.
    pub async fn upload_file(
        &self,
        path: &Path,
        object_key: Option<ObjectKey>,
        settings: &TransferSettings,
    ) -> Result<UploadOutcome, PipelineError> {
        let meta = self.inspector.validate(path).await?;
        let key = object_key.unwrap_or_else(|| default_key(settings, path));

        let store = self.connect_store().await?;
        self.multipart_upload(
            store,
            &key,
            &meta.path,
            meta.size_bytes,
            settings.direct_part_size_bytes,
            settings,
        )
        .await
    }

    /// Uploads an already-processed file with a single put. Without an
    /// explicit key the object is named after the file.
    pub async fn upload_preprocessed(
        &self,
        path: &Path,
        object_key: Option<ObjectKey>,
        settings: &TransferSettings,
    ) -> Result<UploadOutcome, PipelineError> {
        let data = match tokio::fs::read(path).await {
            Ok(d) => Bytes::from(d),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AudioValidationError::NotFound(path.to_path_buf()).into());
            }
            Err(e) => return Err(PipelineError::Io(e)),
        };
        let key = object_key.unwrap_or_else(|| ObjectKey::for_file_name(path));

        let store = self.connect_store().await?;
        let size = data.len();
        store
            .put_object(&key, data)
            .await
            .map_err(TransferError::at(TransferStage::Put))?;

        let url = store
            .signed_url(&key, settings.url_ttl())
            .await
            .map_err(TransferError::at(TransferStage::Sign))?;

        tracing::info!(object_key = %key, bytes = size, "Preprocessed audio uploaded");

        Ok(UploadOutcome::new(&key, None, url))
    }

    async fn connect_store(&self) -> Result<Arc<dyn TransferStore>, PipelineError> {
        let state = SessionState::Uninitialized;
        let credentials = self.broker.fetch_credentials().await?;
        ensure_usable(&credentials)?;

        let next = SessionState::CredentialsObtained;
        debug_assert!(state.can_transition_to(next));
        tracing::debug!(
            from = %state,
            to = %next,
            expires_at = %credentials.expiration,
            "Temporary credentials obtained"
        );

        let store = self
            .connector
            .connect(&credentials)
            .map_err(TransferError::at(TransferStage::Init))?;
        Ok(store)
    }

    async fn multipart_upload(
        &self,
        store: Arc<dyn TransferStore>,
        key: &ObjectKey,
        file_path: &Path,
        size: u64,
        part_size: u64,
        settings: &TransferSettings,
    ) -> Result<UploadOutcome, PipelineError> {
        let ranges = partition(size, part_size)?;
        let mut source = FilePartSource::open(file_path).await?;

        let e_tag = if ranges.part_count() == 0 {
            store
                .put_object(key, Bytes::new())
                .await
                .map_err(TransferError::at(TransferStage::Put))?;
            None
        } else {
            let mut session = UploadSession::open(Arc::clone(&store), key)
                .await?
                .with_progress(Arc::clone(&self.progress));
            session
                .upload_all(ranges, &mut source, settings.part_pacing())
                .await?
        };

        let url = store
            .signed_url(key, settings.url_ttl())
            .await
            .map_err(TransferError::at(TransferStage::Sign))?;

        Ok(UploadOutcome::new(key, e_tag, url))
    }
}

fn ensure_usable(credentials: &TemporaryCredentials) -> Result<(), CredentialError> {
    if credentials.has_empty_field() {
        return Err(CredentialError::Invalid(
            "broker returned an empty key or token".to_string(),
        ));
    }
    if credentials.is_expired_at(Utc::now()) {
        return Err(CredentialError::Invalid(format!(
            "credentials expired at {}",
            credentials.expiration
        )));
    }
    Ok(())
}

fn default_key(settings: &TransferSettings, path: &Path) -> ObjectKey {
    ObjectKey::for_upload(&settings.key_prefix, path, Utc::now().timestamp())
}

fn create_scratch_dir(settings: &TransferSettings) -> io::Result<tempfile::TempDir> {
    let builder = {
        let mut b = tempfile::Builder::new();
        b.prefix("wavelift-");
        b
    };

    match &settings.scratch_dir {
        Some(root) => {
            std::fs::create_dir_all(root)?;
            builder.tempdir_in(root)
        }
        None => builder.tempdir(),
    }
}

/// Writes the (possibly rewritten) header followed by the untouched data
/// region of `meta.path` to `dest`. Returns the staged file size.
async fn stage_resampled(
    meta: &AudioMeta,
    target: AudioFormat,
    dest: &Path,
) -> Result<u64, PipelineError> {
    let mut src = File::open(&meta.path).await?;
    let mut dst = BufWriter::new(File::create(dest).await?);
    let mut written: u64 = 0;

    let header = match meta.header {
        Some(header) => Some(header),
        None => sniff_wav_header(&mut src).await?,
    };

    match header {
        Some(header) => {
            let rewritten = header.rewrite(HeaderRewrite::Resample {
                format: target,
                total_file_size: meta.size_bytes,
            });
            dst.write_all(rewritten.as_bytes()).await?;
            src.seek(SeekFrom::Start(WAV_HEADER_LEN as u64)).await?;
            written += WAV_HEADER_LEN as u64;
        }
        None => {
            tracing::debug!(
                extension = %meta.extension,
                "No RIFF/WAVE magic, passing bytes through unmodified"
            );
            src.seek(SeekFrom::Start(0)).await?;
        }
    }

    written += tokio::io::copy(&mut src, &mut dst).await?;
    dst.flush().await?;
    dst.into_inner().sync_all().await?;

    Ok(written)
}

/// Parses a header from the first bytes of `src` when they carry RIFF/WAVE
/// magic, whatever the file extension.
async fn sniff_wav_header(src: &mut File) -> io::Result<Option<WavHeader>> {
    let mut buf = Vec::with_capacity(WAV_HEADER_LEN);
    (&mut *src)
        .take(WAV_HEADER_LEN as u64)
        .read_to_end(&mut buf)
        .await?;

    if !has_wav_magic(&buf) {
        return Ok(None);
    }
    Ok(WavHeader::parse(&buf).ok())
}

async fn verify_exists(store: &dyn TransferStore, key: &ObjectKey) -> Result<(), TransferError> {
    match store.object_exists(key).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(TransferError::new(
            TransferStage::Verify,
            TransferStoreError::NotFound(key.to_string()),
        )),
        Err(e) => Err(TransferError::new(TransferStage::Verify, e)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("validation: {0}")]
    Validation(AudioValidationError),
    #[error("header: {0}")]
    Header(#[from] WavHeaderError),
    #[error("credentials: {0}")]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("partition: {0}")]
    Partition(#[from] PartitionError),
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl From<AudioValidationError> for PipelineError {
    fn from(err: AudioValidationError) -> Self {
        match err {
            AudioValidationError::Header(e) => PipelineError::Header(e),
            AudioValidationError::Io(e) => PipelineError::Io(e),
            other => PipelineError::Validation(other),
        }
    }
}
