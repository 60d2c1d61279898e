use std::io::{self, SeekFrom};
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::domain::ChunkRange;

/// Where the bytes of a [`ChunkRange`] come from.
#[async_trait]
pub trait PartSource: Send {
    async fn read_range(&mut self, range: &ChunkRange) -> io::Result<Bytes>;
}

/// Reads ranges from a local file, offset by `base_offset` bytes.
pub struct FilePartSource {
    file: File,
    base_offset: u64,
}

impl FilePartSource {
    pub async fn open(path: &Path) -> io::Result<Self> {
        Self::open_at(path, 0).await
    }

    pub async fn open_at(path: &Path, base_offset: u64) -> io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self { file, base_offset })
    }
}

#[async_trait]
impl PartSource for FilePartSource {
    async fn read_range(&mut self, range: &ChunkRange) -> io::Result<Bytes> {
        let length = usize::try_from(range.length)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "range too large"))?;

        self.file
            .seek(SeekFrom::Start(self.base_offset + range.offset))
            .await?;

        let mut buf = vec![0u8; length];
        self.file.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

/// Serves ranges out of a buffer already held in memory.
pub struct BytesPartSource {
    data: Bytes,
}

impl BytesPartSource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl PartSource for BytesPartSource {
    async fn read_range(&mut self, range: &ChunkRange) -> io::Result<Bytes> {
        let start = usize::try_from(range.offset).unwrap_or(usize::MAX);
        let end = usize::try_from(range.end()).unwrap_or(usize::MAX);
        if end > self.data.len() || start > end {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "range {}..{} outside buffer of {} bytes",
                    range.offset,
                    range.end(),
                    self.data.len()
                ),
            ));
        }
        Ok(self.data.slice(start..end))
    }
}
