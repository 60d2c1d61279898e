/// One contiguous slice of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: u64,
    pub offset: u64,
    pub length: u64,
}

impl ChunkRange {
    /// 1-based number used by multipart protocols and object keys.
    pub fn part_number(&self) -> u64 {
        self.index + 1
    }

    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error("maximum part length must be greater than zero")]
    ZeroPartLength,
    #[error("part length {0} exceeds what a WAV header can describe")]
    PartTooLarge(u64),
}

/// Lazy sequence of [`ChunkRange`]s covering `total_length` bytes.
///
/// Cloning restarts from the current position; calling [`partition`] again
/// with the same inputs yields the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRanges {
    total_length: u64,
    max_part_length: u64,
    next_index: u64,
}

pub fn partition(total_length: u64, max_part_length: u64) -> Result<ChunkRanges, PartitionError> {
    if max_part_length == 0 {
        return Err(PartitionError::ZeroPartLength);
    }

    Ok(ChunkRanges {
        total_length,
        max_part_length,
        next_index: 0,
    })
}

impl ChunkRanges {
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn max_part_length(&self) -> u64 {
        self.max_part_length
    }

    /// Number of ranges in the full sequence, `ceil(total / max)`.
    pub fn part_count(&self) -> u64 {
        self.total_length.div_ceil(self.max_part_length)
    }
}

impl Iterator for ChunkRanges {
    type Item = ChunkRange;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.next_index.checked_mul(self.max_part_length)?;
        if offset >= self.total_length {
            return None;
        }

        let length = (self.total_length - offset).min(self.max_part_length);
        let range = ChunkRange {
            index: self.next_index,
            offset,
            length,
        };
        self.next_index += 1;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.part_count().saturating_sub(self.next_index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkRanges {}
