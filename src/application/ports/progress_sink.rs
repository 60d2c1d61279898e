/// Transfer progress, reported once per finished part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Start { label: String, total_parts: u64 },
    Advance { part_number: u64, bytes: u64 },
    Finish,
}

pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn report(&self, _event: ProgressEvent) {}
}
