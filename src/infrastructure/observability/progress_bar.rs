use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::application::ports::{ProgressEvent, ProgressSink};

/// Renders transfer progress as a terminal bar on stderr, one tick per part.
pub struct IndicatifProgress {
    bar: ProgressBar,
    style: ProgressStyle,
}

impl IndicatifProgress {
    pub fn stderr() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} parts {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        Self {
            bar: ProgressBar::with_draw_target(Some(0), target),
            style,
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl ProgressSink for IndicatifProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Start { label, total_parts } => {
                self.bar.reset();
                self.bar.set_style(self.style.clone());
                self.bar.set_length(total_parts);
                self.bar.set_position(0);
                self.bar.set_message(label);
            }
            ProgressEvent::Advance { part_number, bytes } => {
                self.bar.set_position(part_number);
                self.bar
                    .set_message(format!("part {} ({})", part_number, HumanBytes(bytes)));
            }
            ProgressEvent::Finish => {
                self.bar.finish_and_clear();
            }
        }
    }
}
