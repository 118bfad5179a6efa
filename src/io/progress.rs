//! Terminal progress display for a single generation run

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{prefix}} [{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos:>3}}% {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Percentage bar fed by run progress reports
///
/// Reports never move the bar backwards.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a visible bar labelled with `label`
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(label.to_owned());
        Self { bar }
    }

    /// Create a bar that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Record a reported percentage
    pub fn update(&self, percent: u8) {
        let position = u64::from(percent.min(100));
        if position > self.bar.position() {
            self.bar.set_position(position);
        }
    }

    /// Percentage currently shown
    pub fn position(&self) -> u8 {
        u8::try_from(self.bar.position()).unwrap_or(100)
    }

    /// Complete the bar with a closing message
    pub fn finish(&self, message: &str) {
        self.bar.set_position(100);
        self.bar.finish_with_message(message.to_owned());
    }

    /// Stop the bar where it is with a closing message
    pub fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_owned());
    }
}
