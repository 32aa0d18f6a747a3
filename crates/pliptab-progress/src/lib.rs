//! Progress bar for the per-file loop.
//!
//! The bar is only drawn when:
//! - it was requested (`enabled`)
//! - stdout is a TTY
//! - `NO_COLOR` is not set
//! - `PLIPTAB_NO_PROGRESS` is not set
//!
//! Without the `ui` feature every method is a no-op apart from
//! [`FileProgress::println`], which falls back to plain `println!`.

#[cfg(feature = "ui")]
use std::io::IsTerminal;
#[cfg(feature = "ui")]
use std::time::Duration;

#[cfg(feature = "ui")]
use indicatif::{ProgressBar, ProgressStyle};

/// A counted progress bar over input files.
pub struct FileProgress {
    #[cfg(feature = "ui")]
    bar: Option<ProgressBar>,
}

impl FileProgress {
    pub fn new(enabled: bool, total: u64) -> Self {
        #[cfg(feature = "ui")]
        {
            let bar = if enabled && is_interactive() {
                Some(styled_bar(total))
            } else {
                None
            };
            Self { bar }
        }
        #[cfg(not(feature = "ui"))]
        {
            let _ = (enabled, total);
            Self {}
        }
    }

    /// True when a bar is actually being drawn.
    pub fn is_visible(&self) -> bool {
        #[cfg(feature = "ui")]
        {
            self.bar.is_some()
        }
        #[cfg(not(feature = "ui"))]
        {
            false
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        let msg = msg.into();
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.set_message(msg);
        }
        #[cfg(not(feature = "ui"))]
        let _ = msg;
    }

    pub fn inc(&self) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Print a line without tearing the bar.
    pub fn println(&self, msg: impl AsRef<str>) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.println(msg.as_ref());
            return;
        }
        println!("{}", msg.as_ref());
    }

    pub fn finish_and_clear(&self) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for FileProgress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

/// Spinner redraw interval, independent of file progress.
#[cfg(feature = "ui")]
const TICK_INTERVAL: Duration = Duration::from_millis(80);

#[cfg(feature = "ui")]
fn styled_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    pb.set_style(style);
    // A single PLIP run can take minutes; keep the spinner moving meanwhile.
    pb.enable_steady_tick(TICK_INTERVAL);
    pb
}

/// Check if we should show interactive output.
#[cfg(feature = "ui")]
fn is_interactive() -> bool {
    if !std::io::stdout().is_terminal() {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("PLIPTAB_NO_PROGRESS").is_some() {
        return false;
    }
    true
}
