//! Progress reporting for long operations.

use tracing::{debug, info};

/// Receives progress from long-running operations.
///
/// Reports are fire-and-forget. Cancellation is only polled between items of
/// a bulk operation, never inside a single raster scan.
pub trait ProgressReporter {
    /// Progress of `title` at `fraction` in `[0, 1]`.
    fn report(&mut self, title: &str, message: &str, fraction: f32);

    /// The operation finished or was abandoned.
    fn clear(&mut self);

    /// `true` if the user asked to stop.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Discards all progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn report(&mut self, _title: &str, _message: &str, _fraction: f32) {}

    fn clear(&mut self) {}
}

/// Forwards progress to `tracing`, logging at most once per `step` of progress.
#[derive(Clone, Debug)]
pub struct LogProgress {
    step: f32,
    last: Option<f32>,
}

impl LogProgress {
    /// Logs whenever progress has advanced by at least `step` since the last line.
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(0.0),
            last: None,
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl ProgressReporter for LogProgress {
    fn report(&mut self, title: &str, message: &str, fraction: f32) {
        if self.last.is_none_or(|last| fraction - last >= self.step || fraction < last) {
            info!("{title}: {message} ({:.0}%)", fraction.clamp(0.0, 1.0) * 100.0);
            self.last = Some(fraction);
        } else {
            debug!("{title}: {message} ({fraction:.3})");
        }
    }

    fn clear(&mut self) {
        self.last = None;
    }
}
