//! Time-boxed driving of incremental render jobs.
//!
//! Jobs expose one unit of work per `advance()`. The driver packs as many
//! units as fit in a wall-clock budget into one slice, the way a display loop
//! would spend one frame, and reports progress between slices.

use std::time::{Duration, Instant};

use tracing::{debug, info};
use vista_raster::{Incremental, Progress};

/// Default slice budget, one display frame at 50 Hz.
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(20);

/// Outcome of one slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceReport {
    /// `advance()` calls made in this slice.
    pub steps: u64,
    /// Progress reported by the last call.
    pub progress: Progress,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Totals over a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriverStats {
    pub slices: u64,
    pub steps: u64,
    pub elapsed: Duration,
}

/// Cooperative slice scheduler.
pub struct FrameDriver {
    budget: Duration,
    stats: DriverStats,
}

impl FrameDriver {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            stats: DriverStats::default(),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Totals accumulated by this driver so far.
    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Advance `job` until the budget elapses or it finishes.
    ///
    /// At least one step runs per slice, so a zero budget still makes
    /// progress.
    pub fn run_slice<J: Incremental + ?Sized>(&mut self, job: &mut J) -> SliceReport {
        let start = Instant::now();
        let mut steps = 0;
        let progress = loop {
            let progress = job.advance();
            steps += 1;
            if progress.finished || start.elapsed() >= self.budget {
                break progress;
            }
        };
        let elapsed = start.elapsed();
        self.record(steps, elapsed);
        SliceReport {
            steps,
            progress,
            elapsed,
        }
    }

    /// Run slices until `job` finishes, logging its status between slices.
    pub fn run_to_completion<J: Incremental + ?Sized>(&mut self, job: &mut J) -> DriverStats {
        let before = self.stats;
        loop {
            let report = self.run_slice(job);
            if report.progress.finished {
                break;
            }
            debug!(
                status = %job.status_label(),
                percent = report.progress.fraction * 100.0,
                steps = report.steps,
                "slice done"
            );
        }
        let run = DriverStats {
            slices: self.stats.slices - before.slices,
            steps: self.stats.steps - before.steps,
            elapsed: self.stats.elapsed - before.elapsed,
        };
        info!(
            slices = run.slices,
            steps = run.steps,
            elapsed_ms = run.elapsed.as_millis() as u64,
            "{}",
            job.status_label()
        );
        run
    }

    /// Advance `job` at most `steps` times, stopping early when it finishes.
    /// Counts as one slice; no clock is consulted.
    pub fn run_steps<J: Incremental + ?Sized>(&mut self, job: &mut J, steps: u64) -> SliceReport {
        let mut taken = 0;
        let mut progress = Progress::partial(0.0);
        while taken < steps {
            progress = job.advance();
            taken += 1;
            if progress.finished {
                break;
            }
        }
        self.record(taken, Duration::ZERO);
        SliceReport {
            steps: taken,
            progress,
            elapsed: Duration::ZERO,
        }
    }

    fn record(&mut self, steps: u64, elapsed: Duration) {
        self.stats.slices += 1;
        self.stats.steps += steps;
        self.stats.elapsed += elapsed;
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}
