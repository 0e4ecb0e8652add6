//! Progress reporting shared by all incremental generators.

/// Fraction of work done plus the completion flag.
///
/// `finished` is the only reliable completion signal; `fraction` is for
/// display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// Completed share of the work in `[0, 1]`.
    pub fraction: f64,
    /// Whether the generator has reached its terminal state.
    pub finished: bool,
}

impl Progress {
    /// Progress of a generator that has completed.
    pub const DONE: Self = Self {
        fraction: 1.0,
        finished: true,
    };

    /// In-flight progress at `fraction`.
    pub fn partial(fraction: f64) -> Self {
        Self {
            fraction,
            finished: false,
        }
    }
}

/// Lifecycle of a generator: `Pending -> Running -> Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GeneratorState {
    /// Constructed, `advance()` not yet called.
    #[default]
    Pending,
    /// Partially written.
    Running,
    /// Terminal. Further `advance()` calls are no-ops.
    Done,
}

impl GeneratorState {
    /// Derive the next state from a step's reported progress.
    pub fn after(progress: Progress) -> Self {
        if progress.finished {
            GeneratorState::Done
        } else {
            GeneratorState::Running
        }
    }
}

/// A unit of resumable work that owns its output.
///
/// Each call performs one bounded step (typically one pixel). An external
/// driver decides how many steps fit in a frame.
pub trait Incremental {
    /// Perform one unit of work.
    fn advance(&mut self) -> Progress;

    /// Current lifecycle state.
    fn state(&self) -> GeneratorState;

    /// Human-readable description of the work in flight, for status displays.
    fn status_label(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_after_progress() {
        assert_eq!(GeneratorState::after(Progress::partial(0.5)), GeneratorState::Running);
        assert_eq!(GeneratorState::after(Progress::DONE), GeneratorState::Done);
        assert_eq!(GeneratorState::default(), GeneratorState::Pending);
    }
}
