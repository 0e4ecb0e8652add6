//! Restartable row-major pixel cursor.
//!
//! A [`ScanCursor`] carries all loop state for walking a `width x height`
//! grid one cell at a time, so generators can be driven in arbitrarily small
//! slices and resumed later.

/// One report from [`ScanCursor::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScanStep {
    /// The next cell to process, with the share of cells preceding it.
    Cell { x: u32, y: u32, progress: f64 },
    /// The grid is exhausted. Carries no coordinates.
    Finished,
}

impl ScanStep {
    /// Fraction of the grid done; `1.0` once finished.
    pub fn progress(&self) -> f64 {
        match self {
            ScanStep::Cell { progress, .. } => *progress,
            ScanStep::Finished => 1.0,
        }
    }

    /// Whether this is the terminal report.
    pub fn is_finished(&self) -> bool {
        matches!(self, ScanStep::Finished)
    }
}

/// Row-major cursor over a `width x height` grid.
///
/// Starts before the first cell; each [`advance`](Self::advance) moves one
/// cell. Once exhausted it keeps returning [`ScanStep::Finished`]. A grid with
/// a zero dimension is exhausted from the start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanCursor {
    width: u32,
    height: u32,
    /// Index of the next cell to emit, `0..=width*height`.
    next: u64,
}

impl ScanCursor {
    /// Create a cursor positioned before the first cell.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next: 0,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn total(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Move to the next cell.
    pub fn advance(&mut self) -> ScanStep {
        let total = self.total();
        if self.next >= total {
            return ScanStep::Finished;
        }
        let index = self.next;
        self.next += 1;
        ScanStep::Cell {
            x: (index % self.width as u64) as u32,
            y: (index / self.width as u64) as u32,
            progress: index as f64 / total as f64,
        }
    }

    /// Fraction of cells emitted so far.
    pub fn progress(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            1.0
        } else {
            self.next as f64 / total as f64
        }
    }

    /// Whether every cell has been emitted.
    pub fn is_finished(&self) -> bool {
        self.next >= self.total()
    }

    /// Rewind to before the first cell.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}
