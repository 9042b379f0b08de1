//! Run progress across waves (descriptors resolved so far, failures among them).

/// Snapshot of run progress, logged after each wave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunProgress {
    /// Descriptors with a resolved outcome.
    pub processed: usize,
    /// Descriptors submitted for the whole run.
    pub total: usize,
    /// Outcomes that are `ERROR`.
    pub failed: usize,
}

impl RunProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, processed: usize, failed: usize) {
        self.processed += processed;
        self.failed += failed;
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.processed as f64 / self.total as f64).min(1.0)
    }

    pub fn succeeded(&self) -> usize {
        self.processed.saturating_sub(self.failed)
    }
}
