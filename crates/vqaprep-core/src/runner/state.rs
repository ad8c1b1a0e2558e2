use serde::Serialize;

use crate::models::ImageStage;

/// Where a [`super::PipelineRunner`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunnerState {
    #[default]
    Idle,
    /// Inferring the batch target size; skipped when one is configured.
    Profiling,
    /// Working on image `index` (1-based) of `total`.
    Processing {
        index: usize,
        total: usize,
        stage: ImageStage,
    },
    Done,
}

/// Tracks whether the output folder has accepted a write during this run.
///
/// A write failure before any write has succeeded means the folder itself is
/// unusable, so the batch should stop instead of failing every image.
#[derive(Debug, Default)]
pub(crate) struct WriteHealth {
    succeeded: usize,
    failed: usize,
}

impl WriteHealth {
    pub(crate) fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failed write; returns true if the batch must abort.
    pub(crate) fn record_failure(&mut self) -> bool {
        self.failed += 1;
        self.succeeded == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_failure_escalates() {
        let mut health = WriteHealth::default();
        assert!(health.record_failure());
    }

    #[test]
    fn test_failure_after_success_is_tolerated() {
        let mut health = WriteHealth::default();
        health.record_success();
        assert!(!health.record_failure());
        assert!(!health.record_failure());
        assert_eq!(health.failed, 2);
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(RunnerState::default(), RunnerState::Idle);
    }
}
