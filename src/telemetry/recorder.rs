use std::collections::VecDeque;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

/// Bounded ring of recent events; the oldest is dropped when full.
#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::new(),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::event::FailureStage;

    #[test]
    fn buffer_is_bounded() {
        let mut recorder = TelemetryRecorder::new();
        for _ in 0..MAX_EVENTS + 5 {
            recorder.record(TelemetryEvent::WorkflowStarted);
        }
        assert_eq!(recorder.buffer.len(), MAX_EVENTS);
    }

    #[test]
    fn snapshot_averages_completions() {
        let mut recorder = TelemetryRecorder::new();
        recorder.record(TelemetryEvent::WorkflowCompleted { answered: 4 });
        recorder.record(TelemetryEvent::WorkflowCompleted { answered: 6 });
        recorder.record(TelemetryEvent::ExternalFailure {
            stage: FailureStage::Write,
        });

        let snap = recorder.snapshot();
        assert_eq!(snap.workflow_stats.completed, 2);
        assert_eq!(snap.workflow_stats.avg_answered_on_completion, 5.0);
        assert_eq!(snap.failure_stats.write, 1);
    }
}
