use serde::Serialize;
use std::collections::VecDeque;

use super::event::{FailureStage, TelemetryEvent, TurnKind, TurnOutcome};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub turn_stats: TurnStats,
    pub outcome_stats: OutcomeStats,
    pub workflow_stats: WorkflowStats,
    pub failure_stats: FailureStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TurnStats {
    pub total: u64,
    pub starts: u64,
    pub confirmations: u64,
    pub rejections: u64,
    pub rejections_with_value: u64,
    pub values: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutcomeStats {
    pub presented: u64,
    pub advanced: u64,
    pub completed: u64,
    pub already_complete: u64,
    pub reprompted: u64,
    pub validation_failed: u64,
    pub write_refused: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowStats {
    pub started: u64,
    pub completed: u64,
    pub restarted: u64,
    pub stale_sessions: u64,
    pub avg_answered_on_completion: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FailureStats {
    pub read: u64,
    pub write: u64,
    pub session: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut answered_total = 0u64;

    for event in events {
        match event {
            TelemetryEvent::TurnProcessed { kind, outcome, .. } => {
                snap.turn_stats.total += 1;
                match kind {
                    TurnKind::Start => snap.turn_stats.starts += 1,
                    TurnKind::Confirm => snap.turn_stats.confirmations += 1,
                    TurnKind::Reject => snap.turn_stats.rejections += 1,
                    TurnKind::RejectWithValue => snap.turn_stats.rejections_with_value += 1,
                    TurnKind::Value => snap.turn_stats.values += 1,
                }
                let o = &mut snap.outcome_stats;
                match outcome {
                    TurnOutcome::Presented => o.presented += 1,
                    TurnOutcome::Advanced => o.advanced += 1,
                    TurnOutcome::Completed => o.completed += 1,
                    TurnOutcome::AlreadyComplete => o.already_complete += 1,
                    TurnOutcome::Reprompted => o.reprompted += 1,
                    TurnOutcome::ValidationFailed => o.validation_failed += 1,
                    TurnOutcome::WriteRefused => o.write_refused += 1,
                    TurnOutcome::Failed => o.failed += 1,
                }
            }
            TelemetryEvent::WorkflowStarted => snap.workflow_stats.started += 1,
            TelemetryEvent::WorkflowCompleted { answered } => {
                snap.workflow_stats.completed += 1;
                answered_total += *answered as u64;
            }
            TelemetryEvent::WorkflowRestarted => snap.workflow_stats.restarted += 1,
            TelemetryEvent::StaleSession => snap.workflow_stats.stale_sessions += 1,
            TelemetryEvent::ExternalFailure { stage } => match stage {
                FailureStage::Read => snap.failure_stats.read += 1,
                FailureStage::Write => snap.failure_stats.write += 1,
                FailureStage::Session => snap.failure_stats.session += 1,
            },
        }
    }

    if snap.workflow_stats.completed > 0 {
        snap.workflow_stats.avg_answered_on_completion =
            answered_total as f64 / snap.workflow_stats.completed as f64;
    }

    snap
}
