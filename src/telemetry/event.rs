use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interpret::ReplyKind;

// Allowed: ids, counts, enums.
// Forbidden: message text, field values, user ids.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    TurnProcessed {
        turn_id: Uuid,
        kind: TurnKind,
        outcome: TurnOutcome,
    },

    WorkflowStarted,

    WorkflowCompleted {
        answered: usize,
    },

    WorkflowRestarted,

    /// Stored state named a question the catalog does not have.
    StaleSession,

    ExternalFailure {
        stage: FailureStage,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnKind {
    Start,
    Confirm,
    Reject,
    RejectWithValue,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    Presented,
    Advanced,
    Completed,
    AlreadyComplete,
    Reprompted,
    ValidationFailed,
    WriteRefused,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStage {
    Read,
    Write,
    Session,
}

impl From<ReplyKind> for TurnKind {
    fn from(kind: ReplyKind) -> Self {
        match kind {
            ReplyKind::Confirm => TurnKind::Confirm,
            ReplyKind::Reject => TurnKind::Reject,
            ReplyKind::RejectWithValue => TurnKind::RejectWithValue,
            ReplyKind::Value => TurnKind::Value,
        }
    }
}
