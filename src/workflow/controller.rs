use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::response;
use super::sequencer::{Progress, Sequencer};
use super::state::{AnswerRecord, AnswerValue, WorkflowDelta, WorkflowPhase, WorkflowState};
use super::validator::AnswerValidator;
use crate::catalog::{DataType, Question, QuestionCatalog};
use crate::error::SessionError;
use crate::interpret::{ReplyContext, ReplyInterpreter, ReplyKind};
use crate::records::{RecordLookup, RecordReader, RecordWriter};
use crate::session::{SessionKey, SessionLocks, SessionStore};
use crate::telemetry::{
    FailureStage, TelemetryEvent, TelemetryRecorder, TelemetrySnapshot, TurnKind, TurnOutcome,
};

/// Where a session stands, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStatus {
    pub current_question_id: Option<String>,
    pub progress: Option<Progress>,
    pub answered: usize,
    pub total_questions: usize,
    pub completed_task_ids: Vec<u32>,
    pub completed_subtask_ids: Vec<u32>,
    /// Every question has been dealt with; only a restart asks again.
    pub finished: bool,
}

/// What one turn produced. `next_state` is saved only when present.
struct Turn {
    response: String,
    kind: TurnKind,
    outcome: TurnOutcome,
    next_state: Option<WorkflowState>,
}

impl Turn {
    fn unchanged(response: String, kind: TurnKind, outcome: TurnOutcome) -> Self {
        Self {
            response,
            kind,
            outcome,
            next_state: None,
        }
    }
}

/// Runs the conversation: one inbound message in, one response out.
///
/// Holds no per-session memory of its own. Each turn loads the session's
/// state, works on a copy, and saves the copy only if the turn succeeded,
/// so every failure leaves the stored state as it was.
pub struct WorkflowController {
    catalog: Arc<QuestionCatalog>,
    validator: AnswerValidator,
    interpreter: ReplyInterpreter,
    reader: Arc<dyn RecordReader>,
    writer: Arc<dyn RecordWriter>,
    sessions: Arc<dyn SessionStore>,
    locks: SessionLocks,
    telemetry: Mutex<TelemetryRecorder>,
}

impl WorkflowController {
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        reader: Arc<dyn RecordReader>,
        writer: Arc<dyn RecordWriter>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            validator: AnswerValidator::new(catalog.clone()),
            catalog,
            interpreter: ReplyInterpreter::new(),
            reader,
            writer,
            sessions,
            locks: SessionLocks::new(),
            telemetry: Mutex::new(TelemetryRecorder::new()),
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub async fn process_message(&self, key: &SessionKey, message: &str) -> String {
        let turn_id = Uuid::new_v4();
        let _guard = self.locks.acquire(&key.storage_key()).await;

        let state = match self.sessions.load(key).await {
            Ok(state) => state,
            Err(e) => {
                error!("Failed to load session {}: {}", key.user_id, e);
                self.record(TelemetryEvent::ExternalFailure {
                    stage: FailureStage::Session,
                });
                return response::session_unavailable();
            }
        };

        let turn = match state.phase() {
            WorkflowPhase::NoActiveQuestion => self.start(key, &state).await,
            WorkflowPhase::AwaitingReply(question_id) => {
                let question_id = question_id.to_string();
                self.reply(key, &state, &question_id, message).await
            }
        };

        let Turn {
            mut response,
            kind,
            mut outcome,
            next_state,
        } = turn;

        if let Some(next_state) = next_state {
            if let Err(e) = self.sessions.save(key, &next_state).await {
                error!("Failed to save session {}: {}", key.user_id, e);
                self.record(TelemetryEvent::ExternalFailure {
                    stage: FailureStage::Session,
                });
                response = response::session_unavailable();
                outcome = TurnOutcome::Failed;
            }
        }

        debug!("Turn {} {:?} -> {:?}", turn_id, kind, outcome);
        self.record(TelemetryEvent::TurnProcessed {
            turn_id,
            kind,
            outcome,
        });
        response
    }

    /// Forgets the session's progress. The next message starts over.
    pub async fn restart(&self, key: &SessionKey) -> Result<(), SessionError> {
        let _guard = self.locks.acquire(&key.storage_key()).await;
        self.sessions.clear(key).await?;
        info!("Workflow restarted for {}", key.user_id);
        self.record(TelemetryEvent::WorkflowRestarted);
        Ok(())
    }

    pub async fn status(&self, key: &SessionKey) -> Result<WorkflowStatus, SessionError> {
        let _guard = self.locks.acquire(&key.storage_key()).await;
        let state = self.sessions.load(key).await?;
        let sequencer = Sequencer::new(&self.catalog);

        Ok(WorkflowStatus {
            progress: state
                .current_question_id
                .as_deref()
                .map(|id| sequencer.progress(id)),
            current_question_id: state.current_question_id.clone(),
            answered: state.answered_count(),
            total_questions: self.catalog.len(),
            completed_task_ids: state.completed_task_ids.iter().copied().collect(),
            completed_subtask_ids: state.completed_subtask_ids.iter().copied().collect(),
            finished: self.is_finished(&state),
        })
    }

    /// Sets a caller-supplied flag that question conditions can read.
    pub async fn set_flag(
        &self,
        key: &SessionKey,
        name: &str,
        value: bool,
    ) -> Result<(), SessionError> {
        let _guard = self.locks.acquire(&key.storage_key()).await;
        let mut state = self.sessions.load(key).await?;
        state.reduce(WorkflowDelta::FlagSet {
            name: name.to_string(),
            value,
        });
        self.sessions.save(key, &state).await
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        match self.telemetry.lock() {
            Ok(recorder) => recorder.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        }
    }

    fn record(&self, event: TelemetryEvent) {
        match self.telemetry.lock() {
            Ok(mut recorder) => recorder.record(event),
            Err(poisoned) => poisoned.into_inner().record(event),
        }
    }

    /// No question pending and the first question already answered.
    fn is_finished(&self, state: &WorkflowState) -> bool {
        state.current_question_id.is_none()
            && self
                .catalog
                .first()
                .is_some_and(|first| state.answers.contains_key(&first.question_id))
    }

    async fn lookup(&self, question: &Question, key: &SessionKey) -> Result<RecordLookup, String> {
        self.reader
            .get_value(&question.field_spec(), key)
            .await
            .map_err(|e| {
                warn!("Read of {} failed: {}", question.field_name, e);
                self.record(TelemetryEvent::ExternalFailure {
                    stage: FailureStage::Read,
                });
                e.to_string()
            })
    }

    async fn start(&self, key: &SessionKey, state: &WorkflowState) -> Turn {
        let filing = self.catalog.filing_name();
        let first = match Sequencer::new(&self.catalog).next(None, &state.answers, &state.flags) {
            Some(q) if !self.is_finished(state) => q,
            _ => {
                return Turn::unchanged(
                    response::already_complete(filing),
                    TurnKind::Start,
                    TurnOutcome::AlreadyComplete,
                );
            }
        };

        let lookup = match self.lookup(first, key).await {
            Ok(lookup) => lookup,
            Err(message) => {
                return Turn::unchanged(
                    response::read_failed(first, &message),
                    TurnKind::Start,
                    TurnOutcome::Failed,
                );
            }
        };

        let mut next_state = state.clone();
        next_state.reduce(WorkflowDelta::Presented(first.question_id.clone()));

        info!("Workflow started for {} at {}", key.user_id, first.question_id);
        self.record(TelemetryEvent::WorkflowStarted);

        Turn {
            response: response::start_prompt(filing, first, lookup.on_file()),
            kind: TurnKind::Start,
            outcome: TurnOutcome::Presented,
            next_state: Some(next_state),
        }
    }

    /// Handles a reply to the awaiting question. Yes/no questions depart from
    /// the generic transition on purpose: a bare "yes" or "no" is itself the
    /// answer, so it is written and the workflow advances instead of
    /// re-prompting.
    async fn reply(
        &self,
        key: &SessionKey,
        state: &WorkflowState,
        question_id: &str,
        message: &str,
    ) -> Turn {
        let question = match self.catalog.lookup(question_id) {
            Some(q) => q,
            None => {
                warn!(
                    "Session {} points at unknown question {}",
                    key.user_id, question_id
                );
                self.record(TelemetryEvent::StaleSession);
                return Turn::unchanged(
                    response::start_over(),
                    TurnKind::Value,
                    TurnOutcome::Failed,
                );
            }
        };

        let interpretation = self
            .interpreter
            .interpret(message, ReplyContext::for_question(question));
        let kind = TurnKind::from(interpretation.kind);
        let is_boolean = question.data_type == DataType::Boolean;

        match interpretation.kind {
            ReplyKind::Confirm => {
                let lookup = match self.lookup(question, key).await {
                    Ok(lookup) => lookup,
                    Err(message) => {
                        return Turn::unchanged(
                            response::read_failed(question, &message),
                            kind,
                            TurnOutcome::Failed,
                        );
                    }
                };

                match lookup.on_file().cloned() {
                    Some(value) => {
                        self.advance(key, state, question, Some(value), response::CONFIRM_ACK, kind)
                            .await
                    }
                    // "Yes" to a yes/no question is an answer in itself.
                    None if is_boolean => self.write_and_advance(key, state, question, "yes", kind).await,
                    None if question.required => Turn::unchanged(
                        response::nothing_to_confirm(question),
                        kind,
                        TurnOutcome::Reprompted,
                    ),
                    None => self.advance(key, state, question, None, response::CONFIRM_ACK, kind).await,
                }
            }

            ReplyKind::Reject | ReplyKind::RejectWithValue if is_boolean => {
                // A rejection that names its own answer ("no, false") wins.
                if let Some(candidate) = interpretation
                    .value
                    .as_deref()
                    .filter(|v| self.validator.validate(&question.question_id, v).is_ok())
                {
                    return self.write_and_advance(key, state, question, candidate, kind).await;
                }

                let lookup = match self.lookup(question, key).await {
                    Ok(lookup) => lookup,
                    Err(message) => {
                        return Turn::unchanged(
                            response::read_failed(question, &message),
                            kind,
                            TurnOutcome::Failed,
                        );
                    }
                };
                // Rejecting a stored "No" means yes; anything else means no.
                let candidate = match lookup.on_file() {
                    Some(stored) if stored.is_no() => "yes",
                    _ => "no",
                };
                self.write_and_advance(key, state, question, candidate, kind).await
            }

            ReplyKind::Reject => Turn::unchanged(
                response::reject_reprompt(question),
                kind,
                TurnOutcome::Reprompted,
            ),

            ReplyKind::RejectWithValue | ReplyKind::Value => {
                let candidate = interpretation.value_or_empty().to_string();
                self.write_and_advance(key, state, question, &candidate, kind).await
            }
        }
    }

    /// Validates a user-supplied value, writes it to the record store, then
    /// advances.
    async fn write_and_advance(
        &self,
        key: &SessionKey,
        state: &WorkflowState,
        question: &Question,
        candidate: &str,
        kind: TurnKind,
    ) -> Turn {
        if let Err(e) = self.validator.validate(&question.question_id, candidate) {
            debug!("Validation failed for {}: {}", question.question_id, e);
            return Turn::unchanged(
                response::validation_failed(&e),
                kind,
                TurnOutcome::ValidationFailed,
            );
        }

        match self.writer.set_value(&question.field_spec(), candidate, key).await {
            Ok(outcome) if outcome.success => {}
            Ok(outcome) => {
                warn!("Write of {} was refused", question.field_name);
                return Turn::unchanged(
                    response::write_failed(&outcome.message),
                    kind,
                    TurnOutcome::WriteRefused,
                );
            }
            Err(e) => {
                warn!("Write of {} failed: {}", question.field_name, e);
                self.record(TelemetryEvent::ExternalFailure {
                    stage: FailureStage::Write,
                });
                return Turn::unchanged(
                    response::write_failed(&e.to_string()),
                    kind,
                    TurnOutcome::Failed,
                );
            }
        }

        let value = AnswerValue::from_reply(question.data_type, candidate);
        let ack = response::updated_ack(question, &value);
        self.advance(key, state, question, Some(value), &ack, kind).await
    }

    /// Records the final value for `question` and moves to whatever comes
    /// next.
    async fn advance(
        &self,
        key: &SessionKey,
        state: &WorkflowState,
        question: &Question,
        value: Option<AnswerValue>,
        ack: &str,
        kind: TurnKind,
    ) -> Turn {
        let mut next_state = state.clone();
        next_state.reduce(WorkflowDelta::AnswerRecorded {
            question_id: question.question_id.clone(),
            record: AnswerRecord::confirmed(value),
        });

        let sequencer = Sequencer::new(&self.catalog);
        let next = sequencer.next(
            Some(&question.question_id),
            &next_state.answers,
            &next_state.flags,
        );

        let next_question = match next {
            Some(q) => q,
            None => {
                next_state.apply_all([
                    WorkflowDelta::SubtaskCompleted(question.subtask_id),
                    WorkflowDelta::TaskCompleted(question.task_id),
                    WorkflowDelta::Finished,
                ]);
                let answered = next_state.answered_count();
                info!("Workflow complete for {} ({} answered)", key.user_id, answered);
                self.record(TelemetryEvent::WorkflowCompleted { answered });

                return Turn {
                    response: response::completed(ack, answered, self.catalog.filing_name()),
                    kind,
                    outcome: TurnOutcome::Completed,
                    next_state: Some(next_state),
                };
            }
        };

        let lookup = match self.lookup(next_question, key).await {
            Ok(lookup) => lookup,
            Err(message) => {
                return Turn::unchanged(
                    response::read_failed(next_question, &message),
                    kind,
                    TurnOutcome::Failed,
                );
            }
        };

        if (next_question.task_id, next_question.subtask_id)
            != (question.task_id, question.subtask_id)
        {
            next_state.reduce(WorkflowDelta::SubtaskCompleted(question.subtask_id));
        }
        if next_question.task_id != question.task_id {
            next_state.reduce(WorkflowDelta::TaskCompleted(question.task_id));
        }
        next_state.reduce(WorkflowDelta::Presented(next_question.question_id.clone()));

        Turn {
            response: response::next_prompt(ack, next_question, lookup.on_file()),
            kind,
            outcome: TurnOutcome::Advanced,
            next_state: Some(next_state),
        }
    }
}
