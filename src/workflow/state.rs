use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::catalog::{DataType, QuestionId};

/// Normalized scalar answer: text (including ISO dates) or a yes/no.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
}

impl AnswerValue {
    /// Value from a reply the user typed. Yes/no words become booleans for
    /// boolean questions; everything else is kept as text.
    pub fn from_reply(data_type: DataType, text: &str) -> Self {
        if data_type == DataType::Boolean {
            match text.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" => return AnswerValue::Bool(true),
                "no" | "false" => return AnswerValue::Bool(false),
                _ => {}
            }
        }
        AnswerValue::Text(text.to_string())
    }

    /// true, "yes", "YES", "Yes"
    pub fn is_yes(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => *b,
            AnswerValue::Text(s) => matches!(s.as_str(), "yes" | "YES" | "Yes"),
        }
    }

    /// false, "no", "NO", "No"
    pub fn is_no(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => !*b,
            AnswerValue::Text(s) => matches!(s.as_str(), "no" | "NO" | "No"),
        }
    }

    /// Only `false` and the empty string are falsy. Note "no" is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => *b,
            AnswerValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(true) => f.write_str("Yes"),
            AnswerValue::Bool(false) => f.write_str("No"),
            AnswerValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// None when the user confirmed an optional question with nothing on file.
    pub value: Option<AnswerValue>,
    pub confirmed: bool,
    pub timestamp: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn confirmed(value: Option<AnswerValue>) -> Self {
        Self {
            value,
            confirmed: true,
            timestamp: Utc::now(),
        }
    }
}

/// Answers keyed by question id; insertion order is irrelevant.
pub type AnswerMap = HashMap<QuestionId, AnswerRecord>;

/// Caller-supplied booleans that conditions may read
/// (`has_previous_year_data`, `prev_year_<X>`).
pub type FlagBag = HashMap<String, bool>;

/// Strict state delta. This is the ONLY way workflow state mutates.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowDelta {
    /// The question is now awaiting a reply.
    Presented(QuestionId),
    AnswerRecorded {
        question_id: QuestionId,
        record: AnswerRecord,
    },
    SubtaskCompleted(u32),
    TaskCompleted(u32),
    /// Sequencer ran out of questions.
    Finished,
    FlagSet {
        name: String,
        value: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase<'a> {
    NoActiveQuestion,
    AwaitingReply(&'a str),
}

/// Per-session workflow state. Persisted between turns by the session store;
/// the controller keeps nothing in memory beyond a single call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub current_question_id: Option<QuestionId>,
    #[serde(default)]
    pub completed_task_ids: BTreeSet<u32>,
    #[serde(default)]
    pub completed_subtask_ids: BTreeSet<u32>,
    #[serde(default)]
    pub answers: AnswerMap,
    #[serde(default)]
    pub flags: FlagBag,
    /// Bumped on every reduction.
    #[serde(default)]
    pub version: u64,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WorkflowPhase<'_> {
        match &self.current_question_id {
            Some(id) => WorkflowPhase::AwaitingReply(id),
            None => WorkflowPhase::NoActiveQuestion,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn answer(&self, question_id: &str) -> Option<&AnswerRecord> {
        self.answers.get(question_id)
    }

    /// Pure reduction: State + Delta -> Mutated State
    pub fn reduce(&mut self, delta: WorkflowDelta) {
        self.version += 1;

        match delta {
            WorkflowDelta::Presented(question_id) => {
                self.current_question_id = Some(question_id);
            }
            WorkflowDelta::AnswerRecorded {
                question_id,
                record,
            } => {
                self.answers.insert(question_id, record);
            }
            // Completion sets are append-only.
            WorkflowDelta::SubtaskCompleted(id) => {
                self.completed_subtask_ids.insert(id);
            }
            WorkflowDelta::TaskCompleted(id) => {
                self.completed_task_ids.insert(id);
            }
            WorkflowDelta::Finished => {
                self.current_question_id = None;
            }
            WorkflowDelta::FlagSet { name, value } => {
                self.flags.insert(name, value);
            }
        }
    }

    pub fn apply_all(&mut self, deltas: impl IntoIterator<Item = WorkflowDelta>) {
        for delta in deltas {
            self.reduce(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_matches_reference_semantics() {
        assert!(AnswerValue::Text("no".into()).is_truthy());
        assert!(!AnswerValue::Text(String::new()).is_truthy());
        assert!(!AnswerValue::Bool(false).is_truthy());
        assert!(AnswerValue::Bool(true).is_yes());
        assert!(!AnswerValue::Text("yEs".into()).is_yes());
    }

    #[test]
    fn boolean_replies_normalize() {
        assert_eq!(
            AnswerValue::from_reply(DataType::Boolean, "Yes"),
            AnswerValue::Bool(true)
        );
        assert_eq!(
            AnswerValue::from_reply(DataType::Boolean, "false"),
            AnswerValue::Bool(false)
        );
        assert_eq!(
            AnswerValue::from_reply(DataType::String, "yes"),
            AnswerValue::Text("yes".into())
        );
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = WorkflowState::new();
        state.reduce(WorkflowDelta::Presented("1.2".into()));
        state.reduce(WorkflowDelta::AnswerRecorded {
            question_id: "1.1".into(),
            record: AnswerRecord::confirmed(Some(AnswerValue::Text("Alex".into()))),
        });
        state.reduce(WorkflowDelta::AnswerRecorded {
            question_id: "2.1".into(),
            record: AnswerRecord::confirmed(Some(AnswerValue::Bool(true))),
        });

        let json = serde_json::to_string(&state).unwrap();
        let back: WorkflowState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.version, 3);
    }
}
