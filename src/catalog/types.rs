use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Dotted ordinal, e.g. "1.1" or "2.3".
pub type QuestionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Boolean,
    Date,
}

/// Extra check applied after the data-type check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    NonEmpty,
    ValidItin,
}

/// Gate deciding whether a question is asked at all.
///
/// Catalog files carry these as string tags (`answer_2.1_is_yes`,
/// `no_valid_itin`, ...); they are parsed once at load time and evaluated
/// by the sequencer with a single exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Condition {
    /// `answer_<id>_is_yes`
    AnswerIsYes(QuestionId),
    /// `answer_<id>_is_no`
    AnswerIsNo(QuestionId),
    /// `no_valid_itin`: answer to 2.1 or 2.3 is falsy.
    NoValidItin,
    /// `has_itin`: answer to 2.1 is yes-like.
    HasItin,
    /// `previous_year_exists`: flag `has_previous_year_data`.
    PreviousYearExists,
    /// `previous_year_had_<X>`: flag `prev_year_<X>`.
    PreviousYearHad(String),
}

impl Condition {
    /// The question an `answer_<id>_is_*` condition reads.
    pub fn referenced_question(&self) -> Option<&str> {
        match self {
            Condition::AnswerIsYes(id) | Condition::AnswerIsNo(id) => Some(id.as_str()),
            Condition::NoValidItin
            | Condition::HasItin
            | Condition::PreviousYearExists
            | Condition::PreviousYearHad(_) => None,
        }
    }
}

/// "Do you have an ITIN?"
pub const ITIN_HELD_QUESTION: &str = "2.1";
/// "Is your ITIN still valid?"
pub const ITIN_VALID_QUESTION: &str = "2.3";

pub const PREVIOUS_YEAR_FLAG: &str = "has_previous_year_data";

impl FromStr for Condition {
    type Err = CatalogError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "no_valid_itin" => return Ok(Condition::NoValidItin),
            "has_itin" => return Ok(Condition::HasItin),
            "previous_year_exists" => return Ok(Condition::PreviousYearExists),
            _ => {}
        }

        if let Some(form) = tag.strip_prefix("previous_year_had_") {
            if !form.is_empty() {
                return Ok(Condition::PreviousYearHad(form.to_string()));
            }
        }

        if let Some(rest) = tag.strip_prefix("answer_") {
            if let Some(id) = rest.strip_suffix("_is_yes") {
                if !id.is_empty() {
                    return Ok(Condition::AnswerIsYes(id.to_string()));
                }
            }
            if let Some(id) = rest.strip_suffix("_is_no") {
                if !id.is_empty() {
                    return Ok(Condition::AnswerIsNo(id.to_string()));
                }
            }
        }

        Err(CatalogError::UnknownCondition(tag.to_string()))
    }
}

impl TryFrom<String> for Condition {
    type Error = CatalogError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::AnswerIsYes(id) => write!(f, "answer_{}_is_yes", id),
            Condition::AnswerIsNo(id) => write!(f, "answer_{}_is_no", id),
            Condition::NoValidItin => f.write_str("no_valid_itin"),
            Condition::HasItin => f.write_str("has_itin"),
            Condition::PreviousYearExists => f.write_str("previous_year_exists"),
            Condition::PreviousYearHad(form) => write!(f, "previous_year_had_{}", form),
        }
    }
}

/// Immutable catalog entry, flattened with its task and subtask labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: QuestionId,
    pub task_id: u32,
    pub task_name: String,
    pub subtask_id: u32,
    pub subtask_name: String,
    pub prompt_text: String,
    pub field_name: String,
    pub data_type: DataType,
    pub required: bool,
    pub validation_rule: Option<ValidationRule>,
    pub condition: Option<Condition>,
    /// Opaque name of the capability that reads this field.
    pub read_accessor: Option<String>,
    /// Opaque name of the capability that updates this field.
    pub write_accessor: Option<String>,
}

pub const ITIN_FIELD: &str = "itin_number";

impl Question {
    /// Human label for the bound field: `date_of_birth` -> "date of birth".
    pub fn field_label(&self) -> String {
        self.field_name.replace('_', " ")
    }

    pub fn is_itin_field(&self) -> bool {
        self.field_name == ITIN_FIELD
    }

    /// Descriptor handed to the record store collaborators.
    pub fn field_spec(&self) -> FieldSpec {
        FieldSpec {
            field_name: self.field_name.clone(),
            data_type: self.data_type,
            read_accessor: self.read_accessor.clone(),
            write_accessor: self.write_accessor.clone(),
        }
    }
}

/// What the record store needs to know about a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field_name: String,
    pub data_type: DataType,
    pub read_accessor: Option<String>,
    pub write_accessor: Option<String>,
}

impl FieldSpec {
    pub fn new(field_name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            field_name: field_name.into(),
            data_type,
            read_accessor: None,
            write_accessor: None,
        }
    }

    pub fn label(&self) -> String {
        self.field_name.replace('_', " ")
    }
}

// On-disk definition layout: tasks -> subtasks -> questions.

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default = "default_filing_name")]
    pub filing_name: String,
    pub tasks: Vec<TaskDefinition>,
}

fn default_filing_name() -> String {
    "1040NR".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskDefinition {
    pub task_id: u32,
    pub task_name: String,
    #[serde(default)]
    pub subtasks: Vec<SubtaskDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubtaskDefinition {
    pub subtask_id: u32,
    pub subtask_name: String,
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDefinition {
    pub question_id: QuestionId,
    pub prompt_text: String,
    pub field_name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub validation_rule: Option<ValidationRule>,
    /// Parsed into a [`Condition`] by the loader.
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub read_accessor: Option<String>,
    #[serde(default)]
    pub write_accessor: Option<String>,
}
