use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::catalog::{DataType, Question, QuestionCatalog, ValidationRule};

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid regex"));
static ITIN_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^9\d{2}-\d{2}-\d{4}$").expect("valid regex"));

/// Literal yes/no forms a boolean question accepts.
const BOOLEAN_LITERALS: &[&str] = &["yes", "no", "YES", "NO", "Yes", "No", "true", "false"];

/// Why a candidate answer was refused. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid question ID")]
    UnknownQuestion,
    #[error("This field is required")]
    Required,
    #[error("Please answer yes or no")]
    NotYesNo,
    #[error("Please use YYYY-MM-DD format")]
    DateFormat,
    #[error("This field cannot be empty")]
    Empty,
    #[error("Invalid ITIN format (9XX-XX-XXXX)")]
    ItinFormat,
}

#[derive(Debug, Clone)]
pub struct AnswerValidator {
    catalog: Arc<QuestionCatalog>,
}

impl AnswerValidator {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn validate(&self, question_id: &str, candidate: &str) -> Result<(), ValidationError> {
        let question = self
            .catalog
            .lookup(question_id)
            .ok_or(ValidationError::UnknownQuestion)?;
        validate_question(question, candidate)
    }
}

/// Checks run in order; the first failure wins.
pub fn validate_question(question: &Question, candidate: &str) -> Result<(), ValidationError> {
    if question.required && candidate.is_empty() {
        return Err(ValidationError::Required);
    }

    match question.data_type {
        DataType::Boolean if !BOOLEAN_LITERALS.contains(&candidate) => {
            return Err(ValidationError::NotYesNo);
        }
        DataType::Date if !DATE_PREFIX.is_match(candidate) => {
            return Err(ValidationError::DateFormat);
        }
        _ => {}
    }

    match question.validation_rule {
        Some(ValidationRule::NonEmpty) if candidate.trim().is_empty() => {
            Err(ValidationError::Empty)
        }
        Some(ValidationRule::ValidItin) if !ITIN_EXACT.is_match(candidate) => {
            Err(ValidationError::ItinFormat)
        }
        _ => Ok(()),
    }
}
