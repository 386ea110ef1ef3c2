use serde::{Deserialize, Serialize};
use tracing::warn;

use super::state::{AnswerMap, FlagBag};
use crate::catalog::{
    Condition, Question, QuestionCatalog, ITIN_HELD_QUESTION, ITIN_VALID_QUESTION,
    PREVIOUS_YEAR_FLAG,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based.
    pub position: usize,
    pub total: usize,
    /// Rounded to one decimal.
    pub percentage: f64,
}

/// Walks the catalog forward. Pure: the same (position, answers, flags)
/// always yields the same next question.
#[derive(Debug, Clone, Copy)]
pub struct Sequencer<'a> {
    catalog: &'a QuestionCatalog,
}

impl<'a> Sequencer<'a> {
    pub fn new(catalog: &'a QuestionCatalog) -> Self {
        Self { catalog }
    }

    /// Next question to ask after `current`, or None when the workflow is done.
    ///
    /// With no current question the first catalog entry is returned without
    /// evaluating its condition.
    pub fn next(
        &self,
        current: Option<&str>,
        answers: &AnswerMap,
        flags: &FlagBag,
    ) -> Option<&'a Question> {
        let current = match current {
            None => return self.catalog.first(),
            Some(id) => id,
        };

        let questions = self.catalog.all_in_order();
        let index = self.catalog.position(current)?;
        if index + 1 >= questions.len() {
            return None;
        }

        questions[index + 1..]
            .iter()
            .find(|candidate| should_ask(candidate, answers, flags))
    }

    pub fn progress(&self, question_id: &str) -> Progress {
        let total = self.catalog.len();
        let index = match self.catalog.position(question_id) {
            Some(i) => i,
            None => {
                warn!("Progress requested for unknown question {}; reporting position 1", question_id);
                0
            }
        };

        let position = index + 1;
        let percentage = if total == 0 {
            0.0
        } else {
            (position as f64 / total as f64 * 1000.0).round() / 10.0
        };

        Progress {
            position,
            total,
            percentage,
        }
    }
}

pub fn should_ask(question: &Question, answers: &AnswerMap, flags: &FlagBag) -> bool {
    match &question.condition {
        None => true,
        Some(condition) => evaluate(condition, answers, flags),
    }
}

pub fn evaluate(condition: &Condition, answers: &AnswerMap, flags: &FlagBag) -> bool {
    let answer = |id: &str| answers.get(id).and_then(|record| record.value.as_ref());
    let flag = |name: &str| flags.get(name).copied().unwrap_or(false);

    match condition {
        Condition::AnswerIsYes(id) => answer(id.as_str()).is_some_and(|v| v.is_yes()),
        Condition::AnswerIsNo(id) => answer(id.as_str()).is_some_and(|v| v.is_no()),
        Condition::NoValidItin => {
            let holds_itin = answer(ITIN_HELD_QUESTION).is_some_and(|v| v.is_truthy());
            let itin_valid = answer(ITIN_VALID_QUESTION).is_some_and(|v| v.is_truthy());
            !holds_itin || !itin_valid
        }
        Condition::HasItin => answer(ITIN_HELD_QUESTION).is_some_and(|v| v.is_yes()),
        Condition::PreviousYearExists => flag(PREVIOUS_YEAR_FLAG),
        Condition::PreviousYearHad(form) => flag(format!("prev_year_{}", form).as_str()),
    }
}
