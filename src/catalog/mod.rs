//! Question Catalog: the static, ordered definition of every question.
//!
//! Loaded once at start-up and never mutated. A load failure is fatal; the
//! process has nothing to ask without it.

pub mod loader;
pub mod types;

pub use types::*;

use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::CatalogError;

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    filing_name: String,
    // Catalog order: task, then subtask, then question, as defined.
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionCatalog {
    pub fn from_definition(definition: &CatalogDefinition) -> Result<Self, CatalogError> {
        let questions = loader::flatten(definition)?;
        let index = questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.question_id.clone(), i))
            .collect();

        Ok(Self {
            filing_name: definition.filing_name.clone(),
            questions,
            index,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::from_definition(&loader::parse_definition(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let catalog = Self::from_definition(&loader::read_definition(path)?)?;
        info!(
            "Loaded catalog '{}' from {} ({} questions)",
            catalog.filing_name,
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// The 1040NR catalog compiled into the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(loader::builtin_source())
    }

    pub fn lookup(&self, question_id: &str) -> Option<&Question> {
        self.index.get(question_id).map(|&i| &self.questions[i])
    }

    /// Stable across calls.
    pub fn all_in_order(&self) -> &[Question] {
        &self.questions
    }

    /// 0-based position in catalog order.
    pub fn position(&self, question_id: &str) -> Option<usize> {
        self.index.get(question_id).copied()
    }

    pub fn first(&self) -> Option<&Question> {
        self.questions.first()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn filing_name(&self) -> &str {
        &self.filing_name
    }
}
