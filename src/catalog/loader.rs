use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::types::{CatalogDefinition, Condition, Question};
use crate::error::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("default_catalog.json");

/// Raw JSON text of the catalog compiled into the binary.
pub fn builtin_source() -> &'static str {
    BUILTIN_CATALOG
}

pub fn read_definition(path: &Path) -> Result<CatalogDefinition, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_definition(&content)
}

pub fn parse_definition(json: &str) -> Result<CatalogDefinition, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

/// Flattens tasks -> subtasks -> questions into catalog order and checks
/// the invariants every later lookup relies on.
pub fn flatten(definition: &CatalogDefinition) -> Result<Vec<Question>, CatalogError> {
    let mut questions = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    // Completion is tracked by subtask id alone, so ids must be catalog-wide.
    let mut subtask_owner: HashMap<u32, u32> = HashMap::new();

    for task in &definition.tasks {
        for subtask in &task.subtasks {
            let owner = *subtask_owner
                .entry(subtask.subtask_id)
                .or_insert(task.task_id);
            if owner != task.task_id {
                return Err(CatalogError::DuplicateSubtask {
                    subtask_id: subtask.subtask_id,
                    first_task: owner,
                    second_task: task.task_id,
                });
            }
            for raw in &subtask.questions {
                if !is_dotted_ordinal(&raw.question_id) {
                    return Err(CatalogError::MalformedQuestionId(raw.question_id.clone()));
                }
                if seen.contains_key(&raw.question_id) {
                    return Err(CatalogError::DuplicateQuestion(raw.question_id.clone()));
                }

                let condition = raw
                    .condition
                    .as_deref()
                    .map(str::parse::<Condition>)
                    .transpose()?;

                // Conditions may only look backwards: the referenced answer
                // has to exist by the time this question comes up.
                if let Some(referenced) = condition.as_ref().and_then(Condition::referenced_question) {
                    if !seen.contains_key(referenced) {
                        return Err(CatalogError::DanglingReference {
                            question_id: raw.question_id.clone(),
                            referenced: referenced.to_string(),
                        });
                    }
                }

                seen.insert(raw.question_id.clone(), questions.len());
                questions.push(Question {
                    question_id: raw.question_id.clone(),
                    task_id: task.task_id,
                    task_name: task.task_name.clone(),
                    subtask_id: subtask.subtask_id,
                    subtask_name: subtask.subtask_name.clone(),
                    prompt_text: raw.prompt_text.clone(),
                    field_name: raw.field_name.clone(),
                    data_type: raw.data_type,
                    required: raw.required,
                    validation_rule: raw.validation_rule,
                    condition,
                    read_accessor: raw.read_accessor.clone(),
                    write_accessor: raw.write_accessor.clone(),
                });
            }
        }
    }

    if questions.is_empty() {
        return Err(CatalogError::Empty);
    }

    Ok(questions)
}

fn is_dotted_ordinal(id: &str) -> bool {
    let mut parts = 0;
    for part in id.split('.') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        parts += 1;
    }
    parts >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_ordinals() {
        assert!(is_dotted_ordinal("1.1"));
        assert!(is_dotted_ordinal("12.30"));
        assert!(is_dotted_ordinal("1.2.3"));
        assert!(!is_dotted_ordinal("1"));
        assert!(!is_dotted_ordinal("1."));
        assert!(!is_dotted_ordinal("a.1"));
        assert!(!is_dotted_ordinal(""));
    }

    #[test]
    fn builtin_catalog_flattens() {
        let definition = parse_definition(builtin_source()).unwrap();
        let questions = flatten(&definition).unwrap();
        assert_eq!(questions[0].question_id, "1.1");
        assert!(questions.iter().any(|q| q.condition == Some(Condition::NoValidItin)));
    }
}
