use std::io::Write;

use taxflow::catalog::{Condition, DataType, QuestionCatalog, ValidationRule};
use taxflow::error::CatalogError;

fn catalog_json(questions: &str) -> String {
    format!(
        r#"{{
            "filing_name": "TEST",
            "tasks": [{{
                "task_id": 1,
                "task_name": "Only Task",
                "subtasks": [{{
                    "subtask_id": 1,
                    "subtask_name": "Only Subtask",
                    "questions": [{}]
                }}]
            }}]
        }}"#,
        questions
    )
}

fn question(id: &str, condition: Option<&str>) -> String {
    let condition = condition
        .map(|c| format!(r#", "condition": "{}""#, c))
        .unwrap_or_default();
    format!(
        r#"{{ "question_id": "{}", "prompt_text": "Q{}?", "field_name": "field_{}", "data_type": "string", "required": true{} }}"#,
        id,
        id,
        id.replace('.', "_"),
        condition
    )
}

#[test]
fn builtin_catalog_loads_in_definition_order() {
    let catalog = QuestionCatalog::builtin().unwrap();

    assert_eq!(catalog.filing_name(), "1040NR");
    assert_eq!(catalog.len(), 11);

    let ids: Vec<&str> = catalog
        .all_in_order()
        .iter()
        .map(|q| q.question_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["1.1", "1.2", "1.3", "1.4", "1.5", "2.1", "2.2", "2.3", "2.4", "3.1", "3.2"]
    );

    // Stable across calls.
    let again: Vec<&str> = catalog
        .all_in_order()
        .iter()
        .map(|q| q.question_id.as_str())
        .collect();
    assert_eq!(ids, again);
}

#[test]
fn lookup_returns_flattened_question() {
    let catalog = QuestionCatalog::builtin().unwrap();

    let itin = catalog.lookup("2.2").unwrap();
    assert_eq!(itin.task_id, 2);
    assert_eq!(itin.task_name, "Tax Identification");
    assert_eq!(itin.field_name, "itin_number");
    assert_eq!(itin.validation_rule, Some(ValidationRule::ValidItin));
    assert_eq!(itin.condition, Some(Condition::AnswerIsYes("2.1".into())));
    assert!(itin.is_itin_field());

    let dob = catalog.lookup("1.2").unwrap();
    assert_eq!(dob.data_type, DataType::Date);
    assert_eq!(dob.field_label(), "date of birth");

    assert!(catalog.lookup("9.9").is_none());
}

#[test]
fn builtin_catalog_uses_every_condition_kind() {
    let catalog = QuestionCatalog::builtin().unwrap();
    let conditions: Vec<String> = catalog
        .all_in_order()
        .iter()
        .filter_map(|q| q.condition.as_ref().map(|c| c.to_string()))
        .collect();

    assert!(conditions.contains(&"answer_2.1_is_yes".to_string()));
    assert!(conditions.contains(&"has_itin".to_string()));
    assert!(conditions.contains(&"no_valid_itin".to_string()));
    assert!(conditions.contains(&"previous_year_exists".to_string()));
    assert!(conditions.contains(&"previous_year_had_1042s".to_string()));
}

#[test]
fn condition_tags_round_trip_through_display() {
    for tag in [
        "answer_2.1_is_yes",
        "answer_1.3_is_no",
        "no_valid_itin",
        "has_itin",
        "previous_year_exists",
        "previous_year_had_1099",
    ] {
        let condition: Condition = tag.parse().unwrap();
        assert_eq!(condition.to_string(), tag);
    }
}

#[test]
fn unknown_condition_is_rejected_at_load() {
    let json = catalog_json(&question("1.1", Some("when_it_rains")));
    match QuestionCatalog::from_json_str(&json) {
        Err(CatalogError::UnknownCondition(tag)) => assert_eq!(tag, "when_it_rains"),
        other => panic!("expected UnknownCondition, got {:?}", other),
    }
}

#[test]
fn duplicate_question_id_is_rejected() {
    let json = catalog_json(&format!("{}, {}", question("1.1", None), question("1.1", None)));
    assert!(matches!(
        QuestionCatalog::from_json_str(&json),
        Err(CatalogError::DuplicateQuestion(id)) if id == "1.1"
    ));
}

#[test]
fn subtask_id_reused_by_another_task_is_rejected() {
    let json = format!(
        r#"{{
            "tasks": [
                {{ "task_id": 1, "task_name": "A", "subtasks": [
                    {{ "subtask_id": 1, "subtask_name": "A1", "questions": [{}] }}
                ] }},
                {{ "task_id": 2, "task_name": "B", "subtasks": [
                    {{ "subtask_id": 1, "subtask_name": "B1", "questions": [{}] }}
                ] }}
            ]
        }}"#,
        question("1.1", None),
        question("2.1", None)
    );

    match QuestionCatalog::from_json_str(&json) {
        Err(CatalogError::DuplicateSubtask {
            subtask_id,
            first_task,
            second_task,
        }) => {
            assert_eq!(subtask_id, 1);
            assert_eq!(first_task, 1);
            assert_eq!(second_task, 2);
        }
        other => panic!("expected DuplicateSubtask, got {:?}", other),
    }
}

#[test]
fn non_dotted_id_is_rejected() {
    let json = catalog_json(&question("first", None));
    assert!(matches!(
        QuestionCatalog::from_json_str(&json),
        Err(CatalogError::MalformedQuestionId(_))
    ));
}

#[test]
fn condition_must_reference_an_earlier_question() {
    let json = catalog_json(&format!(
        "{}, {}",
        question("1.1", Some("answer_1.2_is_yes")),
        question("1.2", None)
    ));
    match QuestionCatalog::from_json_str(&json) {
        Err(CatalogError::DanglingReference {
            question_id,
            referenced,
        }) => {
            assert_eq!(question_id, "1.1");
            assert_eq!(referenced, "1.2");
        }
        other => panic!("expected DanglingReference, got {:?}", other),
    }
}

#[test]
fn empty_and_malformed_catalogs_fail() {
    assert!(matches!(
        QuestionCatalog::from_json_str(&catalog_json("")),
        Err(CatalogError::Empty)
    ));
    assert!(matches!(
        QuestionCatalog::from_json_str("{ not json"),
        Err(CatalogError::Parse(_))
    ));
}

#[test]
fn load_reads_catalog_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = catalog_json(&format!("{}, {}", question("1.1", None), question("1.2", None)));
    file.write_all(json.as_bytes()).unwrap();

    let catalog = QuestionCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.filing_name(), "TEST");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.position("1.2"), Some(1));
}

#[test]
fn missing_catalog_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(
        QuestionCatalog::load(&missing),
        Err(CatalogError::Io { .. })
    ));
}
