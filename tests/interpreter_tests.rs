use taxflow::catalog::DataType;
use taxflow::interpret::vocabulary::CONFIRMATIONS;
use taxflow::interpret::{
    extract_value, normalize_record_answer, ReplyContext, ReplyInterpreter, ReplyKind,
};
use taxflow::workflow::state::AnswerValue;

fn text_ctx() -> ReplyContext<'static> {
    ReplyContext::new(DataType::String, "full_legal_name")
}

fn date_ctx() -> ReplyContext<'static> {
    ReplyContext::new(DataType::Date, "date_of_birth")
}

#[test]
fn plain_yes_is_confirmation() {
    let interpreter = ReplyInterpreter::new();
    for reply in ["yes", "Yes", "  YES  ", "yep", "that's right", "yes that's my name", "oui"] {
        let result = interpreter.interpret(reply, text_ctx());
        assert_eq!(result.kind, ReplyKind::Confirm, "{:?}", reply);
        assert!(result.value.is_none());
    }
}

#[test]
fn every_confirmation_phrase_confirms_with_or_without_punctuation() {
    let interpreter = ReplyInterpreter::new();
    for phrase in CONFIRMATIONS {
        for reply in [phrase.to_string(), format!("{}.", phrase), format!("{},", phrase)] {
            let result = interpreter.interpret(&reply, text_ctx());
            assert_eq!(result.kind, ReplyKind::Confirm, "{:?}", reply);
            assert!(result.value.is_none(), "{:?}", reply);
        }
    }
}

#[test]
fn rejection_with_value_keeps_the_value() {
    let interpreter = ReplyInterpreter::new();
    let result = interpreter.interpret("no my name is Alex", text_ctx());
    assert_eq!(result.kind, ReplyKind::RejectWithValue);
    assert_eq!(result.value.as_deref(), Some("Alex"));
}

#[test]
fn rejection_with_date_uses_date_fast_path() {
    let interpreter = ReplyInterpreter::new();
    let result = interpreter.interpret("No, it's 1990-05-16", date_ctx());
    assert_eq!(result.kind, ReplyKind::RejectWithValue);
    assert_eq!(result.value.as_deref(), Some("1990-05-16"));
}

#[test]
fn bare_rejections() {
    let interpreter = ReplyInterpreter::new();
    for reply in ["no", "nope", "No.", "nah", "wrong", "that's not right", "no, that's wrong"] {
        let result = interpreter.interpret(reply, text_ctx());
        assert_eq!(result.kind, ReplyKind::Reject, "{:?}", reply);
        assert!(result.value.is_none(), "{:?}", reply);
    }
}

#[test]
fn anything_else_is_a_value() {
    let interpreter = ReplyInterpreter::new();

    let result = interpreter.interpret("It's Jane Smith.", text_ctx());
    assert_eq!(result.kind, ReplyKind::Value);
    assert_eq!(result.value.as_deref(), Some("Jane Smith"));

    let result = interpreter.interpret("The correct name is John Doe", text_ctx());
    assert_eq!(result.value.as_deref(), Some("John Doe"));

    // Leading "no" only counts as a word.
    let result = interpreter.interpret("Norway", ReplyContext::new(DataType::String, "country_of_residence"));
    assert_eq!(result.kind, ReplyKind::Value);
    assert_eq!(result.value.as_deref(), Some("Norway"));
}

#[test]
fn empty_reply_is_an_empty_value() {
    let result = ReplyInterpreter::new().interpret("   ", text_ctx());
    assert_eq!(result.kind, ReplyKind::Value);
    assert_eq!(result.value.as_deref(), Some(""));
}

#[test]
fn extraction_fast_paths() {
    assert_eq!(
        extract_value("born on 1990-05-16 in Lagos", date_ctx()),
        "1990-05-16"
    );
    assert_eq!(
        extract_value(
            "change it to 912-34-5678 please",
            ReplyContext::new(DataType::String, "itin_number")
        ),
        "912-34-5678"
    );
    // Not a date question: date text goes through normal cleanup.
    assert_eq!(extract_value("it's 1990-05-16!", text_ctx()), "1990-05-16");
}

#[test]
fn extraction_applies_each_prefix_once_in_order() {
    assert_eq!(extract_value("update it to Canada", text_ctx()), "Canada");
    assert_eq!(extract_value("Actually Maria Lopez", text_ctx()), "Maria Lopez");
    assert_eq!(extract_value("No, the correct value is single", text_ctx()), "single");
}

#[test]
fn record_answer_not_found() {
    for reply in ["Not provided", "The value is null.", "No information available", "Unknown"] {
        assert_eq!(
            normalize_record_answer(reply, DataType::String, "full_legal_name"),
            None,
            "{:?}",
            reply
        );
    }
}

#[test]
fn record_answer_bold_value() {
    assert_eq!(
        normalize_record_answer(
            "The value of 'full_legal_name' for this client is **Robert Da Elvis**.",
            DataType::String,
            "full_legal_name"
        ),
        Some(AnswerValue::Text("Robert Da Elvis".into()))
    );
}

#[test]
fn record_answer_is_phrase() {
    assert_eq!(
        normalize_record_answer(
            "The client's country of residence is India.",
            DataType::String,
            "country_of_residence"
        ),
        Some(AnswerValue::Text("India".into()))
    );
    // "is" inside a name is not a lead-in.
    assert_eq!(
        normalize_record_answer("Chris Evans", DataType::String, "full_legal_name"),
        Some(AnswerValue::Text("Chris Evans".into()))
    );
}

#[test]
fn record_answer_value_may_contain_dots() {
    assert_eq!(
        normalize_record_answer("The email is jane.doe@example.com", DataType::String, "email"),
        Some(AnswerValue::Text("jane.doe@example.com".into()))
    );
    assert_eq!(
        normalize_record_answer("Her name is J. Smith.", DataType::String, "full_legal_name"),
        Some(AnswerValue::Text("J. Smith".into()))
    );
}

#[test]
fn record_answer_plain_and_quoted() {
    assert_eq!(
        normalize_record_answer("\"Jane Smith\"", DataType::String, "full_legal_name"),
        Some(AnswerValue::Text("Jane Smith".into()))
    );
    assert_eq!(
        normalize_record_answer("Currently single.", DataType::String, "filing_status"),
        Some(AnswerValue::Text("single".into()))
    );
}

#[test]
fn record_answer_dates() {
    assert_eq!(
        normalize_record_answer("client is June 16, 1999", DataType::Date, "date_of_birth"),
        Some(AnswerValue::Text("1999-06-16".into()))
    );
    assert_eq!(
        normalize_record_answer("DOB: 1985-01-02", DataType::Date, "date_of_birth"),
        Some(AnswerValue::Text("1985-01-02".into()))
    );
}

#[test]
fn record_answer_booleans() {
    assert_eq!(
        normalize_record_answer("Yes, the client has an ITIN.", DataType::Boolean, "has_itin"),
        Some(AnswerValue::Bool(true))
    );
    assert_eq!(
        normalize_record_answer("False", DataType::Boolean, "has_itin"),
        Some(AnswerValue::Bool(false))
    );
}

#[test]
fn record_answer_itin() {
    assert_eq!(
        normalize_record_answer("Their ITIN is 987-65-4321", DataType::String, "itin_number"),
        Some(AnswerValue::Text("987-65-4321".into()))
    );
}
