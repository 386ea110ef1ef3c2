use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use super::rules::{
    apply_rules, strip_trailing_punctuation, RECORD_DECORATIONS, RECORD_PREFIXES, REPLY_PREFIXES,
};
use super::types::ReplyContext;
use super::vocabulary::mentions_not_found;
use crate::catalog::{DataType, ITIN_FIELD};
use crate::workflow::state::AnswerValue;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid regex"));
static LONG_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}",
    )
    .expect("valid regex")
});
static ITIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"9\d{2}-\d{2}-\d{4}").expect("valid regex"));
static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
// Captures to the end of the answer; dots inside the value are kept.
static IS_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:is|are)[\s:]+(.+?)\.?\s*$").expect("valid regex"));
static YES_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:yes|true)\b").expect("valid regex"));
static NO_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:no|false)\b").expect("valid regex"));

/// Pulls the value out of a user reply, dropping conversational wrapping.
///
/// Dates and ITINs are matched anywhere in the message when the question
/// expects one; otherwise the reply prefix table runs once over the whole
/// message. May return an empty string.
pub fn extract_value(message: &str, ctx: ReplyContext<'_>) -> String {
    let message = message.trim();

    if ctx.data_type == DataType::Date {
        if let Some(m) = ISO_DATE.find(message) {
            return m.as_str().to_string();
        }
    }

    if ctx.field_name == ITIN_FIELD {
        if let Some(m) = ITIN.find(message) {
            return m.as_str().to_string();
        }
    }

    let cleaned = apply_rules(&REPLY_PREFIXES, message);
    strip_trailing_punctuation(&cleaned)
}

/// Canonical value from an agent's prose answer about a stored field, or
/// None when the answer says there is nothing on file.
pub fn normalize_record_answer(
    text: &str,
    data_type: DataType,
    field_name: &str,
) -> Option<AnswerValue> {
    let original = text.trim();
    let lowered = original.to_lowercase();

    if mentions_not_found(&lowered) {
        return None;
    }

    if data_type == DataType::Boolean {
        if YES_WORD.is_match(original) {
            return Some(AnswerValue::Bool(true));
        }
        if NO_WORD.is_match(original) {
            return Some(AnswerValue::Bool(false));
        }
    }

    if data_type == DataType::Date {
        if let Some(m) = ISO_DATE.find(original) {
            return Some(AnswerValue::Text(m.as_str().to_string()));
        }
        if let Some(m) = LONG_DATE.find(original) {
            return Some(AnswerValue::Text(long_date_to_iso(m.as_str())));
        }
    }

    if field_name == ITIN_FIELD {
        if let Some(m) = ITIN.find(original) {
            return Some(AnswerValue::Text(m.as_str().to_string()));
        }
    }

    if let Some(caps) = BOLD_SPAN.captures(original) {
        return non_empty(caps[1].trim().to_string());
    }

    if let Some(caps) = IS_VALUE.captures(original) {
        return non_empty(strip_trailing_punctuation(&caps[1]));
    }

    let cleaned = apply_rules(&RECORD_PREFIXES, original);
    let cleaned = apply_rules(&RECORD_DECORATIONS, cleaned.trim());
    non_empty(strip_trailing_punctuation(&cleaned))
}

/// "June 16, 1999" -> "1999-06-16"; left as written if it is not a real date.
fn long_date_to_iso(raw: &str) -> String {
    let compact = raw.replace(',', "");
    match NaiveDate::parse_from_str(&compact, "%B %d %Y") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn non_empty(value: String) -> Option<AnswerValue> {
    if value.is_empty() {
        None
    } else {
        Some(AnswerValue::Text(value))
    }
}
