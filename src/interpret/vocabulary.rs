//! Fixed phrase lists used to classify replies and agent answers.
//!
//! All entries are lowercase; callers lowercase before matching.

pub const CONFIRMATIONS: &[&str] = &[
    "yes",
    "y",
    "correct",
    "ok",
    "okay",
    "yeah",
    "yep",
    "yup",
    "sure",
    "that's right",
    "that is right",
    "right",
    "exactly",
    "absolutely",
    "yes that's correct",
    "yes that is correct",
    "yes correct",
    "yes that's my",
    "yes that is my",
    "that's my",
    "that is my",
    "that's correct",
    "that is correct",
    "looks good",
    "confirm",
    "affirmative",
    "indeed",
    "si",
    "oui",
];

pub const REJECTIONS: &[&str] = &[
    "no",
    "n",
    "incorrect",
    "wrong",
    "nope",
    "nah",
    "that's not",
    "that is not",
    "not correct",
    "not right",
];

/// Rejections that carry no replacement value once cleaned.
pub const BARE_REJECTIONS: &[&str] = &[
    "no",
    "n",
    "incorrect",
    "wrong",
    "nope",
    "nah",
    "that's not",
    "that is not",
    "not correct",
    "not right",
    "that's not right",
    "that's not correct",
    "that is not right",
    "that is not correct",
    "that's wrong",
    "that is wrong",
    "it's wrong",
    "it's not right",
    "it's not correct",
];

/// Phrases in an agent answer meaning the field has no stored value.
pub const NOT_FOUND_INDICATORS: &[&str] = &[
    "not provided",
    "not found",
    "no data",
    "null",
    "none",
    "not available",
    "missing",
    "not specified",
    "unknown",
    "does not have",
    "hasn't provided",
    "no information",
];

/// Words in an agent reply meaning an update went through.
pub const WRITE_SUCCESS_INDICATORS: &[&str] =
    &["success", "updated", "saved", "changed", "confirmed"];

/// Exact match, or the phrase followed by a space or comma and more text.
pub fn matches_phrase(normalized: &str, vocabulary: &[&str]) -> bool {
    vocabulary.iter().any(|phrase| {
        normalized == *phrase
            || normalized
                .strip_prefix(phrase)
                .is_some_and(|rest| rest.starts_with(' ') || rest.starts_with(','))
    })
}

pub fn is_confirmation(normalized: &str) -> bool {
    matches_phrase(normalized, CONFIRMATIONS)
}

pub fn is_rejection(normalized: &str) -> bool {
    matches_phrase(normalized, REJECTIONS)
}

/// True when cleaned text is nothing but a rejection word or phrase.
pub fn is_bare_rejection(cleaned: &str) -> bool {
    let lowered = cleaned.trim().to_lowercase();
    BARE_REJECTIONS.contains(&lowered.as_str())
}

pub fn mentions_not_found(lowered: &str) -> bool {
    NOT_FOUND_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
}
