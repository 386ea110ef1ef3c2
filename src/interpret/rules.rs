//! Ordered text-cleanup tables.
//!
//! Each rule runs exactly once, in table order, against the output of the
//! previous rule. Rules are anchored, so a rule that does not match leaves
//! the text untouched.

use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug)]
pub struct CleanupRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl CleanupRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid cleanup pattern"),
            replacement,
        }
    }

    /// Applies the rule once. Unanchored rules replace every match.
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// Leading conversational wrapping on a user reply
/// ("No, it's ...", "my name is ...", "change it to ...").
pub static REPLY_PREFIXES: LazyLock<Vec<CleanupRule>> = LazyLock::new(|| {
    vec![
        CleanupRule::new("no_its", r"(?i)^no,?\s*it'?s\s+", ""),
        CleanupRule::new("no_my_x_is", r"(?i)^no,?\s*my\s+\w+\s+is\s+", ""),
        CleanupRule::new(
            "no_the_correct_x_is",
            r"(?i)^no,?\s*the\s+correct\s+(?:value|name|answer)\s+is\s+",
            "",
        ),
        // Word boundary keeps "nope"/"Norway" intact.
        CleanupRule::new("leading_no", r"(?i)^no\b,?\s*", ""),
        CleanupRule::new("its", r"(?i)^it'?s\s+", ""),
        CleanupRule::new(
            "the_correct_x_is",
            r"(?i)^the\s+correct\s+(?:value|name|answer)\s+is\s+",
            "",
        ),
        CleanupRule::new("my_x_is", r"(?i)^my\s+\w+\s+is\s+", ""),
        CleanupRule::new("actually", r"(?i)^(?:actually|correct)\s+", ""),
        CleanupRule::new("change_to", r"(?i)^change\s+(?:it\s+)?to\s+", ""),
        CleanupRule::new("update_to", r"(?i)^update\s+(?:it\s+)?to\s+", ""),
    ]
});

/// Verbose lead-ins an agent puts before a stored value
/// ("value of 'x' for this client is ...", "The client's ...").
pub static RECORD_PREFIXES: LazyLock<Vec<CleanupRule>> = LazyLock::new(|| {
    vec![
        CleanupRule::new(
            "value_of_field",
            r#"(?i)^value of ['"].*?['"] for (?:this )?client is\s+"#,
            "",
        ),
        CleanupRule::new("client_is", r"(?i)^(?:the\s+)?client(?:'s|\s+is)\s+", ""),
        CleanupRule::new(
            "for_client_is",
            r"(?i)^for (?:this )?client,?\s+(?:it\s+)?is\s+",
            "",
        ),
        CleanupRule::new("client_possessive", r"(?i)^(?:the\s+)?client['’]s\s+", ""),
        CleanupRule::new("the", r"(?i)^the\s+", ""),
        CleanupRule::new("it_is", r"(?i)^it is\s+", ""),
        CleanupRule::new("they_are", r"(?i)^they are\s+", ""),
        CleanupRule::new("this_is", r"(?i)^this is\s+", ""),
        CleanupRule::new("currently", r"(?i)^currently\s+", ""),
        CleanupRule::new("pronoun_x_is", r"(?i)^(?:his|her|their)\s+.*?\s+is\s+", ""),
    ]
});

/// Markdown emphasis markers, then one surrounding quote on each end.
pub static RECORD_DECORATIONS: LazyLock<Vec<CleanupRule>> = LazyLock::new(|| {
    vec![
        CleanupRule::new("bold", r"\*\*", ""),
        CleanupRule::new("underline", r"__", ""),
        CleanupRule::new("surrounding_quotes", r#"^["']|["']$"#, ""),
    ]
});

static TRAILING_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,;!?]+$").expect("valid regex"));

pub fn apply_rules(rules: &[CleanupRule], text: &str) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

pub fn strip_trailing_punctuation(text: &str) -> String {
    TRAILING_PUNCTUATION.replace(text.trim(), "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule<'a>(rules: &'a [CleanupRule], name: &str) -> &'a CleanupRule {
        rules.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn no_its_strips_lead_in() {
        let r = rule(&REPLY_PREFIXES, "no_its");
        assert_eq!(r.apply("No, it's Jane"), "Jane");
        assert_eq!(r.apply("no its Jane"), "Jane");
        assert_eq!(r.apply("Jane"), "Jane");
    }

    #[test]
    fn no_my_x_is_strips_lead_in() {
        let r = rule(&REPLY_PREFIXES, "no_my_x_is");
        assert_eq!(r.apply("no my name is Alex"), "Alex");
    }

    #[test]
    fn leading_no_needs_word_boundary() {
        let r = rule(&REPLY_PREFIXES, "leading_no");
        assert_eq!(r.apply("no, Canada"), "Canada");
        assert_eq!(r.apply("nope"), "nope");
        assert_eq!(r.apply("Norway"), "Norway");
    }

    #[test]
    fn change_and_update_forms() {
        assert_eq!(rule(&REPLY_PREFIXES, "change_to").apply("change it to Peru"), "Peru");
        assert_eq!(rule(&REPLY_PREFIXES, "update_to").apply("Update to Peru"), "Peru");
    }

    #[test]
    fn reply_table_runs_in_order() {
        assert_eq!(
            apply_rules(&REPLY_PREFIXES, "The correct name is John Doe"),
            "John Doe"
        );
        assert_eq!(apply_rules(&REPLY_PREFIXES, "It's Jane Smith"), "Jane Smith");
    }

    #[test]
    fn record_value_of_field_rule() {
        let r = rule(&RECORD_PREFIXES, "value_of_field");
        assert_eq!(
            r.apply("value of 'country_of_residence' for this client is India"),
            "India"
        );
    }

    #[test]
    fn record_pronoun_rule() {
        let r = rule(&RECORD_PREFIXES, "pronoun_x_is");
        assert_eq!(r.apply("Her filing status is single"), "single");
    }

    #[test]
    fn decorations_remove_markdown_and_quotes() {
        assert_eq!(apply_rules(&RECORD_DECORATIONS, "\"__India__\""), "India");
    }

    #[test]
    fn trailing_punctuation() {
        assert_eq!(strip_trailing_punctuation("Jane Smith.!"), "Jane Smith");
        assert_eq!(strip_trailing_punctuation("  ok  "), "ok");
    }
}
