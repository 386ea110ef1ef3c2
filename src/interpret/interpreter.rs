use tracing::debug;

use super::extract::extract_value;
use super::rules::strip_trailing_punctuation;
use super::types::{Interpretation, ReplyContext, ReplyKind};
use super::vocabulary::{is_bare_rejection, is_confirmation, is_rejection};

/// Classifies a free-text reply to the question currently awaiting one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyInterpreter;

impl ReplyInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn interpret(&self, message: &str, ctx: ReplyContext<'_>) -> Interpretation {
        // "Yes." and "no!" classify like "yes" and "no".
        let normalized = strip_trailing_punctuation(&message.to_lowercase());

        if is_confirmation(&normalized) {
            debug!("Reply classified as confirmation");
            return Interpretation::confirm();
        }

        if is_rejection(&normalized) {
            let extracted = extract_value(message, ctx);
            if extracted.is_empty() || is_bare_rejection(&extracted) {
                debug!("Reply classified as bare rejection");
                return Interpretation::reject();
            }
            debug!("Reply classified as rejection with value");
            return Interpretation {
                kind: ReplyKind::RejectWithValue,
                value: Some(extracted),
            };
        }

        Interpretation {
            kind: ReplyKind::Value,
            value: Some(extract_value(message, ctx)),
        }
    }
}
