use serde::{Deserialize, Serialize};

use crate::catalog::{DataType, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplyKind {
    /// Accepts the value currently on file.
    Confirm,
    /// Refuses the value on file without supplying a new one.
    Reject,
    /// Refuses the value on file and supplies a replacement.
    RejectWithValue,
    /// Anything else; treated as an attempt to supply a value.
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub kind: ReplyKind,
    /// Set for `RejectWithValue` and `Value` (possibly empty for the latter).
    pub value: Option<String>,
}

impl Interpretation {
    pub fn confirm() -> Self {
        Self {
            kind: ReplyKind::Confirm,
            value: None,
        }
    }

    pub fn reject() -> Self {
        Self {
            kind: ReplyKind::Reject,
            value: None,
        }
    }

    /// Extracted value, or "" when none was attached.
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// What the interpreter knows about the question being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyContext<'a> {
    pub data_type: DataType,
    pub field_name: &'a str,
}

impl<'a> ReplyContext<'a> {
    pub fn new(data_type: DataType, field_name: &'a str) -> Self {
        Self {
            data_type,
            field_name,
        }
    }

    pub fn for_question(question: &'a Question) -> Self {
        Self::new(question.data_type, &question.field_name)
    }
}
