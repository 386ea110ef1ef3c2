use serde::{Deserialize, Serialize};

use crate::workflow::state::AnswerValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
    Store,
    Agent,
    NotFound,
}

/// Result of reading one field from the client record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLookup {
    pub value: Option<AnswerValue>,
    pub exists: bool,
    pub confidence: f32,
    pub source: LookupSource,
}

impl RecordLookup {
    pub fn found(value: AnswerValue, confidence: f32, source: LookupSource) -> Self {
        Self {
            value: Some(value),
            exists: true,
            confidence,
            source,
        }
    }

    pub fn missing(confidence: f32) -> Self {
        Self {
            value: None,
            exists: false,
            confidence,
            source: LookupSource::NotFound,
        }
    }

    /// The stored value to show the user, if any. A stored `false` counts.
    pub fn on_file(&self) -> Option<&AnswerValue> {
        if !self.exists {
            return None;
        }
        self.value
            .as_ref()
            .filter(|v| !matches!(v, AnswerValue::Text(s) if s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub success: bool,
    pub message: String,
}

impl WriteOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
