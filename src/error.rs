use std::path::PathBuf;

/// Failures loading the question catalog. Any of these aborts start-up.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog defines no questions")]
    Empty,

    #[error("question id {0} is defined more than once")]
    DuplicateQuestion(String),

    #[error("question id {0} is not a dotted ordinal (e.g. \"2.3\")")]
    MalformedQuestionId(String),

    #[error("subtask id {subtask_id} is used by both task {first_task} and task {second_task}")]
    DuplicateSubtask {
        subtask_id: u32,
        first_task: u32,
        second_task: u32,
    },

    #[error("unknown condition tag: {0}")]
    UnknownCondition(String),

    /// An `answer_<id>_is_*` condition points at a question that is not
    /// asked before the conditioned one.
    #[error("question {question_id} depends on {referenced}, which is not defined earlier")]
    DanglingReference {
        question_id: String,
        referenced: String,
    },
}

/// Failures of the external record store, whatever backs it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecordError {
    #[error("agent request failed: {0}")]
    Agent(String),

    #[error("record backend error: {0}")]
    Backend(String),

    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session state could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid session key: {0}")]
    InvalidKey(String),

    #[error("reference must be 'company' or 'individual', got '{0}'")]
    InvalidReference(String),

    /// The file at a user's session path holds another user's state.
    #[error("session file {path} belongs to user '{owner}'")]
    ForeignRecord { path: PathBuf, owner: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}
