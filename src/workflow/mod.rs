//! Workflow Session Controller and the pieces it drives: per-session state,
//! the sequencer, the validator and response text.

pub mod controller;
pub mod response;
pub mod sequencer;
pub mod state;
pub mod validator;

pub use controller::{WorkflowController, WorkflowStatus};
pub use sequencer::{Progress, Sequencer};
pub use state::{AnswerRecord, AnswerValue, WorkflowDelta, WorkflowPhase, WorkflowState};
pub use validator::{AnswerValidator, ValidationError};
