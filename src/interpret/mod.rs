//! Utterance Interpreter: confirm / reject / value classification of user
//! replies, and value extraction for both replies and record-store answers.

pub mod extract;
pub mod interpreter;
pub mod rules;
pub mod types;
pub mod vocabulary;

pub use extract::{extract_value, normalize_record_answer};
pub use interpreter::ReplyInterpreter;
pub use types::{Interpretation, ReplyContext, ReplyKind};
