//! User-facing response text for every controller outcome.

use crate::catalog::Question;
use crate::workflow::state::AnswerValue;
use crate::workflow::validator::ValidationError;

pub const CONFIRM_ACK: &str = "Great! ";

pub fn already_complete(filing: &str) -> String {
    format!(
        "It looks like your {} filing is already complete! All questions have been answered.",
        filing
    )
}

pub fn start_prompt(filing: &str, question: &Question, on_file: Option<&AnswerValue>) -> String {
    let label = question.field_label();
    match on_file {
        Some(value) => format!(
            "Hi! Let's start your {} filing. **{}**\n\nI found your {} as: **{}**\n\nIs this correct? Please reply with 'Yes' to confirm or provide the correct value.",
            filing, question.prompt_text, label, value
        ),
        None => format!(
            "Hi! Let's start your {} filing. **{}**\n\nI don't have this information on file. Please provide your {}.",
            filing, question.prompt_text, label
        ),
    }
}

pub fn next_prompt(ack: &str, question: &Question, on_file: Option<&AnswerValue>) -> String {
    let label = question.field_label();
    match on_file {
        Some(value) => format!(
            "{}**{}**\n\nI have your {} as: **{}**\n\nIs this correct? Reply 'Yes' to confirm or provide the correct value.",
            ack, question.prompt_text, label, value
        ),
        None => format!(
            "{}**{}**\n\nI don't have this information on file. Please provide your {}.",
            ack, question.prompt_text, label
        ),
    }
}

pub fn updated_ack(question: &Question, value: &AnswerValue) -> String {
    format!(
        "Updated! Your {} is now **{}**.\n\n",
        question.field_label(),
        value
    )
}

pub fn completed(ack: &str, answered: usize, filing: &str) -> String {
    format!(
        "{}🎉 **Congratulations!** You've completed all {} questions for your {} filing!\n\nYour information has been saved. We'll proceed with generating your tax return.",
        ack, answered, filing
    )
}

pub fn reject_reprompt(question: &Question) -> String {
    format!(
        "I understand the current value is incorrect. Please provide the correct {}.",
        question.field_label()
    )
}

/// Confirmation of a required field with nothing on file.
pub fn nothing_to_confirm(question: &Question) -> String {
    format!(
        "I don't have a {} on file to confirm yet. Please provide your {}.",
        question.field_label(),
        question.field_label()
    )
}

pub fn validation_failed(error: &ValidationError) -> String {
    format!("❌ {} Please try again.", error)
}

pub fn write_failed(message: &str) -> String {
    format!("Sorry, I couldn't update the database. Error: {}", message)
}

pub fn read_failed(question: &Question, message: &str) -> String {
    format!(
        "Sorry, I couldn't look up your {} right now. Error: {}. Please try again.",
        question.field_label(),
        message
    )
}

pub fn start_over() -> String {
    "Sorry, I encountered an error. Please start over.".to_string()
}

pub fn session_unavailable() -> String {
    "Sorry, I couldn't access your saved progress right now. Please try again in a moment."
        .to_string()
}
