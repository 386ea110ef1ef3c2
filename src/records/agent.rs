use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{LookupSource, RecordLookup, WriteOutcome};
use super::{RecordReader, RecordWriter};
use crate::catalog::FieldSpec;
use crate::error::RecordError;
use crate::interpret::normalize_record_answer;
use crate::interpret::vocabulary::WRITE_SUCCESS_INDICATORS;
use crate::services::llm::AgentHandle;
use crate::session::SessionKey;

const FOUND_CONFIDENCE: f32 = 0.9;
const NOT_FOUND_CONFIDENCE: f32 = 0.5;

/// Reads and writes client fields by asking the record agent in plain
/// language and parsing what it says back.
pub struct AgentRecordStore {
    agent: Arc<AgentHandle>,
}

impl AgentRecordStore {
    pub fn new(agent: Arc<AgentHandle>) -> Self {
        Self { agent }
    }

    async fn ask(&self, question: &str, session: &SessionKey) -> Result<String, RecordError> {
        let agent = self
            .agent
            .get()
            .await
            .map_err(|e| RecordError::Unavailable(e.to_string()))?;

        agent.ask(question, session).await.map_err(|e| {
            warn!("Record agent call failed: {:#}", e);
            RecordError::Agent(e.to_string())
        })
    }
}

pub fn read_query(field: &FieldSpec) -> String {
    format!(
        "What is the value of '{}' for this client? Just return the value, nothing else.",
        field.field_name
    )
}

pub fn update_query(field: &FieldSpec, new_value: &str) -> String {
    let tool = field.write_accessor.as_deref().unwrap_or("the appropriate update tool");
    format!(
        "Please update the client's {} to: {}\n\nUse the update tool ({}) to make this change.\nConfirm the update was successful.",
        field.field_name, new_value, tool
    )
}

pub fn reports_success(reply: &str) -> bool {
    let lowered = reply.to_lowercase();
    WRITE_SUCCESS_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
}

#[async_trait]
impl RecordReader for AgentRecordStore {
    async fn get_value(
        &self,
        field: &FieldSpec,
        session: &SessionKey,
    ) -> Result<RecordLookup, RecordError> {
        let reply = self.ask(&read_query(field), session).await?;
        let lookup = match normalize_record_answer(&reply, field.data_type, &field.field_name) {
            Some(value) => RecordLookup::found(value, FOUND_CONFIDENCE, LookupSource::Agent),
            None => RecordLookup::missing(NOT_FOUND_CONFIDENCE),
        };
        debug!("Lookup {} exists={}", field.field_name, lookup.exists);
        Ok(lookup)
    }
}

#[async_trait]
impl RecordWriter for AgentRecordStore {
    async fn set_value(
        &self,
        field: &FieldSpec,
        new_value: &str,
        session: &SessionKey,
    ) -> Result<WriteOutcome, RecordError> {
        let reply = self.ask(&update_query(field, new_value), session).await?;
        let success = reports_success(&reply);
        if !success {
            warn!("Agent did not confirm update of {}", field.field_name);
        }
        Ok(WriteOutcome {
            success,
            message: reply,
        })
    }
}
