use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::types::{LookupSource, RecordLookup, WriteOutcome};
use super::{RecordReader, RecordWriter};
use crate::catalog::FieldSpec;
use crate::error::RecordError;
use crate::session::{ClientReference, SessionKey};
use crate::workflow::state::AnswerValue;

type ClientKey = (ClientReference, i64);

/// Client records held in process. Values written as text are stored as
/// booleans for boolean fields.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<ClientKey, HashMap<String, AnswerValue>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding for start-up data and tests.
    pub fn with_value(
        mut self,
        reference: ClientReference,
        client_id: i64,
        field_name: &str,
        value: AnswerValue,
    ) -> Self {
        self.records
            .get_mut()
            .entry((reference, client_id))
            .or_default()
            .insert(field_name.to_string(), value);
        self
    }

    pub async fn value_of(&self, session: &SessionKey, field_name: &str) -> Option<AnswerValue> {
        self.records
            .read()
            .await
            .get(&(session.reference, session.client_id))
            .and_then(|fields| fields.get(field_name))
            .cloned()
    }
}

#[async_trait]
impl RecordReader for InMemoryRecordStore {
    async fn get_value(
        &self,
        field: &FieldSpec,
        session: &SessionKey,
    ) -> Result<RecordLookup, RecordError> {
        Ok(match self.value_of(session, &field.field_name).await {
            Some(value) => RecordLookup::found(value, 1.0, LookupSource::Store),
            None => RecordLookup::missing(1.0),
        })
    }
}

#[async_trait]
impl RecordWriter for InMemoryRecordStore {
    async fn set_value(
        &self,
        field: &FieldSpec,
        new_value: &str,
        session: &SessionKey,
    ) -> Result<WriteOutcome, RecordError> {
        let value = AnswerValue::from_reply(field.data_type, new_value);
        self.records
            .write()
            .await
            .entry((session.reference, session.client_id))
            .or_default()
            .insert(field.field_name.clone(), value);
        Ok(WriteOutcome::ok(format!("Saved {}", field.label())))
    }
}
