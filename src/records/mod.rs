//! Client record collaborators: read a field's stored value, write a new one.
//!
//! The workflow only sees these traits. Whether a value comes from a map in
//! memory or from an agent's prose answer is an adapter detail.

pub mod agent;
pub mod memory;
pub mod types;

pub use agent::AgentRecordStore;
pub use memory::InMemoryRecordStore;
pub use types::{LookupSource, RecordLookup, WriteOutcome};

use async_trait::async_trait;
use std::collections::HashMap;

use crate::catalog::FieldSpec;
use crate::error::RecordError;
use crate::session::SessionKey;

#[async_trait]
pub trait RecordReader: Send + Sync {
    async fn get_value(
        &self,
        field: &FieldSpec,
        session: &SessionKey,
    ) -> Result<RecordLookup, RecordError>;
}

#[async_trait]
pub trait RecordWriter: Send + Sync {
    /// `Ok` with `success == false` means the backend answered but refused.
    async fn set_value(
        &self,
        field: &FieldSpec,
        new_value: &str,
        session: &SessionKey,
    ) -> Result<WriteOutcome, RecordError>;
}

/// Which of `fields` already hold a value for this session's client.
pub async fn existing_fields(
    reader: &dyn RecordReader,
    fields: &[FieldSpec],
    session: &SessionKey,
) -> Result<HashMap<String, bool>, RecordError> {
    let mut results = HashMap::with_capacity(fields.len());
    for field in fields {
        let lookup = reader.get_value(field, session).await?;
        results.insert(field.field_name.clone(), lookup.exists);
    }
    Ok(results)
}
