use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use taxflow::catalog::{DataType, FieldSpec};
use taxflow::error::RecordError;
use taxflow::records::{AgentRecordStore, LookupSource, RecordReader, RecordWriter};
use taxflow::services::llm::{AgentHandle, QueryAgent};
use taxflow::session::{ClientReference, SessionKey};
use taxflow::workflow::state::AnswerValue;

/// Answers every question with a fixed reply and remembers what it was asked.
struct ScriptedAgent {
    reply: Result<String, String>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            asked: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            asked: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl QueryAgent for ScriptedAgent {
    async fn ask(&self, question: &str, _session: &SessionKey) -> Result<String> {
        self.asked.lock().unwrap().push(question.to_string());
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

fn store_for(agent: Arc<ScriptedAgent>) -> AgentRecordStore {
    AgentRecordStore::new(Arc::new(AgentHandle::ready(agent)))
}

fn session() -> SessionKey {
    SessionKey::new("user-1", 456, ClientReference::Individual).unwrap()
}

#[tokio::test]
async fn read_asks_for_the_field_and_normalizes_reply() {
    let agent = ScriptedAgent::replying("The client's full legal name is **Robert Da Elvis**.");
    let store = store_for(agent.clone());
    let field = FieldSpec::new("full_legal_name", DataType::String);

    let lookup = store.get_value(&field, &session()).await.unwrap();
    assert!(lookup.exists);
    assert_eq!(lookup.value, Some(AnswerValue::Text("Robert Da Elvis".into())));
    assert_eq!(lookup.source, LookupSource::Agent);
    assert_eq!(lookup.confidence, 0.9);

    let asked = agent.asked.lock().unwrap();
    assert_eq!(
        asked[0],
        "What is the value of 'full_legal_name' for this client? Just return the value, nothing else."
    );
}

#[tokio::test]
async fn not_found_reply_is_missing() {
    let store = store_for(ScriptedAgent::replying("The date of birth is not provided."));
    let field = FieldSpec::new("date_of_birth", DataType::Date);

    let lookup = store.get_value(&field, &session()).await.unwrap();
    assert!(!lookup.exists);
    assert_eq!(lookup.value, None);
    assert_eq!(lookup.confidence, 0.5);
    assert_eq!(lookup.source, LookupSource::NotFound);
}

#[tokio::test]
async fn update_names_the_write_tool_and_detects_success() {
    let agent = ScriptedAgent::replying("Done. The record was updated successfully.");
    let store = store_for(agent.clone());
    let mut field = FieldSpec::new("country_of_residence", DataType::String);
    field.write_accessor = Some("update_individual_identity_and_tax_id".into());

    let outcome = store.set_value(&field, "Canada", &session()).await.unwrap();
    assert!(outcome.success);

    let asked = agent.asked.lock().unwrap();
    assert!(asked[0].contains("update the client's country_of_residence to: Canada"));
    assert!(asked[0].contains("update_individual_identity_and_tax_id"));
}

#[tokio::test]
async fn update_without_success_words_is_refused() {
    let store = store_for(ScriptedAgent::replying("I could not find that client."));
    let field = FieldSpec::new("country_of_residence", DataType::String);

    let outcome = store.set_value(&field, "Canada", &session()).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "I could not find that client.");
}

#[tokio::test]
async fn transport_failure_is_a_record_error() {
    let store = store_for(ScriptedAgent::failing("connection refused"));
    let field = FieldSpec::new("full_legal_name", DataType::String);

    match store.get_value(&field, &session()).await {
        Err(RecordError::Agent(message)) => assert!(message.contains("connection refused")),
        other => panic!("expected agent error, got {:?}", other),
    }
}

#[tokio::test]
async fn agent_that_cannot_start_is_unavailable() {
    let handle = AgentHandle::new(|| Err(anyhow!("model server not configured")));
    let store = AgentRecordStore::new(Arc::new(handle));
    let field = FieldSpec::new("full_legal_name", DataType::String);

    assert!(matches!(
        store.get_value(&field, &session()).await,
        Err(RecordError::Unavailable(_))
    ));
}
