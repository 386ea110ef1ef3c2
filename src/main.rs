use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use taxflow::config::{AppConfig, RecordBackend};
use taxflow::records::{AgentRecordStore, InMemoryRecordStore, RecordReader, RecordWriter};
use taxflow::services::llm::{AgentHandle, LlmAgentClient, QueryAgent};
use taxflow::session::{FileSessionStore, InMemorySessionStore, SessionKey, SessionStore};
use taxflow::{QuestionCatalog, WorkflowController};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // 2. Config + catalog
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref())?;

    let catalog = match &config.catalog.path {
        Some(path) => QuestionCatalog::load(path)?,
        None => QuestionCatalog::builtin()?,
    };
    let catalog = Arc::new(catalog);
    tracing::info!(
        "Catalog '{}' ready with {} questions",
        catalog.filing_name(),
        catalog.len()
    );

    // 3. Collaborators
    let (reader, writer): (Arc<dyn RecordReader>, Arc<dyn RecordWriter>) =
        match config.records.backend {
            RecordBackend::Memory => {
                let store = Arc::new(InMemoryRecordStore::new());
                let reader: Arc<dyn RecordReader> = store.clone();
                let writer: Arc<dyn RecordWriter> = store;
                (reader, writer)
            }
            RecordBackend::Agent => {
                let agent_config = config.agent.clone();
                let handle = Arc::new(AgentHandle::new(move || {
                    let client = LlmAgentClient::new(&agent_config)?;
                    Ok(Arc::new(client) as Arc<dyn QueryAgent>)
                }));
                let store = Arc::new(AgentRecordStore::new(handle));
                let reader: Arc<dyn RecordReader> = store.clone();
                let writer: Arc<dyn RecordWriter> = store;
                (reader, writer)
            }
        };

    let sessions: Arc<dyn SessionStore> = match &config.sessions.dir {
        Some(dir) => Arc::new(FileSessionStore::open(dir, config.sessions.ttl_secs).await?),
        None => Arc::new(InMemorySessionStore::with_ttl_secs(config.sessions.ttl_secs)),
    };

    let controller = WorkflowController::new(catalog, reader, writer, sessions);
    let key = SessionKey::parse(
        &config.console.user_id,
        config.console.client_id,
        &config.console.reference,
    )?;

    // 4. Console loop
    println!("Type anything to begin. Commands: /status, /restart, /quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" => break,
            "/restart" => {
                controller.restart(&key).await?;
                println!("Progress cleared. Send any message to start again.");
            }
            "/status" => {
                let status = controller.status(&key).await?;
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            message => {
                let reply = controller.process_message(&key, message).await;
                println!("{}\n", reply);
            }
        }
    }

    let snapshot = controller.telemetry_snapshot();
    tracing::info!(
        "Session summary: {} turns, {} completions, {} external failures",
        snapshot.turn_stats.total,
        snapshot.workflow_stats.completed,
        snapshot.failure_stats.read + snapshot.failure_stats.write + snapshot.failure_stats.session
    );

    Ok(())
}
