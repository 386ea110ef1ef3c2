use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::key::{ClientReference, SessionKey};
use crate::error::SessionError;
use crate::workflow::state::WorkflowState;

/// Twelve hours, refreshed on every save.
pub const DEFAULT_TTL_SECS: u64 = 12 * 60 * 60;

/// Persists one workflow state per user between turns.
///
/// A missing or expired entry loads as a fresh default state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, key: &SessionKey) -> Result<WorkflowState, SessionError>;

    async fn save(&self, key: &SessionKey, state: &WorkflowState) -> Result<(), SessionError>;

    async fn clear(&self, key: &SessionKey) -> Result<(), SessionError>;
}

/// Longer TTLs are clamped to this.
const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

fn ttl_duration(ttl_secs: u64) -> Duration {
    Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64)
}

fn is_expired(last_updated: DateTime<Utc>, ttl: Duration) -> bool {
    last_updated
        .checked_add_signed(ttl)
        .is_some_and(|expires_at| Utc::now() >= expires_at)
}

#[derive(Debug)]
struct Entry {
    state: WorkflowState,
    last_updated: DateTime<Utc>,
}

/// Process-local store with a sliding expiry.
#[derive(Debug)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_ttl_secs(DEFAULT_TTL_SECS)
    }

    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: ttl_duration(ttl_secs),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: &SessionKey) -> Result<WorkflowState, SessionError> {
        let mut entries = self.entries.lock().await;
        let storage_key = key.storage_key();

        let expired = entries
            .get(&storage_key)
            .map(|entry| is_expired(entry.last_updated, self.ttl));

        match expired {
            Some(true) => {
                debug!("Session {} expired; starting fresh", key.user_id);
                entries.remove(&storage_key);
                Ok(WorkflowState::default())
            }
            Some(false) => Ok(entries
                .get(&storage_key)
                .map(|entry| entry.state.clone())
                .unwrap_or_default()),
            None => Ok(WorkflowState::default()),
        }
    }

    async fn save(&self, key: &SessionKey, state: &WorkflowState) -> Result<(), SessionError> {
        self.entries.lock().await.insert(
            key.storage_key(),
            Entry {
                state: state.clone(),
                last_updated: Utc::now(),
            },
        );
        Ok(())
    }

    async fn clear(&self, key: &SessionKey) -> Result<(), SessionError> {
        self.entries.lock().await.remove(&key.storage_key());
        Ok(())
    }
}

/// On-disk layout of one session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    pub client_id: i64,
    pub reference: ClientReference,
    pub state: WorkflowState,
    pub last_updated: DateTime<Utc>,
}

/// One pretty-printed JSON file per user under `dir`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
    ttl: Duration,
}

impl FileSessionStore {
    pub async fn open(dir: impl Into<PathBuf>, ttl_secs: u64) -> Result<Self, SessionError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!("Session files under {}", dir.display());
        Ok(Self {
            dir,
            ttl: ttl_duration(ttl_secs),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &SessionKey) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(&key.user_id)))
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9_-]`, so distinct user ids
/// never share a file.
fn file_stem(user_id: &str) -> String {
    let mut stem = String::with_capacity(user_id.len());
    for b in user_id.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            stem.push(char::from(b));
        } else {
            let _ = write!(stem, "%{:02X}", b);
        }
    }
    stem
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, key: &SessionKey) -> Result<WorkflowState, SessionError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(WorkflowState::default());
            }
            Err(e) => return Err(e.into()),
        };

        let record: SessionRecord = serde_json::from_str(&content)?;
        if record.user_id != key.user_id {
            return Err(SessionError::ForeignRecord {
                path,
                owner: record.user_id,
            });
        }
        if is_expired(record.last_updated, self.ttl) {
            debug!("Session file {} expired; starting fresh", path.display());
            return Ok(WorkflowState::default());
        }
        Ok(record.state)
    }

    async fn save(&self, key: &SessionKey, state: &WorkflowState) -> Result<(), SessionError> {
        let record = SessionRecord {
            user_id: key.user_id.clone(),
            client_id: key.client_id,
            reference: key.reference,
            state: state.clone(),
            last_updated: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&record)?;
        fs::write(self.path_for(key), content).await?;
        Ok(())
    }

    async fn clear(&self, key: &SessionKey) -> Result<(), SessionError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
