use anyhow::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use super::QueryAgent;

type AgentFactory = Box<dyn Fn() -> Result<Arc<dyn QueryAgent>> + Send + Sync>;

/// Lazily built, process-wide agent.
///
/// The factory runs at most once even when many sessions hit the agent at
/// the same time; a failed build is not cached and is retried on next use.
pub struct AgentHandle {
    cell: OnceCell<Arc<dyn QueryAgent>>,
    factory: AgentFactory,
}

impl AgentHandle {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn QueryAgent>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Wraps an agent that already exists.
    pub fn ready(agent: Arc<dyn QueryAgent>) -> Self {
        Self {
            cell: OnceCell::new_with(Some(agent)),
            factory: Box::new(|| Err(anyhow::anyhow!("agent handle was created ready"))),
        }
    }

    pub async fn get(&self) -> Result<Arc<dyn QueryAgent>> {
        let agent = self
            .cell
            .get_or_try_init(|| async {
                info!("Initializing record agent");
                (self.factory)()
            })
            .await?;
        Ok(agent.clone())
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKey;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo;

    #[async_trait]
    impl QueryAgent for Echo {
        async fn ask(&self, question: &str, _session: &SessionKey) -> Result<String> {
            Ok(question.to_string())
        }
    }

    #[tokio::test]
    async fn concurrent_first_use_builds_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let handle = Arc::new(AgentHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Echo) as Arc<dyn QueryAgent>)
        }));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move { handle.get().await.is_ok() }));
        }
        for task in tasks {
            assert!(task.await.unwrap());
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(handle.is_initialized());
    }

    #[tokio::test]
    async fn failed_build_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let handle = AgentHandle::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(anyhow::anyhow!("agent backend not reachable"))
            } else {
                Ok(Arc::new(Echo) as Arc<dyn QueryAgent>)
            }
        });

        assert!(handle.get().await.is_err());
        assert!(handle.get().await.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
