pub mod client;
pub mod handle;

pub use client::LlmAgentClient;
pub use handle::AgentHandle;

use anyhow::Result;
use async_trait::async_trait;

use crate::session::SessionKey;

/// A natural-language agent that can read and update client records.
#[async_trait]
pub trait QueryAgent: Send + Sync {
    async fn ask(&self, question: &str, session: &SessionKey) -> Result<String>;
}
