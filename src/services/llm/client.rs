use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::QueryAgent;
use crate::config::AgentConfig;
use crate::session::SessionKey;

const SYSTEM_PROMPT: &str = "You are a tax preparation assistant with read and update access to the client record database. Answer precisely and briefly. When asked for a value, return only the value. When asked to update a value, use the named update tool and state whether the update succeeded.";

/// HTTP client for a llama-server style `/completion` endpoint.
#[derive(Clone)]
pub struct LlmAgentClient {
    client: Client,
    base_url: String,
    n_predict: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionRequest {
    prompt: String,
    stream: bool,
    n_predict: usize,
    temperature: f32,
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LlmAgentClient {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("building agent HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            n_predict: config.n_predict,
            temperature: config.temperature,
        })
    }

    fn build_prompt(question: &str, session: &SessionKey) -> String {
        format!(
            "System: {}\n\n{}\nUser: {}\nAssistant:",
            SYSTEM_PROMPT,
            session.context_block(),
            question.trim()
        )
    }
}

#[async_trait]
impl QueryAgent for LlmAgentClient {
    async fn ask(&self, question: &str, session: &SessionKey) -> Result<String> {
        let request_body = CompletionRequest {
            prompt: Self::build_prompt(question, session),
            stream: false,
            n_predict: self.n_predict,
            temperature: self.temperature,
            stop: vec!["User:".to_string(), "System:".to_string()],
        };

        debug!("Agent request for session {}", session);
        let response = self
            .client
            .post(format!("{}/completion", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Agent server error: {}", response.status()));
        }

        let resp_json: CompletionResponse = response.json().await?;
        Ok(resp_json.content.trim().to_string())
    }
}
