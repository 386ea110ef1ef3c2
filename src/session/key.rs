use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientReference {
    Individual,
    Company,
}

impl FromStr for ClientReference {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(ClientReference::Individual),
            "company" => Ok(ClientReference::Company),
            _ => Err(SessionError::InvalidReference(s.to_string())),
        }
    }
}

impl fmt::Display for ClientReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientReference::Individual => f.write_str("individual"),
            ClientReference::Company => f.write_str("company"),
        }
    }
}

/// Who is talking, and about which client record.
///
/// Workflow state is keyed by `user_id` alone; `client_id` and `reference`
/// travel with every record-store call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: String,
    pub client_id: i64,
    pub reference: ClientReference,
}

impl SessionKey {
    pub fn new(
        user_id: impl Into<String>,
        client_id: i64,
        reference: ClientReference,
    ) -> Result<Self, SessionError> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(SessionError::InvalidKey("user id is empty".to_string()));
        }
        if client_id == 0 {
            return Err(SessionError::InvalidKey("client id must be non-zero".to_string()));
        }
        Ok(Self {
            user_id,
            client_id,
            reference,
        })
    }

    /// Parses the reference string as well.
    pub fn parse(user_id: &str, client_id: i64, reference: &str) -> Result<Self, SessionError> {
        Self::new(user_id, client_id, reference.parse()?)
    }

    pub fn storage_key(&self) -> String {
        format!("workflow:{}", self.user_id)
    }

    /// Block appended to agent prompts so tools act on the right client.
    pub fn context_block(&self) -> String {
        format!(
            "Session Information:\n- User ID: {}\n- Client ID: {}\n- Reference Type: {}",
            self.user_id, self.client_id, self.reference
        )
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.user_id, self.reference, self.client_id)
    }
}
