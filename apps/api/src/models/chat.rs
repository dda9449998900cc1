use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Explicit target company; wins over detection from the message.
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_company: Option<String>,
    pub agent_actions: Vec<String>,
}

/// One persisted chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLogEntry {
    pub timestamp: DateTime<Local>,
    pub session_id: String,
    pub company: Option<String>,
    pub user_message: String,
    pub bot_response: String,
    #[serde(default)]
    pub agent_actions: Vec<String>,
}
