use serde::{Deserialize, Serialize};
use crate::core::GestureState;
use crate::models::domain::{Candidate, ChatSummary, Game, Notice, SwipeDecision};

/// Snapshot of a deck session returned by every deck endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckResponse {
    /// Changes whenever the deck is reloaded
    #[serde(rename = "deckId")]
    pub deck_id: uuid::Uuid,
    pub phase: String,
    pub top: Option<Candidate>,
    pub preview: Option<Candidate>,
    pub remaining: usize,
    pub transform: GestureState,
    #[serde(rename = "emptyMessage")]
    pub empty_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<SwipeDecision>,
    #[serde(default)]
    pub notices: Vec<Notice>,
}

/// Chat list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListResponse {
    pub chats: Vec<ChatSummary>,
    pub count: usize,
}

/// Game catalog or library listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameListResponse {
    pub games: Vec<Game>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
