use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Candidate, ChatSummary, Game, MatchRecord, ProfileUpdate, UserProfile};

/// Errors that can occur when talking to the profile store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::RequestError(_) | StoreError::ApiError(_) => true,
            StoreError::Rejected(_)
            | StoreError::NotFound(_)
            | StoreError::Unauthorized
            | StoreError::InvalidResponse(_) => false,
        }
    }
}

/// Hosted backend holding profiles, games, matches and messages
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Users sharing at least one game with `user_id`, excluding the user
    /// and every id in `exclude`
    async fn fetch_candidates(&self, user_id: &str, exclude: &[String]) -> Result<Vec<Candidate>, StoreError>;

    /// Create a pending match between the user and a liked candidate
    async fn create_match(&self, user_id: &str, candidate_id: &str) -> Result<MatchRecord, StoreError>;

    /// Matches involving the user, newest first, with their latest message
    async fn list_chats(&self, user_id: &str) -> Result<Vec<ChatSummary>, StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError>;

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError>;

    /// Full game catalog, ordered by name
    async fn list_games(&self) -> Result<Vec<Game>, StoreError>;

    /// Games in the user's library; these drive candidate matching
    async fn user_games(&self, user_id: &str) -> Result<Vec<Game>, StoreError>;

    async fn add_game(&self, user_id: &str, game_id: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::ApiError("503".into()).is_transient());
        assert!(!StoreError::Unauthorized.is_transient());
        assert!(!StoreError::Rejected("duplicate key".into()).is_transient());
        assert!(!StoreError::NotFound("x".into()).is_transient());
    }
}
