use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::models::{
    Candidate, ChatPeer, ChatSummary, Game, MatchRecord, ProfileUpdate, UserProfile, EMPTY_CHAT_PLACEHOLDER,
};
use crate::services::store::{ProfileStore, StoreError};

/// Supabase REST (PostgREST) client
///
/// Handles all communication with the hosted backend including:
/// - Candidate lookup by shared games
/// - Match creation on a like
/// - Chat list and profile editing
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: SupabaseTables,
}

/// Table names in the hosted database
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub users: String,
    pub games: String,
    pub user_games: String,
    pub matches: String,
    pub messages: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            games: "games".to_string(),
            user_games: "user_games".to_string(),
            matches: "matches".to_string(),
            messages: "messages".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GameIdRow {
    game_id: Value,
}

#[derive(Debug, Deserialize)]
struct GameNameRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SharedGameRow {
    user_id: String,
    #[serde(default)]
    game: Option<GameNameRow>,
    #[serde(default)]
    user: Option<UserRow>,
}

#[derive(Debug, Deserialize)]
struct LibraryRow {
    #[serde(default)]
    game: Option<Game>,
}

#[derive(Debug, Serialize)]
struct NewUserGame<'a> {
    user_id: &'a str,
    game_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct MatchRow {
    id: String,
    matched_at: chrono::DateTime<chrono::Utc>,
    user1_id: String,
    user2_id: String,
    #[serde(default)]
    user1: Option<ChatPeer>,
    #[serde(default)]
    user2: Option<ChatPeer>,
}

#[derive(Debug, Deserialize)]
struct MessageRow {
    content: String,
    sent_at: chrono::DateTime<chrono::Utc>,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        api_key: String,
        tables: SupabaseTables,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn rest_url(&self, table: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table);

        if !query.is_empty() {
            let params = query
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&params);
        }

        url
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check_status(response: Response, context: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("{} failed: {} - {}", context, status, body);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized,
            StatusCode::NOT_FOUND => StoreError::NotFound(context.to_string()),
            s if s.is_client_error() => StoreError::Rejected(format!("{}: {} - {}", context, s, body)),
            s => StoreError::ApiError(format!("{}: {}", context, s)),
        })
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.rest_url(table, query);
        tracing::debug!("Fetching rows from: {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check_status(response, context).await?;

        let json: Value = response.json().await?;
        serde_json::from_value(json)
            .map_err(|e| StoreError::InvalidResponse(format!("{}: {}", context, e)))
    }

    async fn first_row<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, StoreError> {
        let json: Value = response.json().await?;
        let mut rows: Vec<T> = serde_json::from_value(json)
            .map_err(|e| StoreError::InvalidResponse(format!("{}: {}", context, e)))?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(context.to_string()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn last_message(&self, match_id: &str) -> Result<Option<MessageRow>, StoreError> {
        let mut rows: Vec<MessageRow> = self
            .get_rows(
                &self.tables.messages,
                &[
                    ("select", "content,sent_at".to_string()),
                    ("match_id", format!("eq.{}", match_id)),
                    ("order", "sent_at.desc".to_string()),
                    ("limit", "1".to_string()),
                ],
                "Fetch last message",
            )
            .await?;

        Ok(rows.pop())
    }
}

/// Render a PostgREST filter literal for a key column value
fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Collapse one row per shared game into one candidate per user,
/// preserving first-appearance order
fn group_candidates(rows: Vec<SharedGameRow>, user_id: &str, exclude: &[String]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        if row.user_id == user_id || exclude.contains(&row.user_id) {
            continue;
        }

        let position = match index.get(&row.user_id) {
            Some(&position) => position,
            None => {
                let candidate = match row.user {
                    Some(user) => Candidate {
                        display_name: user
                            .display_name
                            .or(user.username)
                            .unwrap_or_else(|| "Player".to_string()),
                        id: user.id,
                        bio: user.bio,
                        game_tags: Default::default(),
                        avatar_ref: user.avatar_url,
                    },
                    None => Candidate::new(row.user_id.clone(), "Player"),
                };
                candidates.push(candidate);
                index.insert(row.user_id.clone(), candidates.len() - 1);
                candidates.len() - 1
            }
        };

        if let Some(game) = row.game {
            candidates[position].game_tags.insert(game.name);
        }
    }

    candidates
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn fetch_candidates(&self, user_id: &str, exclude: &[String]) -> Result<Vec<Candidate>, StoreError> {
        let own_games: Vec<GameIdRow> = self
            .get_rows(
                &self.tables.user_games,
                &[
                    ("select", "game_id".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                ],
                "Fetch own games",
            )
            .await?;

        if own_games.is_empty() {
            tracing::debug!("User {} has no games, deck will be empty", user_id);
            return Ok(Vec::new());
        }

        let game_ids = own_games
            .iter()
            .map(|row| filter_value(&row.game_id))
            .collect::<Vec<_>>()
            .join(",");

        let select = format!(
            "user_id,game:{}(name),user:{}(id,username,display_name,bio,avatar_url)",
            self.tables.games, self.tables.users
        );

        let rows: Vec<SharedGameRow> = self
            .get_rows(
                &self.tables.user_games,
                &[
                    ("select", select),
                    ("game_id", format!("in.({})", game_ids)),
                    ("user_id", format!("neq.{}", user_id)),
                ],
                "Fetch shared-game players",
            )
            .await?;

        let candidates = group_candidates(rows, user_id, exclude);
        tracing::debug!("Fetched {} candidates for {}", candidates.len(), user_id);

        Ok(candidates)
    }

    async fn create_match(&self, user_id: &str, candidate_id: &str) -> Result<MatchRecord, StoreError> {
        let url = self.rest_url(&self.tables.matches, &[]);
        let record = MatchRecord::pending(user_id, candidate_id);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        let response = Self::check_status(response, "Create match").await?;

        let created: MatchRecord = Self::first_row(response, "Create match").await?;
        tracing::debug!("Created match: {} -> {}", user_id, candidate_id);

        Ok(created)
    }

    async fn list_chats(&self, user_id: &str) -> Result<Vec<ChatSummary>, StoreError> {
        let users = &self.tables.users;
        let matches = &self.tables.matches;
        let select = format!(
            "id,matched_at,user1_id,user2_id,\
             user1:{users}!{matches}_user1_id_fkey(id,username,display_name),\
             user2:{users}!{matches}_user2_id_fkey(id,username,display_name)"
        );

        let rows: Vec<MatchRow> = self
            .get_rows(
                matches,
                &[
                    ("select", select),
                    ("or", format!("(user1_id.eq.{0},user2_id.eq.{0})", user_id)),
                    ("order", "matched_at.desc".to_string()),
                ],
                "Fetch matches",
            )
            .await?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in rows {
            let (peer_id, peer) = if row.user1_id == user_id {
                (row.user2_id, row.user2)
            } else {
                (row.user1_id, row.user1)
            };
            let user = peer.unwrap_or(ChatPeer {
                id: peer_id,
                username: None,
                display_name: None,
            });

            let summary = match self.last_message(&row.id).await? {
                Some(message) => ChatSummary {
                    match_id: row.id,
                    user,
                    last_message: message.content,
                    sent_at: message.sent_at,
                },
                None => ChatSummary {
                    match_id: row.id,
                    user,
                    last_message: EMPTY_CHAT_PLACEHOLDER.to_string(),
                    sent_at: row.matched_at,
                },
            };
            chats.push(summary);
        }

        Ok(chats)
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        let mut rows: Vec<UserProfile> = self
            .get_rows(
                &self.tables.users,
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{}", user_id)),
                ],
                "Fetch profile",
            )
            .await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("Profile not found for user {}", user_id)));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        let url = self.rest_url(&self.tables.users, &[("id", format!("eq.{}", user_id))]);

        let response = self
            .authorized(self.client.patch(&url))
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await?;
        let response = Self::check_status(response, "Update profile").await?;

        Self::first_row(response, "Update profile").await
    }

    async fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        self.get_rows(
            &self.tables.games,
            &[
                ("select", "*".to_string()),
                ("order", "name.asc".to_string()),
            ],
            "Fetch game catalog",
        )
        .await
    }

    async fn user_games(&self, user_id: &str) -> Result<Vec<Game>, StoreError> {
        let rows: Vec<LibraryRow> = self
            .get_rows(
                &self.tables.user_games,
                &[
                    ("select", format!("game_id,game:{}(*)", self.tables.games)),
                    ("user_id", format!("eq.{}", user_id)),
                ],
                "Fetch game library",
            )
            .await?;

        Ok(rows.into_iter().filter_map(|row| row.game).collect())
    }

    async fn add_game(&self, user_id: &str, game_id: &str) -> Result<(), StoreError> {
        let url = self.rest_url(&self.tables.user_games, &[]);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(&NewUserGame { user_id, game_id })
            .send()
            .await?;
        Self::check_status(response, "Add game").await?;

        tracing::info!("Added game {} to library of {}", game_id, user_id);
        Ok(())
    }
}
