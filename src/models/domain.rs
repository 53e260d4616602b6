use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Profile snapshot shown on a deck card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "gameTags", default)]
    pub game_tags: BTreeSet<String>,
    #[serde(rename = "avatarRef", default)]
    pub avatar_ref: Option<String>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            bio: None,
            game_tags: BTreeSet::new(),
            avatar_ref: None,
        }
    }

    pub fn with_games<I, S>(mut self, games: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.game_tags.extend(games.into_iter().map(Into::into));
        self
    }
}

/// Swipe direction: right is a like, left is a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Like,
    Pass,
}

impl SwipeDirection {
    /// Direction implied by the sign of a horizontal offset
    pub fn from_offset(offset_x: f64) -> Self {
        if offset_x >= 0.0 {
            SwipeDirection::Like
        } else {
            SwipeDirection::Pass
        }
    }

    /// +1 for right, -1 for left
    pub fn sign(self) -> f64 {
        match self {
            SwipeDirection::Like => 1.0,
            SwipeDirection::Pass => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SwipeDirection::Like => "like",
            SwipeDirection::Pass => "pass",
        }
    }
}

impl std::str::FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" | "right" => Ok(SwipeDirection::Like),
            "pass" | "left" => Ok(SwipeDirection::Pass),
            other => Err(format!("unknown swipe direction: {}", other)),
        }
    }
}

/// Outcome of a single committed swipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeDecision {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub direction: SwipeDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Match row as stored by the hosted backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user1_id: String,
    pub user2_id: String,
    pub status: MatchStatus,
    pub matched_at: chrono::DateTime<chrono::Utc>,
}

impl MatchRecord {
    pub fn pending(user_id: &str, candidate_id: &str) -> Self {
        Self {
            id: None,
            user1_id: user_id.to_string(),
            user2_id: candidate_id.to_string(),
            status: MatchStatus::Pending,
            matched_at: chrono::Utc::now(),
        }
    }
}

/// Catalog entry a player can add to their library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub platform: Option<Vec<String>>,
}

/// Account profile edited from the profile tab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Participant summary shown in the chat list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPeer {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One row of the chat list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    #[serde(rename = "matchId")]
    pub match_id: String,
    pub user: ChatPeer,
    #[serde(rename = "lastMessage")]
    pub last_message: String,
    #[serde(rename = "sentAt")]
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

/// Text shown for a match with no messages yet
pub const EMPTY_CHAT_PLACEHOLDER: &str = "Start a conversation!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Non-blocking message surfaced alongside the deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(rename = "candidateId", default)]
    pub candidate_id: Option<String>,
}
