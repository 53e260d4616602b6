use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to (re)load the current user's deck
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoadDeckRequest {
    #[validate(length(max = 500))]
    #[serde(default)]
    #[serde(alias = "exclude_user_ids", rename = "excludeUserIds")]
    pub exclude_user_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

/// Pointer event forwarded from the client's pan handler
///
/// Translations are cumulative since pointer-down, in points. An `end`
/// event may omit them to release at the last tracked position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureRequest {
    pub phase: GesturePhase,
    #[serde(default, alias = "translation_x", rename = "translationX")]
    pub translation_x: Option<f64>,
    #[serde(default, alias = "translation_y", rename = "translationY")]
    pub translation_y: Option<f64>,
}

impl GestureRequest {
    /// Pointer position, if the event carries one. A missing vertical
    /// component is treated as no vertical travel.
    pub fn translation(&self) -> Option<(f64, f64)> {
        self.translation_x
            .map(|x| (x, self.translation_y.unwrap_or(0.0)))
    }
}

/// Like/pass button press
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecideRequest {
    #[validate(length(min = 1))]
    pub direction: String,
}

/// Add a catalog game to the caller's library
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddGameRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "game_id", rename = "gameId")]
    pub game_id: String,
}

/// Partial profile update from the profile editor
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 3, max = 30))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 50))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.display_name.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
    }
}
