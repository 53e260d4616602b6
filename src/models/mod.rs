// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, ChatPeer, ChatSummary, Game, MatchRecord, MatchStatus, Notice, NoticeLevel,
    SwipeDecision, SwipeDirection, UserProfile, EMPTY_CHAT_PLACEHOLDER,
};
pub use requests::{AddGameRequest, DecideRequest, GesturePhase, GestureRequest, LoadDeckRequest, ProfileUpdate};
pub use responses::{ChatListResponse, DeckResponse, ErrorResponse, GameListResponse, HealthResponse};
