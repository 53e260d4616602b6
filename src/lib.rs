//! GameMatch Deck - swipe deck service for the GameMatch gamer pairing app
//!
//! The core is a clock-driven controller that turns pointer events into
//! card transforms and like/pass decisions. The service layer hosts one
//! controller per signed-in user and forwards decisions to the hosted
//! backend without ever blocking the deck.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{DeckConfig, GestureState, Phase, SwipeController, TickEvent};
pub use models::{Candidate, DeckResponse, MatchRecord, Notice, SwipeDecision, SwipeDirection};
pub use services::{DeckService, MatchWriter, ProfileStore, StoreError};
