// Core deck exports
pub mod controller;
pub mod deck;
pub mod gesture;

pub use controller::{DeckView, Phase, SwipeController, TickEvent, NO_MORE_CANDIDATES};
pub use deck::Deck;
pub use gesture::{DeckConfig, GestureState};
