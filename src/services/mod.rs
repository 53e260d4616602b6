// Service exports
pub mod auth;
pub mod deck;
pub mod ledger;
pub mod sessions;
pub mod store;
pub mod supabase;
pub mod writer;

pub use auth::{AuthError, SessionContext, TokenVerifier};
pub use deck::{DeckService, SessionLimits, DECK_UNAVAILABLE};
pub use ledger::{DecisionLedger, LedgerError};
pub use sessions::DeckSession;
pub use store::{ProfileStore, StoreError};
pub use supabase::{SupabaseClient, SupabaseTables};
pub use writer::{MatchWriteOutcome, MatchWriter, RetryPolicy};
