use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::{DeckConfig, SwipeController};
use crate::models::{DeckResponse, GesturePhase, SwipeDecision, SwipeDirection};
use crate::services::ledger::DecisionLedger;
use crate::services::sessions::DeckSession;
use crate::services::store::ProfileStore;
use crate::services::writer::MatchWriter;

/// Message shown when the candidate fetch fails
pub const DECK_UNAVAILABLE: &str = "Could not load players right now. Pull to refresh.";

/// Session cache sizing
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub max_sessions: u64,
    pub idle_ttl: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Hosts one deck session per user and routes decisions to the backend
///
/// Decisions are forwarded without blocking the deck: the ledger write and
/// the match write both run as background tasks.
pub struct DeckService {
    store: Arc<dyn ProfileStore>,
    ledger: Option<Arc<DecisionLedger>>,
    writer: MatchWriter,
    config: DeckConfig,
    sessions: moka::future::Cache<String, Arc<Mutex<DeckSession>>>,
}

impl DeckService {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        ledger: Option<Arc<DecisionLedger>>,
        writer: MatchWriter,
        config: DeckConfig,
        limits: SessionLimits,
    ) -> Self {
        let sessions = moka::future::CacheBuilder::new(limits.max_sessions)
            .time_to_idle(limits.idle_ttl)
            .build();

        Self {
            store,
            ledger,
            writer,
            config,
            sessions,
        }
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    pub fn ledger(&self) -> Option<&Arc<DecisionLedger>> {
        self.ledger.as_ref()
    }

    /// Fetch a fresh batch into the user's session
    ///
    /// An existing session keeps its notice channel; only the deck is
    /// replaced.
    pub async fn load(&self, user_id: &str, exclude: &[String]) -> DeckResponse {
        let entry = self
            .sessions
            .entry_by_ref(user_id)
            .or_insert_with(self.open(user_id, exclude))
            .await;
        let fresh = entry.is_fresh();
        let session = entry.into_value();

        if fresh {
            return session.lock().await.snapshot(Instant::now(), None);
        }

        let controller = self.fetch_controller(user_id, exclude).await;
        let mut session = session.lock().await;
        session.reload(controller);
        debug!("Reloaded deck {} for {}", session.deck_id(), user_id);
        session.snapshot(Instant::now(), None)
    }

    /// Current deck, loading one on first access
    pub async fn view(&self, user_id: &str) -> DeckResponse {
        let session = self.session(user_id).await;
        let mut session = session.lock().await;
        session.snapshot(Instant::now(), None)
    }

    /// Apply a pointer event to the top card
    ///
    /// An `End` without a translation releases at the last tracked position.
    pub async fn gesture(
        &self,
        user_id: &str,
        phase: GesturePhase,
        translation: Option<(f64, f64)>,
    ) -> DeckResponse {
        let session = self.session(user_id).await;
        let mut session = session.lock().await;
        let now = Instant::now();
        session.controller_mut().tick(now);

        let decision = {
            let controller = session.controller_mut();
            let moved = match (phase, translation) {
                (GesturePhase::Start, _) => {
                    controller.pointer_down(now);
                    None
                }
                (_, Some((x, y))) => controller.pointer_move(x, y, now),
                (_, None) => None,
            };
            match (phase, moved) {
                (_, Some(decision)) => Some(decision),
                (GesturePhase::End, None) => controller.pointer_up(now),
                _ => None,
            }
        };

        if let Some(decision) = &decision {
            self.dispatch(&session, decision);
        }

        session.snapshot(now, decision)
    }

    /// Like/pass button press
    pub async fn decide(&self, user_id: &str, direction: SwipeDirection) -> DeckResponse {
        let session = self.session(user_id).await;
        let mut session = session.lock().await;
        let now = Instant::now();
        session.controller_mut().tick(now);

        let decision = session.controller_mut().decide(direction, now);
        match &decision {
            Some(decision) => self.dispatch(&session, decision),
            None => debug!("Ignored {} for {}: nothing to decide on", direction.as_str(), user_id),
        }

        session.snapshot(now, decision)
    }

    /// Existing session, or one opened exactly once for concurrent callers
    async fn session(&self, user_id: &str) -> Arc<Mutex<DeckSession>> {
        self.sessions
            .entry_by_ref(user_id)
            .or_insert_with(self.open(user_id, &[]))
            .await
            .into_value()
    }

    async fn open(&self, user_id: &str, exclude: &[String]) -> Arc<Mutex<DeckSession>> {
        let session = DeckSession::new(user_id, self.fetch_controller(user_id, exclude).await);
        debug!("Opened deck {} for {}", session.deck_id(), user_id);
        Arc::new(Mutex::new(session))
    }

    async fn fetch_controller(&self, user_id: &str, exclude: &[String]) -> SwipeController {
        let mut excluded = match &self.ledger {
            Some(ledger) => match ledger.decided_ids(user_id).await {
                Ok(ids) => ids,
                Err(e) => {
                    warn!("Failed to fetch decided candidates for {}, proceeding without filtering: {}", user_id, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        excluded.extend(exclude.iter().cloned());

        match self.store.fetch_candidates(user_id, &excluded).await {
            Ok(candidates) => {
                info!("Loaded deck of {} candidates for {}", candidates.len(), user_id);
                SwipeController::new(self.config, candidates)
            }
            Err(e) => {
                warn!("Failed to fetch candidates for {}: {}", user_id, e);
                SwipeController::unavailable(self.config, DECK_UNAVAILABLE)
            }
        }
    }

    fn dispatch(&self, session: &DeckSession, decision: &SwipeDecision) {
        let user_id = session.user_id().to_string();
        info!(
            "User {} committed {} on {}",
            user_id,
            decision.direction.as_str(),
            decision.candidate_id
        );

        if let Some(ledger) = &self.ledger {
            let ledger = ledger.clone();
            let user_id = user_id.clone();
            let decision = decision.clone();
            tokio::spawn(async move {
                if let Err(e) = ledger
                    .record_decision(&user_id, &decision.candidate_id, decision.direction)
                    .await
                {
                    warn!("Failed to record decision for {}: {}", user_id, e);
                }
            });
        }

        if decision.direction == SwipeDirection::Like {
            self.writer
                .spawn(user_id, decision.candidate_id.clone(), session.notifier());
        }
    }
}
