use std::time::Instant;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::core::{SwipeController, TickEvent};
use crate::models::{DeckResponse, Notice, SwipeDecision};

/// One user's live deck plus the notices waiting to be shown
pub struct DeckSession {
    deck_id: Uuid,
    user_id: String,
    controller: SwipeController,
    notices_tx: mpsc::UnboundedSender<Notice>,
    notices_rx: mpsc::UnboundedReceiver<Notice>,
}

impl DeckSession {
    pub fn new(user_id: impl Into<String>, controller: SwipeController) -> Self {
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();
        Self {
            deck_id: Uuid::new_v4(),
            user_id: user_id.into(),
            controller,
            notices_tx,
            notices_rx,
        }
    }

    pub fn deck_id(&self) -> Uuid {
        self.deck_id
    }

    /// Swap in a freshly fetched deck under a new id. Pending notices stay
    /// queued so failures from the previous deck still reach the user.
    pub fn reload(&mut self, controller: SwipeController) {
        self.deck_id = Uuid::new_v4();
        self.controller = controller;
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn controller_mut(&mut self) -> &mut SwipeController {
        &mut self.controller
    }

    /// Sender background tasks use to surface notices on this deck
    pub fn notifier(&self) -> mpsc::UnboundedSender<Notice> {
        self.notices_tx.clone()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.notices_rx.try_recv() {
            notices.push(notice);
        }
        notices
    }

    /// Bring animations up to `now` and render the deck
    pub fn snapshot(&mut self, now: Instant, decision: Option<SwipeDecision>) -> DeckResponse {
        if let Some(TickEvent::Advanced(done)) = self.controller.tick(now) {
            tracing::debug!(
                "Deck for {} advanced past {} ({})",
                self.user_id,
                done.candidate_id,
                done.direction.as_str()
            );
        }

        let notices = self.drain_notices();
        let view = self.controller.view();

        DeckResponse {
            deck_id: self.deck_id,
            phase: self.controller.phase().name().to_string(),
            top: view.top.cloned(),
            preview: view.preview.cloned(),
            remaining: view.remaining,
            transform: self.controller.transform_at(now),
            empty_message: view.empty_message.map(str::to_string),
            decision,
            notices,
        }
    }
}
