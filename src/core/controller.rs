use std::time::Instant;

use crate::core::deck::Deck;
use crate::core::gesture::{
    crosses_threshold, drag_transform, ease_out, exit_target, interpolate, progress,
    spring_progress, DeckConfig, GestureState,
};
use crate::models::{Candidate, SwipeDecision, SwipeDirection};

/// Message shown once every candidate has been decided on
pub const NO_MORE_CANDIDATES: &str = "No more players to show. Check back later!";

/// Controller state
///
/// `Committing` doubles as the re-entrancy guard: while a card is leaving
/// the screen every gesture and button press is ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Dragging,
    Committing {
        decision: SwipeDecision,
        from: GestureState,
        started_at: Instant,
    },
    Resetting {
        from: GestureState,
        started_at: Instant,
    },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Dragging => "dragging",
            Phase::Committing { .. } => "committing",
            Phase::Resetting { .. } => "resetting",
        }
    }

    pub fn is_committing(&self) -> bool {
        matches!(self, Phase::Committing { .. })
    }
}

/// Result of advancing the animation clock
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// Exit animation finished and the cursor moved past the decided card
    Advanced(SwipeDecision),
    /// Spring-back finished
    Settled,
}

/// What should be on screen right now
#[derive(Debug, Clone, PartialEq)]
pub struct DeckView<'a> {
    pub top: Option<&'a Candidate>,
    pub preview: Option<&'a Candidate>,
    pub remaining: usize,
    pub empty_message: Option<&'a str>,
}

/// Swipe deck state machine
///
/// Every time-dependent call takes the current `Instant`; the controller
/// never reads the clock itself.
#[derive(Debug, Clone)]
pub struct SwipeController {
    config: DeckConfig,
    deck: Deck,
    phase: Phase,
    transform: GestureState,
    unavailable: Option<String>,
}

impl SwipeController {
    pub fn new(config: DeckConfig, candidates: Vec<Candidate>) -> Self {
        Self {
            transform: GestureState::neutral(&config),
            config,
            deck: Deck::new(candidates),
            phase: Phase::Idle,
            unavailable: None,
        }
    }

    /// Empty controller for a deck whose candidates could not be fetched
    pub fn unavailable(config: DeckConfig, message: impl Into<String>) -> Self {
        let mut controller = Self::new(config, Vec::new());
        controller.unavailable = Some(message.into());
        controller
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn view(&self) -> DeckView<'_> {
        let empty_message = if self.deck.is_exhausted() {
            Some(self.unavailable.as_deref().unwrap_or(NO_MORE_CANDIDATES))
        } else {
            None
        };

        DeckView {
            top: self.deck.top(),
            preview: self.deck.preview(),
            remaining: self.deck.remaining(),
            empty_message,
        }
    }

    /// Grab the top card. Returns false when there is nothing to grab or a
    /// commit is in flight.
    pub fn pointer_down(&mut self, now: Instant) -> bool {
        if self.deck.is_exhausted() {
            return false;
        }

        match self.phase {
            Phase::Idle | Phase::Resetting { .. } => {
                let mut current = self.transform_at(now);
                current.scale = self.config.lift_scale;
                self.transform = current;
                self.phase = Phase::Dragging;
                true
            }
            Phase::Dragging => true,
            Phase::Committing { .. } => false,
        }
    }

    /// Follow the pointer. With auto-commit enabled, crossing the threshold
    /// commits without waiting for release.
    pub fn pointer_move(
        &mut self,
        translation_x: f64,
        translation_y: f64,
        now: Instant,
    ) -> Option<SwipeDecision> {
        if self.phase != Phase::Dragging {
            return None;
        }

        self.transform = drag_transform(translation_x, translation_y, &self.config);

        if self.config.auto_commit && crosses_threshold(self.transform.offset_x, &self.config) {
            let direction = SwipeDirection::from_offset(self.transform.offset_x);
            return self.commit(direction, now);
        }

        None
    }

    /// Release the card: commit past the threshold, otherwise spring back
    pub fn pointer_up(&mut self, now: Instant) -> Option<SwipeDecision> {
        if self.phase != Phase::Dragging {
            return None;
        }

        if crosses_threshold(self.transform.offset_x, &self.config) {
            let direction = SwipeDirection::from_offset(self.transform.offset_x);
            return self.commit(direction, now);
        }

        self.phase = Phase::Resetting {
            from: self.transform,
            started_at: now,
        };
        None
    }

    /// Like/pass button press
    pub fn decide(&mut self, direction: SwipeDirection, now: Instant) -> Option<SwipeDecision> {
        self.commit(direction, now)
    }

    /// Advance animation state to `now`
    pub fn tick(&mut self, now: Instant) -> Option<TickEvent> {
        match &self.phase {
            Phase::Committing {
                decision,
                started_at,
                ..
            } if now.saturating_duration_since(*started_at) >= self.config.exit_duration => {
                let decision = decision.clone();
                self.deck.advance();
                self.transform = GestureState::neutral(&self.config);
                self.phase = Phase::Idle;
                Some(TickEvent::Advanced(decision))
            }
            Phase::Resetting { started_at, .. }
                if now.saturating_duration_since(*started_at) >= self.config.spring_settle =>
            {
                self.transform = GestureState::neutral(&self.config);
                self.phase = Phase::Idle;
                Some(TickEvent::Settled)
            }
            _ => None,
        }
    }

    /// Transform to render at `now`
    pub fn transform_at(&self, now: Instant) -> GestureState {
        match &self.phase {
            Phase::Idle | Phase::Dragging => self.transform,
            Phase::Committing {
                decision,
                from,
                started_at,
            } => {
                let t = progress(now.saturating_duration_since(*started_at), self.config.exit_duration);
                let target = exit_target(from, decision.direction, &self.config);
                interpolate(from, &target, ease_out(t))
            }
            Phase::Resetting { from, started_at } => {
                let t = progress(now.saturating_duration_since(*started_at), self.config.spring_settle);
                interpolate(from, &GestureState::neutral(&self.config), spring_progress(t))
            }
        }
    }

    fn commit(&mut self, direction: SwipeDirection, now: Instant) -> Option<SwipeDecision> {
        if self.phase.is_committing() {
            return None;
        }

        let candidate = self.deck.top()?;
        let decision = SwipeDecision {
            candidate_id: candidate.id.clone(),
            direction,
        };

        let from = self.transform_at(now);
        self.phase = Phase::Committing {
            decision: decision.clone(),
            from,
            started_at: now,
        };

        Some(decision)
    }
}
