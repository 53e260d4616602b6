use crate::models::Candidate;

/// Ordered queue of candidates with a forward-only cursor
///
/// The deck exhausts rather than wraps: once every candidate has been
/// decided on, `top` returns `None` until a new batch is loaded.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    candidates: Vec<Candidate>,
    cursor: usize,
}

impl Deck {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            cursor: 0,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Candidate currently on top, if any
    pub fn top(&self) -> Option<&Candidate> {
        self.candidates.get(self.cursor)
    }

    /// Candidate rendered beneath the top card
    pub fn preview(&self) -> Option<&Candidate> {
        self.candidates.get(self.cursor + 1)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates not yet decided on, including the top card
    pub fn remaining(&self) -> usize {
        self.candidates.len().saturating_sub(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.top().is_none()
    }

    /// Move past the top card. Returns false when already exhausted.
    pub fn advance(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.cursor += 1;
        true
    }
}
