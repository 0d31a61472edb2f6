/// Book state definitions for tracking per-book crawl progress
///
/// Every catalog entry walks `Pending → Fetched → Extracted → (TextSaved) →
/// (ImageSaved) → Recorded`, or drops to `Failed` from any non-terminal state.
use crate::HarvestError;
use std::fmt;

/// Represents the current state of a book in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookState {
    // ===== Active States =====
    /// Catalog link known, nothing fetched yet
    Pending,

    /// Detail page fetched
    Fetched,

    /// Title, author, genre and cover parsed into a record
    Extracted,

    /// Text asset written to disk
    TextSaved,

    /// Cover image written to disk
    ImageSaved,

    // ===== Terminal States =====
    /// Record appended to the run's output collection
    Recorded,

    /// A fetch, extract or write step failed; the book is skipped
    Failed,
}

impl BookState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Recorded | Self::Failed)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded)
    }

    /// Returns true if the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: BookState) -> bool {
        use BookState::*;

        if next == Failed {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Pending, Fetched)
                | (Fetched, Extracted)
                | (Extracted, TextSaved)
                | (Extracted, ImageSaved)
                | (Extracted, Recorded)
                | (TextSaved, ImageSaved)
                | (TextSaved, Recorded)
                | (ImageSaved, Recorded)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetched => "fetched",
            Self::Extracted => "extracted",
            Self::TextSaved => "text_saved",
            Self::ImageSaved => "image_saved",
            Self::Recorded => "recorded",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible book states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetched,
            Self::Extracted,
            Self::TextSaved,
            Self::ImageSaved,
            Self::Recorded,
            Self::Failed,
        ]
    }
}

impl fmt::Display for BookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of a single book through the state machine
#[derive(Debug, Clone)]
pub struct BookProgress {
    url: String,
    state: BookState,
}

impl BookProgress {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: BookState::Pending,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> BookState {
        self.state
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn advance(&mut self, next: BookState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Marks the book as failed; a no-op once a terminal state is reached
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = BookState::Failed;
        }
    }
}
