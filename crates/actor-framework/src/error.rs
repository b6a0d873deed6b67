//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself, as opposed to the business errors
//! an entity reports from its hooks (those travel boxed inside [`FrameworkError::EntityError`]).

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Id mismatch: addressed {expected}, payload describes {actual}")]
    IdMismatch { expected: String, actual: String },
    #[error("Sequence exhausted: no ids left to hand out")]
    SequenceExhausted,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Wraps an entity hook error.
    pub fn entity<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        FrameworkError::EntityError(Box::new(e))
    }

    /// Returns the entity error if this is one of type `E`.
    pub fn entity_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            FrameworkError::EntityError(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// True when the actor could not be reached or did not answer.
    ///
    /// In that case the caller cannot know whether the request was applied.
    pub fn is_transport(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorDropped)
    }
}
