use greenroom_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the client engine.
#[derive(Error, Debug)]
pub enum ClientError {
    /// An operation required a signed-in user.
    #[error("No user is signed in")]
    NotSignedIn,

    /// A conversation needs two distinct participants.
    #[error("Cannot open a conversation with yourself")]
    SelfConversation,

    /// Message text was empty after trimming.
    #[error("Message text is empty")]
    EmptyMessage,

    /// Gig title was empty after trimming.
    #[error("Gig title is empty")]
    EmptyTitle,

    /// The shared state lock was poisoned by a panicked thread.
    #[error("State lock poisoned")]
    LockPoisoned,

    /// Failure in the underlying store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
