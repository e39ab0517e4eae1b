//! The client engine object and its session handling.
//!
//! [`ChatClient`] owns every collaborator explicitly: the store handle, the
//! change bus feeding live subscriptions, the signed-in session, and the set
//! of in-flight best-effort writes.  Embedding code constructs one and keeps
//! it for the life of the process.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinSet;
use tracing::info;

use greenroom_shared::UserId;
use greenroom_store::Database;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::events::ChangeBus;

/// Mutable state behind the client's lock: the open database and the
/// signed-in session.
pub(crate) struct ClientState {
    /// Handle to the local SQLite database.
    pub(crate) db: Database,

    /// The signed-in user, installed by the app's auth layer.
    /// `None` until [`ChatClient::sign_in`] is called.
    pub(crate) session: Option<UserId>,
}

/// The messaging engine.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct ChatClient {
    pub(crate) state: Arc<Mutex<ClientState>>,
    pub(crate) bus: ChangeBus,
    pub(crate) pending: tokio::sync::Mutex<JoinSet<()>>,
    pub(crate) config: ClientConfig,
}

impl ChatClient {
    /// Create a client over an opened database with default configuration.
    pub fn new(db: Database) -> Self {
        Self::with_config(db, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(db: Database, config: ClientConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClientState { db, session: None })),
            bus: ChangeBus::new(config.event_capacity),
            pending: tokio::sync::Mutex::new(JoinSet::new()),
            config,
        }
    }

    /// Install the signed-in user.
    ///
    /// The id comes from the app's auth layer; the engine treats it as an
    /// opaque token and never verifies it.  Signing in over an existing
    /// session replaces it.
    pub fn sign_in(&self, user: UserId) -> Result<()> {
        let mut state = self.state()?;
        info!(user = %user, "user signed in");
        state.session = Some(user);
        Ok(())
    }

    /// Clear the signed-in user.
    ///
    /// Feeds opened before sign-out keep running until they are closed.
    pub fn sign_out(&self) -> Result<()> {
        let mut state = self.state()?;
        if let Some(user) = state.session.take() {
            info!(user = %user, "user signed out");
        }
        Ok(())
    }

    /// The currently signed-in user, if any.
    pub fn current_user(&self) -> Result<Option<UserId>> {
        Ok(self.state()?.session.clone())
    }

    /// Wait for every in-flight best-effort write to finish.
    ///
    /// Call before shutdown so detached notification tasks are not stranded
    /// mid-write.
    pub async fn flush(&self) {
        let mut pending = self.pending.lock().await;
        while pending.join_next().await.is_some() {}
    }

    /// Lock the shared state.
    pub(crate) fn state(&self) -> Result<MutexGuard<'_, ClientState>> {
        self.state.lock().map_err(|_| ClientError::LockPoisoned)
    }

    /// The signed-in user, or [`ClientError::NotSignedIn`].
    ///
    /// Every operation calls this before touching the store.
    pub(crate) fn require_session(&self) -> Result<UserId> {
        self.state()?.session.clone().ok_or(ClientError::NotSignedIn)
    }
}
