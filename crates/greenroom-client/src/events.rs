//! In-process change events connecting writes to live feeds.
//!
//! Every successful write publishes a [`ChangeEvent`] on the client's
//! [`ChangeBus`].  Feed watchers subscribe and re-query their snapshot when
//! a relevant event arrives.  Publishing is fire-and-forget: with no open
//! feeds there are no receivers, which is normal.

use greenroom_shared::{ConversationId, UserId};
use tokio::sync::broadcast;

/// A store change worth refreshing feeds over.
#[derive(Debug, Clone)]
pub(crate) enum ChangeEvent {
    /// A conversation record was actually created, not merely re-ensured.
    ConversationCreated {
        conversation_id: ConversationId,
        members: [UserId; 2],
    },

    /// A message was appended and the conversation summary refreshed.
    MessageAppended {
        conversation_id: ConversationId,
        members: [UserId; 2],
    },

    /// A notification landed in a user's feed.
    NotificationPosted { user_id: UserId },

    /// A user's unread notifications were flipped to read.
    NotificationsRead { user_id: UserId },
}

/// Broadcast fan-out for [`ChangeEvent`]s.
#[derive(Clone)]
pub(crate) struct ChangeBus {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn publish(&self, event: ChangeEvent) {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(receivers, "change event published");
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(?event, "change event dropped, no feeds open");
            }
        }
    }
}
