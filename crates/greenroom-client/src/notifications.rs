//! The per-user notification feed: emission and read state.

use std::sync::Arc;

use tracing::{debug, warn};

use greenroom_shared::{NotificationKind, UserId};
use greenroom_store::Notification;

use crate::client::ChatClient;
use crate::error::Result;
use crate::events::ChangeEvent;

impl ChatClient {
    /// Post a notification into `recipient`'s feed.
    ///
    /// Best effort: the write runs on a detached task and failures are
    /// logged, never surfaced to the caller.  The body must arrive fully
    /// formatted; nothing downstream re-renders it.  Two identical calls
    /// produce two records.
    pub async fn emit_notification(
        &self,
        recipient: &UserId,
        kind: NotificationKind,
        body: &str,
        cta: Option<&str>,
    ) -> Result<()> {
        self.require_session()?;
        self.emit_detached(
            recipient.clone(),
            kind,
            body.to_string(),
            cta.map(str::to_string),
        )
        .await;
        Ok(())
    }

    /// The signed-in user's notifications, newest first.
    pub fn notifications(&self) -> Result<Vec<Notification>> {
        let user = self.require_session()?;
        let state = self.state()?;
        Ok(state.db.list_notifications_for_user(&user)?)
    }

    /// How many of the signed-in user's notifications are unread.
    pub fn unread_count(&self) -> Result<usize> {
        let user = self.require_session()?;
        let state = self.state()?;
        Ok(state.db.count_unread_notifications(&user)? as usize)
    }

    /// Flip every unread notification of the signed-in user to read.
    ///
    /// One atomic batch: all of them flip or none do, so a failed attempt
    /// leaves the feed unread and the next visit retries.  Returns the
    /// number of notifications flipped.
    pub async fn mark_all_read(&self) -> Result<usize> {
        let user = self.require_session()?;

        let flipped = {
            let state = self.state()?;
            state.db.mark_all_notifications_read(&user)?
        };

        if flipped > 0 {
            debug!(user = %user, count = flipped, "notifications marked read");
            self.bus
                .publish(ChangeEvent::NotificationsRead { user_id: user });
        }

        Ok(flipped)
    }

    /// Queue a notification write on a detached task.
    ///
    /// In-flight tasks are tracked so [`ChatClient::flush`] can drain them;
    /// finished ones are reaped on the way in.
    pub(crate) async fn emit_detached(
        &self,
        recipient: UserId,
        kind: NotificationKind,
        body: String,
        cta: Option<String>,
    ) {
        let state = Arc::clone(&self.state);
        let bus = self.bus.clone();

        let mut pending = self.pending.lock().await;
        while pending.try_join_next().is_some() {}

        pending.spawn(async move {
            let inserted = match state.lock() {
                Ok(guard) => guard.db.insert_notification(&recipient, kind, &body, cta.as_deref()),
                Err(_) => {
                    warn!(user = %recipient, kind = %kind, "state lock poisoned, notification dropped");
                    return;
                }
            };

            match inserted {
                Ok(notification) => {
                    debug!(id = %notification.id, user = %recipient, kind = %kind, "notification posted");
                    bus.publish(ChangeEvent::NotificationPosted { user_id: recipient });
                }
                Err(e) => {
                    warn!(user = %recipient, kind = %kind, error = %e, "failed to post notification");
                }
            }
        });
    }
}
