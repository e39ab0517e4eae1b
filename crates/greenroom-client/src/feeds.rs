//! Live snapshot feeds.
//!
//! A [`Feed`] is a scoped subscription: it owns a watcher task that
//! re-queries the store whenever a relevant change event lands on the bus,
//! delivering the full ordered result each time.  Dropping the handle (or
//! calling [`Feed::close`]) tears the watcher down, so a subscription never
//! outlives the screen that asked for it.
//!
//! Snapshots are self-healing: a watcher that lags behind the event bus
//! simply re-queries, and a failed refresh is logged and retried on the
//! next change.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::warn;

use greenroom_shared::ConversationId;
use greenroom_store::{Conversation, Database, Message, Notification, StoreError};

use crate::client::{ChatClient, ClientState};
use crate::error::Result;
use crate::events::ChangeEvent;

/// A live subscription handle.
///
/// Every delivered `Vec<T>` is the complete, ordered result as of the most
/// recent change: the first delivery is the initial snapshot, later ones
/// follow relevant store changes.
pub struct Feed<T> {
    rx: mpsc::Receiver<Vec<T>>,
    watcher: JoinHandle<()>,
}

impl<T> Feed<T> {
    /// Receive the next snapshot.  Returns `None` once the feed is closed.
    pub async fn recv(&mut self) -> Option<Vec<T>> {
        self.rx.recv().await
    }

    /// Stop the watcher and close the delivery queue.  Idempotent.
    pub fn close(&mut self) {
        self.watcher.abort();
        self.rx.close();
    }
}

impl<T> Drop for Feed<T> {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

impl ChatClient {
    /// Subscribe to the ordered message log of one conversation.
    pub fn subscribe_messages(&self, conversation_id: &ConversationId) -> Result<Feed<Message>> {
        self.require_session()?;
        let load_id = conversation_id.clone();
        let seen_id = conversation_id.clone();
        Ok(self.spawn_feed(
            move |db| db.list_messages(&load_id),
            move |event| match event {
                ChangeEvent::MessageAppended {
                    conversation_id, ..
                }
                | ChangeEvent::ConversationCreated {
                    conversation_id, ..
                } => *conversation_id == seen_id,
                _ => false,
            },
        ))
    }

    /// Subscribe to the signed-in user's notification feed, newest first.
    pub fn subscribe_notifications(&self) -> Result<Feed<Notification>> {
        let user = self.require_session()?;
        let load_user = user.clone();
        Ok(self.spawn_feed(
            move |db| db.list_notifications_for_user(&load_user),
            move |event| match event {
                ChangeEvent::NotificationPosted { user_id }
                | ChangeEvent::NotificationsRead { user_id } => *user_id == user,
                _ => false,
            },
        ))
    }

    /// Subscribe to the signed-in user's conversation list, most recently
    /// active first.
    pub fn subscribe_conversations(&self) -> Result<Feed<Conversation>> {
        let user = self.require_session()?;
        let load_user = user.clone();
        Ok(self.spawn_feed(
            move |db| db.list_conversations_for_user(&load_user),
            move |event| match event {
                ChangeEvent::ConversationCreated { members, .. }
                | ChangeEvent::MessageAppended { members, .. } => members.contains(&user),
                _ => false,
            },
        ))
    }

    /// Spawn a feed watcher: deliver the initial snapshot, then re-query
    /// after every relevant event.
    ///
    /// The bus subscription is taken before the first query, so a write
    /// racing with subscription is never missed: it shows up either in the
    /// initial snapshot or as a queued event.
    fn spawn_feed<T, L, R>(&self, load: L, relevant: R) -> Feed<T>
    where
        T: Send + 'static,
        L: Fn(&Database) -> std::result::Result<Vec<T>, StoreError> + Send + Sync + 'static,
        R: Fn(&ChangeEvent) -> bool + Send + 'static,
    {
        let mut events = self.bus.subscribe();
        let state = Arc::clone(&self.state);
        let (tx, rx) = mpsc::channel(self.config.feed_capacity);

        let watcher = tokio::spawn(async move {
            if !deliver(&state, &load, &tx).await {
                return;
            }
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if relevant(&event) && !deliver(&state, &load, &tx).await {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "feed watcher lagged, refreshing");
                        if !deliver(&state, &load, &tx).await {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        warn!("change bus closed, ending feed");
                        return;
                    }
                }
            }
        });

        Feed { rx, watcher }
    }
}

/// Query one snapshot and push it into the feed.  Returns `false` once the
/// receiving side is gone.
async fn deliver<T, L>(
    state: &Arc<Mutex<ClientState>>,
    load: &L,
    tx: &mpsc::Sender<Vec<T>>,
) -> bool
where
    L: Fn(&Database) -> std::result::Result<Vec<T>, StoreError>,
{
    let snapshot = {
        let guard = match state.lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("state lock poisoned, ending feed");
                return false;
            }
        };
        load(&guard.db)
    };

    match snapshot {
        Ok(items) => tx.send(items).await.is_ok(),
        Err(e) => {
            // Screens treat a failed refresh as transient; the next change
            // re-queries anyway.
            warn!(error = %e, "failed to load feed snapshot");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use greenroom_shared::{NotificationKind, UserId};

    fn test_client() -> (tempfile::TempDir, ChatClient) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open_at(&dir.path().join("greenroom.db")).expect("open db");
        (dir, ChatClient::new(db))
    }

    #[tokio::test]
    async fn message_flow_reaches_every_feed() {
        let (_dir, client) = test_client();
        let ana = UserId::new("ana");
        let bob = UserId::new("bob");

        // Bob watches his notifications from the start.
        client.sign_in(bob.clone()).unwrap();
        let mut bob_notifications = client.subscribe_notifications().unwrap();
        assert_eq!(bob_notifications.recv().await.unwrap(), vec![]);

        // Ana opens the conversation and watches the message log.
        client.sign_in(ana.clone()).unwrap();
        let id = client.ensure_conversation(&bob).await.unwrap();
        let mut log = client.subscribe_messages(&id).unwrap();
        assert_eq!(log.recv().await.unwrap(), vec![]);

        client.send_message(&id, "hello").await.unwrap();
        let snapshot = log.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].body, "hello");
        assert_eq!(snapshot[0].sender_id, ana);

        // Once the detached emit lands, Bob's feed updates.
        client.flush().await;
        let snapshot = bob_notifications.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].kind, NotificationKind::Message);
        assert!(!snapshot[0].read);

        // Bob reads everything; his feed pushes the flipped flags.
        client.sign_in(bob).unwrap();
        assert_eq!(client.mark_all_read().await.unwrap(), 1);
        let snapshot = bob_notifications.recv().await.unwrap();
        assert!(snapshot[0].read);
    }

    #[tokio::test]
    async fn conversation_feed_tracks_activity_order() {
        let (_dir, client) = test_client();
        client.sign_in(UserId::new("ana")).unwrap();

        let mut list = client.subscribe_conversations().unwrap();
        assert_eq!(list.recv().await.unwrap(), vec![]);

        let with_bob = client
            .ensure_conversation(&UserId::new("bob"))
            .await
            .unwrap();
        let snapshot = list.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);

        let with_carl = client
            .ensure_conversation(&UserId::new("carl"))
            .await
            .unwrap();
        let snapshot = list.recv().await.unwrap();
        assert_eq!(snapshot[0].id, with_carl);

        client.send_message(&with_bob, "hey!").await.unwrap();
        let snapshot = list.recv().await.unwrap();
        assert_eq!(snapshot[0].id, with_bob);
        assert_eq!(snapshot[0].last_message, "hey!");
    }

    #[tokio::test]
    async fn lagged_watcher_recovers_with_a_fresh_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open_at(&dir.path().join("greenroom.db")).expect("open db");
        let config = ClientConfig {
            event_capacity: 1,
            ..ClientConfig::default()
        };
        let client = ChatClient::with_config(db, config);

        client.sign_in(UserId::new("ana")).unwrap();
        let id = client
            .ensure_conversation(&UserId::new("bob"))
            .await
            .unwrap();

        let mut log = client.subscribe_messages(&id).unwrap();
        assert_eq!(log.recv().await.unwrap(), vec![]);

        // Three rapid sends overflow the one-slot bus while the watcher is
        // parked, so it wakes to a lag instead of a replay.
        for body in ["one", "two", "three"] {
            client.send_message(&id, body).await.unwrap();
        }

        let mut snapshot = log.recv().await.unwrap();
        for _ in 0..2 {
            if snapshot.len() == 3 {
                break;
            }
            snapshot = log.recv().await.unwrap();
        }
        let bodies: Vec<&str> = snapshot.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn close_ends_the_feed() {
        let (_dir, client) = test_client();
        client.sign_in(UserId::new("ana")).unwrap();

        let mut feed = client.subscribe_notifications().unwrap();
        assert!(feed.recv().await.is_some());

        feed.close();
        assert_eq!(feed.recv().await, None);
    }

    #[tokio::test]
    async fn subscriptions_require_a_session() {
        let (_dir, client) = test_client();

        let id = ConversationId::for_pair(&UserId::new("a"), &UserId::new("b"));
        assert!(client.subscribe_messages(&id).is_err());
        assert!(client.subscribe_conversations().is_err());
    }
}
