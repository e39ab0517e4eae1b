//! Conversation bootstrap and listing.

use chrono::Utc;
use tracing::info;

use greenroom_shared::{ConversationId, UserId};
use greenroom_store::Conversation;

use crate::client::ChatClient;
use crate::error::{ClientError, Result};
use crate::events::ChangeEvent;

impl ChatClient {
    /// Ensure the conversation between the signed-in user and `other`
    /// exists, returning its canonical id.
    ///
    /// The id is derived from the member pair, so both participants arrive
    /// at the same record without coordination.  The write is
    /// create-if-absent: re-ensuring an existing conversation touches
    /// neither its summary nor its messages.
    pub async fn ensure_conversation(&self, other: &UserId) -> Result<ConversationId> {
        let me = self.require_session()?;
        if me == *other {
            return Err(ClientError::SelfConversation);
        }

        let mut members = [me, other.clone()];
        members.sort();
        let id = ConversationId::for_pair(&members[0], &members[1]);

        let now = Utc::now();
        let conversation = Conversation {
            id: id.clone(),
            members,
            last_message: String::new(),
            last_message_at: now,
            created_at: now,
        };

        let created = {
            let state = self.state()?;
            state.db.create_conversation_if_absent(&conversation)?
        };

        if created {
            info!(conversation = %id, "conversation created");
            self.bus.publish(ChangeEvent::ConversationCreated {
                conversation_id: id.clone(),
                members: conversation.members,
            });
        }

        Ok(id)
    }

    /// Fetch one conversation by id.
    pub fn conversation(&self, id: &ConversationId) -> Result<Conversation> {
        self.require_session()?;
        let state = self.state()?;
        Ok(state.db.get_conversation(id)?)
    }

    /// The signed-in user's conversations, most recently active first.
    pub fn conversations(&self) -> Result<Vec<Conversation>> {
        let user = self.require_session()?;
        let state = self.state()?;
        Ok(state.db.list_conversations_for_user(&user)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenroom_store::Database;

    fn test_client() -> (tempfile::TempDir, ChatClient) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open_at(&dir.path().join("greenroom.db")).expect("open db");
        (dir, ChatClient::new(db))
    }

    #[tokio::test]
    async fn ensure_creates_once_and_is_idempotent() {
        let (_dir, client) = test_client();
        client.sign_in(UserId::new("ana")).unwrap();

        let first = client
            .ensure_conversation(&UserId::new("bob"))
            .await
            .unwrap();
        let second = client
            .ensure_conversation(&UserId::new("bob"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.as_str(), "ana_bob");
        assert_eq!(client.conversations().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn both_sides_reach_the_same_conversation() {
        let (_dir, client) = test_client();

        client.sign_in(UserId::new("promoter_7")).unwrap();
        let from_promoter = client
            .ensure_conversation(&UserId::new("talent_42"))
            .await
            .unwrap();

        client.sign_in(UserId::new("talent_42")).unwrap();
        let from_talent = client
            .ensure_conversation(&UserId::new("promoter_7"))
            .await
            .unwrap();

        assert_eq!(from_promoter, from_talent);
        assert_eq!(client.conversations().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ensure_rejects_self_conversation() {
        let (_dir, client) = test_client();
        client.sign_in(UserId::new("ana")).unwrap();

        let err = client
            .ensure_conversation(&UserId::new("ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::SelfConversation));
        assert!(client.conversations().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reensure_preserves_summary_and_log() {
        let (_dir, client) = test_client();
        client.sign_in(UserId::new("ana")).unwrap();

        let id = client
            .ensure_conversation(&UserId::new("bob"))
            .await
            .unwrap();
        client.send_message(&id, "see you at the venue").await.unwrap();

        client
            .ensure_conversation(&UserId::new("bob"))
            .await
            .unwrap();

        let conversation = client.conversation(&id).unwrap();
        assert_eq!(conversation.last_message, "see you at the venue");
        assert_eq!(client.messages(&id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_orders_by_recent_activity() {
        let (_dir, client) = test_client();
        client.sign_in(UserId::new("ana")).unwrap();

        let with_bob = client
            .ensure_conversation(&UserId::new("bob"))
            .await
            .unwrap();
        let with_carl = client
            .ensure_conversation(&UserId::new("carl"))
            .await
            .unwrap();

        // Newest first on creation order, then a message moves bob back up.
        let listed = client.conversations().unwrap();
        assert_eq!(listed[0].id, with_carl);

        client.send_message(&with_bob, "hey!").await.unwrap();
        let listed = client.conversations().unwrap();
        assert_eq!(listed[0].id, with_bob);
        assert_eq!(listed[1].id, with_carl);
    }
}
