//! Sending messages into conversations.

use tracing::info;

use greenroom_shared::{ConversationId, NotificationKind};
use greenroom_store::Message;

use crate::client::ChatClient;
use crate::error::{ClientError, Result};
use crate::events::ChangeEvent;

impl ChatClient {
    /// Append a message to a conversation as the signed-in user.
    ///
    /// The text is trimmed; empty messages are rejected before any store
    /// work.  The append and the conversation summary refresh commit
    /// atomically, and the store assigns the id and timestamp.  The
    /// counterparty is then notified on a detached best-effort task that
    /// never blocks or fails the send.
    ///
    /// The sender is not validated against the conversation's member pair.
    pub async fn send_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<Message> {
        let sender = self.require_session()?;

        let body = text.trim();
        if body.is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        let (message, members) = {
            let mut state = self.state()?;
            state.db.append_message(conversation_id, &sender, body)?
        };

        info!(message = %message.id, conversation = %conversation_id, "message sent");

        self.bus.publish(ChangeEvent::MessageAppended {
            conversation_id: conversation_id.clone(),
            members: members.clone(),
        });

        let preview = format!("New message from {sender}");
        for member in members {
            if member != sender {
                self.emit_detached(member, NotificationKind::Message, preview.clone(), None)
                    .await;
            }
        }

        Ok(message)
    }

    /// The full message log of a conversation, oldest first.
    pub fn messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        self.require_session()?;
        let state = self.state()?;
        Ok(state.db.list_messages(conversation_id)?)
    }
}
