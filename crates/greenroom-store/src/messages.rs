use chrono::{DateTime, Utc};
use greenroom_shared::{ConversationId, UserId};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Message;

impl Database {
    /// Append a message and refresh the parent conversation's summary in a
    /// single transaction.
    ///
    /// The store assigns the message id and timestamp.  Fails with
    /// [`StoreError::NotFound`] if the conversation does not exist.  Returns
    /// the stored message together with the conversation's member pair.
    pub fn append_message(
        &mut self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        body: &str,
    ) -> Result<(Message, [UserId; 2])> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let tx = self.conn_mut().transaction()?;

        let members = tx
            .query_row(
                "SELECT member_a, member_b FROM conversations WHERE id = ?1",
                params![conversation_id.as_str()],
                |row| {
                    let a: String = row.get(0)?;
                    let b: String = row.get(1)?;
                    Ok([UserId::new(a), UserId::new(b)])
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })?;

        tx.execute(
            "INSERT INTO messages (id, conversation_id, sender_id, body, read, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![
                id.to_string(),
                conversation_id.as_str(),
                sender_id.as_str(),
                body,
                now.to_rfc3339(),
            ],
        )?;

        // The summary timestamp never moves backwards, even if the wall
        // clock does.
        tx.execute(
            "UPDATE conversations
             SET last_message = ?1, last_message_at = MAX(last_message_at, ?2)
             WHERE id = ?3",
            params![body, now.to_rfc3339(), conversation_id.as_str()],
        )?;

        tx.commit()?;

        let message = Message {
            id,
            conversation_id: conversation_id.clone(),
            sender_id: sender_id.clone(),
            body: body.to_string(),
            read: false,
            created_at: now,
        };
        Ok((message, members))
    }

    pub fn list_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, conversation_id, sender_id, body, read, created_at
             FROM messages
             WHERE conversation_id = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;

        let rows = stmt.query_map(params![conversation_id.as_str()], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let conversation_id: String = row.get(1)?;
    let sender_id: String = row.get(2)?;
    let body: String = row.get(3)?;
    let read: bool = row.get(4)?;
    let ts_str: String = row.get(5)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Message {
        id,
        conversation_id: ConversationId(conversation_id),
        sender_id: UserId::new(sender_id),
        body,
        read,
        created_at,
    })
}
