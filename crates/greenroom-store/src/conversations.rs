//! CRUD operations for [`Conversation`] records.

use chrono::{DateTime, Utc};
use greenroom_shared::{ConversationId, UserId};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Conversation;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a conversation unless one already exists at its id.
    ///
    /// Returns `true` if the row was actually created.  Re-ensuring an
    /// existing conversation is a no-op: the summary fields and message log
    /// are left untouched.
    pub fn create_conversation_if_absent(&self, conversation: &Conversation) -> Result<bool> {
        let affected = self.conn().execute(
            "INSERT OR IGNORE INTO conversations
                 (id, member_a, member_b, last_message, last_message_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                conversation.id.as_str(),
                conversation.members[0].as_str(),
                conversation.members[1].as_str(),
                conversation.last_message,
                conversation.last_message_at.to_rfc3339(),
                conversation.created_at.to_rfc3339(),
            ],
        )?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single conversation by its canonical id.
    pub fn get_conversation(&self, id: &ConversationId) -> Result<Conversation> {
        self.conn()
            .query_row(
                "SELECT id, member_a, member_b, last_message, last_message_at, created_at
                 FROM conversations
                 WHERE id = ?1",
                params![id.as_str()],
                row_to_conversation,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List every conversation a user is a member of, most recently active
    /// first.
    pub fn list_conversations_for_user(&self, user: &UserId) -> Result<Vec<Conversation>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, member_a, member_b, last_message, last_message_at, created_at
             FROM conversations
             WHERE member_a = ?1 OR member_b = ?1
             ORDER BY last_message_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![user.as_str()], row_to_conversation)?;

        let mut conversations = Vec::new();
        for row in rows {
            conversations.push(row?);
        }
        Ok(conversations)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Conversation`].
fn row_to_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    let id: String = row.get(0)?;
    let member_a: String = row.get(1)?;
    let member_b: String = row.get(2)?;
    let last_message: String = row.get(3)?;
    let last_message_at_str: String = row.get(4)?;
    let created_str: String = row.get(5)?;

    let last_message_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&last_message_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Conversation {
        id: ConversationId(id),
        members: [UserId::new(member_a), UserId::new(member_b)],
        last_message,
        last_message_at,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_db(dir: &tempfile::TempDir) -> Database {
        Database::open_at(&dir.path().join("test.db")).expect("open db")
    }

    fn candidate(a: &str, b: &str, at: DateTime<Utc>) -> Conversation {
        let a = UserId::new(a);
        let b = UserId::new(b);
        let mut members = [a, b];
        members.sort();
        Conversation {
            id: ConversationId::for_pair(&members[0], &members[1]),
            members,
            last_message: String::new(),
            last_message_at: at,
            created_at: at,
        }
    }

    #[test]
    fn conditional_create_inserts_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let conversation = candidate("ana", "bob", Utc::now());
        assert!(db.create_conversation_if_absent(&conversation).unwrap());
        assert!(!db.create_conversation_if_absent(&conversation).unwrap());

        let listed = db.list_conversations_for_user(&UserId::new("ana")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], conversation);
    }

    #[test]
    fn get_missing_conversation_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let result = db.get_conversation(&ConversationId("ana_bob".into()));
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn list_covers_both_member_columns() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        // "bob" sorts high against "ana" and low against "zoe", so it lands
        // in member_b for one conversation and member_a for the other.
        let now = Utc::now();
        db.create_conversation_if_absent(&candidate("ana", "bob", now))
            .unwrap();
        db.create_conversation_if_absent(&candidate("zoe", "bob", now))
            .unwrap();

        let listed = db.list_conversations_for_user(&UserId::new("bob")).unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn list_orders_by_recent_activity() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let now = Utc::now();
        let older = candidate("ana", "bob", now);
        let newer = candidate("ana", "carl", now + chrono::Duration::seconds(5));
        db.create_conversation_if_absent(&older).unwrap();
        db.create_conversation_if_absent(&newer).unwrap();

        let listed = db.list_conversations_for_user(&UserId::new("ana")).unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }
}
