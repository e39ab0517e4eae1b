//! CRUD operations for [`Notification`] records.

use chrono::{DateTime, Utc};
use greenroom_shared::{NotificationKind, UserId};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::Result;
use crate::models::Notification;

impl Database {
    /// Insert a notification into a user's feed.
    ///
    /// The store assigns the id and timestamp; the record starts unread.
    pub fn insert_notification(
        &self,
        user_id: &UserId,
        kind: NotificationKind,
        body: &str,
        cta: Option<&str>,
    ) -> Result<Notification> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO notifications (id, user_id, kind, body, cta, read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                id.to_string(),
                user_id.as_str(),
                kind.as_str(),
                body,
                cta,
                now.to_rfc3339(),
            ],
        )?;

        Ok(Notification {
            id,
            user_id: user_id.clone(),
            kind,
            body: body.to_string(),
            cta: cta.map(str::to_string),
            read: false,
            created_at: now,
        })
    }

    /// List a user's notifications, newest first.
    pub fn list_notifications_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, kind, body, cta, read, created_at
             FROM notifications
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![user_id.as_str()], row_to_notification)?;

        let mut notifications = Vec::new();
        for row in rows {
            notifications.push(row?);
        }
        Ok(notifications)
    }

    /// Count a user's unread notifications.
    pub fn count_unread_notifications(&self, user_id: &UserId) -> Result<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND read = 0",
            params![user_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Flip every unread notification of a user to read.
    ///
    /// A single statement, so the batch is all-or-nothing.  Returns the
    /// number of rows updated.
    pub fn mark_all_notifications_read(&self, user_id: &UserId) -> Result<usize> {
        let affected = self.conn().execute(
            "UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0",
            params![user_id.as_str()],
        )?;
        Ok(affected)
    }
}

/// Map a `rusqlite::Row` to a [`Notification`].
fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notification> {
    let id_str: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let kind_str: String = row.get(2)?;
    let body: String = row.get(3)?;
    let cta: Option<String> = row.get(4)?;
    let read: bool = row.get(5)?;
    let ts_str: String = row.get(6)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let kind = NotificationKind::from_tag(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown notification kind: {kind_str}").into(),
        )
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Notification {
        id,
        user_id: UserId::new(user_id),
        kind,
        body,
        cta,
        read,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn open_db(dir: &tempfile::TempDir) -> Database {
        Database::open_at(&dir.path().join("test.db")).expect("open db")
    }

    #[test]
    fn insert_and_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);
        let ana = UserId::new("ana");

        db.insert_notification(
            &ana,
            NotificationKind::GigInvite,
            "Play at The Cellar?",
            Some("/gigs/42"),
        )
        .unwrap();
        db.insert_notification(&ana, NotificationKind::Message, "New message from bob", None)
            .unwrap();

        let feed = db.list_notifications_for_user(&ana).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, NotificationKind::Message);
        assert_eq!(feed[1].kind, NotificationKind::GigInvite);
        assert_eq!(feed[1].cta.as_deref(), Some("/gigs/42"));
        assert!(feed.iter().all(|n| !n.read));
    }

    #[test]
    fn mark_all_read_flips_only_that_user() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);
        let ana = UserId::new("ana");
        let bob = UserId::new("bob");

        for body in ["one", "two", "three"] {
            db.insert_notification(&ana, NotificationKind::Message, body, None)
                .unwrap();
        }
        db.insert_notification(&bob, NotificationKind::Confirmation, "Booking confirmed", None)
            .unwrap();

        assert_eq!(db.count_unread_notifications(&ana).unwrap(), 3);
        assert_eq!(db.mark_all_notifications_read(&ana).unwrap(), 3);
        assert_eq!(db.count_unread_notifications(&ana).unwrap(), 0);
        assert!(db
            .list_notifications_for_user(&ana)
            .unwrap()
            .iter()
            .all(|n| n.read));

        // Untouched neighbour, and a second pass finds nothing to flip.
        assert_eq!(db.count_unread_notifications(&bob).unwrap(), 1);
        assert_eq!(db.mark_all_notifications_read(&ana).unwrap(), 0);
    }

    #[test]
    fn mark_all_read_fails_cleanly_under_write_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open_at(&path).unwrap();
        let ana = UserId::new("ana");

        db.insert_notification(&ana, NotificationKind::Message, "one", None)
            .unwrap();
        db.insert_notification(&ana, NotificationKind::Message, "two", None)
            .unwrap();

        // A second connection holding the write lock makes the batch fail.
        let blocker = Database::open_at(&path).unwrap();
        blocker.conn().execute_batch("BEGIN IMMEDIATE").unwrap();

        let result = db.mark_all_notifications_read(&ana);
        assert!(matches!(result, Err(StoreError::Sqlite(_))));

        blocker.conn().execute_batch("ROLLBACK").unwrap();

        // Nothing flipped: the batch is all-or-nothing.
        assert_eq!(db.count_unread_notifications(&ana).unwrap(), 2);
        assert_eq!(db.mark_all_notifications_read(&ana).unwrap(), 2);
    }
}
