//! v001 -- Initial schema creation.
//!
//! Creates the four core tables: `conversations`, `messages`,
//! `notifications`, and `gigs`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Conversations
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS conversations (
    id              TEXT PRIMARY KEY NOT NULL,  -- "<low>_<high>" member pair id
    member_a        TEXT NOT NULL,              -- lexicographically lower member
    member_b        TEXT NOT NULL,              -- lexicographically higher member
    last_message    TEXT NOT NULL DEFAULT '',   -- body of the latest message
    last_message_at TEXT NOT NULL,              -- ISO-8601 / RFC-3339
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_conversations_member_a ON conversations(member_a);
CREATE INDEX IF NOT EXISTS idx_conversations_member_b ON conversations(member_b);
CREATE INDEX IF NOT EXISTS idx_conversations_activity
    ON conversations(last_message_at DESC);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id              TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    conversation_id TEXT NOT NULL,              -- FK -> conversations(id)
    sender_id       TEXT NOT NULL,
    body            TEXT NOT NULL,
    read            INTEGER NOT NULL DEFAULT 0, -- boolean 0/1, not flipped yet
    created_at      TEXT NOT NULL,              -- ISO-8601

    FOREIGN KEY (conversation_id) REFERENCES conversations(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_messages_conversation_ts
    ON messages(conversation_id, created_at ASC);

-- ----------------------------------------------------------------
-- Notifications
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS notifications (
    id         TEXT PRIMARY KEY NOT NULL,       -- UUID v4
    user_id    TEXT NOT NULL,                   -- recipient
    kind       TEXT NOT NULL,                   -- gig_invite | message | first_post | application | confirmation
    body       TEXT NOT NULL,                   -- fully formatted display text
    cta        TEXT,                            -- optional call-to-action route
    read       INTEGER NOT NULL DEFAULT 0,      -- boolean 0/1
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notifications_user_ts
    ON notifications(user_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_notifications_user_read
    ON notifications(user_id, read);

-- ----------------------------------------------------------------
-- Gigs
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS gigs (
    id          TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    promoter_id TEXT NOT NULL,
    title       TEXT NOT NULL,
    venue       TEXT NOT NULL,
    starts_at   TEXT NOT NULL,                  -- when the gig takes place
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_gigs_promoter ON gigs(promoter_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
