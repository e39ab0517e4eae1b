//! Domain records as they are persisted.
//!
//! Rows map into these structs on the way out of SQLite; the serde derives
//! let an embedding app lift them straight into view state.

use chrono::{DateTime, Utc};
use greenroom_shared::{ConversationId, NotificationKind, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// A direct conversation between exactly two users.
///
/// The record lives at the deterministic id derived from its member pair, so
/// the same two users always land in the same conversation no matter who
/// opens it first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Canonical pair id (`"<low>_<high>"`).
    pub id: ConversationId,
    /// The two members, lexicographically sorted.
    pub members: [UserId; 2],
    /// Body of the most recent message; empty until the first send.
    pub last_message: String,
    /// Timestamp of the most recent message.  Never moves backwards.
    pub last_message_at: DateTime<Utc>,
    /// When the conversation record was created.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single direct message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique message identifier, assigned by the store.
    pub id: Uuid,
    /// The conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Who sent it.
    pub sender_id: UserId,
    /// Message text.
    pub body: String,
    /// Per-message read receipts are not implemented; the flag is stored but
    /// currently always `false`.
    pub read: bool,
    /// When the store accepted the message.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// An entry in a user's notification feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// Unique notification identifier, assigned by the store.
    pub id: Uuid,
    /// The recipient.
    pub user_id: UserId,
    /// What happened.
    pub kind: NotificationKind,
    /// Fully formatted display text.
    pub body: String,
    /// Optional call-to-action route understood by the UI.
    pub cta: Option<String>,
    /// Whether the recipient has seen it.
    pub read: bool,
    /// When the notification was posted.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Gig
// ---------------------------------------------------------------------------

/// A gig listing posted by a promoter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gig {
    /// Unique gig identifier, assigned by the store.
    pub id: Uuid,
    /// The promoter who posted it.
    pub promoter_id: UserId,
    /// Listing title.
    pub title: String,
    /// Where the gig takes place.
    pub venue: String,
    /// When the gig takes place.
    pub starts_at: DateTime<Utc>,
    /// When the listing was posted.
    pub created_at: DateTime<Utc>,
}
