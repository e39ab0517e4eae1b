use serde::{Deserialize, Serialize};

use crate::constants::CONVERSATION_ID_SEPARATOR;

// Account identifier issued by the marketplace's auth service. Opaque here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical id of a direct conversation between two users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// Derive the conversation id for an unordered pair of members.
    ///
    /// The lexicographically smaller id comes first, joined to the larger
    /// one with an underscore, so both participants compute the same id
    /// regardless of who opens the conversation.
    pub fn for_pair(a: &UserId, b: &UserId) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self(format!(
            "{}{}{}",
            low.as_str(),
            CONVERSATION_ID_SEPARATOR,
            high.as_str()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of activity that can land in a user's notification feed.
///
/// The textual tags are storage and UI vocabulary; adding kinds is fine,
/// renaming existing tags is not.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A promoter invited the user to play a gig.
    GigInvite,
    /// A new direct message arrived.
    Message,
    /// The user's first gig post went live.
    FirstPost,
    /// Somebody applied to one of the user's gigs.
    Application,
    /// A booking was confirmed.
    Confirmation,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GigInvite => "gig_invite",
            Self::Message => "message",
            Self::FirstPost => "first_post",
            Self::Application => "application",
            Self::Confirmation => "confirmation",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "gig_invite" => Some(Self::GigInvite),
            "message" => Some(Self::Message),
            "first_post" => Some(Self::FirstPost),
            "application" => Some(Self::Application),
            "confirmation" => Some(Self::Confirmation),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
