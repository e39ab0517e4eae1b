//! # greenroom-shared
//!
//! Identifier types and the notification vocabulary shared by every
//! greenroom crate.
//!
//! The one piece of real logic here is [`ConversationId::for_pair`]: direct
//! conversations live at an id derived from their member pair, so any two
//! participants agree on the record location without coordination.

pub mod constants;
pub mod types;

pub use types::{ConversationId, NotificationKind, UserId};
