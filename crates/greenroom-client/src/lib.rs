//! # greenroom-client
//!
//! The synchronization engine of the greenroom gig marketplace: direct
//! conversations between talent and promoters, a per-user notification feed,
//! and live snapshot subscriptions over the embedded store.
//!
//! The entry point is [`ChatClient`].  Construct one over an opened
//! [`greenroom_store::Database`], sign a user in, then drive everything
//! through its methods: [`ensure_conversation`], [`send_message`],
//! [`post_gig`], [`mark_all_read`], and the `subscribe_*` family returning
//! [`Feed`] handles.  The client owns all of its collaborators explicitly;
//! nothing in this crate reaches for global state.
//!
//! [`ensure_conversation`]: ChatClient::ensure_conversation
//! [`send_message`]: ChatClient::send_message
//! [`post_gig`]: ChatClient::post_gig
//! [`mark_all_read`]: ChatClient::mark_all_read

pub mod config;
pub mod logging;

mod client;
mod conversations;
mod error;
mod events;
mod feeds;
mod gigs;
mod messaging;
mod notifications;

pub use client::ChatClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use feeds::Feed;
