//! # greenroom-store
//!
//! SQLite persistence for the greenroom messaging core: conversations,
//! messages, notifications and gig posts.
//!
//! The hosted document store the mobile app talks to is replaced here by an
//! embedded database behind the same contract: conditional creates at
//! caller-chosen keys, store-assigned ids and timestamps on appends, ordered
//! filtered reads, and atomic batch updates.  [`Database`] is a synchronous
//! handle; the async layering happens one crate up.

pub mod conversations;
pub mod database;
pub mod gigs;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod notifications;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
