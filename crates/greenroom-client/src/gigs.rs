//! Gig posting and the first-post celebration.

use chrono::{DateTime, Utc};
use tracing::info;

use greenroom_shared::NotificationKind;
use greenroom_store::Gig;

use crate::client::ChatClient;
use crate::error::{ClientError, Result};

impl ChatClient {
    /// Post a gig listing as the signed-in promoter.
    ///
    /// The title is trimmed and must be non-empty.  A promoter's first gig
    /// triggers a `first_post` notification back to them, emitted best
    /// effort off the posting path.  The first-post check is a
    /// read-after-write count, not a counter.
    pub async fn post_gig(
        &self,
        title: &str,
        venue: &str,
        starts_at: DateTime<Utc>,
    ) -> Result<Gig> {
        let promoter = self.require_session()?;

        let title = title.trim();
        if title.is_empty() {
            return Err(ClientError::EmptyTitle);
        }

        let (gig, posted) = {
            let state = self.state()?;
            let gig = state.db.insert_gig(&promoter, title, venue, starts_at)?;
            let posted = state.db.count_gigs_for_promoter(&promoter)?;
            (gig, posted)
        };

        info!(gig = %gig.id, promoter = %promoter, "gig posted");

        if posted == 1 {
            let body = format!("Your first gig \"{title}\" is live!");
            let cta = format!("/gigs/{}", gig.id);
            self.emit_detached(promoter, NotificationKind::FirstPost, body, Some(cta))
                .await;
        }

        Ok(gig)
    }

    /// The signed-in promoter's gig listings, soonest first.
    pub fn gigs(&self) -> Result<Vec<Gig>> {
        let promoter = self.require_session()?;
        let state = self.state()?;
        Ok(state.db.list_gigs_for_promoter(&promoter)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenroom_shared::UserId;
    use greenroom_store::Database;

    fn test_client() -> (tempfile::TempDir, ChatClient) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open_at(&dir.path().join("greenroom.db")).expect("open db");
        (dir, ChatClient::new(db))
    }

    #[tokio::test]
    async fn first_post_notifies_exactly_once() {
        let (_dir, client) = test_client();
        let promoter = UserId::new("venue_owner");
        client.sign_in(promoter).unwrap();

        let first = client
            .post_gig("Open mic night", "The Cellar", Utc::now())
            .await
            .unwrap();
        client
            .post_gig("Jazz evening", "The Cellar", Utc::now())
            .await
            .unwrap();
        client.flush().await;

        let feed = client.notifications().unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, NotificationKind::FirstPost);
        assert!(feed[0].body.contains("Open mic night"));
        assert_eq!(feed[0].cta.as_deref(), Some(format!("/gigs/{}", first.id).as_str()));

        assert_eq!(client.gigs().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn title_is_trimmed_and_empty_rejected() {
        let (_dir, client) = test_client();
        client.sign_in(UserId::new("venue_owner")).unwrap();

        let err = client.post_gig("   ", "The Cellar", Utc::now()).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyTitle));
        assert!(client.gigs().unwrap().is_empty());

        let gig = client
            .post_gig("  Acoustic set  ", "The Cellar", Utc::now())
            .await
            .unwrap();
        assert_eq!(gig.title, "Acoustic set");
    }
}
