use chrono::{DateTime, Utc};
use greenroom_shared::UserId;
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::Result;
use crate::models::Gig;

impl Database {
    pub fn insert_gig(
        &self,
        promoter_id: &UserId,
        title: &str,
        venue: &str,
        starts_at: DateTime<Utc>,
    ) -> Result<Gig> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO gigs (id, promoter_id, title, venue, starts_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.to_string(),
                promoter_id.as_str(),
                title,
                venue,
                starts_at.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Gig {
            id,
            promoter_id: promoter_id.clone(),
            title: title.to_string(),
            venue: venue.to_string(),
            starts_at,
            created_at: now,
        })
    }

    pub fn count_gigs_for_promoter(&self, promoter_id: &UserId) -> Result<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM gigs WHERE promoter_id = ?1",
            params![promoter_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// List a promoter's gigs, soonest first.
    pub fn list_gigs_for_promoter(&self, promoter_id: &UserId) -> Result<Vec<Gig>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, promoter_id, title, venue, starts_at, created_at
             FROM gigs
             WHERE promoter_id = ?1
             ORDER BY starts_at ASC, rowid ASC",
        )?;

        let rows = stmt.query_map(params![promoter_id.as_str()], row_to_gig)?;

        let mut gigs = Vec::new();
        for row in rows {
            gigs.push(row?);
        }
        Ok(gigs)
    }
}

fn row_to_gig(row: &rusqlite::Row<'_>) -> rusqlite::Result<Gig> {
    let id_str: String = row.get(0)?;
    let promoter_id: String = row.get(1)?;
    let title: String = row.get(2)?;
    let venue: String = row.get(3)?;
    let starts_str: String = row.get(4)?;
    let created_str: String = row.get(5)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let starts_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&starts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Gig {
        id,
        promoter_id: UserId::new(promoter_id),
        title,
        venue,
        starts_at,
        created_at,
    })
}
