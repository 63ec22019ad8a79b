//! Database module for the current location of each meeting

mod types;

pub use types::DbLocation;

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

use crate::error::CmBotError;
use crate::types::{Location, MeetingType};

const SCHEMA_SQL: &str = include_str!("../../sql/init_locations.sql");

/// Keeps one location record per meeting type.
pub trait LocationStore {
    /// Returns the stored location, or `None` if nothing was saved yet.
    fn get(&self, meeting_type: MeetingType) -> Result<Option<Location>, CmBotError>;

    /// Replaces or inserts the record for `meeting_type`.
    fn upsert(&self, meeting_type: MeetingType, location: &Location) -> Result<(), CmBotError>;

    /// Marks the stored record as announced. Fails if no record exists.
    fn mark_sent(&self, meeting_type: MeetingType) -> Result<(), CmBotError>;

    /// Re-arms every meeting type. Returns the number of records touched.
    fn clear_sent_flags(&self) -> Result<usize, CmBotError>;
}

pub struct LocationDbManager {
    db: Connection,
}

impl LocationDbManager {
    /// Opens (or creates) the database file and initializes the schema
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, CmBotError> {
        let conn = Connection::open(db_path.as_ref())?;
        Self::with_connection(conn)
    }

    /// Creates a throwaway database, used by tests and dry runs
    pub fn in_memory() -> Result<Self, CmBotError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, CmBotError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { db: conn })
    }

    /// Gets the raw row for a meeting type
    pub fn get_row(&self, meeting_type: MeetingType) -> Result<Option<DbLocation>, CmBotError> {
        let row = self
            .db
            .query_row(
                "SELECT meeting_type, building, room, meeting_date, sent
                 FROM locations
                 WHERE meeting_type = ?",
                [meeting_type.key()],
                |row| {
                    Ok(DbLocation {
                        meeting_type: row.get(0)?,
                        building: row.get(1)?,
                        room: row.get(2)?,
                        meeting_date: row.get(3)?,
                        sent: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

impl LocationStore for LocationDbManager {
    fn get(&self, meeting_type: MeetingType) -> Result<Option<Location>, CmBotError> {
        Ok(self.get_row(meeting_type)?.map(Location::from))
    }

    fn upsert(&self, meeting_type: MeetingType, location: &Location) -> Result<(), CmBotError> {
        self.db.execute(
            "INSERT INTO locations (meeting_type, building, room, meeting_date, sent, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
             ON CONFLICT(meeting_type) DO UPDATE SET
                building = excluded.building,
                room = excluded.room,
                meeting_date = excluded.meeting_date,
                sent = excluded.sent,
                updated_at = excluded.updated_at",
            (
                meeting_type.key(),
                &location.building,
                &location.room,
                location.date,
                location.sent,
            ),
        )?;
        debug!(meeting_type = %meeting_type, ?location, "Saved location");
        Ok(())
    }

    fn mark_sent(&self, meeting_type: MeetingType) -> Result<(), CmBotError> {
        let changed = self.db.execute(
            "UPDATE locations SET sent = 1, updated_at = datetime('now') WHERE meeting_type = ?",
            [meeting_type.key()],
        )?;
        if changed == 0 {
            return Err(CmBotError::NoRecord { meeting_type });
        }
        info!(meeting_type = %meeting_type, "Marked location as sent");
        Ok(())
    }

    fn clear_sent_flags(&self) -> Result<usize, CmBotError> {
        let changed = self
            .db
            .execute("UPDATE locations SET sent = 0, updated_at = datetime('now')", [])?;
        info!(records = changed, "Cleared sent flags");
        Ok(changed)
    }
}
