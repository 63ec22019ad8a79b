//! Database types for stored meeting locations
use chrono::NaiveDate;

use crate::types::Location;

#[derive(Debug, Clone)]
pub struct DbLocation {
    pub meeting_type: String,
    pub building: Option<String>,
    pub room: Option<String>,
    pub meeting_date: Option<NaiveDate>,
    pub sent: bool,
}

impl From<DbLocation> for Location {
    fn from(row: DbLocation) -> Self {
        Location {
            building: row.building,
            room: row.room,
            date: row.meeting_date,
            sent: row.sent,
        }
    }
}
