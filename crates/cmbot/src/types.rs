//! Meeting and location types shared across the bot
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

/// The two recurring meetings the bot announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeetingType {
    StudentLeader,
    Conversations,
}

impl MeetingType {
    pub const ALL: [MeetingType; 2] = [MeetingType::StudentLeader, MeetingType::Conversations];

    /// The weekday the meeting is held on.
    pub fn weekday(self) -> Weekday {
        match self {
            MeetingType::StudentLeader => Weekday::Mon,
            MeetingType::Conversations => Weekday::Wed,
        }
    }

    /// Key used for the meeting's row in the location store.
    pub fn key(self) -> &'static str {
        match self {
            MeetingType::StudentLeader => "student_leader",
            MeetingType::Conversations => "conversations",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MeetingType::StudentLeader => "Student Leader",
            MeetingType::Conversations => "Conversations",
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MeetingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeetingType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| format!("unknown meeting type: {s}"))
    }
}

/// The current (or last) location of a meeting.
///
/// A record with a date but no building/room means the meeting did not happen
/// that day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub building: Option<String>,
    pub room: Option<String>,
    pub date: Option<NaiveDate>,
    pub sent: bool,
}

impl Location {
    /// A freshly found, not yet announced location.
    pub fn found(building: impl Into<String>, room: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            building: Some(building.into()),
            room: Some(room.into()),
            date: Some(date),
            sent: false,
        }
    }

    /// A dated record for a week without a meeting.
    pub fn no_meeting(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Building and room, if both are known.
    pub fn place(&self) -> Option<(&str, &str)> {
        match (&self.building, &self.room) {
            (Some(building), Some(room)) => Some((building, room)),
            _ => None,
        }
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == Some(day)
    }
}

/// The first Wednesday of the month is pizza night.
pub fn is_pizza_night(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Wed && date.day() <= 7
}
