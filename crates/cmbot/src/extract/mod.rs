//! Location extraction from the weekly ministry email
mod date;
mod location;
mod normalize;

pub use date::{correct_date, find_date};
pub use location::{correct_building_name, extract_conversations_room, extract_student_leader_room};
pub use normalize::normalize_email_text;

use tracing::debug;

use crate::error::CmBotError;
use crate::mail::RawMessage;
use crate::types::{Location, MeetingType};

/// Extracts the meeting location from an email and dates it on the meeting day.
///
/// The returned location is not yet checked against today's date.
pub fn find_meeting_location(
    meeting_type: MeetingType,
    message: &RawMessage,
) -> Result<Location, CmBotError> {
    let text = normalize_email_text(&message.text);

    let (building, room) = match meeting_type {
        MeetingType::StudentLeader => extract_student_leader_room(&text)?,
        MeetingType::Conversations => extract_conversations_room(&text)?,
    };

    let sent_on = find_date(&message.headers)?;
    let date = correct_date(sent_on, meeting_type.weekday());

    debug!(
        meeting_type = %meeting_type,
        building = %building,
        room = %room,
        sent_on = %sent_on,
        date = %date,
        "Extracted meeting location"
    );

    Ok(Location::found(building, room, date))
}
