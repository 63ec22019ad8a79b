//! Turns locations into the sentences the bot posts or prints.

use chrono::{Datelike, NaiveDate};

use crate::types::{is_pizza_night, Location, MeetingType};

/// Printed by `--last-location` when nothing was ever saved.
pub const NO_PREVIOUS_LOCATION: &str = "Sorry, I couldn't find a previous location";

/// Builds the announcement for today's meeting.
///
/// Returns `None` if the location has no building or room.
pub fn location_message(meeting_type: MeetingType, location: &Location) -> Option<String> {
    let (building, room) = location.place()?;

    let message = match meeting_type {
        MeetingType::StudentLeader => {
            format!("Today's Student Leader meeting will be held in {building} {room}.")
        }
        MeetingType::Conversations => {
            let mut message = match room {
                "Classic Ballroom" => {
                    "Today's Conversations meeting will be held downstairs in the Walb Classic Ballroom."
                        .to_string()
                }
                "222-226" => {
                    "Today's Conversations meeting will be held upstairs in rooms 222-226.".to_string()
                }
                _ => format!("Today's Conversations meeting will be held in {building} {room}."),
            };
            if location.date.is_some_and(is_pizza_night) {
                message.push_str(" Pizza tonight!");
            }
            message
        }
    };

    Some(message)
}

/// Describes the last stored location, e.g. "The 8/21 meeting was held in Walb G08".
///
/// Returns `None` for a record without a date.
pub fn last_location_sentence(location: &Location) -> Option<String> {
    let date = location.date?;
    let sentence = match location.place() {
        Some((building, room)) => format!(
            "The {} meeting was held in {building} {room}",
            month_day(date)
        ),
        None => format!("There was no meeting on {}", month_day(date)),
    };
    Some(sentence)
}

fn month_day(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_student_leader_message() {
        let location = Location::found("Walb", "G08", ymd(2017, 8, 21));
        assert_eq!(
            location_message(MeetingType::StudentLeader, &location).unwrap(),
            "Today's Student Leader meeting will be held in Walb G08."
        );
    }

    #[test]
    fn test_conversations_messages() {
        let ballroom = Location::found("Walb", "Classic Ballroom", ymd(2017, 9, 13));
        assert_eq!(
            location_message(MeetingType::Conversations, &ballroom).unwrap(),
            "Today's Conversations meeting will be held downstairs in the Walb Classic Ballroom."
        );

        let upstairs = Location::found("Walb", "222-226", ymd(2017, 9, 20));
        assert_eq!(
            location_message(MeetingType::Conversations, &upstairs).unwrap(),
            "Today's Conversations meeting will be held upstairs in rooms 222-226."
        );
    }

    #[test]
    fn test_pizza_night_addendum() {
        let first_wednesday = Location::found("Walb", "Classic Ballroom", ymd(2017, 9, 6));
        let message = location_message(MeetingType::Conversations, &first_wednesday).unwrap();
        assert!(message.ends_with(" Pizza tonight!"));

        // student leader meetings never get pizza
        let monday = Location::found("Walb", "G08", ymd(2017, 9, 4));
        assert!(!location_message(MeetingType::StudentLeader, &monday)
            .unwrap()
            .contains("Pizza"));
    }

    #[test]
    fn test_no_message_without_place() {
        let location = Location::no_meeting(ymd(2017, 9, 6));
        assert_eq!(location_message(MeetingType::Conversations, &location), None);
    }

    #[test]
    fn test_last_location_sentence() {
        let held = Location::found("Walb", "222-226", ymd(2017, 8, 21));
        assert_eq!(
            last_location_sentence(&held).unwrap(),
            "The 8/21 meeting was held in Walb 222-226"
        );

        let cancelled = Location::no_meeting(ymd(2017, 8, 21));
        assert_eq!(
            last_location_sentence(&cancelled).unwrap(),
            "There was no meeting on 8/21"
        );

        assert_eq!(last_location_sentence(&Location::default()), None);
    }
}
