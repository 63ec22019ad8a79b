//! Banner matchers that pull the building and room out of normalized email text.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::CmBotError;

// "Student Leaders Meeting: Monday, August 21st, 12-1p.m., Walb Union, Room G08."
static STUDENT_LEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?ix)
        student \s* leaders? \s* meeting:
        \s* monday,
        \s* \w+                           # month
        \s* \d\d? \w+                     # day and ordinal
        ,? \s*
        (?:\w+|\d+)                       # start time, "noon" or "12"
        \s* - \s*
        1(?::00)?                         # end time
        \s* p\.?m\.?,
        \s* (liberal\s*arts|l\.a\.|walb)  # building
        \s* \w*                           # "union" after walb
        \s* \w*,
        \s* room
        \s* ([g-]*\d{2,3})                # room, "G08", "G-21", "226"
        "#,
    )
    .unwrap()
});

// "CM "Conversations" Meeting: Wednesday, September 6th, 7-8:30p.m., IPFW's Walb Classic Ballroom"
static CONVERSATIONS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?ix)
        cm \s* ["“”]conversations["“”]
        \s* meeting:
        \s* wednesday ,?
        \s* \w+                           # month
        \s* \d\d? \w+?                    # day and ordinal
        ,? \s*
        7(?::00)? - 8:30
        \s* p.?m.?,?
        \s* (?:ipfw's\s*)?
        (walb) ,?
        .*?
        (222|ballroom)
        "#,
    )
    .unwrap()
});

/// Finds the Student Leader meeting banner and returns `(building, room)`.
pub fn extract_student_leader_room(text: &str) -> Result<(String, String), CmBotError> {
    let caps = STUDENT_LEADER_REGEX
        .captures(text)
        .ok_or(CmBotError::LocationNotFound)?;

    let building = correct_building_name(&caps[1]);
    let room = capitalize(&caps[2]);

    Ok((building, room))
}

/// Finds the Conversations meeting banner and returns `(building, room)`.
pub fn extract_conversations_room(text: &str) -> Result<(String, String), CmBotError> {
    let caps = CONVERSATIONS_REGEX
        .captures(text)
        .ok_or(CmBotError::LocationNotFound)?;

    let room = match caps[2].to_lowercase().as_str() {
        "ballroom" => "Classic Ballroom",
        "222" => "222-226",
        _ => return Err(CmBotError::LocationNotFound),
    };

    Ok((capitalize(&caps[1]), room.to_string()))
}

/// Maps the spellings of a building onto its short name.
pub fn correct_building_name(building: &str) -> String {
    let compact: String = building
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    match compact.as_str() {
        "liberalarts" | "l.a." => "LA".to_string(),
        _ => capitalize(building),
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
