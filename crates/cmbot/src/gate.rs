//! Decides whether today's run should look for a meeting at all.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::db::LocationStore;
use crate::error::CmBotError;
use crate::types::MeetingType;

/// True if today's meeting was already announced.
pub fn already_sent(
    store: &dyn LocationStore,
    meeting_type: MeetingType,
    today: NaiveDate,
) -> Result<bool, CmBotError> {
    Ok(store
        .get(meeting_type)?
        .is_some_and(|location| location.sent && location.is_on(today)))
}

/// True if `today` is the meeting's weekday.
pub fn is_scheduled_day(meeting_type: MeetingType, today: NaiveDate) -> bool {
    today.weekday() == meeting_type.weekday()
}

/// True if the resolved meeting date is today.
pub fn is_today(resolved: NaiveDate, today: NaiveDate) -> bool {
    resolved == today
}

/// Stops the run early if the message already went out or there is no meeting today.
pub fn check_for_early_exit(
    store: &dyn LocationStore,
    meeting_type: MeetingType,
    today: NaiveDate,
) -> Result<(), CmBotError> {
    if already_sent(store, meeting_type, today)? {
        return Err(CmBotError::AlreadySent);
    }
    if !is_scheduled_day(meeting_type, today) {
        return Err(CmBotError::NotScheduledDay { meeting_type });
    }
    debug!(meeting_type = %meeting_type, %today, "Gate open");
    Ok(())
}

/// Rejects a location resolved for a different day.
pub fn check_meeting_is_today(
    meeting_type: MeetingType,
    resolved: NaiveDate,
    today: NaiveDate,
) -> Result<(), CmBotError> {
    if is_today(resolved, today) {
        Ok(())
    } else {
        Err(CmBotError::StaleMeetingDate {
            meeting_type,
            resolved,
            today,
        })
    }
}
