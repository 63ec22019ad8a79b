//! One run of the bot: gate, fetch, extract, save, announce.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::compose::{last_location_sentence, location_message};
use crate::db::LocationStore;
use crate::error::CmBotError;
use crate::extract::find_meeting_location;
use crate::gate::{check_for_early_exit, check_meeting_is_today};
use crate::mail::MailSource;
use crate::notify::{deliver, ChatService};
use crate::types::{Location, MeetingType};

/// Switches for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compose the message but don't post it or mark it sent
    pub dry_run: bool,
    /// Skip the already-sent and weekday checks
    pub force: bool,
}

/// What a run ended with.
#[derive(Debug)]
pub enum RunOutcome {
    /// The announcement went out and was marked sent
    Posted { message: String },
    /// The announcement was composed but not sent
    DryRun { message: String },
    /// Nothing was announced; `fallback` describes the last known location
    Skipped {
        reason: CmBotError,
        fallback: Option<String>,
    },
}

pub struct CmBot {
    store: Box<dyn LocationStore>,
    mail: Box<dyn MailSource>,
    services: Vec<Box<dyn ChatService>>,
}

impl CmBot {
    pub fn new(
        store: Box<dyn LocationStore>,
        mail: Box<dyn MailSource>,
        services: Vec<Box<dyn ChatService>>,
    ) -> Self {
        Self {
            store,
            mail,
            services,
        }
    }

    pub fn store(&self) -> &dyn LocationStore {
        self.store.as_ref()
    }

    /// Finds and saves today's location for `meeting_type`.
    ///
    /// Fails with a gate outcome before touching the mail source, or with an
    /// extraction error if the email doesn't describe a meeting today.
    pub fn find_location(
        &self,
        meeting_type: MeetingType,
        today: NaiveDate,
        force: bool,
    ) -> Result<Location, CmBotError> {
        let location = self.locate(meeting_type, today, force)?;
        self.store.upsert(meeting_type, &location)?;
        info!(meeting_type = %meeting_type, ?location, "Saved today's meeting location");
        Ok(location)
    }

    /// Gates the run and reads today's location from the latest email, without saving it.
    fn locate(
        &self,
        meeting_type: MeetingType,
        today: NaiveDate,
        force: bool,
    ) -> Result<Location, CmBotError> {
        if force {
            info!(meeting_type = %meeting_type, "Skipping early-exit checks");
        } else {
            check_for_early_exit(self.store(), meeting_type, today)?;
        }

        let message = self.mail.latest_message()?;
        let location = find_meeting_location(meeting_type, &message)?;

        if let Some(date) = location.date {
            check_meeting_is_today(meeting_type, date, today)?;
        }

        debug!(meeting_type = %meeting_type, ?location, "Found today's meeting location");
        Ok(location)
    }

    /// Runs the full find-and-announce cycle.
    ///
    /// Gate outcomes and extraction failures end in `RunOutcome::Skipped`;
    /// delivery and infrastructure errors are returned. A dry run leaves the
    /// store untouched. Otherwise the location is saved, and only marked sent
    /// after every chat service accepted the message.
    pub async fn run(
        &self,
        meeting_type: MeetingType,
        today: NaiveDate,
        options: RunOptions,
    ) -> Result<RunOutcome, CmBotError> {
        let location = match self.locate(meeting_type, today, options.force) {
            Ok(location) => location,
            Err(reason) if reason.is_skip() || reason.is_fallback() => {
                warn!(meeting_type = %meeting_type, reason = %reason, "No announcement today");
                let fallback = self.last_location_sentence(meeting_type)?;
                return Ok(RunOutcome::Skipped { reason, fallback });
            }
            Err(e) => return Err(e),
        };

        let message =
            location_message(meeting_type, &location).ok_or(CmBotError::LocationNotFound)?;

        if options.dry_run {
            return Ok(RunOutcome::DryRun { message });
        }

        self.store.upsert(meeting_type, &location)?;
        deliver(&self.services, &message).await?;
        self.store.mark_sent(meeting_type)?;

        Ok(RunOutcome::Posted { message })
    }

    /// Describes the last stored location of `meeting_type`, if any.
    pub fn last_location_sentence(
        &self,
        meeting_type: MeetingType,
    ) -> Result<Option<String>, CmBotError> {
        Ok(self
            .store
            .get(meeting_type)?
            .and_then(|location| last_location_sentence(&location)))
    }

    /// Re-arms every meeting type after a misfire.
    pub fn clear_sent(&self) -> Result<usize, CmBotError> {
        self.store.clear_sent_flags()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocationDbManager;
    use crate::mail::{Header, RawMessage};
    use async_trait::async_trait;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    const STUDENT_LEADER_EMAIL: &str =
        "Student Leaders Meeting: Monday, August 21st, 12-1p.m., Walb Union, Room G08.";

    struct FixedMail {
        message: RawMessage,
        reads: Rc<Cell<u32>>,
    }

    impl MailSource for FixedMail {
        fn latest_message(&self) -> Result<RawMessage, CmBotError> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.message.clone())
        }
    }

    struct Recorder {
        fail: bool,
        posted: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ChatService for Recorder {
        fn name(&self) -> &'static str {
            "Recorder"
        }

        async fn post(&self, message: &str) -> Result<(), CmBotError> {
            if self.fail {
                return Err(CmBotError::Delivery {
                    service: "Recorder".to_string(),
                    message: "status 502".to_string(),
                });
            }
            self.posted.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    struct Harness {
        bot: CmBot,
        reads: Rc<Cell<u32>>,
        posted: Arc<Mutex<Vec<String>>>,
    }

    fn harness(date: &str, body: &str, fail: bool) -> Harness {
        let reads = Rc::new(Cell::new(0));
        let posted = Arc::new(Mutex::new(Vec::new()));
        let mail = FixedMail {
            message: RawMessage {
                headers: vec![Header::new("Date", date)],
                text: body.to_string(),
            },
            reads: reads.clone(),
        };
        let recorder = Recorder {
            fail,
            posted: posted.clone(),
        };
        let services: Vec<Box<dyn ChatService>> = vec![Box::new(recorder)];
        let bot = CmBot::new(
            Box::new(LocationDbManager::in_memory().unwrap()),
            Box::new(mail),
            services,
        );
        Harness { bot, reads, posted }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_posts_and_marks_sent() {
        let h = harness("Mon, 21 Aug 2017", STUDENT_LEADER_EMAIL, false);
        let today = ymd(2017, 8, 21);

        let outcome = h
            .bot
            .run(MeetingType::StudentLeader, today, RunOptions::default())
            .await
            .unwrap();
        let message = match outcome {
            RunOutcome::Posted { message } => message,
            other => panic!("expected a post, got {other:?}"),
        };
        assert_eq!(message, "Today's Student Leader meeting will be held in Walb G08.");
        assert_eq!(*h.posted.lock().unwrap(), vec![message]);

        let stored = h.bot.store().get(MeetingType::StudentLeader).unwrap().unwrap();
        assert!(stored.sent);
        assert_eq!(stored.date, Some(today));

        // second run the same day is gated
        let outcome = h
            .bot
            .run(MeetingType::StudentLeader, today, RunOptions::default())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            RunOutcome::Skipped {
                reason: CmBotError::AlreadySent,
                ..
            }
        ));
        assert_eq!(h.reads.get(), 1);
    }

    #[tokio::test]
    async fn test_not_scheduled_day_falls_back() {
        let h = harness("Mon, 21 Aug 2017", STUDENT_LEADER_EMAIL, false);
        h.bot
            .store()
            .upsert(
                MeetingType::StudentLeader,
                &Location::found("LA", "159", ymd(2017, 8, 14)),
            )
            .unwrap();

        let tuesday = ymd(2017, 8, 22);
        let outcome = h
            .bot
            .run(MeetingType::StudentLeader, tuesday, RunOptions::default())
            .await
            .unwrap();

        match outcome {
            RunOutcome::Skipped { reason, fallback } => {
                assert!(matches!(reason, CmBotError::NotScheduledDay { .. }));
                assert_eq!(
                    fallback.as_deref(),
                    Some("The 8/14 meeting was held in LA 159")
                );
            }
            other => panic!("expected skip, got {other:?}"),
        }
        assert_eq!(h.reads.get(), 0);
        assert!(h.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_email_is_not_saved() {
        // last week's email read on the following Monday
        let h = harness("Mon, 14 Aug 2017", STUDENT_LEADER_EMAIL, false);
        let outcome = h
            .bot
            .run(MeetingType::StudentLeader, ymd(2017, 8, 21), RunOptions::default())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            RunOutcome::Skipped {
                reason: CmBotError::StaleMeetingDate { .. },
                fallback: None
            }
        ));
        assert_eq!(h.bot.store().get(MeetingType::StudentLeader).unwrap(), None);
    }

    #[tokio::test]
    async fn test_dry_run_leaves_store_untouched() {
        let h = harness("Mon, 21 Aug 2017", STUDENT_LEADER_EMAIL, false);
        let options = RunOptions {
            dry_run: true,
            force: false,
        };
        let outcome = h
            .bot
            .run(MeetingType::StudentLeader, ymd(2017, 8, 21), options)
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::DryRun { .. }));
        assert!(h.posted.lock().unwrap().is_empty());
        assert_eq!(h.bot.store().get(MeetingType::StudentLeader).unwrap(), None);
    }

    #[tokio::test]
    async fn test_forced_dry_run_keeps_sent_flag() {
        let h = harness("Mon, 21 Aug 2017", STUDENT_LEADER_EMAIL, false);
        let today = ymd(2017, 8, 21);
        h.bot
            .run(MeetingType::StudentLeader, today, RunOptions::default())
            .await
            .unwrap();

        let options = RunOptions {
            dry_run: true,
            force: true,
        };
        let outcome = h
            .bot
            .run(MeetingType::StudentLeader, today, options)
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::DryRun { .. }));
        let stored = h.bot.store().get(MeetingType::StudentLeader).unwrap().unwrap();
        assert!(stored.sent);

        // a plain run afterwards is still gated
        let outcome = h
            .bot
            .run(MeetingType::StudentLeader, today, RunOptions::default())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            RunOutcome::Skipped {
                reason: CmBotError::AlreadySent,
                ..
            }
        ));
        assert_eq!(h.posted.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_find_location_saves_unsent() {
        let h = harness("Mon, 21 Aug 2017", STUDENT_LEADER_EMAIL, false);
        let today = ymd(2017, 8, 21);
        let location = h
            .bot
            .find_location(MeetingType::StudentLeader, today, false)
            .unwrap();
        assert_eq!(location, Location::found("Walb", "G08", today));
        assert_eq!(
            h.bot.store().get(MeetingType::StudentLeader).unwrap(),
            Some(location)
        );
    }

    #[tokio::test]
    async fn test_delivery_failure_leaves_unsent() {
        let h = harness("Mon, 21 Aug 2017", STUDENT_LEADER_EMAIL, true);
        let result = h
            .bot
            .run(MeetingType::StudentLeader, ymd(2017, 8, 21), RunOptions::default())
            .await;
        assert!(matches!(result, Err(CmBotError::Delivery { .. })));
        let stored = h.bot.store().get(MeetingType::StudentLeader).unwrap().unwrap();
        assert!(!stored.sent);
    }

    #[tokio::test]
    async fn test_force_reannounces_same_day() {
        let h = harness("Mon, 21 Aug 2017", STUDENT_LEADER_EMAIL, false);
        let today = ymd(2017, 8, 21);
        h.bot
            .run(MeetingType::StudentLeader, today, RunOptions::default())
            .await
            .unwrap();

        let options = RunOptions {
            dry_run: false,
            force: true,
        };
        let outcome = h
            .bot
            .run(MeetingType::StudentLeader, today, options)
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Posted { .. }));
        assert_eq!(h.posted.lock().unwrap().len(), 2);
        assert_eq!(h.reads.get(), 2);
    }

    #[test]
    fn test_clear_sent() {
        let h = harness("Mon, 21 Aug 2017", STUDENT_LEADER_EMAIL, false);
        assert_eq!(h.bot.clear_sent().unwrap(), 0);
        h.bot
            .store()
            .upsert(
                MeetingType::Conversations,
                &Location::found("Walb", "222-226", ymd(2017, 8, 23)),
            )
            .unwrap();
        h.bot.store().mark_sent(MeetingType::Conversations).unwrap();
        assert_eq!(h.bot.clear_sent().unwrap(), 1);
        assert!(!h
            .bot
            .store()
            .get(MeetingType::Conversations)
            .unwrap()
            .unwrap()
            .sent);
    }
}
