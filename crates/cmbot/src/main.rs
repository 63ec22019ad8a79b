use anyhow::Context;
use chrono::Local;
use clap::Parser;
use cmbot::compose::NO_PREVIOUS_LOCATION;
use cmbot::db::{LocationDbManager, LocationStore};
use cmbot::mail::MaildirSource;
use cmbot::notify::{self, ChatService, SlackClient};
use cmbot::server::{self, RelayState};
use cmbot::{CmBot, Config, MeetingType, RunOptions, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Announces the CM meeting location on GroupMe and Slack
#[derive(Debug, Parser)]
#[command(name = "cmbot", version, about)]
struct Args {
    /// Get the location of the Student Leader meeting. Use with -l to show the last location.
    #[arg(short, long)]
    student_leader: bool,
    /// Get the location of the Conversations meeting. Use with -l to show the last location.
    #[arg(short, long)]
    conversations: bool,
    /// View the location of the last meeting. Used in conjunction with -s or -c
    #[arg(short, long)]
    last_location: bool,
    /// Do not send the message, just show what would be sent
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Clear the sent flag of every meeting
    #[arg(long)]
    clear_sent: bool,
    /// Look for the meeting even if today's message was already sent
    #[arg(short, long)]
    force: bool,
    /// Run the GroupMe to Slack relay server
    #[arg(long)]
    serve: bool,
    /// Path to the JSON config file
    #[arg(long, env = "CMBOT_CONFIG", default_value = "cmbot.json")]
    config: PathBuf,
}

impl Args {
    fn meeting_type(&self) -> Option<MeetingType> {
        if self.conversations {
            Some(MeetingType::Conversations)
        } else if self.student_leader {
            Some(MeetingType::StudentLeader)
        } else {
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    match do_main(&args).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "cmbot failed");
            ExitCode::FAILURE
        }
    }
}

/// Reads the config file. `--last-location` and `--clear-sent` only touch the
/// database, so they fall back to the defaults when the file doesn't exist.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let db_only = !args.serve && (args.last_location || args.clear_sent);
    if db_only && !args.config.exists() {
        info!(path = %args.config.display(), "No config file, using defaults");
        return Ok(Config::default());
    }
    Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))
}

async fn do_main(args: &Args) -> anyhow::Result<ExitCode> {
    let config = load_config(args)?;

    if args.serve {
        let client = notify::http_client()?;
        let slack = config.slack.as_ref().map(|slack| {
            Arc::new(SlackClient::new(client.clone(), &slack.webhook_url)) as Arc<dyn ChatService>
        });
        server::run_server(&config.server_addr(), Arc::new(RelayState { slack })).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let store = LocationDbManager::new(&config.database_path).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;

    if args.last_location {
        let meeting_type = args.meeting_type().unwrap_or(MeetingType::StudentLeader);
        let sentence = store
            .get(meeting_type)?
            .and_then(|location| cmbot::compose::last_location_sentence(&location));
        println!("{}", sentence.as_deref().unwrap_or(NO_PREVIOUS_LOCATION));
        return Ok(ExitCode::SUCCESS);
    }

    if args.clear_sent {
        let cleared = store.clear_sent_flags()?;
        info!(records = cleared, "Sent flags cleared");
        return Ok(ExitCode::SUCCESS);
    }

    let Some(meeting_type) = args.meeting_type() else {
        eprintln!("Please specify either --student-leader or --conversations");
        return Ok(ExitCode::FAILURE);
    };

    let client = notify::http_client()?;
    let mail = MaildirSource::new(&config.mail.maildir, &config.mail.subject_filter);
    let services = notify::services_from_config(&config, &client);
    let bot = CmBot::new(Box::new(store), Box::new(mail), services);

    let today = Local::now().date_naive();
    let options = RunOptions {
        dry_run: args.dry_run,
        force: args.force,
    };
    info!(meeting_type = %meeting_type, %today, dry_run = options.dry_run, "Looking for meeting location");

    match bot.run(meeting_type, today, options).await? {
        RunOutcome::Posted { message } => {
            info!(message = %message, "Announcement sent");
        }
        RunOutcome::DryRun { message } => {
            println!("{message}");
        }
        RunOutcome::Skipped { reason, fallback } => {
            println!("{reason}");
            if let Some(fallback) = fallback {
                println!("{fallback}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
