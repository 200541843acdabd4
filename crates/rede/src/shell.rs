// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rede shell` command implementation.
//!
//! Simulates one conversation: lines typed as `<user>: <text>` are chat
//! messages, `/commands` stand in for buttons and voice presence. Events
//! from the bus are printed as the bot would post them.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rede_agent::shutdown::install_signal_handler;
use rede_agent::{
    Action, Command, ConfirmOutcome, MessageOutcome, PresenceEvent, QuickReply, ReminderReply,
    ReplyOutcome, SessionEngine, SessionHandle, SessionLoop, UnknownReply,
};
use rede_bus::{BusEnvelope, EventBus, RedeEvent};
use rede_config::RedeConfig;
use rede_core::{
    AvailabilityLevel, ConversationKey, LatenessTier, RedeError, SessionSnapshot, Status,
    SystemClock, TimelineFrame, UserId,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::collaborators::{LogArchive, LogRoles};
use crate::dispatch::MessagePools;

const DEFAULT_TIMELINE_STEP_MINS: i64 = 10;

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Say { user: UserId, text: String },
    Reply { user: UserId, reply: QuickReply },
    Reminder {
        user: UserId,
        addressee: UserId,
        reply: ReminderReply,
    },
    Join(UserId),
    Leave(UserId),
    /// Moving between two tracked venues.
    Switch(UserId),
    Confirm(UserId),
    Cancel(UserId),
    Show,
    Timeline(i64),
    Sweep,
    Delete,
    Help,
    Quit,
}

/// Parses one shell line.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('/') {
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        let reply_err = |e: UnknownReply| e.to_string();

        return match (name, args.as_slice()) {
            ("reply", [id, action]) => action
                .parse::<QuickReply>()
                .map(|reply| ShellCommand::Reply {
                    user: UserId::new(*id),
                    reply,
                })
                .map_err(reply_err),
            ("remind", [id, addressee, action]) => action
                .parse::<QuickReply>()
                .and_then(ReminderReply::try_from)
                .map(|reply| ShellCommand::Reminder {
                    user: UserId::new(*id),
                    addressee: UserId::new(*addressee),
                    reply,
                })
                .map_err(reply_err),
            ("join", [id]) => Ok(ShellCommand::Join(UserId::new(*id))),
            ("leave", [id]) => Ok(ShellCommand::Leave(UserId::new(*id))),
            ("switch", [id]) => Ok(ShellCommand::Switch(UserId::new(*id))),
            ("confirm", [id]) => Ok(ShellCommand::Confirm(UserId::new(*id))),
            ("cancel", [id]) => Ok(ShellCommand::Cancel(UserId::new(*id))),
            ("show", []) => Ok(ShellCommand::Show),
            ("timeline", []) => Ok(ShellCommand::Timeline(DEFAULT_TIMELINE_STEP_MINS)),
            ("timeline", [minutes]) => minutes
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0 && Duration::try_minutes(*m).is_some())
                .map(ShellCommand::Timeline)
                .ok_or_else(|| format!("timeline step must be a positive number of minutes, got `{minutes}`")),
            ("sweep", []) => Ok(ShellCommand::Sweep),
            ("delete", []) => Ok(ShellCommand::Delete),
            ("help", []) => Ok(ShellCommand::Help),
            ("quit" | "exit", []) => Ok(ShellCommand::Quit),
            _ => Err(format!("unknown command `/{rest}`, try /help")),
        };
    }

    let (id, text) = line
        .split_once(':')
        .ok_or_else(|| "expected `<user>: <message>` or a /command".to_string())?;
    let id = id.trim();
    if id.is_empty() || id.contains(char::is_whitespace) {
        return Err(format!("invalid user name `{id}`"));
    }
    Ok(ShellCommand::Say {
        user: UserId::new(id),
        text: text.trim().to_string(),
    })
}

/// Runs the `rede shell` interactive REPL.
pub async fn run_shell(config: RedeConfig, key: ConversationKey) -> Result<(), RedeError> {
    let offset = config.session.utc_offset().ok_or_else(|| {
        RedeError::Config("session.utc_offset_minutes out of range".to_string())
    })?;

    let bus = EventBus::new().shared();
    let events = bus.subscribe();
    let engine = SessionEngine::from_config(
        &config,
        Arc::new(LogArchive),
        Some(Arc::new(LogRoles)),
        Arc::new(SystemClock),
        bus,
    )?;

    // SIGTERM stops the loop too; /quit cancels the same token.
    let cancel = install_signal_handler();
    let (session_loop, handle) = SessionLoop::new(engine, config.session.sweep_interval());
    let loop_task = tokio::spawn(session_loop.run(cancel.clone()));
    let printer = tokio::spawn(print_events(
        events,
        MessagePools::from_config(&config.lateness),
        offset,
        cancel.clone(),
    ));

    let mut rl = DefaultEditor::new()
        .map_err(|e| RedeError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{} {}", config.agent.name.bold().green(), format!("({key})").dimmed());
    println!(
        "Type {} to post, {} for commands, {} to exit.\n",
        "alice: e in 20 mins?".cyan(),
        "/help".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", "rede".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match parse_line(trimmed) {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => {
                        if let Err(e) = execute(&handle, &key, offset, command).await {
                            eprintln!("{}: {e}", "error".red());
                        }
                    }
                    Err(message) => eprintln!("{}", message.yellow()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    cancel.cancel();
    let _ = printer.await;
    loop_task
        .await
        .map_err(|e| RedeError::Internal(format!("session loop task failed: {e}")))?;
    Ok(())
}

async fn execute(
    handle: &SessionHandle,
    key: &ConversationKey,
    offset: FixedOffset,
    command: ShellCommand,
) -> Result<(), RedeError> {
    match command {
        ShellCommand::Say { user, text } => {
            match handle.post_message(key.clone(), user.clone(), text).await? {
                MessageOutcome::NotTrigger => println!("{}", "(not a trigger)".dimmed()),
                MessageOutcome::Started { .. } => {}
                MessageOutcome::ReplaceRequested { .. } => println!(
                    "{}",
                    format!("confirm with /confirm {user} or drop it with /cancel {user}").dimmed()
                ),
            }
        }
        ShellCommand::Reply { user, reply } => {
            let outcome = handle
                .command(Command {
                    key: key.clone(),
                    participant: user,
                    action: Action::QuickReply(reply),
                })
                .await?;
            print_reply_outcome(&outcome);
        }
        ShellCommand::Reminder {
            user,
            addressee,
            reply,
        } => {
            let outcome = handle
                .command(Command {
                    key: key.clone(),
                    participant: user,
                    action: Action::Reminder { addressee, reply },
                })
                .await?;
            print_reply_outcome(&outcome);
        }
        ShellCommand::Join(user) => presence(handle, key, user, false, true).await?,
        ShellCommand::Leave(user) => presence(handle, key, user, true, false).await?,
        ShellCommand::Switch(user) => presence(handle, key, user, true, true).await?,
        ShellCommand::Confirm(user) => {
            if handle.confirm_replace(key.clone(), user).await? == ConfirmOutcome::NotRequester {
                println!("{}", "only the requester can confirm".yellow());
            }
        }
        ShellCommand::Cancel(user) => {
            if !handle.cancel_replace(key.clone(), user).await? {
                println!("{}", "nothing to cancel".dimmed());
            }
        }
        ShellCommand::Show => match handle.snapshot(key.clone()).await? {
            Some(snapshot) => print!("{}", render_snapshot(&snapshot, offset)),
            None => println!("{}", "no active session".dimmed()),
        },
        ShellCommand::Timeline(minutes) => match Duration::try_minutes(minutes) {
            Some(step) => match handle.timeline(key.clone(), step).await? {
                Some(frames) => print!("{}", render_timeline(&frames, offset)),
                None => println!("{}", "no active session".dimmed()),
            },
            None => println!("{}", "timeline step out of range".yellow()),
        },
        ShellCommand::Sweep => {
            if handle.sweep().await?.is_empty() {
                println!("{}", "(nothing to do)".dimmed());
            }
        }
        ShellCommand::Delete => handle.delete_session(key.clone()).await?,
        ShellCommand::Help => print_help(),
        ShellCommand::Quit => {}
    }
    Ok(())
}

async fn presence(
    handle: &SessionHandle,
    key: &ConversationKey,
    user: UserId,
    left: bool,
    joined: bool,
) -> Result<(), RedeError> {
    let changed = handle
        .presence(PresenceEvent {
            guild: key.guild.clone(),
            user,
            left,
            joined,
        })
        .await?;
    if changed == 0 {
        println!("{}", "(no session changed)".dimmed());
    }
    Ok(())
}

fn print_reply_outcome(outcome: &ReplyOutcome) {
    match outcome {
        ReplyOutcome::Accepted(_) => {}
        ReplyOutcome::Rejected => println!("{}", "rejected: participant is in voice".yellow()),
        ReplyOutcome::NoSession => println!("{}", "no active session".dimmed()),
        ReplyOutcome::NotAddressee => {
            println!("{}", "that reminder is for someone else".yellow())
        }
        ReplyOutcome::StaleReminder => println!("{}", "that reminder has expired".dimmed()),
    }
}

fn print_help() {
    println!(
        "\
  <user>: <text>                 post a chat message (e.g. `alice: e at 9?`)
  /reply <user> <reply>          available | agree | maybe | unavailable | +<mins> | @<hour>
  /remind <user> <for> <reply>   answer a lateness reminder: available | +5 | +15 | maybe | unavailable
  /join <user>  /leave <user>    enter or leave voice
  /switch <user>                 move between voice channels
  /confirm <user>  /cancel <user>
  /show  /timeline [mins]  /sweep  /delete  /quit"
    );
}

async fn print_events(
    mut events: broadcast::Receiver<BusEnvelope>,
    pools: MessagePools,
    offset: FixedOffset,
    cancel: CancellationToken,
) {
    let mut rng = StdRng::from_entropy();
    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(envelope) => {
                    if let Some(line) = describe(&envelope.event, &pools, offset, &mut rng) {
                        println!("{line}");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event printer lagged behind the bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = cancel.cancelled() => break,
        }
    }
}

/// The line the bot would post for `event`, if any.
pub fn describe(
    event: &RedeEvent,
    pools: &MessagePools,
    offset: FixedOffset,
    rng: &mut StdRng,
) -> Option<String> {
    let bot = "rede:".bold().blue();
    let line = match event {
        RedeEvent::SessionCreated {
            creator, status, ..
        } => format!("{bot} {creator} started a session: {}", format_status(status, offset)),
        RedeEvent::SessionReplaced {
            previous_creator,
            creator,
            status,
            ..
        } => format!(
            "{bot} {creator} replaced {previous_creator}'s session: {}",
            format_status(status, offset)
        ),
        RedeEvent::SessionExpired { .. } => format!("{bot} session expired"),
        RedeEvent::SessionDeleted { .. } => format!("{bot} session deleted"),
        RedeEvent::StatusChanged {
            participant,
            status,
            ..
        } => format!("{bot} {participant} is {}", format_status(status, offset)),
        RedeEvent::Lateness {
            participant,
            tier,
            pool,
            nudge,
            ..
        } => {
            let mention = format!("@{participant}");
            if *nudge {
                format!(
                    "{bot} {mention}, you said you'd be here by now. {}",
                    format!("/remind {participant} {participant} <available|+5|+15|maybe|unavailable>")
                        .dimmed()
                )
            } else {
                let message = pool
                    .and_then(|pool| pools.pick(pool, &mention, rng))
                    .unwrap_or_else(|| format!("{mention} is {}", tier_label(*tier)));
                format!("{bot} {}", message.red())
            }
        }
        RedeEvent::RoleChange { .. } => return None,
        RedeEvent::ReplaceRequested {
            requester,
            proposed,
            expires_at,
            ..
        } => format!(
            "{bot} {requester}, a session is already running. Replace it with {}? (expires {})",
            format_status(proposed, offset),
            format_time(*expires_at, offset)
        ),
        RedeEvent::ReplaceCancelled { requester, .. } => {
            format!("{bot} {requester} kept the current session")
        }
        RedeEvent::ConfirmationExpired { requester, .. } => {
            format!("{bot} {requester}'s replace request timed out")
        }
    };
    Some(line)
}

fn tier_label(tier: LatenessTier) -> &'static str {
    match tier {
        LatenessTier::NotLate => "on time",
        LatenessTier::SlightlyLate => "slightly late",
        LatenessTier::Late => "late",
        LatenessTier::VeryLate => "very late",
    }
}

fn format_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%H:%M").to_string()
}

/// A status as a short label, with the target time when there is one.
pub fn format_status(status: &Status, offset: FixedOffset) -> String {
    match status.time_available() {
        Some(at) => format!("{} ({})", status.level().label(), format_time(at, offset)),
        None => status.level().label().to_string(),
    }
}

fn render_snapshot(snapshot: &SessionSnapshot, offset: FixedOffset) -> String {
    let mut out = format!(
        "session by {} since {}",
        snapshot.creator,
        format_time(snapshot.created_at, offset)
    );
    if let Some(at) = snapshot.proposed_time {
        out.push_str(&format!(", proposed {}", format_time(at, offset)));
    }
    out.push('\n');
    for view in &snapshot.participants {
        let late = if view.late { " LATE" } else { "" };
        out.push_str(&format!(
            "  {:<16} {}{}\n",
            view.participant.as_str(),
            format_status(&view.status, offset),
            late
        ));
    }
    out
}

fn level_glyph(level: AvailabilityLevel) -> char {
    match level {
        AvailabilityLevel::Unknown => '?',
        AvailabilityLevel::Unavailable => 'x',
        AvailabilityLevel::Maybe => '~',
        AvailabilityLevel::AvailableLater => 'L',
        AvailabilityLevel::Available => 'A',
        AvailabilityLevel::Ready => 'R',
        AvailabilityLevel::Done => 'D',
    }
}

/// One row per frame, one column per participant. A trailing `!` marks a
/// participant past their target.
fn render_timeline(frames: &[TimelineFrame], offset: FixedOffset) -> String {
    let Some(first) = frames.first() else {
        return String::new();
    };
    let mut out = String::from("       ");
    for cell in &first.cells {
        out.push_str(&format!(" {:<8}", cell.participant.as_str()));
    }
    out.push('\n');
    for frame in frames {
        out.push_str(&format_time(frame.at, offset));
        out.push_str("  ");
        for cell in &frame.cells {
            let mark = format!("{}{}", level_glyph(cell.level), if cell.late { "!" } else { "" });
            out.push_str(&format!(" {mark:<8}"));
        }
        out.push('\n');
    }
    out
}
