// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-writer session loop.
//!
//! The [`SessionLoop`] owns the [`SessionEngine`] and is the only task that
//! mutates sessions. Everything else talks to it through a cloneable
//! [`SessionHandle`]: commands arrive over an mpsc channel with a oneshot
//! for the reply, and the periodic sweep runs on the same task, so no two
//! mutations ever interleave.

use std::time::Duration;

use chrono::Duration as ChronoDuration;
use rede_core::{ConversationKey, RedeError, SessionSnapshot, TimelineFrame, UserId};
use rede_intent::StatusIntent;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::actions::{Command, PresenceEvent, ReplyOutcome};
use crate::engine::{ConfirmOutcome, MessageOutcome, SessionEngine};
use crate::registry::SweepReport;

const REQUEST_BUFFER: usize = 256;

type Reply<T> = oneshot::Sender<T>;

/// Requests accepted by the session loop.
enum Request {
    PostMessage {
        key: ConversationKey,
        sender: UserId,
        text: String,
        reply: Reply<MessageOutcome>,
    },
    Start {
        key: ConversationKey,
        creator: UserId,
        intent: StatusIntent,
        reply: Reply<MessageOutcome>,
    },
    ConfirmReplace {
        key: ConversationKey,
        who: UserId,
        reply: Reply<Result<ConfirmOutcome, RedeError>>,
    },
    CancelReplace {
        key: ConversationKey,
        who: UserId,
        reply: Reply<bool>,
    },
    Command {
        command: Command,
        reply: Reply<ReplyOutcome>,
    },
    Presence {
        event: PresenceEvent,
        reply: Reply<usize>,
    },
    Delete {
        key: ConversationKey,
        reply: Reply<Result<(), RedeError>>,
    },
    Sweep {
        reply: Reply<SweepReport>,
    },
    Snapshot {
        key: ConversationKey,
        reply: Reply<Option<SessionSnapshot>>,
    },
    Timeline {
        key: ConversationKey,
        step: ChronoDuration,
        reply: Reply<Option<Vec<TimelineFrame>>>,
    },
    AttachMessageRef {
        key: ConversationKey,
        reference: String,
        reply: Reply<Result<(), RedeError>>,
    },
    ActiveKeys {
        reply: Reply<Vec<ConversationKey>>,
    },
}

pub struct SessionLoop {
    engine: SessionEngine,
    requests: mpsc::Receiver<Request>,
    sweep_interval: Duration,
}

impl SessionLoop {
    /// Creates the loop and the handle used to reach it.
    pub fn new(engine: SessionEngine, sweep_interval: Duration) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(REQUEST_BUFFER);
        let session_loop = Self {
            engine,
            requests: rx,
            sweep_interval,
        };
        (session_loop, SessionHandle { tx })
    }

    /// Runs until `cancel` fires or every handle is dropped. Returns the
    /// engine so callers can inspect final state.
    pub async fn run(mut self, cancel: CancellationToken) -> SessionEngine {
        info!(
            sweep_interval_secs = self.sweep_interval.as_secs(),
            "session loop running"
        );

        let mut ticker = tokio::time::interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first sweep
        // happens one interval after start.
        ticker.tick().await;

        loop {
            tokio::select! {
                request = self.requests.recv() => {
                    match request {
                        Some(request) => self.handle(request).await,
                        None => {
                            debug!("all session handles dropped");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.engine.sweep().await;
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping session loop");
                    break;
                }
            }
        }

        info!(active = self.engine.registry().len(), "session loop stopped");
        self.engine
    }

    async fn handle(&mut self, request: Request) {
        // A dropped reply receiver means the caller gave up; the mutation
        // has already been committed either way.
        match request {
            Request::PostMessage {
                key,
                sender,
                text,
                reply,
            } => {
                let _ = reply.send(self.engine.post_message(key, sender, &text));
            }
            Request::Start {
                key,
                creator,
                intent,
                reply,
            } => {
                let _ = reply.send(self.engine.request_session(key, creator, intent));
            }
            Request::ConfirmReplace { key, who, reply } => {
                let _ = reply.send(self.engine.confirm_replace(key, who).await);
            }
            Request::CancelReplace { key, who, reply } => {
                let _ = reply.send(self.engine.cancel_replace(key, who));
            }
            Request::Command { command, reply } => {
                let _ = reply.send(self.engine.handle_command(command).await);
            }
            Request::Presence { event, reply } => {
                let _ = reply.send(self.engine.presence(event));
            }
            Request::Delete { key, reply } => {
                let _ = reply.send(self.engine.delete_session(key).await);
            }
            Request::Sweep { reply } => {
                let _ = reply.send(self.engine.sweep().await);
            }
            Request::Snapshot { key, reply } => {
                let _ = reply.send(self.engine.snapshot(&key));
            }
            Request::Timeline { key, step, reply } => {
                let _ = reply.send(self.engine.timeline(&key, step));
            }
            Request::AttachMessageRef {
                key,
                reference,
                reply,
            } => {
                let _ = reply.send(self.engine.attach_message_ref(&key, reference));
            }
            Request::ActiveKeys { reply } => {
                let _ = reply.send(self.engine.registry().keys().cloned().collect());
            }
        }
    }
}

/// Cloneable entry point to a running [`SessionLoop`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
}

impl SessionHandle {
    async fn call<T>(&self, build: impl FnOnce(Reply<T>) -> Request) -> Result<T, RedeError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| RedeError::LoopClosed)?;
        rx.await.map_err(|_| RedeError::LoopClosed)
    }

    pub async fn post_message(
        &self,
        key: ConversationKey,
        sender: UserId,
        text: impl Into<String>,
    ) -> Result<MessageOutcome, RedeError> {
        let text = text.into();
        self.call(|reply| Request::PostMessage {
            key,
            sender,
            text,
            reply,
        })
        .await
    }

    pub async fn start_session(
        &self,
        key: ConversationKey,
        creator: UserId,
        intent: StatusIntent,
    ) -> Result<MessageOutcome, RedeError> {
        self.call(|reply| Request::Start {
            key,
            creator,
            intent,
            reply,
        })
        .await
    }

    pub async fn confirm_replace(
        &self,
        key: ConversationKey,
        who: UserId,
    ) -> Result<ConfirmOutcome, RedeError> {
        self.call(|reply| Request::ConfirmReplace { key, who, reply })
            .await?
    }

    pub async fn cancel_replace(&self, key: ConversationKey, who: UserId) -> Result<bool, RedeError> {
        self.call(|reply| Request::CancelReplace { key, who, reply })
            .await
    }

    pub async fn command(&self, command: Command) -> Result<ReplyOutcome, RedeError> {
        self.call(|reply| Request::Command { command, reply }).await
    }

    pub async fn presence(&self, event: PresenceEvent) -> Result<usize, RedeError> {
        self.call(|reply| Request::Presence { event, reply }).await
    }

    pub async fn delete_session(&self, key: ConversationKey) -> Result<(), RedeError> {
        self.call(|reply| Request::Delete { key, reply }).await?
    }

    /// Runs a sweep now instead of waiting for the next tick.
    pub async fn sweep(&self) -> Result<SweepReport, RedeError> {
        self.call(|reply| Request::Sweep { reply }).await
    }

    pub async fn snapshot(&self, key: ConversationKey) -> Result<Option<SessionSnapshot>, RedeError> {
        self.call(|reply| Request::Snapshot { key, reply }).await
    }

    pub async fn timeline(
        &self,
        key: ConversationKey,
        step: ChronoDuration,
    ) -> Result<Option<Vec<TimelineFrame>>, RedeError> {
        self.call(|reply| Request::Timeline { key, step, reply })
            .await
    }

    pub async fn attach_message_ref(
        &self,
        key: ConversationKey,
        reference: impl Into<String>,
    ) -> Result<(), RedeError> {
        let reference = reference.into();
        self.call(|reply| Request::AttachMessageRef {
            key,
            reference,
            reply,
        })
        .await?
    }

    pub async fn active_keys(&self) -> Result<Vec<ConversationKey>, RedeError> {
        self.call(|reply| Request::ActiveKeys { reply }).await
    }
}
