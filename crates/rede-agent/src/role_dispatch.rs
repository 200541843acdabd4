// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered, fire-and-forget delivery of role membership changes.
//!
//! Changes are queued to a single background worker that applies them in
//! the order they were committed, so the last membership a user ends up
//! with matches their last accepted status. Queueing never blocks the
//! session writer; failures are logged by the worker.

use std::sync::Arc;

use rede_core::{GuildId, RoleMembership, UserId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug)]
struct RoleUpdate {
    guild: GuildId,
    user: UserId,
    member: bool,
}

pub struct RoleDispatcher {
    roles: Arc<dyn RoleMembership>,
    tx: Option<mpsc::UnboundedSender<RoleUpdate>>,
}

impl RoleDispatcher {
    pub fn new(roles: Arc<dyn RoleMembership>) -> Self {
        Self { roles, tx: None }
    }

    /// Queues one membership change.
    ///
    /// The worker is spawned on first use, on the caller's runtime, and
    /// respawned if it has gone away.
    pub fn dispatch(&mut self, guild: GuildId, user: UserId, member: bool) {
        let mut update = RoleUpdate {
            guild,
            user,
            member,
        };
        if let Some(tx) = &self.tx {
            match tx.send(update) {
                Ok(()) => return,
                Err(mpsc::error::SendError(returned)) => update = returned,
            }
        }

        let tx = self.spawn_worker();
        if let Err(mpsc::error::SendError(lost)) = tx.send(update) {
            warn!(guild = %lost.guild, user = %lost.user, "role worker unavailable, change dropped");
        }
        self.tx = Some(tx);
    }

    fn spawn_worker(&self) -> mpsc::UnboundedSender<RoleUpdate> {
        let (tx, mut rx) = mpsc::unbounded_channel::<RoleUpdate>();
        let roles = Arc::clone(&self.roles);
        tokio::spawn(async move {
            while let Some(RoleUpdate {
                guild,
                user,
                member,
            }) = rx.recv().await
            {
                match roles
                    .set_available_role_membership(&guild, &user, member)
                    .await
                {
                    Ok(()) => debug!(guild = %guild, user = %user, member, "role membership updated"),
                    Err(e) => {
                        warn!(guild = %guild, user = %user, member, error = %e, "role membership update failed")
                    }
                }
            }
            debug!("role worker stopped");
        });
        tx
    }
}
