// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation message selection.
//!
//! The session engine only names a [`MessagePool`]; the messaging layer
//! picks one message uniformly at random and substitutes the mention.

use rand::Rng;
use rand::seq::SliceRandom;
use rede_config::LatenessConfig;
use rede_core::MessagePool;

/// Placeholder replaced with the participant mention.
pub const MENTION_PLACEHOLDER: &str = "{@}";

/// The configured escalation messages.
#[derive(Debug, Clone)]
pub struct MessagePools {
    shame: Vec<String>,
    super_shame: Vec<String>,
}

impl MessagePools {
    pub fn from_config(config: &LatenessConfig) -> Self {
        Self {
            shame: config.shame_messages.clone(),
            super_shame: config.super_shame_messages.clone(),
        }
    }

    fn pool(&self, pool: MessagePool) -> &[String] {
        match pool {
            MessagePool::Shame => &self.shame,
            MessagePool::SuperShame => &self.super_shame,
        }
    }

    /// Picks a message from `pool` with `mention` substituted. `None` only
    /// when the pool is empty.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        pool: MessagePool,
        mention: &str,
        rng: &mut R,
    ) -> Option<String> {
        self.pool(pool)
            .choose(rng)
            .map(|template| render(template, mention))
    }
}

/// Replaces every mention placeholder in `template`.
pub fn render(template: &str, mention: &str) -> String {
    template.replace(MENTION_PLACEHOLDER, mention)
}
