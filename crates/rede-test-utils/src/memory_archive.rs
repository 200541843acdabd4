// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session archive for deterministic testing.
//!
//! `MemoryArchive` implements `SessionArchive` by cloning every archived
//! session into a list, and can be switched into a failing mode to
//! exercise the retry path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use rede_core::{AdapterType, HealthStatus, PluginAdapter, RedeError, Session, SessionArchive};

/// Failure returned while the archive is switched off.
#[derive(Debug)]
struct ArchiveUnavailable;

impl std::fmt::Display for ArchiveUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("memory archive is failing on purpose")
    }
}

impl std::error::Error for ArchiveUnavailable {}

/// An archive that keeps sessions in memory.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    archived: Arc<Mutex<Vec<Session>>>,
    failing: AtomicBool,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `archive` call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every session archived so far, in archive order.
    pub async fn archived(&self) -> Vec<Session> {
        self.archived.lock().await.clone()
    }

    pub async fn archived_count(&self) -> usize {
        self.archived.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MemoryArchive {
    fn name(&self) -> &str {
        "memory-archive"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Archive
    }

    async fn health_check(&self) -> Result<HealthStatus, RedeError> {
        if self.failing.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("failing on purpose".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), RedeError> {
        Ok(())
    }
}

#[async_trait]
impl SessionArchive for MemoryArchive {
    async fn archive(&self, session: &Session) -> Result<(), RedeError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RedeError::archive(ArchiveUnavailable));
        }
        self.archived.lock().await.push(session.clone());
        Ok(())
    }
}
