// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod archive;
pub mod clock;
pub mod roles;

pub use adapter::PluginAdapter;
pub use archive::SessionArchive;
pub use clock::{Clock, SystemClock};
pub use roles::RoleMembership;
