// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-namespace provisioning workflow and its batch driver.

pub mod batch;
pub mod emitter;
pub mod orchestrator;

pub use batch::{provision_batch, provision_namespace};
pub use emitter::{CredentialEmitter, FileEmitter};
pub use orchestrator::{ProvisionedUser, Provisioner};
