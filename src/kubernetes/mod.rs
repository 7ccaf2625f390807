// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation and get-or-create reconciliation.

pub mod client;
pub mod namespaces;
pub mod rbac;
mod reconcile;
pub mod secrets;
pub mod service_accounts;

pub use client::{connect, ClusterConnection};
pub use namespaces::reconcile_namespace;
pub use rbac::{reconcile_role, reconcile_role_binding};
pub use secrets::{wait_for_token, ServiceAccountToken};
pub use service_accounts::{reconcile_service_account, token_secret_name};
