// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provisioning inputs, RBAC specs and the generated credential document.

pub mod kubeconfig;
pub mod rbac;
pub mod request;

pub use kubeconfig::{CertificateAuthority, CredentialDocument};
pub use rbac::{RoleBindingSpec, RoleSpec};
pub use request::{BatchRequest, ProvisioningRequest};
