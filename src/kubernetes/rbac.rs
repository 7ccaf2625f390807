// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Role and RoleBinding reconciliation.
//!
//! Existing objects are never updated: a Role whose rules drifted from its `RoleSpec` is
//! left as it is.

use crate::error::Result;
use crate::kubernetes::reconcile::get_or_create;
use crate::types::{RoleBindingSpec, RoleSpec};
use k8s_openapi::api::rbac::v1::{Role, RoleBinding};
use kube::{Api, Client};
use tracing::instrument;

/// Ensure `spec.name` exists as a Role in `namespace`
#[instrument(skip(client, spec), fields(role = %spec.name))]
pub async fn reconcile_role(client: &Client, namespace: &str, spec: &RoleSpec) -> Result<()> {
    let roles: Api<Role> = Api::namespaced(client.clone(), namespace);
    let target = format!("{}/{}", namespace, spec.name);

    get_or_create(&roles, "Role", &target, &spec.name, || spec.to_role(namespace)).await?;
    Ok(())
}

/// Ensure the binding described by `spec` exists in `spec.namespace`
#[instrument(skip(client, spec), fields(namespace = %spec.namespace, binding = %spec.name))]
pub async fn reconcile_role_binding(client: &Client, spec: &RoleBindingSpec) -> Result<()> {
    let bindings: Api<RoleBinding> = Api::namespaced(client.clone(), &spec.namespace);
    let target = format!("{}/{}", spec.namespace, spec.name);

    get_or_create(&bindings, "RoleBinding", &target, &spec.name, || {
        spec.to_role_binding()
    })
    .await?;
    Ok(())
}
