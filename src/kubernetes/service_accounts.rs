// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::Result;
use crate::kubernetes::reconcile::get_or_create;
use k8s_openapi::api::core::v1::ServiceAccount;
use kube::{api::ObjectMeta, Api, Client};
use tracing::instrument;

/// Ensure the service account `namespace/name` exists and return it as the API sees it
#[instrument(skip(client))]
pub async fn reconcile_service_account(
    client: &Client,
    namespace: &str,
    name: &str,
) -> Result<ServiceAccount> {
    let accounts: Api<ServiceAccount> = Api::namespaced(client.clone(), namespace);
    let target = format!("{}/{}", namespace, name);

    get_or_create(&accounts, "ServiceAccount", &target, name, || ServiceAccount {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    })
    .await
}

/// Name of the token secret attached to a service account.
///
/// When several secrets are listed, the last one wins. An empty name counts as none.
pub fn token_secret_name(account: &ServiceAccount) -> Option<String> {
    account
        .secrets
        .as_ref()?
        .last()
        .and_then(|secret| secret.name.clone())
        .filter(|name| !name.is_empty())
}
