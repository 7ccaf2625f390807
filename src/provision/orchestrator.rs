// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Sequences reconciliation for one namespace and its users.
//!
//! Per run: proxy Role, then the namespace, then for each user in order the service
//! account, its token, the user Role, the user RoleBinding, the proxy RoleBinding and
//! finally the kubeconfig. The first failure stops the run; nothing already created is
//! rolled back.

use crate::config::Config;
use crate::constants::{kubeconfig::CLUSTER_NAME, proxy};
use crate::error::{ProvisionError, Result};
use crate::kubernetes::{
    reconcile_namespace, reconcile_role, reconcile_role_binding, reconcile_service_account,
    token_secret_name, wait_for_token, ClusterConnection, ServiceAccountToken,
};
use crate::provision::emitter::CredentialEmitter;
use crate::retry::{retry, Attempt, Backoff};
use crate::types::{CredentialDocument, ProvisioningRequest, RoleBindingSpec, RoleSpec};
use kube::Client;
use rand::Rng;
use std::path::PathBuf;
use tracing::{info, instrument};

/// A user whose kubeconfig was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedUser {
    pub namespace: String,
    pub user: String,
    pub path: PathBuf,
}

pub struct Provisioner<E, R> {
    client: Client,
    connection: ClusterConnection,
    emitter: E,
    rng: R,
    reconcile_backoff: Backoff,
    token_backoff: Backoff,
}

impl<E: CredentialEmitter, R: Rng> Provisioner<E, R> {
    pub fn new(
        client: Client,
        connection: ClusterConnection,
        config: &Config,
        emitter: E,
        rng: R,
    ) -> Self {
        Self {
            client,
            connection,
            emitter,
            rng,
            reconcile_backoff: config.reconcile_backoff,
            token_backoff: config.token_backoff,
        }
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Provision `request.namespace` and every user in it, in order
    #[instrument(skip(self, request), fields(namespace = %request.namespace))]
    pub async fn provision(
        &mut self,
        request: &ProvisioningRequest,
    ) -> Result<Vec<ProvisionedUser>> {
        let namespace = request.namespace.as_str();

        // Shared by every user; nothing else is attempted if it fails
        self.reconcile_role_with_retry(proxy::NAMESPACE, &RoleSpec::proxy())
            .await?;

        // TODO: route through the retry executor like the other steps
        reconcile_namespace(&self.client, namespace).await?;

        let mut provisioned = Vec::with_capacity(request.users.len());
        for user in &request.users {
            provisioned.push(self.provision_user(namespace, user).await?);
        }

        info!(
            "Namespace {} provisioned with {} users",
            namespace,
            provisioned.len()
        );
        Ok(provisioned)
    }

    #[instrument(skip(self))]
    async fn provision_user(&mut self, namespace: &str, user: &str) -> Result<ProvisionedUser> {
        let account = self.service_account_secret(namespace, user).await?;

        let token = wait_for_token(
            &self.client,
            namespace,
            &account.secret_name,
            &self.token_backoff,
            &mut self.rng,
        )
        .await?;
        let account = ServiceAccountToken { token, ..account };

        self.reconcile_role_with_retry(namespace, &RoleSpec::full_access(user))
            .await?;
        self.reconcile_binding_with_retry(&RoleBindingSpec::user(namespace, user))
            .await?;
        self.reconcile_binding_with_retry(&RoleBindingSpec::proxy(namespace, user))
            .await?;

        let document = CredentialDocument {
            cluster_name: CLUSTER_NAME.to_string(),
            server_url: self.connection.host.clone(),
            certificate_authority: self.connection.certificate_authority(),
            user_name: user.to_string(),
            bearer_token: account.bearer_token(namespace)?,
            namespace: namespace.to_string(),
        };
        let path = self.emitter.emit(&document)?;

        info!("User {} provisioned in namespace {}", user, namespace);
        Ok(ProvisionedUser {
            namespace: namespace.to_string(),
            user: user.to_string(),
            path,
        })
    }

    /// Reconcile the service account and read its token secret name.
    ///
    /// A service account without a secret reference yet is retried like any other
    /// transient failure.
    async fn service_account_secret(
        &mut self,
        namespace: &str,
        user: &str,
    ) -> Result<ServiceAccountToken> {
        let client = &self.client;

        let secret_name = retry(
            &self.reconcile_backoff,
            &mut self.rng,
            "reconcile service account",
            move || async move {
                let secret = reconcile_service_account(client, namespace, user)
                    .await
                    .and_then(|account| {
                        token_secret_name(&account).ok_or_else(|| {
                            ProvisionError::MissingSecretReference {
                                namespace: namespace.to_string(),
                                service_account: user.to_string(),
                            }
                        })
                    });
                Attempt::from(secret)
            },
        )
        .await
        .map_err(|e| {
            e.into_provision_error(
                "Reconciling service account",
                format!("{}/{}", namespace, user),
            )
        })?;

        Ok(ServiceAccountToken {
            service_account_name: user.to_string(),
            secret_name,
            token: Vec::new(),
        })
    }

    async fn reconcile_role_with_retry(
        &mut self,
        namespace: &str,
        spec: &RoleSpec,
    ) -> Result<()> {
        let client = &self.client;

        retry(
            &self.reconcile_backoff,
            &mut self.rng,
            "reconcile role",
            move || async move { Attempt::from(reconcile_role(client, namespace, spec).await) },
        )
        .await
        .map_err(|e| {
            e.into_provision_error("Reconciling role", format!("{}/{}", namespace, spec.name))
        })
    }

    async fn reconcile_binding_with_retry(&mut self, spec: &RoleBindingSpec) -> Result<()> {
        let client = &self.client;

        retry(
            &self.reconcile_backoff,
            &mut self.rng,
            "reconcile role binding",
            move || async move { Attempt::from(reconcile_role_binding(client, spec).await) },
        )
        .await
        .map_err(|e| {
            e.into_provision_error(
                "Reconciling role binding",
                format!("{}/{}", spec.namespace, spec.name),
            )
        })
    }
}
