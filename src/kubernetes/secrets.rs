// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service account token retrieval.
//!
//! The control plane fills token secrets asynchronously after the service account shows up,
//! so the secret may be missing, or present without its token, for a while.

use crate::constants::kubeconfig::TOKEN_KEY;
use crate::error::{ProvisionError, Result};
use crate::retry::{retry, Attempt, Backoff};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use rand::Rng;
use tracing::{debug, info, instrument};

/// A service account whose bearer token has been read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountToken {
    pub service_account_name: String,
    pub secret_name: String,
    pub token: Vec<u8>,
}

impl ServiceAccountToken {
    pub fn bearer_token(&self, namespace: &str) -> Result<String> {
        String::from_utf8(self.token.clone()).map_err(|_| ProvisionError::InvalidToken {
            namespace: namespace.to_string(),
            secret: self.secret_name.clone(),
        })
    }
}

/// Read the token key of `namespace/secret_name` once
pub async fn fetch_token(client: &Client, namespace: &str, secret_name: &str) -> Result<Vec<u8>> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let secret = secrets.get(secret_name).await?;

    let Some(token) = secret.data.as_ref().and_then(|d| d.get(TOKEN_KEY)) else {
        debug!("Secret {}/{} has no token yet", namespace, secret_name);
        return Err(ProvisionError::MissingToken {
            namespace: namespace.to_string(),
            secret: secret_name.to_string(),
        });
    };

    Ok(token.0.clone())
}

/// Poll `namespace/secret_name` until its token is populated or `backoff` runs out.
///
/// Fetch failures, NotFound included, and a missing token key are all retried.
#[instrument(skip(client, backoff, rng))]
pub async fn wait_for_token<R: Rng>(
    client: &Client,
    namespace: &str,
    secret_name: &str,
    backoff: &Backoff,
    rng: &mut R,
) -> Result<Vec<u8>> {
    let token = retry(backoff, rng, "wait for token", move || async move {
        Attempt::from(fetch_token(client, namespace, secret_name).await)
    })
    .await
    .map_err(|e| {
        e.into_provision_error(
            "Waiting for token",
            format!("secret {}/{}", namespace, secret_name),
        )
    })?;

    info!("Token found in secret {}/{}", namespace, secret_name);
    Ok(token)
}
