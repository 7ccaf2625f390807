// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Single-namespace and batch entry points with their confirmation output.

use crate::error::{ProvisionError, Result};
use crate::provision::emitter::CredentialEmitter;
use crate::provision::orchestrator::{ProvisionedUser, Provisioner};
use crate::types::{BatchRequest, ProvisioningRequest};
use rand::Rng;
use std::io::Write;
use tracing::info;

const DONE: &str = "Done";

fn report_created<W: Write>(out: &mut W, user: &ProvisionedUser) -> Result<()> {
    writeln!(out, "- ns:{} and user:{} created", user.namespace, user.user)?;
    Ok(())
}

/// Provision one namespace and print one line per user followed by `Done`
pub async fn provision_namespace<E, R, W>(
    provisioner: &mut Provisioner<E, R>,
    request: &ProvisioningRequest,
    out: &mut W,
) -> Result<()>
where
    E: CredentialEmitter,
    R: Rng,
    W: Write,
{
    for user in provisioner.provision(request).await? {
        report_created(out, &user)?;
    }
    writeln!(out, "{}", DONE)?;
    Ok(())
}

/// Provision `<ns_prefix>1..=N`, stopping at the first namespace that fails.
///
/// Namespaces completed before the failure stay provisioned.
pub async fn provision_batch<E, R, W>(
    provisioner: &mut Provisioner<E, R>,
    batch: &BatchRequest,
    out: &mut W,
) -> Result<()>
where
    E: CredentialEmitter,
    R: Rng,
    W: Write,
{
    let requests = batch.requests()?;
    info!("Provisioning {} namespaces", requests.len());

    for request in &requests {
        let users = provisioner.provision(request).await.map_err(|e| {
            ProvisionError::BatchError {
                namespace: request.namespace.clone(),
                user: request.users.join(","),
                source: Box::new(e),
            }
        })?;
        for user in &users {
            report_created(out, user)?;
        }
    }

    writeln!(out, "{}", DONE)?;
    Ok(())
}
