// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::error::Result;
use crate::kubernetes::reconcile::get_or_create;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ObjectMeta, Api, Client};
use tracing::instrument;

/// Ensure a namespace exists in the cluster, create if it doesn't
#[instrument(skip(client))]
pub async fn reconcile_namespace(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    get_or_create(&namespaces, "Namespace", namespace, namespace, || Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    })
    .await?;

    Ok(())
}
