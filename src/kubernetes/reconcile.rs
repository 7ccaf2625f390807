// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-leave-alone primitive shared by every object kind.

use crate::error::{is_not_found, ProvisionError, Result};
use kube::{api::PostParams, Api};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, info};

/// Fetch `name`; when the API answers NotFound, create it from `build`.
///
/// An existing object is returned untouched even if it differs from what `build` would
/// produce. Any other fetch or create failure is reported against `kind` and `target`.
pub(crate) async fn get_or_create<K, F>(
    api: &Api<K>,
    kind: &'static str,
    target: &str,
    name: &str,
    build: F,
) -> Result<K>
where
    K: Clone + DeserializeOwned + Serialize + Debug,
    F: FnOnce() -> K,
{
    let wrap = |source: kube::Error| ProvisionError::ReconcileError {
        kind,
        target: target.to_string(),
        source,
    };

    match api.get(name).await {
        Ok(existing) => {
            debug!("{} {} already exists", kind, target);
            Ok(existing)
        }
        Err(e) if is_not_found(&e) => {
            info!("Creating {} {}", kind, target);
            let created = api
                .create(&PostParams::default(), &build())
                .await
                .map_err(wrap)?;
            info!("{} {} created successfully", kind, target);
            Ok(created)
        }
        Err(e) => Err(wrap(e)),
    }
}
