// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::retry::Backoff;
use std::env;
use std::path::PathBuf;

/// Run configuration built from command-line flags and environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Explicit kubeconfig; `None` falls back to `$KUBECONFIG`, `~/.kube/config`, in-cluster
    pub kubeconfig: Option<PathBuf>,
    /// Directory receiving the generated `<namespace>-<user>.kubeconfig.yaml` files
    pub output_dir: PathBuf,
    /// Context to use instead of the kubeconfig's current one
    pub context: Option<String>,
    pub namespace_override: Option<String>,
    pub reconcile_backoff: Backoff,
    pub token_backoff: Backoff,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            output_dir: PathBuf::from("."),
            context: None,
            namespace_override: None,
            reconcile_backoff: Backoff::reconcile(),
            token_backoff: Backoff::token(),
        }
    }
}

impl Config {
    /// Combine flag values with the kubectl plugin environment
    pub fn from_env(kubeconfig: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());

        Config {
            kubeconfig: kubeconfig.filter(|p| !p.as_os_str().is_empty()),
            output_dir: output_dir
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from(".")),
            context: non_empty("KUBECTL_PLUGINS_GLOBAL_FLAG_CONTEXT"),
            namespace_override: non_empty("KUBECTL_PLUGINS_GLOBAL_FLAG_NAMESPACE"),
            ..Default::default()
        }
    }
}
