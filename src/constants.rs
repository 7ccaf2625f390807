// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Shared proxy access granted to every provisioned user
pub mod proxy {
    /// Namespace holding the proxy Role and its bindings (dashboard lives here)
    pub const NAMESPACE: &str = "kube-system";
    pub const ROLE_NAME: &str = "proxyUser";
    pub const RESOURCE: &str = "services/proxy";
    /// Prefix of the per-user binding name: `svc-proxy-<namespace>-<user>`
    pub const BINDING_PREFIX: &str = "svc-proxy";
}

/// RBAC wildcards and reference values
pub mod rbac {
    pub const API_GROUP: &str = "rbac.authorization.k8s.io";
    pub const VERB_ALL: &str = "*";
    pub const API_GROUP_ALL: &str = "*";
    pub const RESOURCE_ALL: &str = "*";
    pub const ROLE_KIND: &str = "Role";
    pub const SERVICE_ACCOUNT_KIND: &str = "ServiceAccount";
}

/// Generated kubeconfig layout
pub mod kubeconfig {
    /// Name shared by the single cluster and context entries
    pub const CLUSTER_NAME: &str = "default";
    pub const FILE_SUFFIX: &str = ".kubeconfig.yaml";
    /// Key of the bearer token inside a service account token secret
    pub const TOKEN_KEY: &str = "token";
}

/// Retry budgets per call site
pub mod retry {
    pub const RECONCILE_ATTEMPTS: u32 = 3;
    pub const RECONCILE_INITIAL_DELAY_SECS: u64 = 1;
    pub const TOKEN_ATTEMPTS: u32 = 3;
    pub const TOKEN_INITIAL_DELAY_SECS: u64 = 2;
}

/// CA bundle mounted into pods when running in-cluster
pub const INCLUSTER_CA_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";
