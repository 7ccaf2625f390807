// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-user credential document and its kubeconfig serialization.

use crate::constants::kubeconfig::{CLUSTER_NAME, FILE_SUFFIX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trust material for the API server. Inline data wins over a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateAuthority {
    /// Base64 encoded PEM bundle
    Data(String),
    File(String),
    None,
}

impl CertificateAuthority {
    pub fn resolve(data: Option<String>, file: Option<String>) -> Self {
        match (data, file) {
            (Some(data), _) if !data.is_empty() => CertificateAuthority::Data(data),
            (_, Some(file)) if !file.is_empty() => CertificateAuthority::File(file),
            _ => CertificateAuthority::None,
        }
    }
}

/// Everything a user needs to talk to the cluster as their service account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDocument {
    pub cluster_name: String,
    pub server_url: String,
    pub certificate_authority: CertificateAuthority,
    pub user_name: String,
    pub bearer_token: String,
    pub namespace: String,
}

impl CredentialDocument {
    /// Output file name: `<namespace>-<user>.kubeconfig.yaml`
    pub fn file_name(&self) -> String {
        file_name(&self.namespace, &self.user_name)
    }

    pub fn to_kubeconfig(&self) -> Kubeconfig {
        let (certificate_authority_data, certificate_authority) =
            match &self.certificate_authority {
                CertificateAuthority::Data(data) => (Some(data.clone()), None),
                CertificateAuthority::File(file) => (None, Some(file.clone())),
                CertificateAuthority::None => (None, None),
            };

        Kubeconfig {
            api_version: "v1".to_string(),
            kind: "Config".to_string(),
            preferences: BTreeMap::new(),
            clusters: vec![NamedCluster {
                name: self.cluster_name.clone(),
                cluster: ClusterEntry {
                    server: self.server_url.clone(),
                    certificate_authority,
                    certificate_authority_data,
                },
            }],
            contexts: vec![NamedContext {
                name: CLUSTER_NAME.to_string(),
                context: ContextEntry {
                    cluster: self.cluster_name.clone(),
                    user: self.user_name.clone(),
                    namespace: self.namespace.clone(),
                },
            }],
            users: vec![NamedUser {
                name: self.user_name.clone(),
                user: UserEntry {
                    token: self.bearer_token.clone(),
                },
            }],
            current_context: CLUSTER_NAME.to_string(),
        }
    }
}

pub fn file_name(namespace: &str, user: &str) -> String {
    format!("{}-{}{}", namespace, user, FILE_SUFFIX)
}

/// Kubeconfig structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Kubeconfig {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
    pub clusters: Vec<NamedCluster>,
    pub contexts: Vec<NamedContext>,
    pub users: Vec<NamedUser>,
    pub current_context: String,
}

impl Kubeconfig {
    pub fn user(&self, name: &str) -> Option<&UserEntry> {
        self.users.iter().find(|u| u.name == name).map(|u| &u.user)
    }

    pub fn context(&self, name: &str) -> Option<&ContextEntry> {
        self.contexts
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCluster {
    pub name: String,
    pub cluster: ClusterEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterEntry {
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedContext {
    pub name: String,
    pub context: ContextEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub cluster: String,
    pub user: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedUser {
    pub name: String,
    pub user: UserEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub token: String,
}
