// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{ProvisionError, Result};

/// One namespace and the users to provision in it, in order.
///
/// Duplicate user names are kept and provisioned twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub namespace: String,
    pub users: Vec<String>,
}

impl ProvisioningRequest {
    pub fn new(namespace: impl Into<String>, users: Vec<String>) -> Result<Self> {
        let namespace = namespace.into();
        validate_name("namespace", &namespace)?;
        for user in &users {
            validate_subdomain("user", user)?;
        }
        Ok(Self { namespace, users })
    }
}

/// `count` namespaces named `<ns_prefix><i>`, each with a single user `<user_prefix><i>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub count: u32,
    pub namespace_prefix: String,
    pub user_prefix: String,
}

impl BatchRequest {
    /// Expand into one request per index, starting at 1
    pub fn requests(&self) -> Result<Vec<ProvisioningRequest>> {
        (1..=self.count)
            .map(|i| {
                ProvisioningRequest::new(
                    format!("{}{}", self.namespace_prefix, i),
                    vec![format!("{}{}", self.user_prefix, i)],
                )
            })
            .collect()
    }
}

/// Alphanumeric segment that may contain inner dashes
fn is_label_body(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !segment.starts_with('-')
        && !segment.ends_with('-')
}

/// Namespaces must be RFC 1123 labels.
pub fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.len() <= 63 && is_label_body(name) {
        Ok(())
    } else {
        Err(ProvisionError::BadArguments(format!(
            "invalid {} name '{}': must be a lowercase RFC 1123 label",
            what, name
        )))
    }
}

/// User names become service account, Role and RoleBinding names, which are DNS-1123
/// subdomains: dot-separated segments, at most 253 characters.
pub fn validate_subdomain(what: &str, name: &str) -> Result<()> {
    if name.len() <= 253 && name.split('.').all(is_label_body) {
        Ok(())
    } else {
        Err(ProvisionError::BadArguments(format!(
            "invalid {} name '{}': must be a lowercase RFC 1123 subdomain",
            what, name
        )))
    }
}
