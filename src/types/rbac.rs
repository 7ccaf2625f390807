// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{proxy, rbac};
use k8s_openapi::api::rbac::v1::{PolicyRule, Role, RoleBinding, RoleRef, Subject};
use kube::api::ObjectMeta;

/// A single-rule Role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSpec {
    pub name: String,
    pub verbs: Vec<String>,
    pub api_groups: Vec<String>,
    pub resources: Vec<String>,
}

impl RoleSpec {
    /// Everything inside one namespace, named after the user
    pub fn full_access(name: &str) -> Self {
        Self {
            name: name.to_string(),
            verbs: vec![rbac::VERB_ALL.to_string()],
            api_groups: vec![rbac::API_GROUP_ALL.to_string()],
            resources: vec![rbac::RESOURCE_ALL.to_string()],
        }
    }

    /// Service proxy access, shared by all users in the system namespace
    pub fn proxy() -> Self {
        Self {
            name: proxy::ROLE_NAME.to_string(),
            verbs: vec![rbac::VERB_ALL.to_string()],
            api_groups: vec![rbac::API_GROUP_ALL.to_string()],
            resources: vec![proxy::RESOURCE.to_string()],
        }
    }

    pub fn to_role(&self, namespace: &str) -> Role {
        Role {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            rules: Some(vec![PolicyRule {
                verbs: self.verbs.clone(),
                api_groups: Some(self.api_groups.clone()),
                resources: Some(self.resources.clone()),
                ..Default::default()
            }]),
        }
    }
}

/// Grants a Role in `namespace` to a service account living in `subject_namespace`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBindingSpec {
    pub name: String,
    pub namespace: String,
    pub role_name: String,
    pub subject_service_account_name: String,
    pub subject_namespace: String,
}

impl RoleBindingSpec {
    /// Binds the user's own Role to the user's service account
    pub fn user(namespace: &str, user: &str) -> Self {
        Self {
            name: user.to_string(),
            namespace: namespace.to_string(),
            role_name: user.to_string(),
            subject_service_account_name: user.to_string(),
            subject_namespace: namespace.to_string(),
        }
    }

    /// Binds the shared proxy Role to the user's service account
    pub fn proxy(namespace: &str, user: &str) -> Self {
        Self {
            name: format!("{}-{}-{}", proxy::BINDING_PREFIX, namespace, user),
            namespace: proxy::NAMESPACE.to_string(),
            role_name: proxy::ROLE_NAME.to_string(),
            subject_service_account_name: user.to_string(),
            subject_namespace: namespace.to_string(),
        }
    }

    pub fn to_role_binding(&self) -> RoleBinding {
        RoleBinding {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                ..Default::default()
            },
            role_ref: RoleRef {
                api_group: rbac::API_GROUP.to_string(),
                kind: rbac::ROLE_KIND.to_string(),
                name: self.role_name.clone(),
            },
            subjects: Some(vec![Subject {
                kind: rbac::SERVICE_ACCOUNT_KIND.to_string(),
                name: self.subject_service_account_name.clone(),
                namespace: Some(self.subject_namespace.clone()),
                ..Default::default()
            }]),
        }
    }
}
