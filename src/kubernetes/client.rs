// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation and connection details for generated kubeconfigs

use crate::config::Config;
use crate::constants::INCLUSTER_CA_FILE;
use crate::error::{ProvisionError, Result};
use crate::types::CertificateAuthority;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Where the API server lives and how to trust it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConnection {
    pub host: String,
    pub certificate_authority_data: Option<String>,
    pub certificate_authority_file: Option<String>,
}

impl ClusterConnection {
    pub fn certificate_authority(&self) -> CertificateAuthority {
        CertificateAuthority::resolve(
            self.certificate_authority_data.clone(),
            self.certificate_authority_file.clone(),
        )
    }
}

/// Where client credentials come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    InCluster,
}

/// Home directory as seen by kubectl on this platform
pub fn home_dir() -> Option<PathBuf> {
    let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());

    let home = if cfg!(windows) {
        windows_home(
            env::var("HOMEDRIVE").ok(),
            env::var("HOMEPATH").ok(),
            non_empty("USERPROFILE"),
        )
    } else {
        non_empty("HOME")
    };

    home.map(PathBuf::from)
}

/// `HOMEDRIVE` + `HOMEPATH` when either is set, else `USERPROFILE`
fn windows_home(
    drive: Option<String>,
    path: Option<String>,
    user_profile: Option<String>,
) -> Option<String> {
    let joined = format!(
        "{}{}",
        drive.unwrap_or_default(),
        path.unwrap_or_default()
    );
    if joined.is_empty() {
        user_profile
    } else {
        Some(joined)
    }
}

/// Pick the kubeconfig path: explicit flag, then `$KUBECONFIG`, then `<home>/.kube/config`.
pub fn kubeconfig_path(
    explicit: Option<&Path>,
    kubeconfig_env: Option<&str>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Some(path.to_path_buf());
    }
    if let Some(path) = kubeconfig_env.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    home.map(|h| h.join(".kube").join("config"))
}

/// Resolve the credential source; the default home path only counts when the file exists.
pub fn config_source(explicit: Option<&Path>) -> ConfigSource {
    let kubeconfig_env = env::var("KUBECONFIG").ok();
    let explicit_or_env = explicit.is_some_and(|p| !p.as_os_str().is_empty())
        || kubeconfig_env.as_deref().is_some_and(|v| !v.is_empty());
    let home = home_dir();

    match kubeconfig_path(explicit, kubeconfig_env.as_deref(), home.as_deref()) {
        Some(path) if explicit_or_env || path.exists() => ConfigSource::File(path),
        _ => ConfigSource::InCluster,
    }
}

/// Connection details of the context a kubeconfig would use
pub fn connection_from_kubeconfig(
    kubeconfig: &Kubeconfig,
    context: Option<&str>,
) -> Result<ClusterConnection> {
    let context_name = context
        .or(kubeconfig.current_context.as_deref())
        .ok_or_else(|| ProvisionError::KubeconfigError("no current context set".to_string()))?;

    let cluster_name = kubeconfig
        .contexts
        .iter()
        .find(|c| c.name == context_name)
        .and_then(|c| c.context.as_ref())
        .map(|c| c.cluster.clone())
        .ok_or_else(|| {
            ProvisionError::KubeconfigError(format!("context '{}' not found", context_name))
        })?;

    let cluster = kubeconfig
        .clusters
        .iter()
        .find(|c| c.name == cluster_name)
        .and_then(|c| c.cluster.as_ref())
        .ok_or_else(|| {
            ProvisionError::KubeconfigError(format!("cluster '{}' not found", cluster_name))
        })?;

    let Some(host) = cluster.server.clone() else {
        return Err(ProvisionError::KubeconfigError(format!(
            "cluster '{}' has no server",
            cluster_name
        )));
    };

    Ok(ClusterConnection {
        host,
        certificate_authority_data: cluster.certificate_authority_data.clone(),
        certificate_authority_file: cluster.certificate_authority.clone(),
    })
}

/// Create the control-plane client and capture the connection details handed to users
#[instrument(skip(config))]
pub async fn connect(config: &Config) -> Result<(Client, ClusterConnection)> {
    let (mut client_config, connection) = match config_source(config.kubeconfig.as_deref()) {
        ConfigSource::File(path) => {
            info!("Loading kubeconfig from {}", path.display());
            let kubeconfig = Kubeconfig::read_from(&path).map_err(|e| {
                ProvisionError::KubeconfigError(format!(
                    "the provided credentials {} could not be loaded: {}",
                    path.display(),
                    e
                ))
            })?;
            let connection = connection_from_kubeconfig(&kubeconfig, config.context.as_deref())?;

            let options = KubeConfigOptions {
                context: config.context.clone(),
                ..Default::default()
            };
            let client_config = KConfig::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| {
                    ProvisionError::KubeconfigError(format!("Failed to create config: {}", e))
                })?;
            (client_config, connection)
        }
        ConfigSource::InCluster => {
            info!("No kubeconfig found, using in-cluster configuration");
            let client_config = KConfig::incluster().map_err(|e| {
                ProvisionError::KubeconfigError(format!("Failed to load in-cluster config: {}", e))
            })?;
            let connection = ClusterConnection {
                host: client_config
                    .cluster_url
                    .to_string()
                    .trim_end_matches('/')
                    .to_string(),
                certificate_authority_data: None,
                certificate_authority_file: Some(INCLUSTER_CA_FILE.to_string()),
            };
            (client_config, connection)
        }
    };

    if let Some(namespace) = &config.namespace_override {
        debug!("Default namespace overridden to {}", namespace);
        client_config.default_namespace = namespace.clone();
    }

    let client = Client::try_from(client_config)
        .map_err(|e| ProvisionError::KubeconfigError(format!("Failed to create client: {}", e)))?;

    info!("Connected to Kubernetes cluster at {}", connection.host);
    Ok((client, connection))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
clusters:
- name: prod
  cluster:
    server: https://prod.example.com:6443
    certificate-authority-data: UFJPRA==
- name: staging
  cluster:
    server: https://staging.example.com:6443
    certificate-authority: /etc/staging/ca.crt
contexts:
- name: prod-admin
  context:
    cluster: prod
    user: admin
- name: staging-admin
  context:
    cluster: staging
    user: admin
current-context: prod-admin
users:
- name: admin
  user:
    token: abc
"#;

    fn kubeconfig() -> Kubeconfig {
        Kubeconfig::from_yaml(KUBECONFIG).unwrap()
    }

    #[test]
    fn test_connection_uses_current_context() {
        let connection = connection_from_kubeconfig(&kubeconfig(), None).unwrap();

        assert_eq!(connection.host, "https://prod.example.com:6443");
        assert_eq!(
            connection.certificate_authority(),
            CertificateAuthority::Data("UFJPRA==".to_string())
        );
    }

    #[test]
    fn test_connection_honours_context_override() {
        let connection =
            connection_from_kubeconfig(&kubeconfig(), Some("staging-admin")).unwrap();

        assert_eq!(connection.host, "https://staging.example.com:6443");
        assert_eq!(
            connection.certificate_authority(),
            CertificateAuthority::File("/etc/staging/ca.crt".to_string())
        );
    }

    #[test]
    fn test_unknown_context_is_an_error() {
        let err = connection_from_kubeconfig(&kubeconfig(), Some("nope")).unwrap_err();
        assert!(matches!(err, ProvisionError::KubeconfigError(_)));
    }

    #[test]
    fn test_windows_home_joins_drive_and_path() {
        let home = windows_home(
            Some("C:".to_string()),
            Some("\\Users\\alice".to_string()),
            Some("D:\\profile".to_string()),
        );
        assert_eq!(home.as_deref(), Some("C:\\Users\\alice"));
    }

    #[test]
    fn test_windows_home_uses_partial_drive_path() {
        let home = windows_home(None, Some("\\Users\\alice".to_string()), None);
        assert_eq!(home.as_deref(), Some("\\Users\\alice"));

        let home = windows_home(Some("C:".to_string()), Some(String::new()), None);
        assert_eq!(home.as_deref(), Some("C:"));
    }

    #[test]
    fn test_windows_home_falls_back_to_user_profile() {
        let home = windows_home(
            Some(String::new()),
            None,
            Some("C:\\Users\\alice".to_string()),
        );
        assert_eq!(home.as_deref(), Some("C:\\Users\\alice"));
        assert_eq!(windows_home(None, None, None), None);
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = kubeconfig_path(
            Some(Path::new("/tmp/explicit")),
            Some("/tmp/env"),
            Some(Path::new("/home/alice")),
        );
        assert_eq!(path, Some(PathBuf::from("/tmp/explicit")));
    }

    #[test]
    fn test_env_path_before_home() {
        let path = kubeconfig_path(None, Some("/tmp/env"), Some(Path::new("/home/alice")));
        assert_eq!(path, Some(PathBuf::from("/tmp/env")));
    }

    #[test]
    fn test_home_path_fallback() {
        let path = kubeconfig_path(None, Some(""), Some(Path::new("/home/alice")));
        assert_eq!(path, Some(PathBuf::from("/home/alice/.kube/config")));
        assert_eq!(kubeconfig_path(None, None, None), None);
    }

    #[test]
    fn test_explicit_source_is_used_even_if_missing() {
        let source = config_source(Some(Path::new("/does/not/exist/kubeconfig")));
        assert_eq!(
            source,
            ConfigSource::File(PathBuf::from("/does/not/exist/kubeconfig"))
        );
    }
}
