// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command-line surface: `new-ns` for one namespace and `multi` for a numbered batch.

use crate::config::Config;
use crate::error::{ProvisionError, Result};
use crate::kubernetes::connect;
use crate::provision::{provision_batch, provision_namespace, FileEmitter, Provisioner};
use crate::types::{BatchRequest, ProvisioningRequest};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "k8snssetup")]
#[command(about = "Set up namespaces with per-user service accounts and kubeconfigs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a namespace and provision the given users in it
    #[command(name = "new-ns")]
    NewNamespace {
        /// Namespace to create or reuse
        namespace: String,
        /// User to provision (repeatable)
        #[arg(long = "user", short = 'u')]
        users: Vec<String>,
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    /// Create `<ns-prefix>1..=count`, each with user `<user-prefix><i>`
    Multi {
        count: u32,
        #[arg(long, default_value = "user")]
        user_prefix: String,
        #[arg(long, default_value = "project")]
        ns_prefix: String,
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Admin kubeconfig; defaults to $KUBECONFIG, ~/.kube/config, then in-cluster credentials
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,
    /// Directory for the generated kubeconfig files
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

enum Work {
    Single(ProvisioningRequest),
    Batch(BatchRequest),
}

impl Command {
    /// Validate every name the command would create before touching the cluster
    fn work(&self) -> Result<Work> {
        match self {
            Command::NewNamespace {
                namespace, users, ..
            } => Ok(Work::Single(ProvisioningRequest::new(
                namespace.clone(),
                users.clone(),
            )?)),
            Command::Multi {
                count,
                user_prefix,
                ns_prefix,
                ..
            } => {
                let batch = BatchRequest {
                    count: *count,
                    namespace_prefix: ns_prefix.clone(),
                    user_prefix: user_prefix.clone(),
                };
                batch.requests()?;
                Ok(Work::Batch(batch))
            }
        }
    }

    fn connection(&self) -> &ConnectionArgs {
        match self {
            Command::NewNamespace { connection, .. } | Command::Multi { connection, .. } => {
                connection
            }
        }
    }
}

/// Execute the parsed command, writing confirmation lines to `out`
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let work = cli.command.work()?;
    let args = cli.command.connection().clone();
    let config = Config::from_env(args.kubeconfig, args.output);

    let (client, connection) = connect(&config).await?;
    info!("Connected to Kubernetes API at {}", connection.host);

    let mut provisioner = Provisioner::new(
        client,
        connection,
        &config,
        FileEmitter::new(&config.output_dir),
        StdRng::from_os_rng(),
    );

    match work {
        Work::Single(request) => provision_namespace(&mut provisioner, &request, out).await,
        Work::Batch(batch) => provision_batch(&mut provisioner, &batch, out).await,
    }
}

/// Process exit status for a failed run; argument errors share clap's usage code
pub fn exit_code(err: &ProvisionError) -> u8 {
    match err {
        ProvisionError::BadArguments(_) => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_ns_with_repeated_users() {
        let cli = Cli::try_parse_from([
            "k8snssetup",
            "new-ns",
            "project1",
            "--user",
            "alice",
            "--user",
            "bob",
            "--output",
            "/tmp/out",
        ])
        .unwrap();

        match cli.command {
            Command::NewNamespace {
                namespace,
                users,
                connection,
            } => {
                assert_eq!(namespace, "project1");
                assert_eq!(users, vec!["alice", "bob"]);
                assert_eq!(connection.output, Some(PathBuf::from("/tmp/out")));
                assert_eq!(connection.kubeconfig, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_multi_defaults() {
        let cli = Cli::try_parse_from(["k8snssetup", "multi", "3"]).unwrap();

        match cli.command {
            Command::Multi {
                count,
                user_prefix,
                ns_prefix,
                ..
            } => {
                assert_eq!(count, 3);
                assert_eq!(user_prefix, "user");
                assert_eq!(ns_prefix, "project");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_count_is_a_usage_error() {
        let err = Cli::try_parse_from(["k8snssetup", "multi", "three"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_count_is_a_usage_error() {
        let err = Cli::try_parse_from(["k8snssetup", "multi"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_negative_count_is_a_usage_error() {
        let err = Cli::try_parse_from(["k8snssetup", "multi", "-1"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_namespace_is_a_usage_error() {
        let err = Cli::try_parse_from(["k8snssetup", "new-ns"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_invalid_name_fails_before_connecting() {
        // Would fall through to in-cluster resolution if validation did not stop it first
        let cli = Cli::try_parse_from([
            "k8snssetup",
            "new-ns",
            "project1",
            "--user",
            "Alice",
            "--kubeconfig",
            "/nonexistent/admin.yaml",
        ])
        .unwrap();
        let mut out = Vec::new();

        let err = run(cli, &mut out).await.unwrap_err();

        assert!(matches!(err, ProvisionError::BadArguments(_)));
        assert_eq!(exit_code(&err), 2);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_batch_prefix_fails_before_connecting() {
        let cli = Cli::try_parse_from([
            "k8snssetup",
            "multi",
            "2",
            "--ns-prefix",
            "team_",
            "--kubeconfig",
            "/nonexistent/admin.yaml",
        ])
        .unwrap();
        let mut out = Vec::new();

        let err = run(cli, &mut out).await.unwrap_err();

        assert!(matches!(err, ProvisionError::BadArguments(_)));
    }

    #[test]
    fn test_runtime_errors_exit_with_failure() {
        let err = ProvisionError::KubeconfigError("no current context".to_string());
        assert_eq!(exit_code(&err), 1);
    }
}
