// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to reconcile {kind} {target}: {source}")]
    ReconcileError {
        kind: &'static str,
        target: String,
        #[source]
        source: kube::Error,
    },

    #[error("Unable to get secret name from service account {namespace}/{service_account}")]
    MissingSecretReference {
        namespace: String,
        service_account: String,
    },

    #[error("Unable to get token from secret {namespace}/{secret}")]
    MissingToken { namespace: String, secret: String },

    #[error("Token in secret {namespace}/{secret} is not valid UTF-8")]
    InvalidToken { namespace: String, secret: String },

    #[error("{step} for {resource} failed after {attempts} attempts: {source}")]
    ExhaustedRetries {
        step: &'static str,
        resource: String,
        attempts: u32,
        #[source]
        source: Box<ProvisionError>,
    },

    #[error("Failed to resolve cluster connection: {0}")]
    KubeconfigError(String),

    #[error("Unable to write the kubeconfig {}: {source}", path.display())]
    OutputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize kubeconfig: {0}")]
    SerializeError(#[from] serde_yaml::Error),

    #[error("Unable to write report: {0}")]
    ReportError(#[from] std::io::Error),

    #[error("Bad arguments: {0}")]
    BadArguments(String),

    #[error("Unable to create ns:{namespace} user:{user}: {source}")]
    BatchError {
        namespace: String,
        user: String,
        #[source]
        source: Box<ProvisionError>,
    },
}

impl ProvisionError {
    /// The Kubernetes API status code carried by this error, if any
    pub fn api_code(&self) -> Option<u16> {
        match self {
            ProvisionError::KubeError(kube::Error::Api(resp))
            | ProvisionError::ReconcileError {
                source: kube::Error::Api(resp),
                ..
            } => Some(resp.code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api_code() == Some(404)
    }

    /// Errors that retrying cannot fix: malformed or rejected objects and bad input.
    pub fn is_permanent(&self) -> bool {
        match self {
            ProvisionError::BadArguments(_) => true,
            _ => matches!(self.api_code(), Some(400) | Some(422)),
        }
    }
}

/// Check whether a raw client error is the API server's NotFound status
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
