// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Persistence of generated credential documents

use crate::error::{ProvisionError, Result};
use crate::types::CredentialDocument;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Receives one finished credential document per provisioned user
pub trait CredentialEmitter {
    /// Persist `document` and return where it went
    fn emit(&mut self, document: &CredentialDocument) -> Result<PathBuf>;
}

/// Writes each document as kubeconfig YAML into a directory
#[derive(Debug, Clone)]
pub struct FileEmitter {
    dir: PathBuf,
}

impl FileEmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CredentialEmitter for FileEmitter {
    fn emit(&mut self, document: &CredentialDocument) -> Result<PathBuf> {
        let path = self.dir.join(document.file_name());
        let yaml = serde_yaml::to_string(&document.to_kubeconfig())?;

        fs::create_dir_all(&self.dir)
            .and_then(|_| write_private(&path, yaml.as_bytes()))
            .map_err(|source| ProvisionError::OutputError {
                path: path.clone(),
                source,
            })?;

        info!("Kubeconfig written to {}", path.display());
        Ok(path)
    }
}

/// Write `contents` to `path`, readable by the owner only; the file holds a bearer token
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        // mode() only applies on creation
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)
}
