//! # Credential Storage
//!
//! Writes issued credentials to disk:
//!
//! ```text
//! certificates/
//! └── <thing-name>/
//!     ├── certificate.pem.crt
//!     ├── public.pem.key
//!     └── private.pem.key
//! ```
//!
//! Paths are always joined explicitly; the process working directory is
//! never changed. Writes are not atomic: a failure part way leaves the
//! files written so far in place.

use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use shared::{
    constants::*,
    error::{ProvisionError, ProvisionResult},
    types::CredentialBundle,
};

/// Per-thing credential directories under a base path
#[derive(Debug, Clone)]
pub struct CredentialStore {
    /// Base directory, e.g. `certificates/`
    base_dir: PathBuf,
}

impl CredentialStore {
    /// Create a store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory that holds the credentials of `thing_name`
    pub fn thing_dir(&self, thing_name: &str) -> ProvisionResult<PathBuf> {
        let is_plain = !thing_name.is_empty()
            && thing_name != "."
            && thing_name != ".."
            && !thing_name.contains(['/', '\\']);
        if !is_plain {
            return Err(ProvisionError::InvalidRequest(format!(
                "'{}' is not usable as a directory name",
                thing_name
            )));
        }
        Ok(self.base_dir.join(thing_name))
    }

    /// Fail if a credential directory for `thing_name` already exists
    pub async fn ensure_available(&self, thing_name: &str) -> ProvisionResult<PathBuf> {
        let dir = self.thing_dir(thing_name)?;

        let exists = tokio::fs::try_exists(&dir)
            .await
            .map_err(|e| folder_error(thing_name, e))?;
        if exists {
            return Err(ProvisionError::CredentialDirExists { path: dir });
        }

        Ok(dir)
    }

    /// Create the credential directory for `thing_name`
    ///
    /// The base directory is created if needed; the thing directory itself
    /// must not exist yet.
    pub async fn create_thing_dir(&self, thing_name: &str) -> ProvisionResult<PathBuf> {
        let dir = self.thing_dir(thing_name)?;

        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| folder_error(thing_name, e))?;

        let mut builder = tokio::fs::DirBuilder::new();
        #[cfg(unix)]
        builder.mode(CREDENTIAL_DIR_MODE);

        match builder.create(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(ProvisionError::CredentialDirExists { path: dir });
            }
            Err(e) => return Err(folder_error(thing_name, e)),
        }

        debug!(path = ?dir, "Created credential directory");
        Ok(dir)
    }

    /// Write the certificate, public key, and private key into `dir`
    pub async fn write_credentials(
        &self,
        thing_name: &str,
        dir: &Path,
        bundle: &CredentialBundle,
    ) -> ProvisionResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(3);

        for (file_name, content) in bundle.files() {
            let path = dir.join(file_name);

            let mode = if file_name == PRIVATE_KEY_FILE {
                PRIVATE_KEY_FILE_MODE
            } else {
                CREDENTIAL_FILE_MODE
            };

            write_new_file(&path, content, mode)
                .await
                .map_err(|e| write_error(thing_name, &path, e))?;

            debug!(path = ?path, bytes = content.len(), "Wrote credential file");
            written.push(path);
        }

        info!(
            thing_name = %thing_name,
            path = ?dir,
            "Credentials written"
        );

        Ok(written)
    }
}

/// Create `path` (which must not exist) with `mode` and write `content`
async fn write_new_file(path: &Path, content: &str, mode: u32) -> io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await
}

fn folder_error(thing_name: &str, err: io::Error) -> ProvisionError {
    ProvisionError::CertificateFolder {
        thing_name: thing_name.to_string(),
        reason: format!("failed to create folder for thing {} certificate: {}", thing_name, err),
    }
}

fn write_error(thing_name: &str, path: &Path, err: io::Error) -> ProvisionError {
    ProvisionError::CertificateWrite {
        thing_name: thing_name.to_string(),
        reason: format!("{}: {}", path.display(), err),
    }
}
