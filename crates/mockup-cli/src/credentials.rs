//! Local credential record.
//!
//! The record is a small JSON document `{ "server": ..., "token": ... }`.
//! Saving atomically replaces the whole file with an owner-only copy.
//! Logging out clears the token and keeps the server.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ClientError;

/// Server used when neither a flag nor a stored record names one.
pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Environment variable overriding the credential file location.
pub const CONFIG_ENV: &str = "MOCKUP_CONFIG";

/// Stored server URL and bearer token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Server the token was issued by.
    #[serde(default)]
    pub server: String,
    /// Bearer token; empty when logged out.
    #[serde(default)]
    pub token: String,
}

impl StoredCredential {
    /// Returns `true` if a non-empty token is stored.
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    /// Picks the server: explicit override, then stored, then default.
    pub fn resolve_server(&self, explicit: Option<&str>) -> String {
        explicit
            .filter(|server| !server.is_empty())
            .or_else(|| Some(self.server.as_str()).filter(|server| !server.is_empty()))
            .unwrap_or(DEFAULT_SERVER)
            .trim_end_matches('/')
            .to_string()
    }
}

/// File-backed credential record at an explicit location.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves the store location: explicit path, else the per-user
    /// config directory.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ClientError> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        let base = dirs::config_dir().ok_or_else(|| {
            ClientError::Credentials("cannot determine the user config directory".to_string())
        })?;
        Ok(Self::new(base.join("mockup").join("credentials.json")))
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record; a missing file is an empty record.
    pub fn load(&self) -> Result<StoredCredential, ClientError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Credentials(format!("cannot parse {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoredCredential::default()),
            Err(e) => Err(ClientError::Credentials(format!(
                "cannot read {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Rewrites the whole record.
    pub fn save(&self, credential: &StoredCredential) -> Result<(), ClientError> {
        let write = || -> io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_vec_pretty(credential)?;
            write_private(&self.path, &json)
        };
        write().map_err(|e| {
            ClientError::Credentials(format!("cannot write {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), "credential record saved");
        Ok(())
    }

    /// Clears the token, keeping the stored server.
    pub fn logout(&self) -> Result<StoredCredential, ClientError> {
        let mut credential = self.load()?;
        credential.token.clear();
        self.save(&credential)?;
        Ok(credential)
    }
}

/// Writes `contents` to a temporary file next to `path`, then renames it
/// over the record so a crash never leaves a truncated record behind.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file().set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}
