//! Server-side ingest boundary.
//!
//! The gate authenticates an upload, asks the version registry for a fresh
//! version, extracts the archive and only then marks the version ready.
//! Identity and project bookkeeping stay behind the [`TokenVerifier`] and
//! [`VersionRegistry`] traits.

use thiserror::Error;
use tracing::warn;

use crate::ExtractionError;
use crate::VersionedStorage;
use crate::api::ErrorBody;
use crate::api::UploadReceipt;

/// Resolves a bearer token to the principal it belongs to.
pub trait TokenVerifier {
    /// Returns the principal for `token`, or `None` if it is not valid.
    fn verify(&self, token: &str) -> Option<String>;
}

/// Allocates versions and records which ones are ready to view.
pub trait VersionRegistry {
    /// Allocates a fresh version of the project named `name` for
    /// `principal`.
    ///
    /// # Errors
    ///
    /// Returns a message describing why no version could be allocated.
    fn allocate(&self, principal: &str, name: &str) -> Result<UploadReceipt, String>;

    /// Marks `version_id` as extracted and viewable.
    fn mark_ready(&self, version_id: &str);
}

/// Reasons an upload is refused.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Missing, malformed or unknown bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// The request is missing required fields.
    #[error("{0}")]
    BadRequest(String),

    /// The registry could not allocate a version.
    #[error("cannot allocate version: {0}")]
    Registry(String),

    /// The archive was rejected or could not be stored.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
}

impl IngestError {
    /// HTTP status code for this failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::BadRequest(_) => 400,
            Self::Registry(_) => 500,
            // Version ids come from the registry, not the client.
            Self::Extraction(ExtractionError::InvalidVersionId { .. }) => 500,
            Self::Extraction(err) if err.is_io() => 500,
            Self::Extraction(_) => 422,
        }
    }

    /// Structured body for this failure.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody::new(self.to_string())
    }
}

/// Authenticated entry point for uploads.
pub struct IngestGate<V, R> {
    storage: VersionedStorage,
    verifier: V,
    registry: R,
}

impl<V: TokenVerifier, R: VersionRegistry> IngestGate<V, R> {
    /// Creates a gate over `storage`.
    pub fn new(storage: VersionedStorage, verifier: V, registry: R) -> Self {
        Self {
            storage,
            verifier,
            registry,
        }
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &VersionedStorage {
        &self.storage
    }

    /// Returns the version registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Handles one upload.
    ///
    /// `authorization` is the raw `Authorization` header value.
    ///
    /// # Errors
    ///
    /// See [`IngestError`]. On extraction failure the version is never
    /// marked ready.
    pub fn ingest(
        &self,
        authorization: Option<&str>,
        name: &str,
        bytes: &[u8],
    ) -> Result<UploadReceipt, IngestError> {
        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(IngestError::Unauthorized)?;
        let principal = self
            .verifier
            .verify(token)
            .ok_or(IngestError::Unauthorized)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(IngestError::BadRequest("name is required".to_string()));
        }

        let receipt = self
            .registry
            .allocate(&principal, name)
            .map_err(IngestError::Registry)?;

        if let Err(err) = self.storage.extract(&receipt.version_id, bytes) {
            warn!(version = %receipt.version_id, error = %err, "extraction failed");
            return Err(err.into());
        }

        self.registry.mark_ready(&receipt.version_id);
        Ok(receipt)
    }
}
