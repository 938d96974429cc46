//! # Workflow Errors
//!
//! Every operation returns `Result<_, RegistryError>`. Nothing is retried
//! here: an MVCC conflict surfaces as `Store` and the caller resubmits.

use thiserror::Error;

use landreg_core::{AssetId, CanonicalizationError};
use landreg_ledger::{IdentityError, LedgerError};

use crate::land::LandStatus;

/// Typed failure of a registry operation.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Record absent, or hidden by a sentinel rule.
    #[error("not found: {0}")]
    NotFound(String),

    /// A record with the derived key is already on the ledger.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Caller organization, role tag, or asserted NID does not permit the
    /// operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The operation is not allowed from the parcel's current status.
    #[error("cannot {operation} application {asset_id} in status {status}")]
    InvalidState {
        /// Parcel the operation targeted.
        asset_id: AssetId,
        /// Status found on the ledger.
        status: LandStatus,
        /// Operation that was refused.
        operation: &'static str,
    },

    /// A stored record could not be decoded.
    #[error("malformed record at {key:?}: {source}")]
    Serialization {
        /// World-state key of the record.
        key: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for storage.
    #[error("record encoding failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The world-state stub failed, or the commit was rejected.
    #[error("ledger error: {0}")]
    Store(#[from] LedgerError),

    /// The caller's organization could not be resolved.
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
}

/// Error loading or validating a [`WorkflowConfig`](crate::config::WorkflowConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The YAML did not match the config schema.
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The config parsed but is inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}
