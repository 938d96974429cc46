//! # Ledger Errors

use thiserror::Error;

use landreg_core::CanonicalizationError;

/// Failure of a world-state operation or of transaction validation.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The backing store failed to serve a request.
    #[error("ledger backend error: {0}")]
    Backend(String),

    /// A key read by the transaction was changed by a concurrent commit.
    #[error("MVCC read conflict on key {key:?} in transaction {tx_id}")]
    ReadConflict {
        /// Transaction that lost the race.
        tx_id: String,
        /// Key whose version moved.
        key: String,
    },

    /// A range scanned by the transaction gained, lost, or changed keys.
    #[error("phantom read in range [{start:?}, {end:?}) in transaction {tx_id}")]
    PhantomRead {
        /// Transaction that lost the race.
        tx_id: String,
        /// Inclusive range start.
        start: String,
        /// Exclusive range end (empty means unbounded).
        end: String,
    },

    /// Keys must be non-empty.
    #[error("empty key is not a valid world-state key")]
    EmptyKey,

    /// A snapshot could not be imported or exported.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Transaction id derivation failed.
    #[error("transaction id derivation failed: {0}")]
    TxId(#[from] CanonicalizationError),
}

/// The caller's organization could not be resolved from its credential.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The credential carries no usable MSP id.
    #[error("failed to get client's MSP id: {0}")]
    Unresolvable(String),
}
