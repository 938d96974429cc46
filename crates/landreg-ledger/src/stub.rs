//! # World-State Stub
//!
//! The capabilities a workflow operation consumes from the ledger platform.
//! Implementations own concurrency control; callers only ever "load,
//! validate, write" within one transaction and trust the platform to reject
//! conflicting commits.

use landreg_core::{Timestamp, TxId};

use crate::error::{IdentityError, LedgerError};

/// One entry returned by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Key-value access within the enclosing transaction.
///
/// Reads take `&mut self` because implementations record what was read for
/// commit-time validation.
pub trait LedgerStub {
    /// Committed value of `key`, or `None` if absent.
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Stage a write of `value` at `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Stage a deletion of `key`. Deleting an absent key is not an error at
    /// this layer.
    fn del_state(&mut self, key: &str) -> Result<(), LedgerError>;

    /// Committed entries with `start <= key < end`, in key order.
    ///
    /// An empty `end` is unbounded; two empty bounds scan the whole
    /// namespace.
    fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<Vec<KeyValue>, LedgerError>;

    /// Identifier of the enclosing transaction.
    fn tx_id(&self) -> &TxId;

    /// Timestamp fixed by the client when the transaction was proposed.
    /// Identical on every endorser, unlike the local clock.
    fn tx_timestamp(&self) -> Timestamp;
}

/// Resolves the organization of the transaction's submitter.
pub trait ClientIdentity {
    /// MSP id of the submitting organization.
    fn msp_id(&self) -> Result<String, IdentityError>;
}

/// Everything a workflow operation receives: world-state access plus the
/// caller's identity.
pub trait TransactionContext: LedgerStub + ClientIdentity {}

impl<T: LedgerStub + ClientIdentity + ?Sized> TransactionContext for T {}
