//! # landreg-ledger: Ledger Boundary
//!
//! The workflow runs as chaincode against a shared, versioned key-value
//! world state. This crate defines that boundary and nothing above it:
//!
//! - [`LedgerStub`]: `get`/`put`/`delete`/range scan over the world state,
//!   plus the enclosing transaction's id and timestamp.
//! - [`ClientIdentity`]: resolves the submitting organization (MSP id).
//! - [`TransactionContext`]: both of the above, the shape every workflow
//!   operation receives.
//!
//! ## Reference ledger
//!
//! [`MemoryLedger`] is an in-process world state used by tests and the
//! operator CLI. Each [`Transaction`] records a read-set, a range-read-set
//! and a write-set; [`Transaction::commit`] validates them optimistically
//! (a transaction commits only if nothing it read changed since) and
//! applies the writes atomically. Writes are not visible to reads within
//! the same transaction, matching the endorsement model of the platforms
//! this workflow targets.

pub mod error;
pub mod identity;
pub mod memory;
pub mod stub;

pub use error::{IdentityError, LedgerError};
pub use identity::StaticIdentity;
pub use memory::{CommitReceipt, LedgerSnapshot, MemoryLedger, SnapshotEntry, Transaction};
pub use stub::{ClientIdentity, KeyValue, LedgerStub, TransactionContext};
