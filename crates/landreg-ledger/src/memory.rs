//! # In-Memory Reference Ledger
//!
//! A versioned world state behind a `parking_lot::RwLock`, shared by cheap
//! clones. Every committed write stamps the key with the new ledger height;
//! a [`Transaction`] remembers the versions it observed and is rejected at
//! commit if any of them moved.
//!
//! The lock is held only for the duration of a single read or of the
//! validate-and-apply step of a commit. Workflow code never holds it.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use landreg_core::{sha256_hex, CanonicalBytes, Timestamp, TxId};

use crate::error::{IdentityError, LedgerError};
use crate::stub::{ClientIdentity, KeyValue, LedgerStub};

// -- World state --------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct VersionedValue {
    version: u64,
    value: Vec<u8>,
}

#[derive(Debug, Default)]
struct WorldState {
    height: u64,
    entries: BTreeMap<String, VersionedValue>,
}

impl WorldState {
    fn version_of(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|v| v.version)
    }

    fn scan(&self, start: &str, end: &str) -> Vec<(&String, &VersionedValue)> {
        if !end.is_empty() && start > end {
            return Vec::new();
        }
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        self.entries
            .range::<str, _>((Bound::Included(start), upper))
            .collect()
    }

    fn scan_versions(&self, start: &str, end: &str) -> Vec<(String, u64)> {
        self.scan(start, end)
            .into_iter()
            .map(|(k, v)| (k.clone(), v.version))
            .collect()
    }
}

/// Shared handle to an in-memory world state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<WorldState>>,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub tx_id: TxId,
    /// Ledger height after the commit. Unchanged for read-only transactions.
    pub height: u64,
    /// Number of keys written or deleted.
    pub writes: usize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a transaction stamped with the current time.
    pub fn begin<I: ClientIdentity>(&self, identity: I) -> Result<Transaction<I>, LedgerError> {
        self.begin_at(identity, Timestamp::now())
    }

    /// Open a transaction with an explicit proposal timestamp.
    ///
    /// The transaction id is the SHA-256 of the creator's MSP id, a random
    /// nonce and the timestamp.
    pub fn begin_at<I: ClientIdentity>(
        &self,
        identity: I,
        timestamp: Timestamp,
    ) -> Result<Transaction<I>, LedgerError> {
        let creator = identity.msp_id().unwrap_or_default();
        let seed = CanonicalBytes::new(&serde_json::json!({
            "creator": creator,
            "nonce": Uuid::new_v4().to_string(),
            "timestamp": timestamp.epoch_secs(),
        }))?;
        Ok(Transaction {
            ledger: self.clone(),
            identity,
            tx_id: TxId::new(sha256_hex(&seed)),
            timestamp,
            reads: BTreeMap::new(),
            range_reads: Vec::new(),
            writes: BTreeMap::new(),
        })
    }

    /// Run `f` inside a fresh transaction and commit its write-set.
    ///
    /// If `f` fails nothing is applied. An MVCC conflict at commit surfaces
    /// as `E::from(LedgerError)`; resubmission is up to the caller.
    pub fn submit<I, R, E, F>(&self, identity: I, f: F) -> Result<(R, CommitReceipt), E>
    where
        I: ClientIdentity,
        E: From<LedgerError>,
        F: FnOnce(&mut Transaction<I>) -> Result<R, E>,
    {
        let mut tx = self.begin(identity)?;
        let out = f(&mut tx)?;
        let receipt = tx.commit()?;
        Ok((out, receipt))
    }

    /// Run `f` inside a fresh transaction and discard it. Used for queries.
    pub fn evaluate<I, R, E, F>(&self, identity: I, f: F) -> Result<R, E>
    where
        I: ClientIdentity,
        E: From<LedgerError>,
        F: FnOnce(&mut Transaction<I>) -> Result<R, E>,
    {
        let mut tx = self.begin(identity)?;
        f(&mut tx)
    }

    /// Committed value at `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().entries.get(key).map(|v| v.value.clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.state.read().entries.contains_key(key)
    }

    /// Committed keys with the given prefix, in order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.state
            .read()
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of committed write transactions.
    pub fn height(&self) -> u64 {
        self.state.read().height
    }

    /// Export the committed world state.
    ///
    /// # Errors
    ///
    /// Values must be UTF-8; every record the workflow writes is JSON.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let state = self.state.read();
        let mut entries = BTreeMap::new();
        for (key, v) in &state.entries {
            let value = String::from_utf8(v.value.clone()).map_err(|e| {
                LedgerError::Snapshot(format!("value at {key:?} is not UTF-8: {e}"))
            })?;
            entries.insert(
                key.clone(),
                SnapshotEntry {
                    version: v.version,
                    value,
                },
            );
        }
        Ok(LedgerSnapshot {
            height: state.height,
            entries,
        })
    }

    /// Rebuild a ledger from an exported snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        let mut entries = BTreeMap::new();
        for (key, entry) in snapshot.entries {
            if key.is_empty() {
                return Err(LedgerError::Snapshot("snapshot contains an empty key".into()));
            }
            if entry.version > snapshot.height {
                return Err(LedgerError::Snapshot(format!(
                    "key {key:?} has version {} above ledger height {}",
                    entry.version, snapshot.height
                )));
            }
            entries.insert(
                key,
                VersionedValue {
                    version: entry.version,
                    value: entry.value.into_bytes(),
                },
            );
        }
        Ok(Self {
            state: Arc::new(RwLock::new(WorldState {
                height: snapshot.height,
                entries,
            })),
        })
    }
}

/// Serializable form of the world state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub height: u64,
    pub entries: BTreeMap<String, SnapshotEntry>,
}

/// One committed key in a [`LedgerSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub version: u64,
    pub value: String,
}

// -- Transactions -------------------------------------------------------------

#[derive(Debug, Clone)]
struct RangeRead {
    start: String,
    end: String,
    observed: Vec<(String, u64)>,
}

/// One unit of work against a [`MemoryLedger`].
///
/// Reads go to committed state and are recorded; writes are staged and
/// become visible only on [`commit`](Transaction::commit). Dropping a
/// transaction discards it.
#[derive(Debug)]
pub struct Transaction<I> {
    ledger: MemoryLedger,
    identity: I,
    tx_id: TxId,
    timestamp: Timestamp,
    reads: BTreeMap<String, Option<u64>>,
    range_reads: Vec<RangeRead>,
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl<I> Transaction<I> {
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Number of staged puts and deletes.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Validate the read-set against current state and apply the write-set.
    ///
    /// # Errors
    ///
    /// `ReadConflict` if a key read by this transaction was committed by
    /// someone else since; `PhantomRead` if a scanned range changed. In
    /// either case nothing is written.
    pub fn commit(self) -> Result<CommitReceipt, LedgerError> {
        let Transaction {
            ledger,
            tx_id,
            reads,
            range_reads,
            writes,
            ..
        } = self;

        let mut state = ledger.state.write();

        for (key, seen) in &reads {
            if state.version_of(key) != *seen {
                tracing::warn!(tx_id = %tx_id, key = %key, "MVCC read conflict, transaction rejected");
                return Err(LedgerError::ReadConflict {
                    tx_id: tx_id.to_string(),
                    key: key.clone(),
                });
            }
        }

        for range in &range_reads {
            if state.scan_versions(&range.start, &range.end) != range.observed {
                tracing::warn!(
                    tx_id = %tx_id,
                    start = %range.start,
                    end = %range.end,
                    "phantom read, transaction rejected"
                );
                return Err(LedgerError::PhantomRead {
                    tx_id: tx_id.to_string(),
                    start: range.start.clone(),
                    end: range.end.clone(),
                });
            }
        }

        let write_count = writes.len();
        if write_count > 0 {
            state.height += 1;
            let height = state.height;
            for (key, value) in writes {
                match value {
                    Some(value) => {
                        state
                            .entries
                            .insert(key, VersionedValue { version: height, value });
                    }
                    None => {
                        state.entries.remove(&key);
                    }
                }
            }
        }

        tracing::debug!(
            tx_id = %tx_id,
            height = state.height,
            reads = reads.len(),
            writes = write_count,
            "transaction committed"
        );

        Ok(CommitReceipt {
            tx_id,
            height: state.height,
            writes: write_count,
        })
    }
}

fn require_key(key: &str) -> Result<(), LedgerError> {
    if key.is_empty() {
        return Err(LedgerError::EmptyKey);
    }
    Ok(())
}

impl<I> LedgerStub for Transaction<I> {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        require_key(key)?;
        let (version, value) = {
            let state = self.ledger.state.read();
            match state.entries.get(key) {
                Some(v) => (Some(v.version), Some(v.value.clone())),
                None => (None, None),
            }
        };
        self.reads.entry(key.to_string()).or_insert(version);
        Ok(value)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        require_key(key)?;
        self.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        require_key(key)?;
        self.writes.insert(key.to_string(), None);
        Ok(())
    }

    fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<Vec<KeyValue>, LedgerError> {
        let (observed, results) = {
            let state = self.ledger.state.read();
            let hits = state.scan(start, end);
            let observed: Vec<(String, u64)> =
                hits.iter().map(|(k, v)| ((*k).clone(), v.version)).collect();
            let results: Vec<KeyValue> = hits
                .into_iter()
                .map(|(k, v)| KeyValue {
                    key: k.clone(),
                    value: v.value.clone(),
                })
                .collect();
            (observed, results)
        };
        self.range_reads.push(RangeRead {
            start: start.to_string(),
            end: end.to_string(),
            observed,
        });
        Ok(results)
    }

    fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl<I: ClientIdentity> ClientIdentity for Transaction<I> {
    fn msp_id(&self) -> Result<String, IdentityError> {
        self.identity.msp_id()
    }
}
