//! # landreg-core: Foundational Types for the Land Registry
//!
//! Leaf crate of the workspace. Every other `landreg-*` crate depends on it;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identifiers.** `AssetId`, `DeedId`, `Nid`, and `TxId`
//!    are distinct types, so a deed key cannot be passed where a parcel key
//!    is expected.
//!
//! 2. **Fixed byte forms.** Records are written to the ledger as
//!    [`RecordBytes`]: compact JSON with fields in their declared order, so
//!    every client of the ledger stores the same bytes. Values that are
//!    hashed go through [`CanonicalBytes`] (RFC 8785), which ignores
//!    declaration order.
//!
//! 3. **Content-derived parcel keys.** [`derive_asset_key`] is a pure
//!    function of the parcel's descriptive attributes, so "is this parcel
//!    already under application" is a plain existence check.
//!
//! 4. **UTC-only timestamps** with seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `landreg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod record;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::sha256_hex;
pub use error::{CanonicalizationError, LandregError};
pub use identity::{derive_asset_key, AssetId, DeedId, Nid, TxId};
pub use record::RecordBytes;
pub use temporal::Timestamp;
