//! # Registry Identifiers
//!
//! Newtype wrappers for the identifiers that flow through the workflow.
//! A `DeedId` cannot be passed where an `AssetId` is expected, and an
//! approving official's `Nid` is not a bare integer.
//!
//! All of them serialize transparently, so stored records keep the flat
//! `"AssetID": "..."`, `"OwnerNID": 100` shape.

use serde::{Deserialize, Serialize};

use crate::temporal::Timestamp;

/// Deterministic parcel key; see [`derive_asset_key`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

/// Key of an issued deed: issuance second followed by the parcel's `AssetId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeedId(String);

/// National identity number of a citizen or an approving official.
///
/// Compared for equality only. Nothing in the workflow proves that the
/// caller asserting a `Nid` actually holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nid(pub i64);

/// Ledger transaction identifier, returned as the receipt of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

/// Derive a parcel's `AssetId` from its descriptive attributes.
///
/// Textual fields are lower-cased, then all six are concatenated without a
/// delimiter in the fixed order `dag_no, district, division, khatian_no,
/// mouza, upazila`. Two submissions describing the same parcel collide no
/// matter who submits them or how they capitalize place names.
pub fn derive_asset_key(
    dag_no: i64,
    district: &str,
    division: &str,
    khatian_no: i64,
    mouza: &str,
    upazila: &str,
) -> AssetId {
    AssetId(format!(
        "{dag_no}{}{}{khatian_no}{}{}",
        district.to_lowercase(),
        division.to_lowercase(),
        mouza.to_lowercase(),
        upazila.to_lowercase(),
    ))
}

impl AssetId {
    /// Wrap a key received from a caller. No validation: unknown keys
    /// simply fail to load.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DeedId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Compose the id of a deed issued at `issued_at` for `asset`.
    pub fn issue(issued_at: Timestamp, asset: &AssetId) -> Self {
        Self(format!("{}{}", issued_at.epoch_secs(), asset.as_str()))
    }

    /// The empty id carried by a parcel that has never been deeded.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TxId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for DeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for Nid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
