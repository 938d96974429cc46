//! # Land Application Lifecycle
//!
//! A `Land` record is both the citizen's application and, once registered,
//! the parcel's entry in the registry.
//!
//! ## States
//!
//! ```text
//! Pending ──▶ Approved ──▶ Registered
//!    │           │
//!    └───────────┴──▶ Rejected
//! ```
//!
//! Resubmission and transfer of ownership force `Pending` from any state.
//!
//! The stored form is a flat JSON document with PascalCase field names in
//! the order `Land` declares them: alphabetical, ignoring case, so
//! `OwnerName` precedes `OwnerNID`. Keep new fields in that order.

use serde::{Deserialize, Serialize};

use landreg_core::{derive_asset_key, AssetId, DeedId, Nid};

use crate::error::RegistryError;

// ─── Status ──────────────────────────────────────────────────────────

/// Lifecycle status of a land application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandStatus {
    /// Submitted or resubmitted, awaiting the ministry.
    Pending,
    /// Approved by the ministry, awaiting the revenue office.
    Approved,
    /// Refused by either office.
    Rejected,
    /// Registered by the revenue office; a deed is on record.
    Registered,
}

impl std::fmt::Display for LandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Registered => "registered",
        };
        f.write_str(s)
    }
}

// ─── Inputs ──────────────────────────────────────────────────────────

/// Descriptive and supporting fields a citizen submits.
///
/// The first six fields determine the [`AssetId`]; `nec` and `pay_tx` are
/// the supporting-document and payment references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelDetails {
    pub dag_no: i64,
    pub district: String,
    pub division: String,
    pub khatian_no: i64,
    pub mouza: String,
    pub upazila: String,
    /// Supporting-document reference. Empty makes the parcel certificate
    /// listing eligible.
    pub nec: String,
    /// Proof-of-payment reference. Empty marks a placeholder record.
    pub pay_tx: String,
}

impl ParcelDetails {
    /// The key these details derive.
    pub fn asset_id(&self) -> AssetId {
        derive_asset_key(
            self.dag_no,
            &self.district,
            &self.division,
            self.khatian_no,
            &self.mouza,
            &self.upazila,
        )
    }
}

/// A claimed owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub nid: Nid,
}

impl Owner {
    pub fn new(name: impl Into<String>, nid: Nid) -> Self {
        Self {
            name: name.into(),
            nid,
        }
    }
}

// ─── Land ────────────────────────────────────────────────────────────

/// A land parcel application as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Land {
    #[serde(rename = "AssetID")]
    pub asset_id: AssetId,
    /// NIDs of officials who acted on the application, first action first.
    #[serde(rename = "Authenticators")]
    pub authenticators: Vec<Nid>,
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "DagNo")]
    pub dag_no: i64,
    /// Deed issued at registration. Survives a transfer even though the deed
    /// itself is deleted.
    #[serde(rename = "DeedID")]
    pub deed_id: DeedId,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Division")]
    pub division: String,
    #[serde(rename = "KhatianNo")]
    pub khatian_no: i64,
    #[serde(rename = "Mouza")]
    pub mouza: String,
    #[serde(rename = "NEC")]
    pub nec: String,
    #[serde(rename = "OwnerName")]
    pub owner_name: String,
    #[serde(rename = "OwnerNID")]
    pub owner_nid: Nid,
    #[serde(rename = "PayTx")]
    pub pay_tx: String,
    #[serde(rename = "Status")]
    pub status: LandStatus,
    #[serde(rename = "Upazila")]
    pub upazila: String,
}

impl Land {
    /// A fresh pending application keyed by the details' derived id.
    pub fn new_application(details: ParcelDetails, owner: Owner) -> Self {
        let asset_id = details.asset_id();
        Self {
            asset_id,
            authenticators: Vec::new(),
            comment: String::new(),
            dag_no: details.dag_no,
            deed_id: DeedId::empty(),
            district: details.district,
            division: details.division,
            khatian_no: details.khatian_no,
            mouza: details.mouza,
            nec: details.nec,
            owner_name: owner.name,
            owner_nid: owner.nid,
            pay_tx: details.pay_tx,
            status: LandStatus::Pending,
            upazila: details.upazila,
        }
    }

    /// Whether this is a real application rather than a placeholder.
    pub fn is_submitted(&self) -> bool {
        !self.pay_tx.is_empty()
    }

    /// Whether the parcel appears in the certificate listing.
    pub fn is_certificate_eligible(&self) -> bool {
        self.nec.is_empty()
    }

    pub fn is_owned_by(&self, nid: Nid) -> bool {
        self.owner_nid == nid
    }

    /// Overwrite the descriptive fields and return to `Pending`.
    ///
    /// The record keeps its key even if the new fields would derive a
    /// different one. Owner, deed and authenticators are untouched.
    pub fn resubmit(&mut self, details: ParcelDetails) {
        self.dag_no = details.dag_no;
        self.district = details.district;
        self.division = details.division;
        self.khatian_no = details.khatian_no;
        self.mouza = details.mouza;
        self.nec = details.nec;
        self.pay_tx = details.pay_tx;
        self.upazila = details.upazila;
        self.status = LandStatus::Pending;
    }

    /// Ministry decision (PENDING → APPROVED | REJECTED).
    ///
    /// On approval the comment is replaced by `note`; on rejection the
    /// official's comment is kept.
    pub fn approve(
        &mut self,
        accept: bool,
        comment: String,
        official: Nid,
        note: &str,
    ) -> Result<(), RegistryError> {
        self.require_state(LandStatus::Pending, "approve")?;
        self.decide(accept, LandStatus::Approved, comment, official, note);
        Ok(())
    }

    /// Revenue-office decision (APPROVED → REGISTERED | REJECTED).
    ///
    /// Deed issuance is the caller's responsibility.
    pub fn register(
        &mut self,
        accept: bool,
        comment: String,
        official: Nid,
        note: &str,
    ) -> Result<(), RegistryError> {
        self.require_state(LandStatus::Approved, "register")?;
        self.decide(accept, LandStatus::Registered, comment, official, note);
        Ok(())
    }

    /// Hand the parcel to a new owner and send it back through review.
    pub fn transfer_to(&mut self, owner: Owner) {
        self.owner_name = owner.name;
        self.owner_nid = owner.nid;
        self.status = LandStatus::Pending;
    }

    /// Append `nid` unless it is already present.
    pub fn record_authenticator(&mut self, nid: Nid) {
        if !self.authenticators.contains(&nid) {
            self.authenticators.push(nid);
        }
    }

    fn decide(
        &mut self,
        accept: bool,
        on_accept: LandStatus,
        comment: String,
        official: Nid,
        note: &str,
    ) {
        if accept {
            self.status = on_accept;
            self.comment = note.to_string();
        } else {
            self.status = LandStatus::Rejected;
            self.comment = comment;
        }
        self.record_authenticator(official);
    }

    fn require_state(
        &self,
        expected: LandStatus,
        operation: &'static str,
    ) -> Result<(), RegistryError> {
        if self.status != expected {
            return Err(RegistryError::InvalidState {
                asset_id: self.asset_id.clone(),
                status: self.status,
                operation,
            });
        }
        Ok(())
    }
}
