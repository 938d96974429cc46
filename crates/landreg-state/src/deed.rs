//! # Deeds
//!
//! A deed is an immutable snapshot of a registered parcel: its descriptive
//! fields, its owner at registration time, and the officials who acted on
//! it. Deeds are created only on registration and deleted, never edited,
//! when the parcel changes hands.

use serde::{Deserialize, Serialize};
use tracing::debug;

use landreg_core::{AssetId, DeedId, Nid};
use landreg_ledger::LedgerStub;

use crate::error::RegistryError;
use crate::land::Land;
use crate::records;

/// A land deed as stored on the ledger.
///
/// Also the shape of the certificate listing, where `deed_id` is whatever
/// the parcel's record carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Deed {
    #[serde(rename = "AssetID")]
    pub asset_id: AssetId,
    #[serde(rename = "Authenticators")]
    pub authenticators: Vec<Nid>,
    #[serde(rename = "DagNo")]
    pub dag_no: i64,
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
    #[serde(rename = "OwnerName")]
    pub owner_name: String,
    #[serde(rename = "OwnerNID")]
    pub owner_nid: Nid,
    #[serde(rename = "Upazila")]
    pub upazila: String,
}

impl Deed {
    /// Project `land` into deed shape under `deed_id`.
    pub fn snapshot_of(land: &Land, deed_id: DeedId) -> Self {
        Self {
            asset_id: land.asset_id.clone(),
            authenticators: land.authenticators.clone(),
            dag_no: land.dag_no,
            deed_id,
            district: land.district.clone(),
            division: land.division.clone(),
            khatian_no: land.khatian_no,
            mouza: land.mouza.clone(),
            owner_name: land.owner_name.clone(),
            owner_nid: land.owner_nid,
            upazila: land.upazila.clone(),
        }
    }
}

/// Persist a deed for `land` and return its id.
///
/// The id is the transaction's proposal time in seconds followed by the
/// AssetID. A second issuance for the same parcel within one second
/// collides and fails with `AlreadyExists`.
pub fn issue_deed<C: LedgerStub + ?Sized>(
    ctx: &mut C,
    land: &Land,
) -> Result<DeedId, RegistryError> {
    let deed_id = DeedId::issue(ctx.tx_timestamp(), &land.asset_id);
    if records::deed_exists(ctx, &deed_id)? {
        return Err(RegistryError::AlreadyExists(format!("deed {deed_id}")));
    }
    let deed = Deed::snapshot_of(land, deed_id.clone());
    records::store_deed(ctx, &deed)?;
    debug!(asset_id = %land.asset_id, deed_id = %deed_id, "deed issued");
    Ok(deed_id)
}
