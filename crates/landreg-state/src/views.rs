//! # Query Views
//!
//! Read-only projections over the land namespace. Every view is a full scan
//! applying the same visibility rules as the point reads in
//! [`registry`](crate::registry). Results come back in key order, but
//! callers should treat them as sets.

use serde::{Deserialize, Serialize};
use tracing::debug;

use landreg_core::{AssetId, Nid};
use landreg_ledger::TransactionContext;

use crate::config::{CallerRole, Organization};
use crate::deed::Deed;
use crate::error::RegistryError;
use crate::land::{Land, LandStatus};
use crate::records;
use crate::registry::LandRegistry;

/// Summary row of an application listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(rename = "AssetID")]
    pub asset_id: AssetId,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Status")]
    pub status: LandStatus,
    #[serde(rename = "Upazila")]
    pub upazila: String,
}

impl From<&Land> for Dashboard {
    fn from(land: &Land) -> Self {
        Self {
            asset_id: land.asset_id.clone(),
            district: land.district.clone(),
            status: land.status,
            upazila: land.upazila.clone(),
        }
    }
}

/// Per-status counts over a dashboard listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub pending: usize,
    pub approved: usize,
    pub registered: usize,
    pub rejected: usize,
}

impl StatusSummary {
    pub fn of(rows: &[Dashboard]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            match row.status {
                LandStatus::Pending => acc.pending += 1,
                LandStatus::Approved => acc.approved += 1,
                LandStatus::Registered => acc.registered += 1,
                LandStatus::Rejected => acc.rejected += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.pending + self.approved + self.registered + self.rejected
    }
}

impl LandRegistry {
    /// The caller's own submitted applications.
    pub fn get_all_user_applications<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        caller_nid: Nid,
    ) -> Result<Vec<Dashboard>, RegistryError> {
        let rows: Vec<Dashboard> = records::scan_lands(ctx)?
            .iter()
            .filter(|land| land.is_submitted() && land.is_owned_by(caller_nid))
            .map(Dashboard::from)
            .collect();
        debug!(%caller_nid, rows = rows.len(), "user applications listed");
        Ok(rows)
    }

    /// Applications awaiting the caller's organization.
    ///
    /// Ministry officials see pending applications and revenue-office
    /// officials approved ones. Officials of any other organization get an
    /// empty listing.
    ///
    /// `caller_nid` does not filter the rows; it is only logged.
    pub fn get_all_admin_applications<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        caller_nid: Nid,
        role: CallerRole,
    ) -> Result<Vec<Dashboard>, RegistryError> {
        if role.is_citizen() {
            return Err(RegistryError::Unauthorized(
                "citizens cannot list applications under review".into(),
            ));
        }
        let org = self.caller_organization(ctx)?;
        let awaiting = match org {
            Organization::MinistryOfLand => Some(LandStatus::Pending),
            Organization::LandRevenueOffice => Some(LandStatus::Approved),
            Organization::Unaffiliated => None,
        };
        let rows: Vec<Dashboard> = records::scan_lands(ctx)?
            .iter()
            .filter(|land| land.is_submitted() && Some(land.status) == awaiting)
            .map(Dashboard::from)
            .collect();
        debug!(%caller_nid, %org, rows = rows.len(), "admin applications listed");
        Ok(rows)
    }

    /// Deed-shaped projections of every parcel without a supporting
    /// document reference.
    pub fn get_all_certificates<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
    ) -> Result<Vec<Deed>, RegistryError> {
        let certs: Vec<Deed> = records::scan_lands(ctx)?
            .iter()
            .filter(|land| land.is_certificate_eligible())
            .map(|land| Deed::snapshot_of(land, land.deed_id.clone()))
            .collect();
        debug!(rows = certs.len(), "certificates listed");
        Ok(certs)
    }
}
