//! # Land Registry Workflow
//!
//! `LandRegistry` implements every state-changing and point-read operation
//! of the registration workflow. Each method runs inside one ledger
//! transaction supplied by the caller: it resolves the caller, loads the
//! record, validates the transition, and stages its writes. Committing (and
//! resubmitting on an MVCC conflict) is the caller's concern.
//!
//! Authorization is checked before the record is loaded for the official
//! operations, so a wrong-organization caller gets `Unauthorized` whether
//! or not the parcel exists.

use tracing::{info, warn};

use landreg_core::{AssetId, DeedId, Nid, TxId};
use landreg_ledger::TransactionContext;

use crate::config::{CallerRole, Organization, WorkflowConfig};
use crate::deed::{issue_deed, Deed};
use crate::error::RegistryError;
use crate::land::{Land, LandStatus, Owner, ParcelDetails};
use crate::records;

/// An official's verdict on an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// `true` advances the application, `false` rejects it.
    pub accept: bool,
    /// Kept only on rejection; acceptance writes the configured note.
    pub comment: String,
    /// NID of the acting official, recorded as an authenticator.
    pub official: Nid,
}

impl Decision {
    pub fn accept(official: Nid) -> Self {
        Self {
            accept: true,
            comment: String::new(),
            official,
        }
    }

    pub fn reject(official: Nid, comment: impl Into<String>) -> Self {
        Self {
            accept: false,
            comment: comment.into(),
            official,
        }
    }
}

/// The registration workflow, parameterized by deployment configuration.
#[derive(Debug, Clone, Default)]
pub struct LandRegistry {
    config: WorkflowConfig,
}

impl LandRegistry {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Organization of the transaction's submitter.
    pub(crate) fn caller_organization<C: TransactionContext + ?Sized>(
        &self,
        ctx: &C,
    ) -> Result<Organization, RegistryError> {
        let msp_id = ctx.msp_id()?;
        Ok(self.config.organization_of(&msp_id))
    }

    /// Fail unless the caller is an official of `required`.
    fn require_official<C: TransactionContext + ?Sized>(
        &self,
        ctx: &C,
        role: CallerRole,
        required: Organization,
        operation: &str,
    ) -> Result<(), RegistryError> {
        let org = self.caller_organization(ctx)?;
        if role.is_citizen() || org != required {
            warn!(%org, ?role, operation, "authorization denied");
            return Err(RegistryError::Unauthorized(format!(
                "{operation} is limited to {required} officials, caller is {org} ({role:?})"
            )));
        }
        Ok(())
    }

    // ─── Applications ────────────────────────────────────────────────

    /// File a new application. Returns the enclosing transaction's id.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a land with the derived AssetID is on record.
    pub fn create_application<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        details: ParcelDetails,
        owner: Owner,
    ) -> Result<TxId, RegistryError> {
        let land = Land::new_application(details, owner);
        if records::land_exists(ctx, &land.asset_id)? {
            return Err(RegistryError::AlreadyExists(format!(
                "an application for {} is already on record",
                land.asset_id
            )));
        }
        records::store_land(ctx, &land)?;
        info!(asset_id = %land.asset_id, owner_nid = %land.owner_nid, "application created");
        Ok(ctx.tx_id().clone())
    }

    /// Replace an application's descriptive fields and send it back to
    /// `Pending`. Only the recorded owner may resubmit.
    pub fn resubmit_application<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &AssetId,
        owner_nid: Nid,
        details: ParcelDetails,
    ) -> Result<Land, RegistryError> {
        let mut land = records::require_land(ctx, id)?;
        if !land.is_owned_by(owner_nid) {
            warn!(asset_id = %id, %owner_nid, "resubmission by non-owner denied");
            return Err(RegistryError::Unauthorized(format!(
                "NID {owner_nid} does not own {id}"
            )));
        }
        let previous = land.status;
        land.resubmit(details);
        records::store_land(ctx, &land)?;
        info!(asset_id = %id, from = %previous, "application resubmitted");
        Ok(land)
    }

    // ─── Official review ─────────────────────────────────────────────

    /// Ministry review of a pending application.
    pub fn approve_application<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &AssetId,
        decision: Decision,
        role: CallerRole,
    ) -> Result<(), RegistryError> {
        self.require_official(ctx, role, Organization::MinistryOfLand, "approval")?;
        let mut land = records::require_land(ctx, id)?;
        land.approve(
            decision.accept,
            decision.comment,
            decision.official,
            &self.config.registration_note,
        )?;
        records::store_land(ctx, &land)?;
        info!(asset_id = %id, status = %land.status, official = %decision.official, "application reviewed by ministry");
        Ok(())
    }

    /// Revenue-office review of an approved application.
    ///
    /// A positive decision issues a deed unless the parcel already has one
    /// on record, so repeating the approve/register cycle never mints a
    /// second deed. A `DeedID` whose deed was deleted by a transfer is
    /// replaced.
    pub fn register_application<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &AssetId,
        decision: Decision,
        role: CallerRole,
    ) -> Result<(), RegistryError> {
        self.require_official(ctx, role, Organization::LandRevenueOffice, "registration")?;
        let mut land = records::require_land(ctx, id)?;
        land.register(
            decision.accept,
            decision.comment,
            decision.official,
            &self.config.registration_note,
        )?;
        if land.status == LandStatus::Registered
            && !records::deed_exists(ctx, &land.deed_id)?
        {
            land.deed_id = issue_deed(ctx, &land)?;
        }
        records::store_land(ctx, &land)?;
        info!(
            asset_id = %id,
            status = %land.status,
            deed_id = %land.deed_id,
            official = %decision.official,
            "application reviewed by revenue office"
        );
        Ok(())
    }

    /// Route a review to the stage the caller's organization owns.
    pub fn verify_application<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &AssetId,
        decision: Decision,
        role: CallerRole,
    ) -> Result<(), RegistryError> {
        match self.caller_organization(ctx)? {
            Organization::MinistryOfLand => self.approve_application(ctx, id, decision, role),
            Organization::LandRevenueOffice => self.register_application(ctx, id, decision, role),
            Organization::Unaffiliated => Err(RegistryError::Unauthorized(
                "verification is limited to ministry and revenue office officials".into(),
            )),
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────

    /// Read one application, subject to role visibility.
    ///
    /// Citizens see only their own parcels. Ministry officials see only
    /// pending applications and revenue-office officials only approved ones.
    /// Officials of any other organization are not restricted by status.
    /// Placeholder records (empty `PayTx`) are never visible.
    pub fn read_application<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &AssetId,
        caller_nid: Nid,
        role: CallerRole,
    ) -> Result<Land, RegistryError> {
        let land = records::require_land(ctx, id)?;
        if !land.is_submitted() {
            return Err(RegistryError::NotFound(format!("land {id}")));
        }
        let org = self.caller_organization(ctx)?;
        let visible = match role {
            CallerRole::Citizen => land.is_owned_by(caller_nid),
            CallerRole::Official => match org {
                Organization::MinistryOfLand => land.status == LandStatus::Pending,
                Organization::LandRevenueOffice => land.status == LandStatus::Approved,
                Organization::Unaffiliated => true,
            },
        };
        if !visible {
            return Err(RegistryError::Unauthorized(format!(
                "{org} ({role:?}) may not read {id} in status {}",
                land.status
            )));
        }
        Ok(land)
    }

    /// Read a deed whose parcel is currently registered.
    pub fn read_deed<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &DeedId,
    ) -> Result<Deed, RegistryError> {
        let deed = records::load_deed(ctx, id)?
            .ok_or_else(|| RegistryError::NotFound(format!("deed {id:?}")))?;
        let land = records::load_land(ctx, &deed.asset_id)?.ok_or_else(|| {
            RegistryError::NotFound(format!("land {} of deed {id}", deed.asset_id))
        })?;
        if land.status != LandStatus::Registered {
            return Err(RegistryError::NotFound(format!(
                "land {} is not registered",
                deed.asset_id
            )));
        }
        Ok(deed)
    }

    // ─── Transfer ────────────────────────────────────────────────────

    /// Transfer a parcel to a new owner.
    ///
    /// The current deed is deleted and the parcel returns to `Pending`.
    /// The record keeps its old `DeedID`, which no longer resolves.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `current_owner` is the recorded owner;
    /// `NotFound` if the parcel has no deed on record.
    pub fn transfer_ownership<C: TransactionContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &AssetId,
        current_owner: Nid,
        new_owner: Owner,
    ) -> Result<(), RegistryError> {
        let mut land = records::require_land(ctx, id)?;
        if !land.is_owned_by(current_owner) {
            warn!(asset_id = %id, owner = %land.owner_nid, requesting = %current_owner, "transfer by non-owner denied");
            return Err(RegistryError::Unauthorized(format!(
                "NID {current_owner} does not own {id}"
            )));
        }
        records::delete_deed(ctx, &land.deed_id)?;
        let new_nid = new_owner.nid;
        land.transfer_to(new_owner);
        records::store_land(ctx, &land)?;
        info!(asset_id = %id, from = %current_owner, to = %new_nid, "ownership transferred");
        Ok(())
    }
}
