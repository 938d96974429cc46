//! # Workflow Subcommands
//!
//! One subcommand per registry operation. Each invocation loads the ledger
//! file, runs the operation in a single transaction as the organization
//! named by `--msp`, and, for state-changing commands, commits and writes
//! the ledger back.
//!
//! ```bash
//! landreg --msp Org3MSP create --dag-no 12 --district Dhaka --division Dhaka \
//!     --khatian-no 7 --mouza X --upazila Y --nec doc1 --pay-tx tx1 \
//!     --owner-name A --owner-nid 100
//! landreg --msp Org1MSP approve --id 12dhakadhaka7xy --official-nid 900 --role mol
//! landreg --msp Org2MSP register --id 12dhakadhaka7xy --official-nid 800 --role lro
//! landreg applications --nid 100 --role user
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use landreg_core::{derive_asset_key, AssetId, DeedId, Nid};
use landreg_ledger::{MemoryLedger, StaticIdentity, Transaction};
use landreg_state::{
    CallerRole, Dashboard, Decision, LandRegistry, Owner, ParcelDetails, RegistryError,
    StatusSummary, WorkflowConfig,
};

use crate::ledger_file::{load_ledger, save_ledger};

// ─── Session ─────────────────────────────────────────────────────────

/// Global options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct SessionOpts {
    /// Ledger snapshot file.
    pub ledger: PathBuf,
    /// Optional workflow config YAML. Defaults apply when absent.
    pub config: Option<PathBuf>,
    /// MSP id the caller submits as.
    pub msp: String,
}

/// A loaded ledger plus the registry and identity to drive it with.
pub struct Session {
    path: PathBuf,
    ledger: MemoryLedger,
    loaded_height: u64,
    registry: LandRegistry,
    msp: String,
}

impl Session {
    pub fn open(opts: &SessionOpts) -> Result<Self> {
        let config = match &opts.config {
            Some(path) => WorkflowConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => WorkflowConfig::default(),
        };
        let ledger = load_ledger(&opts.ledger)?;
        Ok(Self {
            path: opts.ledger.clone(),
            loaded_height: ledger.height(),
            ledger,
            registry: LandRegistry::new(config),
            msp: opts.msp.clone(),
        })
    }

    /// Interpret a role tag against the loaded config.
    fn role(&self, tag: &str) -> Result<CallerRole> {
        match self.registry.config().parse_role(tag) {
            Some(role) => Ok(role),
            None => {
                let tags = &self.registry.config().role_tags;
                bail!(
                    "unknown role {tag:?} (expected one of {:?}, {:?}, {:?})",
                    tags.citizen,
                    tags.ministry,
                    tags.revenue_office
                )
            }
        }
    }

    /// Run `f` in a transaction, commit it and persist the ledger.
    ///
    /// Fails without touching the file if another invocation saved since
    /// this session was opened.
    fn submit<R>(
        &self,
        op: &str,
        f: impl FnOnce(&LandRegistry, &mut Transaction<StaticIdentity>) -> Result<R, RegistryError>,
    ) -> Result<R> {
        let (out, receipt) = self
            .ledger
            .submit(StaticIdentity::new(self.msp.as_str()), |tx| {
                f(&self.registry, tx)
            })
            .with_context(|| format!("{op} failed"))?;
        save_ledger(&self.path, &self.ledger, self.loaded_height)?;
        tracing::info!(op, tx_id = %receipt.tx_id, height = receipt.height, "committed");
        Ok(out)
    }

    /// Run `f` in a transaction that is never committed.
    fn evaluate<R>(
        &self,
        op: &str,
        f: impl FnOnce(&LandRegistry, &mut Transaction<StaticIdentity>) -> Result<R, RegistryError>,
    ) -> Result<R> {
        self.ledger
            .evaluate(StaticIdentity::new(self.msp.as_str()), |tx| {
                f(&self.registry, tx)
            })
            .with_context(|| format!("{op} failed"))
    }
}

// ─── Arguments ───────────────────────────────────────────────────────

/// Fields that determine a parcel's AssetID.
#[derive(Args, Debug, Clone)]
pub struct ParcelKeyArgs {
    #[arg(long)]
    pub dag_no: i64,
    #[arg(long)]
    pub district: String,
    #[arg(long)]
    pub division: String,
    #[arg(long)]
    pub khatian_no: i64,
    #[arg(long)]
    pub mouza: String,
    #[arg(long)]
    pub upazila: String,
}

/// Full application details.
#[derive(Args, Debug, Clone)]
pub struct ParcelArgs {
    #[command(flatten)]
    pub key: ParcelKeyArgs,
    /// Supporting-document reference.
    #[arg(long, default_value = "")]
    pub nec: String,
    /// Proof-of-payment reference.
    #[arg(long, default_value = "")]
    pub pay_tx: String,
}

impl ParcelArgs {
    fn to_details(&self) -> ParcelDetails {
        ParcelDetails {
            dag_no: self.key.dag_no,
            district: self.key.district.clone(),
            division: self.key.division.clone(),
            khatian_no: self.key.khatian_no,
            mouza: self.key.mouza.clone(),
            upazila: self.key.upazila.clone(),
            nec: self.nec.clone(),
            pay_tx: self.pay_tx.clone(),
        }
    }
}

/// An official's review of an application.
#[derive(Args, Debug, Clone)]
pub struct ReviewArgs {
    /// AssetID of the application.
    #[arg(long)]
    pub id: String,
    /// NID of the acting official.
    #[arg(long)]
    pub official_nid: i64,
    /// Reject instead of accepting.
    #[arg(long)]
    pub reject: bool,
    /// Comment recorded on rejection.
    #[arg(long, default_value = "")]
    pub comment: String,
    /// Caller role tag.
    #[arg(long)]
    pub role: String,
}

impl ReviewArgs {
    fn decision(&self) -> Decision {
        Decision {
            accept: !self.reject,
            comment: self.comment.clone(),
            official: Nid(self.official_nid),
        }
    }
}

/// Registry subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// File a new application.
    Create {
        #[command(flatten)]
        parcel: ParcelArgs,
        #[arg(long)]
        owner_name: String,
        #[arg(long)]
        owner_nid: i64,
    },

    /// Replace an application's details and return it to pending.
    Resubmit {
        #[arg(long)]
        id: String,
        /// NID of the recorded owner.
        #[arg(long)]
        owner_nid: i64,
        #[command(flatten)]
        parcel: ParcelArgs,
    },

    /// Ministry review (pending → approved | rejected).
    Approve(ReviewArgs),

    /// Revenue-office review (approved → registered | rejected).
    Register(ReviewArgs),

    /// Review at whichever stage the caller's organization owns.
    Verify(ReviewArgs),

    /// Show one application.
    Read {
        #[arg(long)]
        id: String,
        /// Caller NID, checked against the owner for citizens.
        #[arg(long, default_value_t = 0)]
        nid: i64,
        #[arg(long)]
        role: String,
    },

    /// Show a deed of a registered parcel.
    Deed {
        #[arg(long)]
        id: String,
    },

    /// Transfer a parcel to a new owner.
    Transfer {
        #[arg(long)]
        id: String,
        /// NID of the current owner.
        #[arg(long)]
        owner_nid: i64,
        #[arg(long)]
        new_owner_name: String,
        #[arg(long)]
        new_owner_nid: i64,
    },

    /// List applications: the caller's own, or with `--admin` the review
    /// queue of the caller's organization.
    Applications {
        #[arg(long, default_value_t = 0)]
        nid: i64,
        #[arg(long)]
        role: String,
        #[arg(long)]
        admin: bool,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page. All rows when omitted.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List certificate-eligible parcels.
    Certificates,

    /// Print the AssetID the given parcel fields derive.
    Key(ParcelKeyArgs),
}

// ─── Dispatch ────────────────────────────────────────────────────────

/// Execute a registry subcommand.
pub fn run_command(command: &Command, opts: &SessionOpts) -> Result<u8> {
    match command {
        Command::Create {
            parcel,
            owner_name,
            owner_nid,
        } => cmd_create(opts, parcel, owner_name, Nid(*owner_nid)),
        Command::Resubmit {
            id,
            owner_nid,
            parcel,
        } => cmd_resubmit(opts, id, Nid(*owner_nid), parcel),
        Command::Approve(review) => cmd_review(opts, Stage::Approve, review),
        Command::Register(review) => cmd_review(opts, Stage::Register, review),
        Command::Verify(review) => cmd_review(opts, Stage::Verify, review),
        Command::Read { id, nid, role } => cmd_read(opts, id, Nid(*nid), role),
        Command::Deed { id } => cmd_deed(opts, id),
        Command::Transfer {
            id,
            owner_nid,
            new_owner_name,
            new_owner_nid,
        } => cmd_transfer(
            opts,
            id,
            Nid(*owner_nid),
            Owner::new(new_owner_name.as_str(), Nid(*new_owner_nid)),
        ),
        Command::Applications {
            nid,
            role,
            admin,
            page,
            limit,
        } => cmd_applications(opts, Nid(*nid), role, *admin, *page, *limit),
        Command::Certificates => cmd_certificates(opts),
        Command::Key(key) => cmd_key(key),
    }
}

fn cmd_create(
    opts: &SessionOpts,
    parcel: &ParcelArgs,
    owner_name: &str,
    owner_nid: Nid,
) -> Result<u8> {
    let session = Session::open(opts)?;
    let details = parcel.to_details();
    let asset_id = details.asset_id();
    let owner = Owner::new(owner_name, owner_nid);
    let tx_id = session.submit("create", |r, tx| r.create_application(tx, details, owner))?;
    println!("OK: application {asset_id} created in transaction {tx_id}");
    Ok(0)
}

fn cmd_resubmit(
    opts: &SessionOpts,
    id: &str,
    owner_nid: Nid,
    parcel: &ParcelArgs,
) -> Result<u8> {
    let session = Session::open(opts)?;
    let id = AssetId::new(id);
    let details = parcel.to_details();
    let land = session.submit("resubmit", |r, tx| {
        r.resubmit_application(tx, &id, owner_nid, details)
    })?;
    print_json(&land)?;
    Ok(0)
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Approve,
    Register,
    Verify,
}

fn cmd_review(opts: &SessionOpts, stage: Stage, review: &ReviewArgs) -> Result<u8> {
    let session = Session::open(opts)?;
    let role = session.role(&review.role)?;
    let id = AssetId::new(review.id.as_str());
    let decision = review.decision();
    match stage {
        Stage::Approve => session.submit("approve", |r, tx| {
            r.approve_application(tx, &id, decision, role)
        })?,
        Stage::Register => session.submit("register", |r, tx| {
            r.register_application(tx, &id, decision, role)
        })?,
        Stage::Verify => session.submit("verify", |r, tx| {
            r.verify_application(tx, &id, decision, role)
        })?,
    }
    let verdict = if review.reject { "rejected" } else { "accepted" };
    println!("OK: application {id} {verdict} ({stage:?})");
    Ok(0)
}

fn cmd_read(opts: &SessionOpts, id: &str, nid: Nid, role: &str) -> Result<u8> {
    let session = Session::open(opts)?;
    let role = session.role(role)?;
    let id = AssetId::new(id);
    let land = session.evaluate("read", |r, tx| r.read_application(tx, &id, nid, role))?;
    print_json(&land)?;
    Ok(0)
}

fn cmd_deed(opts: &SessionOpts, id: &str) -> Result<u8> {
    let session = Session::open(opts)?;
    let id = DeedId::new(id);
    let deed = session.evaluate("deed", |r, tx| r.read_deed(tx, &id))?;
    print_json(&deed)?;
    Ok(0)
}

fn cmd_transfer(opts: &SessionOpts, id: &str, owner_nid: Nid, new_owner: Owner) -> Result<u8> {
    let session = Session::open(opts)?;
    let id = AssetId::new(id);
    let new_nid = new_owner.nid;
    session.submit("transfer", |r, tx| {
        r.transfer_ownership(tx, &id, owner_nid, new_owner)
    })?;
    println!("OK: ownership of {id} transferred to {new_nid}");
    Ok(0)
}

fn cmd_applications(
    opts: &SessionOpts,
    nid: Nid,
    role: &str,
    admin: bool,
    page: usize,
    limit: Option<usize>,
) -> Result<u8> {
    let session = Session::open(opts)?;
    let role = session.role(role)?;
    let rows = if admin {
        session.evaluate("applications", |r, tx| {
            r.get_all_admin_applications(tx, nid, role)
        })?
    } else {
        session.evaluate("applications", |r, tx| r.get_all_user_applications(tx, nid))?
    };
    print_json(&Listing::new(rows, page, limit)?)?;
    Ok(0)
}

fn cmd_certificates(opts: &SessionOpts) -> Result<u8> {
    let session = Session::open(opts)?;
    let certs = session.evaluate("certificates", |r, tx| r.get_all_certificates(tx))?;
    print_json(&certs)?;
    Ok(0)
}

fn cmd_key(key: &ParcelKeyArgs) -> Result<u8> {
    let id = derive_asset_key(
        key.dag_no,
        &key.district,
        &key.division,
        key.khatian_no,
        &key.mouza,
        &key.upazila,
    );
    println!("{id}");
    Ok(0)
}

/// One page of a dashboard listing with counts over the full listing.
#[derive(Debug, Serialize)]
pub struct Listing {
    pub summary: StatusSummary,
    pub total: usize,
    pub page: usize,
    pub rows: Vec<Dashboard>,
}

impl Listing {
    /// Sort `rows` by AssetID, count them, and cut out page `page`.
    pub fn new(mut rows: Vec<Dashboard>, page: usize, limit: Option<usize>) -> Result<Self> {
        if page == 0 {
            bail!("pages are numbered from 1");
        }
        if limit == Some(0) {
            bail!("--limit must be positive");
        }
        rows.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));
        let summary = StatusSummary::of(&rows);
        let total = rows.len();
        let rows = match limit {
            None => rows,
            Some(limit) => rows
                .into_iter()
                .skip((page - 1).saturating_mul(limit))
                .take(limit)
                .collect(),
        };
        Ok(Self {
            summary,
            total,
            page,
            rows,
        })
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landreg_state::{Land, LandStatus};

    fn opts(dir: &tempfile::TempDir, msp: &str) -> SessionOpts {
        SessionOpts {
            ledger: dir.path().join("ledger.json"),
            config: None,
            msp: msp.to_string(),
        }
    }

    fn parcel() -> ParcelArgs {
        ParcelArgs {
            key: ParcelKeyArgs {
                dag_no: 12,
                district: "Dhaka".into(),
                division: "Dhaka".into(),
                khatian_no: 7,
                mouza: "X".into(),
                upazila: "Y".into(),
            },
            nec: "doc1".into(),
            pay_tx: "tx1".into(),
        }
    }

    fn review(official_nid: i64, role: &str) -> ReviewArgs {
        ReviewArgs {
            id: "12dhakadhaka7xy".into(),
            official_nid,
            reject: false,
            comment: String::new(),
            role: role.into(),
        }
    }

    fn stored_land(dir: &tempfile::TempDir) -> Land {
        let ledger = load_ledger(&dir.path().join("ledger.json")).unwrap();
        serde_json::from_slice(&ledger.get("land/12dhakadhaka7xy").unwrap()).unwrap()
    }

    fn create(dir: &tempfile::TempDir) {
        let cmd = Command::Create {
            parcel: parcel(),
            owner_name: "A".into(),
            owner_nid: 100,
        };
        assert_eq!(run_command(&cmd, &opts(dir, "Org3MSP")).unwrap(), 0);
    }

    #[test]
    fn overlapping_sessions_keep_first_commit() {
        let dir = tempfile::tempdir().unwrap();
        let opts = opts(&dir, "Org3MSP");
        let first = Session::open(&opts).unwrap();
        let second = Session::open(&opts).unwrap();

        let details = |dag_no: i64| ParcelDetails {
            dag_no,
            district: "D".into(),
            division: "V".into(),
            khatian_no: 1,
            mouza: "M".into(),
            upazila: "U".into(),
            nec: String::new(),
            pay_tx: "tx".into(),
        };
        first
            .submit("create", |registry, tx| {
                registry.create_application(tx, details(1), Owner::new("A", Nid(1)))
            })
            .unwrap();
        let err = second
            .submit("create", |registry, tx| {
                registry.create_application(tx, details(2), Owner::new("B", Nid(2)))
            })
            .unwrap_err();
        assert!(format!("{err:#}").contains("changed since it was loaded"));

        let ledger = load_ledger(&opts.ledger).unwrap();
        assert_eq!(ledger.keys_with_prefix("land/"), vec!["land/1dv1mu".to_string()]);
    }

    #[test]
    fn create_persists_application() {
        let dir = tempfile::tempdir().unwrap();
        create(&dir);
        let land = stored_land(&dir);
        assert_eq!(land.status, LandStatus::Pending);
        assert_eq!(land.owner_nid, Nid(100));
    }

    #[test]
    fn duplicate_create_fails() {
        let dir = tempfile::tempdir().unwrap();
        create(&dir);
        let cmd = Command::Create {
            parcel: parcel(),
            owner_name: "B".into(),
            owner_nid: 200,
        };
        let err = run_command(&cmd, &opts(&dir, "Org3MSP")).unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
    }

    #[test]
    fn full_flow_through_the_cli() {
        let dir = tempfile::tempdir().unwrap();
        create(&dir);

        run_command(&Command::Approve(review(900, "mol")), &opts(&dir, "Org1MSP")).unwrap();
        assert_eq!(stored_land(&dir).status, LandStatus::Approved);

        run_command(&Command::Register(review(800, "lro")), &opts(&dir, "Org2MSP")).unwrap();
        let land = stored_land(&dir);
        assert_eq!(land.status, LandStatus::Registered);
        assert!(!land.deed_id.is_empty());

        let deed = Command::Deed {
            id: land.deed_id.to_string(),
        };
        run_command(&deed, &opts(&dir, "Org3MSP")).unwrap();

        let transfer = Command::Transfer {
            id: "12dhakadhaka7xy".into(),
            owner_nid: 100,
            new_owner_name: "B".into(),
            new_owner_nid: 200,
        };
        run_command(&transfer, &opts(&dir, "Org3MSP")).unwrap();
        let after = stored_land(&dir);
        assert_eq!(after.status, LandStatus::Pending);
        assert_eq!(after.owner_nid, Nid(200));

        assert!(run_command(&deed, &opts(&dir, "Org3MSP")).is_err());
    }

    #[test]
    fn verify_routes_by_msp() {
        let dir = tempfile::tempdir().unwrap();
        create(&dir);
        run_command(&Command::Verify(review(900, "mol")), &opts(&dir, "Org1MSP")).unwrap();
        run_command(&Command::Verify(review(800, "lro")), &opts(&dir, "Org2MSP")).unwrap();
        assert_eq!(stored_land(&dir).status, LandStatus::Registered);
    }

    #[test]
    fn wrong_org_review_leaves_ledger_untouched() {
        let dir = tempfile::tempdir().unwrap();
        create(&dir);
        let before = std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();
        let err = run_command(&Command::Approve(review(900, "mol")), &opts(&dir, "Org2MSP"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("unauthorized"));
        let after = std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn unknown_role_tag_rejected() {
        let dir = tempfile::tempdir().unwrap();
        create(&dir);
        let err = run_command(&Command::Approve(review(900, "admin")), &opts(&dir, "Org1MSP"))
            .unwrap_err();
        assert!(err.to_string().contains("unknown role"));
    }

    #[test]
    fn config_file_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("registry.yaml");
        std::fs::write(&config, "ministry_msp_id: MinistryMSP\n").unwrap();
        create(&dir);

        let mut o = opts(&dir, "MinistryMSP");
        o.config = Some(config);
        run_command(&Command::Approve(review(900, "mol")), &o).unwrap();
        assert_eq!(stored_land(&dir).status, LandStatus::Approved);
    }

    #[test]
    fn read_and_listings_do_not_write() {
        let dir = tempfile::tempdir().unwrap();
        create(&dir);
        let before = std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();

        let read = Command::Read {
            id: "12dhakadhaka7xy".into(),
            nid: 100,
            role: "user".into(),
        };
        run_command(&read, &opts(&dir, "Org3MSP")).unwrap();
        let list = Command::Applications {
            nid: 100,
            role: "user".into(),
            admin: false,
            page: 1,
            limit: None,
        };
        run_command(&list, &opts(&dir, "Org3MSP")).unwrap();
        run_command(&Command::Certificates, &opts(&dir, "Org3MSP")).unwrap();

        let after = std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn key_needs_no_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_command(&Command::Key(parcel().key), &opts(&dir, "Org3MSP")).unwrap();
        assert_eq!(code, 0);
        assert!(!dir.path().join("ledger.json").exists());
    }

    fn row(id: &str, status: LandStatus) -> Dashboard {
        Dashboard {
            asset_id: AssetId::new(id),
            district: "D".into(),
            status,
            upazila: "U".into(),
        }
    }

    #[test]
    fn listing_pages_after_sorting() {
        let rows = vec![
            row("c", LandStatus::Pending),
            row("a", LandStatus::Approved),
            row("b", LandStatus::Pending),
        ];
        let listing = Listing::new(rows.clone(), 2, Some(2)).unwrap();
        assert_eq!(listing.total, 3);
        assert_eq!(listing.summary.pending, 2);
        assert_eq!(listing.summary.approved, 1);
        assert_eq!(listing.rows.len(), 1);
        assert_eq!(listing.rows[0].asset_id.as_str(), "c");

        let all = Listing::new(rows.clone(), 1, None).unwrap();
        assert_eq!(all.rows.len(), 3);

        let beyond = Listing::new(rows.clone(), 5, Some(2)).unwrap();
        assert!(beyond.rows.is_empty());

        assert!(Listing::new(rows.clone(), 0, None).is_err());
        assert!(Listing::new(rows, 1, Some(0)).is_err());
    }
}
