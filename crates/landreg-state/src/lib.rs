//! # landreg-state: Land Registration Workflow
//!
//! The application lifecycle of a land parcel, run as transactions against
//! a versioned key-value ledger shared by a land ministry, a land-revenue
//! office, and citizens.
//!
//! ## Modules
//!
//! - **Land** (`land.rs`): the `Land` record and its lifecycle
//!   (`pending → approved → registered`, with `rejected` branches).
//!
//! - **Deed** (`deed.rs`): immutable deed snapshots, issued on registration.
//!
//! - **Registry** (`registry.rs`): `LandRegistry`, the role-gated operations
//!   (create, resubmit, approve, register, read, transfer).
//!
//! - **Views** (`views.rs`): dashboards and the certificate listing.
//!
//! - **Records** (`records.rs`): typed load/store over the `land/` and
//!   `deed/` key namespaces.
//!
//! - **Config** (`config.rs`): MSP ids, role tags and the registration note,
//!   injected at construction.
//!
//! ## Usage
//!
//! ```
//! use landreg_core::Nid;
//! use landreg_ledger::{MemoryLedger, StaticIdentity};
//! use landreg_state::{LandRegistry, Owner, ParcelDetails, RegistryError};
//!
//! let registry = LandRegistry::default();
//! let ledger = MemoryLedger::new();
//! let details = ParcelDetails {
//!     dag_no: 12,
//!     district: "Dhaka".into(),
//!     division: "Dhaka".into(),
//!     khatian_no: 7,
//!     mouza: "X".into(),
//!     upazila: "Y".into(),
//!     nec: "doc1".into(),
//!     pay_tx: "tx1".into(),
//! };
//! let (_tx_id, receipt) = ledger
//!     .submit(StaticIdentity::new("Org3MSP"), |tx| {
//!         registry.create_application(tx, details, Owner::new("A", Nid(100)))
//!     })
//!     .map_err(|e: RegistryError| e.to_string())
//!     .unwrap();
//! assert_eq!(receipt.writes, 1);
//! assert!(ledger.contains_key("land/12dhakadhaka7xy"));
//! ```

pub mod config;
pub mod deed;
pub mod error;
pub mod land;
pub mod records;
pub mod registry;
pub mod views;

pub use config::{CallerRole, Organization, RoleTags, WorkflowConfig};
pub use deed::{issue_deed, Deed};
pub use error::{ConfigError, RegistryError};
pub use land::{Land, LandStatus, Owner, ParcelDetails};
pub use records::Namespace;
pub use registry::{Decision, LandRegistry};
pub use views::{Dashboard, StatusSummary};
