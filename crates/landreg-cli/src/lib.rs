//! # landreg-cli: Operator CLI for the Land Registry
//!
//! Provides the `landreg` command-line interface. World state lives in a
//! JSON ledger snapshot file; each invocation is one transaction submitted
//! as the organization given by `--msp`.
//!
//! ## Subcommands
//!
//! - `landreg create` / `resubmit`: File or amend an application.
//! - `landreg approve` / `register` / `verify`: Official review.
//! - `landreg read` / `deed`: Point reads.
//! - `landreg transfer`: Ownership transfer.
//! - `landreg applications` / `certificates`: Listings.
//! - `landreg key`: Print the AssetID for a set of parcel fields.

pub mod commands;
pub mod ledger_file;

/// Ledger file used when `--ledger` is not given.
pub const DEFAULT_LEDGER_FILE: &str = "landreg-ledger.json";
