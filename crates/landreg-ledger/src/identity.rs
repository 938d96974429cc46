//! # Static Client Identity
//!
//! A fixed MSP id standing in for the platform's certificate-based identity
//! service. The CLI builds one from `--msp`; tests build one per simulated
//! organization.

use crate::error::IdentityError;
use crate::stub::ClientIdentity;

/// A caller identity with a preconfigured MSP id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    msp_id: Option<String>,
}

impl StaticIdentity {
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: Some(msp_id.into()),
        }
    }

    /// An identity whose organization cannot be resolved, e.g. a malformed
    /// certificate.
    pub fn unresolvable() -> Self {
        Self { msp_id: None }
    }
}

impl ClientIdentity for StaticIdentity {
    fn msp_id(&self) -> Result<String, IdentityError> {
        match &self.msp_id {
            Some(id) if !id.trim().is_empty() => Ok(id.clone()),
            Some(_) => Err(IdentityError::Unresolvable("empty MSP id".into())),
            None => Err(IdentityError::Unresolvable(
                "credential carries no MSP id".into(),
            )),
        }
    }
}
