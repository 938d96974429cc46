//! # Workflow Configuration
//!
//! Deployment-specific constants: which MSP ids belong to the land ministry
//! and the land-revenue office, which caller-role tags clients send, and the
//! note written on approval and registration.
//!
//! A `WorkflowConfig` is built once (from YAML or [`Default`]), validated,
//! and injected into [`LandRegistry::new`](crate::registry::LandRegistry::new).
//! Nothing here is global or mutable.
//!
//! ```yaml
//! ministry_msp_id: Org1MSP
//! revenue_office_msp_id: Org2MSP
//! role_tags:
//!   citizen: user
//!   ministry: mol
//!   revenue_office: lro
//! registration_note: Land registerd by Land Revenue Office
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Organization a caller belongs to, resolved from its MSP id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Organization {
    /// Approves pending applications.
    MinistryOfLand,
    /// Registers approved applications and issues deeds.
    LandRevenueOffice,
    /// Any other MSP, i.e. citizens and unknown organizations.
    Unaffiliated,
}

impl std::fmt::Display for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MinistryOfLand => "MinistryOfLand",
            Self::LandRevenueOffice => "LandRevenueOffice",
            Self::Unaffiliated => "Unaffiliated",
        })
    }
}

/// Role the caller claims for this request.
///
/// A citizen tag overrides organization membership: an official browsing as
/// a citizen gets citizen visibility and cannot approve or register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallerRole {
    Citizen,
    Official,
}

impl CallerRole {
    pub fn is_citizen(&self) -> bool {
        matches!(self, Self::Citizen)
    }
}

/// Role tags as sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleTags {
    pub citizen: String,
    pub ministry: String,
    pub revenue_office: String,
}

impl Default for RoleTags {
    fn default() -> Self {
        Self {
            citizen: "user".to_string(),
            ministry: "mol".to_string(),
            revenue_office: "lro".to_string(),
        }
    }
}

/// Immutable configuration of a registry deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    /// MSP id of the land ministry.
    pub ministry_msp_id: String,
    /// MSP id of the land-revenue office.
    pub revenue_office_msp_id: String,
    pub role_tags: RoleTags,
    /// Comment forced onto a parcel on positive approval or registration.
    pub registration_note: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            ministry_msp_id: "Org1MSP".to_string(),
            revenue_office_msp_id: "Org2MSP".to_string(),
            role_tags: RoleTags::default(),
            registration_note: "Land registerd by Land Revenue Office".to_string(),
        }
    }
}

impl WorkflowConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Reject empty or colliding identifiers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ministry_msp_id.trim().is_empty() || self.revenue_office_msp_id.trim().is_empty() {
            return Err(ConfigError::Invalid("MSP ids must not be empty".into()));
        }
        if self.ministry_msp_id == self.revenue_office_msp_id {
            return Err(ConfigError::Invalid(format!(
                "ministry and revenue office share MSP id {:?}",
                self.ministry_msp_id
            )));
        }
        let tags = [
            &self.role_tags.citizen,
            &self.role_tags.ministry,
            &self.role_tags.revenue_office,
        ];
        if tags.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("role tags must not be empty".into()));
        }
        if tags[0] == tags[1] || tags[0] == tags[2] || tags[1] == tags[2] {
            return Err(ConfigError::Invalid("role tags must be distinct".into()));
        }
        Ok(())
    }

    /// Map an MSP id onto the closed set of organizations.
    pub fn organization_of(&self, msp_id: &str) -> Organization {
        if msp_id == self.ministry_msp_id {
            Organization::MinistryOfLand
        } else if msp_id == self.revenue_office_msp_id {
            Organization::LandRevenueOffice
        } else {
            Organization::Unaffiliated
        }
    }

    /// Interpret a client role tag. Unknown tags yield `None`.
    pub fn parse_role(&self, tag: &str) -> Option<CallerRole> {
        if tag == self.role_tags.citizen {
            Some(CallerRole::Citizen)
        } else if tag == self.role_tags.ministry || tag == self.role_tags.revenue_office {
            Some(CallerRole::Official)
        } else {
            None
        }
    }
}
