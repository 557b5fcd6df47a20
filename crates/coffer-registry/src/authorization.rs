//! Authorization engine
//!
//! Resolution has three outcomes: the entity is missing (fail closed), the
//! principal owns it (absolute bypass), or the grant table decides. Owner
//! bypass cannot be weakened by a low grant on the owner's own entity.

use coffer_core::{AccessRequirement, Principal, Tier};
use serde::{Deserialize, Serialize};

use crate::records::AccessGrant;

/// Outcome of resolving a principal's standing on one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessResolution {
    /// Entity does not exist; every check fails
    Denied,
    /// Principal owns the entity; every check passes
    Owner,
    /// Principal's tier from the grant table, `Restricted` when absent
    Granted(Tier),
}

impl AccessResolution {
    /// Effective tier, or `None` when the entity is missing
    pub fn effective_tier(self) -> Option<Tier> {
        match self {
            AccessResolution::Denied => None,
            AccessResolution::Owner => Some(Tier::MAX),
            AccessResolution::Granted(tier) => Some(tier),
        }
    }

    /// Whether this standing meets a requirement
    pub fn satisfies(self, required: AccessRequirement) -> bool {
        match (self, required) {
            (AccessResolution::Denied, _) => false,
            (AccessResolution::Owner, _) => true,
            (AccessResolution::Granted(_), AccessRequirement::Owner) => false,
            (AccessResolution::Granted(tier), AccessRequirement::AtLeast(min)) => {
                tier.satisfies(min)
            }
        }
    }

    /// Whether the principal is the entity owner
    pub fn is_owner(self) -> bool {
        matches!(self, AccessResolution::Owner)
    }
}

/// Resolve standing from an entity's owner (if the entity exists) and the
/// principal's grant row (if any)
pub fn resolve_access(
    principal: &Principal,
    owner: Option<&Principal>,
    grant: Option<&AccessGrant>,
) -> AccessResolution {
    match owner {
        None => AccessResolution::Denied,
        Some(owner) if owner == principal => AccessResolution::Owner,
        Some(_) => AccessResolution::Granted(grant.map_or(Tier::Restricted, |g| g.tier)),
    }
}
