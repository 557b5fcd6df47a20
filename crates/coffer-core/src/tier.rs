//! Permission tiers
//!
//! A tier is an ordinal permission level shared by the vault-scoped and
//! asset-scoped access tables. Tiers are totally ordered; a principal passes a
//! check when its effective tier is at least the tier the operation requires.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::RegistryError;

/// Ordinal permission level (ordered from least to most permissive)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Tier {
    /// No access; the implicit tier of any principal without a grant
    #[default]
    Restricted = 0,
    /// May read asset metadata and history
    Observer = 1,
    /// May publish revisions and manage vault membership
    Contributor = 2,
    /// Administrative tier on a vault
    Steward = 3,
}

impl Tier {
    /// Highest tier on the scale; what entity owners resolve to
    pub const MAX: Tier = Tier::Steward;

    /// All tiers in ascending order
    pub const ALL: [Tier; 4] = [
        Tier::Restricted,
        Tier::Observer,
        Tier::Contributor,
        Tier::Steward,
    ];

    /// Raw ordinal value of this tier
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this tier satisfies a required tier
    pub fn satisfies(self, required: Tier) -> bool {
        self >= required
    }

    /// Human-readable tier name
    pub fn name(self) -> &'static str {
        match self {
            Tier::Restricted => "restricted",
            Tier::Observer => "observer",
            Tier::Contributor => "contributor",
            Tier::Steward => "steward",
        }
    }
}

/// Whether a raw ordinal names a tier on the scale
pub fn is_valid_tier(tier: u8) -> bool {
    tier <= Tier::MAX.as_u8()
}

/// What an operation demands of its caller on one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessRequirement {
    /// Caller must be the entity owner; no grant substitutes for ownership
    Owner,
    /// Caller's effective tier must be at least this tier
    AtLeast(Tier),
}

impl fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRequirement::Owner => f.write_str("ownership"),
            AccessRequirement::AtLeast(tier) => write!(f, "tier {tier}"),
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = RegistryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Tier::Restricted),
            1 => Ok(Tier::Observer),
            2 => Ok(Tier::Contributor),
            3 => Ok(Tier::Steward),
            other => Err(RegistryError::invalid_tier(other)),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.as_u8()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u8())
    }
}
