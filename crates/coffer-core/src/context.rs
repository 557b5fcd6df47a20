//! Caller context and ordinal time
//!
//! The host authenticates the caller and assigns each call a position in its
//! serialized order. Both arrive together as a [`CallContext`], so the
//! registry never reads ambient global state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::Principal;

/// Host ordinal block counter
///
/// Monotonically increasing across calls. Not wall-clock time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrdinalTime(pub u64);

impl OrdinalTime {
    /// Origin of the ordinal scale
    pub const ZERO: OrdinalTime = OrdinalTime(0);

    /// Create from a raw block counter
    pub fn new(ordinal: u64) -> Self {
        Self(ordinal)
    }

    /// Raw block counter
    pub fn value(self) -> u64 {
        self.0
    }

    /// Next ordinal on the scale, saturating at `u64::MAX`
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for OrdinalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for OrdinalTime {
    fn from(ordinal: u64) -> Self {
        Self(ordinal)
    }
}

/// Per-call context injected by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Pre-authenticated caller
    pub caller: Principal,
    /// Position of this call in the host's serialized order
    pub at: OrdinalTime,
}

impl CallContext {
    /// Create a context for `caller` at ordinal time `at`
    pub fn new(caller: impl Into<Principal>, at: u64) -> Self {
        Self {
            caller: caller.into(),
            at: OrdinalTime(at),
        }
    }

    /// Same caller, later ordinal
    pub fn at(&self, at: u64) -> Self {
        Self {
            caller: self.caller.clone(),
            at: OrdinalTime(at),
        }
    }
}
