//! Identifier types for registry entities and callers
//!
//! Vault and asset identifiers are caller-chosen strings. They are validated
//! once, when an entity is created; lookups accept any string and simply miss.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{RegistryError, RegistryResult};

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier without validation (lookups, tests)
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Validate a caller-supplied identifier for entity creation
            ///
            /// Rejects empty identifiers, identifiers longer than `max_len`
            /// characters, and identifiers containing control characters.
            pub fn parse(raw: &str, max_len: usize) -> RegistryResult<Self> {
                if raw.is_empty() {
                    return Err(RegistryError::invalid_params(concat!($label, " id must not be empty")));
                }
                let len = raw.chars().count();
                if len > max_len {
                    return Err(RegistryError::invalid_params(format!(
                        "{} id '{}' is {} chars, limit is {}",
                        $label, raw, len, max_len
                    )));
                }
                if raw.chars().any(char::is_control) {
                    return Err(RegistryError::invalid_params(concat!(
                        $label,
                        " id must not contain control characters"
                    )));
                }
                Ok(Self(raw.to_string()))
            }

            /// Borrow the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }
    };
}

string_identifier!(
    /// Unique, caller-chosen vault identifier
    VaultId,
    "vault"
);

string_identifier!(
    /// Unique, caller-chosen asset identifier
    AssetId,
    "asset"
);

/// Authenticated caller identity
///
/// Opaque to the registry. The host authenticates callers and hands the
/// resulting principal in through [`crate::CallContext`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from its host-assigned identity string
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Borrow the identity string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(identity: &str) -> Self {
        Self::new(identity)
    }
}
