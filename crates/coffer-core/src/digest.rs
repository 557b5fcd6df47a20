//! Content integrity commitments
//!
//! The registry never sees document bytes. Each asset version is pinned by a
//! 32-byte digest computed by the host and an external location reference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RegistryError;

/// Size of a content digest in bytes
pub const DIGEST_LEN: usize = 32;

/// 32-byte hash commitment to a document version
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    /// Wrap a raw 32-byte digest
    pub fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a digest from a byte slice, rejecting anything that isn't 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RegistryError> {
        let array: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| {
            RegistryError::invalid_params(format!(
                "content digest must be {} bytes, got {}",
                DIGEST_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.to_hex())
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ContentDigest {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)
            .map_err(|e| RegistryError::invalid_params(format!("content digest: {e}")))?;
        Self::from_slice(&bytes)
    }
}

impl From<[u8; DIGEST_LEN]> for ContentDigest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_hex_display_and_parse() {
        let digest = ContentDigest::new([0xab; 32]);
        let hex = digest.to_string();
        assert_eq!(hex.len(), 64);
        assert_eq!(hex.parse::<ContentDigest>().unwrap(), digest);
    }

    #[test]
    fn test_wrong_length_is_invalid_params() {
        assert_matches!(
            ContentDigest::from_slice(&[0u8; 31]),
            Err(RegistryError::InvalidParams { .. })
        );
        assert_matches!(
            "abcd".parse::<ContentDigest>(),
            Err(RegistryError::InvalidParams { .. })
        );
    }
}
